//! The ring field: every live ring, innermost first
//!
//! Rings are born at the outer edge and only ever leave from the front, so the
//! deque stays sorted by radius without re-sorting.

use std::collections::{BTreeMap, BTreeSet, VecDeque};

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::batch::BatchSpeedController;
use super::ring::Ring;
use crate::consts::*;

/// Ordered collection of rings plus spawn bookkeeping
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RingField {
    rings: VecDeque<Ring>,
    /// Rings ever spawned this session (drives batch assignment)
    spawn_count: u32,
    pub spacing: f32,
    pub max_radius: f32,
}

impl Default for RingField {
    fn default() -> Self {
        Self::new(FIELD_SPACING, FIELD_MAX_RADIUS)
    }
}

impl RingField {
    /// Empty field with the given layout
    pub fn new(spacing: f32, max_radius: f32) -> Self {
        Self {
            rings: VecDeque::new(),
            spawn_count: 0,
            spacing,
            max_radius,
        }
    }

    /// Fill the field from the inner start radius out to (not including) `max_radius`
    pub fn spawn_initial<R: Rng + ?Sized>(&mut self, spacing: f32, max_radius: f32, rng: &mut R) {
        self.spacing = spacing;
        self.max_radius = max_radius;

        let mut radius = FIELD_START_RADIUS;
        while radius < max_radius {
            self.push_ring(radius, rng);
            if spacing <= 0.0 {
                break;
            }
            radius += spacing;
        }
        log::info!(
            "Spawned {} rings ({} to {}, spacing {})",
            self.rings.len(),
            FIELD_START_RADIUS,
            max_radius,
            spacing
        );
    }

    fn push_ring<R: Rng + ?Sized>(&mut self, radius: f32, rng: &mut R) {
        let ring = Ring::spawn(radius, self.spawn_count, rng);
        self.spawn_count += 1;
        self.rings.push_back(ring);
    }

    /// Rotate and shrink every ring for one tick.
    ///
    /// Each batch's multiplier is fetched once, so siblings in a batch stay in lockstep.
    pub fn update<R: Rng + ?Sized>(
        &mut self,
        speeds: &mut BatchSpeedController,
        rng: &mut R,
        base_rotation_speed: f32,
        base_shrink_speed: f32,
    ) {
        let Some(inner) = self.rings.front() else {
            return;
        };
        let shrink = effective_shrink(base_shrink_speed, inner.radius);

        let mut multipliers: BTreeMap<u32, f32> = BTreeMap::new();
        for ring in &self.rings {
            multipliers
                .entry(ring.batch)
                .or_insert_with(|| speeds.tick(ring.batch, rng));
        }

        for ring in &mut self.rings {
            ring.update(base_rotation_speed * multipliers[&ring.batch], shrink);
        }
    }

    /// Append a new ring at the outer edge once the outermost one has moved far enough in
    pub fn maybe_spawn<R: Rng + ?Sized>(&mut self, rng: &mut R) -> bool {
        match self.rings.back() {
            Some(outer) if outer.radius < self.max_radius - self.spacing => {
                self.push_ring(self.max_radius, rng);
                true
            }
            _ => false,
        }
    }

    /// Remove and return the innermost ring
    pub fn pop_front(&mut self) -> Option<Ring> {
        self.rings.pop_front()
    }

    /// The ring the ball is currently up against
    pub fn innermost(&self) -> Option<&Ring> {
        self.rings.front()
    }

    pub fn outermost(&self) -> Option<&Ring> {
        self.rings.back()
    }

    /// Rings innermost first
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &Ring> {
        self.rings.iter()
    }

    /// Batch ids still referenced by some ring
    pub fn live_batches(&self) -> BTreeSet<u32> {
        self.rings.iter().map(|r| r.batch).collect()
    }

    pub fn spawn_count(&self) -> u32 {
        self.spawn_count
    }

    pub fn len(&self) -> usize {
        self.rings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rings.is_empty()
    }

    /// Field built from hand-placed rings, innermost first
    #[cfg(test)]
    pub(crate) fn from_rings(rings: Vec<Ring>) -> Self {
        debug_assert!(rings.windows(2).all(|w| w[0].radius < w[1].radius));
        Self {
            spawn_count: rings.len() as u32,
            rings: rings.into(),
            ..Self::default()
        }
    }

    /// Drop every ring and restart spawn numbering
    pub fn clear(&mut self) {
        self.rings.clear();
        self.spawn_count = 0;
    }
}

/// Shrink speed for the whole field given the innermost ring's radius.
///
/// Slows down near the center so the innermost ring can't close over the ball in one tick.
pub fn effective_shrink(base_shrink_speed: f32, innermost_radius: f32) -> f32 {
    if innermost_radius < CORE_RADIUS {
        CORE_SHRINK_SPEED
    } else if innermost_radius < SHRINK_DAMP_RADIUS {
        base_shrink_speed * (innermost_radius / SHRINK_DAMP_RADIUS) * SHRINK_DAMP_FACTOR
    } else {
        base_shrink_speed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;
    use std::f32::consts::TAU;

    fn seeded_field() -> (RingField, Pcg32) {
        let mut rng = Pcg32::seed_from_u64(42);
        let mut field = RingField::default();
        field.spawn_initial(FIELD_SPACING, FIELD_MAX_RADIUS, &mut rng);
        (field, rng)
    }

    #[test]
    fn test_spawn_initial_layout() {
        let (field, _) = seeded_field();
        // 200, 225, ..., 475
        assert_eq!(field.len(), 12);
        assert_eq!(field.innermost().unwrap().radius, 200.0);
        assert_eq!(field.outermost().unwrap().radius, 475.0);
        assert_eq!(field.spawn_count(), 12);

        let batches: Vec<u32> = field.iter().map(|r| r.batch).collect();
        assert_eq!(batches, vec![0, 0, 0, 0, 1, 1, 1, 1, 2, 2, 2, 2]);
    }

    #[test]
    fn test_effective_shrink_thresholds() {
        assert_eq!(effective_shrink(0.6, 200.0), 0.6);
        assert_eq!(effective_shrink(0.6, 50.0), 0.6);
        assert!((effective_shrink(0.6, 25.0) - 0.24).abs() < 1e-6);
        assert!((effective_shrink(0.6, 15.0) - 0.6 * 0.3 * 0.8).abs() < 1e-6);
        assert_eq!(effective_shrink(0.6, 14.9), CORE_SHRINK_SPEED);
        assert_eq!(effective_shrink(2.0, 1.0), CORE_SHRINK_SPEED);
    }

    #[test]
    fn test_update_moves_every_ring() {
        let (mut field, mut rng) = seeded_field();
        let mut speeds = BatchSpeedController::new();
        let before: Vec<f32> = field.iter().map(|r| r.radius).collect();

        field.update(&mut speeds, &mut rng, 0.02, 0.6);

        for (ring, r0) in field.iter().zip(before) {
            assert!((ring.radius - (r0 - 0.6)).abs() < 1e-4);
            assert!((0.0..TAU).contains(&ring.angle));
        }
        assert_eq!(speeds.len(), 3);
    }

    #[test]
    fn test_batch_siblings_rotate_together() {
        let (mut field, mut rng) = seeded_field();
        let mut speeds = BatchSpeedController::new();
        let start: Vec<f32> = field.iter().map(|r| r.angle).collect();

        field.update(&mut speeds, &mut rng, 0.02, 0.0);

        let deltas: Vec<f32> = field
            .iter()
            .zip(start)
            .map(|(r, a0)| crate::angular_distance(r.angle, a0))
            .collect();
        // Same batch, same multiplier, same rotation step
        for chunk in deltas.chunks(BATCH_SIZE as usize) {
            for d in chunk {
                assert!((d - chunk[0]).abs() < 1e-5);
            }
        }
    }

    #[test]
    fn test_each_batch_ticked_once_per_update() {
        let (mut field, mut rng) = seeded_field();
        let mut speeds = BatchSpeedController::new();

        field.update(&mut speeds, &mut rng, 0.02, 0.0);
        let timers: Vec<i32> = (0..3).map(|id| speeds.get(id).unwrap().timer).collect();
        // Fresh timers are at least 59, so the next tick can't transition
        assert!(timers.iter().all(|t| *t >= 59));

        field.update(&mut speeds, &mut rng, 0.02, 0.0);
        for (id, before) in timers.into_iter().enumerate() {
            let after = speeds.get(id as u32).unwrap().timer;
            assert_eq!(before - after, 1, "batch {id} timer dropped by {}", before - after);
        }
    }

    #[test]
    fn test_maybe_spawn() {
        let (mut field, mut rng) = seeded_field();
        // Outermost is at 475 = max - spacing, not strictly below
        assert!(!field.maybe_spawn(&mut rng));

        let mut speeds = BatchSpeedController::new();
        field.update(&mut speeds, &mut rng, 0.0, 0.6);
        assert!(field.maybe_spawn(&mut rng));
        assert_eq!(field.len(), 13);
        let outer = field.outermost().unwrap();
        assert_eq!(outer.radius, FIELD_MAX_RADIUS);
        assert_eq!(outer.batch, 3);
        assert_eq!(field.spawn_count(), 13);
    }

    #[test]
    fn test_order_preserved_over_time() {
        let (mut field, mut rng) = seeded_field();
        let mut speeds = BatchSpeedController::new();
        for _ in 0..300 {
            field.update(&mut speeds, &mut rng, 0.05, 0.6);
            field.maybe_spawn(&mut rng);
            while field.innermost().is_some_and(|r| r.radius < 13.0) {
                field.pop_front();
            }
        }
        let radii: Vec<f32> = field.iter().map(|r| r.radius).collect();
        assert!(radii.windows(2).all(|w| w[0] < w[1]), "{radii:?}");
    }

    #[test]
    fn test_empty_field_is_inert() {
        let mut rng = Pcg32::seed_from_u64(0);
        let mut field = RingField::default();
        let mut speeds = BatchSpeedController::new();
        field.update(&mut speeds, &mut rng, 0.02, 0.6);
        assert!(!field.maybe_spawn(&mut rng));
        assert!(field.pop_front().is_none());
        assert!(speeds.is_empty());
    }

    #[test]
    fn test_pop_front_and_live_batches() {
        let (mut field, _) = seeded_field();
        for _ in 0..4 {
            assert_eq!(field.pop_front().unwrap().batch, 0);
        }
        assert_eq!(field.live_batches(), BTreeSet::from([1, 2]));
        field.clear();
        assert!(field.is_empty());
        assert_eq!(field.spawn_count(), 0);
    }
}
