//! Per-batch rotation speed control
//!
//! Every batch of rings runs its own small state machine that alternates between
//! long, slow `Cruise` stretches and short `Surge` bursts. The multiplier eases
//! toward the current target instead of jumping, so speed changes read as
//! acceleration rather than snapping.

use std::collections::{BTreeMap, BTreeSet};

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Initial multiplier and target for a freshly observed batch
pub const INITIAL_MULTIPLIER: f32 = 0.5;
/// Chance that an expiring cruise turns into a surge
pub const SURGE_CHANCE: f64 = 0.4;
/// Easing rates toward the target (speeding up, slowing down)
pub const LERP_UP: f32 = 0.05;
pub const LERP_DOWN: f32 = 0.03;

/// Behavior of a batch between transitions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BatchMode {
    Cruise,
    Surge,
}

/// Speed state for one batch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchState {
    /// Smoothed speed multiplier applied to the base rotation speed
    pub multiplier: f32,
    /// Value the multiplier is easing toward
    pub target: f32,
    /// Ticks until the next transition
    pub timer: i32,
    pub mode: BatchMode,
}

impl BatchState {
    /// Fresh cruise state with a random first timer
    pub fn new<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self {
            multiplier: INITIAL_MULTIPLIER,
            target: INITIAL_MULTIPLIER,
            timer: rng.random_range(60..=180),
            mode: BatchMode::Cruise,
        }
    }

    /// Advance one tick: count down, transition on expiry, then ease the multiplier.
    ///
    /// Returns the updated multiplier.
    pub fn step<R: Rng + ?Sized>(&mut self, rng: &mut R) -> f32 {
        self.timer -= 1;
        if self.timer <= 0 {
            self.transition(rng);
        }

        let rate = if self.target > self.multiplier {
            LERP_UP
        } else {
            LERP_DOWN
        };
        self.multiplier += (self.target - self.multiplier) * rate;
        self.multiplier
    }

    fn transition<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        match self.mode {
            BatchMode::Cruise if rng.random_bool(SURGE_CHANCE) => {
                self.mode = BatchMode::Surge;
                self.target = rng.random_range(2.5..=4.0);
                self.timer = rng.random_range(90..=120);
            }
            BatchMode::Cruise => {
                self.target = rng.random_range(0.2..=0.6);
                self.timer = rng.random_range(60..=180);
            }
            BatchMode::Surge => {
                self.mode = BatchMode::Cruise;
                self.target = rng.random_range(0.2..=0.5);
                self.timer = rng.random_range(60..=120);
            }
        }
    }
}

/// Owns the speed state of every live batch, keyed by batch id
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BatchSpeedController {
    batches: BTreeMap<u32, BatchState>,
}

impl BatchSpeedController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance one batch by one tick and return its multiplier.
    ///
    /// A batch id seen for the first time is initialized lazily.
    pub fn tick<R: Rng + ?Sized>(&mut self, batch: u32, rng: &mut R) -> f32 {
        self.batches
            .entry(batch)
            .or_insert_with(|| BatchState::new(rng))
            .step(rng)
    }

    /// Current state of a batch, if it has been observed
    pub fn get(&self, batch: u32) -> Option<&BatchState> {
        self.batches.get(&batch)
    }

    /// Ids of every batch with state, ascending
    pub fn batch_ids(&self) -> impl Iterator<Item = u32> + '_ {
        self.batches.keys().copied()
    }

    /// Drop state for batches no longer referenced by any ring
    pub fn retain_batches(&mut self, live: &BTreeSet<u32>) {
        self.batches.retain(|id, _| live.contains(id));
    }

    /// Forget every batch
    pub fn clear(&mut self) {
        self.batches.clear();
    }

    pub fn len(&self) -> usize {
        self.batches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.batches.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_first_tick_initializes_batch() {
        let mut rng = Pcg32::seed_from_u64(1);
        let mut ctl = BatchSpeedController::new();
        assert!(ctl.get(3).is_none());

        let m = ctl.tick(3, &mut rng);
        let state = ctl.get(3).unwrap();
        assert_eq!(state.mode, BatchMode::Cruise);
        assert_eq!(state.target, INITIAL_MULTIPLIER);
        // Target equals current, so the first tick leaves the multiplier in place
        assert_eq!(m, INITIAL_MULTIPLIER);
        // Timer drawn from [60, 180], then decremented once
        assert!((59..=179).contains(&state.timer));
    }

    #[test]
    fn test_batches_are_independent() {
        let mut rng = Pcg32::seed_from_u64(2);
        let mut ctl = BatchSpeedController::new();
        for _ in 0..50 {
            ctl.tick(0, &mut rng);
        }
        ctl.tick(1, &mut rng);
        assert_eq!(ctl.len(), 2);
        let a = ctl.get(0).unwrap().timer;
        let b = ctl.get(1).unwrap().timer;
        // Batch 0 has counted down 50 more ticks than batch 1 could have
        assert!(a < 180 - 49);
        assert!(b >= 59);
    }

    #[test]
    fn test_surge_always_returns_to_cruise() {
        let mut rng = Pcg32::seed_from_u64(3);
        let mut state = BatchState {
            multiplier: 3.0,
            target: 3.5,
            timer: 1,
            mode: BatchMode::Surge,
        };
        state.step(&mut rng);
        assert_eq!(state.mode, BatchMode::Cruise);
        assert!((0.2..=0.5).contains(&state.target));
        assert!((60..=120).contains(&state.timer));
        // Slowing down uses the gentler rate
        let expected = 3.0 + (state.target - 3.0) * LERP_DOWN;
        assert!((state.multiplier - expected).abs() < 1e-6);
    }

    #[test]
    fn test_cruise_expiry_picks_valid_next_state() {
        for seed in 0..200 {
            let mut rng = Pcg32::seed_from_u64(seed);
            let mut state = BatchState {
                multiplier: 0.5,
                target: 0.5,
                timer: 0,
                mode: BatchMode::Cruise,
            };
            state.step(&mut rng);
            match state.mode {
                BatchMode::Surge => {
                    assert!((2.5..=4.0).contains(&state.target));
                    assert!((90..=120).contains(&state.timer));
                }
                BatchMode::Cruise => {
                    assert!((0.2..=0.6).contains(&state.target));
                    assert!((60..=180).contains(&state.timer));
                }
            }
        }
    }

    #[test]
    fn test_surges_happen() {
        let mut rng = Pcg32::seed_from_u64(4);
        let mut ctl = BatchSpeedController::new();
        let mut peak: f32 = 0.0;
        for _ in 0..5_000 {
            peak = peak.max(ctl.tick(0, &mut rng));
        }
        assert!(peak > 1.0, "no surge in 5000 ticks, peak {peak}");
    }

    #[test]
    fn test_retain_and_clear() {
        let mut rng = Pcg32::seed_from_u64(5);
        let mut ctl = BatchSpeedController::new();
        for id in 0..4 {
            ctl.tick(id, &mut rng);
        }
        ctl.retain_batches(&BTreeSet::from([2, 3]));
        assert!(ctl.get(0).is_none());
        assert!(ctl.get(3).is_some());
        ctl.clear();
        assert!(ctl.is_empty());
    }

    proptest! {
        #[test]
        fn multiplier_bounded_and_monotone_between_transitions(
            seed in any::<u64>(),
            ticks in 1usize..2_000,
        ) {
            let mut rng = Pcg32::seed_from_u64(seed);
            let mut state = BatchState::new(&mut rng);
            for _ in 0..ticks {
                let before = state.multiplier;
                let old_target = state.target;
                let old_timer = state.timer;
                let after = state.step(&mut rng);
                prop_assert!((0.0..=4.0).contains(&after));
                if old_timer > 1 {
                    // No transition this tick: moved toward the unchanged target
                    prop_assert_eq!(state.target, old_target);
                    prop_assert!((after - old_target).abs() <= (before - old_target).abs());
                }
            }
        }
    }
}
