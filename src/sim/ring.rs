//! Rotating ring geometry
//!
//! A ring is a thin band of radius `radius` and radial `thickness`, solid all the
//! way around except for one angular gap of `gap_width` centered on `angle`:
//! - inner edge = radius - thickness/2 (the surface the ball collides with)
//! - gap spans angle ± gap_width/2

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::{angular_distance, normalize_angle};

/// A single rotating, shrinking ring
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ring {
    /// Centerline radius from the field center
    pub radius: f32,
    /// Gap center angle (radians, always in [0, 2π))
    pub angle: f32,
    /// Angular width of the gap (radians)
    pub gap_width: f32,
    /// +1 counter-clockwise, -1 clockwise
    pub direction: f32,
    /// Radial thickness (extends radius ± thickness/2)
    pub thickness: f32,
    /// Speed batch this ring belongs to
    pub batch: u32,
    pub color: [u8; 3],
}

impl Ring {
    /// Spawn a ring at `radius` for the `spawn_index`-th ring of the session.
    ///
    /// Batch and direction follow from the spawn index; angle and color are drawn from `rng`.
    pub fn spawn<R: Rng + ?Sized>(radius: f32, spawn_index: u32, rng: &mut R) -> Self {
        let batch = batch_for(spawn_index);
        Self {
            radius,
            angle: normalize_angle(rng.random_range(0.0..std::f32::consts::TAU)),
            gap_width: RING_GAP_WIDTH,
            direction: direction_for(batch),
            thickness: RING_THICKNESS,
            batch,
            color: [
                rng.random_range(50..=255),
                rng.random_range(50..=255),
                rng.random_range(200..=255),
            ],
        }
    }

    /// Inner radius of the band
    #[inline]
    pub fn inner_radius(&self) -> f32 {
        self.radius - self.thickness / 2.0
    }

    /// Outer radius of the band
    #[inline]
    pub fn outer_radius(&self) -> f32 {
        self.radius + self.thickness / 2.0
    }

    /// Check if an angle falls strictly inside the gap
    pub fn gap_contains(&self, theta: f32) -> bool {
        angular_distance(theta, self.angle) < self.gap_width / 2.0
    }

    /// Rotate by `rotation_speed` in the ring's direction and shrink by `shrink_speed`
    pub fn update(&mut self, rotation_speed: f32, shrink_speed: f32) {
        self.angle = normalize_angle(self.angle + self.direction * rotation_speed);
        self.radius -= shrink_speed;
    }

    /// Endpoints of the solid arc (start, end), going counter-clockwise from the gap's far edge
    pub fn solid_arc(&self) -> (f32, f32) {
        let half = self.gap_width / 2.0;
        (self.angle + half, self.angle - half + std::f32::consts::TAU)
    }
}

/// Batch id for a spawn index
#[inline]
pub fn batch_for(spawn_index: u32) -> u32 {
    spawn_index / BATCH_SIZE
}

/// Rotation direction for a batch: even batches spin counter-clockwise
#[inline]
pub fn direction_for(batch: u32) -> f32 {
    if batch % 2 == 0 { 1.0 } else { -1.0 }
}
