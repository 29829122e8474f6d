//! The ball and its per-tick integrator

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;

/// The player's ball. Position is relative to the field center.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ball {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    pub color: [u8; 3],
}

impl Default for Ball {
    fn default() -> Self {
        Self {
            pos: Vec2::ZERO,
            vel: Vec2::new(BALL_START_VEL.0, BALL_START_VEL.1),
            radius: BALL_RADIUS,
            color: BALL_COLOR,
        }
    }
}

impl Ball {
    pub fn new() -> Self {
        Self::default()
    }

    /// Distance from the ball center to the field center
    #[inline]
    pub fn distance_from_center(&self) -> f32 {
        self.pos.length()
    }

    /// Current speed
    #[inline]
    pub fn speed(&self) -> f32 {
        self.vel.length()
    }
}

/// Advance the ball one tick: gravity (along -y) into velocity, then velocity into position.
///
/// Semi-implicit Euler with a unit timestep; knows nothing about collisions.
pub fn advance(ball: &mut Ball, gravity: f32) {
    ball.vel.y -= gravity;
    ball.pos += ball.vel;
}
