//! Ring Escape - a ball working its way out through concentric rotating rings
//!
//! Core modules:
//! - `sim`: Simulation core (integrator, rings, batch speed control, collisions)
//! - `settings`: Tunable parameters and session configuration

pub mod settings;
pub mod sim;

pub use settings::{Settings, Tuning};

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Simulation rate (ticks per second)
    pub const TICK_RATE: u32 = 60;
    /// Default session length in seconds
    pub const SESSION_SECS: u32 = 60;

    /// Ball defaults
    pub const BALL_RADIUS: f32 = 8.0;
    pub const BALL_START_VEL: (f32, f32) = (2.0, 0.0);
    pub const BALL_COLOR: [u8; 3] = [50, 200, 255];

    /// Ring defaults
    pub const RING_GAP_WIDTH: f32 = 1.2; // radians (~69 degrees)
    pub const RING_THICKNESS: f32 = 4.0;

    /// Field layout
    pub const FIELD_START_RADIUS: f32 = 200.0;
    pub const FIELD_SPACING: f32 = 25.0;
    pub const FIELD_MAX_RADIUS: f32 = 500.0;
    /// Consecutively spawned rings sharing one speed controller
    pub const BATCH_SIZE: u32 = 4;

    /// Rings smaller than ball radius + this margin are popped outright
    pub const AUTO_POP_MARGIN: f32 = 5.0;

    /// Shrink damping near the center
    pub const SHRINK_DAMP_RADIUS: f32 = 50.0;
    pub const SHRINK_DAMP_FACTOR: f32 = 0.8;
    pub const CORE_RADIUS: f32 = 15.0;
    pub const CORE_SHRINK_SPEED: f32 = 0.1;

    /// Max random rotation applied to a bounce (radians, ~10 degrees)
    pub const BOUNCE_DISTORTION: f32 = 0.18;
}

/// Normalize an angle to [0, 2π)
#[inline]
pub fn normalize_angle(angle: f32) -> f32 {
    use std::f32::consts::TAU;
    let wrapped = angle.rem_euclid(TAU);
    // rem_euclid can round up to TAU for tiny negative inputs
    if wrapped >= TAU { 0.0 } else { wrapped }
}

/// Shortest arc between two angles, in [0, π]
#[inline]
pub fn angular_distance(a: f32, b: f32) -> f32 {
    use std::f32::consts::{PI, TAU};
    let diff = (normalize_angle(a) - normalize_angle(b)).abs();
    if diff > PI { TAU - diff } else { diff }
}

/// Convert polar (r, theta) to cartesian (x, y)
#[inline]
pub fn polar_to_cartesian(r: f32, theta: f32) -> Vec2 {
    Vec2::new(r * theta.cos(), r * theta.sin())
}

/// Convert cartesian (x, y) to polar (r, theta), theta in [0, 2π)
#[inline]
pub fn cartesian_to_polar(pos: Vec2) -> (f32, f32) {
    (pos.length(), normalize_angle(pos.y.atan2(pos.x)))
}
