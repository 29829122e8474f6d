//! Tunable parameters and session settings
//!
//! Loaded from a JSON file when one is given; anything missing falls back to defaults.

use std::ops::RangeInclusive;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::{SESSION_SECS, TICK_RATE};

/// Slider ranges, as exposed by the input layer
pub const GRAVITY_RANGE: RangeInclusive<f32> = 0.0..=0.5;
pub const ROTATION_SPEED_RANGE: RangeInclusive<f32> = 0.0..=0.1;
pub const SHRINK_SPEED_RANGE: RangeInclusive<f32> = 0.0..=2.0;
pub const BOUNCE_RANGE: RangeInclusive<f32> = 0.5..=1.5;

/// Per-tick physics knobs
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Downward acceleration per tick
    pub gravity: f32,
    /// Base ring rotation (radians per tick) before batch multipliers
    pub rotation_speed: f32,
    /// Base ring shrink (units per tick) before center damping
    pub shrink_speed: f32,
    /// Speed multiplier applied on every bounce
    pub bounce: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            gravity: 0.15,
            rotation_speed: 0.02,
            shrink_speed: 0.60,
            bounce: 1.05,
        }
    }
}

impl Tuning {
    /// Clamp every knob into its slider range
    pub fn clamped(self) -> Self {
        fn clamp(v: f32, range: &RangeInclusive<f32>) -> f32 {
            if v.is_nan() {
                *range.start()
            } else {
                v.clamp(*range.start(), *range.end())
            }
        }
        Self {
            gravity: clamp(self.gravity, &GRAVITY_RANGE),
            rotation_speed: clamp(self.rotation_speed, &ROTATION_SPEED_RANGE),
            shrink_speed: clamp(self.shrink_speed, &SHRINK_SPEED_RANGE),
            bounce: clamp(self.bounce, &BOUNCE_RANGE),
        }
    }
}

/// Session settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub tuning: Tuning,
    /// Session length in seconds
    pub duration_secs: u32,
    /// Fixed seed; a random one is picked when absent
    pub seed: Option<u64>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            tuning: Tuning::default(),
            duration_secs: SESSION_SECS,
            seed: None,
        }
    }
}

impl Settings {
    /// Session length in ticks
    pub fn duration_ticks(&self) -> u64 {
        self.duration_secs as u64 * TICK_RATE as u64
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Load settings from a JSON file, falling back to defaults
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        let json = match std::fs::read_to_string(path) {
            Ok(json) => json,
            Err(e) => {
                log::warn!("Can't read settings {}: {e}; using defaults", path.display());
                return Self::default();
            }
        };

        match Self::from_json(&json) {
            Ok(settings) => {
                log::info!("Loaded settings from {}", path.display());
                settings
            }
            Err(e) => {
                log::warn!("Bad settings in {}: {e}; using defaults", path.display());
                Self::default()
            }
        }
    }
}
