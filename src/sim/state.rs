//! Session state and the read-only snapshot handed to renderers

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::ball::Ball;
use super::batch::BatchSpeedController;
use super::field::RingField;
use crate::consts::*;

/// Current phase of the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Clock running, ball moving
    Playing,
    /// Time budget spent; waiting for a reset
    TimeUp,
}

/// Everything one session owns
#[derive(Debug, Clone)]
pub struct GameState {
    /// Seed the generator was created from
    pub seed: u64,
    pub ball: Ball,
    pub field: RingField,
    pub speeds: BatchSpeedController,
    /// Rings escaped or auto-popped
    pub score: u32,
    /// Ticks simulated since the last reset
    pub time_ticks: u64,
    /// Ticks the session lasts
    pub duration_ticks: u64,
    pub phase: GamePhase,
    /// Source of every random draw in the simulation
    pub rng: Pcg32,
}

impl GameState {
    /// Start a session with the given seed and tick budget
    pub fn new(seed: u64, duration_ticks: u64) -> Self {
        let mut state = Self {
            seed,
            ball: Ball::new(),
            field: RingField::default(),
            speeds: BatchSpeedController::new(),
            score: 0,
            time_ticks: 0,
            duration_ticks,
            phase: GamePhase::Playing,
            rng: Pcg32::seed_from_u64(seed),
        };
        state.field.spawn_initial(FIELD_SPACING, FIELD_MAX_RADIUS, &mut state.rng);
        state
    }

    /// Default-length session
    pub fn with_seed(seed: u64) -> Self {
        Self::new(seed, (SESSION_SECS * TICK_RATE) as u64)
    }

    /// Fresh ball, fresh field, no batch state, clock back to zero.
    ///
    /// The generator keeps running, so a reset is not a replay.
    pub fn reset(&mut self) {
        log::info!("Session reset (previous score {})", self.score);
        self.ball = Ball::new();
        self.field.clear();
        self.field
            .spawn_initial(FIELD_SPACING, FIELD_MAX_RADIUS, &mut self.rng);
        self.speeds.clear();
        self.score = 0;
        self.time_ticks = 0;
        self.phase = GamePhase::Playing;
    }

    pub fn is_active(&self) -> bool {
        self.phase == GamePhase::Playing
    }

    /// Every ring escaped; the ball is free
    pub fn is_cleared(&self) -> bool {
        self.field.is_empty()
    }

    /// Seconds left on the clock
    pub fn time_left_secs(&self) -> f32 {
        let left = self.duration_ticks.saturating_sub(self.time_ticks);
        left as f32 / TICK_RATE as f32
    }

    /// Read-only view for drawing, rings innermost first
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            ball: BallView {
                pos: self.ball.pos,
                radius: self.ball.radius,
                color: self.ball.color,
            },
            rings: self
                .field
                .iter()
                .map(|r| RingView {
                    radius: r.radius,
                    inner_radius: r.inner_radius(),
                    outer_radius: r.outer_radius(),
                    angle: r.angle,
                    solid_arc: r.solid_arc(),
                    gap_width: r.gap_width,
                    thickness: r.thickness,
                    color: r.color,
                })
                .collect(),
            score: self.score,
            time_left_secs: self.time_left_secs(),
            phase: self.phase,
        }
    }
}

/// Ball as seen by a renderer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BallView {
    pub pos: Vec2,
    pub radius: f32,
    pub color: [u8; 3],
}

/// Ring as seen by a renderer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RingView {
    pub radius: f32,
    /// Band edges
    pub inner_radius: f32,
    pub outer_radius: f32,
    pub angle: f32,
    /// Start and end angle of the drawn arc, counter-clockwise
    pub solid_arc: (f32, f32),
    pub gap_width: f32,
    pub thickness: f32,
    pub color: [u8; 3],
}

/// Per-tick picture of the session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub ball: BallView,
    /// Innermost first; draw in reverse for back-to-front layering
    pub rings: Vec<RingView>,
    pub score: u32,
    pub time_left_secs: f32,
    pub phase: GamePhase,
}
