//! Simulation module
//!
//! All gameplay logic lives here:
//! - Fixed tick, unit timestep
//! - Every random draw comes from the session's seeded generator
//! - Rings kept innermost first at all times
//! - No rendering, input or platform dependencies

pub mod ball;
pub mod batch;
pub mod collision;
pub mod field;
pub mod ring;
pub mod state;
pub mod tick;

pub use ball::{Ball, advance};
pub use batch::{BatchMode, BatchSpeedController, BatchState};
pub use collision::{CollisionOutcome, EscapeKind, ball_ring_contact, reflect_velocity, resolve};
pub use field::{RingField, effective_shrink};
pub use ring::Ring;
pub use state::{GamePhase, GameState, Snapshot};
pub use tick::{TickInput, tick};
