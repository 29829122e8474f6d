//! Fixed-rate simulation tick
//!
//! One call runs the whole pipeline in a fixed order:
//! ball → batch speeds + ring motion → outer spawn → collision.
//! Ring motion finishes before the collision pass, so collisions always see
//! this tick's geometry.

use super::ball::advance;
use super::collision::{CollisionOutcome, EscapeKind, resolve};
use super::state::{GamePhase, GameState};
use crate::settings::Tuning;

/// Inputs for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Current slider values
    pub tuning: Tuning,
    /// Start over before ticking
    pub reset: bool,
}

/// Advance the session by one tick and report what the collision pass did
pub fn tick(state: &mut GameState, input: &TickInput) -> CollisionOutcome {
    if input.reset {
        state.reset();
    }

    if state.phase == GamePhase::TimeUp {
        return CollisionOutcome::None;
    }

    let tuning = &input.tuning;
    state.time_ticks += 1;

    advance(&mut state.ball, tuning.gravity);

    state.field.update(
        &mut state.speeds,
        &mut state.rng,
        tuning.rotation_speed,
        tuning.shrink_speed,
    );
    state.field.maybe_spawn(&mut state.rng);

    let outcome = resolve(
        &mut state.ball,
        &mut state.field,
        tuning.bounce,
        &mut state.rng,
    );
    match outcome {
        CollisionOutcome::Escaped(kind) => {
            state.score += 1;
            match kind {
                EscapeKind::Gap => log::debug!("Escaped through gap, score {}", state.score),
                EscapeKind::AutoPop => log::debug!("Ring auto-popped, score {}", state.score),
            }
            state.speeds.retain_batches(&state.field.live_batches());
            if state.field.is_empty() {
                log::info!("Field cleared at tick {}", state.time_ticks);
            }
        }
        CollisionOutcome::Bounced { penetration } => {
            log::trace!("Bounce, penetration {penetration:.3}");
        }
        CollisionOutcome::None => {}
    }

    if state.time_ticks >= state.duration_ticks {
        state.phase = GamePhase::TimeUp;
        log::info!("Time's up! Final score: {}", state.score);
    }

    outcome
}
