//! Ring Escape headless runner
//!
//! Plays one full session with fixed tuning and prints the final snapshot as JSON.
//!
//! Usage: `ring-escape [settings.json]`

use ring_escape::Settings;
use ring_escape::sim::{GameState, TickInput, tick};

fn main() {
    env_logger::init();
    log::info!("Ring Escape (headless) starting...");

    let settings = match std::env::args().nth(1) {
        Some(path) => Settings::load(path),
        None => Settings::default(),
    };
    let seed = settings.seed.unwrap_or_else(rand::random);
    log::info!("Seed {seed}, {}s session", settings.duration_secs);

    let mut state = GameState::new(seed, settings.duration_ticks());
    let input = TickInput {
        tuning: settings.tuning.clamped(),
        reset: false,
    };

    while state.is_active() {
        tick(&mut state, &input);
    }

    log::info!(
        "Session over: score {}, {} rings left",
        state.score,
        state.field.len()
    );

    match serde_json::to_string_pretty(&state.snapshot()) {
        Ok(json) => println!("{json}"),
        Err(e) => log::error!("Failed to serialize snapshot: {e}"),
    }
}
