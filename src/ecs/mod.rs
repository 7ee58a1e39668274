//! Turn pipeline on a headless Bevy app.

pub mod app;
pub mod clock;
pub mod conditions;
pub mod resources;
pub mod schedule;
pub mod systems;

pub use app::{build_sim_app, build_sim_app_with_registry, run_turns, step};
pub use clock::TurnClock;
pub use resources::{Architects, Halted, LiveWorld, Rules, SimRng, TurnCaches, TurnSummary};
pub use schedule::{TurnPhase, TurnTick, configure_turn_schedule};
