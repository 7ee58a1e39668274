#[macro_use]
mod macros;

pub mod ai;
pub mod board;
pub mod config;
pub mod ecs;
pub mod error;
pub mod id;
pub mod model;
pub mod scenario;

pub use ai::{Action, Architect, Order, Profile, Registry, Stat, WorldState};
pub use config::SimConfig;
pub use error::{AiError, ConfigError};
pub use id::{FactionId, IdGenerator, LocationId, UnitId};
pub use model::{Actionable, Suit, World};
