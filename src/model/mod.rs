//! The live world the architects act upon.

pub mod actionable;
pub mod notice;
pub mod suit;
pub mod world;

pub use actionable::{Actionable, ActionableKind};
pub use notice::{FactionNotice, RelationsReport};
pub use suit::Suit;
pub use world::{Faction, Location, Produced, Production, STANDARD_PROFILE, Unit, World};
