//! The decision core: stats, snapshots, actions, orders, profiles and the
//! per-faction planner.

pub mod action;
pub mod combat;
pub mod order;
pub mod planner;
pub mod profile;
pub mod registry;
pub mod stat;
pub mod world_state;

pub use action::{Action, ActionInfo};
pub use combat::Casualties;
pub use order::{ExecContext, Order};
pub use planner::{Architect, PlanContext, PlanUnit, RankedAction, TurnReport, create_plan};
pub use profile::{OrderRule, OrderUtility, Profile, StatRule};
pub use registry::Registry;
pub use stat::{Stat, StatCache};
pub use world_state::{SnapshotCache, WorldState};
