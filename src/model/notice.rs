use serde::{Deserialize, Serialize};

use crate::id::FactionId;

/// Faction lifecycle notifications queued by world mutations and processed
/// once per turn by [`World::apply_notices`](super::World::apply_notices).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FactionNotice {
    /// A unit of `attacker` damaged a unit of `victim`.
    AttackedBy {
        victim: FactionId,
        attacker: FactionId,
    },

    /// `loser` lost its last location to `victor`.
    DefeatedBy {
        loser: FactionId,
        victor: FactionId,
    },
}

/// What one round of notice processing changed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RelationsReport {
    /// `(victim, attacker)` pairs that became rivals for the first time.
    pub new_rivalries: Vec<(FactionId, FactionId)>,
    /// `(loser, victor)` pairs for factions defeated this round.
    pub defeats: Vec<(FactionId, FactionId)>,
}
