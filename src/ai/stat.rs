use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::id::FactionId;
use crate::model::{Suit, World};

/// A named integer metric read from a faction's live state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum Stat {
    /// Locations owned.
    Territory,
    /// Troops across all units.
    Troops,
    /// Troops across units of one suit.
    SuitTroops(Suit),
}

impl Stat {
    /// Every built-in stat, in registry order.
    pub const ALL: [Stat; 6] = [
        Stat::Territory,
        Stat::Troops,
        Stat::SuitTroops(Suit::Spade),
        Stat::SuitTroops(Suit::Heart),
        Stat::SuitTroops(Suit::Club),
        Stat::SuitTroops(Suit::Diamond),
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Stat::Territory => "territory",
            Stat::Troops => "troops",
            Stat::SuitTroops(Suit::Spade) => "spade_troops",
            Stat::SuitTroops(Suit::Heart) => "heart_troops",
            Stat::SuitTroops(Suit::Club) => "club_troops",
            Stat::SuitTroops(Suit::Diamond) => "diamond_troops",
        }
    }

    /// Read the current value straight from the live world.
    pub fn measure(self, world: &World, faction: FactionId) -> i64 {
        match self {
            Stat::Territory => world.territory(faction),
            Stat::Troops => world.troops(faction),
            Stat::SuitTroops(suit) => world.troops_of_suit(faction, suit),
        }
    }
}

impl std::fmt::Display for Stat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<Stat> for String {
    fn from(stat: Stat) -> Self {
        stat.as_str().to_string()
    }
}

impl TryFrom<String> for Stat {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Stat::ALL
            .into_iter()
            .find(|stat| stat.as_str() == s)
            .ok_or_else(|| format!("unknown Stat: {s}"))
    }
}

/// Per-turn memo of stat reads, keyed by (stat, faction).
///
/// A value read once stays fixed until [`StatCache::clear`], even if the
/// live world changes in between. The turn pipeline clears it on every turn
/// advance.
#[derive(Debug, Clone, Default)]
pub struct StatCache {
    values: HashMap<(Stat, FactionId), i64>,
}

impl StatCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn read(&mut self, stat: Stat, world: &World, faction: FactionId) -> i64 {
        *self
            .values
            .entry((stat, faction))
            .or_insert_with(|| stat.measure(world, faction))
    }

    pub fn clear(&mut self) {
        self.values.clear();
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
