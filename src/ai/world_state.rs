use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use super::stat::{Stat, StatCache};
use crate::error::AiError;
use crate::id::{FactionId, LocationId, UnitId};
use crate::model::World;

/// A value snapshot of the world used for risk-free exploration.
///
/// Every map is owned, so `clone()` is a deep copy and mutating a clone never
/// touches the original. Position and claim maps are public so consequence
/// functions can write projected changes directly.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WorldState {
    factions: BTreeMap<FactionId, BTreeMap<Stat, i64>>,
    pub unit_positions: BTreeMap<UnitId, LocationId>,
    pub location_claims: BTreeMap<LocationId, Option<FactionId>>,
    pub faction_claims: BTreeMap<FactionId, BTreeSet<LocationId>>,
}

impl WorldState {
    /// Build a snapshot of `world`, reading every stat through `cache`.
    pub fn capture(world: &World, stats: &[Stat], cache: &mut StatCache) -> Self {
        let factions = world
            .factions
            .keys()
            .map(|&faction| {
                let values = stats
                    .iter()
                    .map(|&stat| (stat, cache.read(stat, world, faction)))
                    .collect();
                (faction, values)
            })
            .collect();

        let unit_positions = world.units.values().map(|u| (u.id, u.location)).collect();

        let mut location_claims = BTreeMap::new();
        let mut faction_claims: BTreeMap<FactionId, BTreeSet<LocationId>> = world
            .factions
            .keys()
            .map(|&f| (f, BTreeSet::new()))
            .collect();
        for loc in world.locations.values() {
            location_claims.insert(loc.id, loc.owner);
            if let Some(owner) = loc.owner {
                faction_claims.entry(owner).or_default().insert(loc.id);
            }
        }

        Self {
            factions,
            unit_positions,
            location_claims,
            faction_claims,
        }
    }

    pub fn factions(&self) -> impl Iterator<Item = FactionId> + '_ {
        self.factions.keys().copied()
    }

    pub fn contains(&self, faction: FactionId) -> bool {
        self.factions.contains_key(&faction)
    }

    pub fn stats(&self, faction: FactionId) -> Result<&BTreeMap<Stat, i64>, AiError> {
        self.factions
            .get(&faction)
            .ok_or(AiError::UnknownFaction(faction))
    }

    /// A stat value for a known faction. Stats the snapshot did not capture
    /// read as zero.
    pub fn stat(&self, faction: FactionId, stat: Stat) -> Result<i64, AiError> {
        Ok(self.stats(faction)?.get(&stat).copied().unwrap_or(0))
    }

    pub fn set_stat(&mut self, faction: FactionId, stat: Stat, value: i64) -> Result<(), AiError> {
        self.factions
            .get_mut(&faction)
            .ok_or(AiError::UnknownFaction(faction))?
            .insert(stat, value);
        Ok(())
    }

    /// Add `delta` to a stat, flooring the result at zero.
    pub fn adjust(&mut self, faction: FactionId, stat: Stat, delta: i64) -> Result<(), AiError> {
        let value = self.stat(faction, stat)?;
        self.set_stat(faction, stat, (value + delta).max(0))
    }

    pub fn owner_of(&self, location: LocationId) -> Option<FactionId> {
        self.location_claims.get(&location).copied().flatten()
    }

    /// Record a projected change of ownership in both claim maps.
    pub fn record_claim(&mut self, location: LocationId, faction: FactionId) {
        if let Some(previous) = self.owner_of(location)
            && let Some(claims) = self.faction_claims.get_mut(&previous)
        {
            claims.remove(&location);
        }
        self.location_claims.insert(location, Some(faction));
        self.faction_claims.entry(faction).or_default().insert(location);
    }
}

/// The snapshot shared by every faction planning within one turn.
#[derive(Debug, Default)]
pub struct SnapshotCache {
    current: Option<WorldState>,
}

impl SnapshotCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// The turn's snapshot, captured from `world` on first use after an
    /// invalidation. Callers only ever get a shared reference.
    pub fn current(&mut self, world: &World, stats: &[Stat], cache: &mut StatCache) -> &WorldState {
        self.current
            .get_or_insert_with(|| WorldState::capture(world, stats, cache))
    }

    pub fn invalidate(&mut self) {
        self.current = None;
    }

    pub fn is_stale(&self) -> bool {
        self.current.is_none()
    }
}
