use serde::{Deserialize, Serialize};

use super::world::World;
use crate::board::Distances;
use crate::id::{FactionId, LocationId, UnitId};

/// Anything that can be the subject or target of an action or order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum Actionable {
    Unit(UnitId),
    Location(LocationId),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionableKind {
    Unit,
    Location,
}

impl From<UnitId> for Actionable {
    fn from(id: UnitId) -> Self {
        Actionable::Unit(id)
    }
}

impl From<LocationId> for Actionable {
    fn from(id: LocationId) -> Self {
        Actionable::Location(id)
    }
}

impl std::fmt::Display for Actionable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Actionable::Unit(id) => write!(f, "{id}"),
            Actionable::Location(id) => write!(f, "{id}"),
        }
    }
}

impl Actionable {
    pub fn kind(self) -> ActionableKind {
        match self {
            Actionable::Unit(_) => ActionableKind::Unit,
            Actionable::Location(_) => ActionableKind::Location,
        }
    }

    pub fn as_unit(self) -> Option<UnitId> {
        match self {
            Actionable::Unit(id) => Some(id),
            Actionable::Location(_) => None,
        }
    }

    pub fn as_location(self) -> Option<LocationId> {
        match self {
            Actionable::Location(id) => Some(id),
            Actionable::Unit(_) => None,
        }
    }

    /// The location this actionable stands on: a unit's current cell, or the
    /// location itself. `None` for a unit that no longer exists.
    pub fn location(self, world: &World) -> Option<LocationId> {
        match self {
            Actionable::Unit(id) => world.units.get(&id).map(|u| u.location),
            Actionable::Location(id) => world.locations.contains_key(&id).then_some(id),
        }
    }

    /// A unit's faction, or a location's owner.
    pub fn faction(self, world: &World) -> Option<FactionId> {
        match self {
            Actionable::Unit(id) => world.units.get(&id).map(|u| u.faction),
            Actionable::Location(id) => world.owner_of(id),
        }
    }

    pub fn exists(self, world: &World) -> bool {
        self.location(world).is_some()
    }

    pub fn is_adjacent_to(self, other: Actionable, world: &World) -> bool {
        match (self.location(world), other.location(world)) {
            (Some(a), Some(b)) => world.board.is_adjacent(a, b),
            _ => false,
        }
    }

    pub fn distance_to(
        self,
        other: Actionable,
        world: &World,
        distances: &mut Distances,
    ) -> Option<u32> {
        let from = self.location(world)?;
        let to = other.location(world)?;
        distances.between(&world.board, from, to)
    }
}
