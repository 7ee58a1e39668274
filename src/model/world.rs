use std::collections::{BTreeMap, BTreeSet};

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::notice::{FactionNotice, RelationsReport};
use super::suit::Suit;
use crate::ai::combat::{self, Casualties};
use crate::board::{Board, Direction, Movement};
use crate::config::ProductionConfig;
use crate::id::{FactionId, IdGenerator, LocationId, UnitId};

/// Name of the profile every faction uses unless told otherwise.
pub const STANDARD_PROFILE: &str = "standard";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Faction {
    pub id: FactionId,
    pub name: String,
    pub defeated: bool,
    /// Factions that attacked this one and are still in the game.
    pub rivals: BTreeSet<FactionId>,
    /// Key into the registry's profiles.
    pub profile: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Unit {
    pub id: UnitId,
    pub faction: FactionId,
    pub location: LocationId,
    pub suit: Suit,
    pub troops: u32,
    pub facing: Direction,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub id: LocationId,
    pub owner: Option<FactionId>,
    pub occupant: Option<UnitId>,
    pub production: Option<Production>,
}

/// A unit scheduled to appear at a location.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Production {
    pub suit: Suit,
    pub turns_left: u32,
}

/// Result of a production step that finished at a location.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Produced {
    Spawned(UnitId),
    Reinforced(UnitId),
}

/// The live game world: the board plus everything standing on it.
///
/// Queries never mutate. Mutation primitives validate their preconditions and
/// return `false`/`None` when they do not apply instead of failing, since
/// orders routinely target participants that moved or died since planning.
#[derive(Debug, Clone)]
pub struct World {
    pub board: Board,
    pub factions: BTreeMap<FactionId, Faction>,
    pub units: BTreeMap<UnitId, Unit>,
    pub locations: BTreeMap<LocationId, Location>,
    /// Pending lifecycle notices, drained by [`World::apply_notices`].
    pub notices: Vec<FactionNotice>,
    pub id_gen: IdGenerator,
}

impl World {
    pub fn new(width: i32, height: i32, wraps: bool, movement: Movement) -> Self {
        let mut id_gen = IdGenerator::new();
        let board = Board::new(width, height, wraps, movement, &mut id_gen);
        let locations = board
            .locations()
            .map(|id| {
                (
                    id,
                    Location {
                        id,
                        owner: None,
                        occupant: None,
                        production: None,
                    },
                )
            })
            .collect();
        Self {
            board,
            factions: BTreeMap::new(),
            units: BTreeMap::new(),
            locations,
            notices: Vec::new(),
            id_gen,
        }
    }

    // ---------------------------------------------------------------------
    // Setup
    // ---------------------------------------------------------------------

    pub fn add_faction(&mut self, name: &str) -> FactionId {
        self.add_faction_with_profile(name, STANDARD_PROFILE)
    }

    pub fn add_faction_with_profile(&mut self, name: &str, profile: &str) -> FactionId {
        let id = self.id_gen.next_faction();
        self.factions.insert(
            id,
            Faction {
                id,
                name: name.to_string(),
                defeated: false,
                rivals: BTreeSet::new(),
                profile: profile.to_string(),
            },
        );
        id
    }

    /// Assign ownership directly, without claim side effects.
    ///
    /// # Panics
    /// Panics if `location` is not on the board.
    pub fn set_owner(&mut self, location: LocationId, owner: Option<FactionId>) {
        let loc = self
            .locations
            .get_mut(&location)
            .unwrap_or_else(|| panic!("set_owner: {location} not found"));
        loc.owner = owner;
    }

    /// Place a new unit. `None` when the location is off the board or occupied.
    pub fn spawn_unit(
        &mut self,
        faction: FactionId,
        location: LocationId,
        suit: Suit,
        troops: u32,
    ) -> Option<UnitId> {
        let facing = self.board.movement().default_direction();
        let loc = self.locations.get_mut(&location)?;
        if loc.occupant.is_some() {
            return None;
        }
        let id = self.id_gen.next_unit();
        loc.occupant = Some(id);
        self.units.insert(
            id,
            Unit {
                id,
                faction,
                location,
                suit,
                troops,
                facing,
            },
        );
        Some(id)
    }

    // ---------------------------------------------------------------------
    // Queries
    // ---------------------------------------------------------------------

    pub fn owner_of(&self, location: LocationId) -> Option<FactionId> {
        self.locations.get(&location).and_then(|l| l.owner)
    }

    pub fn occupant_of(&self, location: LocationId) -> Option<UnitId> {
        self.locations.get(&location).and_then(|l| l.occupant)
    }

    pub fn is_defeated(&self, faction: FactionId) -> bool {
        self.factions.get(&faction).is_none_or(|f| f.defeated)
    }

    /// Factions still in the game, in id order.
    pub fn live_factions(&self) -> impl Iterator<Item = FactionId> + '_ {
        self.factions.values().filter(|f| !f.defeated).map(|f| f.id)
    }

    pub fn owned_locations(&self, faction: FactionId) -> impl Iterator<Item = LocationId> + '_ {
        self.locations
            .values()
            .filter(move |l| l.owner == Some(faction))
            .map(|l| l.id)
    }

    pub fn units_of(&self, faction: FactionId) -> impl Iterator<Item = &Unit> + '_ {
        self.units.values().filter(move |u| u.faction == faction)
    }

    pub fn territory(&self, faction: FactionId) -> i64 {
        self.owned_locations(faction).count() as i64
    }

    pub fn troops(&self, faction: FactionId) -> i64 {
        self.units_of(faction).map(|u| i64::from(u.troops)).sum()
    }

    pub fn troops_of_suit(&self, faction: FactionId, suit: Suit) -> i64 {
        self.units_of(faction)
            .filter(|u| u.suit == suit)
            .map(|u| i64::from(u.troops))
            .sum()
    }

    /// Units matching `predicate`, nearest first by movement heuristic from
    /// `origin` (ties broken by id), padded with `None` up to `count`.
    pub fn nearest_units<F>(
        &self,
        origin: LocationId,
        predicate: F,
        count: usize,
    ) -> Vec<Option<UnitId>>
    where
        F: Fn(&Unit) -> bool,
    {
        let mut matches: Vec<(u32, UnitId)> = self
            .units
            .values()
            .filter(|u| predicate(*u))
            .map(|u| (self.board.heuristic(origin, u.location), u.id))
            .collect();
        matches.sort_unstable();
        let mut nearest: Vec<Option<UnitId>> =
            matches.into_iter().take(count).map(|(_, id)| Some(id)).collect();
        nearest.resize(count, None);
        nearest
    }

    fn neighbor_occupant(&self, unit: &Unit, direction: Direction) -> Option<(LocationId, Option<UnitId>)> {
        let target = self.board.neighbor(unit.location, direction)?;
        Some((target, self.occupant_of(target)))
    }

    // ---------------------------------------------------------------------
    // Mutation primitives
    // ---------------------------------------------------------------------

    /// Step into the neighboring cell if it exists and is empty. Facing turns
    /// toward `direction` either way.
    pub fn move_unit(&mut self, unit: UnitId, direction: Direction) -> bool {
        let Some(u) = self.units.get_mut(&unit) else {
            return false;
        };
        u.facing = direction;
        let from = u.location;
        let Some(to) = self.board.neighbor(from, direction) else {
            return false;
        };
        if self.occupant_of(to).is_some() {
            return false;
        }
        if let Some(u) = self.units.get_mut(&unit) {
            u.location = to;
        }
        if let Some(loc) = self.locations.get_mut(&from) {
            loc.occupant = None;
        }
        if let Some(loc) = self.locations.get_mut(&to) {
            loc.occupant = Some(unit);
        }
        true
    }

    /// Fight the hostile unit in the neighboring cell. Both sides lose troops
    /// per the combat table; units left with no troops are destroyed and the
    /// defender's faction is notified of the attack.
    pub fn attack(&mut self, unit: UnitId, direction: Direction) -> Option<Casualties> {
        let attacker = self.units.get_mut(&unit)?;
        attacker.facing = direction;
        let attacker = attacker.clone();
        let (_, occupant) = self.neighbor_occupant(&attacker, direction)?;
        let defender = self.units.get(&occupant?)?.clone();
        if defender.faction == attacker.faction {
            return None;
        }

        let casualties = combat::resolve(Some(attacker.suit), defender.suit);
        self.notices.push(FactionNotice::AttackedBy {
            victim: defender.faction,
            attacker: attacker.faction,
        });
        self.wound(defender.id, casualties.defender);
        self.wound(attacker.id, casualties.attacker);
        Some(casualties)
    }

    fn wound(&mut self, unit: UnitId, losses: u32) {
        let Some(u) = self.units.get_mut(&unit) else {
            return;
        };
        u.troops = u.troops.saturating_sub(losses);
        if u.troops == 0 {
            self.destroy_unit(unit);
        }
    }

    /// Pour this unit's troops into the friendly unit next to it.
    pub fn merge(&mut self, unit: UnitId, direction: Direction) -> bool {
        let Some(source) = self.units.get(&unit).cloned() else {
            return false;
        };
        let Some((_, Some(other))) = self.neighbor_occupant(&source, direction) else {
            return false;
        };
        match self.units.get_mut(&other) {
            Some(target) if target.faction == source.faction => {
                target.troops += source.troops;
            }
            _ => return false,
        }
        self.destroy_unit(unit);
        true
    }

    /// Move half of this unit's troops into a new unit on the empty
    /// neighboring cell.
    pub fn split(&mut self, unit: UnitId, direction: Direction) -> Option<UnitId> {
        let source = self.units.get(&unit)?.clone();
        let half = source.troops / 2;
        if half == 0 {
            return None;
        }
        let (target, occupant) = self.neighbor_occupant(&source, direction)?;
        if occupant.is_some() {
            return None;
        }
        let spawned = self.spawn_unit(source.faction, target, source.suit, half)?;
        if let Some(u) = self.units.get_mut(&unit) {
            u.troops -= half;
        }
        if let Some(u) = self.units.get_mut(&spawned) {
            u.facing = direction;
        }
        Some(spawned)
    }

    /// Take the location under this unit for the unit's faction. Queues a
    /// defeat notice when the previous owner is left with no territory.
    pub fn claim(&mut self, unit: UnitId) -> bool {
        let Some(u) = self.units.get(&unit) else {
            return false;
        };
        let (claimer, location) = (u.faction, u.location);
        let Some(loc) = self.locations.get_mut(&location) else {
            return false;
        };
        let previous = loc.owner;
        if previous == Some(claimer) {
            return false;
        }
        loc.owner = Some(claimer);
        loc.production = None;

        if let Some(loser) = previous
            && self.territory(loser) == 0
        {
            self.notices.push(FactionNotice::DefeatedBy {
                loser,
                victor: claimer,
            });
        }
        true
    }

    /// Queue a unit at `location`. A random suit may replace the requested
    /// one. Returns the suit actually scheduled, `None` if production is
    /// already pending or the location is not on the board.
    pub fn schedule_production<R: Rng>(
        &mut self,
        location: LocationId,
        suit: Suit,
        rng: &mut R,
        config: &ProductionConfig,
    ) -> Option<Suit> {
        let loc = self.locations.get_mut(&location)?;
        if loc.production.is_some() {
            return None;
        }
        let suit = if config.variance > 0.0 && rng.random_bool(config.variance) {
            Suit::from_index(rng.random_range(0..Suit::ALL.len()))
        } else {
            suit
        };
        loc.production = Some(Production {
            suit,
            turns_left: config.turns,
        });
        Some(suit)
    }

    /// Count down every pending production by one turn and deliver the ones
    /// that finish. Production stalls while a foreign unit, or a unit of a
    /// different suit, stands on the site.
    pub fn advance_production(&mut self, config: &ProductionConfig) -> Vec<(LocationId, Produced)> {
        let pending: Vec<LocationId> = self
            .locations
            .values()
            .filter(|l| l.production.is_some())
            .map(|l| l.id)
            .collect();

        let mut finished = Vec::new();
        for location in pending {
            let Some(loc) = self.locations.get(&location) else {
                continue;
            };
            let (Some(owner), Some(production)) = (loc.owner, loc.production) else {
                continue;
            };
            let occupant = loc.occupant.and_then(|id| self.units.get(&id));
            if occupant.is_some_and(|u| u.faction != owner || u.suit != production.suit) {
                continue;
            }
            let occupant = occupant.map(|u| u.id);

            let turns_left = production.turns_left.saturating_sub(1);
            if turns_left > 0 {
                if let Some(loc) = self.locations.get_mut(&location) {
                    loc.production = Some(Production {
                        turns_left,
                        ..production
                    });
                }
                continue;
            }

            if let Some(loc) = self.locations.get_mut(&location) {
                loc.production = None;
            }
            let produced = match occupant {
                Some(id) => {
                    if let Some(u) = self.units.get_mut(&id) {
                        u.troops += config.troops;
                    }
                    Some(Produced::Reinforced(id))
                }
                None => self
                    .spawn_unit(owner, location, production.suit, config.troops)
                    .map(Produced::Spawned),
            };
            if let Some(produced) = produced {
                tracing::info!(%location, suit = %production.suit, ?produced, "production finished");
                finished.push((location, produced));
            }
        }
        finished
    }

    pub fn destroy_unit(&mut self, unit: UnitId) -> Option<Unit> {
        let removed = self.units.remove(&unit)?;
        if let Some(loc) = self.locations.get_mut(&removed.location)
            && loc.occupant == Some(unit)
        {
            loc.occupant = None;
        }
        Some(removed)
    }

    // ---------------------------------------------------------------------
    // Faction relationships
    // ---------------------------------------------------------------------

    /// Drain the notice queue, updating rival sets and defeats.
    pub fn apply_notices(&mut self) -> RelationsReport {
        let mut report = RelationsReport::default();
        for notice in std::mem::take(&mut self.notices) {
            match notice {
                FactionNotice::AttackedBy { victim, attacker } => {
                    if victim == attacker || self.is_defeated(attacker) {
                        continue;
                    }
                    let Some(faction) = self.factions.get_mut(&victim) else {
                        continue;
                    };
                    if !faction.defeated && faction.rivals.insert(attacker) {
                        report.new_rivalries.push((victim, attacker));
                    }
                }
                FactionNotice::DefeatedBy { loser, victor } => {
                    if self.is_defeated(loser) {
                        continue;
                    }
                    self.defeat(loser, victor);
                    report.defeats.push((loser, victor));
                }
            }
        }
        report
    }

    fn defeat(&mut self, loser: FactionId, victor: FactionId) {
        if let Some(faction) = self.factions.get_mut(&loser) {
            faction.defeated = true;
            faction.rivals.clear();
        }
        for unit in self.units.values_mut().filter(|u| u.faction == loser) {
            unit.faction = victor;
        }
        for faction in self.factions.values_mut() {
            faction.rivals.remove(&loser);
        }
        tracing::info!(%loser, %victor, "faction defeated");
    }
}
