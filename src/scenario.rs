use crate::board::{Coord, Movement};
use crate::id::{FactionId, LocationId, UnitId};
use crate::model::{Faction, STANDARD_PROFILE, Suit, Unit, World};

/// Troops given to units placed without an explicit count.
pub const DEFAULT_TROOPS: u32 = 10;

/// Fluent builder for constructing World state.
///
/// Coordinates are plain `(x, y)` pairs. Placement helpers panic on misuse
/// (off-board cells, double occupancy) since scenarios are fixed setups, not
/// runtime input.
pub struct Scenario {
    world: World,
}

impl Scenario {
    /// A bounded board with orthogonal movement.
    pub fn new(width: i32, height: i32) -> Self {
        Self::with_board(width, height, false, Movement::Orthogonal)
    }

    pub fn with_board(width: i32, height: i32, wraps: bool, movement: Movement) -> Self {
        Self {
            world: World::new(width, height, wraps, movement),
        }
    }

    /// Four factions, one per corner, each owning its corner cell and the two
    /// cells beside it, with one unit per faction standing on the corner.
    /// Suits run Spade, Heart, Club, Diamond in faction order.
    ///
    /// # Panics
    /// Panics if the board is smaller than 4x4.
    pub fn corners(width: i32, height: i32) -> Self {
        assert!(
            width >= 4 && height >= 4,
            "corners scenario needs at least a 4x4 board"
        );
        let mut s = Self::new(width, height);
        let (w, h) = (width - 1, height - 1);
        let corners = [
            ("North", (0, h), (1, 0), (0, -1)),
            ("East", (w, h), (-1, 0), (0, -1)),
            ("South", (w, 0), (-1, 0), (0, 1)),
            ("West", (0, 0), (1, 0), (0, 1)),
        ];
        for (i, (name, (x, y), (dx, _), (_, dy))) in corners.into_iter().enumerate() {
            let faction = s.add_faction(name);
            s.claim(faction, x, y);
            s.claim(faction, x + dx, y);
            s.claim(faction, x, y + dy);
            s.add_unit(faction, x, y, Suit::from_index(i));
        }
        s
    }

    // -- Factions --

    /// Add a faction running the standard profile.
    pub fn add_faction(&mut self, name: &str) -> FactionId {
        self.world.add_faction(name)
    }

    /// Add a faction, customizing it via closure (profile, rivals, ...).
    pub fn add_faction_with(&mut self, name: &str, modify: impl FnOnce(&mut Faction)) -> FactionId {
        let id = self.world.add_faction_with_profile(name, STANDARD_PROFILE);
        if let Some(faction) = self.world.factions.get_mut(&id) {
            modify(faction);
        }
        id
    }

    /// Record mutual rivalry, as if each had attacked the other.
    pub fn make_rivals(&mut self, a: FactionId, b: FactionId) {
        for (of, rival) in [(a, b), (b, a)] {
            self.world
                .factions
                .get_mut(&of)
                .unwrap_or_else(|| panic!("make_rivals: {of} not found"))
                .rivals
                .insert(rival);
        }
    }

    // -- Territory --

    /// The location at `(x, y)`.
    ///
    /// # Panics
    /// Panics if the cell is off the board.
    pub fn location(&self, x: i32, y: i32) -> LocationId {
        self.world
            .board
            .location_at(Coord::new(x, y))
            .unwrap_or_else(|| panic!("no location at ({x}, {y})"))
    }

    /// Give the cell at `(x, y)` to `faction`.
    pub fn claim(&mut self, faction: FactionId, x: i32, y: i32) -> LocationId {
        let location = self.location(x, y);
        self.world.set_owner(location, Some(faction));
        location
    }

    /// Give every cell of the inclusive rectangle to `faction`.
    pub fn claim_rect(&mut self, faction: FactionId, from: (i32, i32), to: (i32, i32)) {
        for x in from.0.min(to.0)..=from.0.max(to.0) {
            for y in from.1.min(to.1)..=from.1.max(to.1) {
                self.claim(faction, x, y);
            }
        }
    }

    // -- Units --

    /// Place a unit with [`DEFAULT_TROOPS`].
    pub fn add_unit(&mut self, faction: FactionId, x: i32, y: i32, suit: Suit) -> UnitId {
        self.add_unit_with(faction, x, y, suit, |_| {})
    }

    /// Place a unit, customizing it via closure (troops, facing).
    ///
    /// # Panics
    /// Panics if the cell is off the board or already occupied.
    pub fn add_unit_with(
        &mut self,
        faction: FactionId,
        x: i32,
        y: i32,
        suit: Suit,
        modify: impl FnOnce(&mut Unit),
    ) -> UnitId {
        let location = self.location(x, y);
        let id = self
            .world
            .spawn_unit(faction, location, suit, DEFAULT_TROOPS)
            .unwrap_or_else(|| panic!("cell ({x}, {y}) is already occupied"));
        if let Some(unit) = self.world.units.get_mut(&id) {
            modify(unit);
        }
        id
    }

    // -- Accessors --

    pub fn world(&self) -> &World {
        &self.world
    }

    /// Escape hatch for setup the builder does not cover.
    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    pub fn build(self) -> World {
        self.world
    }
}
