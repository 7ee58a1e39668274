/// Monotonic ID generator shared across factions, units and locations.
/// Guarantees globally unique IDs: no two objects of any kind share an ID.
#[derive(Debug, Clone)]
pub struct IdGenerator {
    next: u64,
}

impl IdGenerator {
    pub fn new() -> Self {
        Self { next: 1 }
    }

    pub fn starting_from(start: u64) -> Self {
        Self { next: start }
    }

    pub fn next_id(&mut self) -> u64 {
        let id = self.next;
        self.next += 1;
        id
    }

    pub fn next_faction(&mut self) -> FactionId {
        FactionId(self.next_id())
    }

    pub fn next_unit(&mut self) -> UnitId {
        UnitId(self.next_id())
    }

    pub fn next_location(&mut self) -> LocationId {
        LocationId(self.next_id())
    }
}

impl Default for IdGenerator {
    fn default() -> Self {
        Self::new()
    }
}

id_type!(
    /// A decision-making party owning territory and units.
    FactionId,
    "faction"
);

id_type!(
    /// A mobile troop stack.
    UnitId,
    "unit"
);

id_type!(
    /// A claimable board cell.
    LocationId,
    "location"
);
