use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap, HashSet};

use super::grid::Board;
use crate::id::LocationId;

/// Per-destination distance fields, filled lazily by A* search.
///
/// A field maps every cell settled while searching toward its destination to
/// that cell's exact step count, so later queries toward the same destination
/// are usually answered without searching. Fields are keyed by location, not
/// by actionable: an actionable that moved is looked up under its new
/// location. The turn pipeline clears everything once per turn.
#[derive(Debug, Clone, Default)]
pub struct Distances {
    fields: HashMap<LocationId, HashMap<LocationId, u32>>,
    searches: u64,
}

impl Distances {
    pub fn new() -> Self {
        Self::default()
    }

    /// Shortest path length in steps from `from` to `to` under the board's
    /// movement rule. Occupancy is ignored. `None` when unreachable or when
    /// either location is not on the board.
    pub fn between(&mut self, board: &Board, from: LocationId, to: LocationId) -> Option<u32> {
        if !board.contains(from) || !board.contains(to) {
            return None;
        }
        if from == to {
            return Some(0);
        }
        if let Some(&known) = self.fields.get(&to).and_then(|field| field.get(&from)) {
            return Some(known);
        }
        self.searches += 1;
        let field = self.fields.entry(to).or_default();
        spread_from(board, to, from, field)
    }

    /// Drop the field for one destination.
    pub fn forget(&mut self, destination: LocationId) {
        self.fields.remove(&destination);
    }

    pub fn clear(&mut self) {
        self.fields.clear();
    }

    /// Number of searches run since construction. Cache hits do not count.
    pub fn searches(&self) -> u64 {
        self.searches
    }
}

#[derive(Copy, Clone, Eq, PartialEq)]
struct Frontier {
    location: LocationId,
    cost: u32,
    priority: u32,
}

// Min-heap on priority, then on cost.
impl Ord for Frontier {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .priority
            .cmp(&self.priority)
            .then_with(|| other.cost.cmp(&self.cost))
            .then_with(|| other.location.cmp(&self.location))
    }
}

impl PartialOrd for Frontier {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// A* from `origin` toward `goal`, recording each settled cell's cost in
/// `field`. The grid heuristics are consistent for unit step costs, so a
/// settled cost is exact.
fn spread_from(
    board: &Board,
    origin: LocationId,
    goal: LocationId,
    field: &mut HashMap<LocationId, u32>,
) -> Option<u32> {
    let mut open = BinaryHeap::new();
    let mut best: HashMap<LocationId, u32> = HashMap::new();
    let mut settled: HashSet<LocationId> = HashSet::new();

    best.insert(origin, 0);
    open.push(Frontier {
        location: origin,
        cost: 0,
        priority: board.heuristic(origin, goal),
    });

    while let Some(Frontier { location, cost, .. }) = open.pop() {
        if !settled.insert(location) {
            continue;
        }
        field.insert(location, cost);
        if location == goal {
            return Some(cost);
        }

        for neighbor in board.neighbors_of(location).into_iter().flatten() {
            if settled.contains(&neighbor) {
                continue;
            }
            let tentative = cost + 1;
            if tentative < best.get(&neighbor).copied().unwrap_or(u32::MAX) {
                best.insert(neighbor, tentative);
                open.push(Frontier {
                    location: neighbor,
                    cost: tentative,
                    priority: tentative.saturating_add(board.heuristic(neighbor, goal)),
                });
            }
        }
    }

    None
}
