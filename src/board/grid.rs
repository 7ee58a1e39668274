use std::collections::BTreeMap;

use super::direction::{Coord, Direction, Movement};
use crate::id::{IdGenerator, LocationId};

/// Rectangular grid of locations, one per cell.
///
/// Geometry only: ownership and occupancy live on the
/// [`World`](crate::model::World).
#[derive(Debug, Clone)]
pub struct Board {
    width: i32,
    height: i32,
    wraps: bool,
    movement: Movement,
    /// Row-major, index = `y * width + x`.
    cells: Vec<LocationId>,
    coords: BTreeMap<LocationId, Coord>,
}

impl Board {
    /// Lay out a `width × height` grid, drawing location ids from `ids`.
    ///
    /// # Panics
    /// Panics if either dimension is not positive.
    pub fn new(
        width: i32,
        height: i32,
        wraps: bool,
        movement: Movement,
        ids: &mut IdGenerator,
    ) -> Self {
        assert!(width > 0 && height > 0, "board dimensions must be positive");
        let mut cells = Vec::with_capacity((width * height) as usize);
        let mut coords = BTreeMap::new();
        for y in 0..height {
            for x in 0..width {
                let id = ids.next_location();
                cells.push(id);
                coords.insert(id, Coord::new(x, y));
            }
        }
        Self {
            width,
            height,
            wraps,
            movement,
            cells,
            coords,
        }
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn wraps(&self) -> bool {
        self.wraps
    }

    pub fn movement(&self) -> Movement {
        self.movement
    }

    pub fn locations(&self) -> impl Iterator<Item = LocationId> + '_ {
        self.cells.iter().copied()
    }

    pub fn contains(&self, location: LocationId) -> bool {
        self.coords.contains_key(&location)
    }

    pub fn location_at(&self, coord: Coord) -> Option<LocationId> {
        let (x, y) = if self.wraps {
            (coord.x.rem_euclid(self.width), coord.y.rem_euclid(self.height))
        } else if coord.x < 0 || coord.x >= self.width || coord.y < 0 || coord.y >= self.height {
            return None;
        } else {
            (coord.x, coord.y)
        };
        self.cells.get((y * self.width + x) as usize).copied()
    }

    pub fn coord_of(&self, location: LocationId) -> Option<Coord> {
        self.coords.get(&location).copied()
    }

    /// The location one step from `location` in `direction`, if the board
    /// continues that way. Ignores the movement rule.
    pub fn neighbor(&self, location: LocationId, direction: Direction) -> Option<LocationId> {
        let coord = self.coord_of(location)?;
        self.location_at(coord + direction.vector())
    }

    /// One entry per allowed direction, `None` where the board ends.
    pub fn neighbors_of(&self, location: LocationId) -> Vec<Option<LocationId>> {
        self.movement
            .allowed_directions()
            .iter()
            .map(|&d| self.neighbor(location, d))
            .collect()
    }

    /// The allowed direction leading from `from` straight onto `to`.
    pub fn direction_between(&self, from: LocationId, to: LocationId) -> Option<Direction> {
        if from == to {
            return None;
        }
        self.movement
            .allowed_directions()
            .iter()
            .copied()
            .find(|&d| self.neighbor(from, d) == Some(to))
    }

    pub fn is_adjacent(&self, a: LocationId, b: LocationId) -> bool {
        self.direction_between(a, b).is_some()
    }

    /// Movement heuristic between two locations, honoring wrap-around.
    /// `u32::MAX` when either location is not on this board.
    pub fn heuristic(&self, a: LocationId, b: LocationId) -> u32 {
        match (self.coord_of(a), self.coord_of(b)) {
            (Some(a), Some(b)) => self.coord_heuristic(a, b),
            _ => u32::MAX,
        }
    }

    pub fn coord_heuristic(&self, a: Coord, b: Coord) -> u32 {
        let dx = axis_distance(a.x, b.x, self.width, self.wraps);
        let dy = axis_distance(a.y, b.y, self.height, self.wraps);
        self.movement.heuristic(dx, dy)
    }
}

fn axis_distance(a: i32, b: i32, extent: i32, wraps: bool) -> u32 {
    let direct = a.abs_diff(b);
    if wraps {
        direct.min(extent as u32 - direct)
    } else {
        direct
    }
}
