use std::ops::Add;

use serde::{Deserialize, Serialize};

/// Integer cell coordinates. `y` grows upward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Coord {
    pub x: i32,
    pub y: i32,
}

impl Coord {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl From<(i32, i32)> for Coord {
    fn from((x, y): (i32, i32)) -> Self {
        Self { x, y }
    }
}

impl Add for Coord {
    type Output = Coord;

    fn add(self, rhs: Coord) -> Coord {
        Coord::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl std::fmt::Display for Coord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// One step on the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
    UpLeft,
    UpRight,
    DownLeft,
    DownRight,
}

string_enum!(Direction {
    Up => "up",
    Down => "down",
    Left => "left",
    Right => "right",
    UpLeft => "up_left",
    UpRight => "up_right",
    DownLeft => "down_left",
    DownRight => "down_right",
});

const DIRECTION_VECTORS: [Coord; 8] = [
    Coord::new(0, 1),
    Coord::new(0, -1),
    Coord::new(-1, 0),
    Coord::new(1, 0),
    Coord::new(-1, 1),
    Coord::new(1, 1),
    Coord::new(-1, -1),
    Coord::new(1, -1),
];

/// Facing angle in degrees, used by presentation layers.
const DIRECTION_ANGLES: [f32; 8] = [180.0, 0.0, 90.0, -90.0, 135.0, -135.0, 45.0, -45.0];

impl Direction {
    pub const ALL: [Direction; 8] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
        Direction::UpLeft,
        Direction::UpRight,
        Direction::DownLeft,
        Direction::DownRight,
    ];

    pub fn vector(self) -> Coord {
        DIRECTION_VECTORS[self as usize]
    }

    pub fn angle(self) -> f32 {
        DIRECTION_ANGLES[self as usize]
    }
}

/// The set of directions actionables may step in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum Movement {
    #[default]
    Orthogonal,
    Full,
}

string_enum!(Movement {
    Orthogonal => "orthogonal",
    Full => "full",
});

const ORTHOGONAL_DIRECTIONS: [Direction; 4] = [
    Direction::Up,
    Direction::Down,
    Direction::Left,
    Direction::Right,
];

impl Movement {
    pub fn allowed_directions(self) -> &'static [Direction] {
        match self {
            Movement::Orthogonal => &ORTHOGONAL_DIRECTIONS,
            Movement::Full => &Direction::ALL,
        }
    }

    pub fn default_direction(self) -> Direction {
        self.allowed_directions()[0]
    }

    /// Admissible step estimate for per-axis distances `dx`, `dy` (both
    /// non-negative): Manhattan for orthogonal movement, Chebyshev for full.
    pub fn heuristic(self, dx: u32, dy: u32) -> u32 {
        match self {
            Movement::Orthogonal => dx + dy,
            Movement::Full => dx.max(dy),
        }
    }
}
