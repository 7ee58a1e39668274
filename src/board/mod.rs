//! Spatial collaborator: grid geometry, movement rules and distances.
//!
//! The planner asks the board how far apart two locations are and which
//! locations neighbor a location. The grid is rectangular and may wrap.

mod direction;
mod distance;
mod grid;

pub use direction::{Coord, Direction, Movement};
pub use distance::Distances;
pub use grid::Board;
