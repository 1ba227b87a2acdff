//! Geometry primitives: pixel positions, bounds, direction vectors, lines.
//!
//! Pure math with no state. Everything the rasterizer and the stroke grower
//! need to reason about pixels and directions lives here.

mod line;
mod position;
mod vector;

pub use line::{HalfPlane, LineFunc, HORIZONTAL_SLOPE_EPSILON};
pub use position::{Bounds, Position};
pub use vector::Vector2D;
