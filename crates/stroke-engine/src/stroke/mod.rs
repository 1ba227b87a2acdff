//! Strokes: pivot chains, their growth over the reference and their
//! rasterization into pixel coverage.

mod grower;
mod pivot;
mod rasterizer;

pub use grower::StrokeGrower;
pub use pivot::{Coverage, StrokePivot, StrokePositions};
pub use rasterizer::StrokeRasterizer;
