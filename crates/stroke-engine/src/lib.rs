//! stroke-engine: approximate an image with painted brush strokes
//!
//! The engine repeatedly grows a candidate brush stroke along the local
//! contours of a reference image, paints it onto a canvas and keeps it only
//! if the canvas got closer to the reference. It stops when the remaining
//! error drops to a configured fraction of the starting error.
//!
//! # Quick Start
//!
//! ```
//! use stroke_engine::{Painter, PaintSettings, PixelBuffer, Rgb, RunBudget};
//!
//! let reference = PixelBuffer::from_fn(32, 32, |p| {
//!     Rgb::new((p.x * 8) as u8, (p.y * 8) as u8, 128)
//! })
//! .unwrap();
//!
//! let settings = PaintSettings::new().start_brush_radius(3).seed(1);
//! let mut painter = Painter::new(reference, settings).unwrap();
//! let report = painter.run(&RunBudget::unlimited().max_candidates(50), ()).unwrap();
//!
//! assert!(report.final_error <= report.initial_error);
//! ```
//!
//! # Pipeline
//!
//! One candidate goes through these steps:
//!
//! 1. [`StrokeGrower`] samples random start positions and keeps the one with
//!    the largest nearby [`DifferenceMap`] error.
//! 2. It walks perpendicular to the [`GradientField`], one brush diameter
//!    per step, adapting the radius so each disk stays color coherent.
//! 3. [`StrokeRasterizer`] turns the pivot chain into a [`Coverage`] set.
//! 4. [`Canvas`] paints the coverage as a reversible transaction and the
//!    difference map is updated for the touched pixels only.
//! 5. The [`Painter`] commits if the global error went down and rolls back
//!    otherwise.
//!
//! # Errors
//!
//! Only misuse is an error ([`EngineError`]): mismatched buffer sizes, empty
//! images, out-of-range settings. A stroke that leaves the canvas, meets a
//! flat gradient or fails to improve the canvas is a normal outcome of the
//! search.
//!
//! # Concurrency
//!
//! A painter is single-threaded and owns its canvas. Gradient convolution
//! runs on the rayon thread pool; results do not depend on the number of
//! threads.

pub mod buffer;
pub mod color;
pub mod difference;
pub mod error;
pub mod geometry;
pub mod gradient;
pub mod painter;
pub mod stroke;


pub use buffer::{Canvas, PixelBuffer, StrokeTransaction, Window, WindowShape};
pub use color::{ColorModel, ModelColor, ParseColorError, Rgb};
pub use difference::DifferenceMap;
pub use error::EngineError;
pub use geometry::{Bounds, Position, Vector2D};
pub use gradient::GradientField;
pub use painter::{
    AcceptedStroke, GradientSource, PaintObserver, PaintReport, PaintSettings, Painter, RunBudget, RunOutcome,
    StepOutcome,
};
pub use stroke::{Coverage, StrokeGrower, StrokePivot, StrokePositions, StrokeRasterizer};
