//! Driving loop: settings, the painter state machine and run observation.

mod observer;
#[allow(clippy::module_inception)]
mod painter;
mod settings;

pub use observer::{AcceptedStroke, PaintObserver, PaintReport, RunBudget, RunOutcome, StepOutcome};
pub use painter::Painter;
pub use settings::{GradientSource, PaintSettings};
