pub mod config;

pub use config::{BrushConfig, BudgetConfig, ColorModelName, GradientConfig, GradientSourceName, PaintConfig, StrokeConfig};
