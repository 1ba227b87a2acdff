//! Test fixtures and constants.

use brushwork::models::PaintConfig;
use brushwork::services::{reference, Pattern};
use stroke_engine::{PixelBuffer, Rgb};

/// Image sizes small enough to paint to convergence in a test
pub mod sizes {
    pub const SMALL: (usize, usize) = (24, 24);
    pub const MEDIUM: (usize, usize) = (48, 32);
}

/// Seeds used across tests
pub mod seeds {
    pub const STROKES: u64 = 7;
    pub const PATTERN: u64 = 3;
}

/// YAML documents for config loading tests
pub mod yaml {
    /// Small brush, fixed seed, capped run
    pub const FAST: &str = r#"
brush:
  start_radius: 2
stroke:
  start_candidates: 10
budget:
  max_candidates: 400
seed: 7
"#;

    /// Gradient rebuilt every few accepted strokes
    pub const RECOMPUTE: &str = r#"
brush:
  start_radius: 3
gradient:
  source: reference
  recompute_every: 5
budget:
  max_candidates: 300
seed: 11
"#;

    pub const BAD_BACKGROUND: &str = "background: \"#12345\"\n";

    pub const BAD_RADIUS: &str = "brush:\n  start_radius: 0\n";
}

/// Render a pattern at the given size with the shared pattern seed
pub fn pattern(pattern: Pattern, (width, height): (usize, usize)) -> PixelBuffer<Rgb> {
    reference::render(pattern, width, height, seeds::PATTERN).unwrap()
}

/// Small-brush configuration with a fixed seed and a candidate cap
pub fn fast_config() -> PaintConfig {
    PaintConfig::from_yaml_str(yaml::FAST).unwrap()
}
