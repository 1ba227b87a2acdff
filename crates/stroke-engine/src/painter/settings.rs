//! Paint run configuration.
//!
//! This module provides [`PaintSettings`], the knobs for stroke growth,
//! acceptance and the stop condition of one painting run.

use crate::color::{ColorModel, Rgb};
use crate::error::EngineError;

/// Image the gradient field is computed from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GradientSource {
    /// Follow the contours of the reference image.
    #[default]
    Reference,
    /// Follow the contours of the canvas as painted so far.
    Canvas,
}

/// Configuration for one painting run.
///
/// # Defaults
///
/// - Start brush radius: 6 px
/// - Brush color tolerance: 1.5x the first radius error
/// - Stroke color tolerance: 1.3x the start pivot error
/// - Radius change per step: ±20%
/// - Maximum bend: 60°
/// - Length to width ratio: 153/115 to 467/45
/// - Stop at 20% of the initial error
///
/// # Example
///
/// ```
/// use stroke_engine::PaintSettings;
///
/// let settings = PaintSettings::new()
///     .start_brush_radius(4)
///     .stop_error_percent(35.0)
///     .seed(7);
/// assert!(settings.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct PaintSettings {
    /// Radius of every stroke's first pivot, in pixels.
    ///
    /// Default: `6`
    pub start_brush_radius: u32,

    /// How far a candidate radius may raise the disk error above the error
    /// at the smallest radius of the band before widening stops.
    ///
    /// Default: `1.5`
    pub max_color_diff_in_brush_ratio: f64,

    /// How far the mean per-pivot error may rise above the start pivot's
    /// error before growth stops.
    ///
    /// Default: `1.3`
    pub max_color_diff_in_stroke_ratio: f64,

    /// Relative radius change allowed between consecutive pivots.
    ///
    /// Default: `0.2`
    pub max_radius_delta_ratio: f64,

    /// Largest turn between consecutive segments, in degrees.
    ///
    /// Default: `60.0`
    pub max_bend_angle_degrees: f64,

    /// Candidates shorter than this (length / width) are discarded unpainted.
    ///
    /// Default: `153 / 115`
    pub min_length_to_width_ratio: f64,

    /// Growth stops once a stroke gets longer than this (length / width).
    ///
    /// Default: `467 / 45`
    pub max_length_to_width_ratio: f64,

    /// The run converges at this percentage of the initial global error.
    ///
    /// Default: `20.0`
    pub stop_error_percent: f64,

    /// Random start positions sampled per candidate.
    ///
    /// Default: `20`
    pub start_candidates: usize,

    /// Image the gradient field is computed from.
    ///
    /// Default: [`GradientSource::Reference`]
    pub gradient_source: GradientSource,

    /// Gaussian blur applied to the luma before differentiating; `0` is off.
    ///
    /// Default: `0.0`
    pub gradient_smoothing_sigma: f64,

    /// How stroke colors are averaged and composited.
    ///
    /// Default: [`ColorModel::Rgb`]
    pub color_model: ColorModel,

    /// Initial canvas fill.
    ///
    /// Default: white
    pub background: Rgb,

    /// Stroke opacity; `1.0` overwrites the canvas.
    ///
    /// Default: `1.0`
    pub opacity: f64,

    /// Seed for start-position sampling; `None` seeds from entropy.
    ///
    /// Default: `None`
    pub seed: Option<u64>,
}

impl Default for PaintSettings {
    fn default() -> Self {
        Self {
            start_brush_radius: 6,
            max_color_diff_in_brush_ratio: 1.5,
            max_color_diff_in_stroke_ratio: 1.3,
            max_radius_delta_ratio: 0.2,
            max_bend_angle_degrees: 60.0,
            min_length_to_width_ratio: 153.0 / 115.0,
            max_length_to_width_ratio: 467.0 / 45.0,
            stop_error_percent: 20.0,
            start_candidates: 20,
            gradient_source: GradientSource::Reference,
            gradient_smoothing_sigma: 0.0,
            color_model: ColorModel::Rgb,
            background: Rgb::WHITE,
            opacity: 1.0,
            seed: None,
        }
    }
}

impl PaintSettings {
    /// Create settings with default values.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn start_brush_radius(mut self, radius: u32) -> Self {
        self.start_brush_radius = radius;
        self
    }

    #[inline]
    pub fn max_color_diff_in_brush_ratio(mut self, ratio: f64) -> Self {
        self.max_color_diff_in_brush_ratio = ratio;
        self
    }

    #[inline]
    pub fn max_color_diff_in_stroke_ratio(mut self, ratio: f64) -> Self {
        self.max_color_diff_in_stroke_ratio = ratio;
        self
    }

    #[inline]
    pub fn max_radius_delta_ratio(mut self, ratio: f64) -> Self {
        self.max_radius_delta_ratio = ratio;
        self
    }

    #[inline]
    pub fn max_bend_angle_degrees(mut self, degrees: f64) -> Self {
        self.max_bend_angle_degrees = degrees;
        self
    }

    /// Set both length to width limits.
    #[inline]
    pub fn length_to_width_ratio(mut self, min: f64, max: f64) -> Self {
        self.min_length_to_width_ratio = min;
        self.max_length_to_width_ratio = max;
        self
    }

    #[inline]
    pub fn stop_error_percent(mut self, percent: f64) -> Self {
        self.stop_error_percent = percent;
        self
    }

    #[inline]
    pub fn start_candidates(mut self, count: usize) -> Self {
        self.start_candidates = count;
        self
    }

    #[inline]
    pub fn gradient_source(mut self, source: GradientSource) -> Self {
        self.gradient_source = source;
        self
    }

    #[inline]
    pub fn gradient_smoothing_sigma(mut self, sigma: f64) -> Self {
        self.gradient_smoothing_sigma = sigma;
        self
    }

    #[inline]
    pub fn color_model(mut self, model: ColorModel) -> Self {
        self.color_model = model;
        self
    }

    #[inline]
    pub fn background(mut self, color: Rgb) -> Self {
        self.background = color;
        self
    }

    #[inline]
    pub fn opacity(mut self, opacity: f64) -> Self {
        self.opacity = opacity;
        self
    }

    #[inline]
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Check every field is in range.
    pub fn validate(&self) -> Result<(), EngineError> {
        fn invalid(field: &'static str, reason: impl Into<String>) -> Result<(), EngineError> {
            Err(EngineError::InvalidSettings {
                field,
                reason: reason.into(),
            })
        }
        fn positive(field: &'static str, value: f64) -> Result<(), EngineError> {
            if value.is_finite() && value > 0.0 {
                Ok(())
            } else {
                invalid(field, format!("must be a positive number, got {value}"))
            }
        }

        if self.start_brush_radius == 0 {
            return invalid("start_brush_radius", "must be at least 1");
        }
        positive("max_color_diff_in_brush_ratio", self.max_color_diff_in_brush_ratio)?;
        positive("max_color_diff_in_stroke_ratio", self.max_color_diff_in_stroke_ratio)?;
        if !(0.0..1.0).contains(&self.max_radius_delta_ratio) {
            return invalid(
                "max_radius_delta_ratio",
                format!("must be in [0, 1), got {}", self.max_radius_delta_ratio),
            );
        }
        if !(self.max_bend_angle_degrees > 0.0 && self.max_bend_angle_degrees <= 180.0) {
            return invalid(
                "max_bend_angle_degrees",
                format!("must be in (0, 180], got {}", self.max_bend_angle_degrees),
            );
        }
        if !(self.min_length_to_width_ratio.is_finite() && self.min_length_to_width_ratio >= 0.0) {
            return invalid(
                "min_length_to_width_ratio",
                format!("must be a non-negative number, got {}", self.min_length_to_width_ratio),
            );
        }
        positive("max_length_to_width_ratio", self.max_length_to_width_ratio)?;
        if self.min_length_to_width_ratio > self.max_length_to_width_ratio {
            return invalid(
                "min_length_to_width_ratio",
                format!(
                    "{} exceeds max_length_to_width_ratio {}",
                    self.min_length_to_width_ratio, self.max_length_to_width_ratio
                ),
            );
        }
        if !(0.0..=100.0).contains(&self.stop_error_percent) {
            return invalid(
                "stop_error_percent",
                format!("must be in [0, 100], got {}", self.stop_error_percent),
            );
        }
        if self.start_candidates == 0 {
            return invalid("start_candidates", "must be at least 1");
        }
        if !(self.gradient_smoothing_sigma.is_finite() && self.gradient_smoothing_sigma >= 0.0) {
            return invalid(
                "gradient_smoothing_sigma",
                format!("must be a non-negative number, got {}", self.gradient_smoothing_sigma),
            );
        }
        if !(self.opacity > 0.0 && self.opacity <= 1.0) {
            return invalid("opacity", format!("must be in (0, 1], got {}", self.opacity));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_values() {
        let settings = PaintSettings::default();
        assert_eq!(settings.start_brush_radius, 6);
        assert!((settings.max_color_diff_in_brush_ratio - 1.5).abs() < f64::EPSILON);
        assert!((settings.max_color_diff_in_stroke_ratio - 1.3).abs() < f64::EPSILON);
        assert!((settings.max_radius_delta_ratio - 0.2).abs() < f64::EPSILON);
        assert!((settings.min_length_to_width_ratio - 153.0 / 115.0).abs() < f64::EPSILON);
        assert!((settings.max_length_to_width_ratio - 467.0 / 45.0).abs() < f64::EPSILON);
        assert!((settings.stop_error_percent - 20.0).abs() < f64::EPSILON);
        assert_eq!(settings.start_candidates, 20);
        assert_eq!(settings.background, Rgb::WHITE);
        assert_eq!(settings.seed, None);
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_new_equals_default() {
        assert_eq!(PaintSettings::new(), PaintSettings::default());
    }

    #[test]
    fn test_builder_chaining() {
        let settings = PaintSettings::new()
            .start_brush_radius(3)
            .length_to_width_ratio(0.5, 4.0)
            .gradient_source(GradientSource::Canvas)
            .color_model(ColorModel::Hsv)
            .opacity(0.5)
            .seed(11);

        assert_eq!(settings.start_brush_radius, 3);
        assert_eq!(settings.min_length_to_width_ratio, 0.5);
        assert_eq!(settings.max_length_to_width_ratio, 4.0);
        assert_eq!(settings.gradient_source, GradientSource::Canvas);
        assert_eq!(settings.color_model, ColorModel::Hsv);
        assert_eq!(settings.seed, Some(11));
        // Untouched fields keep their defaults.
        assert_eq!(settings.start_candidates, 20);
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_out_of_range() {
        let cases = [
            (PaintSettings::new().start_brush_radius(0), "start_brush_radius"),
            (PaintSettings::new().max_color_diff_in_brush_ratio(0.0), "max_color_diff_in_brush_ratio"),
            (PaintSettings::new().max_color_diff_in_stroke_ratio(f64::NAN), "max_color_diff_in_stroke_ratio"),
            (PaintSettings::new().max_radius_delta_ratio(1.0), "max_radius_delta_ratio"),
            (PaintSettings::new().max_bend_angle_degrees(0.0), "max_bend_angle_degrees"),
            (PaintSettings::new().length_to_width_ratio(5.0, 2.0), "min_length_to_width_ratio"),
            (PaintSettings::new().stop_error_percent(101.0), "stop_error_percent"),
            (PaintSettings::new().start_candidates(0), "start_candidates"),
            (PaintSettings::new().gradient_smoothing_sigma(-1.0), "gradient_smoothing_sigma"),
            (PaintSettings::new().opacity(0.0), "opacity"),
        ];
        for (settings, expected) in cases {
            match settings.validate() {
                Err(EngineError::InvalidSettings { field, .. }) => assert_eq!(field, expected),
                other => panic!("expected {expected} to be rejected, got {other:?}"),
            }
        }
    }
}
