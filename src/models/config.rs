use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use stroke_engine::{ColorModel, GradientSource, PaintSettings, Rgb, RunBudget};

use crate::error::ConfigError;

/// Paint configuration loaded from a YAML file.
///
/// Every field is optional; anything left out takes the engine default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PaintConfig {
    /// Brush radius and per-disk color tolerance
    pub brush: BrushConfig,

    /// Stroke growth limits
    pub stroke: StrokeConfig,

    /// Where stroke directions come from
    pub gradient: GradientConfig,

    /// Hard limits on one run
    pub budget: BudgetConfig,

    /// Converge at this percentage of the initial error
    pub stop_error_percent: f64,

    pub color_model: ColorModelName,

    /// Initial canvas fill as a hex color (`#RRGGBB` or `#RGB`)
    pub background: String,

    /// Fixed seed for reproducible runs
    pub seed: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BrushConfig {
    pub start_radius: u32,
    pub max_color_diff_ratio: f64,
    pub max_radius_delta_ratio: f64,
    pub opacity: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StrokeConfig {
    pub max_color_diff_ratio: f64,
    pub max_bend_angle_degrees: f64,
    pub min_length_to_width_ratio: f64,
    pub max_length_to_width_ratio: f64,
    pub start_candidates: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GradientConfig {
    pub source: GradientSourceName,

    /// Gaussian sigma applied before differentiating (0 = off)
    pub smoothing_sigma: f64,

    /// Rebuild the field every N accepted strokes; ignored for the
    /// reference source, whose gradient never changes
    pub recompute_every: Option<u64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BudgetConfig {
    pub max_iterations: Option<u64>,
    pub max_candidates: Option<u64>,
    pub max_seconds: Option<f64>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorModelName {
    #[default]
    Rgb,
    Hsv,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GradientSourceName {
    #[default]
    Reference,
    Canvas,
}

impl From<ColorModelName> for ColorModel {
    fn from(name: ColorModelName) -> Self {
        match name {
            ColorModelName::Rgb => ColorModel::Rgb,
            ColorModelName::Hsv => ColorModel::Hsv,
        }
    }
}

impl From<GradientSourceName> for GradientSource {
    fn from(name: GradientSourceName) -> Self {
        match name {
            GradientSourceName::Reference => GradientSource::Reference,
            GradientSourceName::Canvas => GradientSource::Canvas,
        }
    }
}

impl Default for PaintConfig {
    fn default() -> Self {
        let settings = PaintSettings::default();
        Self {
            brush: BrushConfig::default(),
            stroke: StrokeConfig::default(),
            gradient: GradientConfig::default(),
            budget: BudgetConfig::default(),
            stop_error_percent: settings.stop_error_percent,
            color_model: ColorModelName::default(),
            background: settings.background.to_string(),
            seed: None,
        }
    }
}

impl Default for BrushConfig {
    fn default() -> Self {
        let settings = PaintSettings::default();
        Self {
            start_radius: settings.start_brush_radius,
            max_color_diff_ratio: settings.max_color_diff_in_brush_ratio,
            max_radius_delta_ratio: settings.max_radius_delta_ratio,
            opacity: settings.opacity,
        }
    }
}

impl Default for StrokeConfig {
    fn default() -> Self {
        let settings = PaintSettings::default();
        Self {
            max_color_diff_ratio: settings.max_color_diff_in_stroke_ratio,
            max_bend_angle_degrees: settings.max_bend_angle_degrees,
            min_length_to_width_ratio: settings.min_length_to_width_ratio,
            max_length_to_width_ratio: settings.max_length_to_width_ratio,
            start_candidates: settings.start_candidates,
        }
    }
}

impl Default for GradientConfig {
    fn default() -> Self {
        Self {
            source: GradientSourceName::default(),
            smoothing_sigma: PaintSettings::default().gradient_smoothing_sigma,
            recompute_every: None,
        }
    }
}

impl PaintConfig {
    /// Load configuration from a YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_yaml_str(&content)?;
        tracing::info!(
            path = %path.display(),
            start_radius = config.brush.start_radius,
            stop_error_percent = config.stop_error_percent,
            "Loaded configuration"
        );
        Ok(config)
    }

    /// Parse configuration from YAML text. An empty document yields the
    /// defaults.
    pub fn from_yaml_str(content: &str) -> Result<Self, ConfigError> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(content)?)
    }

    pub fn to_yaml(&self) -> Result<String, ConfigError> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Engine settings for this configuration.
    ///
    /// Only the background color is checked here; range checks happen when
    /// the painter is built.
    pub fn to_settings(&self) -> Result<PaintSettings, ConfigError> {
        let background: Rgb = self.background.parse().map_err(|source| ConfigError::InvalidColor {
            value: self.background.clone(),
            source,
        })?;

        let mut settings = PaintSettings::new()
            .start_brush_radius(self.brush.start_radius)
            .max_color_diff_in_brush_ratio(self.brush.max_color_diff_ratio)
            .max_radius_delta_ratio(self.brush.max_radius_delta_ratio)
            .opacity(self.brush.opacity)
            .max_color_diff_in_stroke_ratio(self.stroke.max_color_diff_ratio)
            .max_bend_angle_degrees(self.stroke.max_bend_angle_degrees)
            .length_to_width_ratio(
                self.stroke.min_length_to_width_ratio,
                self.stroke.max_length_to_width_ratio,
            )
            .start_candidates(self.stroke.start_candidates)
            .gradient_source(self.gradient.source.into())
            .gradient_smoothing_sigma(self.gradient.smoothing_sigma)
            .stop_error_percent(self.stop_error_percent)
            .color_model(self.color_model.into())
            .background(background);
        if let Some(seed) = self.seed {
            settings = settings.seed(seed);
        }
        Ok(settings)
    }

    /// Run limits; negative or non-finite `max_seconds` is ignored.
    pub fn budget(&self) -> RunBudget {
        let mut budget = RunBudget::unlimited();
        if let Some(max) = self.budget.max_iterations {
            budget = budget.max_iterations(max);
        }
        if let Some(max) = self.budget.max_candidates {
            budget = budget.max_candidates(max);
        }
        if let Some(seconds) = self.budget.max_seconds {
            match Duration::try_from_secs_f64(seconds) {
                Ok(duration) => budget = budget.max_duration(duration),
                Err(e) => tracing::warn!(%e, seconds, "Ignoring invalid time budget"),
            }
        }
        budget
    }
}
