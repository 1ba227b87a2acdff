//! Tests for loading paint configuration from disk.

mod common;

use std::time::Duration;

use brushwork::error::ConfigError;
use brushwork::models::{ColorModelName, PaintConfig};
use common::fixtures::yaml;
use pretty_assertions::assert_eq;
use stroke_engine::PaintSettings;
use tempfile::TempDir;

/// Write `content` to `paint.yaml` in a fresh temp dir
fn write_config(content: &str) -> (TempDir, std::path::PathBuf) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let path = temp_dir.path().join("paint.yaml");
    std::fs::write(&path, content).expect("Failed to write config");
    (temp_dir, path)
}

#[test]
fn test_load_from_file() {
    let (_dir, path) = write_config(yaml::FAST);
    let config = PaintConfig::load(&path).unwrap();

    assert_eq!(config.brush.start_radius, 2);
    assert_eq!(config.stroke.start_candidates, 10);
    assert_eq!(config.budget.max_candidates, Some(400));
    assert_eq!(config.seed, Some(7));

    let settings = config.to_settings().unwrap();
    assert_eq!(
        settings,
        PaintSettings::new().start_brush_radius(2).start_candidates(10).seed(7)
    );
}

#[test]
fn test_load_missing_file_reports_path() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("missing.yaml");

    match PaintConfig::load(&path) {
        Err(ConfigError::Io { path: reported, .. }) => assert_eq!(reported, path),
        other => panic!("expected Io error, got {other:?}"),
    }
}

#[test]
fn test_load_malformed_yaml() {
    let (_dir, path) = write_config("brush: [1, 2");
    assert!(matches!(PaintConfig::load(&path), Err(ConfigError::Parse(_))));
}

#[test]
fn test_load_wrong_type() {
    let (_dir, path) = write_config("brush:\n  start_radius: large\n");
    assert!(matches!(PaintConfig::load(&path), Err(ConfigError::Parse(_))));
}

#[test]
fn test_default_yaml_reloads_as_default() {
    let (_dir, path) = write_config(&PaintConfig::default().to_yaml().unwrap());
    assert_eq!(PaintConfig::load(&path).unwrap(), PaintConfig::default());
}

#[test]
fn test_full_config_file() {
    let (_dir, path) = write_config(
        r##"
brush:
  start_radius: 4
  max_color_diff_ratio: 1.8
  max_radius_delta_ratio: 0.1
  opacity: 0.75
stroke:
  max_color_diff_ratio: 1.2
  max_bend_angle_degrees: 45
  min_length_to_width_ratio: 2
  max_length_to_width_ratio: 8
  start_candidates: 30
gradient:
  source: canvas
  smoothing_sigma: 1.5
budget:
  max_iterations: 1000
  max_seconds: 30
stop_error_percent: 10
color_model: hsv
background: "#202020"
seed: 42
"##,
    );
    let config = PaintConfig::load(&path).unwrap();
    assert_eq!(config.color_model, ColorModelName::Hsv);

    let settings = config.to_settings().unwrap();
    assert!(settings.validate().is_ok());
    assert_eq!(settings.opacity, 0.75);
    assert_eq!(settings.max_bend_angle_degrees, 45.0);
    assert_eq!(settings.min_length_to_width_ratio, 2.0);
    assert_eq!(settings.gradient_smoothing_sigma, 1.5);
    assert_eq!(settings.stop_error_percent, 10.0);
    assert_eq!(settings.background.to_string(), "#202020");

    let budget = config.budget();
    assert_eq!(budget.max_iterations, Some(1000));
    assert_eq!(budget.max_duration, Some(Duration::from_secs(30)));
}
