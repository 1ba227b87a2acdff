//! Brushwork - approximate images with painted brush strokes
//!
//! Host side of the stroke engine: YAML configuration, painting sessions
//! with cancellation and progress reporting, and synthetic reference
//! patterns. This library exposes modules for integration testing.

pub mod error;
pub mod models;
pub mod services;
