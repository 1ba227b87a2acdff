//! Error type for the stroke-engine public API.
//!
//! Only configuration and programming errors are represented here. Search
//! outcomes such as a candidate leaving the canvas or a flat gradient are
//! normal results of stroke growth and never become errors.

use thiserror::Error;

/// Unified error type for the engine.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EngineError {
    /// Two buffers that must be pixel-aligned have different dimensions.
    #[error("buffer size mismatch: expected {}x{}, got {}x{}", expected.0, expected.1, actual.0, actual.1)]
    SizeMismatch {
        /// Dimensions of the reference buffer (width, height).
        expected: (usize, usize),
        /// Dimensions of the offending buffer (width, height).
        actual: (usize, usize),
    },

    /// A buffer with zero width or height was supplied.
    #[error("image must have non-zero width and height")]
    EmptyImage,

    /// Raw pixel data does not match the declared dimensions.
    #[error("pixel data length {actual} does not match width * height = {expected}")]
    BufferLength {
        /// `width * height`
        expected: usize,
        /// Length of the supplied data.
        actual: usize,
    },

    /// A [`PaintSettings`](crate::PaintSettings) field is out of range.
    #[error("invalid setting `{field}`: {reason}")]
    InvalidSettings {
        /// Name of the offending field.
        field: &'static str,
        /// Human readable explanation.
        reason: String,
    },

    /// Rollback was requested but no stroke is pending.
    #[error("no pending stroke transaction to roll back")]
    NoPendingTransaction,
}
