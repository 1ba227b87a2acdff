//! Run limits, progress hooks and run results.

use std::time::Duration;

use crate::buffer::PixelBuffer;
use crate::color::Rgb;
use crate::stroke::{Coverage, StrokePositions};

/// Optional hard limits on one [`Painter::run`](super::Painter::run) call.
///
/// The greedy loop has no natural bound when the reference cannot be
/// approximated below the stop threshold; a budget caps it. All limits are
/// off by default.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunBudget {
    /// Candidates that were painted and measured (discarded short
    /// candidates are not counted).
    pub max_iterations: Option<u64>,
    /// Every grown candidate, including discarded ones.
    pub max_candidates: Option<u64>,
    /// Wall clock time for the call.
    pub max_duration: Option<Duration>,
}

impl RunBudget {
    /// No limits; the run ends only on convergence or cancellation.
    pub fn unlimited() -> Self {
        Self::default()
    }

    pub fn max_iterations(mut self, iterations: u64) -> Self {
        self.max_iterations = Some(iterations);
        self
    }

    pub fn max_candidates(mut self, candidates: u64) -> Self {
        self.max_candidates = Some(candidates);
        self
    }

    pub fn max_duration(mut self, duration: Duration) -> Self {
        self.max_duration = Some(duration);
        self
    }

    pub fn is_unlimited(&self) -> bool {
        self.max_iterations.is_none() && self.max_candidates.is_none() && self.max_duration.is_none()
    }
}

/// A stroke that lowered the global error and stayed on the canvas.
#[derive(Debug, Clone, PartialEq)]
pub struct AcceptedStroke {
    /// Zero-based order of acceptance.
    pub index: u64,
    pub chain: StrokePositions,
    pub coverage: Coverage,
    /// Representative color painted over the coverage.
    pub color: Rgb,
    pub error_before: u64,
    pub error_after: u64,
    /// Progress towards the stop threshold after this stroke, `0..=100`.
    pub progress: f64,
}

/// Result of evaluating one candidate.
#[derive(Debug, Clone, PartialEq)]
pub enum StepOutcome {
    /// The run has converged; no candidate was grown.
    Done,
    /// Too short to paint; the canvas was not touched.
    Discarded { pivots: usize },
    /// Painted, did not lower the error, rolled back.
    Rejected { error_before: u64, error_after: u64 },
    /// Painted and kept.
    Accepted(AcceptedStroke),
}

/// Why a run stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// Global error reached the stop threshold.
    Converged,
    /// A [`RunBudget`] limit was hit first.
    BudgetExhausted,
    /// The observer asked to stop.
    Cancelled,
}

impl std::fmt::Display for RunOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            RunOutcome::Converged => "converged",
            RunOutcome::BudgetExhausted => "budget exhausted",
            RunOutcome::Cancelled => "cancelled",
        };
        f.write_str(name)
    }
}

/// Summary of a painter's state when a run ended.
///
/// Counters cover the painter's whole lifetime, not just the last call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PaintReport {
    pub outcome: RunOutcome,
    pub accepted: u64,
    pub rejected: u64,
    pub discarded: u64,
    pub initial_error: u64,
    pub final_error: u64,
    pub stop_threshold: f64,
    /// `0..=100`
    pub progress: f64,
}

impl PaintReport {
    /// Candidates that were painted and measured.
    pub fn evaluated(&self) -> u64 {
        self.accepted + self.rejected
    }

    /// Every grown candidate, discarded ones included.
    pub fn candidates(&self) -> u64 {
        self.accepted + self.rejected + self.discarded
    }
}

/// Hooks called by [`Painter::run`](super::Painter::run) between candidates.
///
/// All methods have no-op defaults; `()` is the observer that does nothing.
pub trait PaintObserver {
    /// A stroke was committed.
    fn on_stroke(&mut self, _stroke: &AcceptedStroke) {}

    /// Progress and canvas after an accepted stroke.
    fn on_tick(&mut self, _progress: f64, _canvas: &PixelBuffer<Rgb>) {}

    /// Polled before every candidate; `true` ends the run as cancelled.
    fn should_stop(&mut self) -> bool {
        false
    }
}

impl PaintObserver for () {}

impl<O: PaintObserver + ?Sized> PaintObserver for &mut O {
    fn on_stroke(&mut self, stroke: &AcceptedStroke) {
        (**self).on_stroke(stroke)
    }

    fn on_tick(&mut self, progress: f64, canvas: &PixelBuffer<Rgb>) {
        (**self).on_tick(progress, canvas)
    }

    fn should_stop(&mut self) -> bool {
        (**self).should_stop()
    }
}
