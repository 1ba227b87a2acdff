//! A painting run driven from the host side.
//!
//! [`PaintSession`] wraps a [`Painter`] with the pieces a front end needs:
//! cooperative cancellation from another thread, a progress callback,
//! periodic progress logging and optional recording of accepted strokes.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use stroke_engine::{
    AcceptedStroke, GradientSource, PaintObserver, PaintReport, PaintSettings, Painter, PixelBuffer, Rgb, RunBudget, RunOutcome,
};

use crate::error::SessionError;
use crate::models::PaintConfig;

/// Accepted strokes between two progress log lines.
const DEFAULT_LOG_EVERY: u64 = 100;

type ProgressCallback = Box<dyn FnMut(f64) + Send>;

/// Shared flag that stops a running session before its next candidate.
#[derive(Debug, Clone, Default)]
pub struct CancelHandle(Arc<AtomicBool>);

impl CancelHandle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Result of [`PaintSession::run`].
#[derive(Debug, Clone)]
pub struct SessionReport {
    pub paint: PaintReport,
    pub elapsed: Duration,
    /// Accepted strokes in order; empty unless recording was enabled.
    pub strokes: Vec<AcceptedStroke>,
    /// Times the gradient field was rebuilt during the run.
    pub gradient_recomputes: u64,
}

pub struct PaintSession {
    painter: Painter,
    budget: RunBudget,
    cancel: CancelHandle,
    progress: Option<ProgressCallback>,
    log_every: u64,
    recompute_every: Option<u64>,
    record_strokes: bool,
}

impl PaintSession {
    /// Session for `reference` configured from a [`PaintConfig`].
    pub fn new(reference: PixelBuffer<Rgb>, config: &PaintConfig) -> Result<Self, SessionError> {
        let mut session = Self::with_settings(reference, config.to_settings()?, config.budget())?;
        session.recompute_every = config.gradient.recompute_every;
        Ok(session)
    }

    pub fn with_settings(
        reference: PixelBuffer<Rgb>,
        settings: PaintSettings,
        budget: RunBudget,
    ) -> Result<Self, SessionError> {
        let painter = Painter::new(reference, settings)?;
        Ok(Self {
            painter,
            budget,
            cancel: CancelHandle::new(),
            progress: None,
            log_every: DEFAULT_LOG_EVERY,
            recompute_every: None,
            record_strokes: false,
        })
    }

    /// Called with the progress percentage after every accepted stroke.
    pub fn on_progress(mut self, callback: impl FnMut(f64) + Send + 'static) -> Self {
        self.progress = Some(Box::new(callback));
        self
    }

    /// Log a progress line every `strokes` accepted strokes; `0` disables it.
    pub fn log_every(mut self, strokes: u64) -> Self {
        self.log_every = strokes;
        self
    }

    /// Rebuild the gradient field every `strokes` accepted strokes.
    ///
    /// Only has an effect with [`GradientSource::Canvas`]; a reference
    /// gradient never changes.
    pub fn recompute_gradient_every(mut self, strokes: u64) -> Self {
        self.recompute_every = (strokes > 0).then_some(strokes);
        self
    }

    pub fn record_strokes(mut self, record: bool) -> Self {
        self.record_strokes = record;
        self
    }

    pub fn cancel_handle(&self) -> CancelHandle {
        self.cancel.clone()
    }

    pub fn painter(&self) -> &Painter {
        &self.painter
    }

    pub fn budget(&self) -> &RunBudget {
        &self.budget
    }

    /// Paint until convergence, budget exhaustion or cancellation.
    ///
    /// Can be called again after a budgeted run to continue with a fresh
    /// budget on the same canvas.
    pub fn run(&mut self) -> Result<SessionReport, SessionError> {
        let (width, height) = self.painter.reference().dimensions();
        let span = tracing::info_span!("paint", width, height);
        let _guard = span.enter();

        let started = Instant::now();
        let start_candidates = self.candidates();
        let start_evaluated = self.evaluated();

        let recompute_every = self
            .recompute_every
            .filter(|_| self.painter.settings().gradient_source == GradientSource::Canvas);

        let mut strokes = Vec::new();
        let mut gradient_recomputes = 0;
        let mut observer = SessionObserver {
            cancel: &self.cancel,
            progress: self.progress.as_mut(),
            log_every: self.log_every,
            recompute_every,
            recompute_pending: false,
            strokes: self.record_strokes.then_some(&mut strokes),
        };

        let mut budget = self.budget;
        let paint = loop {
            let report = self.painter.run(&budget, &mut observer)?;
            if report.outcome != RunOutcome::Cancelled || !observer.recompute_pending || self.cancel.is_cancelled() {
                break report;
            }

            observer.recompute_pending = false;
            self.painter.recompute_gradient();
            gradient_recomputes += 1;
            tracing::debug!(accepted = report.accepted, "Recomputed gradient field");
            budget = remaining(
                &self.budget,
                started.elapsed(),
                report.candidates() - start_candidates,
                report.evaluated() - start_evaluated,
            );
        };

        let elapsed = started.elapsed();
        tracing::info!(
            outcome = %paint.outcome,
            accepted = paint.accepted,
            progress = format_args!("{:.1}", paint.progress),
            elapsed_ms = elapsed.as_millis() as u64,
            "Session finished"
        );

        Ok(SessionReport {
            paint,
            elapsed,
            strokes,
            gradient_recomputes,
        })
    }

    pub fn into_canvas(self) -> PixelBuffer<Rgb> {
        self.painter.into_canvas()
    }

    fn candidates(&self) -> u64 {
        self.painter.report(RunOutcome::Cancelled).candidates()
    }

    fn evaluated(&self) -> u64 {
        self.painter.report(RunOutcome::Cancelled).evaluated()
    }
}

/// What is left of `budget` after part of it was spent.
fn remaining(budget: &RunBudget, elapsed: Duration, candidates: u64, evaluated: u64) -> RunBudget {
    RunBudget {
        max_iterations: budget.max_iterations.map(|max| max.saturating_sub(evaluated)),
        max_candidates: budget.max_candidates.map(|max| max.saturating_sub(candidates)),
        max_duration: budget.max_duration.map(|max| max.saturating_sub(elapsed)),
    }
}

struct SessionObserver<'a> {
    cancel: &'a CancelHandle,
    progress: Option<&'a mut ProgressCallback>,
    log_every: u64,
    recompute_every: Option<u64>,
    recompute_pending: bool,
    strokes: Option<&'a mut Vec<AcceptedStroke>>,
}

impl PaintObserver for SessionObserver<'_> {
    fn on_stroke(&mut self, stroke: &AcceptedStroke) {
        let count = stroke.index + 1;
        if self.log_every > 0 && count % self.log_every == 0 {
            tracing::info!(
                accepted = count,
                error = stroke.error_after,
                progress = format_args!("{:.1}", stroke.progress),
                "Painting"
            );
        }
        if self.recompute_every.is_some_and(|every| count % every == 0) {
            self.recompute_pending = true;
        }
        if let Some(strokes) = self.strokes.as_mut() {
            strokes.push(stroke.clone());
        }
    }

    fn on_tick(&mut self, progress: f64, _canvas: &PixelBuffer<Rgb>) {
        if let Some(callback) = self.progress.as_deref_mut() {
            callback(progress);
        }
    }

    fn should_stop(&mut self) -> bool {
        self.recompute_pending || self.cancel.is_cancelled()
    }
}
