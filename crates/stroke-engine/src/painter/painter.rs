//! The greedy accept/reject loop.
//!
//! Each candidate goes through grow, rasterize, composite and measure. A
//! stroke is kept only if it strictly lowers the global error, otherwise the
//! canvas and the difference map are restored exactly.

use std::time::Instant;

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::buffer::{Canvas, PixelBuffer};
use crate::color::Rgb;
use crate::difference::DifferenceMap;
use crate::error::EngineError;
use crate::gradient::GradientField;
use crate::stroke::{StrokeGrower, StrokeRasterizer};

use super::observer::{AcceptedStroke, PaintObserver, PaintReport, RunBudget, RunOutcome, StepOutcome};
use super::settings::{GradientSource, PaintSettings};

/// Owns one painting run: reference, canvas, difference map and gradient.
#[derive(Debug)]
pub struct Painter {
    reference: PixelBuffer<Rgb>,
    canvas: Canvas,
    diff: DifferenceMap,
    gradient: GradientField,
    rasterizer: StrokeRasterizer,
    settings: PaintSettings,
    rng: StdRng,
    initial_error: u64,
    stop_threshold: f64,
    candidates: u64,
    accepted: u64,
    rejected: u64,
    discarded: u64,
}

impl Painter {
    /// Start painting `reference` on a blank canvas filled with the
    /// configured background.
    pub fn new(reference: PixelBuffer<Rgb>, settings: PaintSettings) -> Result<Self, EngineError> {
        let (width, height) = reference.dimensions();
        let canvas = PixelBuffer::new(width, height, settings.background)?;
        Self::with_canvas(reference, canvas, settings)
    }

    /// Continue painting `reference` over an existing canvas.
    ///
    /// Fails with [`EngineError::SizeMismatch`] if the two differ in size.
    pub fn with_canvas(
        reference: PixelBuffer<Rgb>,
        canvas: PixelBuffer<Rgb>,
        settings: PaintSettings,
    ) -> Result<Self, EngineError> {
        settings.validate()?;
        let diff = DifferenceMap::new(&reference, &canvas)?;
        let gradient = match settings.gradient_source {
            GradientSource::Reference => GradientField::from_image(&reference, settings.gradient_smoothing_sigma),
            GradientSource::Canvas => GradientField::from_image(&canvas, settings.gradient_smoothing_sigma),
        };
        let rng = match settings.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let initial_error = diff.global_error();
        let stop_threshold = initial_error as f64 * settings.stop_error_percent / 100.0;
        let (width, height) = reference.dimensions();

        tracing::debug!(
            width,
            height,
            initial_error,
            stop_threshold,
            "painter ready"
        );

        Ok(Self {
            rasterizer: StrokeRasterizer::for_size(width, height),
            reference,
            canvas: Canvas::from_pixels(canvas),
            diff,
            gradient,
            settings,
            rng,
            initial_error,
            stop_threshold,
            candidates: 0,
            accepted: 0,
            rejected: 0,
            discarded: 0,
        })
    }

    pub fn reference(&self) -> &PixelBuffer<Rgb> {
        &self.reference
    }

    pub fn canvas(&self) -> &PixelBuffer<Rgb> {
        self.canvas.pixels()
    }

    pub fn difference(&self) -> &DifferenceMap {
        &self.diff
    }

    pub fn gradient(&self) -> &GradientField {
        &self.gradient
    }

    pub fn settings(&self) -> &PaintSettings {
        &self.settings
    }

    #[inline]
    pub fn global_error(&self) -> u64 {
        self.diff.global_error()
    }

    pub fn initial_error(&self) -> u64 {
        self.initial_error
    }

    /// `initial_error * stop_error_percent / 100`, fixed at construction.
    pub fn stop_threshold(&self) -> f64 {
        self.stop_threshold
    }

    pub fn is_converged(&self) -> bool {
        self.global_error() as f64 <= self.stop_threshold
    }

    /// How far the error has come down towards the stop threshold, `0..=100`.
    pub fn progress(&self) -> f64 {
        let span = self.initial_error as f64 - self.stop_threshold;
        if span <= 0.0 {
            return 100.0;
        }
        let remaining = self.global_error() as f64 - self.stop_threshold;
        (100.0 - 100.0 * remaining / span).clamp(0.0, 100.0)
    }

    /// Rebuild the gradient field from the configured source image.
    ///
    /// With [`GradientSource::Canvas`] this picks up everything painted so far.
    pub fn recompute_gradient(&mut self) {
        let source = match self.settings.gradient_source {
            GradientSource::Reference => &self.reference,
            GradientSource::Canvas => self.canvas.pixels(),
        };
        self.gradient = GradientField::from_image(source, self.settings.gradient_smoothing_sigma);
        tracing::debug!(source = ?self.settings.gradient_source, "gradient recomputed");
    }

    /// Grow and evaluate one candidate stroke.
    ///
    /// Returns [`StepOutcome::Done`] without doing any work once the error is
    /// at or below the stop threshold, but only after at least one candidate
    /// has been evaluated.
    pub fn step(&mut self) -> Result<StepOutcome, EngineError> {
        if self.candidates > 0 && self.is_converged() {
            return Ok(StepOutcome::Done);
        }
        self.candidates += 1;

        let chain = StrokeGrower::new(&self.reference, &self.gradient, &self.settings).grow(&mut self.rng, &self.diff);
        if chain.length_to_width_ratio() < self.settings.min_length_to_width_ratio {
            self.discarded += 1;
            tracing::trace!(pivots = chain.len(), "candidate too short, discarded");
            return Ok(StepOutcome::Discarded { pivots: chain.len() });
        }

        let coverage = self.rasterizer.rasterize(&chain);
        let model = self.settings.color_model;
        let opacity = self.settings.opacity;
        let color = model
            .mean(coverage.iter().filter_map(|pos| self.reference.get(pos)))
            .unwrap_or(self.settings.background);

        let error_before = self.diff.global_error();
        self.canvas
            .apply_stroke_with(&coverage, color, |old| model.blend_display(old, color, opacity));
        self.diff.refresh(coverage.iter(), &self.reference, self.canvas.pixels());
        let error_after = self.diff.global_error();

        if error_after >= error_before {
            let transaction = self.canvas.rollback()?;
            self.diff
                .refresh(transaction.positions(), &self.reference, self.canvas.pixels());
            self.rejected += 1;
            tracing::trace!(error_before, error_after, "stroke rejected");
            return Ok(StepOutcome::Rejected {
                error_before,
                error_after,
            });
        }

        self.canvas.commit();
        let stroke = AcceptedStroke {
            index: self.accepted,
            chain,
            coverage,
            color,
            error_before,
            error_after,
            progress: self.progress(),
        };
        self.accepted += 1;
        tracing::debug!(
            index = stroke.index,
            pivots = stroke.chain.len(),
            pixels = stroke.coverage.len(),
            color = %stroke.color,
            error = error_after,
            progress = stroke.progress,
            "stroke accepted"
        );
        Ok(StepOutcome::Accepted(stroke))
    }

    /// Paint until converged, cancelled or out of budget.
    ///
    /// At least one candidate is evaluated per call before convergence is
    /// checked. The observer is polled for cancellation before every
    /// candidate, never in the middle of one.
    pub fn run<O: PaintObserver>(&mut self, budget: &RunBudget, mut observer: O) -> Result<PaintReport, EngineError> {
        let started = Instant::now();
        let (start_candidates, start_evaluated) = (self.candidates, self.accepted + self.rejected);
        let mut first = true;

        let outcome = loop {
            if !first && self.is_converged() {
                break RunOutcome::Converged;
            }
            if observer.should_stop() {
                break RunOutcome::Cancelled;
            }
            let evaluated = self.accepted + self.rejected - start_evaluated;
            let exhausted = budget.max_iterations.is_some_and(|max| evaluated >= max)
                || budget
                    .max_candidates
                    .is_some_and(|max| self.candidates - start_candidates >= max)
                || budget.max_duration.is_some_and(|max| started.elapsed() >= max);
            if exhausted {
                break RunOutcome::BudgetExhausted;
            }

            first = false;
            match self.step()? {
                StepOutcome::Done => break RunOutcome::Converged,
                StepOutcome::Accepted(stroke) => {
                    observer.on_stroke(&stroke);
                    observer.on_tick(stroke.progress, self.canvas.pixels());
                }
                StepOutcome::Rejected { .. } | StepOutcome::Discarded { .. } => {}
            }
        };

        let report = self.report(outcome);
        tracing::info!(
            outcome = %report.outcome,
            accepted = report.accepted,
            rejected = report.rejected,
            discarded = report.discarded,
            final_error = report.final_error,
            progress = report.progress,
            "paint run finished"
        );
        Ok(report)
    }

    /// Snapshot of the counters and errors.
    pub fn report(&self, outcome: RunOutcome) -> PaintReport {
        PaintReport {
            outcome,
            accepted: self.accepted,
            rejected: self.rejected,
            discarded: self.discarded,
            initial_error: self.initial_error,
            final_error: self.global_error(),
            stop_threshold: self.stop_threshold,
            progress: self.progress(),
        }
    }

    /// Give back the painted canvas.
    pub fn into_canvas(self) -> PixelBuffer<Rgb> {
        self.canvas.into_pixels()
    }
}
