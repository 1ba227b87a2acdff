//! The painted canvas and its single-slot stroke undo.
//!
//! Every stroke is applied as a transaction that remembers the exact
//! pixels it touched and the colors they held before the write. At most
//! one transaction is pending: applying a new stroke commits the previous
//! one, and rolling back consumes the pending slot so the same stroke can
//! never be undone twice.

use crate::color::Rgb;
use crate::error::EngineError;
use crate::geometry::Position;
use crate::stroke::Coverage;

use super::pixel_buffer::PixelBuffer;

/// Undo record of one stroke application.
#[derive(Debug, Clone, PartialEq)]
pub struct StrokeTransaction {
    /// Touched positions paired with the color each held before the write.
    previous: Vec<(Position, Rgb)>,
    /// Color written at full opacity.
    color: Rgb,
}

impl StrokeTransaction {
    /// Positions the stroke wrote to.
    pub fn positions(&self) -> impl Iterator<Item = Position> + '_ {
        self.previous.iter().map(|&(pos, _)| pos)
    }

    /// Positions with their pre-write colors.
    pub fn previous_colors(&self) -> &[(Position, Rgb)] {
        &self.previous
    }

    pub fn color(&self) -> Rgb {
        self.color
    }

    pub fn len(&self) -> usize {
        self.previous.len()
    }

    pub fn is_empty(&self) -> bool {
        self.previous.is_empty()
    }
}

/// RGB canvas with transactional stroke application.
#[derive(Debug, Clone)]
pub struct Canvas {
    pixels: PixelBuffer<Rgb>,
    pending: Option<StrokeTransaction>,
}

impl Canvas {
    /// Blank canvas filled with `background`.
    pub fn new(width: usize, height: usize, background: Rgb) -> Result<Self, EngineError> {
        Ok(Self {
            pixels: PixelBuffer::new(width, height, background)?,
            pending: None,
        })
    }

    /// Canvas starting from existing pixels.
    pub fn from_pixels(pixels: PixelBuffer<Rgb>) -> Self {
        Self {
            pixels,
            pending: None,
        }
    }

    #[inline]
    pub fn pixels(&self) -> &PixelBuffer<Rgb> {
        &self.pixels
    }

    #[inline]
    pub fn get(&self, pos: Position) -> Option<Rgb> {
        self.pixels.get(pos)
    }

    /// Drop any pending undo record and hand back the pixels.
    pub fn into_pixels(self) -> PixelBuffer<Rgb> {
        self.pixels
    }

    /// The stroke that can still be rolled back, if any.
    pub fn pending(&self) -> Option<&StrokeTransaction> {
        self.pending.as_ref()
    }

    /// Overwrite every covered pixel with `color`.
    pub fn apply_stroke(&mut self, coverage: &Coverage, color: Rgb) -> &StrokeTransaction {
        self.apply_stroke_with(coverage, color, |_| color)
    }

    /// Write `paint(old)` to every covered pixel, recording `old` for undo.
    ///
    /// Positions outside the canvas are skipped. Any previously pending
    /// transaction is committed first.
    pub fn apply_stroke_with<F>(&mut self, coverage: &Coverage, color: Rgb, paint: F) -> &StrokeTransaction
    where
        F: Fn(Rgb) -> Rgb,
    {
        let mut previous = Vec::with_capacity(coverage.len());
        for pos in coverage.iter() {
            if let Some(old) = self.pixels.get(pos) {
                self.pixels.replace(pos, paint(old));
                previous.push((pos, old));
            }
        }
        self.pending.insert(StrokeTransaction { previous, color })
    }

    /// Restore every pixel of the pending stroke and hand the record back.
    pub fn rollback(&mut self) -> Result<StrokeTransaction, EngineError> {
        let transaction = self
            .pending
            .take()
            .ok_or(EngineError::NoPendingTransaction)?;
        for &(pos, old) in transaction.previous.iter().rev() {
            self.pixels.replace(pos, old);
        }
        Ok(transaction)
    }

    /// Keep the pending stroke; its undo record is dropped.
    pub fn commit(&mut self) -> Option<StrokeTransaction> {
        self.pending.take()
    }
}
