//! Per-pixel error between the reference image and the canvas.
//!
//! Each cell stores `|ref.r - can.r| + |ref.g - can.g| + |ref.b - can.b|`.
//! The grand total is maintained by delta on every write, so
//! [`DifferenceMap::global_error`] is O(1) and always equals the sum of the
//! cells.

use crate::buffer::PixelBuffer;
use crate::color::Rgb;
use crate::error::EngineError;
use crate::geometry::Position;

/// Absolute color difference per pixel plus its running sum.
#[derive(Debug, Clone, PartialEq)]
pub struct DifferenceMap {
    cells: PixelBuffer<u16>,
    total: u64,
}

impl DifferenceMap {
    /// Build the map for two pixel-aligned images.
    ///
    /// Fails with [`EngineError::SizeMismatch`] if the dimensions differ.
    pub fn new(reference: &PixelBuffer<Rgb>, canvas: &PixelBuffer<Rgb>) -> Result<Self, EngineError> {
        reference.ensure_same_size(canvas)?;
        let (width, height) = reference.dimensions();
        let data: Vec<u16> = reference
            .as_slice()
            .iter()
            .zip(canvas.as_slice())
            .map(|(&r, &c)| r.abs_difference(c))
            .collect();
        let total = data.iter().map(|&v| v as u64).sum();
        Ok(Self {
            cells: PixelBuffer::from_vec(width, height, data)?,
            total,
        })
    }

    #[inline]
    pub fn dimensions(&self) -> (usize, usize) {
        self.cells.dimensions()
    }

    #[inline]
    pub fn get(&self, pos: Position) -> Option<u16> {
        self.cells.get(pos)
    }

    /// Store `value` at `pos` and move the total by the delta.
    ///
    /// This is the only write path. Positions outside the map are ignored.
    pub fn set(&mut self, pos: Position, value: u16) {
        if let Some(old) = self.cells.replace(pos, value) {
            self.total = self.total - old as u64 + value as u64;
        }
    }

    /// Sum of all cells, maintained incrementally.
    #[inline]
    pub fn global_error(&self) -> u64 {
        self.total
    }

    /// Sum of the cells within Euclidean `radius` of `center`, clipped to the map.
    pub fn sum_within_circle(&self, center: Position, radius: u32) -> u64 {
        self.cells
            .circle(center, radius)
            .map(|(_, v)| v as u64)
            .sum()
    }

    /// Recompute the cells at `positions` from the two images.
    pub fn refresh<I>(&mut self, positions: I, reference: &PixelBuffer<Rgb>, canvas: &PixelBuffer<Rgb>)
    where
        I: IntoIterator<Item = Position>,
    {
        for pos in positions {
            if let (Some(r), Some(c)) = (reference.get(pos), canvas.get(pos)) {
                self.set(pos, r.abs_difference(c));
            }
        }
    }

    /// Recompute every cell. Used after bulk canvas changes.
    pub fn rebuild(&mut self, reference: &PixelBuffer<Rgb>, canvas: &PixelBuffer<Rgb>) -> Result<(), EngineError> {
        self.cells.ensure_same_size(reference)?;
        self.cells.ensure_same_size(canvas)?;
        *self = Self::new(reference, canvas)?;
        Ok(())
    }

    /// Brute-force sum of the cells, bypassing the running total.
    pub fn recount(&self) -> u64 {
        self.cells.as_slice().iter().map(|&v| v as u64).sum()
    }
}
