//! Stroke skeletons and the pixel sets they cover.

use std::collections::BTreeSet;

use crate::geometry::Position;

/// One cross-section of a stroke: a center and a brush radius.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StrokePivot {
    pub center: Position,
    pub radius: u32,
}

impl StrokePivot {
    /// A pivot at `center`. Radius is clamped to at least 1.
    pub fn new(center: Position, radius: u32) -> Self {
        Self {
            center,
            radius: radius.max(1),
        }
    }
}

/// Ordered pivot chain from stroke start to end.
///
/// Never empty: a chain is created from its start pivot, and a one-pivot
/// chain is a single round dab.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StrokePositions {
    pivots: Vec<StrokePivot>,
}

impl StrokePositions {
    pub fn new(start: StrokePivot) -> Self {
        Self {
            pivots: vec![start],
        }
    }

    /// Chain from a list of pivots, `None` if the list is empty.
    pub fn from_pivots(pivots: Vec<StrokePivot>) -> Option<Self> {
        (!pivots.is_empty()).then_some(Self { pivots })
    }

    pub fn push(&mut self, pivot: StrokePivot) {
        self.pivots.push(pivot);
    }

    #[inline]
    pub fn pivots(&self) -> &[StrokePivot] {
        &self.pivots
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.pivots.len()
    }

    /// Always `false`; present for API symmetry with `len`.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.pivots.is_empty()
    }

    pub fn first(&self) -> StrokePivot {
        self.pivots[0]
    }

    pub fn last(&self) -> StrokePivot {
        self.pivots[self.pivots.len() - 1]
    }

    /// The pivot before the last one, if the chain has two or more.
    pub fn second_to_last(&self) -> Option<StrokePivot> {
        self.pivots.len().checked_sub(2).map(|i| self.pivots[i])
    }

    /// Physical length of the stroke body.
    ///
    /// Sum of center-to-center distances minus the first and last radius,
    /// floored at zero. A single dab has length zero.
    pub fn length(&self) -> f64 {
        if self.pivots.len() < 2 {
            return 0.0;
        }
        let centers: f64 = self
            .pivots
            .windows(2)
            .map(|pair| pair[0].center.distance(pair[1].center))
            .sum();
        let caps = (self.first().radius + self.last().radius) as f64;
        (centers - caps).max(0.0)
    }

    pub fn average_radius(&self) -> f64 {
        let total: u64 = self.pivots.iter().map(|p| p.radius as u64).sum();
        total as f64 / self.pivots.len() as f64
    }

    pub fn max_radius(&self) -> u32 {
        self.pivots.iter().map(|p| p.radius).max().unwrap_or(1)
    }

    /// Brush width, twice the average radius.
    pub fn width(&self) -> f64 {
        2.0 * self.average_radius()
    }

    /// `length / width`, compared against the configured ratio limits.
    pub fn length_to_width_ratio(&self) -> f64 {
        let width = self.width();
        if width == 0.0 {
            return 0.0;
        }
        self.length() / width
    }
}

/// The exact pixel set a rasterized stroke occupies.
///
/// Ordered so iteration, and therefore canvas writes, are deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Coverage {
    positions: BTreeSet<Position>,
}

impl Coverage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if `pos` was not covered yet.
    #[inline]
    pub fn insert(&mut self, pos: Position) -> bool {
        self.positions.insert(pos)
    }

    #[inline]
    pub fn contains(&self, pos: Position) -> bool {
        self.positions.contains(&pos)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = Position> + '_ {
        self.positions.iter().copied()
    }

    /// Add every position of `other`.
    pub fn union_with(&mut self, other: &Coverage) {
        self.positions.extend(other.positions.iter().copied());
    }
}

impl Extend<Position> for Coverage {
    fn extend<I: IntoIterator<Item = Position>>(&mut self, iter: I) {
        self.positions.extend(iter);
    }
}

impl FromIterator<Position> for Coverage {
    fn from_iter<I: IntoIterator<Item = Position>>(iter: I) -> Self {
        Self {
            positions: iter.into_iter().collect(),
        }
    }
}
