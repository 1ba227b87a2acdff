//! Straight lines and half-planes used by the stroke rasterizer.

use super::position::Position;

/// Slopes at or below this magnitude count as horizontal.
pub const HORIZONTAL_SLOPE_EPSILON: f64 = 1e-5;

/// A straight line in slope-intercept form, with vertical lines kept as
/// their own variant instead of an infinite slope.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LineFunc {
    /// `y = k * x + b`
    Sloped { k: f64, b: f64 },
    /// `x = x`
    Vertical { x: f64 },
}

impl LineFunc {
    /// Line through two points. Identical points yield a horizontal line.
    pub fn through(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        let dx = x2 - x1;
        if dx == 0.0 {
            if y1 == y2 {
                return LineFunc::Sloped { k: 0.0, b: y1 };
            }
            return LineFunc::Vertical { x: x1 };
        }
        let k = (y2 - y1) / dx;
        LineFunc::Sloped { k, b: y1 - k * x1 }
    }

    /// Line through two pixel positions.
    pub fn through_positions(a: Position, b: Position) -> Self {
        Self::through(a.x as f64, a.y as f64, b.x as f64, b.y as f64)
    }

    /// Line with slope `k` through `(x, y)`.
    pub fn with_slope(k: f64, x: f64, y: f64) -> Self {
        if !k.is_finite() {
            return LineFunc::Vertical { x };
        }
        LineFunc::Sloped { k, b: y - k * x }
    }

    pub fn is_vertical(&self) -> bool {
        matches!(self, LineFunc::Vertical { .. })
    }

    pub fn is_horizontal(&self) -> bool {
        matches!(self, LineFunc::Sloped { k, .. } if k.abs() <= HORIZONTAL_SLOPE_EPSILON)
    }

    /// Slope, infinite for vertical lines.
    pub fn slope(&self) -> f64 {
        match *self {
            LineFunc::Sloped { k, .. } => k,
            LineFunc::Vertical { .. } => f64::INFINITY,
        }
    }

    /// `y` at column `x`; `None` for vertical lines.
    pub fn y_at(&self, x: f64) -> Option<f64> {
        match *self {
            LineFunc::Sloped { k, b } => Some(k * x + b),
            LineFunc::Vertical { .. } => None,
        }
    }

    /// `x` at row `y`; `None` for exactly horizontal lines.
    pub fn x_at(&self, y: f64) -> Option<f64> {
        match *self {
            LineFunc::Sloped { k, b } if k != 0.0 => Some((y - b) / k),
            LineFunc::Sloped { .. } => None,
            LineFunc::Vertical { x } => Some(x),
        }
    }

    /// Perpendicular line passing through `(x, y)`.
    pub fn perpendicular_through(&self, x: f64, y: f64) -> Self {
        match *self {
            LineFunc::Sloped { k, .. } if k == 0.0 => LineFunc::Vertical { x },
            LineFunc::Sloped { k, .. } => LineFunc::with_slope(-1.0 / k, x, y),
            LineFunc::Vertical { .. } => LineFunc::Sloped { k: 0.0, b: y },
        }
    }

    /// Parallel line moved vertically by `delta` (horizontally for vertical lines).
    pub fn shifted(&self, delta: f64) -> Self {
        match *self {
            LineFunc::Sloped { k, b } => LineFunc::Sloped { k, b: b + delta },
            LineFunc::Vertical { x } => LineFunc::Vertical { x: x + delta },
        }
    }
}

/// The closed half-plane on one side of a directed line.
///
/// `value(p) >= 0` means `p` is inside (up to rounding tolerance applied by
/// the caller).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HalfPlane {
    nx: f64,
    ny: f64,
    c: f64,
}

impl HalfPlane {
    /// Half-plane bounded by the line through `p1` and `p2`, oriented so that
    /// `inside` lies in it. Returns `None` if `p1 == p2`.
    pub fn bounded_by(p1: (f64, f64), p2: (f64, f64), inside: (f64, f64)) -> Option<Self> {
        let (dx, dy) = (p2.0 - p1.0, p2.1 - p1.1);
        let length = dx.hypot(dy);
        if length == 0.0 {
            return None;
        }
        let (nx, ny) = (-dy / length, dx / length);
        let mut plane = HalfPlane {
            nx,
            ny,
            c: -(nx * p1.0 + ny * p1.1),
        };
        if plane.value(inside.0, inside.1) < 0.0 {
            plane = HalfPlane {
                nx: -plane.nx,
                ny: -plane.ny,
                c: -plane.c,
            };
        }
        Some(plane)
    }

    /// Signed distance from the boundary, positive inside.
    #[inline]
    pub fn value(&self, x: f64, y: f64) -> f64 {
        self.nx * x + self.ny * y + self.c
    }
}
