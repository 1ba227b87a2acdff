//! Floating point 2D direction vectors.

use super::position::Position;

/// A 2D vector with `f64` components.
///
/// Used for stroke directions and segment vectors. A zero vector means
/// "no direction"; [`normalize`](Self::normalize) leaves it untouched and
/// callers must check [`is_zero`](Self::is_zero) before stepping along it.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vector2D {
    pub x: f64,
    pub y: f64,
}

impl Vector2D {
    pub const ZERO: Vector2D = Vector2D { x: 0.0, y: 0.0 };

    #[inline]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Vector pointing from `from` to `to`.
    #[inline]
    pub fn between(from: Position, to: Position) -> Self {
        Self {
            x: (to.x - from.x) as f64,
            y: (to.y - from.y) as f64,
        }
    }

    #[inline]
    pub fn length(&self) -> f64 {
        self.x.hypot(self.y)
    }

    #[inline]
    pub fn is_zero(&self) -> bool {
        self.x == 0.0 && self.y == 0.0
    }

    /// Scale to unit length in place. Zero and non-finite vectors become zero.
    pub fn normalize(&mut self) {
        let length = self.length();
        if length == 0.0 || !length.is_finite() {
            *self = Self::ZERO;
            return;
        }
        self.x /= length;
        self.y /= length;
    }

    /// Unit-length copy of this vector (zero stays zero).
    #[inline]
    pub fn normalized(mut self) -> Self {
        self.normalize();
        self
    }

    /// Vector pointing the opposite way.
    #[inline]
    pub fn reversed(self) -> Self {
        Self {
            x: -self.x,
            y: -self.y,
        }
    }

    #[inline]
    pub fn dot(&self, other: &Vector2D) -> f64 {
        self.x * other.x + self.y * other.y
    }

    #[inline]
    pub fn scaled(self, factor: f64) -> Self {
        Self {
            x: self.x * factor,
            y: self.y * factor,
        }
    }

    /// Angle between two vectors in degrees, in `0.0..=180.0`.
    ///
    /// Returns `None` if either vector has zero length.
    pub fn angle_degrees(&self, other: &Vector2D) -> Option<f64> {
        let lengths = self.length() * other.length();
        if lengths == 0.0 {
            return None;
        }
        // Rounding can push the cosine just outside [-1, 1].
        let cos = (self.dot(other) / lengths).clamp(-1.0, 1.0);
        Some(cos.acos().to_degrees())
    }

    /// Position reached by stepping `distance` along this vector from `from`.
    #[inline]
    pub fn step_from(&self, from: Position, distance: f64) -> Position {
        Position::from_f64(
            from.x as f64 + self.x * distance,
            from.y as f64 + self.y * distance,
        )
    }
}
