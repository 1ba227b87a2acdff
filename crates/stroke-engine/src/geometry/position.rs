//! Integer pixel positions and axis-aligned bounds.

/// An integer pixel coordinate.
///
/// `x` grows to the right and `y` grows downward (image row order).
/// Positions may lie outside a buffer; buffers check membership before
/// indexing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Position {
    /// Column.
    pub x: i32,
    /// Row.
    pub y: i32,
}

impl Position {
    /// Create a position from its column and row.
    #[inline]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Position offset by `(dx, dy)`.
    #[inline]
    pub const fn offset(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// Squared Euclidean distance to `other`.
    #[inline]
    pub fn distance_squared(self, other: Position) -> i64 {
        let dx = (other.x - self.x) as i64;
        let dy = (other.y - self.y) as i64;
        dx * dx + dy * dy
    }

    /// Euclidean distance to `other`.
    #[inline]
    pub fn distance(self, other: Position) -> f64 {
        (self.distance_squared(other) as f64).sqrt()
    }

    /// Round a floating point coordinate to the nearest pixel.
    #[inline]
    pub fn from_f64(x: f64, y: f64) -> Self {
        Self {
            x: x.round() as i32,
            y: y.round() as i32,
        }
    }
}

impl From<(i32, i32)> for Position {
    fn from((x, y): (i32, i32)) -> Self {
        Self { x, y }
    }
}

/// An inclusive axis-aligned integer rectangle.
///
/// Orientation is fixed crate-wide: `left_x <= right_x` and
/// `up_y <= down_y`, since rows grow downward.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bounds {
    /// Smallest column inside the rectangle.
    pub left_x: i32,
    /// Largest column inside the rectangle.
    pub right_x: i32,
    /// Smallest row inside the rectangle.
    pub up_y: i32,
    /// Largest row inside the rectangle.
    pub down_y: i32,
}

impl Bounds {
    /// Create bounds from their four edges, normalizing the order.
    pub fn new(left_x: i32, right_x: i32, up_y: i32, down_y: i32) -> Self {
        Self {
            left_x: left_x.min(right_x),
            right_x: left_x.max(right_x),
            up_y: up_y.min(down_y),
            down_y: up_y.max(down_y),
        }
    }

    /// Bounds covering a `width` x `height` buffer anchored at the origin.
    ///
    /// Empty buffers produce an inverted rectangle that contains nothing.
    pub fn of_size(width: usize, height: usize) -> Self {
        Self {
            left_x: 0,
            right_x: width as i32 - 1,
            up_y: 0,
            down_y: height as i32 - 1,
        }
    }

    /// Bounds of two disks centered at `a` and `b`.
    pub fn enclosing(a: Position, radius_a: u32, b: Position, radius_b: u32) -> Self {
        let (ra, rb) = (radius_a as i32, radius_b as i32);
        Self {
            left_x: (a.x - ra).min(b.x - rb),
            right_x: (a.x + ra).max(b.x + rb),
            up_y: (a.y - ra).min(b.y - rb),
            down_y: (a.y + ra).max(b.y + rb),
        }
    }

    #[inline]
    pub fn x_in_bounds(&self, x: i32) -> bool {
        self.left_x <= x && x <= self.right_x
    }

    #[inline]
    pub fn y_in_bounds(&self, y: i32) -> bool {
        self.up_y <= y && y <= self.down_y
    }

    /// Whether `pos` lies inside the rectangle (edges included).
    #[inline]
    pub fn contains(&self, pos: Position) -> bool {
        self.x_in_bounds(pos.x) && self.y_in_bounds(pos.y)
    }

    /// Overlap of two rectangles, `None` when they are disjoint.
    pub fn intersect(&self, other: &Bounds) -> Option<Bounds> {
        let clipped = Bounds {
            left_x: self.left_x.max(other.left_x),
            right_x: self.right_x.min(other.right_x),
            up_y: self.up_y.max(other.up_y),
            down_y: self.down_y.min(other.down_y),
        };
        (clipped.left_x <= clipped.right_x && clipped.up_y <= clipped.down_y).then_some(clipped)
    }

    pub fn width(&self) -> i32 {
        self.right_x - self.left_x + 1
    }

    pub fn height(&self) -> i32 {
        self.down_y - self.up_y + 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounds_new_normalizes_order() {
        let bounds = Bounds::new(10, 2, 7, 1);
        assert_eq!(bounds.left_x, 2);
        assert_eq!(bounds.right_x, 10);
        assert_eq!(bounds.up_y, 1);
        assert_eq!(bounds.down_y, 7);
    }

    #[test]
    fn test_bounds_contains_edges() {
        let bounds = Bounds::of_size(4, 3);
        assert!(bounds.contains(Position::new(0, 0)));
        assert!(bounds.contains(Position::new(3, 2)));
        assert!(!bounds.contains(Position::new(4, 2)));
        assert!(!bounds.contains(Position::new(0, -1)));
    }

    #[test]
    fn test_empty_buffer_bounds_contain_nothing() {
        let bounds = Bounds::of_size(0, 0);
        assert!(!bounds.contains(Position::new(0, 0)));
    }

    #[test]
    fn test_enclosing_two_disks() {
        let bounds = Bounds::enclosing(Position::new(5, 5), 2, Position::new(10, 3), 4);
        assert_eq!(bounds, Bounds::new(3, 14, -1, 7));
    }

    #[test]
    fn test_intersect() {
        let a = Bounds::new(0, 9, 0, 9);
        let b = Bounds::new(5, 20, -3, 4);
        assert_eq!(a.intersect(&b), Some(Bounds::new(5, 9, 0, 4)));

        let far = Bounds::new(30, 40, 30, 40);
        assert_eq!(a.intersect(&far), None);
    }

    #[test]
    fn test_distance() {
        let a = Position::new(1, 1);
        let b = Position::new(4, 5);
        assert_eq!(a.distance_squared(b), 25);
        assert!((a.distance(b) - 5.0).abs() < 1e-12);
    }

    #[test]
    fn test_from_f64_rounds() {
        assert_eq!(Position::from_f64(2.5, -1.4), Position::new(3, -1));
        assert_eq!(Position::from_f64(-2.6, 0.49), Position::new(-3, 0));
    }
}
