//! Dense 2D sample storage with windowed read views.

use crate::error::EngineError;
use crate::geometry::{Bounds, Position};

/// A row-major 2D buffer of samples.
///
/// Created once per image, mutated in place, never resized. `T` is [`Rgb`]
/// for images, an unsigned error for the difference map and `f64` for the
/// gradient channels.
///
/// [`Rgb`]: crate::color::Rgb
#[derive(Debug, Clone, PartialEq)]
pub struct PixelBuffer<T> {
    width: usize,
    height: usize,
    data: Vec<T>,
}

/// Shape of a [`Window`] around a center pixel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowShape {
    /// Pixels with `dx² + dy² <= radius²`.
    Circle,
    /// Pixels with `|dx| <= radius` and `|dy| <= radius`.
    Square,
}

impl<T: Copy> PixelBuffer<T> {
    /// Buffer of `width` x `height` samples, all set to `fill`.
    pub fn new(width: usize, height: usize, fill: T) -> Result<Self, EngineError> {
        if width == 0 || height == 0 {
            return Err(EngineError::EmptyImage);
        }
        Ok(Self {
            width,
            height,
            data: vec![fill; width * height],
        })
    }

    /// Wrap row-major samples.
    pub fn from_vec(width: usize, height: usize, data: Vec<T>) -> Result<Self, EngineError> {
        if width == 0 || height == 0 {
            return Err(EngineError::EmptyImage);
        }
        if data.len() != width * height {
            return Err(EngineError::BufferLength {
                expected: width * height,
                actual: data.len(),
            });
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Buffer whose sample at each position is `f(position)`.
    pub fn from_fn<F>(width: usize, height: usize, mut f: F) -> Result<Self, EngineError>
    where
        F: FnMut(Position) -> T,
    {
        if width == 0 || height == 0 {
            return Err(EngineError::EmptyImage);
        }
        let mut data = Vec::with_capacity(width * height);
        for y in 0..height {
            for x in 0..width {
                data.push(f(Position::new(x as i32, y as i32)));
            }
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Same-sized buffer with every sample mapped through `f`.
    pub fn map<U: Copy, F: Fn(T) -> U>(&self, f: F) -> PixelBuffer<U> {
        PixelBuffer {
            width: self.width,
            height: self.height,
            data: self.data.iter().map(|&v| f(v)).collect(),
        }
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn dimensions(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    #[inline]
    pub fn bounds(&self) -> Bounds {
        Bounds::of_size(self.width, self.height)
    }

    #[inline]
    pub fn contains(&self, pos: Position) -> bool {
        pos.x >= 0 && pos.y >= 0 && (pos.x as usize) < self.width && (pos.y as usize) < self.height
    }

    #[inline]
    fn index(&self, pos: Position) -> Option<usize> {
        self.contains(pos)
            .then(|| pos.y as usize * self.width + pos.x as usize)
    }

    /// Sample at `pos`, `None` outside the buffer.
    #[inline]
    pub fn get(&self, pos: Position) -> Option<T> {
        self.index(pos).map(|i| self.data[i])
    }

    /// Overwrite the sample at `pos`, returning the previous value.
    /// Writes outside the buffer are ignored and return `None`.
    #[inline]
    pub fn replace(&mut self, pos: Position, value: T) -> Option<T> {
        let i = self.index(pos)?;
        Some(std::mem::replace(&mut self.data[i], value))
    }

    /// Row-major samples.
    #[inline]
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    #[inline]
    pub(crate) fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.data
    }

    /// Read view of the pixels around `center`, clipped to the buffer.
    pub fn window(&self, center: Position, radius: u32, shape: WindowShape) -> Window<'_, T> {
        let r = radius as i32;
        let area = Bounds::new(center.x - r, center.x + r, center.y - r, center.y + r)
            .intersect(&self.bounds());
        Window {
            buffer: self,
            center,
            radius_squared: radius as i64 * radius as i64,
            shape,
            area,
            next: area.map(|a| Position::new(a.left_x, a.up_y)),
        }
    }

    /// Shorthand for a circular [`window`](Self::window).
    pub fn circle(&self, center: Position, radius: u32) -> Window<'_, T> {
        self.window(center, radius, WindowShape::Circle)
    }

    /// Whether `other` has the same dimensions.
    pub fn ensure_same_size<U>(&self, other: &PixelBuffer<U>) -> Result<(), EngineError> {
        if self.dimensions() != (other.width, other.height) {
            return Err(EngineError::SizeMismatch {
                expected: self.dimensions(),
                actual: (other.width, other.height),
            });
        }
        Ok(())
    }
}

/// Iterator over `(position, sample)` pairs inside a circle or square.
///
/// Yields in row-major order and never leaves the buffer.
pub struct Window<'a, T> {
    buffer: &'a PixelBuffer<T>,
    center: Position,
    radius_squared: i64,
    shape: WindowShape,
    area: Option<Bounds>,
    next: Option<Position>,
}

impl<T: Copy> Iterator for Window<'_, T> {
    type Item = (Position, T);

    fn next(&mut self) -> Option<Self::Item> {
        let area = self.area?;
        loop {
            let pos = self.next?;
            self.next = if pos.x < area.right_x {
                Some(pos.offset(1, 0))
            } else if pos.y < area.down_y {
                Some(Position::new(area.left_x, pos.y + 1))
            } else {
                None
            };

            let inside = match self.shape {
                WindowShape::Square => true,
                WindowShape::Circle => self.center.distance_squared(pos) <= self.radius_squared,
            };
            if inside {
                let i = pos.y as usize * self.buffer.width + pos.x as usize;
                return Some((pos, self.buffer.data[i]));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_rejects_empty() {
        assert_eq!(PixelBuffer::new(0, 5, 0u8), Err(EngineError::EmptyImage));
        assert_eq!(PixelBuffer::new(5, 0, 0u8), Err(EngineError::EmptyImage));
    }

    #[test]
    fn test_from_vec_checks_length() {
        assert_eq!(
            PixelBuffer::from_vec(3, 2, vec![0u8; 5]),
            Err(EngineError::BufferLength {
                expected: 6,
                actual: 5
            })
        );
        assert!(PixelBuffer::from_vec(3, 2, vec![0u8; 6]).is_ok());
    }

    #[test]
    fn test_get_and_replace() {
        let mut buffer = PixelBuffer::new(4, 3, 0u32).unwrap();
        assert_eq!(buffer.replace(Position::new(3, 2), 7), Some(0));
        assert_eq!(buffer.get(Position::new(3, 2)), Some(7));
        assert_eq!(buffer.as_slice()[11], 7);

        assert_eq!(buffer.replace(Position::new(4, 0), 1), None);
        assert_eq!(buffer.get(Position::new(-1, 0)), None);
    }

    #[test]
    fn test_from_fn_row_major() {
        let buffer = PixelBuffer::from_fn(3, 2, |p| p.x + 10 * p.y).unwrap();
        assert_eq!(buffer.as_slice(), &[0, 1, 2, 10, 11, 12]);
    }

    #[test]
    fn test_circle_window_interior() {
        let buffer = PixelBuffer::new(20, 20, 1u32).unwrap();
        let count = buffer.circle(Position::new(10, 10), 3).count();
        assert_eq!(count, 29);
        for (pos, _) in buffer.circle(Position::new(10, 10), 3) {
            assert!(Position::new(10, 10).distance_squared(pos) <= 9);
        }
    }

    #[test]
    fn test_square_window_clipped_at_corner() {
        let buffer = PixelBuffer::new(20, 20, 1u32).unwrap();
        let positions: Vec<Position> = buffer
            .window(Position::new(0, 0), 2, WindowShape::Square)
            .map(|(p, _)| p)
            .collect();
        assert_eq!(positions.len(), 9);
        assert_eq!(positions[0], Position::new(0, 0));
        assert_eq!(positions[8], Position::new(2, 2));
    }

    #[test]
    fn test_window_fully_outside_is_empty() {
        let buffer = PixelBuffer::new(5, 5, 1u32).unwrap();
        assert_eq!(buffer.circle(Position::new(50, 50), 3).count(), 0);
    }

    #[test]
    fn test_radius_zero_window_is_center() {
        let buffer = PixelBuffer::from_fn(5, 5, |p| p.x * p.y).unwrap();
        let samples: Vec<_> = buffer.circle(Position::new(2, 3), 0).collect();
        assert_eq!(samples, vec![(Position::new(2, 3), 6)]);
    }

    #[test]
    fn test_ensure_same_size() {
        let a = PixelBuffer::new(4, 4, 0u8).unwrap();
        let b = PixelBuffer::new(4, 5, 0.0f64).unwrap();
        assert_eq!(
            a.ensure_same_size(&b),
            Err(EngineError::SizeMismatch {
                expected: (4, 4),
                actual: (4, 5)
            })
        );
        assert!(a.ensure_same_size(&a.clone()).is_ok());
    }
}
