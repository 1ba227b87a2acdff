//! Grayscale gradient estimation and contour directions.
//!
//! The image is reduced to luma, optionally smoothed with a separable
//! Gaussian, and convolved with a 3x3 derivative kernel in each direction.
//! Kernel taps falling outside the image are skipped, so border pixels lean
//! on their interior neighbours.
//!
//! Strokes follow the direction perpendicular to the gradient, i.e. along
//! the isophote through a pixel.

use rayon::prelude::*;

use crate::buffer::PixelBuffer;
use crate::color::Rgb;
use crate::geometry::{Position, Vector2D};

type Kernel3 = [[f64; 3]; 3];

/// Weight of the diagonal taps in the derivative kernel.
const KERNEL_CORNER: f64 = 0.183;

const KERNEL_X: Kernel3 = [
    [KERNEL_CORNER, 0.0, -KERNEL_CORNER],
    [1.0 - 2.0 * KERNEL_CORNER, 0.0, 2.0 * KERNEL_CORNER - 1.0],
    [KERNEL_CORNER, 0.0, -KERNEL_CORNER],
];

const KERNEL_Y: Kernel3 = transpose(KERNEL_X);

/// Stand-in for a vertical derivative of exactly zero.
const MIN_VERTICAL_DERIVATIVE: f64 = 1e-10;

/// Gradient magnitudes below this count as flat. Opposite kernel taps on a
/// constant image leave rounding residue of about `1e-15`.
const FLAT_GRADIENT_EPSILON: f64 = 1e-9;

const fn transpose(k: Kernel3) -> Kernel3 {
    [
        [k[0][0], k[1][0], k[2][0]],
        [k[0][1], k[1][1], k[2][1]],
        [k[0][2], k[1][2], k[2][2]],
    ]
}

/// Horizontal and vertical luma derivatives for every pixel.
#[derive(Debug, Clone, PartialEq)]
pub struct GradientField {
    dx: PixelBuffer<f64>,
    dy: PixelBuffer<f64>,
}

impl GradientField {
    /// Estimate the gradient of `image`.
    ///
    /// `smoothing_sigma > 0` blurs the luma with a Gaussian of that standard
    /// deviation before differentiating.
    pub fn from_image(image: &PixelBuffer<Rgb>, smoothing_sigma: f64) -> Self {
        let mut gray = image.map(Rgb::luma);
        if smoothing_sigma > 0.0 {
            gray = gaussian_blur(&gray, smoothing_sigma);
        }
        Self {
            dx: convolve(&gray, &KERNEL_X),
            dy: convolve(&gray, &KERNEL_Y),
        }
    }

    #[inline]
    pub fn dimensions(&self) -> (usize, usize) {
        self.dx.dimensions()
    }

    /// Horizontal derivative at `pos`.
    #[inline]
    pub fn dx(&self, pos: Position) -> Option<f64> {
        self.dx.get(pos)
    }

    /// Vertical derivative at `pos`.
    #[inline]
    pub fn dy(&self, pos: Position) -> Option<f64> {
        self.dy.get(pos)
    }

    /// Unit vector perpendicular to the gradient at `pos`.
    ///
    /// Returns [`Vector2D::ZERO`] where the image is flat or `pos` lies
    /// outside the field; growth stops on a zero direction.
    pub fn perpendicular_direction(&self, pos: Position) -> Vector2D {
        let (Some(gx), Some(gy)) = (self.dx.get(pos), self.dy.get(pos)) else {
            return Vector2D::ZERO;
        };
        if gx.hypot(gy) < FLAT_GRADIENT_EPSILON {
            return Vector2D::ZERO;
        }
        let gy = if gy == 0.0 { MIN_VERTICAL_DERIVATIVE } else { gy };
        Vector2D::new(1.0, -gx / gy).normalized()
    }

    /// Like [`perpendicular_direction`](Self::perpendicular_direction), but
    /// flipped when needed so it never points against `previous`.
    pub fn perpendicular_direction_from(&self, pos: Position, previous: Vector2D) -> Vector2D {
        let direction = self.perpendicular_direction(pos);
        if direction.dot(&previous) < 0.0 {
            direction.reversed()
        } else {
            direction
        }
    }
}

/// Correlate `image` with a 3x3 kernel, skipping out-of-bounds taps.
fn convolve(image: &PixelBuffer<f64>, kernel: &Kernel3) -> PixelBuffer<f64> {
    let (width, height) = image.dimensions();
    let src = image.as_slice();
    let mut out = image.map(|_| 0.0);

    out.as_mut_slice()
        .par_chunks_mut(width)
        .enumerate()
        .for_each(|(y, row)| {
            for (x, value) in row.iter_mut().enumerate() {
                let mut sum = 0.0;
                for (ky, kernel_row) in kernel.iter().enumerate() {
                    let Some(sy) = (y + ky).checked_sub(1).filter(|&sy| sy < height) else {
                        continue;
                    };
                    for (kx, &weight) in kernel_row.iter().enumerate() {
                        let Some(sx) = (x + kx).checked_sub(1).filter(|&sx| sx < width) else {
                            continue;
                        };
                        sum += src[sy * width + sx] * weight;
                    }
                }
                *value = sum;
            }
        });

    out
}

/// Normalized 1D Gaussian weights covering three standard deviations.
fn gaussian_weights(sigma: f64) -> Vec<f64> {
    let radius = (3.0 * sigma).ceil().max(1.0) as i64;
    let mut weights: Vec<f64> = (-radius..=radius)
        .map(|i| (-((i * i) as f64) / (2.0 * sigma * sigma)).exp())
        .collect();
    let total: f64 = weights.iter().sum();
    for w in &mut weights {
        *w /= total;
    }
    weights
}

/// Separable Gaussian blur. Out-of-bounds taps are dropped and the remaining
/// weights renormalized, so flat images stay flat up to the border.
fn gaussian_blur(image: &PixelBuffer<f64>, sigma: f64) -> PixelBuffer<f64> {
    let (width, height) = image.dimensions();
    let weights = gaussian_weights(sigma);
    let radius = (weights.len() / 2) as i64;

    let sample = |src: &[f64], len: usize, at: usize, stride: usize, base: usize| -> f64 {
        let mut sum = 0.0;
        let mut norm = 0.0;
        for (i, &w) in weights.iter().enumerate() {
            let offset = at as i64 + i as i64 - radius;
            if offset < 0 || offset >= len as i64 {
                continue;
            }
            sum += src[base + offset as usize * stride] * w;
            norm += w;
        }
        if norm > 0.0 {
            sum / norm
        } else {
            0.0
        }
    };

    let src = image.as_slice();
    let mut horizontal = image.map(|_| 0.0);
    horizontal
        .as_mut_slice()
        .par_chunks_mut(width)
        .enumerate()
        .for_each(|(y, row)| {
            for (x, value) in row.iter_mut().enumerate() {
                *value = sample(src, width, x, 1, y * width);
            }
        });

    let src = horizontal.as_slice();
    let mut out = image.map(|_| 0.0);
    out.as_mut_slice()
        .par_chunks_mut(width)
        .enumerate()
        .for_each(|(y, row)| {
            for (x, value) in row.iter_mut().enumerate() {
                *value = sample(src, height, y, width, x);
            }
        });

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gray_image(width: usize, height: usize, f: impl Fn(i32, i32) -> u8) -> PixelBuffer<Rgb> {
        PixelBuffer::from_fn(width, height, |p| {
            let v = f(p.x, p.y);
            Rgb::new(v, v, v)
        })
        .unwrap()
    }

    #[test]
    fn test_kernel_rows_sum_to_one() {
        let weight: f64 = KERNEL_X.iter().map(|row| row[0]).sum();
        assert!((weight - 1.0).abs() < 1e-12);
        assert_eq!(KERNEL_Y[0][1], KERNEL_X[1][0]);
    }

    #[test]
    fn test_flat_interior_has_no_direction() {
        let field = GradientField::from_image(&gray_image(20, 20, |_, _| 50), 0.0);
        for y in 1..19 {
            for x in 1..19 {
                let pos = Position::new(x, y);
                assert!(field.perpendicular_direction(pos).is_zero(), "direction at ({x}, {y})");
            }
        }
    }

    #[test]
    fn test_flat_image_border_is_biased() {
        // Skipped taps leave only the inner half of the kernel at the
        // border, so a flat image still has a gradient there.
        let field = GradientField::from_image(&gray_image(8, 8, |_, _| 90), 0.0);
        let corner = Position::new(0, 0);
        let expected = 90.0 * (KERNEL_CORNER - 1.0);
        assert!((field.dx(corner).unwrap() - expected).abs() < 1e-9);
        assert!((field.dy(corner).unwrap() - expected).abs() < 1e-9);
        assert!(!field.perpendicular_direction(corner).is_zero());

        let edge = Position::new(4, 0);
        assert!(field.dx(edge).unwrap().abs() < 1e-9);
        assert!(!field.perpendicular_direction(edge).is_zero());
    }

    #[test]
    fn test_outside_field_has_no_direction() {
        let field = GradientField::from_image(&gray_image(8, 8, |x, _| (x * 20) as u8), 0.0);
        assert!(field.perpendicular_direction(Position::new(-1, 3)).is_zero());
        assert!(field.perpendicular_direction(Position::new(8, 3)).is_zero());
    }

    #[test]
    fn test_horizontal_ramp_gives_vertical_contour() {
        let field = GradientField::from_image(&gray_image(10, 10, |x, _| (x * 20) as u8), 0.0);
        let pos = Position::new(5, 5);
        assert!((field.dx(pos).unwrap() + 40.0).abs() < 1e-9);
        assert!(field.dy(pos).unwrap().abs() < 1e-9);

        let dir = field.perpendicular_direction(pos);
        assert!(dir.x.abs() < 1e-6, "{dir:?}");
        assert!((dir.y.abs() - 1.0).abs() < 1e-6, "{dir:?}");
    }

    #[test]
    fn test_vertical_ramp_gives_horizontal_contour() {
        let field = GradientField::from_image(&gray_image(10, 10, |_, y| (y * 20) as u8), 0.0);
        let dir = field.perpendicular_direction(Position::new(5, 5));
        assert!((dir.x - 1.0).abs() < 1e-9, "{dir:?}");
        assert!(dir.y.abs() < 1e-9, "{dir:?}");
    }

    #[test]
    fn test_direction_is_unit_length() {
        let field = GradientField::from_image(&gray_image(12, 12, |x, y| (x * 7 + y * 13) as u8), 0.0);
        let dir = field.perpendicular_direction(Position::new(6, 6));
        assert!((dir.length() - 1.0).abs() < 1e-9);
        // Perpendicular to the gradient.
        let gradient = Vector2D::new(field.dx(Position::new(6, 6)).unwrap(), field.dy(Position::new(6, 6)).unwrap());
        assert!(dir.dot(&gradient.normalized()).abs() < 1e-9);
    }

    #[test]
    fn test_direction_continuity_flips_backward() {
        let field = GradientField::from_image(&gray_image(12, 12, |x, y| (x * 7 + y * 13) as u8), 0.0);
        let pos = Position::new(6, 6);
        let raw = field.perpendicular_direction(pos);

        let backward = raw.reversed();
        let continued = field.perpendicular_direction_from(pos, backward);
        assert!(continued.dot(&backward) > 0.0);

        let forward = field.perpendicular_direction_from(pos, raw);
        assert_eq!(forward, raw);
    }

    #[test]
    fn test_smoothing_keeps_flat_image_flat() {
        let image = gray_image(9, 7, |_, _| 120);
        let field = GradientField::from_image(&image, 1.5);
        let pos = Position::new(4, 3);
        assert!(field.dx(pos).unwrap().abs() < 1e-9);
        assert!(field.dy(pos).unwrap().abs() < 1e-9);
    }

    #[test]
    fn test_gaussian_weights_normalized() {
        let weights = gaussian_weights(2.0);
        assert_eq!(weights.len(), 13);
        assert!((weights.iter().sum::<f64>() - 1.0).abs() < 1e-12);
        assert!(weights[6] > weights[5]);
    }
}
