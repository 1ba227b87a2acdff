//! Candidate stroke search.
//!
//! A stroke starts where the canvas is furthest from the reference and then
//! walks along the local contour one brush diameter at a time. Every step
//! picks the widest radius that keeps the sampled reference color coherent,
//! and growth ends on a flat gradient, the canvas edge, a sharp bend, a
//! color drift or the length limit.

use rand::Rng;

use crate::buffer::PixelBuffer;
use crate::color::Rgb;
use crate::difference::DifferenceMap;
use crate::geometry::{Bounds, Position, Vector2D};
use crate::gradient::GradientField;
use crate::painter::PaintSettings;

use super::pivot::{StrokePivot, StrokePositions};

/// Grows pivot chains over a reference image.
#[derive(Debug, Clone, Copy)]
pub struct StrokeGrower<'a> {
    reference: &'a PixelBuffer<Rgb>,
    gradient: &'a GradientField,
    settings: &'a PaintSettings,
}

impl<'a> StrokeGrower<'a> {
    pub fn new(reference: &'a PixelBuffer<Rgb>, gradient: &'a GradientField, settings: &'a PaintSettings) -> Self {
        Self {
            reference,
            gradient,
            settings,
        }
    }

    /// Pick a start pivot and grow one candidate stroke from it.
    pub fn grow<R: Rng + ?Sized>(&self, rng: &mut R, diff: &DifferenceMap) -> StrokePositions {
        let start = self.pick_start(rng, diff);
        self.grow_from(start)
    }

    /// Best of `start_candidates` random positions by local error.
    ///
    /// Ties keep the first position drawn.
    pub fn pick_start<R: Rng + ?Sized>(&self, rng: &mut R, diff: &DifferenceMap) -> StrokePivot {
        let (width, height) = self.reference.dimensions();
        let radius = self.settings.start_brush_radius;

        let mut best = Position::default();
        let mut best_sum = None;
        for _ in 0..self.settings.start_candidates.max(1) {
            let pos = Position::new(rng.gen_range(0..width) as i32, rng.gen_range(0..height) as i32);
            let sum = diff.sum_within_circle(pos, radius);
            if best_sum.map_or(true, |best| sum > best) {
                best = pos;
                best_sum = Some(sum);
            }
        }
        StrokePivot::new(best, radius)
    }

    /// Grow a chain from `start` until one of the stop conditions fires.
    pub fn grow_from(&self, start: StrokePivot) -> StrokePositions {
        let bounds = self.reference.bounds();
        let settings = self.settings;

        let mut chain = StrokePositions::new(start);
        let first_error = self.disk_error(start);
        let mut error_sum = first_error;
        let mut max_radius = start.radius;
        let mut direction = self.gradient.perpendicular_direction(start.center);

        loop {
            let last = chain.last();
            direction = self.gradient.perpendicular_direction_from(last.center, direction);
            if direction.is_zero() {
                break;
            }

            let step = (2 * last.radius + 1) as f64;
            let next = direction.step_from(last.center, step);
            if !self.is_position_nice(&bounds, &chain, next) {
                break;
            }

            let (pivot, error) = self.next_pivot(next, last.radius);
            chain.push(pivot);
            max_radius = max_radius.max(pivot.radius);
            error_sum += error;

            let mean_error = error_sum / chain.len() as f64;
            if mean_error > first_error * settings.max_color_diff_in_stroke_ratio {
                break;
            }
            if chain.length() > (2 * max_radius + 1) as f64 * settings.max_length_to_width_ratio {
                break;
            }
        }

        tracing::trace!(
            pivots = chain.len(),
            x = start.center.x,
            y = start.center.y,
            "grew candidate"
        );
        chain
    }

    /// Inside the image and not bending too sharply.
    fn is_position_nice(&self, bounds: &Bounds, chain: &StrokePositions, next: Position) -> bool {
        if !bounds.contains(next) {
            return false;
        }
        let Some(before) = chain.second_to_last() else {
            return true;
        };
        let last = chain.last();
        let previous = Vector2D::between(before.center, last.center);
        let current = Vector2D::between(last.center, next);
        match previous.angle_degrees(&current) {
            Some(angle) => angle < self.settings.max_bend_angle_degrees,
            None => false,
        }
    }

    /// Widest radius in the allowed band whose disk stays color coherent.
    ///
    /// Radii are tried from the smallest upward and the search stops at the
    /// first one whose error exceeds the smallest radius's error times the
    /// brush ratio.
    fn next_pivot(&self, center: Position, previous_radius: u32) -> (StrokePivot, f64) {
        let (min_radius, max_radius) = self.radius_band(previous_radius);

        let mut pivot = StrokePivot::new(center, min_radius);
        let first_error = self.disk_error(pivot);
        let mut error = first_error;
        for radius in min_radius + 1..=max_radius {
            let candidate = StrokePivot::new(center, radius);
            let candidate_error = self.disk_error(candidate);
            if candidate_error > first_error * self.settings.max_color_diff_in_brush_ratio {
                break;
            }
            pivot = candidate;
            error = candidate_error;
        }
        (pivot, error)
    }

    /// Inclusive radius range reachable from `previous_radius`.
    pub fn radius_band(&self, previous_radius: u32) -> (u32, u32) {
        let delta = self.settings.max_radius_delta_ratio;
        let previous = previous_radius as f64;
        let min = ((previous * (1.0 - delta)).floor() as u32).max(1);
        let max = ((previous * (1.0 + delta)).floor() as u32).max(min);
        (min, max)
    }

    /// Sum of squared channel deviations from the mean reference color over
    /// the pivot's disk.
    pub fn disk_error(&self, pivot: StrokePivot) -> f64 {
        let mut sums = [0.0f64; 3];
        let mut count = 0usize;
        for (_, color) in self.reference.circle(pivot.center, pivot.radius) {
            for (sum, channel) in sums.iter_mut().zip(color.channels()) {
                *sum += channel as f64;
            }
            count += 1;
        }
        if count == 0 {
            return 0.0;
        }
        let mean = sums.map(|s| s / count as f64);

        self.reference
            .circle(pivot.center, pivot.radius)
            .map(|(_, color)| {
                color
                    .channels()
                    .iter()
                    .zip(mean)
                    .map(|(&c, m)| (c as f64 - m).powi(2))
                    .sum::<f64>()
            })
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn gray_image(width: usize, height: usize, f: impl Fn(i32, i32) -> u8) -> PixelBuffer<Rgb> {
        PixelBuffer::from_fn(width, height, |p| {
            let v = f(p.x, p.y);
            Rgb::new(v, v, v)
        })
        .unwrap()
    }

    #[test]
    fn test_disk_error_zero_on_flat_color() {
        let reference = gray_image(20, 20, |_, _| 100);
        let gradient = GradientField::from_image(&reference, 0.0);
        let settings = PaintSettings::default();
        let grower = StrokeGrower::new(&reference, &gradient, &settings);
        assert_eq!(grower.disk_error(StrokePivot::new(Position::new(10, 10), 4)), 0.0);
    }

    #[test]
    fn test_disk_error_two_tone() {
        // Left half 0, right half 10: one r=1 disk at the boundary.
        let reference = gray_image(4, 3, |x, _| if x >= 2 { 10 } else { 0 });
        let gradient = GradientField::from_image(&reference, 0.0);
        let settings = PaintSettings::default();
        let grower = StrokeGrower::new(&reference, &gradient, &settings);

        // Disk at (1,1): values 0,0,0,0 and 10 at (2,1); mean 2 per channel.
        let error = grower.disk_error(StrokePivot::new(Position::new(1, 1), 1));
        let per_channel = 4.0 * 4.0 + 64.0;
        assert!((error - 3.0 * per_channel).abs() < 1e-9);
    }

    #[test]
    fn test_radius_band() {
        let reference = gray_image(4, 4, |_, _| 0);
        let gradient = GradientField::from_image(&reference, 0.0);
        let settings = PaintSettings::default();
        let grower = StrokeGrower::new(&reference, &gradient, &settings);

        assert_eq!(grower.radius_band(6), (4, 7));
        assert_eq!(grower.radius_band(10), (8, 12));
        assert_eq!(grower.radius_band(1), (1, 1));
    }

    #[test]
    fn test_pick_start_prefers_high_error() {
        let reference = gray_image(30, 30, |_, _| 0);
        let canvas = PixelBuffer::from_fn(30, 30, |p| {
            if p.x >= 20 && p.y >= 20 {
                Rgb::WHITE
            } else {
                Rgb::BLACK
            }
        })
        .unwrap();
        let diff = DifferenceMap::new(&reference, &canvas).unwrap();
        let gradient = GradientField::from_image(&reference, 0.0);
        let settings = PaintSettings::new().start_brush_radius(3).start_candidates(400);
        let grower = StrokeGrower::new(&reference, &gradient, &settings);

        let mut rng = StdRng::seed_from_u64(1);
        let start = grower.pick_start(&mut rng, &diff);
        assert_eq!(start.radius, 3);
        assert!(start.center.x >= 17 && start.center.y >= 17, "{start:?}");
    }

    #[test]
    fn test_flat_reference_yields_single_dab() {
        let reference = gray_image(20, 20, |_, _| 50);
        let gradient = GradientField::from_image(&reference, 0.0);
        let settings = PaintSettings::new().start_brush_radius(2);
        let grower = StrokeGrower::new(&reference, &gradient, &settings);

        let chain = grower.grow_from(StrokePivot::new(Position::new(10, 10), 2));
        assert_eq!(chain.len(), 1);
    }

    #[test]
    fn test_stroke_follows_contour() {
        // Vertical ramp: contours are horizontal lines.
        let reference = gray_image(80, 40, |_, y| (y * 6) as u8);
        let gradient = GradientField::from_image(&reference, 0.0);
        let settings = PaintSettings::new().start_brush_radius(2).max_color_diff_in_stroke_ratio(10.0);
        let grower = StrokeGrower::new(&reference, &gradient, &settings);

        let chain = grower.grow_from(StrokePivot::new(Position::new(10, 20), 2));
        assert!(chain.len() > 2, "{chain:?}");
        for pivot in chain.pivots() {
            assert_eq!(pivot.center.y, 20);
            assert!(pivot.radius >= 1 && pivot.radius <= 3);
        }
        let limit = (2 * chain.max_radius() + 1) as f64 * settings.max_length_to_width_ratio;
        // Growth stops at the first step past the limit.
        let before_last = StrokePositions::from_pivots(chain.pivots()[..chain.len() - 1].to_vec()).unwrap();
        assert!(before_last.length() <= limit || chain.last().center.x + 8 > 79);
    }

    #[test]
    fn test_stroke_never_leaves_image() {
        let reference = gray_image(25, 25, |x, y| (x * 9 + y * 4) as u8);
        let gradient = GradientField::from_image(&reference, 0.0);
        let settings = PaintSettings::new().start_brush_radius(2).max_color_diff_in_stroke_ratio(50.0);
        let grower = StrokeGrower::new(&reference, &gradient, &settings);
        let canvas = PixelBuffer::new(25, 25, Rgb::WHITE).unwrap();
        let diff = DifferenceMap::new(&reference, &canvas).unwrap();

        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..50 {
            let chain = grower.grow(&mut rng, &diff);
            assert!(chain.pivots().iter().all(|p| reference.contains(p.center)));
        }
    }

    #[test]
    fn test_bend_limit_respected() {
        // Concentric rings force the contour to curve.
        let reference = gray_image(60, 60, |x, y| {
            let d = (((x - 30).pow(2) + (y - 30).pow(2)) as f64).sqrt();
            (d * 8.0).min(255.0) as u8
        });
        let gradient = GradientField::from_image(&reference, 0.0);
        let settings = PaintSettings::new()
            .start_brush_radius(2)
            .max_bend_angle_degrees(30.0)
            .max_color_diff_in_stroke_ratio(100.0);
        let grower = StrokeGrower::new(&reference, &gradient, &settings);

        let chain = grower.grow_from(StrokePivot::new(Position::new(30, 16), 2));
        for window in chain.pivots().windows(3) {
            let a = Vector2D::between(window[0].center, window[1].center);
            let b = Vector2D::between(window[1].center, window[2].center);
            assert!(a.angle_degrees(&b).unwrap() < 30.0);
        }
    }
}
