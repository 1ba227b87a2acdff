//! Pivot chain to pixel coverage.
//!
//! Each pair of consecutive pivots is filled as the convex hull of their two
//! disks: a band tangent to both circles plus a round cap at each end. The
//! per-segment sets are unioned, so shared caps collapse.
//!
//! Segments are put into a canonical order before rasterizing, which makes
//! the result independent of pivot direction.

use crate::geometry::{Bounds, HalfPlane, LineFunc, Position};

use super::pivot::{Coverage, StrokePivot, StrokePositions};

/// Tolerance for points lying exactly on a boundary line.
const EDGE_EPSILON: f64 = 1e-9;

/// Rasterizes pivot chains, clipping to fixed bounds.
#[derive(Debug, Clone, Copy)]
pub struct StrokeRasterizer {
    clip: Bounds,
}

impl StrokeRasterizer {
    /// Rasterizer that never emits positions outside `clip`.
    pub fn new(clip: Bounds) -> Self {
        Self { clip }
    }

    /// Rasterizer clipped to a `width` x `height` image.
    pub fn for_size(width: usize, height: usize) -> Self {
        Self::new(Bounds::of_size(width, height))
    }

    /// All pixels covered by `chain`.
    pub fn rasterize(&self, chain: &StrokePositions) -> Coverage {
        let mut coverage = Coverage::new();
        let pivots = chain.pivots();
        if let [single] = pivots {
            self.add_disk(*single, &mut coverage);
            return coverage;
        }
        for pair in pivots.windows(2) {
            self.add_segment(pair[0], pair[1], &mut coverage);
        }
        coverage
    }

    /// Add the hull of the two pivot disks to `coverage`.
    pub fn add_segment(&self, a: StrokePivot, b: StrokePivot, coverage: &mut Coverage) {
        let (a, b) = if (a.center, a.radius) <= (b.center, b.radius) {
            (a, b)
        } else {
            (b, a)
        };

        if a.center != b.center {
            if let Some(area) = Bounds::enclosing(a.center, a.radius, b.center, b.radius).intersect(&self.clip) {
                if a.radius == b.radius {
                    self.add_parallel_band(a.center, b.center, a.radius, area, coverage);
                } else {
                    self.add_tapered_band(a, b, area, coverage);
                }
            }
        }

        self.add_disk(a, coverage);
        self.add_disk(b, coverage);
    }

    /// Round cap: every offset with `dx² + dy² <= r²`.
    fn add_disk(&self, pivot: StrokePivot, coverage: &mut Coverage) {
        let r = pivot.radius as i32;
        let r_squared = pivot.radius as i64 * pivot.radius as i64;
        for dy in -r..=r {
            let y = pivot.center.y + dy;
            if !self.clip.y_in_bounds(y) {
                continue;
            }
            for dx in -r..=r {
                let x = pivot.center.x + dx;
                if self.clip.x_in_bounds(x) && (dx as i64 * dx as i64 + dy as i64 * dy as i64) <= r_squared {
                    coverage.insert(Position::new(x, y));
                }
            }
        }
    }

    /// Band of constant half-width `radius` between two centers.
    fn add_parallel_band(&self, a: Position, b: Position, radius: u32, area: Bounds, coverage: &mut Coverage) {
        let line = LineFunc::through_positions(a, b);
        let r = radius as i32;

        if line.is_vertical() {
            let (y0, y1) = (a.y.min(b.y), a.y.max(b.y));
            for y in y0..=y1 {
                for dx in -r..=r {
                    self.insert_in(Position::new(a.x + dx, y), area, coverage);
                }
            }
            return;
        }

        if line.is_horizontal() {
            let k = line.slope();
            for x in a.x.min(b.x)..=a.x.max(b.x) {
                let y = a.y + (k * (x - a.x) as f64).round() as i32;
                for dy in -r..=r {
                    self.insert_in(Position::new(x, y + dy), area, coverage);
                }
            }
            return;
        }

        // Oblique: between the two parallel edges and the two
        // perpendiculars through the centers.
        let k = line.slope();
        let offset = radius as f64 * (1.0 + k * k).sqrt();
        let upper = line.shifted(-offset);
        let lower = line.shifted(offset);
        let cap_a = line.perpendicular_through(a.x as f64, a.y as f64);
        let cap_b = line.perpendicular_through(b.x as f64, b.y as f64);

        for x in area.left_x..=area.right_x {
            let xf = x as f64;
            let (Some(top), Some(bottom), Some(ca), Some(cb)) =
                (upper.y_at(xf), lower.y_at(xf), cap_a.y_at(xf), cap_b.y_at(xf))
            else {
                continue;
            };
            let lo = top.max(ca.min(cb));
            let hi = bottom.min(ca.max(cb));
            self.insert_column(x, lo, hi, area, coverage);
        }
    }

    /// Band bounded by the two external tangents of circles with different
    /// radii.
    fn add_tapered_band(&self, a: StrokePivot, b: StrokePivot, area: Bounds, coverage: &mut Coverage) {
        let (ax, ay) = (a.center.x as f64, a.center.y as f64);
        let (bx, by) = (b.center.x as f64, b.center.y as f64);
        let (ra, rb) = (a.radius as f64, b.radius as f64);
        let distance = (bx - ax).hypot(by - ay);

        // One disk contains the other; the caps already cover the hull.
        if distance <= (ra - rb).abs() {
            return;
        }

        let center_angle = (by - ay).atan2(bx - ax);
        let to_tangent = ((ra - rb) / distance).clamp(-1.0, 1.0).acos();
        let touch = |cx: f64, cy: f64, r: f64, angle: f64| (cx + r * angle.cos(), cy + r * angle.sin());

        let upper_a = touch(ax, ay, ra, center_angle + to_tangent);
        let upper_b = touch(bx, by, rb, center_angle + to_tangent);
        let lower_a = touch(ax, ay, ra, center_angle - to_tangent);
        let lower_b = touch(bx, by, rb, center_angle - to_tangent);

        let inside = (
            (upper_a.0 + upper_b.0 + lower_a.0 + lower_b.0) / 4.0,
            (upper_a.1 + upper_b.1 + lower_a.1 + lower_b.1) / 4.0,
        );
        let planes = [
            HalfPlane::bounded_by(upper_a, upper_b, inside),
            HalfPlane::bounded_by(lower_a, lower_b, inside),
            HalfPlane::bounded_by(upper_a, lower_a, inside),
            HalfPlane::bounded_by(upper_b, lower_b, inside),
        ];
        let Some(planes) = planes.into_iter().collect::<Option<Vec<_>>>() else {
            return;
        };

        for y in area.up_y..=area.down_y {
            for x in area.left_x..=area.right_x {
                let (xf, yf) = (x as f64, y as f64);
                if planes.iter().all(|plane| plane.value(xf, yf) >= -EDGE_EPSILON) {
                    coverage.insert(Position::new(x, y));
                }
            }
        }
    }

    fn insert_column(&self, x: i32, lo: f64, hi: f64, area: Bounds, coverage: &mut Coverage) {
        if lo > hi + EDGE_EPSILON {
            return;
        }
        let y0 = ((lo - EDGE_EPSILON).ceil() as i32).max(area.up_y);
        let y1 = ((hi + EDGE_EPSILON).floor() as i32).min(area.down_y);
        for y in y0..=y1 {
            coverage.insert(Position::new(x, y));
        }
    }

    #[inline]
    fn insert_in(&self, pos: Position, area: Bounds, coverage: &mut Coverage) {
        if area.contains(pos) {
            coverage.insert(pos);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn pivot(x: i32, y: i32, r: u32) -> StrokePivot {
        StrokePivot::new(Position::new(x, y), r)
    }

    fn chain(pivots: &[StrokePivot]) -> StrokePositions {
        StrokePositions::from_pivots(pivots.to_vec()).unwrap()
    }

    fn rasterizer() -> StrokeRasterizer {
        StrokeRasterizer::for_size(100, 100)
    }

    /// Distance from `p` to the segment `a`-`b`.
    fn distance_to_segment(p: Position, a: Position, b: Position) -> f64 {
        let (px, py) = (p.x as f64, p.y as f64);
        let (ax, ay) = (a.x as f64, a.y as f64);
        let (bx, by) = (b.x as f64, b.y as f64);
        let (dx, dy) = (bx - ax, by - ay);
        let len2 = dx * dx + dy * dy;
        let t = if len2 == 0.0 {
            0.0
        } else {
            (((px - ax) * dx + (py - ay) * dy) / len2).clamp(0.0, 1.0)
        };
        (px - (ax + t * dx)).hypot(py - (ay + t * dy))
    }

    #[test]
    fn test_single_pivot_is_disk() {
        let coverage = rasterizer().rasterize(&chain(&[pivot(50, 50, 3)]));
        assert_eq!(coverage.len(), 29);
        assert!(coverage.iter().all(|p| p.distance_squared(Position::new(50, 50)) <= 9));
    }

    #[test]
    fn test_disk_area_close_to_circle_area() {
        for r in [2u32, 5, 9] {
            let count = rasterizer().rasterize(&chain(&[pivot(50, 50, r)])).len() as f64;
            let area = std::f64::consts::PI * (r * r) as f64;
            assert!((count - area).abs() <= 4.0 * r as f64 + 1.0, "r={r}: {count} vs {area}");
        }
    }

    #[test]
    fn test_same_position_pair_equals_single_dab() {
        let single = rasterizer().rasterize(&chain(&[pivot(20, 30, 4)]));
        let doubled = rasterizer().rasterize(&chain(&[pivot(20, 30, 4), pivot(20, 30, 4)]));
        assert_eq!(single, doubled);
    }

    #[test]
    fn test_vertical_segment_exact_count() {
        let coverage = rasterizer().rasterize(&chain(&[pivot(10, 5, 2), pivot(10, 15, 2)]));
        // 5 x 11 rectangle plus 4 cap pixels beyond each end.
        assert_eq!(coverage.len(), 63);
    }

    #[test]
    fn test_horizontal_segment_exact_count() {
        let coverage = rasterizer().rasterize(&chain(&[pivot(5, 40, 1), pivot(25, 40, 1)]));
        // 3 x 21 rectangle plus one cap pixel beyond each end.
        assert_eq!(coverage.len(), 65);
    }

    #[test]
    fn test_clipped_to_bounds() {
        let coverage = StrokeRasterizer::for_size(10, 10).rasterize(&chain(&[pivot(0, 0, 3), pivot(9, 9, 5)]));
        assert!(!coverage.is_empty());
        assert!(coverage.iter().all(|p| (0..10).contains(&p.x) && (0..10).contains(&p.y)));
    }

    #[test]
    fn test_contained_circle_is_larger_disk() {
        let big = rasterizer().rasterize(&chain(&[pivot(40, 40, 8)]));
        let nested = rasterizer().rasterize(&chain(&[pivot(40, 40, 8), pivot(42, 41, 3)]));
        assert_eq!(big, nested);
    }

    #[test]
    fn test_oblique_band_is_convex_hull() {
        let a = pivot(20, 20, 4);
        let b = pivot(45, 33, 4);
        let coverage = rasterizer().rasterize(&chain(&[a, b]));

        for p in coverage.iter() {
            assert!(distance_to_segment(p, a.center, b.center) <= 4.0 + 1e-6, "{p:?} outside");
        }
        // Every pixel comfortably inside the hull is covered.
        for y in 0..100 {
            for x in 0..100 {
                let p = Position::new(x, y);
                if distance_to_segment(p, a.center, b.center) <= 3.0 {
                    assert!(coverage.contains(p), "{p:?} missing");
                }
            }
        }
    }

    #[test]
    fn test_tapered_band_stays_within_radii() {
        let a = pivot(30, 30, 2);
        let b = pivot(60, 50, 7);
        let coverage = rasterizer().rasterize(&chain(&[a, b]));

        for p in coverage.iter() {
            assert!(distance_to_segment(p, a.center, b.center) <= 7.0 + 1e-6);
        }
        // The center line is always covered.
        for t in 0..=20 {
            let t = t as f64 / 20.0;
            let p = Position::from_f64(30.0 + 30.0 * t, 30.0 + 20.0 * t);
            assert!(coverage.contains(p), "{p:?} missing");
        }
    }

    #[test]
    fn test_segment_order_does_not_matter() {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..200 {
            let a = pivot(rng.gen_range(0..100), rng.gen_range(0..100), rng.gen_range(1..8));
            let b = pivot(rng.gen_range(0..100), rng.gen_range(0..100), rng.gen_range(1..8));
            let forward = rasterizer().rasterize(&chain(&[a, b]));
            let backward = rasterizer().rasterize(&chain(&[b, a]));
            assert_eq!(forward, backward, "{a:?} -> {b:?}");
        }
    }

    #[test]
    fn test_chain_is_union_of_segments() {
        let (a, b, c) = (pivot(10, 10, 3), pivot(20, 14, 4), pivot(28, 25, 3));
        let r = rasterizer();
        let mut expected = r.rasterize(&chain(&[a, b]));
        expected.union_with(&r.rasterize(&chain(&[b, c])));
        assert_eq!(r.rasterize(&chain(&[a, b, c])), expected);
    }
}
