//! Synthetic reference images for demos and tests.
//!
//! Bitmap codecs are out of scope, so the CLI paints one of these
//! generated patterns instead of a loaded file.

use std::f64::consts::PI;
use std::fmt;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use stroke_engine::{EngineError, PixelBuffer, Position, Rgb};

/// Side of one lattice cell of the noise pattern, in pixels.
const NOISE_CELL: usize = 12;

/// Width of one stripe, in pixels.
const STRIPE_WIDTH: f64 = 10.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum Pattern {
    /// Red grows to the right, green grows downward
    #[default]
    Gradient,
    /// Concentric color rings around the center
    Rings,
    /// Diagonal two-tone stripes
    Stripes,
    /// Smoothly interpolated random color blobs
    Noise,
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Pattern::Gradient => "gradient",
            Pattern::Rings => "rings",
            Pattern::Stripes => "stripes",
            Pattern::Noise => "noise",
        };
        f.write_str(name)
    }
}

/// Render `pattern` at the given size. `seed` only affects [`Pattern::Noise`].
pub fn render(pattern: Pattern, width: usize, height: usize, seed: u64) -> Result<PixelBuffer<Rgb>, EngineError> {
    match pattern {
        Pattern::Gradient => gradient(width, height),
        Pattern::Rings => rings(width, height),
        Pattern::Stripes => stripes(width, height),
        Pattern::Noise => noise(width, height, seed),
    }
}

fn unit(value: usize, extent: usize) -> f64 {
    if extent <= 1 {
        0.0
    } else {
        value as f64 / (extent - 1) as f64
    }
}

fn gradient(width: usize, height: usize) -> Result<PixelBuffer<Rgb>, EngineError> {
    PixelBuffer::from_fn(width, height, |p| {
        let u = unit(p.x as usize, width);
        let v = unit(p.y as usize, height);
        Rgb::from_f64_clamped(u * 255.0, v * 255.0, 128.0)
    })
}

fn rings(width: usize, height: usize) -> Result<PixelBuffer<Rgb>, EngineError> {
    let (cx, cy) = (width as f64 / 2.0, height as f64 / 2.0);
    let period = (width.min(height) as f64 / 4.0).max(4.0);
    PixelBuffer::from_fn(width, height, |p| {
        let d = ((p.x as f64 - cx).powi(2) + (p.y as f64 - cy).powi(2)).sqrt();
        let t = (d / period * 2.0 * PI).sin() * 0.5 + 0.5;
        Rgb::from_f64_clamped(40.0 + 200.0 * t, 200.0 - 150.0 * t, 90.0 + 60.0 * t)
    })
}

fn stripes(width: usize, height: usize) -> Result<PixelBuffer<Rgb>, EngineError> {
    let dark = Rgb::new(30, 60, 120);
    let light = Rgb::new(240, 200, 80);
    PixelBuffer::from_fn(width, height, |p| {
        let band = ((p.x + p.y) as f64 / (STRIPE_WIDTH * std::f64::consts::SQRT_2)).floor() as i64;
        if band.rem_euclid(2) == 0 {
            dark
        } else {
            light
        }
    })
}

/// Value noise: random colors on a coarse lattice, bilinearly interpolated.
fn noise(width: usize, height: usize, seed: u64) -> Result<PixelBuffer<Rgb>, EngineError> {
    let mut rng = StdRng::seed_from_u64(seed);
    let lattice_w = width / NOISE_CELL + 2;
    let lattice_h = height / NOISE_CELL + 2;
    let lattice = PixelBuffer::from_fn(lattice_w, lattice_h, |_| {
        [rng.gen_range(0.0..255.0), rng.gen_range(0.0..255.0), rng.gen_range(0.0..255.0)]
    })?;

    PixelBuffer::from_fn(width, height, |p| {
        let fx = p.x as f64 / NOISE_CELL as f64;
        let fy = p.y as f64 / NOISE_CELL as f64;
        let (x0, y0) = (fx.floor() as i32, fy.floor() as i32);
        let (tx, ty) = (smoothstep(fx.fract()), smoothstep(fy.fract()));

        let corner = |dx: i32, dy: i32| lattice.get(Position::new(x0 + dx, y0 + dy)).unwrap_or([0.0; 3]);
        let (c00, c10, c01, c11) = (corner(0, 0), corner(1, 0), corner(0, 1), corner(1, 1));
        let mix = |i: usize| {
            let top = c00[i] + (c10[i] - c00[i]) * tx;
            let bottom = c01[i] + (c11[i] - c01[i]) * tx;
            top + (bottom - top) * ty
        };
        Rgb::from_f64_clamped(mix(0), mix(1), mix(2))
    })
}

fn smoothstep(t: f64) -> f64 {
    t * t * (3.0 - 2.0 * t)
}
