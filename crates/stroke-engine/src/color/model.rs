//! Color models used to average and composite stroke colors.
//!
//! A [`ColorModel`] is chosen once per run. It decides how the
//! representative color of a stroke is averaged from reference samples and
//! how a stroke is blended over the canvas when painting with partial
//! opacity. Canvas pixels themselves are always stored as [`Rgb`].

use super::rgb::Rgb;

/// A color expressed in the components of a [`ColorModel`].
///
/// - `Rgb`: channels in `0.0..=255.0`
/// - `Hsv`: hue in degrees `0.0..360.0`, saturation and value in `0.0..=1.0`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModelColor(pub [f64; 3]);

/// Color model selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColorModel {
    /// Plain channel arithmetic on red, green, blue.
    #[default]
    Rgb,
    /// Hue/saturation/value with circular hue averaging and shortest-arc
    /// hue interpolation.
    Hsv,
}

impl ColorModel {
    /// Convert a display color into model components.
    pub fn from_channels(self, color: Rgb) -> ModelColor {
        match self {
            ColorModel::Rgb => ModelColor([color.r as f64, color.g as f64, color.b as f64]),
            ColorModel::Hsv => rgb_to_hsv(color),
        }
    }

    /// Convert model components back to a display color.
    pub fn to_display_color(self, color: ModelColor) -> Rgb {
        match self {
            ColorModel::Rgb => {
                let [r, g, b] = color.0;
                Rgb::from_f64_clamped(r, g, b)
            }
            ColorModel::Hsv => hsv_to_rgb(color),
        }
    }

    /// Interpolate from `base` towards `top`; `t` is clamped to `0.0..=1.0`.
    pub fn blend(self, base: ModelColor, top: ModelColor, t: f64) -> ModelColor {
        let t = t.clamp(0.0, 1.0);
        let lerp = |a: f64, b: f64| a + (b - a) * t;
        let [a0, a1, a2] = base.0;
        let [b0, b1, b2] = top.0;

        match self {
            ColorModel::Rgb => ModelColor([lerp(a0, b0), lerp(a1, b1), lerp(a2, b2)]),
            ColorModel::Hsv => {
                let mut delta = b0 - a0;
                if delta > 180.0 {
                    delta -= 360.0;
                } else if delta < -180.0 {
                    delta += 360.0;
                }
                let hue = (a0 + delta * t).rem_euclid(360.0);
                ModelColor([hue, lerp(a1, b1), lerp(a2, b2)])
            }
        }
    }

    /// Composite `top` over `base` with the given opacity.
    ///
    /// Full opacity returns `top` unchanged, so overwriting is exact.
    pub fn blend_display(self, base: Rgb, top: Rgb, opacity: f64) -> Rgb {
        if opacity >= 1.0 {
            return top;
        }
        if opacity <= 0.0 {
            return base;
        }
        let blended = self.blend(self.from_channels(base), self.from_channels(top), opacity);
        self.to_display_color(blended)
    }

    /// Average color of `samples`, `None` when there are none.
    pub fn mean<I>(self, samples: I) -> Option<Rgb>
    where
        I: IntoIterator<Item = Rgb>,
    {
        match self {
            ColorModel::Rgb => {
                let mut sums = [0u64; 3];
                let mut count = 0u64;
                for color in samples {
                    sums[0] += color.r as u64;
                    sums[1] += color.g as u64;
                    sums[2] += color.b as u64;
                    count += 1;
                }
                (count > 0).then(|| {
                    let n = count as f64;
                    Rgb::from_f64_clamped(sums[0] as f64 / n, sums[1] as f64 / n, sums[2] as f64 / n)
                })
            }
            ColorModel::Hsv => {
                let (mut cos_sum, mut sin_sum) = (0.0, 0.0);
                let (mut s_sum, mut v_sum) = (0.0, 0.0);
                let mut count = 0u64;
                for color in samples {
                    let [h, s, v] = rgb_to_hsv(color).0;
                    // Grays have no hue; weight by saturation.
                    let radians = h.to_radians();
                    cos_sum += s * radians.cos();
                    sin_sum += s * radians.sin();
                    s_sum += s;
                    v_sum += v;
                    count += 1;
                }
                if count == 0 {
                    return None;
                }
                let n = count as f64;
                let hue = if cos_sum.abs() < 1e-12 && sin_sum.abs() < 1e-12 {
                    0.0
                } else {
                    sin_sum.atan2(cos_sum).to_degrees().rem_euclid(360.0)
                };
                Some(hsv_to_rgb(ModelColor([hue, s_sum / n, v_sum / n])))
            }
        }
    }
}

fn rgb_to_hsv(color: Rgb) -> ModelColor {
    let r = color.r as f64 / 255.0;
    let g = color.g as f64 / 255.0;
    let b = color.b as f64 / 255.0;

    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let delta = max - min;

    let hue = if delta == 0.0 {
        0.0
    } else if max == r {
        (60.0 * (g - b) / delta).rem_euclid(360.0)
    } else if max == g {
        60.0 * (b - r) / delta + 120.0
    } else {
        60.0 * (r - g) / delta + 240.0
    };
    let saturation = if max == 0.0 { 0.0 } else { delta / max };

    ModelColor([hue, saturation, max])
}

fn hsv_to_rgb(color: ModelColor) -> Rgb {
    let [hue, saturation, value] = color.0;
    let saturation = saturation.clamp(0.0, 1.0);
    let value = value.clamp(0.0, 1.0);

    let chroma = value * saturation;
    let sector = hue.rem_euclid(360.0) / 60.0;
    let x = chroma * (1.0 - (sector % 2.0 - 1.0).abs());

    let (r1, g1, b1) = match sector as u32 {
        0 => (chroma, x, 0.0),
        1 => (x, chroma, 0.0),
        2 => (0.0, chroma, x),
        3 => (0.0, x, chroma),
        4 => (x, 0.0, chroma),
        _ => (chroma, 0.0, x),
    };
    let m = value - chroma;

    Rgb::from_f64_clamped((r1 + m) * 255.0, (g1 + m) * 255.0, (b1 + m) * 255.0)
}
