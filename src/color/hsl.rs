//! HSL conversion, used to order and label quantization results.
//!
//! Never part of a quantization decision -- bead usage listings sort by hue
//! so similar colors group together on the printed pattern.

use super::Rgba;

/// A color in HSL space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hsl {
    /// Hue in whole degrees, `[0, 360)`
    pub h: f32,
    /// Saturation, `0.0..=1.0`
    pub s: f32,
    /// Lightness, `0.0..=1.0`
    pub l: f32,
}

impl From<Rgba> for Hsl {
    /// Standard max/min derivation. Hue is rounded to whole degrees, which
    /// is all the display ordering needs. Alpha is ignored.
    fn from(c: Rgba) -> Self {
        let r = c.r / 255.0;
        let g = c.g / 255.0;
        let b = c.b / 255.0;

        let cmax = r.max(g).max(b);
        let cmin = r.min(g).min(b);
        let delta = cmax - cmin;

        let mut h = if delta == 0.0 {
            0.0
        } else if cmax == r {
            ((g - b) / delta) % 6.0
        } else if cmax == g {
            (b - r) / delta + 2.0
        } else {
            (r - g) / delta + 4.0
        };

        h = (h * 60.0).round();
        if h < 0.0 {
            h += 360.0;
        }

        let l = (cmax + cmin) / 2.0;
        let s = if delta == 0.0 {
            0.0
        } else {
            delta / (1.0 - (2.0 * l - 1.0).abs())
        };

        Hsl { h, s, l }
    }
}
