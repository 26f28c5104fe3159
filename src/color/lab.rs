//! CIE L*a*b* conversion.
//!
//! Lab values are derived on demand for the perceptual distance metrics and
//! never persisted. The conversion goes sRGB -> linear RGB -> CIE XYZ (D65
//! reference white) -> L*a*b*, in `f64` so the CIEDE2000 formula verifies
//! against published test vectors.

use super::Rgba;

/// A color in CIE L*a*b* space.
///
/// `l` is lightness (0 = black, 100 = diffuse white); `a` and `b` are the
/// green-red and blue-yellow opponent axes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Lab {
    /// Lightness L*
    pub l: f64,
    /// Green-red axis a*
    pub a: f64,
    /// Blue-yellow axis b*
    pub b: f64,
}

impl Lab {
    /// Create a Lab value from raw components.
    #[inline]
    pub fn new(l: f64, a: f64, b: f64) -> Self {
        Self { l, a, b }
    }

    /// Chroma magnitude `sqrt(a^2 + b^2)`.
    #[inline]
    pub fn chroma(self) -> f64 {
        (self.a * self.a + self.b * self.b).sqrt()
    }
}

impl From<Rgba> for Lab {
    /// Convert through CIE XYZ with the D65 reference white.
    ///
    /// Alpha is ignored. Out-of-range channel values (possible mid-diffusion)
    /// pass through the linear branches of the transfer functions without
    /// producing NaN.
    fn from(c: Rgba) -> Self {
        let r = srgb_to_linear(f64::from(c.r) / 255.0);
        let g = srgb_to_linear(f64::from(c.g) / 255.0);
        let b = srgb_to_linear(f64::from(c.b) / 255.0);

        // sRGB D65 matrix
        let x = r * 0.4124564 + g * 0.3575761 + b * 0.1804375;
        let y = r * 0.2126729 + g * 0.7151522 + b * 0.0721750;
        let z = r * 0.0193339 + g * 0.1191920 + b * 0.9503041;

        // Normalize by the D65 white point
        let fx = lab_f(x / 0.95047);
        let fy = lab_f(y / 1.0);
        let fz = lab_f(z / 1.08883);

        Lab {
            l: 116.0 * fy - 16.0,
            a: 500.0 * (fx - fy),
            b: 200.0 * (fy - fz),
        }
    }
}

#[inline]
fn srgb_to_linear(v: f64) -> f64 {
    if v > 0.04045 {
        ((v + 0.055) / 1.055).powf(2.4)
    } else {
        v / 12.92
    }
}

#[inline]
fn lab_f(t: f64) -> f64 {
    if t > 0.008856 {
        t.cbrt()
    } else {
        7.787 * t + 16.0 / 116.0
    }
}
