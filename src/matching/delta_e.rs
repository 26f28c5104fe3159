//! CIE94 and CIEDE2000 Lab delta formulas.
//!
//! Both clamp intermediate quantities to zero before square roots: floating
//! point cancellation can drive the ΔH² term or the final sum fractionally
//! negative, and a NaN must never escape a distance metric.

use crate::color::Lab;

/// CIE94 color difference with graphic-arts weights (KL = KC = KH = 1).
///
/// Asymmetric: `Sc` and `Sh` derive from the chroma of `reference` (the
/// palette candidate in quantizer calls).
pub(crate) fn cie94(reference: Lab, sample: Lab) -> f64 {
    let dl = reference.l - sample.l;
    let da = reference.a - sample.a;
    let db = reference.b - sample.b;

    let c1 = reference.chroma();
    let c2 = sample.chroma();
    let dc = c1 - c2;

    // dH^2 by subtraction can underflow below zero
    let dh2 = da * da + db * db - dc * dc;
    let dh = if dh2 < 0.0 { 0.0 } else { dh2.sqrt() };

    let sc = 1.0 + 0.045 * c1;
    let sh = 1.0 + 0.015 * c1;

    let sum = dl * dl + (dc / sc).powi(2) + (dh / sh).powi(2);
    sum.max(0.0).sqrt()
}

/// CIEDE2000 color difference, following Sharma, Wu & Dalal (2005).
///
/// KL = KC = KH = 1. Symmetric in its arguments.
pub(crate) fn ciede2000(lab1: Lab, lab2: Lab) -> f64 {
    const POW7_25: f64 = 6103515625.0; // 25^7

    let c1 = lab1.chroma();
    let c2 = lab2.chroma();
    let c_bar = 0.5 * (c1 + c2);

    // Rotation of a* toward neutral for low-chroma colors
    let c_bar7 = c_bar.powi(7);
    let g = 0.5 * (1.0 - (c_bar7 / (c_bar7 + POW7_25)).sqrt());
    let a1p = (1.0 + g) * lab1.a;
    let a2p = (1.0 + g) * lab2.a;

    let c1p = (a1p * a1p + lab1.b * lab1.b).sqrt();
    let c2p = (a2p * a2p + lab2.b * lab2.b).sqrt();

    let h1p = hue_angle(a1p, lab1.b);
    let h2p = hue_angle(a2p, lab2.b);

    let dl_p = lab2.l - lab1.l;
    let dc_p = c2p - c1p;

    // Hue difference across the 0/360 wraparound; undefined (zero) when
    // either color is achromatic
    let dh_angle = if c1p * c2p == 0.0 {
        0.0
    } else {
        let diff = h2p - h1p;
        if diff.abs() <= 180.0 {
            diff
        } else if diff > 180.0 {
            diff - 360.0
        } else {
            diff + 360.0
        }
    };
    let dh_p = 2.0 * (c1p * c2p).sqrt() * (dh_angle / 2.0).to_radians().sin();

    let l_bar_p = 0.5 * (lab1.l + lab2.l);
    let c_bar_p = 0.5 * (c1p + c2p);

    let h_bar_p = if c1p * c2p == 0.0 {
        h1p + h2p
    } else if (h1p - h2p).abs() <= 180.0 {
        0.5 * (h1p + h2p)
    } else if h1p + h2p < 360.0 {
        0.5 * (h1p + h2p + 360.0)
    } else {
        0.5 * (h1p + h2p - 360.0)
    };

    let t = 1.0 - 0.17 * (h_bar_p - 30.0).to_radians().cos()
        + 0.24 * (2.0 * h_bar_p).to_radians().cos()
        + 0.32 * (3.0 * h_bar_p + 6.0).to_radians().cos()
        - 0.20 * (4.0 * h_bar_p - 63.0).to_radians().cos();

    let d_theta = 30.0 * (-((h_bar_p - 275.0) / 25.0).powi(2)).exp();
    let c_bar_p7 = c_bar_p.powi(7);
    let rc = 2.0 * (c_bar_p7 / (c_bar_p7 + POW7_25)).sqrt();
    let rt = -rc * (2.0 * d_theta).to_radians().sin();

    let l_minus_50_sq = (l_bar_p - 50.0).powi(2);
    let sl = 1.0 + 0.015 * l_minus_50_sq / (20.0 + l_minus_50_sq).sqrt();
    let sc = 1.0 + 0.045 * c_bar_p;
    let sh = 1.0 + 0.015 * c_bar_p * t;

    let sum = (dl_p / sl).powi(2)
        + (dc_p / sc).powi(2)
        + (dh_p / sh).powi(2)
        + rt * (dc_p / sc) * (dh_p / sh);
    sum.max(0.0).sqrt()
}

/// Hue angle of (a', b) in degrees, `[0, 360)`; zero for achromatic input.
#[inline]
fn hue_angle(ap: f64, b: f64) -> f64 {
    if ap == 0.0 && b == 0.0 {
        0.0
    } else {
        b.atan2(ap).to_degrees().rem_euclid(360.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Rgba;

    #[test]
    fn test_cie94_identical_is_zero() {
        let lab = Lab::new(52.0, 11.5, -38.2);
        assert_eq!(cie94(lab, lab), 0.0);
    }

    #[test]
    fn test_cie94_pure_lightness_difference() {
        // Achromatic pair: the delta reduces to |dL|
        let a = Lab::new(40.0, 0.0, 0.0);
        let b = Lab::new(70.0, 0.0, 0.0);
        assert!((cie94(a, b) - 30.0).abs() < 1e-9);
    }

    #[test]
    fn test_cie94_dh_underflow_clamped() {
        // Colinear chroma vectors make dH^2 exactly zero in exact
        // arithmetic; cancellation noise must not turn into NaN.
        let a = Lab::new(50.0, 30.0, 40.0);
        let b = Lab::new(50.0, 15.0, 20.0);
        let d = cie94(a, b);
        assert!(d.is_finite() && d >= 0.0);
    }

    /// Published CIEDE2000 test vectors from Sharma, Wu & Dalal (2005),
    /// Table 1. Each tuple is (Lab1, Lab2, expected ΔE00).
    #[test]
    fn test_ciede2000_published_vectors() {
        let cases: [(Lab, Lab, f64); 6] = [
            (
                Lab::new(50.0, 2.6772, -79.7751),
                Lab::new(50.0, 0.0, -82.7485),
                2.0425,
            ),
            (
                Lab::new(50.0, 3.1571, -77.2803),
                Lab::new(50.0, 0.0, -82.7485),
                2.8615,
            ),
            (
                Lab::new(50.0, 2.8361, -74.0200),
                Lab::new(50.0, 0.0, -82.7485),
                3.4412,
            ),
            (
                Lab::new(50.0, 0.0, 0.0),
                Lab::new(50.0, -1.0, 2.0),
                2.3669,
            ),
            (
                Lab::new(60.2574, -34.0099, 36.2677),
                Lab::new(60.4626, -34.1751, 39.4387),
                1.2644,
            ),
            (
                Lab::new(63.0109, -31.0961, -5.8663),
                Lab::new(62.8187, -29.7946, -4.0864),
                1.2630,
            ),
        ];

        for (lab1, lab2, expected) in cases {
            let de = ciede2000(lab1, lab2);
            assert!(
                (de - expected).abs() < 5e-4,
                "ciede2000({lab1:?}, {lab2:?}) = {de}, expected {expected}"
            );
        }
    }

    #[test]
    fn test_ciede2000_symmetric() {
        let a = Lab::new(50.0, 2.5, 0.0);
        let b = Lab::new(73.0, 25.0, -18.0);
        assert!((ciede2000(a, b) - ciede2000(b, a)).abs() < 1e-12);
    }

    #[test]
    fn test_ciede2000_identical_is_zero() {
        let lab = Lab::new(61.3, -20.0, 14.7);
        assert_eq!(ciede2000(lab, lab), 0.0);
    }

    #[test]
    fn test_ciede2000_ordering_sanity() {
        // Opposite saturated hues at equal lightness must be far apart
        // compared to two near-identical pastels.
        let green = Lab::from(Rgba::opaque(0, 200, 80));
        let magenta = Lab::from(Rgba::opaque(200, 0, 170));
        let pastel_a = Lab::from(Rgba::opaque(230, 220, 225));
        let pastel_b = Lab::from(Rgba::opaque(228, 222, 223));

        let far = ciede2000(green, magenta);
        let near = ciede2000(pastel_a, pastel_b);
        assert!(
            far > 10.0 * near,
            "expected opposite hues ({far}) >> near pastels ({near})"
        );
    }
}
