//! The quantizer: nearest-entry search plus Floyd-Steinberg error diffusion.
//!
//! Pixels are processed in row-major order over the drawn region. Each
//! opaque pixel is replaced by the nearest enabled palette entry under the
//! configured metric; when dithering is on, the quantization error is
//! diffused to not-yet-visited neighbors inside the drawn region. The
//! sequential data dependency is load-bearing: every pixel's decision sees
//! the corrections diffused by the pixels before it, so the per-pixel loop
//! must not be parallelized while dithering is enabled.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::color::Rgba;
use crate::matching::Matching;
use crate::palette::{all_entries, Palette, PaletteEntry};
use crate::raster::{Raster, Region};

/// Floyd-Steinberg diffusion kernel: (dx, dy, weight).
///
/// ```text
///        X   7
///    3   5   1      (all /16)
/// ```
///
/// Processing is row-major, so every target is a pixel not yet visited.
const FLOYD_STEINBERG: [(i32, i32, f32); 4] = [
    (1, 0, 7.0 / 16.0),
    (-1, 1, 3.0 / 16.0),
    (0, 1, 5.0 / 16.0),
    (1, 1, 1.0 / 16.0),
];

/// Error diffusion configuration.
///
/// `hardness` is a percentage multiplier applied to the diffused error:
/// 100 diffuses the full Floyd-Steinberg share, 0 diffuses nothing (while
/// still paying the bookkeeping cost -- prefer `enabled: false` for that).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dithering {
    /// Whether error diffusion runs at all
    pub enabled: bool,
    /// Percentage of the diffused error to apply, 0-100
    pub hardness: u8,
}

/// Error for dithering hardness outside the 0-100 range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("dithering hardness {0} is out of range 0..=100")]
pub struct HardnessError(pub u8);

impl Default for Dithering {
    /// Dithering off; hardness pre-set to full strength for when it is
    /// switched on.
    fn default() -> Self {
        Self {
            enabled: false,
            hardness: 100,
        }
    }
}

impl Dithering {
    /// Create a validated configuration.
    ///
    /// # Errors
    ///
    /// Returns [`HardnessError`] if `hardness > 100`.
    pub fn new(enabled: bool, hardness: u8) -> Result<Self, HardnessError> {
        if hardness > 100 {
            return Err(HardnessError(hardness));
        }
        Ok(Self { enabled, hardness })
    }

    /// Dithering disabled.
    pub fn off() -> Self {
        Self::default()
    }

    /// Dithering enabled at the given hardness.
    ///
    /// # Errors
    ///
    /// Returns [`HardnessError`] if `hardness > 100`.
    pub fn with_hardness(hardness: u8) -> Result<Self, HardnessError> {
        Self::new(true, hardness)
    }
}

/// Find the enabled palette entry closest to `color` under `matching`.
///
/// Candidates are all enabled entries of all palettes, in palette order
/// then entry order. Ties go to the first candidate encountered (strict
/// `<` improvement), which keeps output deterministic and reproducible.
///
/// Returns `None` when every entry is disabled -- a valid state, not an
/// error; the caller leaves the pixel untouched.
pub fn closest_entry<'a>(
    palettes: &'a [Palette],
    color: Rgba,
    matching: Matching,
) -> Option<&'a PaletteEntry> {
    let mut best: Option<&PaletteEntry> = None;
    let mut best_delta = f64::INFINITY;
    for entry in all_entries(palettes).filter(|e| e.enabled) {
        let delta = matching.delta(entry.color, color);
        if delta < best_delta {
            best_delta = delta;
            best = Some(entry);
        }
    }
    best
}

/// Quantize the drawn region of a raster, in place.
///
/// For each pixel in row-major order inside `region`:
///
/// 1. Transparent pixels (alpha 0) are skipped entirely.
/// 2. With no enabled candidate, the pixel keeps its current color.
/// 3. Otherwise it is overwritten with the exact color (all four channels)
///    of the nearest enabled entry -- the distance is computed against the
///    pixel's pre-clamped, error-accumulated value.
/// 4. When dithering is enabled, `original - candidate` is diffused to the
///    four Floyd-Steinberg neighbors, each share scaled independently by
///    `hardness / 100`, and only to opaque neighbors inside the drawn
///    region -- never into padding.
///
/// The quantized raster contains only exact palette colors (plus whatever
/// skipped pixels already held), which is what lets usage aggregation match
/// by byte equality.
pub fn quantize(
    raster: &mut Raster,
    region: Region,
    palettes: &[Palette],
    matching: Matching,
    dithering: &Dithering,
) {
    let strength = f32::from(dithering.hardness) / 100.0;
    let mut matched: u64 = 0;
    let mut skipped: u64 = 0;

    for y in region.y..region.y + region.height {
        for x in region.x..region.x + region.width {
            let color = raster.get(x, y);
            if color.is_transparent() {
                continue;
            }
            let Some(entry) = closest_entry(palettes, color, matching) else {
                skipped += 1;
                continue;
            };
            raster.set(x, y, entry.color);
            matched += 1;

            if dithering.enabled {
                let quant_error = color.sub(entry.color);
                for (dx, dy, weight) in FLOYD_STEINBERG {
                    let nx = i64::from(x) + i64::from(dx);
                    let ny = i64::from(y) + i64::from(dy);
                    if !region.contains(nx, ny) {
                        continue;
                    }
                    let (nx, ny) = (nx as u32, ny as u32);
                    let neighbor = raster.get(nx, ny);
                    if neighbor.is_transparent() {
                        continue;
                    }
                    raster.set(nx, ny, neighbor.add(quant_error.scale(weight * strength)));
                }
            }
        }
    }

    debug!(
        matched,
        skipped,
        metric = matching.name(),
        dithering = dithering.enabled,
        "quantize pass complete"
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::palette::PaletteEntry;
    use pretty_assertions::assert_eq;

    fn bw_palette() -> Palette {
        Palette::new(
            "BW",
            vec![
                PaletteEntry::new("White", "W", Rgba::opaque(255, 255, 255)),
                PaletteEntry::new("Black", "B", Rgba::opaque(0, 0, 0)),
            ],
        )
    }

    fn solid_raster(width: u32, height: u32, color: Rgba) -> Raster {
        let mut raster = Raster::new(width, height);
        for y in 0..height {
            for x in 0..width {
                raster.set(x, y, color);
            }
        }
        raster
    }

    #[test]
    fn test_hardness_validation() {
        assert!(Dithering::new(true, 0).is_ok());
        assert!(Dithering::new(true, 100).is_ok());
        assert_eq!(Dithering::new(true, 101), Err(HardnessError(101)));
        assert_eq!(Dithering::with_hardness(255), Err(HardnessError(255)));
    }

    #[test]
    fn test_closest_entry_basic() {
        let palettes = [bw_palette()];
        let near_white = Rgba::opaque(200, 200, 200);
        let entry = closest_entry(&palettes, near_white, Matching::Euclidean).unwrap();
        assert_eq!(entry.ref_code, "W");
    }

    #[test]
    fn test_closest_entry_tie_break_first_wins() {
        // Two entries with identical colors: the first in candidate order
        // must win, deterministically.
        let twin_a = PaletteEntry::new("Twin A", "TA", Rgba::opaque(10, 20, 30));
        let twin_b = PaletteEntry::new("Twin B", "TB", Rgba::opaque(10, 20, 30));
        let palettes = [Palette::new("Twins", vec![twin_a, twin_b])];
        let entry = closest_entry(&palettes, Rgba::opaque(10, 20, 30), Matching::Euclidean);
        assert_eq!(entry.unwrap().ref_code, "TA");
    }

    #[test]
    fn test_closest_entry_skips_disabled() {
        let mut palette = bw_palette();
        palette.entries[0].enabled = false; // disable white
        let palettes = [palette];
        let entry = closest_entry(
            &palettes,
            Rgba::opaque(250, 250, 250),
            Matching::Euclidean,
        );
        assert_eq!(entry.unwrap().ref_code, "B");
    }

    #[test]
    fn test_closest_entry_none_when_all_disabled() {
        let mut palette = bw_palette();
        for e in &mut palette.entries {
            e.enabled = false;
        }
        assert!(closest_entry(&[palette], Rgba::opaque(1, 2, 3), Matching::Euclidean).is_none());
    }

    #[test]
    fn test_quantize_snaps_to_palette_colors() {
        let palettes = [bw_palette()];
        let mut raster = solid_raster(2, 2, Rgba::opaque(40, 40, 40));
        let region = raster.full_region();
        quantize(&mut raster, region, &palettes, Matching::Euclidean, &Dithering::off());
        for pixel in raster.pixels() {
            assert_eq!(pixel.to_bytes(), [0, 0, 0, 255]);
        }
    }

    #[test]
    fn test_quantize_leaves_transparent_pixels() {
        let palettes = [bw_palette()];
        let mut raster = Raster::new(2, 1);
        raster.set(0, 0, Rgba::opaque(10, 10, 10));
        // (1, 0) stays transparent
        let region = raster.full_region();
        quantize(&mut raster, region, &palettes, Matching::Euclidean, &Dithering::off());
        assert_eq!(raster.get(0, 0).to_bytes(), [0, 0, 0, 255]);
        assert!(raster.get(1, 0).is_transparent());
    }

    #[test]
    fn test_quantize_all_disabled_is_noop() {
        let mut palette = bw_palette();
        for e in &mut palette.entries {
            e.enabled = false;
        }
        let mut raster = solid_raster(2, 2, Rgba::opaque(40, 40, 40));
        let original = raster.clone();
        let region = raster.full_region();
        quantize(&mut raster, region, &[palette], Matching::Euclidean, &Dithering::off());
        assert_eq!(raster, original);
    }

    #[test]
    fn test_quantize_restricted_to_region() {
        // Padding pixels outside the drawn region are opaque here, but must
        // still be left alone.
        let palettes = [bw_palette()];
        let mut raster = solid_raster(4, 4, Rgba::opaque(40, 40, 40));
        let region = Region::new(1, 1, 2, 2);
        quantize(&mut raster, region, &palettes, Matching::Euclidean, &Dithering::off());
        for y in 0..4 {
            for x in 0..4 {
                let expected = if region.contains(i64::from(x), i64::from(y)) {
                    [0, 0, 0, 255]
                } else {
                    [40, 40, 40, 255]
                };
                assert_eq!(raster.get(x, y).to_bytes(), expected, "pixel ({x},{y})");
            }
        }
    }

    #[test]
    fn test_dithering_never_bleeds_into_padding() {
        // A drawn region flush against opaque padding: with full-strength
        // dithering the padding bytes must come through untouched.
        let palettes = [bw_palette()];
        let sentinel = Rgba::opaque(1, 2, 3);
        let mut raster = solid_raster(4, 4, sentinel);
        let region = Region::new(1, 1, 2, 2);
        for y in 1..3 {
            for x in 1..3 {
                raster.set(x, y, Rgba::opaque(128, 128, 128));
            }
        }
        quantize(
            &mut raster,
            region,
            &palettes,
            Matching::Euclidean,
            &Dithering::with_hardness(100).unwrap(),
        );
        for y in 0..4 {
            for x in 0..4 {
                if !region.contains(i64::from(x), i64::from(y)) {
                    assert_eq!(raster.get(x, y), sentinel, "padding ({x},{y}) was touched");
                }
            }
        }
    }

    #[test]
    fn test_dithering_skips_transparent_neighbors() {
        let palettes = [bw_palette()];
        let mut raster = Raster::new(2, 1);
        raster.set(0, 0, Rgba::opaque(128, 128, 128));
        // (1, 0) transparent: the 7/16 share has nowhere to go
        let region = raster.full_region();
        quantize(
            &mut raster,
            region,
            &palettes,
            Matching::Euclidean,
            &Dithering::with_hardness(100).unwrap(),
        );
        assert!(raster.get(1, 0).is_transparent());
        assert_eq!(raster.get(1, 0).r, 0.0);
    }

    #[test]
    fn test_hardness_zero_matches_dithering_off() {
        let palettes = [bw_palette()];
        let source = solid_raster(4, 4, Rgba::opaque(100, 120, 90));
        let region = source.full_region();

        let mut with_zero = source.clone();
        quantize(
            &mut with_zero,
            region,
            &palettes,
            Matching::Euclidean,
            &Dithering::with_hardness(0).unwrap(),
        );

        let mut without = source.clone();
        quantize(&mut without, region, &palettes, Matching::Euclidean, &Dithering::off());

        assert_eq!(with_zero, without);
    }

    #[test]
    fn test_half_hardness_halves_diffused_error() {
        let palettes = [bw_palette()];
        // Single row: only the 7/16 right-neighbor share applies, so the
        // neighbor's decision value is easy to trace by hand.
        let source = solid_raster(8, 1, Rgba::opaque(96, 96, 96));
        let region = source.full_region();

        // Full hardness: pixel 0 -> black, err +96, neighbor sees
        // 96 + 96 * 7/16 = 138 -> white.
        let mut full = source.clone();
        quantize(
            &mut full,
            region,
            &palettes,
            Matching::Euclidean,
            &Dithering::with_hardness(100).unwrap(),
        );
        assert_eq!(full.get(0, 0).to_bytes(), [0, 0, 0, 255]);
        assert_eq!(full.get(1, 0).to_bytes(), [255, 255, 255, 255]);

        // Half hardness: neighbor sees 96 + 96 * 7/32 = 117 -> black.
        let mut half = source.clone();
        quantize(
            &mut half,
            region,
            &palettes,
            Matching::Euclidean,
            &Dithering::with_hardness(50).unwrap(),
        );
        assert_eq!(half.get(1, 0).to_bytes(), [0, 0, 0, 255]);
    }
}
