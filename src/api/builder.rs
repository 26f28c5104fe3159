//! PatternQuantizer builder -- the ergonomic entry point for the crate.
//!
//! Wraps the quantize -> usage -> prune pipeline with fluent configuration.
//! The builder owns the palettes, so the pruning feedback loop mutates
//! state that no concurrent quantization pass can observe: the refinement
//! transaction is serialized by construction.

use tracing::{debug, trace};

use crate::matching::Matching;
use crate::palette::Palette;
use crate::quantize::{quantize, Dithering};
use crate::raster::{Raster, Region};
use crate::usage::{compute_usage, has_usage_under_percent, prune_under_percent, Usage};

/// A finished fabrication pattern: the quantized raster plus its bead
/// usage counts.
#[derive(Debug, Clone, PartialEq)]
pub struct Pattern {
    /// The quantized pixels; every matched pixel holds an exact palette color
    pub raster: Raster,
    /// Bead counts keyed by prefixed ref code
    pub usage: Usage,
}

/// High-level quantization pipeline.
///
/// Owns the palette set and the run configuration. Configuration methods
/// consume and return `self` (builder pattern); [`process()`](Self::process)
/// runs the full pipeline including the optional refinement loop.
///
/// # Example
///
/// ```
/// use bead_dither::{Matching, Palette, PaletteEntry, PatternQuantizer, Raster, Rgba};
///
/// let palette = Palette::new(
///     "BW",
///     vec![
///         PaletteEntry::new("White", "W", Rgba::opaque(255, 255, 255)),
///         PaletteEntry::new("Black", "B", Rgba::opaque(0, 0, 0)),
///     ],
/// );
///
/// let mut quantizer = PatternQuantizer::new(vec![palette]).matching(Matching::Euclidean);
///
/// let mut source = Raster::new(2, 2);
/// for y in 0..2 {
///     for x in 0..2 {
///         source.set(x, y, Rgba::opaque(230, 230, 230));
///     }
/// }
/// let region = source.full_region();
///
/// let pattern = quantizer.process(&source, region);
/// assert_eq!(pattern.usage.get("W"), Some(&4));
/// ```
pub struct PatternQuantizer {
    palettes: Vec<Palette>,
    matching: Matching,
    dithering: Dithering,
    prune_percent: Option<f64>,
}

impl PatternQuantizer {
    /// Create a pipeline over the given palettes.
    ///
    /// Defaults: Euclidean matching, dithering off, no pruning.
    pub fn new(palettes: Vec<Palette>) -> Self {
        Self {
            palettes,
            matching: Matching::default(),
            dithering: Dithering::default(),
            prune_percent: None,
        }
    }

    /// Set the distance metric.
    #[inline]
    pub fn matching(mut self, matching: Matching) -> Self {
        self.matching = matching;
        self
    }

    /// Set the dithering configuration.
    #[inline]
    pub fn dithering(mut self, dithering: Dithering) -> Self {
        self.dithering = dithering;
        self
    }

    /// Enable the refinement loop: after each pass, entries whose usage
    /// share is strictly under `percent` are disabled and the source is
    /// re-quantized.
    #[inline]
    pub fn prune_under(mut self, percent: f64) -> Self {
        self.prune_percent = Some(percent);
        self
    }

    /// The palette set, with current `enabled` flags.
    pub fn palettes(&self) -> &[Palette] {
        &self.palettes
    }

    /// Mutable access for interactive entry toggles between runs.
    ///
    /// Must not be interleaved with [`process()`](Self::process); the
    /// refinement transaction assumes exclusive palette access.
    pub fn palettes_mut(&mut self) -> &mut [Palette] {
        &mut self.palettes
    }

    /// Run a single quantization pass over a copy of the source.
    ///
    /// The source raster is left untouched; later passes of the refinement
    /// loop restart from it rather than compounding quantization.
    pub fn quantize_region(&self, source: &Raster, region: Region) -> Raster {
        let mut raster = source.clone();
        quantize(
            &mut raster,
            region,
            &self.palettes,
            self.matching,
            &self.dithering,
        );
        raster
    }

    /// Run the full pipeline: quantize, aggregate usage, and -- when
    /// pruning is configured -- refine until no enabled entry falls under
    /// the threshold.
    ///
    /// Each refinement pass disables at least one entry and re-quantizes
    /// from a fresh copy of `source`, so the loop is bounded by the number
    /// of palette entries. Pruning mutates the owned palettes' `enabled`
    /// flags; they stay disabled for subsequent calls.
    pub fn process(&mut self, source: &Raster, region: Region) -> Pattern {
        let mut raster = self.quantize_region(source, region);
        let mut usage = compute_usage(&raster, &self.palettes);

        if let Some(percent) = self.prune_percent {
            let mut passes = 0u32;
            while has_usage_under_percent(percent, &usage) {
                let disabled = prune_under_percent(percent, &usage, &mut self.palettes);
                if disabled == 0 {
                    // Every under-threshold ref is already disabled (its
                    // color aliases an enabled entry); nothing can change.
                    break;
                }
                raster = self.quantize_region(source, region);
                usage = compute_usage(&raster, &self.palettes);
                passes += 1;
                trace!(pass = passes, disabled, "refinement pass");
            }
            debug!(passes, "refinement complete");
        }

        Pattern { raster, usage }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Rgba;
    use crate::palette::PaletteEntry;
    use pretty_assertions::assert_eq;

    fn rgb_palette() -> Palette {
        Palette::new(
            "RGB",
            vec![
                PaletteEntry::new("Red", "R", Rgba::opaque(255, 0, 0)),
                PaletteEntry::new("Green", "G", Rgba::opaque(0, 255, 0)),
                PaletteEntry::new("Blue", "B", Rgba::opaque(0, 0, 255)),
            ],
        )
    }

    fn mostly_red_raster() -> Raster {
        // 9 reddish pixels and a single blueish one
        let mut raster = Raster::new(10, 1);
        for x in 0..9 {
            raster.set(x, 0, Rgba::opaque(250, 10, 10));
        }
        raster.set(9, 0, Rgba::opaque(10, 5, 250));
        raster
    }

    #[test]
    fn test_single_pass_without_pruning() {
        let mut quantizer = PatternQuantizer::new(vec![rgb_palette()]);
        let source = mostly_red_raster();
        let pattern = quantizer.process(&source, source.full_region());
        assert_eq!(pattern.usage.get("R"), Some(&9));
        assert_eq!(pattern.usage.get("B"), Some(&1));
    }

    #[test]
    fn test_refinement_prunes_and_requantizes() {
        let mut quantizer = PatternQuantizer::new(vec![rgb_palette()]).prune_under(20.0);
        let source = mostly_red_raster();
        let pattern = quantizer.process(&source, source.full_region());

        // Blue held a 10% share, under the 20% threshold: disabled, and
        // its pixel re-quantized to the remaining nearest entry.
        assert_eq!(pattern.usage.get("R"), Some(&10));
        assert_eq!(pattern.usage.get("B"), None);
        let blue = &quantizer.palettes()[0].entries[2];
        assert!(!blue.enabled);

        // The source was restarted from, not double-quantized
        assert_eq!(pattern.raster.get(9, 0).to_bytes(), [255, 0, 0, 255]);
    }

    #[test]
    fn test_process_leaves_source_untouched() {
        let mut quantizer = PatternQuantizer::new(vec![rgb_palette()]).prune_under(20.0);
        let source = mostly_red_raster();
        let copy = source.clone();
        let _ = quantizer.process(&source, source.full_region());
        assert_eq!(source, copy);
    }

    #[test]
    fn test_manual_toggle_respected() {
        let mut quantizer = PatternQuantizer::new(vec![rgb_palette()]);
        quantizer.palettes_mut()[0].entries[0].enabled = false; // no red
        let source = mostly_red_raster();
        let pattern = quantizer.process(&source, source.full_region());
        assert_eq!(pattern.usage.get("R"), None);
        // Reddish pixels fall to the nearest remaining entry
        assert_eq!(pattern.usage.values().sum::<u64>(), 10);
    }

    #[test]
    fn test_builder_is_reusable_across_rasters() {
        let quantizer = PatternQuantizer::new(vec![rgb_palette()]);
        let a = mostly_red_raster();
        let b = Raster::new(4, 4);
        let qa = quantizer.quantize_region(&a, a.full_region());
        let qb = quantizer.quantize_region(&b, b.full_region());
        assert_eq!(qa.get(0, 0).to_bytes(), [255, 0, 0, 255]);
        assert!(qb.pixels().iter().all(|p| p.is_transparent()));
    }
}
