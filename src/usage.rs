//! Bead usage aggregation and low-usage pruning.
//!
//! After quantization every opaque, matched pixel holds an exact palette
//! color, so usage counting is byte-exact equality -- no distance metric is
//! involved. Pruning feeds back into the palette's `enabled` flags; the
//! caller re-runs the quantizer afterwards, as one logical transaction.

use std::collections::BTreeMap;

use tracing::debug;

use crate::palette::{all_entries, Palette, PaletteEntry};
use crate::raster::Raster;

/// Bead counts keyed by prefixed ref code.
///
/// A `BTreeMap` keeps iteration (and therefore logs, reports, and pruning
/// order) deterministic.
pub type Usage = BTreeMap<String, u64>;

/// Count how many pixels of the raster use each palette entry.
///
/// A pixel counts toward the first entry (candidate order) whose color it
/// equals byte-for-byte on all four channels. Pixels matching no entry --
/// transparent padding, or a raster that was never quantized -- are
/// ignored; that is surfaced as missing keys, not an error.
pub fn compute_usage(raster: &Raster, palettes: &[Palette]) -> Usage {
    let mut usage = Usage::new();
    for pixel in raster.pixels() {
        let bytes = pixel.to_bytes();
        if let Some(entry) = all_entries(palettes).find(|e| e.color.to_bytes() == bytes) {
            *usage.entry(entry.prefixed_ref()).or_insert(0) += 1;
        }
    }
    usage
}

/// Total number of beads across all counted entries.
pub fn count_beads(usage: &Usage) -> u64 {
    usage.values().sum()
}

/// Whether any counted entry's share falls strictly under `percent` of the
/// total.
///
/// An empty usage map has nothing under the bound, so refinement loops
/// terminate on it.
pub fn has_usage_under_percent(percent: f64, usage: &Usage) -> bool {
    let lower_bound = count_beads(usage) as f64 * percent / 100.0;
    usage.values().any(|&count| (count as f64) < lower_bound)
}

/// Disable every palette entry whose count falls strictly under `percent`
/// of the total.
///
/// Matching is by prefixed ref code, across all palettes. This only flips
/// `enabled` flags -- it does not re-quantize. Returns the number of
/// entries newly disabled, so callers can tell whether another refinement
/// pass can change anything.
pub fn prune_under_percent(percent: f64, usage: &Usage, palettes: &mut [Palette]) -> usize {
    let lower_bound = count_beads(usage) as f64 * percent / 100.0;
    let mut disabled = 0;
    for (ref_code, _) in usage
        .iter()
        .filter(|(_, &count)| (count as f64) < lower_bound)
    {
        for entry in palettes
            .iter_mut()
            .flat_map(|p| p.entries.iter_mut())
            .filter(|e| e.enabled && e.prefixed_ref() == *ref_code)
        {
            entry.enabled = false;
            disabled += 1;
        }
    }
    debug!(disabled, percent, "pruned low-usage palette entries");
    disabled
}

/// Find the first enabled entry (insertion order) with the given prefixed
/// ref code.
///
/// Used by pattern printers to resolve a ref back to its color and name;
/// returns `None` if the ref is unknown or its entries are all disabled.
pub fn entry_by_ref<'a>(palettes: &'a [Palette], ref_code: &str) -> Option<&'a PaletteEntry> {
    all_entries(palettes).find(|e| e.enabled && e.prefixed_ref() == ref_code)
}
