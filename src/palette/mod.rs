//! Palette types
//!
//! A [`Palette`] is a named, ordered collection of [`PaletteEntry`] values.
//! Several palettes can take part in a single quantization run; their
//! entries are concatenated, in palette order, into one flat candidate set.

mod palette;

pub use palette::{Palette, PaletteEntry};

/// Iterate every entry of every palette in candidate order.
///
/// Candidate order is palette order, then entry order within each palette.
/// The quantizer's tie-break (first candidate wins on equal distance)
/// depends on this order being stable.
pub fn all_entries(palettes: &[Palette]) -> impl Iterator<Item = &PaletteEntry> {
    palettes.iter().flat_map(|p| p.entries.iter())
}
