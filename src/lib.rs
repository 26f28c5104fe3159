//! bead-dither: palette-constrained quantization for bead fabrication patterns
//!
//! This library turns an arbitrary raster image into a pattern restricted to
//! a small, fixed set of physical bead colors. It is a pure computation
//! crate: image decoding, palette definition loading, rendering and export
//! are the caller's concern -- the engine only sees in-memory buffers.
//!
//! # Pipeline Overview
//!
//! ```text
//! Raster (RGBA) + drawn Region        (from the caller's image step)
//!     |
//!     v
//! quantize()          nearest enabled PaletteEntry per opaque pixel,
//!     |               under the configured Matching metric, with optional
//!     |               Floyd-Steinberg error diffusion bounded to the
//!     |               drawn region
//!     v
//! compute_usage()     bead counts per prefixed ref code (byte-exact)
//!     |
//!     v
//! prune_under_percent()   disables low-usage entries, then the caller
//!     |                   (or PatternQuantizer) re-runs quantize()
//!     v
//! Pattern { raster, usage }
//! ```
//!
//! # Quick Start
//!
//! The [`PatternQuantizer`] builder is the primary entry point:
//!
//! ```
//! use bead_dither::{Dithering, Matching, Palette, PaletteEntry, PatternQuantizer, Raster, Rgba};
//!
//! let palette = Palette::new(
//!     "BW",
//!     vec![
//!         PaletteEntry::new("White", "W", Rgba::opaque(255, 255, 255)),
//!         PaletteEntry::new("Black", "B", Rgba::opaque(0, 0, 0)),
//!     ],
//! );
//!
//! let mut quantizer = PatternQuantizer::new(vec![palette])
//!     .matching(Matching::DeltaE2000)
//!     .dithering(Dithering::with_hardness(80)?);
//!
//! let source = Raster::from_rgba_bytes(1, 1, &[90, 90, 90, 255]);
//! let pattern = quantizer.process(&source, source.full_region());
//! assert_eq!(pattern.usage.values().sum::<u64>(), 1);
//! # Ok::<(), bead_dither::Error>(())
//! ```
//!
//! # Distance Metrics
//!
//! Three interchangeable metrics are available via [`Matching`]:
//!
//! - Euclidean over all four RGBA channels (fast, naive)
//! - CIE94-style Lab delta
//! - CIEDE2000 (Sharma et al.) -- the most perceptually faithful
//!
//! # Concurrency
//!
//! The engine is single-threaded and synchronous by design. Error diffusion
//! has a sequential data dependency between pixels, so a dithered pass
//! cannot be parallelized across pixels; without dithering each pixel is
//! independent. The palette's `enabled` flags are the one piece of shared
//! mutable state: prune-then-requantize must be treated as a single
//! transaction, which [`PatternQuantizer`] guarantees by owning the
//! palettes.

pub mod api;
pub mod color;
pub mod matching;
pub mod palette;
pub mod quantize;
pub mod raster;
pub mod usage;


pub use api::{Error, Pattern, PatternQuantizer};
pub use color::{Hsl, Lab, ParseColorError, Rgba};
pub use matching::{Matching, UnknownMatchingError, MATCHINGS};
pub use palette::{all_entries, Palette, PaletteEntry};
pub use quantize::{closest_entry, quantize, Dithering, HardnessError};
pub use raster::{Raster, Region};
pub use usage::{
    compute_usage, count_beads, entry_by_ref, has_usage_under_percent, prune_under_percent, Usage,
};
