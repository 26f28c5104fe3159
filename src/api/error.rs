//! Unified error type for the bead-dither public API.

use thiserror::Error;

use crate::color::ParseColorError;
use crate::matching::UnknownMatchingError;
use crate::quantize::HardnessError;

/// Unified error type wrapping every failure the crate can report.
///
/// All of these are configuration-construction failures: the engine itself
/// performs no I/O and treats empty candidate sets and unmatched pixels as
/// valid, silently-handled states.
///
/// # Example
///
/// ```
/// use bead_dither::{Dithering, Error, Matching, Rgba};
///
/// fn configure(metric: &str, hardness: u8) -> Result<(Matching, Dithering), Error> {
///     let matching: Matching = metric.parse()?;
///     let dithering = Dithering::with_hardness(hardness)?;
///     Ok((matching, dithering))
/// }
///
/// assert!(configure("delta-e-2000", 80).is_ok());
/// assert!(configure("delta-e-2000", 130).is_err());
/// assert!(configure("manhattan", 80).is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// Invalid hex color string
    #[error("invalid color: {0}")]
    ParseColor(#[from] ParseColorError),

    /// Dithering hardness outside 0-100
    #[error("invalid configuration: {0}")]
    Hardness(#[from] HardnessError),

    /// Metric name that does not exist
    #[error("invalid configuration: {0}")]
    UnknownMatching(#[from] UnknownMatchingError),
}
