//! Color types and conversions
//!
//! The working color type is [`Rgba`]: four channels on the 0-255 scale,
//! deliberately unclamped so diffused quantization error can push channel
//! values outside the displayable range mid-pass. [`Lab`] and [`Hsl`] are
//! ephemeral views derived on demand -- Lab feeds the perceptual distance
//! metrics, HSL is for ordering and labeling results only.

mod hsl;
mod lab;
mod rgba;

use std::num::ParseIntError;

use thiserror::Error;

pub use hsl::Hsl;
pub use lab::Lab;
pub use rgba::Rgba;

/// Error type for parsing hex color strings.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseColorError {
    /// Hex string has invalid length (must be 3 or 6 digits after stripping '#')
    #[error("invalid hex color length (expected 3 or 6 digits)")]
    InvalidLength,
    /// Invalid hexadecimal character encountered
    #[error("invalid hex character: {0}")]
    InvalidHex(#[from] ParseIntError),
}
