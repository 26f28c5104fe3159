//! RGBA color value with error-diffusion arithmetic.
//!
//! Channels are stored as `f32` on the 0-255 scale rather than `u8` so that
//! diffused quantization error can accumulate fractionally and run outside
//! the displayable range. Values are clamped only when converted back to
//! bytes.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::ParseColorError;

/// An RGBA color on the 0-255 scale.
///
/// `Rgba` is the single pixel type used throughout the engine: raster
/// buffers, palette entry targets, and the transient error vectors of the
/// dithering step all use it.
///
/// # Arithmetic
///
/// [`add()`](Rgba::add), [`sub()`](Rgba::sub) and [`scale()`](Rgba::scale)
/// operate on the r/g/b channels only and return a new value -- alpha is
/// carried through unchanged and is never part of diffused error. All three
/// take `self` by value, so an error vector can never be mutated in place
/// while it is still owed to later neighbors.
///
/// # Example
///
/// ```
/// use bead_dither::Rgba;
///
/// let pixel = Rgba::from_u8(100, 100, 100, 255);
/// let target = Rgba::from_u8(0, 0, 0, 255);
/// let error = pixel.sub(target).scale(7.0 / 16.0);
/// assert_eq!(error.r, 43.75);
/// assert_eq!(error.a, 255.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rgba {
    /// Red channel (logically 0-255, unclamped mid-diffusion)
    pub r: f32,
    /// Green channel (logically 0-255, unclamped mid-diffusion)
    pub g: f32,
    /// Blue channel (logically 0-255, unclamped mid-diffusion)
    pub b: f32,
    /// Alpha channel (0 = transparent, 255 = opaque)
    pub a: f32,
}

impl Rgba {
    /// Create a color from raw channel values.
    #[inline]
    pub fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Create a color from 8-bit channel values.
    #[inline]
    pub fn from_u8(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self {
            r: f32::from(r),
            g: f32::from(g),
            b: f32::from(b),
            a: f32::from(a),
        }
    }

    /// Create a fully opaque color from 8-bit r/g/b values.
    #[inline]
    pub fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self::from_u8(r, g, b, 255)
    }

    /// Convert to `[r, g, b, a]` bytes, rounding and clamping each channel
    /// to the 0-255 range.
    #[inline]
    pub fn to_bytes(self) -> [u8; 4] {
        [
            channel_to_byte(self.r),
            channel_to_byte(self.g),
            channel_to_byte(self.b),
            channel_to_byte(self.a),
        ]
    }

    /// Returns true if the pixel is fully transparent.
    ///
    /// Transparent pixels are never quantized and never receive diffused
    /// error.
    #[inline]
    pub fn is_transparent(self) -> bool {
        self.a == 0.0
    }

    /// Component-wise addition of the r/g/b channels. Alpha is kept from
    /// `self`.
    #[inline]
    pub fn add(self, other: Rgba) -> Self {
        Self {
            r: self.r + other.r,
            g: self.g + other.g,
            b: self.b + other.b,
            a: self.a,
        }
    }

    /// Component-wise subtraction of the r/g/b channels. Alpha is kept from
    /// `self`.
    #[inline]
    pub fn sub(self, other: Rgba) -> Self {
        Self {
            r: self.r - other.r,
            g: self.g - other.g,
            b: self.b - other.b,
            a: self.a,
        }
    }

    /// Scale the r/g/b channels by a scalar. Alpha is kept from `self`.
    #[inline]
    pub fn scale(self, factor: f32) -> Self {
        Self {
            r: self.r * factor,
            g: self.g * factor,
            b: self.b * factor,
            a: self.a,
        }
    }

    /// Pick a readable label color (black or white) for printing on top of
    /// this color, by Rec. 601 luma threshold.
    ///
    /// Used by pattern printers to overlay ref codes on bead cells.
    pub fn foreground(self) -> Rgba {
        if 0.299 * self.r + 0.587 * self.g + 0.114 * self.b > 255.0 / 2.0 {
            Rgba::opaque(0, 0, 0)
        } else {
            Rgba::opaque(255, 255, 255)
        }
    }

    /// Format as a lowercase `#rrggbb` hex string (alpha is dropped).
    pub fn to_hex(self) -> String {
        let [r, g, b, _] = self.to_bytes();
        format!("#{:02x}{:02x}{:02x}", r, g, b)
    }
}

#[inline]
fn channel_to_byte(v: f32) -> u8 {
    v.round().clamp(0.0, 255.0) as u8
}

impl FromStr for Rgba {
    type Err = ParseColorError;

    /// Parse a fully opaque color from a hex string.
    ///
    /// Supports `#RRGGBB`, `RRGGBB`, `#RGB` and `RGB`.
    ///
    /// # Example
    ///
    /// ```
    /// use bead_dither::Rgba;
    ///
    /// let red: Rgba = "#ff0000".parse().unwrap();
    /// assert_eq!(red.to_bytes(), [255, 0, 0, 255]);
    /// ```
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let hex = s.strip_prefix('#').unwrap_or(s);
        match hex.len() {
            6 => {
                let r = u8::from_str_radix(&hex[0..2], 16)?;
                let g = u8::from_str_radix(&hex[2..4], 16)?;
                let b = u8::from_str_radix(&hex[4..6], 16)?;
                Ok(Rgba::opaque(r, g, b))
            }
            3 => {
                let r = u8::from_str_radix(&hex[0..1], 16)?;
                let g = u8::from_str_radix(&hex[1..2], 16)?;
                let b = u8::from_str_radix(&hex[2..3], 16)?;
                // Expand each nibble: "f" -> 0xff
                Ok(Rgba::opaque(r * 17, g * 17, b * 17))
            }
            _ => Err(ParseColorError::InvalidLength),
        }
    }
}

impl fmt::Display for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}
