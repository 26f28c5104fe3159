//! Raster buffer and drawn-region rectangle.
//!
//! The engine operates purely on in-memory [`Rgba`] buffers supplied by the
//! caller: an external step decodes the image and draws it into a board
//! canvas, then hands over the pixels plus the [`Region`] actually covered
//! by image content. Everything outside that region is padding and is never
//! quantized nor used as a dithering target.

use serde::{Deserialize, Serialize};

use crate::color::Rgba;

/// The sub-rectangle of a raster that contains drawn image content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Region {
    /// Left edge, in pixels
    pub x: u32,
    /// Top edge, in pixels
    pub y: u32,
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
}

impl Region {
    /// Create a region from its top-left corner and dimensions.
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Whether the coordinate lies inside the region.
    ///
    /// Takes signed coordinates so neighbor offsets can be tested without
    /// underflow gymnastics at the left and top edges.
    #[inline]
    pub fn contains(&self, x: i64, y: i64) -> bool {
        x >= i64::from(self.x)
            && x < i64::from(self.x) + i64::from(self.width)
            && y >= i64::from(self.y)
            && y < i64::from(self.y) + i64::from(self.height)
    }
}

/// A width x height pixel buffer in row-major order.
///
/// # Example
///
/// ```
/// use bead_dither::{Raster, Rgba};
///
/// let mut raster = Raster::new(2, 2);
/// raster.set(1, 0, Rgba::opaque(255, 0, 0));
/// assert_eq!(raster.get(1, 0).to_bytes(), [255, 0, 0, 255]);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Raster {
    width: u32,
    height: u32,
    pixels: Vec<Rgba>,
}

impl Raster {
    /// Create a raster filled with transparent black.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![Rgba::new(0.0, 0.0, 0.0, 0.0); (width * height) as usize],
        }
    }

    /// Wrap a decoded RGBA byte buffer (4 bytes per pixel, row-major).
    ///
    /// # Panics (debug only)
    ///
    /// Debug-asserts that `bytes.len() == width * height * 4`.
    pub fn from_rgba_bytes(width: u32, height: u32, bytes: &[u8]) -> Self {
        debug_assert_eq!(
            bytes.len(),
            (width * height * 4) as usize,
            "byte length must match {width}x{height} RGBA"
        );
        let pixels = bytes
            .chunks_exact(4)
            .map(|px| Rgba::from_u8(px[0], px[1], px[2], px[3]))
            .collect();
        Self {
            width,
            height,
            pixels,
        }
    }

    /// Raster width in pixels.
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Raster height in pixels.
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// The region covering the whole raster.
    pub fn full_region(&self) -> Region {
        Region::new(0, 0, self.width, self.height)
    }

    /// All pixels in row-major order.
    #[inline]
    pub fn pixels(&self) -> &[Rgba] {
        &self.pixels
    }

    /// Pixel at (x, y).
    #[inline]
    pub fn get(&self, x: u32, y: u32) -> Rgba {
        self.pixels[self.index(x, y)]
    }

    /// Overwrite the pixel at (x, y).
    #[inline]
    pub fn set(&mut self, x: u32, y: u32, color: Rgba) {
        let idx = self.index(x, y);
        self.pixels[idx] = color;
    }

    /// Flatten to RGBA bytes, rounding and clamping every channel.
    pub fn to_rgba_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.pixels.len() * 4);
        for pixel in &self.pixels {
            bytes.extend_from_slice(&pixel.to_bytes());
        }
        bytes
    }

    #[inline]
    fn index(&self, x: u32, y: u32) -> usize {
        debug_assert!(x < self.width && y < self.height);
        (y * self.width + x) as usize
    }
}
