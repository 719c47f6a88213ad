//! colorquant Core - Basic data structures for color quantization
//!
//! This crate provides the data structures shared by every quantization
//! algorithm in the colorquant workspace:
//!
//! - [`RgbImage`] - Full-color image of packed `0x__RRGGBB` pixels
//! - [`IndexedImage`] - One byte per pixel plus a [`Colormap`]
//! - [`Palette`] - Floating-point representative colors
//! - [`Colormap`] / [`Rgb`] - Byte-quantized color table (at most 256 entries)
//!
//! Decoding and encoding of image files is left to the caller; images are
//! exchanged as flat pixel buffers.

pub mod colormap;
pub mod error;
pub mod image;
pub mod palette;

pub use colormap::{Colormap, Rgb};
pub use error::{Error, Result};
pub use image::{IndexedImage, RgbImage};
pub use palette::Palette;

/// Color channel indices and helper functions for packed RGB pixels.
///
/// # Pixel format
///
/// Pixels are stored as `0x__RRGGBB` (blue in the LSB). The top byte is
/// ignored by every function in this module.
pub mod color {
    /// Red channel index in an `[r, g, b]` triple
    pub const RED: usize = 0;
    /// Green channel index
    pub const GREEN: usize = 1;
    /// Blue channel index
    pub const BLUE: usize = 2;

    /// Shift amounts for extracting color channels
    pub const RED_SHIFT: u32 = 16;
    pub const GREEN_SHIFT: u32 = 8;
    pub const BLUE_SHIFT: u32 = 0;

    /// Mask selecting the 24 color bits of a packed pixel
    pub const RGB_MASK: u32 = 0x00ff_ffff;

    /// Largest channel value
    pub const MAX_RGB: u8 = 255;

    /// Extract red component from a packed pixel.
    #[inline]
    pub fn red(pixel: u32) -> u8 {
        ((pixel >> RED_SHIFT) & 0xff) as u8
    }

    /// Extract green component from a packed pixel.
    #[inline]
    pub fn green(pixel: u32) -> u8 {
        ((pixel >> GREEN_SHIFT) & 0xff) as u8
    }

    /// Extract blue component from a packed pixel.
    #[inline]
    pub fn blue(pixel: u32) -> u8 {
        ((pixel >> BLUE_SHIFT) & 0xff) as u8
    }

    /// Compose a packed RGB pixel (top byte = 0).
    #[inline]
    pub fn compose_rgb(r: u8, g: u8, b: u8) -> u32 {
        ((r as u32) << RED_SHIFT) | ((g as u32) << GREEN_SHIFT) | ((b as u32) << BLUE_SHIFT)
    }

    /// Drop the unused top byte of a packed pixel.
    #[inline]
    pub fn strip_alpha(pixel: u32) -> u32 {
        pixel & RGB_MASK
    }

    /// Extract RGB values from a packed pixel.
    #[inline]
    pub fn extract_rgb(pixel: u32) -> (u8, u8, u8) {
        (red(pixel), green(pixel), blue(pixel))
    }

    /// Extract RGB values from a packed pixel as an `[r, g, b]` triple.
    #[inline]
    pub fn to_triple(pixel: u32) -> [u8; 3] {
        [red(pixel), green(pixel), blue(pixel)]
    }

    /// Squared Euclidean distance between a packed pixel and a float color.
    #[inline]
    pub fn distance_sq(pixel: u32, color: [f32; 3]) -> f32 {
        let dr = color[RED] - red(pixel) as f32;
        let dg = color[GREEN] - green(pixel) as f32;
        let db = color[BLUE] - blue(pixel) as f32;
        dr * dr + dg * dg + db * db
    }

}
