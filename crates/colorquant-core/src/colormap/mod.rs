//! Colormap - Byte-quantized color table for indexed images
//!
//! A colormap holds at most 256 entries so that every pixel of an
//! [`IndexedImage`](crate::IndexedImage) fits in one byte.

use crate::color;
use crate::error::{Error, Result};

/// Maximum number of entries in a colormap
pub const MAX_COLORMAP_ENTRIES: usize = 256;

/// RGB color entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rgb {
    /// Red component
    pub red: u8,
    /// Green component
    pub green: u8,
    /// Blue component
    pub blue: u8,
}

impl Rgb {
    /// Create a new RGB color
    pub const fn new(red: u8, green: u8, blue: u8) -> Self {
        Self { red, green, blue }
    }

    /// Unpack a `0x__RRGGBB` pixel
    pub fn from_packed(pixel: u32) -> Self {
        let (red, green, blue) = color::extract_rgb(pixel);
        Self { red, green, blue }
    }

    /// Pack into a `0x00RRGGBB` pixel
    pub fn to_packed(self) -> u32 {
        color::compose_rgb(self.red, self.green, self.blue)
    }
}

/// Colormap for indexed images
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Colormap {
    colors: Vec<Rgb>,
}

impl Colormap {
    /// Create an empty colormap
    pub fn new() -> Self {
        Self { colors: Vec::new() }
    }

    /// Get the number of colors
    #[inline]
    pub fn len(&self) -> usize {
        self.colors.len()
    }

    /// Check if empty
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    /// Get a color by index
    pub fn get(&self, index: usize) -> Option<&Rgb> {
        self.colors.get(index)
    }

    /// Add a color to the colormap, returning its index
    pub fn add_color(&mut self, color: Rgb) -> Result<usize> {
        if self.colors.len() >= MAX_COLORMAP_ENTRIES {
            return Err(Error::ColormapFull {
                max: MAX_COLORMAP_ENTRIES,
            });
        }
        self.colors.push(color);
        Ok(self.colors.len() - 1)
    }

    /// Add an RGB color
    pub fn add_rgb(&mut self, r: u8, g: u8, b: u8) -> Result<usize> {
        self.add_color(Rgb::new(r, g, b))
    }

    /// Get RGB values at index
    pub fn get_rgb(&self, index: usize) -> Option<(u8, u8, u8)> {
        self.colors.get(index).map(|c| (c.red, c.green, c.blue))
    }

    /// Get all colors as a slice
    pub fn colors(&self) -> &[Rgb] {
        &self.colors
    }
}
