//! Image containers exchanged with the surrounding image I/O layer
//!
//! [`RgbImage`] carries the full-color input as packed `0x__RRGGBB` pixels
//! in row-major order. [`IndexedImage`] carries the quantized result: one
//! byte per pixel and the [`Colormap`] those bytes index into.
//!
//! Zero-sized images are valid and simply hold no pixels.

use crate::color;
use crate::colormap::Colormap;
use crate::error::{Error, Result};

fn pixel_count(width: u32, height: u32) -> Result<usize> {
    (width as usize)
        .checked_mul(height as usize)
        .ok_or(Error::InvalidDimension { width, height })
}

/// Full-color image
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RgbImage {
    width: u32,
    height: u32,
    data: Vec<u32>,
}

impl RgbImage {
    /// Create a black image
    pub fn new(width: u32, height: u32) -> Result<Self> {
        let n = pixel_count(width, height)?;
        Ok(Self {
            width,
            height,
            data: vec![0; n],
        })
    }

    /// Wrap an existing pixel buffer.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DimensionMismatch`] if `data.len() != width * height`.
    pub fn from_pixels(width: u32, height: u32, data: Vec<u32>) -> Result<Self> {
        let expected = pixel_count(width, height)?;
        if data.len() != expected {
            return Err(Error::DimensionMismatch {
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Get the width
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Get the height
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Number of pixels
    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Check if the image has no pixels
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// All pixels in row-major order
    pub fn pixels(&self) -> &[u32] {
        &self.data
    }

    /// Consume the image, returning its pixel buffer
    pub fn into_pixels(self) -> Vec<u32> {
        self.data
    }

    /// Get a pixel, or `None` outside the image
    pub fn get_pixel(&self, x: u32, y: u32) -> Option<u32> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(self.get_pixel_unchecked(x, y))
    }

    /// Get a pixel without bounds checking the coordinates.
    ///
    /// Panics if the computed offset is outside the buffer.
    #[inline]
    pub fn get_pixel_unchecked(&self, x: u32, y: u32) -> u32 {
        self.data[y as usize * self.width as usize + x as usize]
    }

    /// Set a pixel. The unused top byte is cleared.
    pub fn set_pixel(&mut self, x: u32, y: u32, pixel: u32) -> Result<()> {
        if x >= self.width || y >= self.height {
            return Err(Error::IndexOutOfBounds {
                index: y as usize * self.width as usize + x as usize,
                len: self.data.len(),
            });
        }
        self.set_pixel_unchecked(x, y, pixel);
        Ok(())
    }

    /// Set a pixel without bounds checking the coordinates.
    #[inline]
    pub fn set_pixel_unchecked(&mut self, x: u32, y: u32, pixel: u32) {
        let idx = y as usize * self.width as usize + x as usize;
        self.data[idx] = color::strip_alpha(pixel);
    }
}

/// Indexed-color image: byte indices into a colormap
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexedImage {
    width: u32,
    height: u32,
    indices: Vec<u8>,
    colormap: Colormap,
}

impl IndexedImage {
    /// Assemble an indexed image.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DimensionMismatch`] if the index buffer length does
    /// not match the dimensions, or [`Error::IndexOutOfBounds`] if any index
    /// does not address a colormap entry.
    pub fn new(width: u32, height: u32, indices: Vec<u8>, colormap: Colormap) -> Result<Self> {
        let expected = pixel_count(width, height)?;
        if indices.len() != expected {
            return Err(Error::DimensionMismatch {
                expected,
                actual: indices.len(),
            });
        }
        if let Some(&bad) = indices.iter().find(|&&i| i as usize >= colormap.len()) {
            return Err(Error::IndexOutOfBounds {
                index: bad as usize,
                len: colormap.len(),
            });
        }
        Ok(Self {
            width,
            height,
            indices,
            colormap,
        })
    }

    /// Get the width
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Get the height
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Per-pixel colormap indices in row-major order
    pub fn indices(&self) -> &[u8] {
        &self.indices
    }

    /// The colormap the indices refer to
    pub fn colormap(&self) -> &Colormap {
        &self.colormap
    }

    /// Get the colormap index at a pixel
    pub fn get_index(&self, x: u32, y: u32) -> Option<u8> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(self.indices[y as usize * self.width as usize + x as usize])
    }

    /// Get the RGB color at a pixel, packed as `0x00RRGGBB`
    pub fn get_rgb(&self, x: u32, y: u32) -> Option<u32> {
        let idx = self.get_index(x, y)?;
        self.colormap.get(idx as usize).map(|c| c.to_packed())
    }

    /// Expand back into a full-color image
    pub fn to_rgb(&self) -> RgbImage {
        let data = self
            .indices
            .iter()
            .map(|&i| {
                self.colormap
                    .get(i as usize)
                    .map_or(0, |c| c.to_packed())
            })
            .collect();
        RgbImage {
            width: self.width,
            height: self.height,
            data,
        }
    }
}
