//! Palette - Floating-point representative colors
//!
//! Quantizers average many pixels into one representative color, so palette
//! entries keep their fractional parts. Rounding to bytes only happens when
//! a [`Colormap`] is materialized for an indexed image.

use crate::color;
use crate::colormap::{Colormap, Rgb};
use crate::error::Result;

/// Ordered sequence of `[r, g, b]` float triples
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Palette {
    colors: Vec<[f32; 3]>,
}

impl Palette {
    /// Create an empty palette
    pub fn new() -> Self {
        Self { colors: Vec::new() }
    }

    /// Create a palette from a list of colors
    pub fn from_colors(colors: Vec<[f32; 3]>) -> Self {
        Self { colors }
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
    pub fn get(&self, index: usize) -> Option<[f32; 3]> {
        self.colors.get(index).copied()
    }

    /// Append a color, returning its index
    pub fn push(&mut self, color: [f32; 3]) -> usize {
        self.colors.push(color);
        self.colors.len() - 1
    }

    /// Get all colors as a slice
    pub fn colors(&self) -> &[[f32; 3]] {
        &self.colors
    }

    /// Iterate over the colors in index order
    pub fn iter(&self) -> std::slice::Iter<'_, [f32; 3]> {
        self.colors.iter()
    }

    /// Find the entry closest to a packed pixel.
    ///
    /// Minimizes squared Euclidean RGB distance; the first entry wins on
    /// ties. Returns `None` for an empty palette.
    pub fn find_nearest(&self, pixel: u32) -> Option<usize> {
        let mut min_dist = f32::INFINITY;
        let mut min_index = None;
        for (i, &c) in self.colors.iter().enumerate() {
            let dist = color::distance_sq(pixel, c);
            if dist < min_dist {
                min_dist = dist;
                min_index = Some(i);
            }
        }
        min_index
    }

    /// Byte-quantized color at index, packed as `0x00RRGGBB`
    pub fn packed_color(&self, index: usize) -> Option<u32> {
        self.colors
            .get(index)
            .map(|&c| to_rgb(c).to_packed())
    }

    /// Round and clamp every entry into a [`Colormap`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::ColormapFull`](crate::Error::ColormapFull) if the
    /// palette holds more than 256 colors.
    pub fn to_colormap(&self) -> Result<Colormap> {
        let mut cmap = Colormap::new();
        for &c in &self.colors {
            cmap.add_color(to_rgb(c))?;
        }
        Ok(cmap)
    }
}

impl FromIterator<[f32; 3]> for Palette {
    fn from_iter<I: IntoIterator<Item = [f32; 3]>>(iter: I) -> Self {
        Self {
            colors: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a Palette {
    type Item = &'a [f32; 3];
    type IntoIter = std::slice::Iter<'a, [f32; 3]>;

    fn into_iter(self) -> Self::IntoIter {
        self.colors.iter()
    }
}

/// Round a channel value to the nearest integer and clamp it to `[0, 255]`.
#[inline]
pub fn float_to_byte(x: f32) -> u8 {
    let xi = x.round();
    if xi.is_nan() || xi < 0.0 {
        0
    } else if xi > color::MAX_RGB as f32 {
        color::MAX_RGB
    } else {
        xi as u8
    }
}

fn to_rgb(c: [f32; 3]) -> Rgb {
    Rgb::new(
        float_to_byte(c[color::RED]),
        float_to_byte(c[color::GREEN]),
        float_to_byte(c[color::BLUE]),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_float_to_byte() {
        assert_eq!(float_to_byte(-3.0), 0);
        assert_eq!(float_to_byte(0.49), 0);
        assert_eq!(float_to_byte(0.5), 1);
        assert_eq!(float_to_byte(127.6), 128);
        assert_eq!(float_to_byte(255.4), 255);
        assert_eq!(float_to_byte(300.0), 255);
        assert_eq!(float_to_byte(f32::NAN), 0);
    }

    #[test]
    fn test_find_nearest() {
        let palette = Palette::from_colors(vec![[0.0, 0.0, 0.0], [250.0, 250.0, 250.0]]);
        assert_eq!(palette.find_nearest(color::compose_rgb(10, 10, 10)), Some(0));
        assert_eq!(
            palette.find_nearest(color::compose_rgb(200, 180, 250)),
            Some(1)
        );
        assert_eq!(Palette::new().find_nearest(0), None);
    }

    #[test]
    fn test_find_nearest_tie_prefers_first() {
        let palette = Palette::from_colors(vec![[0.0, 0.0, 0.0], [20.0, 0.0, 0.0]]);
        assert_eq!(palette.find_nearest(color::compose_rgb(10, 0, 0)), Some(0));
    }

    #[test]
    fn test_to_colormap_rounds() {
        let palette = Palette::from_colors(vec![[10.4, 10.5, 254.9], [-1.0, 128.2, 300.0]]);
        let cmap = palette.to_colormap().unwrap();
        assert_eq!(cmap.get_rgb(0), Some((10, 11, 255)));
        assert_eq!(cmap.get_rgb(1), Some((0, 128, 255)));
        assert_eq!(palette.packed_color(0), Some(0x000a_0bff));
    }

    #[test]
    fn test_to_colormap_overflow() {
        let palette: Palette = (0..257).map(|i| [i as f32, 0.0, 0.0]).collect();
        assert_eq!(palette.len(), 257);
        assert!(palette.to_colormap().is_err());
    }
}
