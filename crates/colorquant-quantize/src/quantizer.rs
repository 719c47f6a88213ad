//! The color quantizer contract
//!
//! Every quantization strategy produces a [`Palette`] and classifies colors
//! against it. [`ColorQuantizer`] supplies the shared behavior: nearest-color
//! lookup by linear scan and conversion of a whole image into an
//! [`IndexedImage`]. Strategies may override [`ColorQuantizer::find_color_index`]
//! (the octree does, for quick quantization).
//!
//! [`Quantizer`] wraps the three strategies in one enum, selected by a
//! [`QuantizeMethod`].

use crate::kmeans::{KMeansOptions, KMeansQuantizer};
use crate::median_cut::{MedianCutOptions, MedianCutQuantizer};
use crate::octree::{OctreeOptions, OctreeQuantizer};
use crate::{ColorError, ColorResult};
use colorquant_core::{IndexedImage, Palette, RgbImage};

/// Largest palette that can be indexed with one byte per pixel
pub const MAX_PALETTE_SIZE: usize = 256;

/// Reject a target palette size outside `1..=256`.
pub(crate) fn check_max_colors(max_colors: u32) -> ColorResult<()> {
    if max_colors == 0 || max_colors as usize > MAX_PALETTE_SIZE {
        return Err(ColorError::InvalidParameters(format!(
            "max_colors must be between 1 and 256, got {max_colors}"
        )));
    }
    Ok(())
}

/// Index of the palette entry closest to `rgb`.
///
/// Minimizes squared Euclidean RGB distance; ties resolve to the first
/// entry in palette order.
///
/// # Errors
///
/// Returns [`ColorError::EmptyPalette`] if the palette has no entries.
pub fn nearest_color_index(rgb: u32, palette: &Palette) -> ColorResult<usize> {
    palette.find_nearest(rgb).ok_or(ColorError::EmptyPalette)
}

/// Shared behavior of all color quantizers
pub trait ColorQuantizer {
    /// The palette computed by this quantizer
    fn color_map(&self) -> &Palette;

    /// Number of quantized colors
    fn color_count(&self) -> usize {
        self.color_map().len()
    }

    /// Palette index for a packed `0x__RRGGBB` color.
    ///
    /// The default is an exhaustive nearest-color search over `palette`.
    fn find_color_index(&self, rgb: u32, palette: &Palette) -> ColorResult<usize> {
        nearest_color_index(rgb, palette)
    }

    /// Quantize a full-color image into an indexed image.
    ///
    /// # Errors
    ///
    /// Returns [`ColorError::PaletteOverflow`] before touching any pixel if
    /// the palette has more than 256 entries.
    fn quantize(&self, image: &RgbImage) -> ColorResult<IndexedImage> {
        let palette = self.color_map();
        if palette.len() > MAX_PALETTE_SIZE {
            return Err(ColorError::PaletteOverflow { len: palette.len() });
        }

        let indices = image
            .pixels()
            .iter()
            .map(|&p| self.find_color_index(p, palette).map(|i| i as u8))
            .collect::<ColorResult<Vec<u8>>>()?;

        let colormap = palette.to_colormap()?;
        Ok(IndexedImage::new(
            image.width(),
            image.height(),
            indices,
            colormap,
        )?)
    }

    /// Replace every color by its (byte-rounded) quantized color.
    fn quantize_pixels(&self, pixels: &[u32]) -> ColorResult<Vec<u32>> {
        pixels.iter().map(|&p| self.quantize_color(p)).collect()
    }

    /// Quantized color for a single packed color, as `0x00RRGGBB`.
    fn quantize_color(&self, rgb: u32) -> ColorResult<u32> {
        let palette = self.color_map();
        let idx = self.find_color_index(rgb, palette)?;
        palette.packed_color(idx).ok_or_else(|| {
            colorquant_core::Error::IndexOutOfBounds {
                index: idx,
                len: palette.len(),
            }
            .into()
        })
    }
}

/// Quantization strategy together with its options
#[derive(Debug, Clone)]
pub enum QuantizeMethod {
    /// Heckbert median cut
    MedianCut(MedianCutOptions),
    /// Octree with sparse-node pruning
    Octree(OctreeOptions),
    /// K-means clustering
    KMeans(KMeansOptions),
}

impl Default for QuantizeMethod {
    fn default() -> Self {
        Self::MedianCut(MedianCutOptions::default())
    }
}

impl QuantizeMethod {
    /// Check the wrapped options
    pub fn validate(&self) -> ColorResult<()> {
        match self {
            Self::MedianCut(options) => options.validate(),
            Self::Octree(options) => options.validate(),
            Self::KMeans(options) => options.validate(),
        }
    }

    /// Requested palette size
    pub fn max_colors(&self) -> u32 {
        match self {
            Self::MedianCut(options) => options.max_colors,
            Self::Octree(options) => options.max_colors,
            Self::KMeans(options) => options.max_colors,
        }
    }
}

/// A quantizer built by one of the three strategies
#[derive(Debug, Clone)]
pub enum Quantizer {
    MedianCut(MedianCutQuantizer),
    Octree(OctreeQuantizer),
    KMeans(KMeansQuantizer),
}

impl Quantizer {
    /// Run the chosen strategy over a pixel sequence
    pub fn new(pixels: &[u32], method: &QuantizeMethod) -> ColorResult<Self> {
        Ok(match method {
            QuantizeMethod::MedianCut(options) => {
                Self::MedianCut(MedianCutQuantizer::new(pixels, options)?)
            }
            QuantizeMethod::Octree(options) => Self::Octree(OctreeQuantizer::new(pixels, options)?),
            QuantizeMethod::KMeans(options) => Self::KMeans(KMeansQuantizer::new(pixels, options)?),
        })
    }

    /// Run the chosen strategy over an image
    pub fn from_image(image: &RgbImage, method: &QuantizeMethod) -> ColorResult<Self> {
        Self::new(image.pixels(), method)
    }
}

impl ColorQuantizer for Quantizer {
    fn color_map(&self) -> &Palette {
        match self {
            Self::MedianCut(q) => q.color_map(),
            Self::Octree(q) => q.color_map(),
            Self::KMeans(q) => q.color_map(),
        }
    }

    fn find_color_index(&self, rgb: u32, palette: &Palette) -> ColorResult<usize> {
        match self {
            Self::MedianCut(q) => q.find_color_index(rgb, palette),
            Self::Octree(q) => q.find_color_index(rgb, palette),
            Self::KMeans(q) => q.find_color_index(rgb, palette),
        }
    }
}

/// Quantize an image with the given strategy.
pub fn quantize_image(image: &RgbImage, method: &QuantizeMethod) -> ColorResult<IndexedImage> {
    Quantizer::from_image(image, method)?.quantize(image)
}

#[cfg(test)]
mod tests {
    use super::*;
    use colorquant_core::color::compose_rgb;

    /// Minimal quantizer over a fixed palette
    struct FixedPalette(Palette);

    impl ColorQuantizer for FixedPalette {
        fn color_map(&self) -> &Palette {
            &self.0
        }
    }

    fn gray_palette(n: usize) -> FixedPalette {
        FixedPalette((0..n).map(|i| [i as f32, i as f32, i as f32]).collect())
    }

    #[test]
    fn test_check_max_colors() {
        assert!(check_max_colors(0).is_err());
        assert!(check_max_colors(1).is_ok());
        assert!(check_max_colors(256).is_ok());
        assert!(check_max_colors(257).is_err());
    }

    #[test]
    fn test_nearest_color_index() {
        let palette = Palette::from_colors(vec![[0.0, 0.0, 0.0], [100.0, 100.0, 100.0]]);
        assert_eq!(
            nearest_color_index(compose_rgb(90, 80, 70), &palette).unwrap(),
            1
        );
        assert!(matches!(
            nearest_color_index(0, &Palette::new()),
            Err(ColorError::EmptyPalette)
        ));
    }

    #[test]
    fn test_quantize_builds_indexed_image() {
        let q = FixedPalette(Palette::from_colors(vec![
            [10.4, 10.4, 10.4],
            [249.6, 249.6, 249.6],
        ]));
        let image = RgbImage::from_pixels(
            3,
            1,
            vec![
                compose_rgb(10, 10, 10),
                compose_rgb(250, 250, 250),
                compose_rgb(12, 9, 11),
            ],
        )
        .unwrap();
        let indexed = q.quantize(&image).unwrap();
        assert_eq!(indexed.indices(), &[0, 1, 0]);
        assert_eq!(indexed.colormap().get_rgb(0), Some((10, 10, 10)));
        assert_eq!(indexed.colormap().get_rgb(1), Some((250, 250, 250)));
        assert_eq!(q.color_count(), 2);
    }

    #[test]
    fn test_quantize_rejects_oversized_palette() {
        let q = gray_palette(257);
        let image = RgbImage::new(2, 2).unwrap();
        assert!(matches!(
            q.quantize(&image),
            Err(ColorError::PaletteOverflow { len: 257 })
        ));
    }

    #[test]
    fn test_quantize_full_palette() {
        let q = gray_palette(256);
        let pixels: Vec<u32> = (0..=255u8).map(|v| compose_rgb(v, v, v)).collect();
        let image = RgbImage::from_pixels(256, 1, pixels).unwrap();
        let indexed = q.quantize(&image).unwrap();
        for (i, &idx) in indexed.indices().iter().enumerate() {
            assert_eq!(idx as usize, i);
        }
    }

    #[test]
    fn test_quantize_pixels_and_color() {
        let q = FixedPalette(Palette::from_colors(vec![[0.0, 0.0, 0.0], [200.4, 100.6, 0.0]]));
        assert_eq!(q.quantize_color(compose_rgb(190, 90, 5)).unwrap(), 0x00c8_6500);
        let out = q
            .quantize_pixels(&[compose_rgb(1, 1, 1), compose_rgb(255, 128, 0)])
            .unwrap();
        assert_eq!(out, vec![0, 0x00c8_6500]);
    }

    #[test]
    fn test_quantize_empty_image() {
        let q = FixedPalette(Palette::new());
        let image = RgbImage::from_pixels(0, 0, Vec::new()).unwrap();
        let indexed = q.quantize(&image).unwrap();
        assert!(indexed.indices().is_empty());
        assert!(indexed.colormap().is_empty());
    }

    #[test]
    fn test_method_validate() {
        let method = QuantizeMethod::Octree(OctreeOptions {
            max_colors: 0,
            ..Default::default()
        });
        assert!(method.validate().is_err());
        assert_eq!(QuantizeMethod::default().max_colors(), 256);
        assert!(QuantizeMethod::default().validate().is_ok());
    }
}
