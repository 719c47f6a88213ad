//! Median cut color quantization
//!
//! Implementation of Heckbert's median cut algorithm (Heckbert P., "Color
//! Image Quantization for Frame Buffer Display", SIGGRAPH 1982). Unlike the
//! published version no initial uniform quantization is applied; every
//! color of the image takes part in the partitioning.
//!
//! The distinct colors are held in one array. A color box is a contiguous
//! range of that array; splitting a box sorts its range along the longest
//! axis and cuts it where half of the box's pixels lie on each side.

use crate::histogram::{ColorEntry, ColorHistogram};
use crate::quantizer::{ColorQuantizer, check_max_colors};
use crate::ColorResult;
use colorquant_core::{IndexedImage, Palette, RgbImage, color};
use std::cmp::Ordering;
use std::collections::BinaryHeap;

/// Options for median cut quantization
#[derive(Debug, Clone)]
pub struct MedianCutOptions {
    /// Maximum number of colors in the output palette (1..=256)
    pub max_colors: u32,
}

impl Default for MedianCutOptions {
    fn default() -> Self {
        Self { max_colors: 256 }
    }
}

impl MedianCutOptions {
    /// Check that the options describe a valid run
    pub fn validate(&self) -> ColorResult<()> {
        check_max_colors(self.max_colors)
    }
}

/// Quantizer built by median cut
#[derive(Debug, Clone)]
pub struct MedianCutQuantizer {
    palette: Palette,
    image_colors: usize,
}

impl MedianCutQuantizer {
    /// Compute the palette for a pixel sequence.
    ///
    /// If the image has no more than `max_colors` distinct colors, each of
    /// them becomes a palette entry unchanged. Otherwise boxes are split
    /// until `max_colors` boxes exist or none can be split any further, so
    /// the palette may be smaller than requested.
    ///
    /// # Errors
    ///
    /// Returns [`ColorError::InvalidParameters`](crate::ColorError::InvalidParameters)
    /// if `max_colors` is not in `1..=256`.
    pub fn new(pixels: &[u32], options: &MedianCutOptions) -> ColorResult<Self> {
        options.validate()?;
        let max_colors = options.max_colors as usize;

        let hist = ColorHistogram::new(pixels);
        let image_colors = hist.num_colors();
        let mut colors: Vec<ColorNode> = hist.iter().map(ColorNode::from).collect();

        let palette: Palette = if image_colors <= max_colors {
            colors.iter().map(ColorNode::as_float).collect()
        } else {
            find_reference_colors(&mut colors, max_colors)
                .iter()
                .map(|b| b.average_color(&colors))
                .collect()
        };

        log::debug!(
            "median cut: {} image colors reduced to {} (requested {})",
            image_colors,
            palette.len(),
            max_colors
        );
        Ok(Self {
            palette,
            image_colors,
        })
    }

    /// Compute the palette for an image
    pub fn from_image(image: &RgbImage, options: &MedianCutOptions) -> ColorResult<Self> {
        Self::new(image.pixels(), options)
    }

    /// Number of distinct colors in the source pixels
    pub fn image_colors(&self) -> usize {
        self.image_colors
    }
}

impl ColorQuantizer for MedianCutQuantizer {
    fn color_map(&self) -> &Palette {
        &self.palette
    }
}

/// Quantize an image using the median cut algorithm
pub fn median_cut_quant(image: &RgbImage, options: &MedianCutOptions) -> ColorResult<IndexedImage> {
    MedianCutQuantizer::from_image(image, options)?.quantize(image)
}

/// Median cut quantization with default options and the given palette size
pub fn median_cut_quant_simple(image: &RgbImage, max_colors: u32) -> ColorResult<IndexedImage> {
    median_cut_quant(image, &MedianCutOptions { max_colors })
}

/// Split boxes until `max_colors` boxes exist or no box can be split.
///
/// The returned boxes are ordered by their position in `colors`.
fn find_reference_colors(colors: &mut [ColorNode], max_colors: usize) -> Vec<ColorBox> {
    let mut queue = BinaryHeap::new();
    queue.push(ColorBox::new(colors, 0, colors.len() - 1, 0));
    let mut finished: Vec<ColorBox> = Vec::new();

    while queue.len() + finished.len() < max_colors {
        let Some(cb) = queue.pop() else {
            // no splittable box left
            break;
        };
        match cb.split(colors) {
            Some((b1, b2)) => {
                log::trace!(
                    "split box [{}, {}] level {} along {:?}, bounds {:?}..{:?}",
                    cb.lo,
                    cb.hi,
                    cb.level,
                    cb.max_dim,
                    cb.min,
                    cb.max
                );
                for b in [b1, b2] {
                    if b.count > 0 {
                        queue.push(b);
                    }
                }
            }
            None => finished.push(cb),
        }
    }

    finished.extend(queue.into_vec());
    finished.sort_by_key(|b| b.lo);
    finished
}

/// A distinct image color with its pixel count
#[derive(Debug, Clone, Copy)]
struct ColorNode {
    rgb: [u8; 3],
    count: u32,
}

impl ColorNode {
    fn as_float(&self) -> [f32; 3] {
        [self.rgb[0] as f32, self.rgb[1] as f32, self.rgb[2] as f32]
    }
}

impl From<&ColorEntry> for ColorNode {
    fn from(entry: &ColorEntry) -> Self {
        Self {
            rgb: color::to_triple(entry.rgb),
            count: entry.count,
        }
    }
}

/// Color space axis
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ColorDimension {
    Red,
    Green,
    Blue,
}

impl ColorDimension {
    fn channel(self) -> usize {
        match self {
            Self::Red => color::RED,
            Self::Green => color::GREEN,
            Self::Blue => color::BLUE,
        }
    }
}

/// Longest axis for the given per-channel spans.
///
/// Ties prefer blue, then green, then red.
fn max_box_dimension(span: [u8; 3]) -> ColorDimension {
    let [r, g, b] = span;
    if b >= r && b >= g {
        ColorDimension::Blue
    } else if g >= r && g >= b {
        ColorDimension::Green
    } else {
        ColorDimension::Red
    }
}

/// Contiguous range `[lo, hi]` of the color array with cached bounds
#[derive(Debug, Clone)]
struct ColorBox {
    lo: usize,
    hi: usize,
    level: u32,
    /// number of pixels represented by this box
    count: u64,
    min: [u8; 3],
    max: [u8; 3],
    max_span: u8,
    max_dim: ColorDimension,
}

impl ColorBox {
    fn new(colors: &[ColorNode], lo: usize, hi: usize, level: u32) -> Self {
        let mut count = 0u64;
        let mut min = [color::MAX_RGB; 3];
        let mut max = [0u8; 3];
        for node in &colors[lo..=hi] {
            count += node.count as u64;
            for c in 0..3 {
                min[c] = min[c].min(node.rgb[c]);
                max[c] = max[c].max(node.rgb[c]);
            }
        }

        let span = [max[0] - min[0], max[1] - min[1], max[2] - min[2]];
        let max_dim = max_box_dimension(span);
        Self {
            lo,
            hi,
            level,
            count,
            min,
            max,
            max_span: span[max_dim.channel()],
            max_dim,
        }
    }

    fn color_count(&self) -> usize {
        self.hi - self.lo + 1
    }

    fn is_splittable(&self) -> bool {
        self.color_count() >= 2 && self.max_span > 0
    }

    /// Split at the median along the longest axis.
    ///
    /// Returns `None` for a box that cannot be split.
    fn split(&self, colors: &mut [ColorNode]) -> Option<(ColorBox, ColorBox)> {
        if !self.is_splittable() {
            return None;
        }
        let med = self.find_median(colors);
        Some((
            ColorBox::new(colors, self.lo, med, self.level + 1),
            ColorBox::new(colors, med + 1, self.hi, self.level + 1),
        ))
    }

    /// Sort the box's range along its longest axis and find the index at
    /// which half of its pixels have been accumulated.
    ///
    /// The result is always in `[lo, hi)` so both halves are non-empty.
    fn find_median(&self, colors: &mut [ColorNode]) -> usize {
        let channel = self.max_dim.channel();
        colors[self.lo..=self.hi].sort_by_key(|node| node.rgb[channel]);

        let half = self.count / 2;
        let mut pix_count = 0u64;
        let mut k = self.lo;
        while k < self.hi {
            pix_count += colors[k].count as u64;
            if pix_count >= half {
                break;
            }
            k += 1;
        }
        k.min(self.hi - 1)
    }

    /// Pixel-weighted mean color, not rounded.
    fn average_color(&self, colors: &[ColorNode]) -> [f32; 3] {
        let mut sum = [0f64; 3];
        let mut n = 0f64;
        for node in &colors[self.lo..=self.hi] {
            let cnt = node.count as f64;
            for c in 0..3 {
                sum[c] += cnt * node.rgb[c] as f64;
            }
            n += cnt;
        }
        if n == 0.0 {
            return [0.0; 3];
        }
        [
            (sum[0] / n) as f32,
            (sum[1] / n) as f32,
            (sum[2] / n) as f32,
        ]
    }
}

/// Split priority: shallower boxes first, then wider boxes, then lower
/// array position. `Greater` means "split first".
fn compare_box_priority(a: &ColorBox, b: &ColorBox) -> Ordering {
    b.level
        .cmp(&a.level)
        .then(a.max_span.cmp(&b.max_span))
        .then(b.lo.cmp(&a.lo))
}

impl Ord for ColorBox {
    fn cmp(&self, other: &Self) -> Ordering {
        compare_box_priority(self, other)
    }
}

impl PartialOrd for ColorBox {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for ColorBox {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for ColorBox {}
