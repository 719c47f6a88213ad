//! Color histogram: the distinct colors of an image with their counts
//!
//! Only colors that actually occur are recorded. The unused top byte of
//! each packed pixel is ignored.

use colorquant_core::color;

/// A distinct color and the number of pixels that have it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorEntry {
    /// Packed `0x00RRGGBB` color
    pub rgb: u32,
    /// Number of pixels with this color (always >= 1)
    pub count: u32,
}

/// Histogram of the distinct colors in a pixel sequence
#[derive(Debug, Clone, Default)]
pub struct ColorHistogram {
    entries: Vec<ColorEntry>,
}

impl ColorHistogram {
    /// Build the histogram with entries in ascending color order.
    pub fn new(pixels: &[u32]) -> Self {
        let mut sorted: Vec<u32> = pixels.iter().map(|&p| color::strip_alpha(p)).collect();
        sorted.sort_unstable();

        let mut entries: Vec<ColorEntry> = Vec::new();
        for rgb in sorted {
            match entries.last_mut() {
                Some(last) if last.rgb == rgb => last.count += 1,
                _ => entries.push(ColorEntry { rgb, count: 1 }),
            }
        }

        log::debug!(
            "color histogram: {} distinct colors in {} pixels",
            entries.len(),
            pixels.len()
        );
        Self { entries }
    }

    /// Build the histogram with entries sorted by descending frequency.
    ///
    /// Colors with equal counts keep ascending color order.
    pub fn sorted_by_frequency(pixels: &[u32]) -> Self {
        let mut hist = Self::new(pixels);
        hist.entries.sort_by(|a, b| b.count.cmp(&a.count));
        hist
    }

    /// Number of distinct colors
    #[inline]
    pub fn num_colors(&self) -> usize {
        self.entries.len()
    }

    /// Check if no colors were recorded
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Distinct color at `index`
    pub fn color(&self, index: usize) -> Option<u32> {
        self.entries.get(index).map(|e| e.rgb)
    }

    /// Pixel count of the color at `index`
    pub fn count(&self, index: usize) -> Option<u32> {
        self.entries.get(index).map(|e| e.count)
    }

    /// All entries
    pub fn entries(&self) -> &[ColorEntry] {
        &self.entries
    }

    /// Sum of all counts, i.e. the number of pixels the histogram was built from
    pub fn total_pixels(&self) -> u64 {
        self.entries.iter().map(|e| e.count as u64).sum()
    }

    /// Iterate over the entries
    pub fn iter(&self) -> std::slice::Iter<'_, ColorEntry> {
        self.entries.iter()
    }
}

/// Count the distinct colors in a pixel sequence.
pub fn count_colors(pixels: &[u32]) -> usize {
    let mut sorted: Vec<u32> = pixels.iter().map(|&p| color::strip_alpha(p)).collect();
    sorted.sort_unstable();
    sorted.dedup();
    sorted.len()
}
