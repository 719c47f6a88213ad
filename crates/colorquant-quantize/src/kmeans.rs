//! K-means clustering color quantization
//!
//! Lloyd's algorithm on RGB colors: every pixel is assigned to the nearest
//! cluster center, then each center moves to the mean of its pixels. This
//! repeats until no cluster population changes or the iteration cap is
//! reached. Assignment is done per distinct color, weighted by its pixel
//! count, which gives the same clusters as visiting every pixel.

use crate::histogram::{ColorEntry, ColorHistogram};
use crate::quantizer::{ColorQuantizer, check_max_colors};
use crate::{ColorError, ColorResult};
use colorquant_core::{IndexedImage, Palette, RgbImage, color};
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::index;

/// Seed used by [`KMeansOptions::default`]
pub const DEFAULT_SEED: u64 = 42;

/// How the initial cluster centers are chosen
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum InitialClusterMethod {
    /// Distinct image colors sampled uniformly without replacement
    #[default]
    Random,
    /// The most frequent image colors
    MostFrequent,
}

/// Options for k-means quantization
#[derive(Debug, Clone)]
pub struct KMeansOptions {
    /// Number of clusters, i.e. the maximum palette size (1..=256)
    pub max_colors: u32,
    /// Upper bound on assignment/update passes (>= 1)
    pub max_iterations: u32,
    /// Seeding strategy
    pub init: InitialClusterMethod,
    /// Seed for [`InitialClusterMethod::Random`]
    pub seed: u64,
}

impl Default for KMeansOptions {
    fn default() -> Self {
        Self {
            max_colors: 16,
            max_iterations: 500,
            init: InitialClusterMethod::Random,
            seed: DEFAULT_SEED,
        }
    }
}

impl KMeansOptions {
    /// Check that the options describe a valid run
    pub fn validate(&self) -> ColorResult<()> {
        check_max_colors(self.max_colors)?;
        if self.max_iterations == 0 {
            return Err(ColorError::InvalidParameters(
                "max_iterations must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
struct ColorCluster {
    /// channel sums of the current pass
    sum: [u64; 3],
    /// pixels assigned in the current pass
    pcount: u64,
    /// pixels assigned in the previous pass
    population: u64,
    center: [f64; 3],
}

impl ColorCluster {
    fn new(rgb: u32) -> Self {
        let c = color::to_triple(rgb);
        Self {
            sum: [0; 3],
            pcount: 0,
            population: 0,
            center: c.map(f64::from),
        }
    }

    fn distance_sq(&self, rgb: [u8; 3]) -> f64 {
        (0..3)
            .map(|c| {
                let d = rgb[c] as f64 - self.center[c];
                d * d
            })
            .sum()
    }

    fn add(&mut self, rgb: [u8; 3], count: u32) {
        for (s, &v) in self.sum.iter_mut().zip(rgb.iter()) {
            *s += v as u64 * count as u64;
        }
        self.pcount += count as u64;
    }

    /// Move the center to the mean of this pass and start a new pass.
    /// Returns the change in population.
    fn update(&mut self) -> u64 {
        if self.pcount > 0 {
            let n = self.pcount as f64;
            self.center = self.sum.map(|s| s as f64 / n);
        }
        let changed = self.pcount.abs_diff(self.population);
        self.population = self.pcount;
        self.sum = [0; 3];
        self.pcount = 0;
        changed
    }

    fn is_empty(&self) -> bool {
        self.population == 0
    }

    fn center_color(&self) -> [f32; 3] {
        self.center.map(|c| c as f32)
    }
}

/// Quantizer built by k-means clustering
#[derive(Debug, Clone)]
pub struct KMeansQuantizer {
    palette: Palette,
    total_error: f64,
    distance_history: Vec<f64>,
}

impl KMeansQuantizer {
    /// Cluster the colors of a pixel sequence.
    ///
    /// At most `max_colors` clusters are formed; fewer if the pixels have
    /// fewer distinct colors. Clusters left empty contribute no palette
    /// entry.
    ///
    /// # Errors
    ///
    /// Returns [`ColorError::InvalidParameters`] if `max_colors` is not in
    /// `1..=256` or `max_iterations` is zero.
    pub fn new(pixels: &[u32], options: &KMeansOptions) -> ColorResult<Self> {
        options.validate()?;
        let hist = ColorHistogram::new(pixels);
        let mut clusters = initial_clusters(&hist, pixels, options);

        let mut distance_history = Vec::new();
        let mut changed = u64::MAX;
        while changed > 0
            && distance_history.len() < options.max_iterations as usize
            && !clusters.is_empty()
        {
            distance_history.push(assign_colors(&mut clusters, hist.entries()));
            changed = clusters.iter_mut().map(ColorCluster::update).sum();
        }

        let palette: Palette = clusters
            .iter()
            .filter(|c| !c.is_empty())
            .map(ColorCluster::center_color)
            .collect();
        let total_error = distance_history.last().copied().unwrap_or(0.0);

        log::debug!(
            "k-means: {} colors after {} iterations, total error {:.1}",
            palette.len(),
            distance_history.len(),
            total_error
        );
        Ok(Self {
            palette,
            total_error,
            distance_history,
        })
    }

    /// Cluster the colors of an image
    pub fn from_image(image: &RgbImage, options: &KMeansOptions) -> ColorResult<Self> {
        Self::new(image.pixels(), options)
    }

    /// Sum of squared distances of all pixels to their cluster center in
    /// the final assignment pass
    pub fn total_error(&self) -> f64 {
        self.total_error
    }

    /// Number of assignment/update passes performed
    pub fn iterations(&self) -> usize {
        self.distance_history.len()
    }

    /// Total assignment distance of every pass, in order
    pub fn distance_history(&self) -> &[f64] {
        &self.distance_history
    }
}

impl ColorQuantizer for KMeansQuantizer {
    fn color_map(&self) -> &Palette {
        &self.palette
    }
}

/// Quantize an image using k-means clustering
pub fn kmeans_quant(image: &RgbImage, options: &KMeansOptions) -> ColorResult<IndexedImage> {
    KMeansQuantizer::from_image(image, options)?.quantize(image)
}

fn initial_clusters(
    hist: &ColorHistogram,
    pixels: &[u32],
    options: &KMeansOptions,
) -> Vec<ColorCluster> {
    let k = (options.max_colors as usize).min(hist.num_colors());
    if k == 0 {
        return Vec::new();
    }
    match options.init {
        InitialClusterMethod::Random => {
            let mut rng = StdRng::seed_from_u64(options.seed);
            index::sample(&mut rng, hist.num_colors(), k)
                .into_iter()
                .map(|i| ColorCluster::new(hist.entries()[i].rgb))
                .collect()
        }
        InitialClusterMethod::MostFrequent => ColorHistogram::sorted_by_frequency(pixels)
            .iter()
            .take(k)
            .map(|e| ColorCluster::new(e.rgb))
            .collect(),
    }
}

/// Add every color to its nearest cluster; returns the total squared
/// distance over all pixels.
fn assign_colors(clusters: &mut [ColorCluster], colors: &[ColorEntry]) -> f64 {
    let mut dist_sum = 0.0;
    for entry in colors {
        let rgb = color::to_triple(entry.rgb);
        let mut min_dist = f64::INFINITY;
        let mut closest = 0;
        for (i, c) in clusters.iter().enumerate() {
            let d = c.distance_sq(rgb);
            if d < min_dist {
                min_dist = d;
                closest = i;
            }
        }
        clusters[closest].add(rgb, entry.count);
        dist_sum += min_dist * entry.count as f64;
    }
    dist_sum
}

#[cfg(test)]
mod tests {
    use super::*;
    use colorquant_core::color::compose_rgb;

    fn test_pixels() -> Vec<u32> {
        let mut pixels = Vec::new();
        for y in 0..24u32 {
            for x in 0..32u32 {
                let r = (x * 8) as u8;
                let g = (y * 10) as u8;
                let b = ((x * y) % 256) as u8;
                pixels.push(compose_rgb(r, g, b));
            }
        }
        pixels
    }

    fn options(max_colors: u32) -> KMeansOptions {
        KMeansOptions {
            max_colors,
            ..Default::default()
        }
    }

    #[test]
    fn test_default_options() {
        let opts = KMeansOptions::default();
        assert_eq!(opts.max_colors, 16);
        assert_eq!(opts.max_iterations, 500);
        assert_eq!(opts.init, InitialClusterMethod::Random);
        assert_eq!(opts.seed, DEFAULT_SEED);
        assert!(opts.validate().is_ok());
    }

    #[test]
    fn test_invalid_options() {
        let zero_iter = KMeansOptions {
            max_iterations: 0,
            ..Default::default()
        };
        assert!(matches!(
            KMeansQuantizer::new(&[0], &zero_iter),
            Err(ColorError::InvalidParameters(_))
        ));
        assert!(KMeansQuantizer::new(&[0], &options(0)).is_err());
        assert!(KMeansQuantizer::new(&[0], &options(300)).is_err());
    }

    #[test]
    fn test_cluster_update() {
        let mut c = ColorCluster::new(compose_rgb(0, 0, 0));
        c.add([10, 20, 30], 1);
        c.add([30, 20, 10], 3);
        assert_eq!(c.update(), 4);
        assert_eq!(c.center, [25.0, 20.0, 15.0]);
        assert!(!c.is_empty());

        // nothing assigned: center stays, population drops to zero
        assert_eq!(c.update(), 4);
        assert_eq!(c.center, [25.0, 20.0, 15.0]);
        assert!(c.is_empty());
    }

    #[test]
    fn test_deterministic_for_seed() {
        let pixels = test_pixels();
        let a = KMeansQuantizer::new(&pixels, &options(8)).unwrap();
        let b = KMeansQuantizer::new(&pixels, &options(8)).unwrap();
        assert_eq!(a.color_map(), b.color_map());
        assert_eq!(a.iterations(), b.iterations());
        assert_eq!(a.total_error(), b.total_error());
    }

    #[test]
    fn test_distance_history_non_increasing() {
        let pixels = test_pixels();
        for seed in [1u64, 7, 99] {
            let q = KMeansQuantizer::new(
                &pixels,
                &KMeansOptions {
                    max_colors: 12,
                    seed,
                    ..Default::default()
                },
            )
            .unwrap();
            let history = q.distance_history();
            assert!(!history.is_empty());
            for w in history.windows(2) {
                assert!(w[1] <= w[0] * (1.0 + 1e-9), "{} > {}", w[1], w[0]);
            }
            assert_eq!(q.total_error(), *history.last().unwrap());
            assert!(q.color_count() <= 12);
        }
    }

    #[test]
    fn test_fewer_colors_than_clusters() {
        let red = compose_rgb(255, 0, 0);
        let green = compose_rgb(0, 255, 0);
        let blue = compose_rgb(0, 0, 255);
        let pixels = [red, green, blue, red];
        let q = KMeansQuantizer::new(&pixels, &options(16)).unwrap();

        assert_eq!(q.color_count(), 3);
        assert_eq!(q.total_error(), 0.0);
        // first pass fills the clusters, second pass sees no change
        assert_eq!(q.iterations(), 2);
        for c in [red, green, blue] {
            let idx = q.find_color_index(c, q.color_map()).unwrap();
            assert_eq!(q.color_map().packed_color(idx), Some(c));
        }
    }

    #[test]
    fn test_single_cluster_is_mean() {
        let mut pixels = vec![compose_rgb(0, 0, 0); 3];
        pixels.push(compose_rgb(100, 200, 40));
        for init in [InitialClusterMethod::Random, InitialClusterMethod::MostFrequent] {
            let q = KMeansQuantizer::new(
                &pixels,
                &KMeansOptions {
                    max_colors: 1,
                    init,
                    ..Default::default()
                },
            )
            .unwrap();
            assert_eq!(q.color_map().get(0), Some([25.0, 50.0, 10.0]));
        }
    }

    #[test]
    fn test_most_frequent_seeding() {
        let a = compose_rgb(10, 10, 10);
        let b = compose_rgb(200, 10, 10);
        let c = compose_rgb(10, 200, 10);
        let mut pixels = vec![a; 5];
        pixels.extend([b, b, b, c]);
        let hist = ColorHistogram::new(&pixels);
        let clusters = initial_clusters(
            &hist,
            &pixels,
            &KMeansOptions {
                max_colors: 2,
                init: InitialClusterMethod::MostFrequent,
                ..Default::default()
            },
        );
        assert_eq!(clusters.len(), 2);
        assert_eq!(clusters[0].center, [10.0, 10.0, 10.0]);
        assert_eq!(clusters[1].center, [200.0, 10.0, 10.0]);
    }

    #[test]
    fn test_iteration_cap() {
        let pixels = test_pixels();
        let q = KMeansQuantizer::new(
            &pixels,
            &KMeansOptions {
                max_colors: 32,
                max_iterations: 1,
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!(q.iterations(), 1);
    }

    #[test]
    fn test_empty_input() {
        let q = KMeansQuantizer::new(&[], &KMeansOptions::default()).unwrap();
        assert_eq!(q.color_count(), 0);
        assert_eq!(q.iterations(), 0);
        assert_eq!(q.total_error(), 0.0);
    }

    #[test]
    fn test_kmeans_quant() {
        let pixels = test_pixels();
        let image = RgbImage::from_pixels(32, 24, pixels).unwrap();
        let indexed = kmeans_quant(&image, &options(6)).unwrap();
        assert!(indexed.colormap().len() <= 6);
        assert_eq!(indexed.indices().len(), 32 * 24);
    }
}
