//! colorquant Quantize - Color quantization algorithms
//!
//! This crate reduces the colors of an RGB image to a small palette:
//!
//! - **Color histogram** ([`histogram`]): Distinct colors and their pixel counts
//! - **Quantizer contract** ([`quantizer`]): Nearest-color classification, indexed image output, strategy dispatch
//! - **Median cut** ([`median_cut`]): Heckbert's recursive box splitting
//! - **Octree** ([`octree`]): Color description tree with sparse-node pruning
//! - **K-means** ([`kmeans`]): Iterative clustering with seeded initialization
//!
//! # Example
//!
//! ```
//! use colorquant_quantize::{MedianCutOptions, median_cut_quant};
//! use colorquant_quantize::colorquant_core::RgbImage;
//!
//! let pixels = vec![0x00ff_0000, 0x0000_ff00, 0x0000_00ff, 0x00ff_0000];
//! let image = RgbImage::from_pixels(2, 2, pixels).unwrap();
//! let indexed = median_cut_quant(&image, &MedianCutOptions { max_colors: 2 }).unwrap();
//!
//! assert_eq!(indexed.colormap().len(), 2);
//! assert_eq!(indexed.indices()[0], indexed.indices()[3]);
//! ```

pub mod error;
pub mod histogram;
pub mod kmeans;
pub mod median_cut;
pub mod octree;
pub mod quantizer;

// Re-export core types
pub use colorquant_core;

// Re-export error types
pub use error::{ColorError, ColorResult};

// Re-export histogram types
pub use histogram::{ColorEntry, ColorHistogram, count_colors};

// Re-export the quantizer contract
pub use quantizer::{
    // Types
    ColorQuantizer,
    MAX_PALETTE_SIZE,
    QuantizeMethod,
    Quantizer,
    // Functions
    nearest_color_index,
    quantize_image,
};

// Re-export median cut
pub use median_cut::{
    // Types
    MedianCutOptions,
    MedianCutQuantizer,
    // Functions
    median_cut_quant,
    median_cut_quant_simple,
};

// Re-export octree
pub use octree::{
    // Types
    OctreeOptions,
    OctreeQuantizer,
    // Functions
    octree_quant,
};

// Re-export k-means
pub use kmeans::{
    // Types
    DEFAULT_SEED,
    InitialClusterMethod,
    KMeansOptions,
    KMeansQuantizer,
    // Functions
    kmeans_quant,
};
