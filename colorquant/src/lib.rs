//! colorquant - Color quantization for Rust
//!
//! Reduces a full-color RGB image to a palette of at most 256 colors and an
//! indexed image whose pixels refer to that palette.
//!
//! # Overview
//!
//! Three quantization strategies share one contract:
//!
//! - Median cut (Heckbert): recursive splitting of color boxes at the median
//! - Octree: color description tree pruned bottom-up
//! - K-means: iterative clustering around seeded centers
//!
//! Decoding and encoding image files is left to the caller. Images are
//! exchanged as flat buffers of packed `0x__RRGGBB` pixels.
//!
//! # Example
//!
//! ```
//! use colorquant::RgbImage;
//! use colorquant::quantize::{OctreeOptions, QuantizeMethod, quantize_image};
//!
//! let pixels = vec![0x000a_0a0a, 0x00fa_fafa, 0x000a_0a0a];
//! let image = RgbImage::from_pixels(3, 1, pixels).unwrap();
//! let method = QuantizeMethod::Octree(OctreeOptions {
//!     max_colors: 2,
//!     ..Default::default()
//! });
//! let indexed = quantize_image(&image, &method).unwrap();
//!
//! assert_eq!(indexed.colormap().len(), 2);
//! assert_eq!(indexed.indices()[0], indexed.indices()[2]);
//! assert_ne!(indexed.indices()[0], indexed.indices()[1]);
//! ```

// Re-export core types (primary data structures used everywhere)
pub use colorquant_core::*;

// Re-export the algorithms as a module to avoid name conflicts
pub use colorquant_quantize as quantize;
