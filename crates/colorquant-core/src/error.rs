//! Error types for colorquant-core
//!
//! Provides a unified error type for the image and palette containers.
//! Each variant captures enough context for diagnostics without exposing
//! internal implementation details.

use thiserror::Error;

/// colorquant-core error type
#[derive(Error, Debug)]
pub enum Error {
    /// Image dimensions whose pixel count cannot be represented
    #[error("invalid image dimensions: {width}x{height}")]
    InvalidDimension { width: u32, height: u32 },

    /// Pixel buffer length does not match the image dimensions
    #[error("dimension mismatch: expected {expected} pixels, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    /// Index out of bounds
    #[error("index out of bounds: {index} >= {len}")]
    IndexOutOfBounds { index: usize, len: usize },

    /// Colormap cannot take any more entries
    #[error("colormap is full: at most {max} entries")]
    ColormapFull { max: usize },
}

/// Result type alias for colorquant-core operations
pub type Result<T> = std::result::Result<T, Error>;
