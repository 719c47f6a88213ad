//! Error types for colorquant-quantize

use thiserror::Error;

/// Errors that can occur during color quantization
#[derive(Debug, Error)]
pub enum ColorError {
    /// Core library error
    #[error("core error: {0}")]
    Core(#[from] colorquant_core::Error),

    /// Invalid parameters, rejected before any computation starts
    #[error("invalid parameters: {0}")]
    InvalidParameters(String),

    /// Palette too large to be indexed with one byte per pixel
    #[error("cannot index to more than 256 colors: palette has {len}")]
    PaletteOverflow { len: usize },

    /// Octree lookup reached a node without an assigned palette index
    #[error("cannot assign color {rgb:#08x} to a palette entry")]
    UnassignedColor { rgb: u32 },

    /// Color lookup against a palette without entries
    #[error("empty palette: no color to assign")]
    EmptyPalette,
}

/// Result type for color quantization operations
pub type ColorResult<T> = Result<T, ColorError>;
