//! Error types for the test framework

use thiserror::Error;

/// Errors that can occur while preparing regression test inputs
#[derive(Debug, Error)]
pub enum TestError {
    /// Failed to assemble a synthetic image
    #[error("failed to build test image: {0}")]
    Image(#[from] colorquant_core::Error),

    /// Random color generator could not be set up
    #[error("failed to set up random colors: {0}")]
    Generator(String),
}

/// Result type for test operations
pub type TestResult<T> = Result<T, TestError>;
