//! Error types for AOV grading operations.
//!
//! Only the frame-level and configuration surfaces can fail. The per-pixel
//! path never returns an error; degenerate numbers are saturated instead.

use thiserror::Error;

/// Error type for AOV grading operations.
#[derive(Error, Debug)]
pub enum OpsError {
    /// Invalid dimensions specified.
    #[error("invalid dimensions: {0}")]
    InvalidDimensions(String),

    /// A buffer does not match the frame size.
    #[error("size mismatch: {0}")]
    SizeMismatch(String),

    /// `use_mask` is set but no mask buffer was supplied.
    #[error("mask is enabled but no mask input was supplied")]
    MissingMask,

    /// Configuration could not be parsed or serialized.
    #[error("config error: {0}")]
    Config(String),

    /// Configuration file could not be read.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<serde_yaml::Error> for OpsError {
    fn from(e: serde_yaml::Error) -> Self {
        OpsError::Config(e.to_string())
    }
}

/// Result type for AOV grading operations.
pub type OpsResult<T> = Result<T, OpsError>;
