//! Error type for the Exposure Kernel.

use thiserror::Error;

/// Errors raised by `darkroom-exposure`.
#[derive(Error, Debug)]
pub enum ExposureError {
    /// A config field sits outside the range spec'd for it.
    #[error("invalid exposure config: {0}")]
    InvalidConfig(String),

    /// Wraps a lower-level `darkroom-core` error (bad ROI, bad dimensions).
    #[error(transparent)]
    Core(#[from] darkroom_core::Error),
}

/// Result alias for this crate.
pub type ExposureResult<T> = Result<T, ExposureError>;
