//! Error type for the Geometry Kernel.

use thiserror::Error;

/// Errors raised by `darkroom-geometry`.
#[derive(Error, Debug)]
pub enum GeometryError {
    /// Wraps a lower-level `darkroom-core` error (bad ROI, bad dimensions).
    #[error(transparent)]
    Core(#[from] darkroom_core::Error),
}

/// Result alias for this crate.
pub type GeometryResult<T> = Result<T, GeometryError>;
