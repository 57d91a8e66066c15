//! Error type for the Toning Kernel.

use thiserror::Error;

/// Errors raised by `darkroom-toning`.
#[derive(Error, Debug)]
pub enum ToningError {
    /// Wraps a lower-level `darkroom-core` error.
    #[error(transparent)]
    Core(#[from] darkroom_core::Error),
}

/// Result alias for this crate.
pub type ToningResult<T> = Result<T, ToningError>;
