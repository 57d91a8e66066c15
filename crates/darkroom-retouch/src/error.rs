//! Error type for the Retouch Kernel.

use thiserror::Error;

/// Errors raised by `darkroom-retouch`.
#[derive(Error, Debug)]
pub enum RetouchError {
    /// Wraps a lower-level `darkroom-core` error.
    #[error(transparent)]
    Core(#[from] darkroom_core::Error),

    /// Wraps a `darkroom-ops` kernel error.
    #[error(transparent)]
    Ops(#[from] darkroom_ops::OpsError),
}

/// Result alias for this crate.
pub type RetouchResult<T> = Result<T, RetouchError>;
