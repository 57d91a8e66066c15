//! Error type for the Lab Kernel.

use thiserror::Error;

/// Errors raised by `darkroom-lab`.
#[derive(Error, Debug)]
pub enum LabError {
    /// Wraps a lower-level `darkroom-core` error.
    #[error(transparent)]
    Core(#[from] darkroom_core::Error),

    /// Wraps a `darkroom-ops` kernel error.
    #[error(transparent)]
    Ops(#[from] darkroom_ops::OpsError),
}

/// Result alias for this crate.
pub type LabResult<T> = Result<T, LabError>;
