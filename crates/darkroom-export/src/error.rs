//! Failure type for the Export Compositor.

use thiserror::Error;

/// Errors raised while sizing, framing, color-managing, or encoding an
/// export (`spec.md` §4.9).
#[derive(Error, Debug)]
pub enum ExportError {
    /// A lower-level `darkroom-core` buffer operation failed.
    #[error(transparent)]
    Core(#[from] darkroom_core::Error),
    /// Resizing the content buffer failed.
    #[error(transparent)]
    Ops(#[from] darkroom_ops::OpsError),
    /// Loading or applying an ICC profile failed.
    #[error(transparent)]
    Icc(#[from] darkroom_icc::IccError),
    /// Encoding the final buffer to JPEG or TIFF failed.
    #[error(transparent)]
    Io(#[from] darkroom_io::IoError),
}

/// Result alias for this crate.
pub type ExportResult<T> = Result<T, ExportError>;
