//! `PipelineError`: the Orchestrator's failure type (`spec.md` §4.7).

use thiserror::Error;

/// Which of the Orchestrator's stages an error occurred in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    /// Geometry + normalization.
    Base,
    /// Photometric inversion.
    Exposure,
    /// Dust removal, healing, local adjustments.
    Retouch,
    /// Crosstalk, CLAHE, chroma denoise, sharpening.
    Lab,
    /// Paper substrate and chemical toning.
    Toning,
    /// The final crop.
    Crop,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Stage::Base => "base",
            Stage::Exposure => "exposure",
            Stage::Retouch => "retouch",
            Stage::Lab => "lab",
            Stage::Toning => "toning",
            Stage::Crop => "crop",
        };
        f.write_str(name)
    }
}

/// An error raised by a stage, tagged with which stage raised it
/// (`spec.md` §4.7 "Failure": `PipelineError{stage, cause}`).
#[derive(Error, Debug)]
#[error("pipeline stage '{stage}' failed: {cause}")]
pub struct PipelineError {
    /// The stage that failed.
    pub stage: Stage,
    /// The underlying error.
    #[source]
    pub cause: PipelineCause,
}

/// The underlying cause wrapped by a [`PipelineError`].
#[derive(Error, Debug)]
pub enum PipelineCause {
    /// Wraps a lower-level `darkroom-core` error.
    #[error(transparent)]
    Core(#[from] darkroom_core::Error),
    /// Wraps a `darkroom-geometry` error.
    #[error(transparent)]
    Geometry(#[from] darkroom_geometry::GeometryError),
    /// Wraps a `darkroom-exposure` error.
    #[error(transparent)]
    Exposure(#[from] darkroom_exposure::ExposureError),
}

/// Result alias for this crate.
pub type PipelineResult<T> = Result<T, PipelineError>;
