//! The darkroom pipeline's Exposure Kernel: log-space normalization, the
//! H&D characteristic curve, slider-to-physical mapping, and the
//! auto-exposure solver.
//!
//! Three process modes share one curve evaluator. C41 and B&W measure their
//! normalization bounds directly from the negative's percentiles
//! ([`NegativeHeuristic`]); E6 measures them with shadow/highlight roles
//! swapped ([`SlideHeuristic`]), which is where its "already a positive"
//! inversion actually happens — by the time [`apply_characteristic_curve`]
//! runs, all three modes see the same normalized `[0, 1]` input.

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

mod config;
mod curve;
mod error;
mod heuristics;
mod normalization;
mod percentile;
mod photometric;
mod solver;

pub use config::{ExposureConfig, CMY_MAX_DENSITY, D_MAX, DENSITY_MULTIPLIER, GRADE_MULTIPLIER, TARGET_PAPER_RANGE};
pub use curve::LogisticSigmoid;
pub use error::{ExposureError, ExposureResult};
pub use heuristics::{heuristic_for_mode, BoundsHeuristic, NegativeHeuristic, SlideHeuristic};
pub use normalization::{
    measure_log_negative_bounds, normalize_log_image, to_log_space, LogNegativeBounds, LOG_EPSILON,
};
pub use photometric::{apply_characteristic_curve, slider_to_physical, PhysicalParams};
pub use solver::{solve, AutoExposureResult};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::config::ExposureConfig;
    pub use crate::curve::LogisticSigmoid;
    pub use crate::error::{ExposureError, ExposureResult};
    pub use crate::heuristics::{heuristic_for_mode, BoundsHeuristic};
    pub use crate::photometric::apply_characteristic_curve;
    pub use crate::solver::solve;
}
