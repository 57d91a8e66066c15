//! The darkroom pipeline's Retouch Kernel: automatic dust removal, manual
//! spot healing, and local dodge/burn adjustments.
//!
//! All spatial input in [`RetouchConfig`] (manual dust spots, local
//! adjustment stroke points) is expressed in normalized raw-frame
//! coordinates. Callers must supply the current [`GeometryState`] so spot
//! and stroke positions can be mapped into the image's current display
//! orientation before rasterization.

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

mod config;
mod dust;
mod error;
mod heal;
mod local;
mod primitives;

pub use config::{DustSpot, LocalAdjustment, RetouchConfig};
pub use dust::remove_dust;
pub use error::{RetouchError, RetouchResult};
pub use heal::apply_manual_healing;
pub use local::apply_local_adjustments;

use darkroom_core::FloatImage;
use darkroom_geometry::GeometryState;

/// Runs the full Retouch Kernel: automatic dust removal, then manual
/// healing, then local dodge/burn adjustments, in that order.
#[tracing::instrument(skip(img, cfg, geometry))]
pub fn apply_retouch(
    img: &FloatImage,
    cfg: &RetouchConfig,
    geometry: &GeometryState,
    orig_w: u32,
    orig_h: u32,
    scale_factor: f32,
) -> FloatImage {
    let dusted = remove_dust(img, cfg, scale_factor);
    let healed = apply_manual_healing(&dusted, cfg, geometry, orig_w, orig_h, scale_factor);
    apply_local_adjustments(&healed, cfg, geometry, orig_w, orig_h, scale_factor)
}

pub mod prelude {
    //! Commonly used retouch types and the top-level entry point.
    pub use crate::config::RetouchConfig;
    pub use crate::apply_retouch;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn identity_state() -> GeometryState {
        GeometryState { rotation_k: 0, fine_rotation: 0.0, flip_h: false, flip_v: false, roi: None }
    }

    #[test]
    fn default_config_pipeline_is_a_no_op() {
        let img = FloatImage::from_data(8, 8, 3, vec![0.4; 8 * 8 * 3]).unwrap();
        let cfg = RetouchConfig::default();
        let out = apply_retouch(&img, &cfg, &identity_state(), 8, 8, 1.0);
        assert_eq!(out.data(), img.data());
    }
}
