//! The darkroom pipeline's Toning Kernel (`spec.md` §4.6): paper substrate
//! simulation and chemical (selenium/sepia) toning.
//!
//! Chemical toning and the chromaticity-preserving black point that follows
//! it only run in [`ProcessMode::BW`](darkroom_core::ProcessMode::BW);
//! paper substrate simulation applies regardless of process mode.

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

mod chemical;
mod config;
mod error;
mod paper;

pub use chemical::{apply_chemical_toning, apply_chromaticity_preserving_black_point};
pub use config::ToningConfig;
pub use error::{ToningError, ToningResult};
pub use paper::{lookup as lookup_paper_profile, simulate_paper_substrate, PaperProfile};

use darkroom_core::{FloatImage, ProcessMode};

/// The percentile of luma treated as the print's true black point.
pub const BLACK_POINT_PERCENTILE: f32 = 5.0;

/// Runs the full Toning Kernel over `img`: paper substrate simulation for
/// every process mode, then chemical toning and the chromaticity-preserving
/// black point in B&W mode only.
#[tracing::instrument(skip(img, cfg))]
pub fn apply_toning(img: &FloatImage, cfg: &ToningConfig, process_mode: ProcessMode) -> FloatImage {
    let substrated = simulate_paper_substrate(img, &cfg.paper_profile);

    if !process_mode.is_bw() {
        return substrated;
    }

    let toned = apply_chemical_toning(&substrated, cfg.selenium_strength, cfg.sepia_strength);
    apply_chromaticity_preserving_black_point(&toned, BLACK_POINT_PERCENTILE)
}

/// Re-exports for the common `apply_toning` entry point and its config.
pub mod prelude {
    pub use crate::apply_toning;
    pub use crate::config::ToningConfig;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_in_color_mode_is_substrate_only() {
        let img = FloatImage::from_data(2, 2, 3, vec![0.5; 2 * 2 * 3]).unwrap();
        let cfg = ToningConfig::default();
        let out = apply_toning(&img, &cfg, ProcessMode::C41);
        assert_eq!(out.data(), img.data());
    }

    #[test]
    fn bw_mode_with_no_toning_still_applies_black_point() {
        let mut data = Vec::new();
        for i in 0..50 {
            let v = i as f32 / 50.0;
            data.extend_from_slice(&[v, v, v]);
        }
        let img = FloatImage::from_data(1, 50, 3, data).unwrap();
        let cfg = ToningConfig::default();
        let out = apply_toning(&img, &cfg, ProcessMode::BW);
        assert!(out.data()[0] < img.data()[0]);
    }

    #[test]
    fn color_mode_never_applies_black_point() {
        let img = FloatImage::from_data(1, 1, 3, vec![0.01, 0.01, 0.01]).unwrap();
        let cfg = ToningConfig::default();
        let out = apply_toning(&img, &cfg, ProcessMode::E6);
        assert_eq!(out.data(), img.data());
    }
}
