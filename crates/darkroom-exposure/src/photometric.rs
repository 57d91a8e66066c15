//! Slider→physical mapping and process-mode dispatch (`spec.md` §4.3.3,
//! §4.3.4): turns a normalized log-negative into a displayable positive.

use darkroom_core::{collapse_to_luma_rgb, FloatImage, ProcessMode};

use crate::config::{ExposureConfig, CMY_MAX_DENSITY, D_MAX, DENSITY_MULTIPLIER, GRADE_MULTIPLIER};
use crate::curve::LogisticSigmoid;

/// The physical curve parameters a config maps to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhysicalParams {
    /// Shared pivot applied to all three channels before CMY offset.
    pub pivot: f32,
    /// Shared slope applied to all three channels.
    pub slope: f32,
    /// Per-channel (R, G, B) log-exposure offset from CMY filtration.
    pub cmy_offsets: [f32; 3],
}

/// Converts `cfg`'s density/grade/CMY sliders into [`PhysicalParams`].
pub fn slider_to_physical(cfg: &ExposureConfig) -> PhysicalParams {
    let exposure_shift = 0.1 + cfg.density * DENSITY_MULTIPLIER;
    PhysicalParams {
        pivot: 1.0 - exposure_shift,
        slope: 1.0 + cfg.grade * GRADE_MULTIPLIER,
        cmy_offsets: [
            cfg.wb_cyan * CMY_MAX_DENSITY,
            cfg.wb_magenta * CMY_MAX_DENSITY,
            cfg.wb_yellow * CMY_MAX_DENSITY,
        ],
    }
}

fn channel_curve(cfg: &ExposureConfig, physical: &PhysicalParams) -> LogisticSigmoid {
    LogisticSigmoid {
        k: physical.slope,
        x0: physical.pivot,
        l: D_MAX,
        toe: cfg.toe,
        toe_width: cfg.toe_width,
        toe_hardness: cfg.toe_hardness,
        shoulder: cfg.shoulder,
        shoulder_width: cfg.shoulder_width,
        shoulder_hardness: cfg.shoulder_hardness,
    }
}

/// Applies the characteristic curve to a normalized log-negative (`spec.md`
/// §4.3.2-4), returning a displayable positive in `[0, 1]`.
///
/// `norm` must be 3-channel. For [`ProcessMode::BW`], the result is collapsed
/// to luminance and replicated across channels (the "invert, then collapse"
/// behavior §4.3.4 describes); C41 and E6 both return the per-channel
/// positive directly — E6's inversion already happened upstream, in the
/// bound measurement that produced `norm` (see [`crate::heuristics`]).
#[tracing::instrument(skip(norm, cfg))]
pub fn apply_characteristic_curve(norm: &FloatImage, cfg: &ExposureConfig, mode: ProcessMode) -> FloatImage {
    debug_assert_eq!(norm.channels(), 3);
    let physical = slider_to_physical(cfg);
    let curve = channel_curve(cfg, &physical);

    let data: Vec<f32> = norm
        .data()
        .chunks_exact(3)
        .flat_map(|px| {
            (0..3).map(|c| {
                let d = curve.density(px[c] + physical.cmy_offsets[c]);
                let t = 10f32.powf(-d);
                t.powf(1.0 / 2.2).clamp(0.0, 1.0)
            })
        })
        .collect();

    let positive =
        FloatImage::from_data(norm.height(), norm.width(), 3, data).expect("same shape as input");

    if mode.is_bw() {
        collapse_to_luma_rgb(&positive)
    } else {
        positive
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn neutral_slider_to_physical_matches_spec_boundary_case() {
        let cfg = ExposureConfig { density: 0.0, grade: 0.0, ..ExposureConfig::default() };
        let physical = slider_to_physical(&cfg);
        assert_relative_eq!(physical.pivot, 0.9, epsilon = 1e-6);
        assert_relative_eq!(physical.slope, 1.0, epsilon = 1e-6);
    }

    #[test]
    fn uniform_input_produces_uniform_output() {
        let norm = FloatImage::from_data(2, 2, 3, vec![0.5; 12]).unwrap();
        let cfg = ExposureConfig::default();
        let out = apply_characteristic_curve(&norm, &cfg, ProcessMode::C41);
        let first = out.data()[0];
        assert!(out.data().iter().all(|&v| (v - first).abs() < 1e-6));
    }

    #[test]
    fn bw_mode_produces_equal_channels() {
        let norm = FloatImage::from_data(1, 2, 3, vec![0.2, 0.6, 0.9, 0.8, 0.3, 0.1]).unwrap();
        let cfg = ExposureConfig::default();
        let out = apply_characteristic_curve(&norm, &cfg, ProcessMode::BW);
        for px in out.data().chunks_exact(3) {
            assert_relative_eq!(px[0], px[1], epsilon = 1e-6);
            assert_relative_eq!(px[1], px[2], epsilon = 1e-6);
        }
    }

    #[test]
    fn output_stays_within_unit_range() {
        let norm = FloatImage::from_data(1, 5, 3, vec![
            0.0, 0.0, 0.0, 0.25, 0.25, 0.25, 0.5, 0.5, 0.5, 0.75, 0.75, 0.75, 1.0, 1.0, 1.0,
        ])
        .unwrap();
        let cfg = ExposureConfig { grade: 5.0, ..ExposureConfig::default() };
        let out = apply_characteristic_curve(&norm, &cfg, ProcessMode::C41);
        assert!(out.data().iter().all(|&v| (0.0..=1.0).contains(&v)));
    }

    #[test]
    fn higher_density_darkens_output() {
        let norm = FloatImage::from_data(1, 1, 3, vec![0.5, 0.5, 0.5]).unwrap();
        let low = apply_characteristic_curve(&norm, &ExposureConfig { density: 0.0, ..ExposureConfig::default() }, ProcessMode::C41);
        let high = apply_characteristic_curve(&norm, &ExposureConfig { density: 2.0, ..ExposureConfig::default() }, ProcessMode::C41);
        assert!(high.data()[0] < low.data()[0]);
    }
}
