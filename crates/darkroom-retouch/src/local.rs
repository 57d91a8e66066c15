//! Local dodge/burn adjustments (`spec.md` §4.4.3): a brush-stroke spatial
//! mask combined with a luma-range mask, applied as a multiplicative
//! exposure shift.

use darkroom_core::FloatImage;
use darkroom_geometry::{map_forward, GeometryState};

use crate::config::RetouchConfig;
use crate::primitives::{gaussian_blur_mono, paint_thick_line};

/// Piecewise-linear ramp: `0` below `low - softness`, `1` above
/// `high + softness`, linear in between, matching the original luma-mask
/// construction (a soft-edged band-pass over luma).
fn luma_ramp(l: f32, low: f32, high: f32, softness: f32) -> f32 {
    let soft = softness.max(1e-4);
    let rise = ((l - (low - soft)) / soft).clamp(0.0, 1.0);
    let fall = (((high + soft) - l) / soft).clamp(0.0, 1.0);
    rise.min(fall)
}

fn luma(px: &[f32]) -> f32 {
    0.2126 * px[0] + 0.7152 * px[1] + 0.0722 * px[2]
}

/// Applies every local adjustment in `cfg` to `img`, mapping each stroke's
/// raw-frame normalized points through `geometry`'s current orientation
/// before rasterization.
#[tracing::instrument(skip(img, cfg, geometry))]
pub fn apply_local_adjustments(
    img: &FloatImage,
    cfg: &RetouchConfig,
    geometry: &GeometryState,
    orig_w: u32,
    orig_h: u32,
    scale_factor: f32,
) -> FloatImage {
    if cfg.local_adjustments.is_empty() {
        return img.clone();
    }

    let w = img.width() as usize;
    let h = img.height() as usize;
    let mut data = img.data().to_vec();

    for adj in &cfg.local_adjustments {
        if adj.points.len() < 2 || adj.strength_ev == 0.0 {
            continue;
        }

        let mapped: Vec<(f32, f32)> = adj
            .points
            .iter()
            .map(|&(nx, ny)| {
                let (dx, dy) = map_forward(nx, ny, orig_w, orig_h, geometry);
                (dx * w as f32, dy * h as f32)
            })
            .collect();

        let radius = (adj.radius_px * scale_factor).max(1.0);
        let mut spatial = vec![0.0f32; w * h];
        for pair in mapped.windows(2) {
            let (x0, y0) = pair[0];
            let (x1, y1) = pair[1];
            paint_thick_line(&mut spatial, w, h, x0, y0, x1, y1, radius);
        }

        let blur_size = (radius * adj.feather.clamp(0.0, 1.0) * 2.0).round() as usize;
        let spatial = gaussian_blur_mono(&spatial, w, h, blur_size.max(1));

        let (low, high) = adj.luma_range;
        for i in 0..w * h {
            let s = spatial[i].clamp(0.0, 1.0);
            if s <= 0.0 {
                continue;
            }
            let px = &data[i * 3..i * 3 + 3];
            let l = luma(px);
            let lm = luma_ramp(l, low, high, adj.luma_softness);
            let m = s * lm;
            if m <= 0.0 {
                continue;
            }
            let factor = 2f32.powf(m * adj.strength_ev);
            for c in 0..3 {
                data[i * 3 + c] = (data[i * 3 + c] * factor).clamp(0.0, 1.0);
            }
        }
    }

    FloatImage::from_data(img.height(), img.width(), 3, data).expect("same shape as input")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LocalAdjustment;

    fn identity_state() -> GeometryState {
        GeometryState { rotation_k: 0, fine_rotation: 0.0, flip_h: false, flip_v: false, roi: None }
    }

    #[test]
    fn no_adjustments_is_a_no_op() {
        let img = FloatImage::from_data(8, 8, 3, vec![0.4; 8 * 8 * 3]).unwrap();
        let cfg = RetouchConfig::default();
        let out = apply_local_adjustments(&img, &cfg, &identity_state(), 8, 8, 1.0);
        assert_eq!(out.data(), img.data());
    }

    #[test]
    fn positive_strength_dodges_the_stroke_path() {
        let img = FloatImage::from_data(20, 20, 3, vec![0.3; 20 * 20 * 3]).unwrap();
        let cfg = RetouchConfig {
            local_adjustments: vec![LocalAdjustment {
                points: vec![(0.2, 0.5), (0.8, 0.5)],
                strength_ev: 1.0,
                radius_px: 4.0,
                feather: 0.3,
                luma_range: (0.0, 1.0),
                luma_softness: 0.2,
            }],
            ..RetouchConfig::default()
        };
        let out = apply_local_adjustments(&img, &cfg, &identity_state(), 20, 20, 1.0);
        let center = out.data()[(10 * 20 + 10) * 3];
        assert!(center > 0.3, "dodge should brighten pixels under the stroke, got {center}");
    }

    #[test]
    fn luma_range_excludes_pixels_outside_the_band() {
        let img = FloatImage::from_data(20, 20, 3, vec![0.9; 20 * 20 * 3]).unwrap();
        let cfg = RetouchConfig {
            local_adjustments: vec![LocalAdjustment {
                points: vec![(0.2, 0.5), (0.8, 0.5)],
                strength_ev: 2.0,
                radius_px: 4.0,
                feather: 0.1,
                luma_range: (0.0, 0.2),
                luma_softness: 0.02,
            }],
            ..RetouchConfig::default()
        };
        let out = apply_local_adjustments(&img, &cfg, &identity_state(), 20, 20, 1.0);
        let center = out.data()[(10 * 20 + 10) * 3];
        assert!((center - 0.9).abs() < 1e-3, "highlights outside the luma band should be untouched, got {center}");
    }
}
