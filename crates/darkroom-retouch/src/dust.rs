//! Automatic dust removal (`spec.md` §4.4.1): a median-diff adaptive-threshold
//! detector followed by a morphologically cleaned, feathered blend.

use darkroom_core::FloatImage;

use crate::config::RetouchConfig;
use crate::primitives::{close_disc, dilate_disc, gaussian_blur_mono, median_blur, odd};

/// Runs automatic dust detection and removal over `img`, scaled for the
/// image's actual resolution relative to the reference 1x `scale_factor`.
#[tracing::instrument(skip(img, cfg))]
pub fn remove_dust(img: &FloatImage, cfg: &RetouchConfig, scale_factor: f32) -> FloatImage {
    debug_assert_eq!(img.channels(), 3);
    if !cfg.dust_remove {
        return img.clone();
    }

    let w = img.width() as usize;
    let h = img.height() as usize;
    let data = img.data();

    let median_size = odd((cfg.dust_size as f32 * 2.0 * scale_factor).round() as i64);
    let median = median_blur(data, w, h, 3, median_size);

    // max(|img - median|) across channels, plus per-pixel luma std of the
    // residual to avoid flagging sharp but legitimate detail edges.
    let mut diff_max = vec![0.0f32; w * h];
    for i in 0..w * h {
        let mut m = 0.0f32;
        for c in 0..3 {
            let d = (data[i * 3 + c] - median[i * 3 + c]).abs();
            if d > m {
                m = d;
            }
        }
        diff_max[i] = m;
    }

    let tau = cfg.dust_threshold.clamp(0.01, 1.0);
    let window = odd((15.0 * scale_factor).round() as i64);
    let local_std = crate::primitives::box_std(&diff_max, w, h, window);

    let mut raw_mask = vec![0.0f32; w * h];
    for i in 0..w * h {
        if diff_max[i] > tau && local_std[i] <= 0.2 {
            raw_mask[i] = 1.0;
        }
    }

    let close_radius = (2.5 * scale_factor).round().max(1.0) as usize;
    let closed = close_disc(&raw_mask, w, h, close_radius);
    let dilate_radius = (1.5 * scale_factor).round().max(1.0) as usize;
    let dilated = dilate_disc(&closed, w, h, dilate_radius);

    let feather_size = odd(cfg.dust_size as i64);
    let mask = gaussian_blur_mono(&dilated, w, h, feather_size);

    let mut out = data.to_vec();
    for i in 0..w * h {
        let m = mask[i].clamp(0.0, 1.0);
        for c in 0..3 {
            let idx = i * 3 + c;
            out[idx] = data[idx] * (1.0 - m) + median[idx] * m;
        }
    }

    FloatImage::from_data(img.height(), img.width(), 3, out).expect("same shape as input")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disabled_config_is_a_no_op() {
        let img = FloatImage::from_data(8, 8, 3, vec![0.5; 8 * 8 * 3]).unwrap();
        let cfg = RetouchConfig::default();
        let out = remove_dust(&img, &cfg, 1.0);
        assert_eq!(out.data(), img.data());
    }

    #[test]
    fn removes_a_bright_speck_from_a_flat_field() {
        let mut data = vec![0.3f32; 16 * 16 * 3];
        let center = (8 * 16 + 8) * 3;
        for c in 0..3 {
            data[center + c] = 0.95;
        }
        let img = FloatImage::from_data(16, 16, 3, data).unwrap();
        let cfg = RetouchConfig { dust_remove: true, dust_threshold: 0.1, dust_size: 2, ..RetouchConfig::default() };
        let out = remove_dust(&img, &cfg, 1.0);
        assert!(out.data()[center] < 0.8, "speck should be attenuated toward the surrounding median");
    }

    #[test]
    fn preserves_flat_regions_away_from_the_speck() {
        let mut data = vec![0.3f32; 16 * 16 * 3];
        let center = (8 * 16 + 8) * 3;
        data[center] = 0.95;
        let img = FloatImage::from_data(16, 16, 3, data).unwrap();
        let cfg = RetouchConfig { dust_remove: true, ..RetouchConfig::default() };
        let out = remove_dust(&img, &cfg, 1.0);
        assert!((out.data()[0] - 0.3).abs() < 1e-3);
    }
}
