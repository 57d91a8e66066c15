//! The darkroom pipeline's Lab Kernel (`spec.md` §4.5): spectral crosstalk,
//! CLAHE local contrast, chroma noise smoothing, and output sharpening.
//!
//! Crosstalk runs in density space directly on the RGB image; the
//! remaining three stages run in CIE Lab, converted from and back to sRGB
//! around the kernel.

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

mod chroma_denoise;
mod clahe;
mod colorspace;
mod config;
mod crosstalk;
mod error;
mod sharpen;

pub use config::{LabConfig, DEFAULT_CROSSTALK_MATRIX};
pub use crosstalk::apply_spectral_crosstalk;
pub use error::{LabError, LabResult};

use darkroom_core::FloatImage;

fn to_lab_planes(img: &FloatImage) -> (Vec<f32>, Vec<f32>, Vec<f32>) {
    let n = (img.width() as usize) * (img.height() as usize);
    let mut l = vec![0f32; n];
    let mut a = vec![0f32; n];
    let mut b = vec![0f32; n];
    for (i, px) in img.data().chunks_exact(3).enumerate() {
        let lab = colorspace::srgb_to_lab([px[0], px[1], px[2]]);
        l[i] = lab[0];
        a[i] = lab[1];
        b[i] = lab[2];
    }
    (l, a, b)
}

fn from_lab_planes(l: &[f32], a: &[f32], b: &[f32], width: u32, height: u32) -> FloatImage {
    let mut data = Vec::with_capacity(l.len() * 3);
    for i in 0..l.len() {
        let rgb = colorspace::lab_to_srgb([l[i], a[i], b[i]]);
        data.extend_from_slice(&rgb);
    }
    FloatImage::from_data(height, width, 3, data).expect("same shape as input planes")
}

/// Runs the full Lab Kernel over `img`: spectral crosstalk, then CLAHE,
/// chroma denoise, and sharpening in CIE Lab space.
#[tracing::instrument(skip(img, cfg))]
pub fn apply_lab_kernel(img: &FloatImage, cfg: &LabConfig, scale_factor: f32) -> FloatImage {
    let crosstalked = apply_spectral_crosstalk(img, cfg);

    if cfg.clahe_strength <= 0.0 && cfg.c_noise_strength <= 0.0 && cfg.sharpen <= 0.0 {
        return crosstalked;
    }

    let w = crosstalked.width() as usize;
    let h = crosstalked.height() as usize;
    let (mut l, mut a, mut b) = to_lab_planes(&crosstalked);

    if cfg.clahe_strength > 0.0 {
        let clahe_l = clahe::clahe_l_channel(&l, w, h, cfg.clahe_strength);
        for i in 0..l.len() {
            l[i] = l[i] * (1.0 - cfg.clahe_strength) + clahe_l[i] * cfg.clahe_strength;
        }
    }

    if cfg.c_noise_strength > 0.0 {
        let (da, db) = chroma_denoise::denoise_chroma(&l, &a, &b, w, h, cfg.c_noise_strength, scale_factor);
        a = da;
        b = db;
    }

    if cfg.sharpen > 0.0 {
        l = sharpen::sharpen_l_channel(&l, w, h, cfg.sharpen);
    }

    from_lab_planes(&l, &a, &b, crosstalked.width(), crosstalked.height())
}

/// Re-exports for the common `apply_lab_kernel` entry point and its config.
pub mod prelude {
    pub use crate::apply_lab_kernel;
    pub use crate::config::LabConfig;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_pipeline_is_a_no_op() {
        let img = FloatImage::from_data(4, 4, 3, vec![0.3f32; 4 * 4 * 3]).unwrap();
        let cfg = LabConfig::default();
        let out = apply_lab_kernel(&img, &cfg, 1.0);
        for (a, b) in img.data().iter().zip(out.data().iter()) {
            assert!((a - b).abs() < 1e-3);
        }
    }

    #[test]
    fn full_kernel_runs_and_preserves_dimensions() {
        let w = 16;
        let h = 16;
        let mut data = vec![0f32; w * h * 3];
        for (i, v) in data.iter_mut().enumerate() {
            *v = ((i * 37) % 100) as f32 / 100.0;
        }
        let img = FloatImage::from_data(h as u32, w as u32, 3, data).unwrap();
        let cfg = LabConfig {
            color_separation: 1.5,
            clahe_strength: 0.6,
            c_noise_strength: 0.4,
            sharpen: 0.5,
            ..LabConfig::default()
        };
        let out = apply_lab_kernel(&img, &cfg, 1.0);
        assert_eq!(out.width(), w as u32);
        assert_eq!(out.height(), h as u32);
        for v in out.data() {
            assert!((0.0..=1.0).contains(v));
        }
    }
}
