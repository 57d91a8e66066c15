//! The darkroom pipeline's Geometry Kernel: 90-degree rotation, flips, fine
//! rotation, autocrop detection, margin/aspect-ratio enforcement, and
//! forward/inverse coordinate mapping between raw and display space.
//!
//! Stateless: every function takes its inputs explicitly and returns a new
//! buffer or ROI rather than mutating shared state (`spec.md` §4.2's "state
//! machine: stateless" note).

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

mod autocrop;
mod config;
mod coords;
mod crop_fit;
mod error;
mod rotation;

pub use autocrop::detect_autocrop_roi;
pub use config::{GeometryConfig, AUTOCROP_DETECT_RES, AUTOCROP_MIN_QUALIFYING, AUTOCROP_THRESHOLD};
pub use coords::{map_forward, map_inverse, GeometryState};
pub use crop_fit::{apply_margin, crop_to_roi, enforce_aspect_ratio, manual_rect_to_roi, parse_aspect_ratio};
pub use error::{GeometryError, GeometryResult};
pub use rotation::{apply_fine_rotation, apply_flip_h, apply_flip_v, rot90_k};

use darkroom_core::{FloatImage, Roi};

/// Runs the rotate/flip/fine-rotation steps of the Geometry Kernel
/// (`spec.md` §4.2 steps 1-2), returning the transformed image. Autocrop
/// detection and the final crop are separate steps since downstream stages
/// (Retouch) need `active_roi` before the crop is actually applied.
#[tracing::instrument(skip(img, cfg))]
pub fn apply_rotation_and_flips(img: &FloatImage, cfg: &GeometryConfig) -> FloatImage {
    let mut out = rot90_k(img, cfg.rotation);
    if cfg.flip_h {
        out = apply_flip_h(&out);
    }
    if cfg.flip_v {
        out = apply_flip_v(&out);
    }
    if cfg.fine_rotation != 0.0 {
        out = apply_fine_rotation(&out, cfg.fine_rotation);
    }
    out
}

/// Runs autocrop detection (steps 3-4) against an already-rotated image,
/// returning the active ROI (or `None` when `cfg.autocrop` is off, meaning
/// downstream stages should use the full frame).
pub fn detect_active_roi(
    rotated: &FloatImage,
    cfg: &GeometryConfig,
    scale_factor: f32,
    assist_luma: Option<f32>,
) -> GeometryResult<Option<Roi>> {
    if !cfg.autocrop {
        return Ok(None);
    }
    let detected = detect_autocrop_roi(rotated, assist_luma)?;
    let (h, w) = (rotated.height(), rotated.width());
    let margin = (2.0 + cfg.autocrop_offset as f32) * scale_factor;
    let margined = apply_margin(detected, h, w, margin);
    Ok(Some(enforce_aspect_ratio(margined, h, w, &cfg.autocrop_ratio)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn autocrop_disabled_yields_no_roi() {
        let img = FloatImage::new(20, 20, 1).unwrap();
        let cfg = GeometryConfig { autocrop: false, ..GeometryConfig::default() };
        let roi = detect_active_roi(&img, &cfg, 1.0, None).unwrap();
        assert!(roi.is_none());
    }

    #[test]
    fn rotation_and_flip_pipeline_preserves_pixel_count() {
        let img = FloatImage::from_data(4, 6, 1, (0..24).map(|v| v as f32).collect()).unwrap();
        let cfg = GeometryConfig { rotation: 1, flip_h: true, fine_rotation: 5.0, ..GeometryConfig::default() };
        let out = apply_rotation_and_flips(&img, &cfg);
        assert_eq!(out.data().len(), img.data().len());
    }
}
