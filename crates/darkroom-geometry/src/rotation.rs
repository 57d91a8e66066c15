//! 90-degree rotation, flips, and fine (sub-degree) rotation (`spec.md`
//! §4.2 steps 1-2).

use darkroom_core::FloatImage;
use darkroom_ops::transform::{flip_h, flip_v, rotate_180, rotate_90_ccw, rotate_90_cw};
use darkroom_ops::warp::apply_warp;

/// Rotates `img` counter-clockwise by `k` quarter turns (`k % 4`), matching
/// `numpy.rot90`'s convention.
pub fn rot90_k(img: &FloatImage, k: u8) -> FloatImage {
    let ch = img.channels();
    let (w, h) = (img.width() as usize, img.height() as usize);
    match k % 4 {
        0 => img.clone(),
        1 => {
            let (data, nw, nh) = rotate_90_ccw(img.data(), w, h, ch as usize);
            FloatImage::from_data(nh as u32, nw as u32, ch, data).expect("rotate_90_ccw preserves element count")
        }
        2 => {
            let data = rotate_180(img.data(), w, h, ch as usize);
            FloatImage::from_data(img.height(), img.width(), ch, data).expect("rotate_180 preserves shape")
        }
        3 => {
            let (data, nw, nh) = rotate_90_cw(img.data(), w, h, ch as usize);
            FloatImage::from_data(nh as u32, nw as u32, ch, data).expect("rotate_90_cw preserves element count")
        }
        _ => unreachable!("k % 4 is always 0..=3"),
    }
}

/// Flips `img` horizontally.
pub fn apply_flip_h(img: &FloatImage) -> FloatImage {
    let data = flip_h(img.data(), img.width() as usize, img.height() as usize, img.channels() as usize);
    FloatImage::from_data(img.height(), img.width(), img.channels(), data).expect("flip_h preserves shape")
}

/// Flips `img` vertically.
pub fn apply_flip_v(img: &FloatImage) -> FloatImage {
    let data = flip_v(img.data(), img.width() as usize, img.height() as usize, img.channels() as usize);
    FloatImage::from_data(img.height(), img.width(), img.channels(), data).expect("flip_v preserves shape")
}

/// Rotates `img` about its center by `angle_deg` degrees (clockwise positive,
/// matching the spec's horizon-leveling convention), using bilinear
/// sampling with constant-black boundary. Dimensions are preserved. A
/// no-op for `angle_deg == 0.0`.
#[tracing::instrument(skip(img))]
pub fn apply_fine_rotation(img: &FloatImage, angle_deg: f32) -> FloatImage {
    if angle_deg == 0.0 {
        return img.clone();
    }

    let w = img.width() as usize;
    let h = img.height() as usize;
    let ch = img.channels() as usize;
    let cx = (w - 1) as f32 / 2.0;
    let cy = (h - 1) as f32 / 2.0;

    // Destination -> source: rotate by -angle so the image itself appears
    // rotated by +angle.
    let theta = -angle_deg.to_radians();
    let (sin_t, cos_t) = theta.sin_cos();

    let data = apply_warp(img.data(), w, h, ch, |x, y, _w, _h| {
        let dx = x as f32 - cx;
        let dy = y as f32 - cy;
        let sx = dx * cos_t - dy * sin_t + cx;
        let sy = dx * sin_t + dy * cos_t + cy;
        (sx, sy)
    });

    FloatImage::from_data(img.height(), img.width(), img.channels(), data).expect("apply_warp preserves shape")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ramp(w: u32, h: u32) -> FloatImage {
        let data: Vec<f32> = (0..w * h).map(|i| i as f32).collect();
        FloatImage::from_data(h, w, 1, data).unwrap()
    }

    #[test]
    fn rot90_zero_is_identity() {
        let img = ramp(4, 3);
        let out = rot90_k(&img, 0);
        assert_eq!(out.data(), img.data());
    }

    #[test]
    fn rot90_swaps_dimensions_for_odd_k() {
        let img = ramp(4, 3);
        let out = rot90_k(&img, 1);
        assert_eq!((out.width(), out.height()), (3, 4));
        let out3 = rot90_k(&img, 3);
        assert_eq!((out3.width(), out3.height()), (3, 4));
    }

    #[test]
    fn rot90_four_times_is_identity() {
        let img = ramp(4, 3);
        let mut out = img.clone();
        for _ in 0..4 {
            out = rot90_k(&out, 1);
        }
        assert_eq!(out.data(), img.data());
        assert_eq!((out.width(), out.height()), (img.width(), img.height()));
    }

    #[test]
    fn fine_rotation_zero_is_identity() {
        let img = ramp(4, 4);
        let out = apply_fine_rotation(&img, 0.0);
        assert_eq!(out.data(), img.data());
    }

    #[test]
    fn fine_rotation_preserves_dimensions() {
        let img = ramp(5, 5);
        let out = apply_fine_rotation(&img, 15.0);
        assert_eq!((out.width(), out.height()), (img.width(), img.height()));
    }

    #[test]
    fn flips_are_involutions() {
        let img = ramp(4, 3);
        assert_eq!(apply_flip_h(&apply_flip_h(&img)).data(), img.data());
        assert_eq!(apply_flip_v(&apply_flip_v(&img)).data(), img.data());
    }
}
