//! Autocrop frame-edge detection (`spec.md` §4.2 step 3).

use darkroom_core::{luma, FloatImage, Roi};
use darkroom_ops::resize::{resize_f32, Filter};

use crate::config::{AUTOCROP_DETECT_RES, AUTOCROP_MIN_QUALIFYING, AUTOCROP_THRESHOLD};
use crate::error::GeometryResult;

/// Detects a negative's frame edges by downsampling to `max(H, W) <=
/// AUTOCROP_DETECT_RES`, thresholding luma at `threshold` (or
/// `assist_luma - 0.02` clamped to `[0.5, 0.98]` when a point-sample is
/// given), and taking the first/last row/column whose mean luma falls below
/// it. Falls back to the full frame if fewer than
/// [`AUTOCROP_MIN_QUALIFYING`] rows or columns qualify.
pub fn detect_autocrop_roi(img: &FloatImage, assist_luma: Option<f32>) -> GeometryResult<Roi> {
    let (h, w) = (img.height(), img.width());
    let full = Roi::full(h, w);

    let long_edge = h.max(w) as f32;
    let det_scale = (AUTOCROP_DETECT_RES as f32 / long_edge).min(1.0);
    let (det_w, det_h) = (((w as f32) * det_scale).max(1.0) as usize, ((h as f32) * det_scale).max(1.0) as usize);

    let small_data = resize_f32(img.data(), w as usize, h as usize, img.channels() as usize, det_w, det_h, Filter::Bicubic)
        .map_err(|_| darkroom_core::Error::invalid_dimensions(w, h, "autocrop downsample failed"))?;
    let small = FloatImage::from_data(det_h as u32, det_w as u32, img.channels(), small_data)?;
    let lum = if small.channels() == 3 { luma(&small) } else { small };

    let threshold = match assist_luma {
        Some(a) => (a - 0.02).clamp(0.5, 0.98),
        None => AUTOCROP_THRESHOLD,
    };

    let row_means: Vec<f32> = (0..det_h)
        .map(|y| {
            let row = &lum.data()[y * det_w..(y + 1) * det_w];
            row.iter().sum::<f32>() / det_w as f32
        })
        .collect();
    let col_means: Vec<f32> = (0..det_w)
        .map(|x| {
            (0..det_h).map(|y| lum.data()[y * det_w + x]).sum::<f32>() / det_h as f32
        })
        .collect();

    let rows_det: Vec<usize> = row_means.iter().enumerate().filter(|&(_, &m)| m < threshold).map(|(i, _)| i).collect();
    let cols_det: Vec<usize> = col_means.iter().enumerate().filter(|&(_, &m)| m < threshold).map(|(i, _)| i).collect();

    if rows_det.len() < AUTOCROP_MIN_QUALIFYING || cols_det.len() < AUTOCROP_MIN_QUALIFYING {
        return Ok(full);
    }

    let y1 = (*rows_det.first().unwrap() as f32 / det_scale) as u32;
    let y2 = (*rows_det.last().unwrap() as f32 / det_scale) as u32 + 1;
    let x1 = (*cols_det.first().unwrap() as f32 / det_scale) as u32;
    let x2 = (*cols_det.last().unwrap() as f32 / det_scale) as u32 + 1;

    Ok(Roi::new(y1.min(h - 1), y2.min(h), x1.min(w - 1), x2.min(w), h, w).unwrap_or(full))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uniform_bright_image_falls_back_to_full_frame() {
        let img = FloatImage::from_data(20, 20, 1, vec![1.0; 400]).unwrap();
        let roi = detect_autocrop_roi(&img, None).unwrap();
        assert_eq!(roi, Roi::full(20, 20));
    }

    #[test]
    fn dark_frame_with_bright_border_is_detected() {
        let mut data = vec![1.0f32; 40 * 40];
        for y in 5..35 {
            for x in 5..35 {
                data[y * 40 + x] = 0.1;
            }
        }
        let img = FloatImage::from_data(40, 40, 1, data).unwrap();
        let roi = detect_autocrop_roi(&img, None).unwrap();
        assert!(roi.y1 > 0 && roi.x1 > 0, "expected a detected inset region, got {roi:?}");
        assert!(roi.y2 < 40 && roi.x2 < 40);
    }
}
