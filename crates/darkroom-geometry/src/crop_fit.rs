//! Margin subtraction and aspect-ratio enforcement (`spec.md` §4.2 step 4).

use darkroom_core::{FloatImage, Roi};

/// Converts a normalized raw-frame rectangle `(x1, y1, x2, y2)` into a pixel
/// `Roi` against an image of the given dimensions, clamping degenerate
/// input to the full frame.
pub fn manual_rect_to_roi(rect: (f32, f32, f32, f32), h: u32, w: u32) -> Roi {
    let (x1, y1, x2, y2) = rect;
    let px_x1 = ((x1.clamp(0.0, 1.0)) * w as f32).round() as u32;
    let px_y1 = ((y1.clamp(0.0, 1.0)) * h as f32).round() as u32;
    let px_x2 = ((x2.clamp(0.0, 1.0)) * w as f32).round() as u32;
    let px_y2 = ((y2.clamp(0.0, 1.0)) * h as f32).round() as u32;
    Roi::new(px_y1.min(px_y2), px_y2.max(px_y1), px_x1.min(px_x2), px_x2.max(px_x1), h, w).unwrap_or(Roi::full(h, w))
}

/// Extracts the pixels inside `roi` from `img`, via [`FloatImage::crop`].
/// Used for the Orchestrator's final crop step (`spec.md` §4.7 step 4); a
/// degenerate `roi` (out of bounds or zero-sized against `img`) reverts to
/// the full frame, per §4.2's documented failure mode, rather than erroring.
pub fn crop_to_roi(img: &FloatImage, roi: Roi) -> FloatImage {
    img.crop(roi).unwrap_or_else(|_| img.clone())
}

/// Shrinks `roi` by `margin_px` pixels on every edge, clamping to `[0, h]` x
/// `[0, w]` so the result never inverts.
pub fn apply_margin(roi: Roi, h: u32, w: u32, margin_px: f32) -> Roi {
    let m = margin_px as i64;
    let y1 = (roi.y1 as i64 + m).clamp(0, h as i64) as u32;
    let y2 = (roi.y2 as i64 - m).clamp(y1 as i64, h as i64) as u32;
    let x1 = (roi.x1 as i64 + m).clamp(0, w as i64) as u32;
    let x2 = (roi.x2 as i64 - m).clamp(x1 as i64, w as i64) as u32;
    if y2 <= y1 || x2 <= x1 {
        Roi::full(h, w)
    } else {
        Roi { y1, y2, x1, x2 }
    }
}

/// Parses a `"W:H"` aspect-ratio string. Invalid strings default to `3:2`,
/// per `spec.md` §4.2's documented failure mode.
pub fn parse_aspect_ratio(ratio_str: &str) -> f32 {
    ratio_str
        .split_once(':')
        .and_then(|(w, h)| Some((w.trim().parse::<f32>().ok()?, h.trim().parse::<f32>().ok()?)))
        .filter(|&(_, h)| h != 0.0)
        .map(|(w, h)| w / h)
        .unwrap_or(1.5)
}

/// Fits the largest centered sub-rectangle of `roi` matching
/// `target_ratio_str`'s aspect ratio, flipping the ratio to match the ROI's
/// current orientation (portrait ROI gets a portrait target and vice
/// versa). A degenerate `roi` reverts to the full frame.
pub fn enforce_aspect_ratio(roi: Roi, h: u32, w: u32, target_ratio_str: &str) -> Roi {
    let cw = roi.width();
    let ch = roi.height();
    if cw == 0 || ch == 0 {
        return Roi::full(h, w);
    }

    let mut target_aspect = parse_aspect_ratio(target_ratio_str);
    let is_vertical = ch > cw;
    if is_vertical && target_aspect > 1.0 {
        target_aspect = 1.0 / target_aspect;
    } else if !is_vertical && target_aspect < 1.0 {
        target_aspect = 1.0 / target_aspect;
    }

    let current_aspect = cw as f32 / ch as f32;

    if current_aspect > target_aspect {
        let target_w = ch as f32 * target_aspect;
        let nx1 = roi.x1 as f32 + (cw as f32 - target_w) / 2.0;
        let nx2 = nx1 + target_w;
        Roi {
            y1: roi.y1,
            y2: roi.y2,
            x1: (nx1.max(0.0) as u32).min(w),
            x2: (nx2.min(w as f32) as u32).max(roi.x1),
        }
    } else {
        let target_h = cw as f32 / target_aspect;
        let ny1 = roi.y1 as f32 + (ch as f32 - target_h) / 2.0;
        let ny2 = ny1 + target_h;
        Roi {
            y1: (ny1.max(0.0) as u32).min(h),
            y2: (ny2.min(h as f32) as u32).max(roi.y1),
            x1: roi.x1,
            x2: roi.x2,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_ratio_string_defaults_to_three_to_two() {
        assert!((parse_aspect_ratio("garbage") - 1.5).abs() < 1e-6);
    }

    #[test]
    fn valid_ratio_string_parses() {
        assert!((parse_aspect_ratio("16:9") - 16.0 / 9.0).abs() < 1e-6);
    }

    #[test]
    fn margin_shrinks_roi_symmetrically() {
        let roi = Roi::full(100, 100);
        let out = apply_margin(roi, 100, 100, 10.0);
        assert_eq!(out, Roi { y1: 10, y2: 90, x1: 10, x2: 90 });
    }

    #[test]
    fn excessive_margin_falls_back_to_full_frame() {
        let roi = Roi::full(10, 10);
        let out = apply_margin(roi, 10, 10, 100.0);
        assert_eq!(out, Roi::full(10, 10));
    }

    #[test]
    fn landscape_roi_gets_landscape_ratio() {
        let roi = Roi::full(100, 300);
        let out = enforce_aspect_ratio(roi, 100, 300, "3:2");
        let aspect = out.width() as f32 / out.height() as f32;
        assert!((aspect - 1.5).abs() < 0.02);
    }

    #[test]
    fn portrait_roi_gets_flipped_ratio() {
        let roi = Roi::full(300, 100);
        let out = enforce_aspect_ratio(roi, 300, 100, "3:2");
        let aspect = out.width() as f32 / out.height() as f32;
        assert!((aspect - 2.0 / 3.0).abs() < 0.02);
    }

    #[test]
    fn crop_extracts_the_requested_region() {
        let data: Vec<f32> = (0..16).map(|v| v as f32).collect();
        let img = FloatImage::from_data(4, 4, 1, data).unwrap();
        let roi = Roi::new(1, 3, 1, 3, 4, 4).unwrap();
        let cropped = crop_to_roi(&img, roi);
        assert_eq!(cropped.height(), 2);
        assert_eq!(cropped.width(), 2);
        assert_eq!(cropped.data(), &[5.0, 6.0, 9.0, 10.0]);
    }

    #[test]
    fn crop_with_out_of_bounds_roi_falls_back_to_full_frame() {
        let img = FloatImage::new(4, 4, 1).unwrap();
        let bogus = Roi { y1: 0, y2: 10, x1: 0, x2: 10 };
        let cropped = crop_to_roi(&img, bogus);
        assert_eq!(cropped.height(), 4);
        assert_eq!(cropped.width(), 4);
    }

    #[test]
    fn manual_rect_converts_normalized_coords_to_pixels() {
        let roi = manual_rect_to_roi((0.25, 0.25, 0.75, 0.75), 100, 100);
        assert_eq!(roi, Roi { y1: 25, y2: 75, x1: 25, x2: 75 });
    }

    #[test]
    fn degenerate_manual_rect_falls_back_to_full_frame() {
        let roi = manual_rect_to_roi((0.5, 0.5, 0.5, 0.5), 100, 100);
        assert_eq!(roi, Roi::full(100, 100));
    }
}
