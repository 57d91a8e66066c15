//! Auto-exposure solver (`spec.md` §4.3.5): derives density/grade/CMY sliders
//! from a normalized log-negative's Red-channel statistics.

use darkroom_core::{FloatImage, Roi};

use crate::config::{CMY_MAX_DENSITY, DENSITY_MULTIPLIER, GRADE_MULTIPLIER, TARGET_PAPER_RANGE};
use crate::percentile::{extract_channel, percentile};

/// Sliders the solver derives from a negative's statistics.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AutoExposureResult {
    /// Solved density slider.
    pub density: f32,
    /// Solved grade slider.
    pub grade: f32,
    /// Cyan filtration; always `0.0` (the solver anchors to Red).
    pub wb_cyan: f32,
    /// Solved magenta filtration.
    pub wb_magenta: f32,
    /// Solved yellow filtration.
    pub wb_yellow: f32,
}

fn round_to(value: f32, step: f32) -> f32 {
    (value / step).round() * step
}

/// Crops to the center 60% of `img` (20% margin on each side, independently
/// per axis), per spec's auto-exposure analysis window.
fn center_crop(img: &FloatImage) -> darkroom_core::Result<FloatImage> {
    let margin_y = (img.height() as f64 * 0.2) as u32;
    let margin_x = (img.width() as f64 * 0.2) as u32;
    let y1 = margin_y;
    let x1 = margin_x;
    let y2 = (img.height() - margin_y).max(y1 + 1);
    let x2 = (img.width() - margin_x).max(x1 + 1);
    let roi = Roi::new(y1, y2, x1, x2, img.height(), img.width())?;
    img.crop(roi)
}

/// Solves density/grade/CMY from a normalized log-negative (`spec.md`
/// §4.3.5). `norm_log` must be 3-channel, already log-normalized to `[0, 1]`
/// via [`crate::normalization::normalize_log_image`].
///
/// When `round_for_ui` is `true`, density/grade are rounded to the nearest
/// `0.05` and CMY to the nearest `0.5` before clipping to their legal
/// ranges, matching what the CLI/UI round-trips through a slider. The
/// programmatic entry point used by tests and other pipeline stages should
/// pass `false` to get the solver's raw output.
#[tracing::instrument(skip(norm_log))]
pub fn solve(norm_log: &FloatImage, round_for_ui: bool) -> darkroom_core::Result<AutoExposureResult> {
    debug_assert_eq!(norm_log.channels(), 3);
    let window = center_crop(norm_log)?;

    let mut channel_p1 = [0.0f32; 3];
    let mut channel_p99 = [0.0f32; 3];
    let mut channel_p75 = [0.0f32; 3];
    for c in 0..3 {
        let mut channel = extract_channel(window.data(), window.channels(), c);
        channel_p1[c] = percentile(&mut channel, 1.0);
        channel_p99[c] = percentile(&mut channel, 99.0);
        channel_p75[c] = percentile(&mut channel, 75.0);
    }

    let dr = (channel_p99[0] - channel_p1[0]).max(1e-6);
    let midpoint = (channel_p99[0] + channel_p1[0]) * 0.5;

    let slope_physical = TARGET_PAPER_RANGE / dr;
    let mut grade = (slope_physical - 1.0) / GRADE_MULTIPLIER;

    let p75_subject = channel_p75[0];
    let exposure_shift = 1.0 - p75_subject;
    let mut density = (exposure_shift - 0.1) / DENSITY_MULTIPLIER;

    let green_offset = midpoint - (channel_p99[1] + channel_p1[1]) * 0.5;
    let blue_offset = midpoint - (channel_p99[2] + channel_p1[2]) * 0.5;
    let mut wb_magenta = green_offset / CMY_MAX_DENSITY;
    let mut wb_yellow = blue_offset / CMY_MAX_DENSITY;
    let wb_cyan = 0.0;

    if round_for_ui {
        density = round_to(density, 0.05);
        grade = round_to(grade, 0.05);
        wb_magenta = round_to(wb_magenta, 0.5);
        wb_yellow = round_to(wb_yellow, 0.5);
    }

    Ok(AutoExposureResult {
        density: density.clamp(-1.0, 3.0),
        grade: grade.clamp(0.0, 5.0),
        wb_cyan,
        wb_magenta: wb_magenta.clamp(-1.0, 1.0),
        wb_yellow: wb_yellow.clamp(-1.0, 1.0),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flat_image(height: usize, width: usize, r: f32, g: f32, b: f32) -> FloatImage {
        let data: Vec<f32> = (0..height * width).flat_map(|_| [r, g, b]).collect();
        FloatImage::from_data(height, width, 3, data).unwrap()
    }

    #[test]
    fn flat_neutral_image_yields_zero_cmy() {
        let img = flat_image(10, 10, 0.5, 0.5, 0.5);
        let result = solve(&img, false).unwrap();
        assert!((result.wb_magenta).abs() < 1e-4);
        assert!((result.wb_yellow).abs() < 1e-4);
        assert_eq!(result.wb_cyan, 0.0);
    }

    #[test]
    fn green_cast_produces_nonzero_magenta_correction() {
        let img = flat_image(10, 10, 0.5, 0.8, 0.5);
        let result = solve(&img, false).unwrap();
        assert!(result.wb_magenta.abs() > 1e-3);
    }

    #[test]
    fn wider_dynamic_range_lowers_solved_grade() {
        let mut narrow_data = Vec::new();
        let mut wide_data = Vec::new();
        for i in 0..100 {
            let t = i as f32 / 99.0;
            let narrow = 0.45 + 0.1 * t;
            let wide = 0.1 + 0.8 * t;
            narrow_data.extend_from_slice(&[narrow, narrow, narrow]);
            wide_data.extend_from_slice(&[wide, wide, wide]);
        }
        let narrow_img = FloatImage::from_data(1, 100, 3, narrow_data).unwrap();
        let wide_img = FloatImage::from_data(1, 100, 3, wide_data).unwrap();

        let narrow_result = solve(&narrow_img, false).unwrap();
        let wide_result = solve(&wide_img, false).unwrap();
        assert!(wide_result.grade < narrow_result.grade);
    }

    #[test]
    fn round_for_ui_snaps_to_slider_steps() {
        let img = flat_image(10, 10, 0.52, 0.5, 0.5);
        let result = solve(&img, true).unwrap();
        assert!((result.density / 0.05).round() * 0.05 - result.density < 1e-5);
        assert!((result.grade / 0.05).round() * 0.05 - result.grade < 1e-5);
        assert!((result.wb_magenta / 0.5).round() * 0.5 - result.wb_magenta < 1e-5);
    }

    #[test]
    fn result_always_within_legal_slider_ranges() {
        let img = flat_image(10, 10, 0.01, 0.99, 0.01);
        let result = solve(&img, true).unwrap();
        assert!((-1.0..=3.0).contains(&result.density));
        assert!((0.0..=5.0).contains(&result.grade));
        assert!((-1.0..=1.0).contains(&result.wb_magenta));
        assert!((-1.0..=1.0).contains(&result.wb_yellow));
    }
}
