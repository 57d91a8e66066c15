//! Content sizing and paper framing math (`spec.md` §4.9 steps 1-2),
//! grounded on `render_service.py`'s `_apply_scaling_and_border`.

use darkroom_ops::resize::fit_dimensions;

/// Pixel dimensions computed from a `darkroom_pipeline::ExportConfig`'s
/// print-size/DPI/border sliders.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContentSizing {
    /// Target pixels on the long edge before any border is subtracted.
    pub total_target_px: u32,
    /// Border width in pixels.
    pub border_px: u32,
    /// Content area's long-edge target, after subtracting the border.
    pub content_target_px: u32,
}

/// Computes [`ContentSizing`] from print size, DPI, and border size, all in
/// centimeters except `dpi` (`spec.md` §4.9 step 1). `use_original_res`
/// skips resampling entirely; callers should check it before resizing.
pub fn compute_content_sizing(print_size_cm: f32, dpi: f32, border_size_cm: f32) -> ContentSizing {
    let side_inch = print_size_cm / 2.54;
    let total_target_px = (side_inch * dpi).round().max(1.0) as u32;
    let border_px = ((border_size_cm / 2.54) * dpi).round().max(0.0) as u32;
    let content_target_px = total_target_px.saturating_sub(2 * border_px).max(10);
    ContentSizing { total_target_px, border_px, content_target_px }
}

/// Aspect-preserving content dimensions whose long edge matches
/// `content_target_px`.
pub fn fit_content_dims(src_w: u32, src_h: u32, content_target_px: u32) -> (u32, u32) {
    let (w, h) = fit_dimensions(src_w as usize, src_h as usize, content_target_px as usize, content_target_px as usize);
    (w as u32, h as u32)
}

/// Paper canvas dimensions (`spec.md` §4.9 step 2). When `ratio_str` is
/// `"Original"`, the paper is exactly the content plus its border. Otherwise
/// the paper's long edge is `sizing.total_target_px`, oriented to match the
/// content's orientation, flipping the parsed ratio the same way
/// `darkroom_geometry::enforce_aspect_ratio` does for crop rectangles.
pub fn paper_dims(content_w: u32, content_h: u32, sizing: ContentSizing, ratio_str: &str) -> (u32, u32) {
    let min_w = content_w + 2 * sizing.border_px;
    let min_h = content_h + 2 * sizing.border_px;

    if ratio_str.eq_ignore_ascii_case("original") {
        return (min_w, min_h);
    }

    let mut aspect = darkroom_geometry::parse_aspect_ratio(ratio_str);
    let is_vertical = content_h > content_w;
    if is_vertical && aspect > 1.0 {
        aspect = 1.0 / aspect;
    } else if !is_vertical && aspect < 1.0 {
        aspect = 1.0 / aspect;
    }

    let (paper_w, paper_h) = if is_vertical {
        let h = sizing.total_target_px as f32;
        (h * aspect, h)
    } else {
        let w = sizing.total_target_px as f32;
        (w, w / aspect)
    };

    (paper_w.round().max(min_w as f32) as u32, paper_h.round().max(min_h as f32) as u32)
}

/// Parses a `"#RRGGBB"` string into a linear-light-agnostic `[0, 1]` RGB
/// triple. Falls back to white on any malformed input.
pub fn parse_hex_color(hex: &str) -> [f32; 3] {
    let hex = hex.trim_start_matches('#');
    if hex.len() != 6 {
        return [1.0, 1.0, 1.0];
    }
    let mut out = [1.0f32; 3];
    for c in 0..3 {
        match u8::from_str_radix(&hex[c * 2..c * 2 + 2], 16) {
            Ok(byte) => out[c] = byte as f32 / 255.0,
            Err(_) => return [1.0, 1.0, 1.0],
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn content_sizing_matches_print_size_and_dpi() {
        let sizing = compute_content_sizing(20.0, 300.0, 0.0);
        assert_eq!(sizing.border_px, 0);
        assert_eq!(sizing.content_target_px, sizing.total_target_px);
        assert!((sizing.total_target_px as f32 - 2362.0).abs() < 2.0);
    }

    #[test]
    fn border_shrinks_content_target() {
        let sizing = compute_content_sizing(20.0, 300.0, 1.0);
        assert!(sizing.border_px > 0);
        assert_eq!(sizing.content_target_px, sizing.total_target_px - 2 * sizing.border_px);
    }

    #[test]
    fn fit_content_preserves_aspect_ratio() {
        let (w, h) = fit_content_dims(1920, 1080, 640);
        assert_eq!(w, 640);
        assert_eq!(h, 360);
    }

    #[test]
    fn original_paper_ratio_equals_content_plus_border() {
        let sizing = ContentSizing { total_target_px: 1000, border_px: 20, content_target_px: 960 };
        let (pw, ph) = paper_dims(600, 400, sizing, "Original");
        assert_eq!((pw, ph), (640, 440));
    }

    #[test]
    fn non_original_ratio_uses_total_target_as_long_edge() {
        let sizing = ContentSizing { total_target_px: 1000, border_px: 0, content_target_px: 1000 };
        let (pw, ph) = paper_dims(800, 600, sizing, "1:1");
        assert_eq!(pw, 1000);
        assert_eq!(ph, 1000);
    }

    #[test]
    fn hex_color_parses_components() {
        let rgb = parse_hex_color("#FF8000");
        assert!((rgb[0] - 1.0).abs() < 1e-3);
        assert!((rgb[1] - (128.0 / 255.0)).abs() < 1e-3);
        assert!((rgb[2] - 0.0).abs() < 1e-3);
    }

    #[test]
    fn malformed_hex_falls_back_to_white() {
        assert_eq!(parse_hex_color("not-a-color"), [1.0, 1.0, 1.0]);
    }
}
