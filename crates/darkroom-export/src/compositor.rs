//! The Export Compositor's main orchestration (`spec.md` §4.9).
//!
//! Five steps, grounded on `render_service.py`'s
//! `_apply_scaling_and_border` and `_apply_color_management`:
//! 1. resize the positive to the print/DPI/border content target,
//! 2. composite it onto a border-filled paper canvas,
//! 3. collapse to single-channel if the export calls for greyscale,
//! 4. run an ICC transform if a destination profile is configured,
//! 5. encode to the requested format.

use darkroom_core::{luma, FloatImage, ProcessMode};
use darkroom_icc::{Intent, Profile, Transform};
use darkroom_io::jpeg::{self, ColorType, JpegWriterOptions};
use darkroom_io::tiff::{self, BitDepth, Compression, TiffWriterOptions};
use darkroom_io::{FormatWriter, ImageData};
use darkroom_pipeline::{ExportColorSpace, ExportConfig, ExportFormat, WorkspaceConfig};
use darkroom_toning::ToningConfig;

use crate::error::ExportResult;
use crate::sizing::{compute_content_sizing, fit_content_dims, parse_hex_color, paper_dims};

/// An encoded export: the raw bytes plus the extension they should be
/// written with.
#[derive(Debug, Clone)]
pub struct ExportedFile {
    /// Encoded file bytes.
    pub bytes: Vec<u8>,
    /// Extension without a leading dot, e.g. `"jpg"`.
    pub extension: &'static str,
}

/// Whether the image carries a chemical toning or paper profile other than
/// none — the original's `is_toned` check controlling mode selection.
fn is_toned(toning: &ToningConfig) -> bool {
    toning.selenium_strength != 0.0 || toning.sepia_strength != 0.0 || toning.paper_profile != "None"
}

/// Composites `positive` onto a paper canvas per `settings.export`,
/// color-manages it, and encodes it. `positive` is expected in the working
/// color space produced by the rest of the pipeline (i.e. the Orchestrator's
/// output for this same `settings`).
pub fn export(positive: &FloatImage, settings: &WorkspaceConfig) -> ExportResult<ExportedFile> {
    let cfg = &settings.export;
    let framed = frame_on_paper(positive, cfg)?;
    let mode_selected = select_mode(&framed, cfg, settings.process_mode, &settings.toning);
    let color_managed = apply_color_management(mode_selected, cfg)?;
    encode(&color_managed, cfg)
}

/// Steps 1-2: resize to the content target (unless `use_original_res`) and
/// composite onto a border-filled paper canvas.
fn frame_on_paper(positive: &FloatImage, cfg: &ExportConfig) -> ExportResult<FloatImage> {
    if cfg.use_original_res && cfg.border_size_cm <= 0.0 {
        return Ok(positive.clone());
    }

    let sizing = compute_content_sizing(cfg.print_size_cm, cfg.dpi, cfg.border_size_cm);
    let (src_w, src_h) = (positive.width(), positive.height());
    let (content_w, content_h) = if cfg.use_original_res {
        (src_w, src_h)
    } else {
        fit_content_dims(src_w, src_h, sizing.content_target_px)
    };

    let channels = positive.channels();
    let resized = if (content_w, content_h) == (src_w, src_h) {
        positive.data().to_vec()
    } else {
        darkroom_ops::resize::resize_f32(
            positive.data(),
            src_w as usize,
            src_h as usize,
            channels as usize,
            content_w as usize,
            content_h as usize,
            darkroom_ops::resize::Filter::Lanczos3,
        )?
    };

    if sizing.border_px == 0 && cfg.paper_aspect_ratio.eq_ignore_ascii_case("original") {
        return Ok(FloatImage::from_data(content_h, content_w, channels, resized)?);
    }

    let (paper_w, paper_h) = paper_dims(content_w, content_h, sizing, &cfg.paper_aspect_ratio);
    let border_rgb = parse_hex_color(&cfg.border_color_hex);
    let fill = match channels {
        1 => vec![darkroom_core::luma3(border_rgb)],
        _ => border_rgb.to_vec(),
    };

    let mut canvas = vec![0.0f32; paper_w as usize * paper_h as usize * channels as usize];
    for px in canvas.chunks_mut(channels as usize) {
        px.copy_from_slice(&fill);
    }

    let off_x = (paper_w - content_w) / 2;
    let off_y = (paper_h - content_h) / 2;
    let canvas_stride = paper_w as usize * channels as usize;
    let content_stride = content_w as usize * channels as usize;
    for row in 0..content_h as usize {
        let dst_start = (off_y as usize + row) * canvas_stride + off_x as usize * channels as usize;
        let src_start = row * content_stride;
        canvas[dst_start..dst_start + content_stride].copy_from_slice(&resized[src_start..src_start + content_stride]);
    }

    Ok(FloatImage::from_data(paper_h, paper_w, channels, canvas)?)
}

/// Step 3: collapses to greyscale when the export color space demands it,
/// or when the process is untoned B&W (`render_service.py`'s mode-selection
/// rule).
fn select_mode(img: &FloatImage, cfg: &ExportConfig, process_mode: ProcessMode, toning: &ToningConfig) -> FloatImage {
    let wants_greyscale = matches!(cfg.color_space, ExportColorSpace::Greyscale)
        || (process_mode == ProcessMode::BW && !is_toned(toning));
    if wants_greyscale {
        luma(img)
    } else {
        img.clone()
    }
}

/// Step 4: ICC transform. Faithfully replicates the original's quirk that
/// color management always force-converts back to a 3-channel buffer
/// first, so an ICC-enabled export is RGB even if mode selection just
/// collapsed it to greyscale.
fn apply_color_management(img: FloatImage, cfg: &ExportConfig) -> ExportResult<FloatImage> {
    let Some(path) = &cfg.icc_profile_path else {
        return Ok(img);
    };

    let dest = Profile::from_file(std::path::Path::new(path))?;
    let working = Profile::srgb();
    let transform = if cfg.icc_invert {
        Transform::new_with_bpc(&dest, &working, Intent::RelativeColorimetric)?
    } else {
        Transform::new_with_bpc(&working, &dest, Intent::RelativeColorimetric)?
    };

    let rgb = darkroom_core::ensure_rgb(&img);
    let mut data = rgb.data().to_vec();
    transform.apply_buffer(&mut data);
    Ok(FloatImage::from_data(rgb.height(), rgb.width(), 3, data)?)
}

/// Step 5: encode to the configured format.
fn encode(img: &FloatImage, cfg: &ExportConfig) -> ExportResult<ExportedFile> {
    let icc_bytes = match &cfg.icc_profile_path {
        Some(path) => Some(Profile::from_file(std::path::Path::new(path))?.to_icc()?),
        None => None,
    };

    let image_data = ImageData::from_f32(img.width(), img.height(), img.channels() as u32, img.data().to_vec());

    match cfg.format {
        ExportFormat::Jpeg => {
            let color_type = if img.channels() == 1 { ColorType::Grayscale } else { ColorType::Rgb };
            let options = JpegWriterOptions { quality: 95, color_type, dpi: Some(cfg.dpi), icc_profile: icc_bytes };
            let writer = jpeg::JpegWriter::with_options(options);
            Ok(ExportedFile { bytes: writer.write_to_memory(&image_data)?, extension: "jpg" })
        }
        ExportFormat::Tiff => {
            let mut image_data = image_data;
            image_data.metadata.dpi = Some(cfg.dpi);
            let options = TiffWriterOptions { bit_depth: BitDepth::Sixteen, compression: Compression::Lzw, icc_profile: icc_bytes };
            let writer = tiff::TiffWriter::with_options(options);
            Ok(ExportedFile { bytes: writer.write_to_memory(&image_data)?, extension: "tiff" })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use darkroom_core::FloatImage;

    fn solid(height: u32, width: u32, channels: u8, value: f32) -> FloatImage {
        FloatImage::from_data(height, width, channels, vec![value; (height * width) as usize * channels as usize]).unwrap()
    }

    #[test]
    fn frame_on_paper_adds_border_padding() {
        let positive = solid(100, 150, 3, 0.5);
        let cfg = ExportConfig { print_size_cm: 2.54, dpi: 100.0, border_size_cm: 0.254, use_original_res: true, ..Default::default() };
        let framed = frame_on_paper(&positive, &cfg).unwrap();
        assert!(framed.width() > positive.width());
        assert!(framed.height() > positive.height());
    }

    #[test]
    fn frame_on_paper_is_noop_when_original_res_and_no_border() {
        let positive = solid(64, 64, 3, 0.5);
        let cfg = ExportConfig { use_original_res: true, border_size_cm: 0.0, ..Default::default() };
        let framed = frame_on_paper(&positive, &cfg).unwrap();
        assert_eq!((framed.width(), framed.height()), (64, 64));
    }

    #[test]
    fn paper_ratio_applies_even_with_zero_border() {
        let positive = solid(200, 100, 3, 0.5);
        let cfg = ExportConfig {
            use_original_res: true,
            border_size_cm: 0.0,
            paper_aspect_ratio: "1:1".to_string(),
            ..Default::default()
        };
        let framed = frame_on_paper(&positive, &cfg).unwrap();
        assert_ne!((framed.width(), framed.height()), (positive.width(), positive.height()));
    }

    #[test]
    fn greyscale_color_space_collapses_channels_but_keeps_three() {
        let img = solid(8, 8, 3, 0.5);
        let cfg = ExportConfig { color_space: ExportColorSpace::Greyscale, ..Default::default() };
        let toning = ToningConfig::default();
        let out = select_mode(&img, &cfg, ProcessMode::C41, &toning);
        assert_eq!(out.channels(), 3);
    }

    #[test]
    fn untoned_bw_process_mode_triggers_greyscale_selection() {
        let img = solid(8, 8, 3, 0.5);
        let cfg = ExportConfig::default();
        let toning = ToningConfig::default();
        let out = select_mode(&img, &cfg, ProcessMode::BW, &toning);
        let data = out.data();
        assert!(data.chunks(3).all(|px| (px[0] - px[1]).abs() < 1e-6 && (px[1] - px[2]).abs() < 1e-6));
    }

    #[test]
    fn toned_bw_process_mode_skips_greyscale_selection() {
        let mut img = solid(4, 4, 3, 0.0);
        img.set_pixel3(0, 0, [1.0, 0.0, 0.0]);
        let cfg = ExportConfig::default();
        let toning = ToningConfig { selenium_strength: 1.0, ..ToningConfig::default() };
        let out = select_mode(&img, &cfg, ProcessMode::BW, &toning);
        assert_eq!(out.pixel3(0, 0), [1.0, 0.0, 0.0]);
    }

    #[test]
    fn no_icc_profile_leaves_buffer_unchanged() {
        let img = solid(4, 4, 3, 0.5);
        let cfg = ExportConfig::default();
        let out = apply_color_management(img.clone(), &cfg).unwrap();
        assert_eq!(out.data(), img.data());
    }

    #[test]
    fn jpeg_encode_produces_nonempty_bytes() {
        let img = solid(16, 16, 3, 0.25);
        let cfg = ExportConfig::default();
        let result = encode(&img, &cfg).unwrap();
        assert_eq!(result.extension, "jpg");
        assert!(!result.bytes.is_empty());
    }

    #[test]
    fn tiff_encode_produces_nonempty_bytes() {
        let img = solid(16, 16, 3, 0.25);
        let cfg = ExportConfig { format: ExportFormat::Tiff, ..Default::default() };
        let result = encode(&img, &cfg).unwrap();
        assert_eq!(result.extension, "tiff");
        assert!(!result.bytes.is_empty());
    }

    #[test]
    fn export_runs_the_full_pipeline_for_default_settings() {
        let img = solid(64, 48, 3, 0.4);
        let settings = WorkspaceConfig::default();
        let result = export(&img, &settings).unwrap();
        assert_eq!(result.extension, "jpg");
        assert!(!result.bytes.is_empty());
    }
}
