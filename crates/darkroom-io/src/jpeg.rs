//! JPEG format support.
//!
//! Writes JPEG files - the delivery format for preview and web export.
//! darkroom-io only ever writes JPEG: the RAW loader reads a TIFF-wrapped
//! sensor buffer (see [`crate::raw`]) and the pipeline never needs to decode
//! a JPEG back in, so there is no [`FormatReader`] implementation here.
//!
//! # Overview
//!
//! JPEG (Joint Photographic Experts Group) is a lossy format optimized for
//! photographic content. This writer supports:
//! - 8-bit per channel only
//! - RGB and grayscale color modes
//! - Variable quality/compression ratio
//! - DPI and ICC profile embedding
//!
//! # Example
//!
//! ```rust,ignore
//! use darkroom_io::jpeg::{JpegWriter, JpegWriterOptions};
//! use darkroom_io::FormatWriter;
//!
//! let writer = JpegWriter::with_options(JpegWriterOptions {
//!     quality: 95,
//!     ..Default::default()
//! });
//! writer.write("highq.jpg", &image)?;
//! ```

use crate::{FormatWriter, ImageData, IoError, IoResult};
use std::path::Path;

// ============================================================================
// Color Type
// ============================================================================

/// JPEG output color mode.
///
/// JPEG supports RGB (color) and grayscale output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColorType {
    /// Full color RGB output.
    #[default]
    Rgb,
    /// Grayscale output (smaller files for B&W images).
    Grayscale,
}

// ============================================================================
// Writer Options
// ============================================================================

/// Options for writing JPEG files.
///
/// Controls quality and color output mode.
///
/// # Example
///
/// ```rust,ignore
/// use darkroom_io::jpeg::{JpegWriter, JpegWriterOptions};
/// use darkroom_io::FormatWriter;
///
/// // High quality for reference images
/// let options = JpegWriterOptions {
///     quality: 95,
///     ..Default::default()
/// };
/// let writer = JpegWriter::with_options(options);
/// writer.write("reference.jpg", &image)?;
/// ```
#[derive(Debug, Clone)]
pub struct JpegWriterOptions {
    /// Quality level 1-100. Higher = better quality, larger files.
    /// Default: 90 (good balance for most uses).
    pub quality: u8,
    /// Output color mode. Default: RGB.
    pub color_type: ColorType,
    /// DPI to embed in the JFIF header, if any.
    pub dpi: Option<f32>,
    /// Raw ICC profile bytes to embed as an APP2 segment, if any.
    pub icc_profile: Option<Vec<u8>>,
}

impl Default for JpegWriterOptions {
    fn default() -> Self {
        Self {
            quality: 90,
            color_type: ColorType::Rgb,
            dpi: None,
            icc_profile: None,
        }
    }
}

// ============================================================================
// JpegWriter
// ============================================================================

/// JPEG file writer.
///
/// Implements [`FormatWriter`] for writing JPEG files with configurable options.
///
/// # Features
///
/// - Quality control (1-100)
/// - RGB and grayscale output
/// - Memory and file writing
///
/// # Example
///
/// ```rust,ignore
/// use darkroom_io::jpeg::{JpegWriter, JpegWriterOptions};
/// use darkroom_io::FormatWriter;
///
/// // Low quality for previews
/// let preview_writer = JpegWriter::with_options(JpegWriterOptions {
///     quality: 60,
///     ..Default::default()
/// });
/// preview_writer.write("preview.jpg", &image)?;
///
/// // High quality for final delivery
/// let hq_writer = JpegWriter::with_options(JpegWriterOptions {
///     quality: 98,
///     ..Default::default()
/// });
/// hq_writer.write("final.jpg", &image)?;
/// ```
#[derive(Debug, Clone)]
pub struct JpegWriter {
    options: JpegWriterOptions,
}

impl JpegWriter {
    /// Creates a new writer with default options (quality 90).
    pub fn new() -> Self {
        Self::with_options(JpegWriterOptions::default())
    }

    /// Internal write implementation.
    fn write_impl(&self, image: &ImageData) -> IoResult<Vec<u8>> {
        use jpeg_encoder::{ColorType as JpegColorType, Encoder};

        // Convert to u8
        let u8_data = image.to_u8();

        // Prepare pixel data based on color type
        let (color_type, pixel_data) = match self.options.color_type {
            ColorType::Rgb => {
                // Strip alpha if RGBA
                let rgb = if image.channels == 4 {
                    u8_data
                        .chunks(4)
                        .flat_map(|rgba| [rgba[0], rgba[1], rgba[2]])
                        .collect()
                } else if image.channels == 3 {
                    u8_data
                } else if image.channels == 1 {
                    // Expand grayscale to RGB
                    u8_data.iter().flat_map(|&g| [g, g, g]).collect()
                } else {
                    return Err(IoError::EncodeError(format!(
                        "unsupported channel count: {}",
                        image.channels
                    )));
                };
                (JpegColorType::Rgb, rgb)
            }
            ColorType::Grayscale => {
                // Convert to grayscale
                let gray = if image.channels >= 3 {
                    u8_data
                        .chunks(image.channels as usize)
                        .map(|px| {
                            // ITU-R BT.601 luma coefficients
                            let r = px[0] as f32;
                            let g = px[1] as f32;
                            let b = px[2] as f32;
                            (0.299 * r + 0.587 * g + 0.114 * b) as u8
                        })
                        .collect()
                } else {
                    u8_data
                };
                (JpegColorType::Luma, gray)
            }
        };

        // Encode to memory buffer
        let mut buffer = Vec::new();
        let encoder = Encoder::new(&mut buffer, self.options.quality);
        encoder
            .encode(&pixel_data, image.width as u16, image.height as u16, color_type)
            .map_err(|e: jpeg_encoder::EncodingError| IoError::EncodeError(e.to_string()))?;

        if let Some(dpi) = self.options.dpi {
            patch_jfif_density(&mut buffer, dpi);
        }
        if let Some(icc) = &self.options.icc_profile {
            buffer = insert_icc_segments(buffer, icc);
        }

        Ok(buffer)
    }
}

/// Overwrites the density fields of the JFIF APP0 segment jpeg-encoder
/// always emits first, in place. JFIF APP0 layout: `FFE0 len(2) "JFIF\0"(5)
/// version(2) units(1) xdensity(2) ydensity(2) thumbw(1) thumbh(1)`.
fn patch_jfif_density(buffer: &mut [u8], dpi: f32) {
    if buffer.len() < 20 || buffer[0..2] != [0xFF, 0xD8] || buffer[2] != 0xFF || buffer[3] != 0xE0 {
        return;
    }
    if &buffer[6..11] != b"JFIF\0" {
        return;
    }
    let density = dpi.round().clamp(1.0, u16::MAX as f32) as u16;
    let bytes = density.to_be_bytes();
    buffer[13] = 1; // units: 1 == dots per inch
    buffer[14] = bytes[0];
    buffer[15] = bytes[1];
    buffer[16] = bytes[0];
    buffer[17] = bytes[1];
}

/// Splices one or more "ICC_PROFILE\0" APP2 segments right after the SOI
/// marker, chunked to the 64 KiB JPEG segment limit, per the ICC
/// specification's JPEG embedding annex.
fn insert_icc_segments(buffer: Vec<u8>, icc: &[u8]) -> Vec<u8> {
    const MAX_CHUNK: usize = 65533 - 2 - 12 - 2;
    let chunks: Vec<&[u8]> = icc.chunks(MAX_CHUNK).collect();
    let total = chunks.len().min(255).max(1) as u8;

    let mut out = Vec::with_capacity(buffer.len() + icc.len() + chunks.len() * 18);
    out.extend_from_slice(&buffer[0..2]); // SOI

    for (i, chunk) in chunks.iter().enumerate() {
        let payload_len = 2 + 12 + 2 + chunk.len();
        out.push(0xFF);
        out.push(0xE2);
        out.extend_from_slice(&(payload_len as u16).to_be_bytes());
        out.extend_from_slice(b"ICC_PROFILE\0");
        out.push((i + 1) as u8);
        out.push(total);
        out.extend_from_slice(chunk);
    }

    out.extend_from_slice(&buffer[2..]);
    out
}

impl Default for JpegWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl FormatWriter<JpegWriterOptions> for JpegWriter {
    /// Returns "JPEG".
    fn format_name(&self) -> &'static str {
        "JPEG"
    }

    /// Returns `["jpg", "jpeg"]`.
    fn extensions(&self) -> &'static [&'static str] {
        &["jpg", "jpeg"]
    }

    /// Writes a JPEG file to disk.
    fn write<P: AsRef<Path>>(&self, path: P, image: &ImageData) -> IoResult<()> {
        let data = self.write_to_memory(image)?;
        std::fs::write(path.as_ref(), data)?;
        Ok(())
    }

    /// Writes a JPEG to a byte vector.
    fn write_to_memory(&self, image: &ImageData) -> IoResult<Vec<u8>> {
        self.write_impl(image)
    }

    /// Creates writer with custom options.
    fn with_options(options: JpegWriterOptions) -> Self {
        Self { options }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    /// Tests that the writer round-trips quality into observable file size.
    #[test]
    fn test_quality_options() {
        let image = ImageData::from_u8(16, 16, 3, vec![128; 16 * 16 * 3]);
        let temp_path = std::env::temp_dir().join("darkroom_io_jpeg_quality_test.jpg");

        // Low quality
        let writer = JpegWriter::with_options(JpegWriterOptions {
            quality: 50,
            ..Default::default()
        });
        writer.write(&temp_path, &image).expect("Write failed");
        let low_size = std::fs::metadata(&temp_path).unwrap().len();

        // High quality
        let writer = JpegWriter::with_options(JpegWriterOptions {
            quality: 99,
            ..Default::default()
        });
        writer.write(&temp_path, &image).expect("Write failed");
        let high_size = std::fs::metadata(&temp_path).unwrap().len();

        // High quality should be larger (usually)
        assert!(high_size >= low_size);

        let _ = std::fs::remove_file(&temp_path);
    }

    /// Tests that the encoded bytes start with a valid JPEG SOI marker.
    #[test]
    fn test_memory_write_produces_valid_jpeg_header() {
        let image = ImageData::from_u8(16, 16, 3, vec![100; 16 * 16 * 3]);

        let writer = JpegWriter::new();
        let bytes = writer.write_to_memory(&image).expect("Write failed");

        assert_eq!(&bytes[0..2], &[0xFF, 0xD8]);
        assert_eq!(&bytes[bytes.len() - 2..], &[0xFF, 0xD9]);
    }

    /// Tests grayscale encoding selects the Luma color type and still produces
    /// a valid JPEG stream.
    #[test]
    fn test_grayscale_output() {
        let image = ImageData::from_u8(16, 16, 3, vec![128; 16 * 16 * 3]);

        let writer = JpegWriter::with_options(JpegWriterOptions {
            color_type: ColorType::Grayscale,
            ..Default::default()
        });
        let bytes = writer.write_to_memory(&image).expect("Write failed");

        assert_eq!(&bytes[0..2], &[0xFF, 0xD8]);
    }

    /// Tests embedding an ICC profile and DPI lands in the encoded bytes.
    #[test]
    fn test_icc_and_dpi_embedding() {
        let image = ImageData::from_u8(16, 16, 3, vec![100; 16 * 16 * 3]);
        let fake_icc = vec![0xAB; 600];

        let writer = JpegWriter::with_options(JpegWriterOptions {
            dpi: Some(300.0),
            icc_profile: Some(fake_icc.clone()),
            ..Default::default()
        });
        let bytes = writer.write_to_memory(&image).expect("encode failed");

        assert_eq!(&bytes[0..2], &[0xFF, 0xD8]);
        assert_eq!(&bytes[2..4], &[0xFF, 0xE2]);
        let marker = b"ICC_PROFILE\0";
        let pos = bytes.windows(marker.len()).position(|w| w == marker).expect("ICC marker present");
        assert_eq!(&bytes[pos + 12 + 2..pos + 12 + 2 + fake_icc.len()], &fake_icc[..]);
    }

    #[test]
    fn test_icc_chunking_over_segment_limit() {
        let icc = vec![0x5A; 150_000];
        let mut buffer = vec![0xFF, 0xD8, 0xFF, 0xDA];
        let out = insert_icc_segments(std::mem::take(&mut buffer), &icc);
        let reassembled: Vec<u8> = out
            .windows(12)
            .enumerate()
            .filter(|(_, w)| *w == b"ICC_PROFILE\0")
            .map(|(i, _)| i)
            .collect();
        assert!(reassembled.len() >= 3, "150KB ICC profile should split into 3+ segments");
    }
}
