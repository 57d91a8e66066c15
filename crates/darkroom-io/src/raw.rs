//! RAW sensor buffer loading.
//!
//! The photometric pipeline's negative-to-positive conversion is not a RAW
//! decoder: it consumes an already-demosaiced, white-balance-neutral 16-bit
//! linear RGB buffer. This module is the collaborator that delivers that
//! buffer, not a general-purpose camera RAW codec.
//!
//! CinemaDNG and most camera RAW formats wrap their sensor data in a TIFF
//! container, so this loader shells out to the TIFF decoder. For a mosaiced
//! sensor RAW (true debayering, black-level subtraction, highlight recovery)
//! a dedicated library such as `rawloader` or `libraw`-backed crate should
//! replace the [`TiffReader`] call here; that integration is out of scope.

use crate::tiff::TiffReader;
use crate::traits::FormatReader;
use crate::{IoError, IoResult};
use std::path::Path;

/// A demosaiced, linear-light 16-bit RGB sensor buffer plus the metadata
/// needed to interpret it.
#[derive(Debug, Clone)]
pub struct LinearBuffer16 {
    /// Image width in pixels.
    pub width: u32,
    /// Image height in pixels.
    pub height: u32,
    /// Interleaved RGB samples, `width * height * 3` long.
    pub data: Vec<u16>,
    /// Metadata describing the buffer's color interpretation.
    pub metadata: RawMetadata,
}

/// Metadata describing a decoded RAW buffer.
#[derive(Debug, Clone)]
pub struct RawMetadata {
    /// Name of the buffer's native color space (camera-specific, informational).
    pub color_space: String,
    /// Per-channel white balance multipliers applied during demosaic.
    ///
    /// The photometric pipeline requires these to be neutral (`[1.0; 4]`)
    /// unless the caller explicitly asked for the camera's as-shot balance.
    pub camera_wb_multipliers: [f32; 4],
}

impl Default for RawMetadata {
    fn default() -> Self {
        Self {
            color_space: "linear".to_string(),
            camera_wb_multipliers: [1.0, 1.0, 1.0, 1.0],
        }
    }
}

/// Loads a demosaiced linear RGB buffer from a RAW-container file.
///
/// Delivers neutral white balance (`camera_wb_multipliers = [1,1,1,1]`) and
/// gamma 1.0 unless `use_camera_wb` is set. Returns an error for files this
/// loader cannot decode; use a dedicated RAW codec for true sensor mosaics.
pub fn load<P: AsRef<Path>>(path: P, use_camera_wb: bool) -> IoResult<LinearBuffer16> {
    let path = path.as_ref();
    let image = TiffReader::new().read(path)?;

    let data = image.to_u16();
    let mut metadata = RawMetadata::default();

    if use_camera_wb {
        if let Some(wb) = read_camera_wb(&image.metadata.attrs) {
            metadata.camera_wb_multipliers = wb;
        }
    }

    if image.channels != 3 {
        return Err(IoError::DimensionMismatch {
            expected: "3 channels".to_string(),
            actual: format!("{} channels", image.channels),
        });
    }

    Ok(LinearBuffer16 {
        width: image.width,
        height: image.height,
        data,
        metadata,
    })
}

fn read_camera_wb(attrs: &crate::Attrs) -> Option<[f32; 4]> {
    let r = attrs.get_f32("WhiteBalanceR")?;
    let g = attrs.get_f32("WhiteBalanceG")?;
    let b = attrs.get_f32("WhiteBalanceB")?;
    Some([r, g, b, g])
}
