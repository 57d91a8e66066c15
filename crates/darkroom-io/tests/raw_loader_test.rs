//! Integration tests for the RAW loader collaborator, which hands the
//! pipeline a demosaiced linear buffer from a TIFF-wrapped sensor file.

use darkroom_io::raw;
use darkroom_io::tiff::{BitDepth, Compression, TiffWriter, TiffWriterOptions};
use darkroom_io::{FormatWriter, ImageData};

fn write_fixture_tiff(path: &std::path::Path, width: u32, height: u32) {
    let mut data = Vec::with_capacity((width * height * 3) as usize);
    for y in 0..height {
        for x in 0..width {
            data.push(x as f32 / width as f32);
            data.push(y as f32 / height as f32);
            data.push(0.5);
        }
    }
    let image = ImageData::from_f32(width, height, 3, data);

    let writer = TiffWriter::with_options(TiffWriterOptions {
        bit_depth: BitDepth::Sixteen,
        compression: Compression::Lzw,
        icc_profile: None,
    });
    writer.write(path, &image).expect("fixture write failed");
}

#[test]
fn load_delivers_neutral_white_balance_by_default() {
    let path = std::env::temp_dir().join("darkroom_io_raw_neutral_test.tiff");
    write_fixture_tiff(&path, 32, 32);

    let buffer = raw::load(&path, false).expect("load failed");

    assert_eq!(buffer.width, 32);
    assert_eq!(buffer.height, 32);
    assert_eq!(buffer.data.len(), 32 * 32 * 3);
    assert_eq!(buffer.metadata.camera_wb_multipliers, [1.0, 1.0, 1.0, 1.0]);

    let _ = std::fs::remove_file(&path);
}

#[test]
fn load_falls_back_to_neutral_wb_when_no_camera_tags_present() {
    let path = std::env::temp_dir().join("darkroom_io_raw_wb_fallback_test.tiff");
    write_fixture_tiff(&path, 16, 16);

    // The fixture TIFF carries no WhiteBalance* attrs, so requesting camera
    // WB should still yield the default neutral multipliers.
    let buffer = raw::load(&path, true).expect("load failed");
    assert_eq!(buffer.metadata.camera_wb_multipliers, [1.0, 1.0, 1.0, 1.0]);

    let _ = std::fs::remove_file(&path);
}

#[test]
fn load_rejects_a_non_three_channel_file() {
    let path = std::env::temp_dir().join("darkroom_io_raw_rgba_test.tiff");
    let image = ImageData::from_f32(8, 8, 4, vec![0.5; 8 * 8 * 4]);
    TiffWriter::new().write(&path, &image).expect("fixture write failed");

    let result = raw::load(&path, false);
    assert!(result.is_err(), "a 4-channel file should not pass as a 3-channel sensor buffer");

    let _ = std::fs::remove_file(&path);
}

#[test]
fn load_errors_on_missing_file() {
    let result = raw::load("/nonexistent/path/does_not_exist.tiff", false);
    assert!(result.is_err());
}
