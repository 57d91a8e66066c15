//! I/O traits for image format readers and writers.
//!
//! This module defines the unified interface implemented by each format:
//! [`TiffReader`](crate::tiff::TiffReader)/[`TiffWriter`](crate::tiff::TiffWriter)
//! for the RAW loader's TIFF container and archival export, and
//! [`JpegWriter`](crate::jpeg::JpegWriter) for delivery export.
//!
//! # Usage
//!
//! ```ignore
//! use darkroom_io::tiff::{TiffWriter, TiffWriterOptions, Compression};
//! use darkroom_io::FormatWriter;
//!
//! let writer = TiffWriter::with_options(TiffWriterOptions {
//!     compression: Compression::Lzw,
//!     ..Default::default()
//! });
//! writer.write("output.tiff", &image)?;
//! ```

use crate::{ImageData, IoResult};
use std::io::{Read, Seek, Write};
use std::path::Path;

/// Combined trait bound for readers (Read + Seek).
///
/// Required for random-access parsing of file headers.
/// Automatically implemented for any type that implements both traits.
pub trait ReadSeek: Read + Seek {}
impl<T: Read + Seek> ReadSeek for T {}

/// Combined trait bound for writers.
pub trait WriteSeek: Write + Seek {}
impl<T: Write + Seek> WriteSeek for T {}

/// Format reader trait.
///
/// Implement this trait to add read support for a new image format.
///
/// # Type Parameter
///
/// * `O` - Reader options type. Use `()` if no options needed.
pub trait FormatReader<O: Default = ()>: Send + Sync {
    /// Format name for identification and error messages (e.g. "TIFF").
    fn format_name(&self) -> &'static str;

    /// File extensions this format uses (lowercase, without dot).
    fn extensions(&self) -> &'static [&'static str];

    /// Checks if this reader can parse the file based on magic bytes.
    ///
    /// Called during format auto-detection. Should be fast and
    /// only examine the first few bytes.
    fn can_read(&self, header: &[u8]) -> bool;

    /// Reads an image from a file path.
    fn read<P: AsRef<Path>>(&self, path: P) -> IoResult<ImageData>;

    /// Reads an image from a memory buffer.
    fn read_from_memory(&self, data: &[u8]) -> IoResult<ImageData>;

    /// Creates a reader with specific options.
    fn with_options(options: O) -> Self
    where
        Self: Sized;
}

/// Format writer trait.
///
/// Implement this trait to add write support for an image format.
///
/// # Type Parameter
///
/// * `O` - Writer options type. Use `()` if no options needed.
pub trait FormatWriter<O: Default = ()>: Send + Sync {
    /// Format name for identification.
    fn format_name(&self) -> &'static str;

    /// File extensions this format uses.
    fn extensions(&self) -> &'static [&'static str];

    /// Writes an image to a file path.
    fn write<P: AsRef<Path>>(&self, path: P, image: &ImageData) -> IoResult<()>;

    /// Writes an image to a memory buffer.
    fn write_to_memory(&self, image: &ImageData) -> IoResult<Vec<u8>>;

    /// Creates a writer with specific options.
    fn with_options(options: O) -> Self
    where
        Self: Sized;
}
