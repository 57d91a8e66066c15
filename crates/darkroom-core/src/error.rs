//! Error types for darkroom-core operations.
//!
//! This module provides the error type shared by the lower layers of the
//! darkroom pipeline: buffer allocation, bounds checking, and the invariants
//! `ImageBuffer`/`Roi`/`Dimensions` enforce.
//!
//! # Dependencies
//!
//! - [`thiserror`] - derive macro error implementation

use thiserror::Error;

/// Result type alias using [`Error`] as the error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in darkroom-core's buffer and region types.
#[derive(Debug, Error)]
pub enum Error {
    /// Pixel coordinates are outside image bounds.
    #[error("pixel ({x}, {y}) out of bounds for image {width}x{height}")]
    OutOfBounds {
        /// X coordinate that was out of bounds
        x: u32,
        /// Y coordinate that was out of bounds
        y: u32,
        /// Image width
        width: u32,
        /// Image height
        height: u32,
    },

    /// Region of interest extends beyond image bounds, or is degenerate
    /// (zero or negative size).
    #[error("region ({y1}, {y2}, {x1}, {x2}) is invalid for image {width}x{height}")]
    InvalidRegion {
        /// ROI top (inclusive)
        y1: u32,
        /// ROI bottom (exclusive)
        y2: u32,
        /// ROI left (inclusive)
        x1: u32,
        /// ROI right (exclusive)
        x2: u32,
        /// Image width
        width: u32,
        /// Image height
        height: u32,
    },

    /// Buffer length does not match the declared dimensions/channel count.
    #[error("buffer length {got} does not match expected {expected} for {width}x{height}x{channels}")]
    LengthMismatch {
        /// Elements found
        got: usize,
        /// Elements expected
        expected: usize,
        /// Image width
        width: u32,
        /// Image height
        height: u32,
        /// Channel count
        channels: u8,
    },

    /// Image dimensions are invalid (zero, or would overflow buffer sizing).
    #[error("invalid dimensions: {width}x{height} ({reason})")]
    InvalidDimensions {
        /// Requested width
        width: u32,
        /// Requested height
        height: u32,
        /// Reason why dimensions are invalid
        reason: String,
    },

    /// Channel count is not supported by this operation (only 1 and 3 are).
    #[error("unsupported channel count: {channels}")]
    UnsupportedChannels {
        /// Channel count encountered
        channels: u8,
    },

    /// Generic error with custom message.
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Creates an [`Error::OutOfBounds`] error.
    #[inline]
    pub fn out_of_bounds(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self::OutOfBounds { x, y, width, height }
    }

    /// Creates an [`Error::InvalidRegion`] error.
    #[inline]
    pub fn invalid_region(y1: u32, y2: u32, x1: u32, x2: u32, width: u32, height: u32) -> Self {
        Self::InvalidRegion { y1, y2, x1, x2, width, height }
    }

    /// Creates an [`Error::LengthMismatch`] error.
    #[inline]
    pub fn length_mismatch(got: usize, expected: usize, width: u32, height: u32, channels: u8) -> Self {
        Self::LengthMismatch { got, expected, width, height, channels }
    }

    /// Creates an [`Error::InvalidDimensions`] error.
    #[inline]
    pub fn invalid_dimensions(width: u32, height: u32, reason: impl Into<String>) -> Self {
        Self::InvalidDimensions { width, height, reason: reason.into() }
    }

    /// Creates an [`Error::UnsupportedChannels`] error.
    #[inline]
    pub fn unsupported_channels(channels: u8) -> Self {
        Self::UnsupportedChannels { channels }
    }

    /// Creates an [`Error::Other`] error.
    #[inline]
    pub fn other(msg: impl Into<String>) -> Self {
        Self::Other(msg.into())
    }

    /// Returns `true` if this is a bounds/region error.
    #[inline]
    pub fn is_bounds_error(&self) -> bool {
        matches!(self, Self::OutOfBounds { .. } | Self::InvalidRegion { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn out_of_bounds_message() {
        let err = Error::out_of_bounds(100, 50, 80, 60);
        let msg = err.to_string();
        assert!(msg.contains("100"));
        assert!(err.is_bounds_error());
    }

    #[test]
    fn length_mismatch_message() {
        let err = Error::length_mismatch(10, 12, 2, 2, 3);
        assert!(err.to_string().contains("10"));
        assert!(!err.is_bounds_error());
    }
}
