//! `FloatImage`: the float32 RGB/mono buffer that flows through every stage.
//!
//! # Design
//!
//! Unlike a generic VFX pipeline that tracks color space and pixel format at
//! the type level, the darkroom pipeline only ever carries one concrete
//! representation end to end: row-major `f32` triples (or, for B&W/greyscale
//! intermediates, single-channel) in nominal `[0.0, 1.0]`. `FloatImage` keeps
//! the teacher's `Arc`+copy-on-write storage pattern (cheap clone for the
//! stage cache, `Arc::make_mut` for in-place mutation) without the generic
//! `Image<ColorSpace, PixelFormat, N>` machinery a multi-format VFX pipeline
//! needs and this one does not.
//!
//! # Memory layout
//!
//! Row-major, channels interleaved: `[c0 c1 c2 c0 c1 c2 ...]` for row 0, then
//! row 1, etc.

use std::sync::Arc;

use crate::error::{Error, Result};
use crate::roi::Roi;

/// Rec.709 luma coefficients (`spec.md` §4.1).
pub const LUMA_R: f32 = 0.2126;
/// Rec.709 green coefficient.
pub const LUMA_G: f32 = 0.7152;
/// Rec.709 blue coefficient.
pub const LUMA_B: f32 = 0.0722;

/// A float32 image buffer, 1 or 3 channels, shared via `Arc` with
/// copy-on-write mutation.
#[derive(Debug, Clone)]
pub struct FloatImage {
    data: Arc<Vec<f32>>,
    width: u32,
    height: u32,
    channels: u8,
}

impl FloatImage {
    /// Allocates a new image filled with `0.0`.
    pub fn new(height: u32, width: u32, channels: u8) -> Result<Self> {
        if height == 0 || width == 0 {
            return Err(Error::invalid_dimensions(width, height, "height and width must be > 0"));
        }
        if channels != 1 && channels != 3 {
            return Err(Error::unsupported_channels(channels));
        }
        let len = height as usize * width as usize * channels as usize;
        Ok(Self { data: Arc::new(vec![0.0; len]), width, height, channels })
    }

    /// Wraps an existing buffer, validating its length against the declared
    /// shape.
    pub fn from_data(height: u32, width: u32, channels: u8, data: Vec<f32>) -> Result<Self> {
        if channels != 1 && channels != 3 {
            return Err(Error::unsupported_channels(channels));
        }
        let expected = height as usize * width as usize * channels as usize;
        if data.len() != expected {
            return Err(Error::length_mismatch(data.len(), expected, width, height, channels));
        }
        Ok(Self { data: Arc::new(data), width, height, channels })
    }

    /// Image width in pixels.
    #[inline]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Image height in pixels.
    #[inline]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Channel count: 1 (mono) or 3 (RGB).
    #[inline]
    pub const fn channels(&self) -> u8 {
        self.channels
    }

    /// Row stride in elements (`width * channels`).
    #[inline]
    pub const fn stride(&self) -> usize {
        self.width as usize * self.channels as usize
    }

    /// Read-only access to the backing buffer.
    #[inline]
    pub fn data(&self) -> &[f32] {
        &self.data
    }

    /// Mutable access to the backing buffer, cloning first if this
    /// `FloatImage` shares storage with another clone (copy-on-write).
    #[inline]
    pub fn data_mut(&mut self) -> &mut [f32] {
        Arc::make_mut(&mut self.data)
    }

    /// Reads the pixel at `(x, y)` as a fixed-size array sized to
    /// `channels()`. Panics if out of bounds — callers in hot loops should
    /// pre-validate.
    pub fn pixel3(&self, x: u32, y: u32) -> [f32; 3] {
        debug_assert_eq!(self.channels, 3);
        let i = (y as usize * self.stride()) + (x as usize * 3);
        [self.data[i], self.data[i + 1], self.data[i + 2]]
    }

    /// Writes an RGB pixel at `(x, y)`.
    pub fn set_pixel3(&mut self, x: u32, y: u32, px: [f32; 3]) {
        debug_assert_eq!(self.channels, 3);
        let stride = self.stride();
        let i = (y as usize * stride) + (x as usize * 3);
        let data = self.data_mut();
        data[i] = px[0];
        data[i + 1] = px[1];
        data[i + 2] = px[2];
    }

    /// Reads a single-channel pixel at `(x, y)`.
    pub fn pixel1(&self, x: u32, y: u32) -> f32 {
        debug_assert_eq!(self.channels, 1);
        self.data[(y as usize * self.stride()) + x as usize]
    }

    /// Crops to `roi`, returning a new owned buffer.
    pub fn crop(&self, roi: Roi) -> Result<Self> {
        if roi.y2 > self.height || roi.x2 > self.width || !roi.is_valid() {
            return Err(Error::invalid_region(roi.y1, roi.y2, roi.x1, roi.x2, self.width, self.height));
        }
        let ch = self.channels as usize;
        let out_w = roi.width();
        let out_h = roi.height();
        let mut out = vec![0.0f32; out_w as usize * out_h as usize * ch];
        let src_stride = self.stride();
        let out_stride = out_w as usize * ch;
        for row in 0..out_h as usize {
            let src_row = roi.y1 as usize + row;
            let src_start = src_row * src_stride + roi.x1 as usize * ch;
            let dst_start = row * out_stride;
            out[dst_start..dst_start + out_stride]
                .copy_from_slice(&self.data[src_start..src_start + out_stride]);
        }
        Self::from_data(out_h, out_w, self.channels, out)
    }

    /// Applies `f` to every element in place (copy-on-write).
    pub fn map_inplace(&mut self, f: impl Fn(f32) -> f32) {
        for v in self.data_mut() {
            *v = f(*v);
        }
    }
}

/// `ensure_rgb`: makes a buffer 3-channel. 1-channel buffers are replicated
/// across R, G, B; 3-channel buffers pass through unchanged.
///
/// Idempotent: `ensure_rgb(ensure_rgb(x)) == ensure_rgb(x)`.
pub fn ensure_rgb(img: &FloatImage) -> FloatImage {
    match img.channels {
        3 => img.clone(),
        1 => {
            let mut out = Vec::with_capacity(img.data.len() * 3);
            for &v in img.data.iter() {
                out.push(v);
                out.push(v);
                out.push(v);
            }
            FloatImage::from_data(img.height, img.width, 3, out).expect("replication preserves length")
        }
        _ => unreachable!("FloatImage only ever holds 1 or 3 channels"),
    }
}

/// Collapses a 3-channel buffer to its Rec.709 luma, replicated back across
/// three channels (the B&W "collapse then replicate" behavior the
/// Photometric stage performs, per `spec.md` §4.3.4 and §9).
pub fn collapse_to_luma_rgb(img: &FloatImage) -> FloatImage {
    debug_assert_eq!(img.channels, 3);
    let mut out = vec![0.0f32; img.data.len()];
    for (px, o) in img.data.chunks_exact(3).zip(out.chunks_exact_mut(3)) {
        let l = LUMA_R * px[0] + LUMA_G * px[1] + LUMA_B * px[2];
        o[0] = l;
        o[1] = l;
        o[2] = l;
    }
    FloatImage::from_data(img.height, img.width, 3, out).expect("same shape as input")
}

/// `uint16_to_float32`: `buf / 65535`.
pub fn uint16_to_float32(data: &[u16]) -> Vec<f32> {
    data.iter().map(|&v| v as f32 / 65535.0).collect()
}

/// `float_to_uint8`: `clip(nan_to_num(buf) * 255, 0, 255)`, rounded toward
/// zero (truncating), matching the Python reference's `.astype(np.uint8)`
/// truncation semantics. NaN is replaced with 0 before clamping, per
/// `spec.md` §4.1 ("nonfinite inputs are replaced with 0; never panic").
pub fn float_to_uint8(data: &[f32]) -> Vec<u8> {
    data.iter()
        .map(|&v| {
            let v = if v.is_finite() { v } else { 0.0 };
            (v * 255.0).clamp(0.0, 255.0) as u8
        })
        .collect()
}

/// Rec.709 luma of a single RGB triple.
#[inline]
pub fn luma3(px: [f32; 3]) -> f32 {
    LUMA_R * px[0] + LUMA_G * px[1] + LUMA_B * px[2]
}

/// Per-pixel Rec.709 luma of an RGB `FloatImage`, as a 1-channel image.
pub fn luma(img: &FloatImage) -> FloatImage {
    debug_assert_eq!(img.channels, 3);
    let out: Vec<f32> = img
        .data
        .chunks_exact(3)
        .map(|px| LUMA_R * px[0] + LUMA_G * px[1] + LUMA_B * px[2])
        .collect();
    FloatImage::from_data(img.height, img.width, 1, out).expect("one value per pixel")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_image_is_zeroed() {
        let img = FloatImage::new(4, 4, 3).unwrap();
        assert!(img.data().iter().all(|&v| v == 0.0));
    }

    #[test]
    fn ensure_rgb_is_idempotent() {
        let mono = FloatImage::from_data(2, 2, 1, vec![0.1, 0.2, 0.3, 0.4]).unwrap();
        let once = ensure_rgb(&mono);
        let twice = ensure_rgb(&once);
        assert_eq!(once.data(), twice.data());
        assert_eq!(once.channels(), 3);
    }

    #[test]
    fn ensure_rgb_replicates_channel() {
        let mono = FloatImage::from_data(1, 1, 1, vec![0.5]).unwrap();
        let rgb = ensure_rgb(&mono);
        assert_eq!(rgb.pixel3(0, 0), [0.5, 0.5, 0.5]);
    }

    #[test]
    fn float_to_uint8_clamps_and_handles_nan() {
        let data = [f32::NAN, -1.0, 0.5, 2.0];
        let out = float_to_uint8(&data);
        assert_eq!(out[0], 0);
        assert_eq!(out[1], 0);
        assert_eq!(out[3], 255);
    }

    #[test]
    fn crop_extracts_expected_region() {
        // 3x3 mono image: values 0..9 row-major.
        let data: Vec<f32> = (0..9).map(|v| v as f32).collect();
        let img = FloatImage::from_data(3, 3, 1, data).unwrap();
        let roi = Roi::new(1, 3, 1, 3, 3, 3).unwrap();
        let cropped = img.crop(roi).unwrap();
        assert_eq!(cropped.width(), 2);
        assert_eq!(cropped.height(), 2);
        assert_eq!(cropped.data(), &[4.0, 5.0, 7.0, 8.0]);
    }

    #[test]
    fn cow_clone_does_not_alias() {
        let mut a = FloatImage::new(2, 2, 1).unwrap();
        let b = a.clone();
        a.data_mut()[0] = 1.0;
        assert_eq!(b.data()[0], 0.0);
    }
}
