//! Generic coordinate-warp driver.
//!
//! A warp is defined by a coordinate generator `(x, y, w, h) -> (src_x, src_y)`
//! in destination-pixel space; `apply_warp` drives it over the whole image and
//! resamples with `sample_bilinear`. Domain-specific warps (fine rotation,
//! lens/perspective correction) live in the crates that need them and build
//! their coordinate function on top of this.
//!
//! When the `parallel` feature is enabled, uses rayon for multi-threaded processing.

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Bilinear sample from source image. Returns black (all zero) outside
/// `[0, w-1) x [0, h-1)`, matching constant-black boundary handling.
pub fn sample_bilinear(src: &[f32], w: usize, h: usize, ch: usize, x: f32, y: f32) -> Vec<f32> {
    if x < 0.0 || y < 0.0 || x >= (w - 1) as f32 || y >= (h - 1) as f32 {
        if w == 0 || h == 0 || x < -1.0 || y < -1.0 || x > w as f32 || y > h as f32 {
            return vec![0.0; ch];
        }
    }

    let x0 = x.floor().max(0.0) as usize;
    let y0 = y.floor().max(0.0) as usize;
    let x1 = (x0 + 1).min(w - 1);
    let y1 = (y0 + 1).min(h - 1);
    let fx = x - x0 as f32;
    let fy = y - y0 as f32;

    let mut result = vec![0.0f32; ch];
    for c in 0..ch {
        let p00 = src[(y0 * w + x0) * ch + c];
        let p10 = src[(y0 * w + x1) * ch + c];
        let p01 = src[(y1 * w + x0) * ch + c];
        let p11 = src[(y1 * w + x1) * ch + c];

        let top = p00 * (1.0 - fx) + p10 * fx;
        let bot = p01 * (1.0 - fx) + p11 * fx;
        result[c] = top * (1.0 - fy) + bot * fy;
    }

    result
}

/// Apply a generic warp using a coordinate generator function.
///
/// Uses rayon for parallel processing when the `parallel` feature is enabled.
#[cfg(feature = "parallel")]
pub fn apply_warp<F>(src: &[f32], w: usize, h: usize, ch: usize, coord_fn: F) -> Vec<f32>
where
    F: Fn(usize, usize, usize, usize) -> (f32, f32) + Sync, // (x, y, w, h) -> (src_x, src_y)
{
    let mut dst = vec![0.0; w * h * ch];

    dst.par_chunks_mut(w * ch)
        .enumerate()
        .for_each(|(y, row)| {
            for x in 0..w {
                let (sx, sy) = coord_fn(x, y, w, h);
                let sample = sample_bilinear(src, w, h, ch, sx, sy);
                let idx = x * ch;
                row[idx..idx + ch].copy_from_slice(&sample);
            }
        });

    dst
}

/// Apply a generic warp using a coordinate generator function (single-threaded fallback).
#[cfg(not(feature = "parallel"))]
pub fn apply_warp<F>(src: &[f32], w: usize, h: usize, ch: usize, coord_fn: F) -> Vec<f32>
where
    F: Fn(usize, usize, usize, usize) -> (f32, f32), // (x, y, w, h) -> (src_x, src_y)
{
    let mut dst = vec![0.0; w * h * ch];

    for y in 0..h {
        for x in 0..w {
            let (sx, sy) = coord_fn(x, y, w, h);
            let sample = sample_bilinear(src, w, h, ch, sx, sy);
            let idx = (y * w + x) * ch;
            dst[idx..idx + ch].copy_from_slice(&sample);
        }
    }

    dst
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_test_image(w: usize, h: usize, ch: usize) -> Vec<f32> {
        vec![0.5f32; w * h * ch]
    }

    #[test]
    fn identity_warp_is_noop() {
        let src = make_test_image(8, 8, 3);
        let dst = apply_warp(&src, 8, 8, 3, |x, y, _w, _h| (x as f32, y as f32));
        assert_eq!(dst, src);
    }

    #[test]
    fn out_of_bounds_coordinate_samples_black() {
        let src = make_test_image(8, 8, 1);
        let px = sample_bilinear(&src, 8, 8, 1, -5.0, -5.0);
        assert_eq!(px, vec![0.0]);
    }

    #[test]
    fn bilinear_interpolates_between_neighbors() {
        let mut src = vec![0.0f32; 4];
        src[0] = 0.0;
        src[1] = 1.0;
        src[2] = 0.0;
        src[3] = 1.0;
        let px = sample_bilinear(&src, 2, 2, 1, 0.5, 0.0);
        assert!((px[0] - 0.5).abs() < 1e-6);
    }

    #[test]
    fn warp_output_matches_source_len() {
        let src = make_test_image(16, 12, 3);
        let dst = apply_warp(&src, 16, 12, 3, |x, y, _w, _h| (x as f32, y as f32));
        assert_eq!(dst.len(), src.len());
    }
}
