//! Shared mask/blur primitives used by dust removal, healing, and local
//! adjustments.

use darkroom_ops::filter::{box_blur, convolve, Kernel};

/// Clamps `v` to an odd number `>= 1`.
pub fn odd(v: i64) -> usize {
    let v = v.max(1);
    if v % 2 == 0 { (v + 1) as usize } else { v as usize }
}

/// Gaussian-blurs a single-channel mask buffer in place semantics (returns a
/// new buffer), kernel size `odd(size)`.
pub fn gaussian_blur_mono(data: &[f32], w: usize, h: usize, size: usize) -> Vec<f32> {
    let size = odd(size as i64);
    if size < 3 {
        return data.to_vec();
    }
    let sigma = size as f32 / 3.0;
    let kernel = Kernel::gaussian(size, sigma);
    convolve(data, w, h, 1, &kernel).expect("mono buffer matches declared shape")
}

/// Per-pixel windowed mean of a single-channel buffer, window `odd(size)`.
pub fn box_mean(data: &[f32], w: usize, h: usize, size: usize) -> Vec<f32> {
    let radius = odd(size as i64) / 2;
    box_blur(data, w, h, 1, radius).expect("mono buffer matches declared shape")
}

/// Per-pixel windowed standard deviation of a single-channel buffer.
pub fn box_std(data: &[f32], w: usize, h: usize, size: usize) -> Vec<f32> {
    let mean = box_mean(data, w, h, size);
    let sq: Vec<f32> = data.iter().map(|&v| v * v).collect();
    let mean_sq = box_mean(&sq, w, h, size);
    mean.iter()
        .zip(mean_sq.iter())
        .map(|(&m, &m2)| (m2 - m * m).max(0.0).sqrt())
        .collect()
}

/// Windowed median of an interleaved `channels`-wide buffer, computed
/// independently per channel, window `odd(size)`.
pub fn median_blur(data: &[f32], w: usize, h: usize, channels: usize, size: usize) -> Vec<f32> {
    let size = odd(size as i64);
    let r = (size / 2) as isize;
    let mut out = vec![0.0f32; data.len()];
    let mut window = Vec::with_capacity(size * size);

    for y in 0..h as isize {
        for x in 0..w as isize {
            for c in 0..channels {
                window.clear();
                for wy in -r..=r {
                    let sy = (y + wy).clamp(0, h as isize - 1) as usize;
                    for wx in -r..=r {
                        let sx = (x + wx).clamp(0, w as isize - 1) as usize;
                        window.push(data[(sy * w + sx) * channels + c]);
                    }
                }
                window.sort_unstable_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
                let out_idx = (y as usize * w + x as usize) * channels + c;
                out[out_idx] = window[window.len() / 2];
            }
        }
    }
    out
}

/// Paints a filled disc of `radius` pixels centered at `(cx, cy)` into a
/// single-channel mask, setting covered pixels to `1.0`.
pub fn paint_disc(mask: &mut [f32], w: usize, h: usize, cx: f32, cy: f32, radius: f32) {
    let r = radius.max(1.0);
    let x0 = ((cx - r).floor().max(0.0)) as usize;
    let x1 = ((cx + r).ceil().min(w as f32 - 1.0)) as usize;
    let y0 = ((cy - r).floor().max(0.0)) as usize;
    let y1 = ((cy + r).ceil().min(h as f32 - 1.0)) as usize;

    for y in y0..=y1.min(h.saturating_sub(1)) {
        for x in x0..=x1.min(w.saturating_sub(1)) {
            let dx = x as f32 + 0.5 - cx;
            let dy = y as f32 + 0.5 - cy;
            if dx * dx + dy * dy <= r * r {
                mask[y * w + x] = 1.0;
            }
        }
    }
}

/// Paints a thick line segment from `(x0, y0)` to `(x1, y1)` by stamping
/// discs of `radius` along its length, matching the
/// stamped-stroke-plus-joint-disc look of a brush path.
pub fn paint_thick_line(mask: &mut [f32], w: usize, h: usize, x0: f32, y0: f32, x1: f32, y1: f32, radius: f32) {
    let dx = x1 - x0;
    let dy = y1 - y0;
    let len = (dx * dx + dy * dy).sqrt();
    let steps = (len / radius.max(1.0)).ceil().max(1.0) as usize;
    for i in 0..=steps {
        let t = i as f32 / steps as f32;
        paint_disc(mask, w, h, x0 + dx * t, y0 + dy * t, radius);
    }
}

/// Binary dilation with a disc structuring element of `radius` pixels.
pub fn dilate_disc(mask: &[f32], w: usize, h: usize, radius: usize) -> Vec<f32> {
    if radius == 0 {
        return mask.to_vec();
    }
    let r = radius as isize;
    let mut out = vec![0.0f32; mask.len()];
    for y in 0..h as isize {
        for x in 0..w as isize {
            let mut hit = false;
            'search: for wy in -r..=r {
                let sy = y + wy;
                if sy < 0 || sy >= h as isize {
                    continue;
                }
                for wx in -r..=r {
                    if wx * wx + wy * wy > r * r {
                        continue;
                    }
                    let sx = x + wx;
                    if sx < 0 || sx >= w as isize {
                        continue;
                    }
                    if mask[sy as usize * w + sx as usize] > 0.0 {
                        hit = true;
                        break 'search;
                    }
                }
            }
            out[y as usize * w + x as usize] = if hit { 1.0 } else { 0.0 };
        }
    }
    out
}

/// Binary erosion with a disc structuring element of `radius` pixels.
pub fn erode_disc(mask: &[f32], w: usize, h: usize, radius: usize) -> Vec<f32> {
    if radius == 0 {
        return mask.to_vec();
    }
    let r = radius as isize;
    let mut out = vec![1.0f32; mask.len()];
    for y in 0..h as isize {
        for x in 0..w as isize {
            let mut all_set = true;
            'search: for wy in -r..=r {
                let sy = y + wy;
                for wx in -r..=r {
                    if wx * wx + wy * wy > r * r {
                        continue;
                    }
                    let sx = x + wx;
                    let covered = sy >= 0 && sy < h as isize && sx >= 0 && sx < w as isize
                        && mask[sy as usize * w + sx as usize] > 0.0;
                    if !covered {
                        all_set = false;
                        break 'search;
                    }
                }
            }
            out[y as usize * w + x as usize] = if all_set { 1.0 } else { 0.0 };
        }
    }
    out
}

/// Morphological close (dilate then erode) with a disc of `radius` pixels.
pub fn close_disc(mask: &[f32], w: usize, h: usize, radius: usize) -> Vec<f32> {
    erode_disc(&dilate_disc(mask, w, h, radius), w, h, radius)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn odd_rounds_up_even_values() {
        assert_eq!(odd(4), 5);
        assert_eq!(odd(5), 5);
        assert_eq!(odd(0), 1);
    }

    #[test]
    fn paint_disc_covers_center() {
        let mut mask = vec![0.0f32; 10 * 10];
        paint_disc(&mut mask, 10, 10, 5.0, 5.0, 2.0);
        assert_eq!(mask[5 * 10 + 5], 1.0);
        assert_eq!(mask[0], 0.0);
    }

    #[test]
    fn dilate_grows_a_single_pixel() {
        let mut mask = vec![0.0f32; 9 * 9];
        mask[4 * 9 + 4] = 1.0;
        let grown = dilate_disc(&mask, 9, 9, 1);
        assert!(grown[4 * 9 + 5] > 0.0);
        assert!(grown[4 * 9 + 4] > 0.0);
    }

    #[test]
    fn median_blur_removes_salt_and_pepper_outlier() {
        let mut data = vec![0.5f32; 9 * 9];
        data[4 * 9 + 4] = 1.0;
        let out = median_blur(&data, 9, 9, 1, 3);
        assert!((out[4 * 9 + 4] - 0.5).abs() < 1e-4);
    }

    #[test]
    fn box_std_is_zero_on_flat_input() {
        let data = vec![0.3f32; 9 * 9];
        let std = box_std(&data, 9, 9, 3);
        assert!(std.iter().all(|&v| v.abs() < 1e-5));
    }
}
