//! Output sharpening on the Lab `L` channel (`spec.md` §4.5 step 4).
//!
//! A threshold-gated unsharp mask matching PIL's `ImageFilter.UnsharpMask`
//! semantics: blur at a fixed radius, only apply the sharpened delta where
//! it exceeds a small threshold (so flat noise isn't amplified).

use darkroom_ops::filter::{convolve, Kernel};

const RADIUS: f32 = 1.0;
const THRESHOLD: f32 = 5.0;

/// Unsharp-masks a single-channel `L` buffer (`[0, 100]`). `sharpen` is the
/// Lab Kernel's `[0, 1]` slider; PIL's integer `percent` is `sharpen * 250`.
pub fn sharpen_l_channel(l: &[f32], w: usize, h: usize, sharpen: f32) -> Vec<f32> {
    if sharpen <= 0.0 {
        return l.to_vec();
    }
    let percent = (sharpen * 250.0).round().max(0.0);
    if percent <= 0.0 {
        return l.to_vec();
    }

    let size = (RADIUS * 3.0).round().max(1.0) as usize * 2 + 1;
    let kernel = Kernel::gaussian(size, RADIUS);
    let blurred = convolve(l, w, h, 1, &kernel).expect("matching buffer dimensions");

    let amount = percent / 100.0;
    let mut out = vec![0f32; w * h];
    for i in 0..w * h {
        let diff = l[i] - blurred[i];
        if diff.abs() >= THRESHOLD {
            out[i] = (l[i] + diff * amount).clamp(0.0, 100.0);
        } else {
            out[i] = l[i];
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_sharpen_is_a_no_op() {
        let l = vec![50.0f32; 16];
        let out = sharpen_l_channel(&l, 4, 4, 0.0);
        assert_eq!(out, l);
    }

    #[test]
    fn flat_field_below_threshold_is_untouched() {
        let l = vec![50.0f32; 64];
        let out = sharpen_l_channel(&l, 8, 8, 1.0);
        for v in out {
            assert!((v - 50.0).abs() < 1e-4);
        }
    }

    #[test]
    fn sharpens_a_hard_edge_above_threshold() {
        let w = 8;
        let h = 8;
        let mut l = vec![20.0f32; w * h];
        for y in 0..h {
            for x in 4..w {
                l[y * w + x] = 80.0;
            }
        }
        let out = sharpen_l_channel(&l, w, h, 1.0);
        let before_step = l[w * 4 + 3];
        let after_step = out[w * 4 + 3];
        assert!(after_step <= before_step, "dark side of the edge should darken or hold, not lighten");
        for v in &out {
            assert!((0.0..=100.0).contains(v));
        }
    }
}
