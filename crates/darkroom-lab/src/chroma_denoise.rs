//! Chroma noise smoothing on the Lab `a`/`b` channels (`spec.md` §4.5 step 3).
//!
//! A bilateral filter tamps down color speckle while respecting luminance
//! edges, then a wider Gaussian pass smooths what's left in the shadows,
//! where scanner chroma noise is worst and edges matter least.

use darkroom_ops::filter::{convolve, Kernel};

/// Rounds up to the nearest odd number, minimum 1 (kernel sizes must be odd).
fn odd(n: usize) -> usize {
    if n == 0 {
        1
    } else if n % 2 == 0 {
        n + 1
    } else {
        n
    }
}

fn bilateral(
    chan: &[f32],
    l: &[f32],
    w: usize,
    h: usize,
    diameter: usize,
    sigma_color: f32,
    sigma_space: f32,
) -> Vec<f32> {
    let radius = (diameter / 2).max(1) as isize;
    let two_sigma_color2 = 2.0 * sigma_color * sigma_color;
    let two_sigma_space2 = 2.0 * sigma_space * sigma_space;

    let mut out = vec![0f32; w * h];
    for y in 0..h {
        for x in 0..w {
            let center = l[y * w + x];
            let mut acc = 0f32;
            let mut weight_sum = 0f32;
            for dy in -radius..=radius {
                let sy = (y as isize + dy).clamp(0, h as isize - 1) as usize;
                for dx in -radius..=radius {
                    let sx = (x as isize + dx).clamp(0, w as isize - 1) as usize;
                    let sample_l = l[sy * w + sx];
                    let space2 = (dx * dx + dy * dy) as f32;
                    let color_diff = sample_l - center;
                    let weight = (-space2 / two_sigma_space2.max(1e-6)
                        - (color_diff * color_diff) / two_sigma_color2.max(1e-6))
                    .exp();
                    acc += chan[sy * w + sx] * weight;
                    weight_sum += weight;
                }
            }
            out[y * w + x] = if weight_sum > 1e-6 { acc / weight_sum } else { chan[y * w + x] };
        }
    }
    out
}

fn gaussian_blur(chan: &[f32], w: usize, h: usize, size: usize) -> Vec<f32> {
    let size = odd(size.max(1));
    let sigma = size as f32 / 6.0;
    let kernel = Kernel::gaussian(size, sigma.max(0.5));
    convolve(chan, w, h, 1, &kernel).expect("matching buffer dimensions")
}

/// Applies the Lab Kernel's chroma denoise step to the `a`/`b` planes,
/// shadow-weighting the result so highlights keep full chroma detail.
pub fn denoise_chroma(
    l: &[f32],
    a: &[f32],
    b: &[f32],
    w: usize,
    h: usize,
    strength: f32,
    scale_factor: f32,
) -> (Vec<f32>, Vec<f32>) {
    if strength <= 0.0 {
        return (a.to_vec(), b.to_vec());
    }

    let diameter = odd(((9.0 * scale_factor).round() as usize).max(1));
    let sigma_color = 2.0 * strength * 100.0;
    let sigma_space = 0.75 * strength * 100.0 * scale_factor;

    let a_bilateral = bilateral(a, l, w, h, diameter, sigma_color, sigma_space);
    let b_bilateral = bilateral(b, l, w, h, diameter, sigma_color, sigma_space);

    let blur_size = if strength <= 0.5 { 7 } else { ((11.0 * scale_factor).round() as usize).max(1) };
    let a_smoothed = gaussian_blur(&a_bilateral, w, h, blur_size);
    let b_smoothed = gaussian_blur(&b_bilateral, w, h, blur_size);

    let deep_shadow: Vec<f32> = l.iter().map(|&lv| {
        let m = (1.0 - lv / 60.0).clamp(0.0, 1.0);
        m * m
    }).collect();

    let broad_shadow_raw: Vec<f32> = l.iter().map(|&lv| (1.0 - (lv - 150.0) / 80.0).clamp(0.0, 1.0)).collect();
    let broad_shadow = gaussian_blur(&broad_shadow_raw, w, h, odd((21.0 * scale_factor).round().max(1.0) as usize));

    let mut out_a = vec![0f32; w * h];
    let mut out_b = vec![0f32; w * h];
    for i in 0..w * h {
        let shadow_mix = (deep_shadow[i] + broad_shadow[i] * (1.0 - deep_shadow[i])).clamp(0.0, 1.0);
        let mix = shadow_mix * strength;
        out_a[i] = a[i] * (1.0 - mix) + a_smoothed[i] * mix;
        out_b[i] = b[i] * (1.0 - mix) + b_smoothed[i] * mix;
    }
    (out_a, out_b)
}
