//! Chemical toning (selenium, sepia) and the chromaticity-preserving black
//! point that follows it in B&W mode (`spec.md` §4.6, and supplement:
//! `apply_chromaticity_preserving_black_point`).

use darkroom_core::{luma3, FloatImage};

const SELENIUM_TINT: [f32; 3] = [0.85, 0.75, 0.85];
const SEPIA_TINT: [f32; 3] = [1.0, 0.9, 0.75];
const SEPIA_BLEACH_LIFT: f32 = 1.1;
const SEPIA_BELL_CENTER: f32 = 0.6;
const SEPIA_BELL_SIGMA: f32 = 0.2;

/// Blends toner color into `img`, shadow-weighted by selenium (silver
/// selenide deepens density in the blacks) and mid-weighted by sepia
/// (silver sulfide bleaches and warms the mid-tones and highlights).
#[tracing::instrument(skip(img))]
pub fn apply_chemical_toning(img: &FloatImage, selenium_strength: f32, sepia_strength: f32) -> FloatImage {
    if selenium_strength <= 0.0 && sepia_strength <= 0.0 {
        return img.clone();
    }
    debug_assert_eq!(img.channels(), 3);

    let data: Vec<f32> = img
        .data()
        .chunks_exact(3)
        .flat_map(|px| {
            let l = luma3([px[0], px[1], px[2]]);
            let mut out = [px[0], px[1], px[2]];

            if selenium_strength > 0.0 {
                let m_s = (1.0 - l).clamp(0.0, 1.0);
                let m_s = m_s * m_s;
                let mix = (selenium_strength * m_s).clamp(0.0, 1.0);
                for c in 0..3 {
                    let toned = out[c] * SELENIUM_TINT[c];
                    out[c] = out[c] * (1.0 - mix) + toned * mix;
                }
            }

            if sepia_strength > 0.0 {
                let d = l - SEPIA_BELL_CENTER;
                let m_p = (-(d * d) / (2.0 * SEPIA_BELL_SIGMA * SEPIA_BELL_SIGMA)).exp();
                let mix = (sepia_strength * m_p).clamp(0.0, 1.0);
                for c in 0..3 {
                    let toned = out[c] * SEPIA_TINT[c] * SEPIA_BLEACH_LIFT;
                    out[c] = out[c] * (1.0 - mix) + toned * mix;
                }
            }

            out.iter().map(|v| v.clamp(0.0, 1.0)).collect::<Vec<_>>()
        })
        .collect();

    FloatImage::from_data(img.height(), img.width(), 3, data).expect("same shape as input")
}

/// Neutralizes the overall black level of the print: shifts and rescales
/// by the luma percentile so a small fraction of pixels sit at true black,
/// without touching hue (every channel is shifted and scaled identically).
#[tracing::instrument(skip(img))]
pub fn apply_chromaticity_preserving_black_point(img: &FloatImage, percentile: f32) -> FloatImage {
    debug_assert_eq!(img.channels(), 3);
    let lumas: Vec<f32> = img.data().chunks_exact(3).map(|px| luma3([px[0], px[1], px[2]])).collect();
    let bp = percentile_of(&lumas, percentile);

    let scale = 1.0 / (1.0 - bp + 1e-6);
    let data: Vec<f32> = img.data().iter().map(|&v| ((v - bp) * scale).clamp(0.0, 1.0)).collect();

    FloatImage::from_data(img.height(), img.width(), 3, data).expect("same shape as input")
}

fn percentile_of(values: &[f32], percentile: f32) -> f32 {
    if values.is_empty() {
        return 0.0;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let rank = (percentile / 100.0 * (sorted.len() - 1) as f32).clamp(0.0, (sorted.len() - 1) as f32);
    let lo = rank.floor() as usize;
    let hi = rank.ceil() as usize;
    if lo == hi {
        sorted[lo]
    } else {
        let frac = rank - lo as f32;
        sorted[lo] * (1.0 - frac) + sorted[hi] * frac
    }
}
