//! Manual healing (`spec.md` §4.4.2): user-painted dust spots are inpainted
//! and re-grained so the repair doesn't read as a flat patch.

use darkroom_core::FloatImage;
use darkroom_geometry::{map_forward, GeometryState};

use crate::config::RetouchConfig;
use crate::primitives::{gaussian_blur_mono, paint_disc};

/// Deterministic hash-based value noise, avoiding a dependency on `rand`.
/// Mirrors the integer-hash-then-smoothstep construction used elsewhere in
/// the pack's procedural generators.
mod noise {
    fn hash(x: i32, y: i32) -> u32 {
        let mut h = (x as u32).wrapping_mul(374761393) ^ (y as u32).wrapping_mul(668265263);
        h = (h ^ (h >> 13)).wrapping_mul(1274126177);
        h ^ (h >> 16)
    }

    fn hash_f(x: i32, y: i32) -> f32 {
        (hash(x, y) & 0x00ff_ffff) as f32 / 0x0100_0000 as f32
    }

    fn smoothstep(t: f32) -> f32 {
        t * t * (3.0 - 2.0 * t)
    }

    fn lerp(a: f32, b: f32, t: f32) -> f32 {
        a + (b - a) * t
    }

    /// Value noise in `[0, 1]` sampled at a continuous `(x, y)`.
    pub fn value_noise(x: f32, y: f32) -> f32 {
        let x0 = x.floor() as i32;
        let y0 = y.floor() as i32;
        let tx = smoothstep(x - x0 as f32);
        let ty = smoothstep(y - y0 as f32);

        let v00 = hash_f(x0, y0);
        let v10 = hash_f(x0 + 1, y0);
        let v01 = hash_f(x0, y0 + 1);
        let v11 = hash_f(x0 + 1, y0 + 1);

        lerp(lerp(v00, v10, tx), lerp(v01, v11, tx), ty)
    }
}

/// Diffusion-based inpainting: iteratively averages each masked pixel with
/// its unmasked-weighted neighborhood, propagating from the mask boundary
/// inward. A simplified stand-in for Telea marching, chosen because the
/// pack carries no inpainting primitive to adapt; good enough for the small,
/// roughly disc-shaped regions a healing brush produces.
fn diffuse_inpaint(data: &mut [f32], w: usize, h: usize, channels: usize, mask: &[f32], iterations: usize) {
    let mut known = vec![0.0f32; w * h];
    for i in 0..w * h {
        known[i] = 1.0 - mask[i];
    }

    for _ in 0..iterations {
        let snapshot = data.to_vec();
        let known_snapshot = known.clone();
        for y in 0..h {
            for x in 0..w {
                let i = y * w + x;
                if mask[i] <= 0.0 {
                    continue;
                }
                let mut weight_sum = 0.0f32;
                let mut acc = [0.0f32; 4];
                for (dy, dx) in [(-1i32, 0i32), (1, 0), (0, -1), (0, 1)] {
                    let ny = y as i32 + dy;
                    let nx = x as i32 + dx;
                    if ny < 0 || ny >= h as i32 || nx < 0 || nx >= w as i32 {
                        continue;
                    }
                    let ni = ny as usize * w + nx as usize;
                    let weight = 0.25 + known_snapshot[ni];
                    weight_sum += weight;
                    for c in 0..channels {
                        acc[c] += snapshot[ni * channels + c] * weight;
                    }
                }
                if weight_sum > 0.0 {
                    for c in 0..channels {
                        data[i * channels + c] = acc[c] / weight_sum;
                    }
                    known[i] = (known_snapshot[i] + 0.1).min(1.0);
                }
            }
        }
    }
}

fn luma(px: &[f32]) -> f32 {
    0.2126 * px[0] + 0.7152 * px[1] + 0.0722 * px[2]
}

/// Applies all manual healing spots in `cfg`, mapping each spot's raw-frame
/// normalized coordinates through `geometry`'s current orientation before
/// rasterizing, per the Retouch stage's coordinate contract.
#[tracing::instrument(skip(img, cfg, geometry))]
pub fn apply_manual_healing(
    img: &FloatImage,
    cfg: &RetouchConfig,
    geometry: &GeometryState,
    orig_w: u32,
    orig_h: u32,
    scale_factor: f32,
) -> FloatImage {
    if cfg.manual_dust_spots.is_empty() {
        return img.clone();
    }

    let w = img.width() as usize;
    let h = img.height() as usize;
    let mut data = img.data().to_vec();

    for spot in &cfg.manual_dust_spots {
        let (dx, dy) = map_forward(spot.nx, spot.ny, orig_w, orig_h, geometry);
        let cx = dx * w as f32;
        let cy = dy * h as f32;
        let radius = (spot.size * scale_factor).max(1.0);

        let mut mask = vec![0.0f32; w * h];
        paint_disc(&mut mask, w, h, cx, cy, radius);

        diffuse_inpaint(&mut data, w, h, 3, &mask, (radius as usize * 2).max(6));

        let x0 = ((cx - radius).floor().max(0.0)) as usize;
        let x1 = ((cx + radius).ceil().min(w as f32 - 1.0)) as usize;
        let y0 = ((cy - radius).floor().max(0.0)) as usize;
        let y1 = ((cy + radius).ceil().min(h as f32 - 1.0)) as usize;
        for y in y0..=y1.min(h.saturating_sub(1)) {
            for x in x0..=x1.min(w.saturating_sub(1)) {
                let i = y * w + x;
                if mask[i] <= 0.0 {
                    continue;
                }
                let px = &data[i * 3..i * 3 + 3];
                let l = luma(px);
                let grain_amp = 5.0 * l * (1.0 - l);
                let n = noise::value_noise(x as f32 * 0.9, y as f32 * 0.9) - 0.5;
                for c in 0..3 {
                    data[i * 3 + c] = (data[i * 3 + c] + n * grain_amp * 0.02).clamp(0.0, 1.0);
                }
            }
        }

        let feathered = gaussian_blur_mono(&mask, w, h, 3);
        let original = img.data();
        for y in y0..=y1.min(h.saturating_sub(1)) {
            for x in x0..=x1.min(w.saturating_sub(1)) {
                let i = y * w + x;
                let m = feathered[i].clamp(0.0, 1.0);
                if m <= 0.0 {
                    continue;
                }
                for c in 0..3 {
                    let idx = i * 3 + c;
                    data[idx] = original[idx] * (1.0 - m) + data[idx] * m;
                }
            }
        }
    }

    FloatImage::from_data(img.height(), img.width(), 3, data).expect("same shape as input")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DustSpot;

    fn identity_state() -> GeometryState {
        GeometryState { rotation_k: 0, fine_rotation: 0.0, flip_h: false, flip_v: false, roi: None }
    }

    #[test]
    fn no_spots_is_a_no_op() {
        let img = FloatImage::from_data(8, 8, 3, vec![0.4; 8 * 8 * 3]).unwrap();
        let cfg = RetouchConfig::default();
        let out = apply_manual_healing(&img, &cfg, &identity_state(), 8, 8, 1.0);
        assert_eq!(out.data(), img.data());
    }

    #[test]
    fn heals_a_spot_toward_its_surroundings() {
        let mut data = vec![0.3f32; 20 * 20 * 3];
        for y in 8..12 {
            for x in 8..12 {
                let i = (y * 20 + x) * 3;
                data[i] = 0.9;
                data[i + 1] = 0.9;
                data[i + 2] = 0.9;
            }
        }
        let img = FloatImage::from_data(20, 20, 3, data).unwrap();
        let cfg = RetouchConfig {
            manual_dust_spots: vec![DustSpot { nx: 0.5, ny: 0.5, size: 3.0 }],
            ..RetouchConfig::default()
        };
        let out = apply_manual_healing(&img, &cfg, &identity_state(), 20, 20, 1.0);
        let center = out.data()[(10 * 20 + 10) * 3];
        assert!(center < 0.7, "healed center should move toward the surrounding 0.3 field, got {center}");
    }
}
