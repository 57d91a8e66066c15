//! sRGB <-> CIE Lab conversion (D65 white point), operating per-pixel on
//! linear `[0, 1]` float buffers the way the rest of the kernel expects.

const WHITE_XN: f32 = 0.950_47;
const WHITE_YN: f32 = 1.0;
const WHITE_ZN: f32 = 1.088_83;

fn srgb_to_linear(c: f32) -> f32 {
    if c <= 0.040_45 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

fn linear_to_srgb(c: f32) -> f32 {
    if c <= 0.003_130_8 {
        c * 12.92
    } else {
        1.055 * c.powf(1.0 / 2.4) - 0.055
    }
}

fn f_lab(t: f32) -> f32 {
    const DELTA: f32 = 6.0 / 29.0;
    if t > DELTA * DELTA * DELTA {
        t.cbrt()
    } else {
        t / (3.0 * DELTA * DELTA) + 4.0 / 29.0
    }
}

fn f_lab_inv(t: f32) -> f32 {
    const DELTA: f32 = 6.0 / 29.0;
    if t > DELTA {
        t * t * t
    } else {
        3.0 * DELTA * DELTA * (t - 4.0 / 29.0)
    }
}

/// Converts one gamma-encoded sRGB pixel to CIE Lab: `L` in `[0, 100]`, `a`/
/// `b` roughly in `[-128, 127]`.
pub fn srgb_to_lab(rgb: [f32; 3]) -> [f32; 3] {
    let r = srgb_to_linear(rgb[0]);
    let g = srgb_to_linear(rgb[1]);
    let b = srgb_to_linear(rgb[2]);

    let x = (0.412_453 * r + 0.357_580 * g + 0.180_423 * b) / WHITE_XN;
    let y = (0.212_671 * r + 0.715_160 * g + 0.072_169 * b) / WHITE_YN;
    let z = (0.019_334 * r + 0.119_193 * g + 0.950_227 * b) / WHITE_ZN;

    let fx = f_lab(x);
    let fy = f_lab(y);
    let fz = f_lab(z);

    let l = 116.0 * fy - 16.0;
    let a = 500.0 * (fx - fy);
    let bb = 200.0 * (fy - fz);
    [l, a, bb]
}

/// Inverse of [`srgb_to_lab`], clamped back into `[0, 1]` gamma-encoded sRGB.
pub fn lab_to_srgb(lab: [f32; 3]) -> [f32; 3] {
    let [l, a, b] = lab;
    let fy = (l + 16.0) / 116.0;
    let fx = fy + a / 500.0;
    let fz = fy - b / 200.0;

    let x = f_lab_inv(fx) * WHITE_XN;
    let y = f_lab_inv(fy) * WHITE_YN;
    let z = f_lab_inv(fz) * WHITE_ZN;

    let r = 3.240_479 * x - 1.537_150 * y - 0.498_535 * z;
    let g = -0.969_256 * x + 1.875_992 * y + 0.041_556 * z;
    let bl = 0.055_648 * x - 0.204_043 * y + 1.057_311 * z;

    [
        linear_to_srgb(r).clamp(0.0, 1.0),
        linear_to_srgb(g).clamp(0.0, 1.0),
        linear_to_srgb(bl).clamp(0.0, 1.0),
    ]
}
