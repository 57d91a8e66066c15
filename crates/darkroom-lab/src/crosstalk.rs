//! Spectral crosstalk in density space (`spec.md` §4.5 step 1).

use darkroom_core::FloatImage;
use darkroom_math::{Mat3, Vec3};

use crate::config::LabConfig;

const DENSITY_EPSILON: f32 = 1e-4;

fn applied_matrix(matrix: &[f32; 9], strength: f32) -> Mat3 {
    let s = (strength - 1.0).max(0.0);
    let identity = Mat3::from_row_vecs(
        Vec3::new(1.0, 0.0, 0.0),
        Vec3::new(0.0, 1.0, 0.0),
        Vec3::new(0.0, 0.0, 1.0),
    );
    let cal = Mat3::from_row_vecs(
        Vec3::new(matrix[0], matrix[1], matrix[2]),
        Vec3::new(matrix[3], matrix[4], matrix[5]),
        Vec3::new(matrix[6], matrix[7], matrix[8]),
    );

    let blend = |i: Vec3, c: Vec3| i * (1.0 - s) + c * s;
    let mut rows = [
        blend(identity.row(0), cal.row(0)),
        blend(identity.row(1), cal.row(1)),
        blend(identity.row(2), cal.row(2)),
    ];
    for row in &mut rows {
        let sum = row.x + row.y + row.z;
        if sum.abs() > 1e-6 {
            *row = Vec3::new(row.x / sum, row.y / sum, row.z / sum);
        }
    }
    Mat3::from_row_vecs(rows[0], rows[1], rows[2])
}

/// Applies the spectral crosstalk matrix to `img` in density space:
/// `D' = D * M_applied^T`, row-normalized so a neutral grey stays neutral.
#[tracing::instrument(skip(img, cfg))]
pub fn apply_spectral_crosstalk(img: &FloatImage, cfg: &LabConfig) -> FloatImage {
    debug_assert_eq!(img.channels(), 3);
    if cfg.color_separation <= 1.0 {
        return img.clone();
    }

    let m = applied_matrix(&cfg.crosstalk_matrix, cfg.color_separation).transpose();

    let data: Vec<f32> = img
        .data()
        .chunks_exact(3)
        .flat_map(|px| {
            let d = Vec3::new(
                -(px[0].clamp(DENSITY_EPSILON, 1.0)).log10(),
                -(px[1].clamp(DENSITY_EPSILON, 1.0)).log10(),
                -(px[2].clamp(DENSITY_EPSILON, 1.0)).log10(),
            );
            let d_applied = m.transform(d);
            [
                10f32.powf(-d_applied.x).clamp(0.0, 1.0),
                10f32.powf(-d_applied.y).clamp(0.0, 1.0),
                10f32.powf(-d_applied.z).clamp(0.0, 1.0),
            ]
        })
        .collect();

    FloatImage::from_data(img.height(), img.width(), 3, data).expect("same shape as input")
}
