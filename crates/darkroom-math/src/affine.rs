//! 2D affine transform for the geometry kernel's fine-rotation warp.
//!
//! Mirrors OpenCV's `getRotationMatrix2D`: a rotation about an arbitrary
//! center, optionally combined with a scale factor, expressed as a 2x3
//! matrix `[a b tx; c d ty]` applied to column vectors `[x, y, 1]`.

/// A 2x3 affine transform: `x' = a*x + b*y + tx`, `y' = c*x + d*y + ty`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Affine2 {
    /// Row-major coefficients `[a, b, tx, c, d, ty]`.
    pub m: [f32; 6],
}

impl Affine2 {
    /// Identity transform.
    pub const IDENTITY: Self = Self { m: [1.0, 0.0, 0.0, 0.0, 1.0, 0.0] };

    /// Builds the rotation-about-a-point matrix `getRotationMatrix2D` uses:
    /// rotate by `angle_deg` counter-clockwise about `(cx, cy)`, then scale.
    pub fn rotation_about(cx: f32, cy: f32, angle_deg: f32, scale: f32) -> Self {
        let theta = angle_deg.to_radians();
        let a = scale * theta.cos();
        let b = scale * theta.sin();
        Self {
            m: [
                a,
                b,
                (1.0 - a) * cx - b * cy,
                -b,
                a,
                b * cx + (1.0 - a) * cy,
            ],
        }
    }

    /// Applies the transform to a point.
    #[inline]
    pub fn apply(&self, x: f32, y: f32) -> (f32, f32) {
        let [a, b, tx, c, d, ty] = self.m;
        (a * x + b * y + tx, c * x + d * y + ty)
    }

    /// Inverts the transform; `None` if singular (never happens for a
    /// rotation-derived matrix with nonzero scale).
    pub fn inverse(&self) -> Option<Self> {
        let [a, b, tx, c, d, ty] = self.m;
        let det = a * d - b * c;
        if det.abs() < 1e-12 {
            return None;
        }
        let inv_det = 1.0 / det;
        let ia = d * inv_det;
        let ib = -b * inv_det;
        let ic = -c * inv_det;
        let id = a * inv_det;
        let itx = -(ia * tx + ib * ty);
        let ity = -(ic * tx + id * ty);
        Some(Self { m: [ia, ib, itx, ic, id, ity] })
    }
}
