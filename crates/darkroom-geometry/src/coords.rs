//! Forward/inverse coordinate mapping between raw and display space
//! (`spec.md` §4.2 steps 5-6).

use darkroom_core::Roi;

/// The geometric state a point needs to be mapped through: rotation, flips,
/// fine rotation, and an optional crop.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeometryState {
    /// Number of 90-degree CCW rotations, `0..=3`.
    pub rotation_k: u8,
    /// Fine rotation in degrees, same convention as [`crate::rotation::apply_fine_rotation`].
    pub fine_rotation: f32,
    /// Horizontal flip, applied after rotation.
    pub flip_h: bool,
    /// Vertical flip, applied after `flip_h`.
    pub flip_v: bool,
    /// Crop applied after rotation/flip, in rotated-pre-crop pixel space.
    pub roi: Option<Roi>,
}

fn rotate_point(px: f32, py: f32, w: f32, h: f32, k: u8) -> (f32, f32, f32, f32) {
    match k % 4 {
        0 => (px, py, w, h),
        1 => (py, w - px, h, w),
        2 => (w - px, h - py, w, h),
        3 => (h - py, px, h, w),
        _ => unreachable!(),
    }
}

fn fine_rotate_point(px: f32, py: f32, w: f32, h: f32, angle_deg: f32) -> (f32, f32) {
    if angle_deg == 0.0 {
        return (px, py);
    }
    let cx = (w - 1.0) / 2.0;
    let cy = (h - 1.0) / 2.0;
    let theta = angle_deg.to_radians();
    let (sin_t, cos_t) = theta.sin_cos();
    let dx = px - cx;
    let dy = py - cy;
    (dx * cos_t - dy * sin_t + cx, dx * sin_t + dy * cos_t + cy)
}

/// Maps a normalized raw-space point `(nx, ny)` to its normalized location
/// in the post-transform display buffer.
pub fn map_forward(nx: f32, ny: f32, orig_w: u32, orig_h: u32, state: &GeometryState) -> (f32, f32) {
    let (w0, h0) = (orig_w as f32, orig_h as f32);
    let mut px = nx * w0;
    let mut py = ny * h0;

    let (rpx, rpy, mut w, mut h) = rotate_point(px, py, w0, h0, state.rotation_k);
    px = rpx;
    py = rpy;

    if state.flip_h {
        px = w - 1.0 - px;
    }
    if state.flip_v {
        py = h - 1.0 - py;
    }

    let (fpx, fpy) = fine_rotate_point(px, py, w, h, state.fine_rotation);
    px = fpx;
    py = fpy;

    if let Some(roi) = state.roi {
        px -= roi.x1 as f32;
        py -= roi.y1 as f32;
        w = roi.width() as f32;
        h = roi.height() as f32;
    }

    ((px / w.max(1.0)).clamp(0.0, 1.0), (py / h.max(1.0)).clamp(0.0, 1.0))
}

/// Inverts [`rotate_point`] algebraically. `w0`/`h0` are the *original*
/// (pre-rotation) dimensions, matching what `rotate_point` itself took.
fn inverse_rotate_point(rpx: f32, rpy: f32, w0: f32, h0: f32, k: u8) -> (f32, f32) {
    match k % 4 {
        0 => (rpx, rpy),
        1 => (w0 - rpy, rpx),
        2 => (w0 - rpx, h0 - rpy),
        3 => (rpy, h0 - rpx),
        _ => unreachable!(),
    }
}

/// Inverts [`map_forward`]: maps a normalized display-space point back to
/// raw space.
pub fn map_inverse(nx: f32, ny: f32, orig_w: u32, orig_h: u32, state: &GeometryState) -> (f32, f32) {
    let (w0, h0) = (orig_w as f32, orig_h as f32);

    // Dimensions of the rotated (pre-flip, pre-fine-rotation) frame.
    let (rot_w, rot_h) = if state.rotation_k % 2 == 1 { (h0, w0) } else { (w0, h0) };

    let (w, h) = match state.roi {
        Some(roi) => (roi.width() as f32, roi.height() as f32),
        None => (rot_w, rot_h),
    };
    let mut px = nx * w;
    let mut py = ny * h;

    if let Some(roi) = state.roi {
        px += roi.x1 as f32;
        py += roi.y1 as f32;
    }

    if state.fine_rotation != 0.0 {
        let cx = (rot_w - 1.0) / 2.0;
        let cy = (rot_h - 1.0) / 2.0;
        let theta = -state.fine_rotation.to_radians();
        let (sin_t, cos_t) = theta.sin_cos();
        let dx = px - cx;
        let dy = py - cy;
        px = dx * cos_t - dy * sin_t + cx;
        py = dx * sin_t + dy * cos_t + cy;
    }

    if state.flip_v {
        py = rot_h - 1.0 - py;
    }
    if state.flip_h {
        px = rot_w - 1.0 - px;
    }

    let (opx, opy) = inverse_rotate_point(px, py, w0, h0, state.rotation_k);

    ((opx / w0.max(1.0)).clamp(0.0, 1.0), (opy / h0.max(1.0)).clamp(0.0, 1.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn identity_state() -> GeometryState {
        GeometryState { rotation_k: 0, fine_rotation: 0.0, flip_h: false, flip_v: false, roi: None }
    }

    #[test]
    fn identity_state_is_noop() {
        let (x, y) = map_forward(0.3, 0.7, 100, 200, &identity_state());
        assert!((x - 0.3).abs() < 1e-5);
        assert!((y - 0.7).abs() < 1e-5);
    }

    #[test]
    fn roundtrip_through_rotation_and_flip() {
        let state = GeometryState { rotation_k: 1, fine_rotation: 0.0, flip_h: true, flip_v: false, roi: None };
        let (fx, fy) = map_forward(0.25, 0.6, 100, 200, &state);
        let (bx, by) = map_inverse(fx, fy, 100, 200, &state);
        assert!((bx - 0.25).abs() < 1e-3, "bx={bx}");
        assert!((by - 0.6).abs() < 1e-3, "by={by}");
    }

    #[test]
    fn result_is_always_clamped_to_unit_square() {
        let state = GeometryState { rotation_k: 2, fine_rotation: 45.0, flip_h: false, flip_v: true, roi: None };
        let (x, y) = map_forward(0.01, 0.99, 50, 50, &state);
        assert!((0.0..=1.0).contains(&x));
        assert!((0.0..=1.0).contains(&y));
    }
}
