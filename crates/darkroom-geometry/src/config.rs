//! `GeometryConfig`: the Geometry Kernel's user-facing sliders (`spec.md` §3).

use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

/// Default detection resolution for autocrop's downsampled analysis pass.
pub const AUTOCROP_DETECT_RES: u32 = 1800;
/// Default luma threshold for film-base detection.
pub const AUTOCROP_THRESHOLD: f32 = 0.96;
/// Minimum qualifying rows/columns before autocrop falls back to full-frame.
pub const AUTOCROP_MIN_QUALIFYING: usize = 10;

/// The Geometry Kernel's user-facing controls (`spec.md` §3 `GeometryConfig`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeometryConfig {
    /// Number of 90-degree counter-clockwise rotations, `0..=3`.
    pub rotation: u8,
    /// Fine rotation angle in degrees.
    pub fine_rotation: f32,
    /// Horizontal flip, applied after rotation.
    pub flip_h: bool,
    /// Vertical flip, applied after `flip_h`.
    pub flip_v: bool,
    /// Whether autocrop detection runs.
    pub autocrop: bool,
    /// Extra margin (pixels, before `scale_factor`) subtracted from each
    /// detected edge.
    pub autocrop_offset: i32,
    /// Target aspect ratio string, e.g. `"3:2"`.
    pub autocrop_ratio: String,
    /// Explicit crop rectangle in normalized raw-frame coordinates
    /// `(x1, y1, x2, y2)`, overriding autocrop detection when set.
    pub manual_crop_rect: Option<(f32, f32, f32, f32)>,
}

impl Default for GeometryConfig {
    fn default() -> Self {
        Self {
            rotation: 0,
            fine_rotation: 0.0,
            flip_h: false,
            flip_v: false,
            autocrop: true,
            autocrop_offset: 2,
            autocrop_ratio: "3:2".to_string(),
            manual_crop_rect: None,
        }
    }
}

impl GeometryConfig {
    /// Stable hash of this config's fields, for the Stage Cache's per-stage
    /// config fingerprint (`spec.md` §3).
    pub fn fingerprint(&self) -> u64 {
        let mut hasher = std::collections::hash_map::DefaultHasher::new();
        self.rotation.hash(&mut hasher);
        self.fine_rotation.to_bits().hash(&mut hasher);
        self.flip_h.hash(&mut hasher);
        self.flip_v.hash(&mut hasher);
        self.autocrop.hash(&mut hasher);
        self.autocrop_offset.hash(&mut hasher);
        self.autocrop_ratio.hash(&mut hasher);
        if let Some((x1, y1, x2, y2)) = self.manual_crop_rect {
            x1.to_bits().hash(&mut hasher);
            y1.to_bits().hash(&mut hasher);
            x2.to_bits().hash(&mut hasher);
            y2.to_bits().hash(&mut hasher);
        } else {
            0u8.hash(&mut hasher);
        }
        hasher.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_has_no_rotation_or_crop_offset() {
        let cfg = GeometryConfig::default();
        assert_eq!(cfg.rotation, 0);
        assert!(cfg.autocrop);
    }

    #[test]
    fn fingerprint_is_stable_and_sensitive() {
        let a = GeometryConfig::default();
        let b = GeometryConfig::default();
        assert_eq!(a.fingerprint(), b.fingerprint());

        let c = GeometryConfig { rotation: 1, ..GeometryConfig::default() };
        assert_ne!(a.fingerprint(), c.fingerprint());
    }
}
