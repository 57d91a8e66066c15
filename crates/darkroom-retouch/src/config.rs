//! `RetouchConfig`: the Retouch Kernel's user-facing sliders (`spec.md` §3).

use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

/// A manual dust spot: normalized raw-frame coordinates plus brush size.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DustSpot {
    /// Normalized x in the raw frame, `[0, 1]`.
    pub nx: f32,
    /// Normalized y in the raw frame, `[0, 1]`.
    pub ny: f32,
    /// Brush radius in pixels (pre-`scale_factor`).
    pub size: f32,
}

/// One local dodge/burn adjustment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocalAdjustment {
    /// Brush stroke points, normalized raw-frame coordinates.
    pub points: Vec<(f32, f32)>,
    /// Exposure shift in stops; positive dodges, negative burns.
    pub strength_ev: f32,
    /// Brush radius in pixels (pre-`scale_factor`).
    pub radius_px: f32,
    /// Spatial mask feather, `[0, 1]`.
    pub feather: f32,
    /// Luma range the adjustment targets, `(low, high)` in `[0, 1]`.
    pub luma_range: (f32, f32),
    /// Softness of the luma-range ramp, `[0, 1]`.
    pub luma_softness: f32,
}

/// The Retouch Kernel's user-facing controls (`spec.md` §3 `RetouchConfig`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetouchConfig {
    /// Whether automatic dust detection/removal runs.
    pub dust_remove: bool,
    /// Adaptive-threshold base sensitivity, `[0.01, 1]`.
    pub dust_threshold: f32,
    /// Dust feature size in pixels (pre-`scale_factor`).
    pub dust_size: u32,
    /// User-placed healing spots.
    pub manual_dust_spots: Vec<DustSpot>,
    /// User-placed dodge/burn strokes.
    pub local_adjustments: Vec<LocalAdjustment>,
}

impl Default for RetouchConfig {
    fn default() -> Self {
        Self {
            dust_remove: false,
            dust_threshold: 0.15,
            dust_size: 3,
            manual_dust_spots: Vec::new(),
            local_adjustments: Vec::new(),
        }
    }
}

impl RetouchConfig {
    /// Stable hash of this config's fields, for the Stage Cache's per-stage
    /// config fingerprint (`spec.md` §3).
    pub fn fingerprint(&self) -> u64 {
        let mut hasher = std::collections::hash_map::DefaultHasher::new();
        self.dust_remove.hash(&mut hasher);
        self.dust_threshold.to_bits().hash(&mut hasher);
        self.dust_size.hash(&mut hasher);
        for spot in &self.manual_dust_spots {
            spot.nx.to_bits().hash(&mut hasher);
            spot.ny.to_bits().hash(&mut hasher);
            spot.size.to_bits().hash(&mut hasher);
        }
        for adj in &self.local_adjustments {
            for &(x, y) in &adj.points {
                x.to_bits().hash(&mut hasher);
                y.to_bits().hash(&mut hasher);
            }
            adj.strength_ev.to_bits().hash(&mut hasher);
            adj.radius_px.to_bits().hash(&mut hasher);
            adj.feather.to_bits().hash(&mut hasher);
            adj.luma_range.0.to_bits().hash(&mut hasher);
            adj.luma_range.1.to_bits().hash(&mut hasher);
            adj.luma_softness.to_bits().hash(&mut hasher);
        }
        hasher.finish()
    }
}
