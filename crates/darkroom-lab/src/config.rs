//! `LabConfig`: the Lab Kernel's user-facing sliders (`spec.md` §4.5).

use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

/// Row-major 3x3 spectral crosstalk calibration matrix, identity by default.
pub const DEFAULT_CROSSTALK_MATRIX: [f32; 9] = [1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0];

/// The Lab Kernel's user-facing controls (`spec.md` §4.5 `LabConfig`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabConfig {
    /// Spectral color separation strength, `[0, 2]`; `1.0` is neutral
    /// (`s = max(0, color_separation - 1)`, so values `<= 1` leave the
    /// image untouched).
    pub color_separation: f32,
    /// Row-major 3x3 crosstalk calibration matrix.
    pub crosstalk_matrix: [f32; 9],
    /// CLAHE local contrast strength, `[0, 1]`.
    pub clahe_strength: f32,
    /// Chroma noise smoothing strength, `[0, 1]`.
    pub c_noise_strength: f32,
    /// Output sharpening amount, `[0, 1]`.
    pub sharpen: f32,
}

impl Default for LabConfig {
    fn default() -> Self {
        Self {
            color_separation: 1.0,
            crosstalk_matrix: DEFAULT_CROSSTALK_MATRIX,
            clahe_strength: 0.0,
            c_noise_strength: 0.0,
            sharpen: 0.0,
        }
    }
}

impl LabConfig {
    /// Stable hash of this config's fields, for the Stage Cache's per-stage
    /// config fingerprint (`spec.md` §3).
    pub fn fingerprint(&self) -> u64 {
        let mut hasher = std::collections::hash_map::DefaultHasher::new();
        self.color_separation.to_bits().hash(&mut hasher);
        for v in &self.crosstalk_matrix {
            v.to_bits().hash(&mut hasher);
        }
        self.clahe_strength.to_bits().hash(&mut hasher);
        self.c_noise_strength.to_bits().hash(&mut hasher);
        self.sharpen.to_bits().hash(&mut hasher);
        hasher.finish()
    }
}
