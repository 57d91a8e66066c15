//! `ExposureConfig`: the Exposure Kernel's user-facing sliders (`spec.md` §3).

use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

use crate::error::{ExposureError, ExposureResult};

/// Maps a CMY slider to a density shift (`spec.md` §4.3.3).
pub const CMY_MAX_DENSITY: f32 = 0.1;
/// Maps the density slider to a log-exposure shift.
pub const DENSITY_MULTIPLIER: f32 = 0.2;
/// Maps the grade slider to the sigmoid slope.
pub const GRADE_MULTIPLIER: f32 = 2.0;
/// D-max of the characteristic curve.
pub const D_MAX: f32 = 3.5;
/// Target paper exposure range the auto-exposure solver aims for.
pub const TARGET_PAPER_RANGE: f32 = 2.1;

/// The Exposure Kernel's user-facing controls (`spec.md` §3 `ExposureConfig`).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExposureConfig {
    /// Pivot shift, `[-1, 3]`.
    pub density: f32,
    /// Sigmoid slope, `[0, 5]`.
    pub grade: f32,
    /// Cyan filtration, `[-1, 1]`.
    pub wb_cyan: f32,
    /// Magenta filtration, `[-1, 1]`.
    pub wb_magenta: f32,
    /// Yellow filtration, `[-1, 1]`.
    pub wb_yellow: f32,
    /// Shadow-side curve bend, `[-1, 1]`.
    pub toe: f32,
    /// Toe transition width, `[0.1, 10]`.
    pub toe_width: f32,
    /// Toe transition hardness, `[0.1, 5]`.
    pub toe_hardness: f32,
    /// Highlight-side curve bend, `[-1, 1]`.
    pub shoulder: f32,
    /// Shoulder transition width, `[0.1, 10]`.
    pub shoulder_width: f32,
    /// Shoulder transition hardness, `[0.1, 5]`.
    pub shoulder_hardness: f32,
}

impl Default for ExposureConfig {
    fn default() -> Self {
        Self {
            density: 1.0,
            grade: 2.5,
            wb_cyan: 0.0,
            wb_magenta: 0.0,
            wb_yellow: 0.0,
            toe: 0.0,
            toe_width: 3.0,
            toe_hardness: 1.0,
            shoulder: 0.0,
            shoulder_width: 3.0,
            shoulder_hardness: 1.0,
        }
    }
}

impl ExposureConfig {
    /// Validates every field against the ranges `spec.md` §3 documents.
    pub fn validate(&self) -> ExposureResult<()> {
        let checks: &[(&str, f32, f32, f32)] = &[
            ("density", self.density, -1.0, 3.0),
            ("grade", self.grade, 0.0, 5.0),
            ("wb_cyan", self.wb_cyan, -1.0, 1.0),
            ("wb_magenta", self.wb_magenta, -1.0, 1.0),
            ("wb_yellow", self.wb_yellow, -1.0, 1.0),
            ("toe", self.toe, -1.0, 1.0),
            ("toe_width", self.toe_width, 0.1, 10.0),
            ("toe_hardness", self.toe_hardness, 0.1, 5.0),
            ("shoulder", self.shoulder, -1.0, 1.0),
            ("shoulder_width", self.shoulder_width, 0.1, 10.0),
            ("shoulder_hardness", self.shoulder_hardness, 0.1, 5.0),
        ];
        for &(name, value, lo, hi) in checks {
            if !(lo..=hi).contains(&value) {
                return Err(ExposureError::InvalidConfig(format!(
                    "{name} = {value} outside [{lo}, {hi}]"
                )));
            }
        }
        Ok(())
    }

    /// Stable hash of this config's fields, order-independent of field
    /// declaration order, for the Stage Cache's per-stage config
    /// fingerprint (`spec.md` §3). `f32` fields are hashed by bit pattern.
    pub fn fingerprint(&self) -> u64 {
        let mut hasher = std::collections::hash_map::DefaultHasher::new();
        for field in [
            self.density,
            self.grade,
            self.wb_cyan,
            self.wb_magenta,
            self.wb_yellow,
            self.toe,
            self.toe_width,
            self.toe_hardness,
            self.shoulder,
            self.shoulder_width,
            self.shoulder_hardness,
        ] {
            field.to_bits().hash(&mut hasher);
        }
        hasher.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_valid() {
        ExposureConfig::default().validate().unwrap();
    }

    #[test]
    fn out_of_range_density_is_rejected() {
        let cfg = ExposureConfig { density: 10.0, ..Default::default() };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn fingerprint_is_stable_and_sensitive() {
        let a = ExposureConfig::default();
        let b = ExposureConfig::default();
        assert_eq!(a.fingerprint(), b.fingerprint());

        let c = ExposureConfig { density: 1.5, ..Default::default() };
        assert_ne!(a.fingerprint(), c.fingerprint());
    }
}
