//! `ToningConfig`: the Toning Kernel's user-facing sliders (`spec.md` §4.6).

use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

/// The Toning Kernel's user-facing controls.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToningConfig {
    /// Named paper substrate profile (`"None"`, `"Neutral RC"`,
    /// `"Cool Glossy"`, `"Warm Fiber"`, `"Antique Ivory"`, ...).
    pub paper_profile: String,
    /// Selenium toning strength, `[0, 2]`. B&W only.
    pub selenium_strength: f32,
    /// Sepia toning strength, `[0, 2]`. B&W only.
    pub sepia_strength: f32,
}

impl Default for ToningConfig {
    fn default() -> Self {
        Self { paper_profile: "None".to_string(), selenium_strength: 0.0, sepia_strength: 0.0 }
    }
}

impl ToningConfig {
    /// Stable hash of this config's fields, for the Stage Cache's per-stage
    /// config fingerprint (`spec.md` §3).
    pub fn fingerprint(&self) -> u64 {
        let mut hasher = std::collections::hash_map::DefaultHasher::new();
        self.paper_profile.hash(&mut hasher);
        self.selenium_strength.to_bits().hash(&mut hasher);
        self.sepia_strength.to_bits().hash(&mut hasher);
        hasher.finish()
    }
}
