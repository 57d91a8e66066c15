//! `SettingsRepository` (`spec.md` §6.1, §6.3): a flat key/value settings
//! file plus a tiny on-disk store for per-file and global settings.
//!
//! The serialized form is a flat map; nested sub-config field names are
//! hoisted to the top level (`density`, `grade`, `dust_remove`, ... sit
//! alongside `process_mode` with no namespace prefix), on the assumption
//! that no two kernels share a field name. Unrecognized keys are ignored;
//! missing keys inherit `WorkspaceConfig::default()`.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use darkroom_pipeline::WorkspaceConfig;
use serde_json::Value;

/// Parses a flat settings JSON object into a [`WorkspaceConfig`], overlaying
/// it on top of the default. Fields absent from `flat` keep their default
/// value; fields present in `flat` but not recognized by any sub-config are
/// silently dropped.
pub fn apply_flat_settings(flat: &Value) -> Result<WorkspaceConfig> {
    let flat = flat.as_object().context("settings file must be a JSON object")?;

    let mut skeleton = serde_json::to_value(WorkspaceConfig::default())
        .context("failed to build default settings skeleton")?;
    let skeleton_obj = skeleton.as_object_mut().expect("WorkspaceConfig serializes to an object");

    for (key, value) in flat {
        if skeleton_obj.contains_key(key) {
            skeleton_obj.insert(key.clone(), value.clone());
            continue;
        }
        for nested in skeleton_obj.values_mut() {
            if let Some(nested_obj) = nested.as_object_mut() {
                if nested_obj.contains_key(key) {
                    nested_obj.insert(key.clone(), value.clone());
                    break;
                }
            }
        }
    }

    serde_json::from_value(skeleton).context("settings do not match WorkspaceConfig's shape")
}

/// Loads a `--settings FILE.json` document and overlays it onto the default
/// `WorkspaceConfig`.
pub fn load_settings_file(path: &Path) -> Result<WorkspaceConfig> {
    let text = fs::read_to_string(path).with_context(|| format!("failed to read settings file: {}", path.display()))?;
    let value: Value = serde_json::from_str(&text).with_context(|| format!("malformed settings JSON: {}", path.display()))?;
    apply_flat_settings(&value)
}

/// Per-file settings keyed by a content fingerprint, persisted as a single
/// flat JSON document (`spec.md` §6.1's `file_settings` table).
#[derive(Debug, Default)]
pub struct FileSettingsStore {
    entries: HashMap<u64, WorkspaceConfig>,
}

impl FileSettingsStore {
    /// Loads a store from disk, or an empty one if the file doesn't exist.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let text = fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
        let raw: HashMap<String, Value> = serde_json::from_str(&text).with_context(|| format!("malformed {}", path.display()))?;
        let mut entries = HashMap::with_capacity(raw.len());
        for (hash_str, flat) in raw {
            let hash: u64 = hash_str.parse().with_context(|| format!("bad fingerprint key: {hash_str}"))?;
            entries.insert(hash, apply_flat_settings(&flat)?);
        }
        Ok(Self { entries })
    }

    /// Persists this store to `path` as a flat JSON document.
    pub fn persist(&self, path: &Path) -> Result<()> {
        let mut raw = HashMap::with_capacity(self.entries.len());
        for (hash, cfg) in &self.entries {
            raw.insert(hash.to_string(), serde_json::to_value(cfg)?);
        }
        let text = serde_json::to_string_pretty(&raw)?;
        fs::write(path, text).with_context(|| format!("failed to write {}", path.display()))
    }

    /// Saves `cfg` for `fingerprint`.
    pub fn save(&mut self, fingerprint: u64, cfg: WorkspaceConfig) {
        self.entries.insert(fingerprint, cfg);
    }

    /// Looks up the settings saved for `fingerprint`, if any.
    pub fn load_entry(&self, fingerprint: u64) -> Option<&WorkspaceConfig> {
        self.entries.get(&fingerprint)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn flat_settings_overlay_known_nested_fields() {
        let flat = json!({ "density": 0.5, "dust_remove": true, "process_mode": "BW" });
        let cfg = apply_flat_settings(&flat).unwrap();
        assert_eq!(cfg.exposure.density, 0.5);
        assert!(cfg.retouch.dust_remove);
        assert_eq!(cfg.process_mode, darkroom_core::ProcessMode::BW);
    }

    #[test]
    fn unrecognized_keys_are_ignored() {
        let flat = json!({ "not_a_real_field": 42 });
        let cfg = apply_flat_settings(&flat).unwrap();
        assert_eq!(cfg, WorkspaceConfig::default());
    }

    #[test]
    fn missing_keys_inherit_defaults() {
        let flat = json!({ "grade": 2.0 });
        let cfg = apply_flat_settings(&flat).unwrap();
        assert_eq!(cfg.exposure.grade, 2.0);
        assert_eq!(cfg.exposure.density, WorkspaceConfig::default().exposure.density);
    }

    #[test]
    fn file_settings_store_round_trips_through_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("file_settings.json");

        let mut store = FileSettingsStore::default();
        let mut cfg = WorkspaceConfig::default();
        cfg.exposure.density = 0.75;
        store.save(12345, cfg.clone());
        store.persist(&path).unwrap();

        let reloaded = FileSettingsStore::load(&path).unwrap();
        assert_eq!(reloaded.load_entry(12345).unwrap().exposure.density, 0.75);
    }
}
