//! Resolves the `--color-space` flag (`spec.md` §6.2) to an `ExportConfig`.
//!
//! `ExportConfig::color_space` only distinguishes the working space from
//! greyscale; everything else goes through `icc_profile_path`, matching how
//! `darkroom-export`'s color management step actually transforms a buffer
//! (`spec.md` §4.9 step 4, §6 `ICCProvider`). A named built-in space is
//! resolved to a [`darkroom_icc::Profile`], serialized to ICC bytes, and
//! written to a scratch file whose path becomes `icc_profile_path`.

use std::path::PathBuf;

use anyhow::{Context, Result};
use darkroom_icc::Profile;
use darkroom_pipeline::ExportColorSpace;
use tracing::warn;

/// The resolved destination: either a color-space tag with no ICC transform,
/// or a scratch ICC file plus a handle keeping it alive for the run.
pub struct ResolvedColorSpace {
    pub color_space: ExportColorSpace,
    pub icc_profile_path: Option<String>,
    _scratch: Option<tempfile::TempPath>,
}

/// Resolves `name` (one of the `--color-space` values) into an
/// [`ExportConfig`](darkroom_pipeline::ExportConfig)-ready pair. `darkroom-icc`
/// has no built-in constructors for `prophoto` or `wide-gamut`; both fall
/// back to sRGB with a warning (see `DESIGN.md`).
pub fn resolve_color_space(name: &str) -> Result<ResolvedColorSpace> {
    let name = name.to_ascii_lowercase();
    if name == "greyscale" {
        return Ok(ResolvedColorSpace { color_space: ExportColorSpace::Greyscale, icc_profile_path: None, _scratch: None });
    }

    let profile = match name.as_str() {
        "srgb" => Profile::srgb(),
        "adobe-rgb" => Profile::adobe_rgb(),
        "p3" => Profile::display_p3(),
        "rec2020" => Profile::rec2020(),
        "aces" => Profile::aces_ap0(),
        "prophoto" => {
            warn!("prophoto has no built-in ICC profile in this build; falling back to sRGB");
            Profile::srgb()
        }
        "wide-gamut" => {
            warn!("wide-gamut has no built-in ICC profile in this build; falling back to sRGB");
            Profile::srgb()
        }
        other => anyhow::bail!("unknown --color-space value: {other}"),
    };

    let icc_bytes = profile.to_icc().context("failed to serialize ICC profile")?;
    let (file, path) = tempfile::NamedTempFile::new().context("failed to create scratch ICC file")?.into_parts();
    std::fs::write(&path, &icc_bytes).context("failed to write scratch ICC file")?;
    drop(file);

    Ok(ResolvedColorSpace {
        color_space: ExportColorSpace::WorkingSpace,
        icc_profile_path: Some(path.to_string_lossy().into_owned()),
        _scratch: Some(path),
    })
}

/// A plain path, with no scratch-file lifetime concerns, used by tests.
pub fn color_space_names() -> &'static [&'static str] {
    &["srgb", "adobe-rgb", "prophoto", "wide-gamut", "aces", "p3", "rec2020", "greyscale"]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn greyscale_needs_no_icc_profile() {
        let resolved = resolve_color_space("greyscale").unwrap();
        assert_eq!(resolved.color_space, ExportColorSpace::Greyscale);
        assert!(resolved.icc_profile_path.is_none());
    }

    #[test]
    fn named_builtin_writes_a_scratch_icc_file() {
        let resolved = resolve_color_space("srgb").unwrap();
        assert_eq!(resolved.color_space, ExportColorSpace::WorkingSpace);
        let path = resolved.icc_profile_path.as_deref().unwrap();
        assert!(std::path::Path::new(path).exists());
    }

    #[test]
    fn fallback_names_still_resolve() {
        assert!(resolve_color_space("prophoto").is_ok());
        assert!(resolve_color_space("wide-gamut").is_ok());
    }

    #[test]
    fn unknown_name_is_rejected() {
        assert!(resolve_color_space("nonsense").is_err());
    }

    #[test]
    fn every_advertised_name_resolves() {
        for name in color_space_names() {
            assert!(resolve_color_space(name).is_ok(), "{name} failed to resolve");
        }
    }
}
