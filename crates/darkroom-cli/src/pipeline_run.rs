//! Glues RAW loading, the Orchestrator, and the Export Compositor into the
//! single-file conversion `negpy` runs per input (`spec.md` §6.2, §6.4).

use std::hash::{Hash, Hasher};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use darkroom_core::{uint16_to_float32, FloatImage};
use darkroom_export::{render_filename, FilenameContext};
use darkroom_pipeline::{StageCache, WorkspaceConfig};

/// One converted file's destination path and encoded bytes, ready to write.
pub struct ConvertedFile {
    /// Destination path, including extension.
    pub path: PathBuf,
    /// Encoded file bytes.
    pub bytes: Vec<u8>,
}

/// Runs the full pipeline for a single input file: load, process, export,
/// render the filename. Does not write to disk; callers decide where.
pub fn convert_one(input: &Path, settings: &WorkspaceConfig, output_dir: &Path) -> Result<ConvertedFile> {
    let raw = darkroom_io::raw::load(input, false)
        .with_context(|| format!("failed to load RAW buffer: {}", input.display()))?;

    let source_fingerprint = fingerprint_raw(&raw);
    let floats = uint16_to_float32(&raw.data);
    let image = FloatImage::from_data(raw.height, raw.width, 3, floats)
        .with_context(|| format!("malformed RAW buffer: {}", input.display()))?;

    let mut cache = StageCache::default();
    let positive = darkroom_pipeline::process(&image, settings, source_fingerprint, None, &mut cache)
        .with_context(|| format!("pipeline failed for {}", input.display()))?;

    let exported = darkroom_export::export(&positive, settings)
        .with_context(|| format!("export failed for {}", input.display()))?;

    let original_name = input.file_stem().and_then(|s| s.to_str()).unwrap_or("output").to_string();
    let filename_ctx = FilenameContext {
        original_name,
        mode: format!("{:?}", settings.process_mode),
        colorspace: format!("{:?}", settings.export.color_space),
        border: if settings.export.border_size_cm > 0.0 { "border".to_string() } else { String::new() },
    };
    let rendered = render_filename(&settings.export.filename_pattern, &filename_ctx);
    let path = output_dir.join(format!("{rendered}.{}", exported.extension));

    Ok(ConvertedFile { path, bytes: exported.bytes })
}

/// Stable hash of the decoded RAW buffer, used as the Stage Cache's
/// per-file fingerprint (`spec.md` §4.8). A fresh per-file `StageCache` in
/// the batch runner means this only ever guards a single `process()` call,
/// but the fingerprint is still required by the Orchestrator's contract.
fn fingerprint_raw(raw: &darkroom_io::raw::LinearBuffer16) -> u64 {
    let mut hasher = std::collections::hash_map::DefaultHasher::new();
    raw.width.hash(&mut hasher);
    raw.height.hash(&mut hasher);
    raw.data.hash(&mut hasher);
    hasher.finish()
}
