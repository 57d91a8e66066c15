//! Input file discovery (`spec.md` §6.2): expands `FILE_OR_DIR` arguments
//! into a flat list of recognized RAW-container files, recursing into
//! directories and warning (not failing) on anything else.

use std::path::{Path, PathBuf};

use tracing::warn;

/// Extensions this pipeline's RAW loader accepts, grounded on the
/// original's `SUPPORTED_EXTS`/`SUPPORTED_RAW_EXTENSIONS` filesystem
/// watcher and file-dialog filters.
pub const SUPPORTED_RAW_EXTENSIONS: &[&str] = &["dng", "tiff", "tif", "nef", "arw", "raw", "raf"];

fn has_recognized_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| SUPPORTED_RAW_EXTENSIONS.iter().any(|known| known.eq_ignore_ascii_case(ext)))
        .unwrap_or(false)
}

/// Expands `inputs` into a deduplicated, sorted list of RAW files.
/// Directories are walked recursively. Files with an unrecognized extension
/// are skipped with a warning rather than aborting the batch.
pub fn discover_inputs(inputs: &[PathBuf]) -> Vec<PathBuf> {
    let mut found = Vec::new();
    for input in inputs {
        collect(input, &mut found);
    }
    found.sort();
    found.dedup();
    found
}

fn collect(path: &Path, found: &mut Vec<PathBuf>) {
    if path.is_dir() {
        let entries = match std::fs::read_dir(path) {
            Ok(entries) => entries,
            Err(e) => {
                warn!("cannot read directory {}: {e}", path.display());
                return;
            }
        };
        for entry in entries.flatten() {
            collect(&entry.path(), found);
        }
        return;
    }

    if !path.is_file() {
        warn!("skipping {}: not a file or directory", path.display());
        return;
    }

    if has_recognized_extension(path) {
        found.push(path.to_path_buf());
    } else {
        warn!("skipping {}: unrecognized extension", path.display());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn recognizes_known_extensions_case_insensitively() {
        assert!(has_recognized_extension(Path::new("roll.DNG")));
        assert!(has_recognized_extension(Path::new("scan.tiff")));
        assert!(!has_recognized_extension(Path::new("notes.txt")));
    }

    #[test]
    fn discovery_walks_directories_recursively_and_skips_junk() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.dng"), b"").unwrap();
        fs::write(dir.path().join("notes.txt"), b"").unwrap();
        let sub = dir.path().join("roll2");
        fs::create_dir(&sub).unwrap();
        fs::write(sub.join("b.nef"), b"").unwrap();

        let found = discover_inputs(&[dir.path().to_path_buf()]);
        assert_eq!(found.len(), 2);
        assert!(found.iter().all(|p| p.extension().is_some()));
    }
}
