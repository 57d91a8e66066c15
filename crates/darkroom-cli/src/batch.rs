//! Bounded-concurrency batch conversion (`spec.md` §4.11), grounded on the
//! original export service's `asyncio.Semaphore(max(1, max_workers // 3))`
//! pattern: a worker pool sized well below total core count so the
//! per-image kernels (already internally parallel) aren't oversubscribed.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

use rayon::prelude::*;
use tracing::{error, info};

use darkroom_pipeline::WorkspaceConfig;

use crate::pipeline_run::convert_one;

/// Outcome of converting one file.
pub enum FileOutcome {
    Converted(PathBuf),
    Failed { input: PathBuf, error: String },
}

/// Summary of a batch run.
pub struct BatchReport {
    pub outcomes: Vec<FileOutcome>,
}

impl BatchReport {
    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|o| matches!(o, FileOutcome::Converted(_))).count()
    }
    pub fn failed(&self) -> usize {
        self.outcomes.len() - self.succeeded()
    }
}

/// Worker count the original's semaphore sizing translates to: at least one
/// thread, otherwise a third of available parallelism.
pub fn worker_count() -> usize {
    std::thread::available_parallelism().map(|n| n.get()).unwrap_or(1).max(3) / 3
}

/// Converts every file in `inputs` into `output_dir`, using `settings` as
/// every file's base configuration. Runs on a dedicated thread pool sized by
/// [`worker_count`] rather than rayon's global pool, so a CLI invocation
/// never contends with whatever pool the per-image kernels already use
/// internally. Continues past individual failures; the caller decides the
/// process exit code from the returned [`BatchReport`].
pub fn run_batch(inputs: &[PathBuf], settings: &WorkspaceConfig, output_dir: &Path) -> anyhow::Result<BatchReport> {
    std::fs::create_dir_all(output_dir)?;

    let pool = rayon::ThreadPoolBuilder::new().num_threads(worker_count()).build()?;
    let completed = AtomicUsize::new(0);
    let total = inputs.len();

    let outcomes = pool.install(|| {
        inputs
            .par_iter()
            .map(|input| {
                let outcome = match convert_one(input, settings, output_dir) {
                    Ok(converted) => match std::fs::write(&converted.path, &converted.bytes) {
                        Ok(()) => FileOutcome::Converted(converted.path),
                        Err(e) => FileOutcome::Failed { input: input.clone(), error: e.to_string() },
                    },
                    Err(e) => FileOutcome::Failed { input: input.clone(), error: format!("{e:#}") },
                };
                let n = completed.fetch_add(1, Ordering::Relaxed) + 1;
                match &outcome {
                    FileOutcome::Converted(path) => info!("[{n}/{total}] {} -> {}", input.display(), path.display()),
                    FileOutcome::Failed { error, .. } => error!("[{n}/{total}] {} failed: {error}", input.display()),
                }
                outcome
            })
            .collect::<Vec<_>>()
    });

    Ok(BatchReport { outcomes })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn worker_count_is_at_least_one() {
        assert!(worker_count() >= 1);
    }
}
