//! `StageCache`: per-file memoization of the base, exposure, retouch, and
//! lab stages (`spec.md` §4.8).

use std::collections::HashMap;

use darkroom_core::{FloatImage, Roi};

use crate::context::MetricValue;

/// One memoized stage result: the config fingerprint it was produced under,
/// the resulting buffer, any metrics it published, and the active ROI at
/// the time (only meaningful for the base stage's entry).
///
/// Valid only for the session's current source fingerprint (`spec.md` §3).
#[derive(Debug, Clone)]
pub struct CacheEntry {
    /// Fingerprint of the stage's config at the time this entry was produced.
    pub config_hash: u64,
    /// The stage's output buffer.
    pub data: FloatImage,
    /// Metrics the stage published while producing `data`.
    pub metrics: HashMap<String, MetricValue>,
    /// The active ROI at the time, if this stage publishes one.
    pub active_roi: Option<Roi>,
}

/// The four memoizable stages, in pipeline order. Toning and crop are
/// cheap and run unconditionally, so they have no cache slot (`spec.md`
/// §4.7 step 4).
#[derive(Debug, Clone, Default)]
pub struct StageCache {
    /// Geometry + normalization.
    pub base: Option<CacheEntry>,
    /// Photometric inversion.
    pub exposure: Option<CacheEntry>,
    /// Dust removal, healing, local adjustments.
    pub retouch: Option<CacheEntry>,
    /// Crosstalk, CLAHE, chroma denoise, sharpening.
    pub lab: Option<CacheEntry>,
    /// Fingerprint of the source buffer this cache's entries belong to.
    pub source_hash: u64,
}

impl StageCache {
    /// Discards all four entries, leaving `source_hash` untouched; callers
    /// are expected to set a fresh `source_hash` immediately after.
    pub fn clear(&mut self) {
        self.base = None;
        self.exposure = None;
        self.retouch = None;
        self.lab = None;
    }

    /// Clears the cache and adopts `new_source_hash` if the cache currently
    /// belongs to a different source (`spec.md` §4.7 step 2, §4.8
    /// invariant: "if `source_hash` changes, all four entries must be
    /// discarded before any lookup").
    pub fn sync_source(&mut self, new_source_hash: u64) {
        if self.source_hash != new_source_hash {
            self.clear();
            self.source_hash = new_source_hash;
        }
    }
}
