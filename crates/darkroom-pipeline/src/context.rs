//! `PipelineContext`: per-invocation scratch state (`spec.md` §3, §4.7).

use std::collections::HashMap;

use darkroom_core::{FloatImage, ProcessMode, Roi};
use darkroom_geometry::GeometryState;

/// Default long-edge resolution of the preview buffer `scale_factor` is
/// measured against; most downstream kernels' constants (margins, kernel
/// sizes) were tuned at this reference size.
pub const PREVIEW_REFERENCE_SIZE: f32 = 2048.0;

/// A metric value a stage can deposit into [`PipelineContext::metrics`].
/// Kept deliberately small and data-only; stages that need richer shared
/// state publish it as a dedicated `PipelineContext` field instead.
#[derive(Debug, Clone, PartialEq)]
pub enum MetricValue {
    /// A scalar measurement.
    Scalar(f32),
    /// A pair of scalars, e.g. per-channel bounds collapsed to one number.
    Pair(f32, f32),
    /// An arbitrary label, e.g. which heuristic ran.
    Label(String),
}

/// Per-invocation scratch state, constructed fresh by [`crate::orchestrator::process`]
/// and discarded on return (`spec.md` §3 "Not persisted.").
///
/// Carries the scale factor every kernel's size-dependent constants are
/// expressed relative to, the original (pre-geometry) dimensions, the
/// active process mode, the active ROI once the base stage has run, and a
/// free-form metrics map stages use to publish intermediate results for
/// later stages or for UI display (log bounds, analysis crop, etc).
#[derive(Debug, Clone)]
pub struct PipelineContext {
    /// `max(H, W) / PREVIEW_REFERENCE_SIZE` of the original source buffer.
    pub scale_factor: f32,
    /// `(height, width)` of the source buffer before any geometry transform.
    pub original_size: (u32, u32),
    /// The film process the source negative was shot on.
    pub process_mode: ProcessMode,
    /// The active region of interest, published by the most recent base
    /// stage execution. `None` before the base stage has run, or when
    /// autocrop is off and no manual crop rect is set.
    pub active_roi: Option<Roi>,
    /// Free-form intermediate results stages deposit for downstream stages
    /// or for UI inspection.
    pub metrics: HashMap<String, MetricValue>,
    /// The rotation/flip/crop state published by the base stage, used by
    /// retouch and any other stage that maps normalized stroke coordinates
    /// into the current display orientation.
    pub geometry_state: Option<GeometryState>,
    /// The positive buffer published by the exposure stage, kept around
    /// for callers that want the pre-retouch positive (e.g. a UI histogram)
    /// without re-running the curve.
    pub base_positive: Option<FloatImage>,
}

impl PipelineContext {
    /// Constructs a fresh context for a source buffer of `original_size`
    /// and the given process mode (`spec.md` §4.7 step 1).
    pub fn new(original_size: (u32, u32), process_mode: ProcessMode) -> Self {
        let (h, w) = original_size;
        let scale_factor = (h.max(w) as f32 / PREVIEW_REFERENCE_SIZE).max(1e-6);
        Self {
            scale_factor,
            original_size,
            process_mode,
            active_roi: None,
            metrics: HashMap::new(),
            geometry_state: None,
            base_positive: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scale_factor_is_long_edge_over_reference() {
        let ctx = PipelineContext::new((4096, 2048), ProcessMode::C41);
        assert!((ctx.scale_factor - 2.0).abs() < 1e-5);
    }

    #[test]
    fn fresh_context_has_no_active_roi() {
        let ctx = PipelineContext::new((100, 100), ProcessMode::BW);
        assert!(ctx.active_roi.is_none());
        assert!(ctx.metrics.is_empty());
    }
}
