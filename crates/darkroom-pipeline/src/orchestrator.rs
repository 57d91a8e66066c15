//! The Orchestrator: `process()`, tying every kernel together behind the
//! Stage Cache (`spec.md` §4.7).

use darkroom_core::{FloatImage, Roi};
use darkroom_exposure::{apply_characteristic_curve, heuristic_for_mode, normalize_log_image, to_log_space};
use darkroom_geometry::{apply_rotation_and_flips, crop_to_roi, detect_active_roi, manual_rect_to_roi, GeometryState};
use darkroom_lab::apply_lab_kernel;
use darkroom_retouch::apply_retouch;
use darkroom_toning::apply_toning;

use crate::cache::{CacheEntry, StageCache};
use crate::config::WorkspaceConfig;
use crate::context::PipelineContext;
use crate::error::{PipelineCause, PipelineError, Stage};

type StageResult = Result<(), PipelineError>;

fn wrap<T>(stage: Stage, result: Result<T, impl Into<PipelineCause>>) -> Result<T, PipelineError> {
    result.map_err(|cause| PipelineError { stage, cause: cause.into() })
}

/// Runs the base stage (geometry + normalization), publishing the active
/// ROI and [`GeometryState`] into `ctx`. Returns the normalized `[0, 1]`
/// log-negative buffer.
fn run_base(img: &FloatImage, cfg: &WorkspaceConfig, ctx: &mut PipelineContext) -> Result<FloatImage, PipelineError> {
    let rotated = apply_rotation_and_flips(img, &cfg.geometry);
    let (h, w) = (rotated.height(), rotated.width());

    let roi = match cfg.geometry.manual_crop_rect {
        Some(rect) => Some(manual_rect_to_roi(rect, h, w)),
        None => wrap(Stage::Base, detect_active_roi(&rotated, &cfg.geometry, ctx.scale_factor, None))?,
    };
    ctx.active_roi = roi;
    ctx.geometry_state = Some(GeometryState {
        rotation_k: cfg.geometry.rotation,
        fine_rotation: cfg.geometry.fine_rotation,
        flip_h: cfg.geometry.flip_h,
        flip_v: cfg.geometry.flip_v,
        roi: None,
    });

    let log_img = to_log_space(&rotated);
    let heuristic = heuristic_for_mode(cfg.process_mode);
    let bounds = wrap(Stage::Base, heuristic.calculate_bounds(&log_img, roi))?;
    Ok(normalize_log_image(&log_img, &bounds))
}

/// Runs every memoized stage (base, exposure, retouch, lab), reusing
/// `cache`'s entries while no upstream stage has changed and the relevant
/// config fingerprint is unchanged (`spec.md` §4.7 steps 2-3).
fn run_memoized_stages(
    img: &FloatImage,
    cfg: &WorkspaceConfig,
    ctx: &mut PipelineContext,
    cache: &mut StageCache,
) -> Result<FloatImage, PipelineError> {
    let mut changed = false;
    let mut buf = img.clone();

    // base
    {
        let h = cfg.geometry.fingerprint();
        if !changed && cache.base.as_ref().is_some_and(|e| e.config_hash == h) {
            let entry = cache.base.as_ref().unwrap();
            buf = entry.data.clone();
            ctx.active_roi = entry.active_roi;
        } else {
            buf = run_base(&buf, cfg, ctx)?;
            cache.base = Some(CacheEntry {
                config_hash: h,
                data: buf.clone(),
                metrics: Default::default(),
                active_roi: ctx.active_roi,
            });
            changed = true;
        }
    }

    // exposure
    {
        let h = cfg.exposure.fingerprint();
        if !changed && cache.exposure.as_ref().is_some_and(|e| e.config_hash == h) {
            buf = cache.exposure.as_ref().unwrap().data.clone();
        } else {
            buf = apply_characteristic_curve(&buf, &cfg.exposure, cfg.process_mode);
            ctx.base_positive = Some(buf.clone());
            cache.exposure = Some(CacheEntry {
                config_hash: h,
                data: buf.clone(),
                metrics: Default::default(),
                active_roi: None,
            });
            changed = true;
        }
    }

    // retouch
    {
        let h = cfg.retouch.fingerprint();
        if !changed && cache.retouch.as_ref().is_some_and(|e| e.config_hash == h) {
            buf = cache.retouch.as_ref().unwrap().data.clone();
        } else {
            let (orig_h, orig_w) = ctx.original_size;
            let geometry = ctx.geometry_state.unwrap_or(GeometryState {
                rotation_k: 0,
                fine_rotation: 0.0,
                flip_h: false,
                flip_v: false,
                roi: None,
            });
            buf = apply_retouch(&buf, &cfg.retouch, &geometry, orig_w, orig_h, ctx.scale_factor);
            cache.retouch = Some(CacheEntry {
                config_hash: h,
                data: buf.clone(),
                metrics: Default::default(),
                active_roi: None,
            });
            changed = true;
        }
    }

    // lab
    {
        let h = cfg.lab.fingerprint();
        if !changed && cache.lab.as_ref().is_some_and(|e| e.config_hash == h) {
            buf = cache.lab.as_ref().unwrap().data.clone();
        } else {
            buf = apply_lab_kernel(&buf, &cfg.lab, ctx.scale_factor);
            cache.lab = Some(CacheEntry {
                config_hash: h,
                data: buf.clone(),
                metrics: Default::default(),
                active_roi: None,
            });
        }
    }

    Ok(buf)
}

/// Runs the full pipeline over `img`: base, exposure, retouch, and lab
/// stages behind `cache`'s memoization, then unconditional toning and crop
/// (`spec.md` §4.7). `source_fingerprint` identifies the RAW buffer `img`
/// was decoded from; when it differs from `cache.source_hash`, the entire
/// cache is invalidated before any lookup.
///
/// `context` may be supplied by a caller that already has one (e.g. a UI
/// session reusing scratch state across incremental edits); when absent, a
/// fresh one is constructed from `img`'s dimensions and `settings.process_mode`.
#[tracing::instrument(skip(img, settings, context, cache))]
pub fn process(
    img: &FloatImage,
    settings: &WorkspaceConfig,
    source_fingerprint: u64,
    context: Option<PipelineContext>,
    cache: &mut StageCache,
) -> Result<FloatImage, PipelineError> {
    let mut ctx = context.unwrap_or_else(|| {
        PipelineContext::new((img.height(), img.width()), settings.process_mode)
    });

    cache.sync_source(source_fingerprint);

    let staged = run_memoized_stages(img, settings, &mut ctx, cache)?;

    let toned = apply_toning(&staged, &settings.toning, settings.process_mode);

    let (h, w) = (toned.height(), toned.width());
    let crop_roi = ctx.active_roi.unwrap_or(Roi::full(h, w));
    Ok(crop_to_roi(&toned, crop_roi))
}

#[cfg(test)]
mod tests {
    use super::*;
    use darkroom_core::ProcessMode;

    fn flat_image(h: u32, w: u32) -> FloatImage {
        FloatImage::from_data(h, w, 3, vec![0.5; (h * w * 3) as usize]).unwrap()
    }

    #[test]
    fn default_settings_pipeline_runs_and_returns_an_image() {
        let img = flat_image(32, 48);
        let settings = WorkspaceConfig {
            geometry: darkroom_geometry::GeometryConfig { autocrop: false, ..Default::default() },
            ..WorkspaceConfig::default()
        };
        let mut cache = StageCache::default();
        let out = process(&img, &settings, 42, None, &mut cache).unwrap();
        assert!(out.height() > 0 && out.width() > 0);
        assert!(cache.base.is_some());
        assert!(cache.exposure.is_some());
        assert!(cache.lab.is_some());
    }

    #[test]
    fn unchanged_config_is_served_from_cache_on_second_call() {
        let img = flat_image(16, 16);
        let settings = WorkspaceConfig {
            process_mode: ProcessMode::BW,
            geometry: darkroom_geometry::GeometryConfig { autocrop: false, ..Default::default() },
            ..WorkspaceConfig::default()
        };
        let mut cache = StageCache::default();
        process(&img, &settings, 1, None, &mut cache).unwrap();
        let base_hash_first = cache.base.as_ref().unwrap().config_hash;

        let out2 = process(&img, &settings, 1, None, &mut cache).unwrap();
        assert_eq!(cache.base.as_ref().unwrap().config_hash, base_hash_first);
        assert!(out2.data().iter().all(|v| v.is_finite()));
    }

    #[test]
    fn source_fingerprint_change_clears_the_cache() {
        let img = flat_image(16, 16);
        let settings = WorkspaceConfig {
            geometry: darkroom_geometry::GeometryConfig { autocrop: false, ..Default::default() },
            ..WorkspaceConfig::default()
        };
        let mut cache = StageCache::default();
        process(&img, &settings, 1, None, &mut cache).unwrap();
        process(&img, &settings, 2, None, &mut cache).unwrap();
        assert_eq!(cache.source_hash, 2);
    }
}
