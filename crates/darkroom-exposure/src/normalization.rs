//! Log-space normalization (`spec.md` §4.3.1) and the per-channel bound
//! measurement it depends on.

use darkroom_core::{FloatImage, Roi};

use crate::percentile::{extract_channel, percentile};

/// Floor below which raw values are clamped before taking `log10`.
pub const LOG_EPSILON: f32 = 1e-6;

/// Robust floor/ceiling of a negative's per-channel log-density, measured in
/// an analysis window (full frame or ROI).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LogNegativeBounds {
    /// Per-channel lower bound (R, G, B) in log10 space.
    pub floors: [f32; 3],
    /// Per-channel upper bound (R, G, B) in log10 space.
    pub ceils: [f32; 3],
}

impl LogNegativeBounds {
    /// `ceil - floor` for channel `c`, floored at [`LOG_EPSILON`] to avoid
    /// division by zero on a degenerate (flat) channel.
    #[inline]
    pub fn range(&self, c: usize) -> f32 {
        (self.ceils[c] - self.floors[c]).max(LOG_EPSILON)
    }
}

/// Converts a linear `[0, 1]` buffer to `log10(clip(x, ε, 1))`.
pub fn to_log_space(img: &FloatImage) -> FloatImage {
    let mut out = img.clone();
    out.map_inplace(|v| v.clamp(LOG_EPSILON, 1.0).log10());
    out
}

/// Measures [`LogNegativeBounds`] from `img_log`'s 1st/99.5th per-channel
/// percentiles (`spec.md` §3's `LogNegativeBounds` entity), restricted to
/// `roi` if given.
pub fn measure_log_negative_bounds(img_log: &FloatImage, roi: Option<Roi>) -> darkroom_core::Result<LogNegativeBounds> {
    let window = match roi {
        Some(roi) => img_log.crop(roi)?,
        None => img_log.clone(),
    };

    let mut floors = [0.0f32; 3];
    let mut ceils = [0.0f32; 3];
    for c in 0..3 {
        let mut channel = extract_channel(window.data(), window.channels(), c);
        floors[c] = percentile(&mut channel, 1.0);
        ceils[c] = percentile(&mut channel, 99.5);
    }
    Ok(LogNegativeBounds { floors, ceils })
}

/// Normalizes `img_log` against `bounds`: `clip((x - floor) / max(ceil -
/// floor, ε), 0, 1)` per channel. `img_log` must be 3-channel.
pub fn normalize_log_image(img_log: &FloatImage, bounds: &LogNegativeBounds) -> FloatImage {
    debug_assert_eq!(img_log.channels(), 3);
    let data: Vec<f32> = img_log
        .data()
        .chunks_exact(3)
        .flat_map(|px| {
            (0..3).map(|c| ((px[c] - bounds.floors[c]) / bounds.range(c)).clamp(0.0, 1.0))
        })
        .collect();
    FloatImage::from_data(img_log.height(), img_log.width(), 3, data).expect("same shape as input")
}
