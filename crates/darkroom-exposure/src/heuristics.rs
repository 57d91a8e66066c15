//! Per-process-mode bound measurement strategy.
//!
//! C41 and B&W negatives share one measurement: the 1st/99.5th per-channel
//! percentile of the log-density image, directly. E6 slide film is already a
//! positive, so its bound measurement swaps shadow/highlight roles before
//! normalization — the "invert" `spec.md` §4.3.4 describes for E6.

use darkroom_core::{FloatImage, ProcessMode, Roi};

use crate::normalization::{measure_log_negative_bounds, LogNegativeBounds};
use crate::percentile::{extract_channel, percentile};

/// Strategy for turning a log-density image into [`LogNegativeBounds`].
pub trait BoundsHeuristic {
    /// Computes bounds from `img_log`, restricted to `roi` if given.
    fn calculate_bounds(&self, img_log: &FloatImage, roi: Option<Roi>) -> darkroom_core::Result<LogNegativeBounds>;
}

/// Standard independent-channel normalization, used for C41 and B&W.
#[derive(Debug, Clone, Copy, Default)]
pub struct NegativeHeuristic;

impl BoundsHeuristic for NegativeHeuristic {
    fn calculate_bounds(&self, img_log: &FloatImage, roi: Option<Roi>) -> darkroom_core::Result<LogNegativeBounds> {
        measure_log_negative_bounds(img_log, roi)
    }
}

/// E6 direct-positive logic: the measurement window's per-channel shadow and
/// highlight percentiles are swapped, which flips the normalization's
/// direction so the brightest raw values land near `1.0` after
/// [`crate::normalization::normalize_log_image`] the same way a negative's
/// brightest (clearest) values would.
#[derive(Debug, Clone, Copy)]
pub struct SlideHeuristic {
    /// Low percentile used for both shadow and highlight measurement.
    pub low_p: f64,
    /// High percentile used for both shadow and highlight measurement.
    pub high_p: f64,
    /// When `true` (the default), the ceiling is linked across channels at
    /// the minimum shadow percentile, producing a shared white point instead
    /// of an independent one per channel.
    pub auto_stretch: bool,
}

impl Default for SlideHeuristic {
    fn default() -> Self {
        Self { low_p: 1.0, high_p: 99.5, auto_stretch: true }
    }
}

impl BoundsHeuristic for SlideHeuristic {
    fn calculate_bounds(&self, img_log: &FloatImage, roi: Option<Roi>) -> darkroom_core::Result<LogNegativeBounds> {
        let window = match roi {
            Some(roi) => img_log.crop(roi)?,
            None => img_log.clone(),
        };

        let mut raw_shadows = [0.0f32; 3];
        let mut raw_highlights = [0.0f32; 3];
        for c in 0..3 {
            let mut channel = extract_channel(window.data(), window.channels(), c);
            raw_shadows[c] = percentile(&mut channel, self.low_p);
            raw_highlights[c] = percentile(&mut channel, self.high_p);
        }

        let floors = raw_highlights;
        let ceils = if self.auto_stretch {
            let master_ceil = raw_shadows.iter().cloned().fold(f32::INFINITY, f32::min);
            [master_ceil; 3]
        } else {
            [floors[0] - 3.0, floors[1] - 3.0, floors[2] - 3.0]
        };

        Ok(LogNegativeBounds { floors, ceils })
    }
}

/// The heuristic a process mode uses by default.
pub fn heuristic_for_mode(mode: ProcessMode) -> Box<dyn BoundsHeuristic> {
    if mode.is_slide() {
        Box::new(SlideHeuristic::default())
    } else {
        Box::new(NegativeHeuristic)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn negative_heuristic_matches_direct_measurement() {
        let img = FloatImage::from_data(2, 2, 3, vec![0.1, 0.2, 0.3, 0.4, 0.5, 0.6, 0.7, 0.8, 0.9, 1.0, 0.5, 0.5])
            .unwrap();
        let direct = measure_log_negative_bounds(&img, None).unwrap();
        let via_heuristic = NegativeHeuristic.calculate_bounds(&img, None).unwrap();
        assert_eq!(direct, via_heuristic);
    }

    #[test]
    fn slide_heuristic_swaps_floor_and_ceiling_roles() {
        // Red channel ranges 0.2..0.8 uniformly across 100 samples.
        let mut data = Vec::new();
        for i in 0..100 {
            let r = 0.2 + 0.6 * (i as f32 / 99.0);
            data.extend_from_slice(&[r, r, r]);
        }
        let img = FloatImage::from_data(1, 100, 3, data).unwrap();
        let bounds = SlideHeuristic::default().calculate_bounds(&img, None).unwrap();
        // Floors (raw_highlights) should exceed ceils (raw_shadows) for an
        // increasing ramp, confirming the direction flip.
        assert!(bounds.floors[0] > bounds.ceils[0]);
    }

    #[test]
    fn heuristic_for_mode_dispatches_on_slide() {
        assert!(heuristic_for_mode(ProcessMode::C41).calculate_bounds(
            &FloatImage::new(2, 2, 3).unwrap(), None
        ).is_ok());
        assert!(heuristic_for_mode(ProcessMode::E6).calculate_bounds(
            &FloatImage::new(2, 2, 3).unwrap(), None
        ).is_ok());
    }
}
