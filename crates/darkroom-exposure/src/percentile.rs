//! Percentile computation over a single image channel.

/// Linear-interpolated percentile, matching `numpy.percentile`'s default
/// (`linear`) interpolation method.
///
/// `p` is in `[0, 100]`. `values` is consumed by sorting; callers that need
/// the original order should pass a clone.
pub fn percentile(values: &mut [f32], p: f64) -> f32 {
    assert!(!values.is_empty(), "percentile of an empty slice is undefined");
    values.sort_unstable_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

    if values.len() == 1 {
        return values[0];
    }

    let rank = (p / 100.0) * (values.len() - 1) as f64;
    let lo = rank.floor() as usize;
    let hi = rank.ceil() as usize;
    if lo == hi {
        return values[lo];
    }
    let frac = (rank - lo as f64) as f32;
    values[lo] + (values[hi] - values[lo]) * frac
}

/// Extracts channel `c` of an interleaved `width x height x channels` buffer.
pub fn extract_channel(data: &[f32], channels: u8, c: usize) -> Vec<f32> {
    let channels = channels as usize;
    data.iter().skip(c).step_by(channels).copied().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percentile_of_sorted_range() {
        let mut v: Vec<f32> = (0..=100).map(|i| i as f32).collect();
        assert!((percentile(&mut v, 0.0) - 0.0).abs() < 1e-6);
        assert!((percentile(&mut v, 100.0) - 100.0).abs() < 1e-6);
        assert!((percentile(&mut v, 50.0) - 50.0).abs() < 1e-6);
    }

    #[test]
    fn percentile_interpolates_between_ranks() {
        let mut v = vec![1.0, 2.0, 3.0, 4.0];
        // rank = 0.5 * 3 = 1.5 -> between index 1 (2.0) and 2 (3.0)
        assert!((percentile(&mut v, 50.0) - 2.5).abs() < 1e-6);
    }

    #[test]
    fn extract_channel_strides_correctly() {
        let data = [1.0, 10.0, 100.0, 2.0, 20.0, 200.0];
        assert_eq!(extract_channel(&data, 3, 0), vec![1.0, 2.0]);
        assert_eq!(extract_channel(&data, 3, 2), vec![100.0, 200.0]);
    }
}
