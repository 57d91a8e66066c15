//! Named paper substrate profiles and the physical tint/D-max simulation
//! (`spec.md` §4.6 "Paper substrate").

use darkroom_core::FloatImage;

/// A photographic paper substrate: how it tints reflected light and how
/// much it deepens shadow density.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PaperProfile {
    /// RGB reflectance tint multiplied into the image.
    pub tint: [f32; 3],
    /// Power-curve exponent deepening (or lifting) shadow density.
    pub dmax_boost: f32,
}

/// No substrate simulation: neutral tint, no D-max boost.
pub const NONE: PaperProfile = PaperProfile { tint: [1.0, 1.0, 1.0], dmax_boost: 1.0 };
/// A nearly neutral resin-coated paper.
pub const NEUTRAL_RC: PaperProfile = PaperProfile { tint: [0.99, 0.99, 0.99], dmax_boost: 1.0 };
/// A glossy paper with a faint cool (blue) cast.
pub const COOL_GLOSSY: PaperProfile = PaperProfile { tint: [0.98, 0.99, 1.02], dmax_boost: 1.1 };
/// A fiber-base paper with a warm cast and deep blacks.
pub const WARM_FIBER: PaperProfile = PaperProfile { tint: [1.0, 0.97, 0.92], dmax_boost: 1.15 };
/// An aged ivory-toned fiber paper.
pub const ANTIQUE_IVORY: PaperProfile = PaperProfile { tint: [0.98, 0.94, 0.88], dmax_boost: 1.05 };

/// Looks up a paper profile by name, falling back to [`NONE`] for unknown
/// names rather than failing the pipeline over a typo'd config string.
pub fn lookup(name: &str) -> PaperProfile {
    match name {
        "Neutral RC" => NEUTRAL_RC,
        "Cool Glossy" => COOL_GLOSSY,
        "Warm Fiber" => WARM_FIBER,
        "Antique Ivory" => ANTIQUE_IVORY,
        _ => NONE,
    }
}

/// Simulates light reflecting through the developed image off a paper
/// substrate: tint multiply, then a D-max power curve that deepens (or
/// lifts) shadow density.
#[tracing::instrument(skip(img))]
pub fn simulate_paper_substrate(img: &FloatImage, profile_name: &str) -> FloatImage {
    let profile = lookup(profile_name);
    if profile.tint == NONE.tint && profile.dmax_boost == NONE.dmax_boost {
        return img.clone();
    }

    let channels = img.channels() as usize;
    let data: Vec<f32> = img
        .data()
        .chunks_exact(channels)
        .flat_map(|px| {
            (0..channels).map(|c| {
                let tinted = px[c] * profile.tint[c.min(2)];
                let boosted = if profile.dmax_boost != 1.0 {
                    tinted.max(0.0).powf(profile.dmax_boost)
                } else {
                    tinted
                };
                boosted.clamp(0.0, 1.0)
            })
        })
        .collect();

    FloatImage::from_data(img.height(), img.width(), img.channels(), data).expect("same shape as input")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn none_profile_is_a_no_op() {
        let img = FloatImage::from_data(2, 2, 3, vec![0.5; 2 * 2 * 3]).unwrap();
        let out = simulate_paper_substrate(&img, "None");
        assert_eq!(out.data(), img.data());
    }

    #[test]
    fn unknown_profile_falls_back_to_none() {
        let img = FloatImage::from_data(1, 1, 3, vec![0.4, 0.5, 0.6]).unwrap();
        let out = simulate_paper_substrate(&img, "Nonexistent Paper");
        assert_eq!(out.data(), img.data());
    }

    #[test]
    fn warm_fiber_tints_and_deepens_shadows() {
        let img = FloatImage::from_data(1, 1, 3, vec![0.5, 0.5, 0.5]).unwrap();
        let out = simulate_paper_substrate(&img, "Warm Fiber");
        let d = out.data();
        assert!(d[2] < d[0], "blue channel should be tinted down relative to red");
        assert!(d[0] < 0.5, "dmax_boost > 1 should deepen a mid grey");
    }
}
