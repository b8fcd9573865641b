//! Hue-indexed delta tables for the eight-bucket HSL panel.
//!
//! Each bucket influences nearby hues through a triangular weight: full
//! influence within 15° of its center, fading linearly to zero at 45°.
//! For every integer hue degree the bucket sliders are averaged by weight,
//! giving three 360-entry tables built once per edit state.

use crate::color::{hue_distance, wrap_hue};
use crate::edit::{ColorHsl, HueBucket};

/// Number of hue entries (one per degree).
pub const HUE_LUT_SIZE: usize = 360;

/// Distance from a center with full influence.
const FULL_WEIGHT_DEGREES: f32 = 15.0;
/// Distance from a center where influence reaches zero.
const ZERO_WEIGHT_DEGREES: f32 = 45.0;

/// Triangular influence of a hue center on `hue`.
pub fn hue_weight(hue: f32, center: f32) -> f32 {
    let d = hue_distance(hue, center);
    if d <= FULL_WEIGHT_DEGREES {
        1.0
    } else if d >= ZERO_WEIGHT_DEGREES {
        0.0
    } else {
        (ZERO_WEIGHT_DEGREES - d) / (ZERO_WEIGHT_DEGREES - FULL_WEIGHT_DEGREES)
    }
}

/// Weighted-average HSL deltas per hue degree.
#[derive(Debug, Clone, PartialEq)]
pub struct HueLuts {
    /// Hue shift in degrees, added directly to the pixel hue.
    pub hue: [f32; HUE_LUT_SIZE],
    /// Saturation delta in -1..1 (slider / 100).
    pub saturation: [f32; HUE_LUT_SIZE],
    /// Luminance delta in -1..1 (slider / 100).
    pub luminance: [f32; HUE_LUT_SIZE],
}

impl HueLuts {
    /// All-zero tables, used when the HSL stage is inactive.
    pub fn neutral() -> Self {
        Self {
            hue: [0.0; HUE_LUT_SIZE],
            saturation: [0.0; HUE_LUT_SIZE],
            luminance: [0.0; HUE_LUT_SIZE],
        }
    }

    pub fn build(hsl: &ColorHsl) -> Self {
        let mut luts = Self::neutral();
        for degree in 0..HUE_LUT_SIZE {
            let h = degree as f32;
            let mut total = 0.0_f32;
            let mut hue = 0.0_f32;
            let mut sat = 0.0_f32;
            let mut lum = 0.0_f32;
            for bucket in HueBucket::ALL {
                let w = hue_weight(h, bucket.center());
                if w <= 0.0 {
                    continue;
                }
                let adj = hsl.get(bucket);
                total += w;
                hue += w * adj.hue;
                sat += w * adj.saturation;
                lum += w * adj.luminance;
            }
            if total > 0.0 {
                luts.hue[degree] = hue / total;
                luts.saturation[degree] = sat / total / 100.0;
                luts.luminance[degree] = lum / total / 100.0;
            }
        }
        luts
    }

    /// Deltas for a pixel hue, looked up by rounded degree.
    pub fn lookup(&self, hue: f32) -> (f32, f32, f32) {
        let idx = wrap_hue(hue.round()) as usize % HUE_LUT_SIZE;
        (self.hue[idx], self.saturation[idx], self.luminance[idx])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 1e-5;

    #[test]
    fn test_weight_shape() {
        for bucket in HueBucket::ALL {
            let c = bucket.center();
            assert!((hue_weight(c, c) - 1.0).abs() < EPSILON, "{bucket:?} at center");
            assert!((hue_weight(c + 15.0, c) - 1.0).abs() < EPSILON);
            assert!((hue_weight(c + 30.0, c) - 0.5).abs() < EPSILON, "{bucket:?} at 30°");
            assert!((hue_weight(c - 30.0, c) - 0.5).abs() < EPSILON);
            assert_eq!(hue_weight(c + 45.0, c), 0.0);
            assert_eq!(hue_weight(c + 90.0, c), 0.0);
        }
    }

    #[test]
    fn test_weight_wraps_around_zero() {
        assert!((hue_weight(350.0, 0.0) - 1.0).abs() < EPSILON);
        assert!((hue_weight(330.0, 0.0) - 0.5).abs() < EPSILON);
    }

    #[test]
    fn test_neutral_panel_builds_zero_tables() {
        let luts = HueLuts::build(&ColorHsl::default());
        assert_eq!(luts, HueLuts::neutral());
        assert!(luts.hue.iter().all(|&v| v == 0.0));
        assert!(luts.saturation.iter().all(|&v| v == 0.0));
        assert!(luts.luminance.iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_single_bucket_dominates_its_center() {
        let mut hsl = ColorHsl::default();
        hsl.green.saturation = -100.0;
        hsl.green.hue = 50.0;
        let luts = HueLuts::build(&hsl);
        assert!((luts.saturation[120] + 1.0).abs() < EPSILON);
        assert!((luts.hue[120] - 50.0).abs() < EPSILON);
        // Far away hues are untouched.
        assert_eq!(luts.saturation[240], 0.0);
        // Halfway to aqua both buckets weigh 0.5, so the average halves.
        assert!((luts.saturation[150] + 0.5).abs() < EPSILON);
    }

    #[test]
    fn test_lookup_rounds_and_wraps() {
        let mut hsl = ColorHsl::default();
        hsl.red.luminance = 100.0;
        let luts = HueLuts::build(&hsl);
        let (_, _, lum) = luts.lookup(359.6);
        assert_eq!(lum, luts.luminance[0]);
        // Red weighs 1 and orange 0.5 at 0°.
        assert!((lum - 1.0 / 1.5).abs() < EPSILON);
    }
}
