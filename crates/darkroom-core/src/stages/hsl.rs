//! Per-hue HSL adjustment driven by the baked [`HueLuts`].

use crate::color::{hsl_to_rgb, rgb_to_hsl};
use crate::lut::HueLuts;

/// Pixels below this saturation are treated as achromatic and skipped.
pub const ACHROMATIC_THRESHOLD: f32 = 0.05;
/// Damping applied to saturation deltas.
pub const SATURATION_STRENGTH: f32 = 0.4;
/// Damping applied to luminance deltas.
pub const LUMINANCE_STRENGTH: f32 = 0.25;

/// Positive deltas move toward 1 by the remaining headroom; negative deltas
/// scale down multiplicatively.
#[inline]
pub fn shift_toward_bounds(value: f32, delta: f32, strength: f32) -> f32 {
    let out = if delta > 0.0 {
        value + (1.0 - value) * delta * strength
    } else {
        value * (1.0 + delta * strength)
    };
    out.clamp(0.0, 1.0)
}

pub fn apply_hsl(rgb: [f32; 3], luts: &HueLuts) -> [f32; 3] {
    let (h, s, l) = rgb_to_hsl(rgb);
    if s < ACHROMATIC_THRESHOLD {
        return rgb;
    }
    let (dh, ds, dl) = luts.lookup(h);
    if dh == 0.0 && ds == 0.0 && dl == 0.0 {
        return rgb;
    }
    hsl_to_rgb(
        h + dh,
        shift_toward_bounds(s, ds, SATURATION_STRENGTH),
        shift_toward_bounds(l, dl, LUMINANCE_STRENGTH),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::edit::ColorHsl;

    #[test]
    fn test_asymmetric_shift() {
        assert!((shift_toward_bounds(0.5, 1.0, 0.4) - 0.7).abs() < 1e-6);
        assert!((shift_toward_bounds(0.5, -1.0, 0.4) - 0.3).abs() < 1e-6);
        assert_eq!(shift_toward_bounds(0.5, 0.0, 0.4), 0.5);
        assert_eq!(shift_toward_bounds(1.0, 1.0, 0.4), 1.0);
    }

    #[test]
    fn test_achromatic_pixels_are_skipped() {
        let mut hsl = ColorHsl::default();
        hsl.red.luminance = 100.0;
        let luts = HueLuts::build(&hsl);
        let gray = [100.0, 100.0, 100.0];
        assert_eq!(apply_hsl(gray, &luts), gray);
    }

    #[test]
    fn test_bucket_only_touches_nearby_hues() {
        let mut hsl = ColorHsl::default();
        hsl.blue.saturation = -100.0;
        let luts = HueLuts::build(&hsl);

        let red = [200.0, 40.0, 40.0];
        assert_eq!(apply_hsl(red, &luts), red);

        let blue = [40.0, 60.0, 200.0];
        let out = apply_hsl(blue, &luts);
        let spread_before = blue[2] - blue[0];
        let spread_after = out[2] - out[0];
        assert!(
            spread_after < spread_before,
            "blue should desaturate: {spread_before} -> {spread_after}"
        );
    }

    #[test]
    fn test_luminance_lifts_bucket() {
        let mut hsl = ColorHsl::default();
        hsl.green.luminance = 100.0;
        let luts = HueLuts::build(&hsl);
        let out = apply_hsl([30.0, 150.0, 30.0], &luts);
        let (_, _, before) = rgb_to_hsl([30.0, 150.0, 30.0]);
        let (_, _, after) = rgb_to_hsl(out);
        // l + (1 - l) * 0.25
        assert!((after - (before + (1.0 - before) * 0.25)).abs() < 1e-2);
    }

    #[test]
    fn test_hue_shift_adds_degrees() {
        let mut hsl = ColorHsl::default();
        hsl.red.hue = 100.0;
        let luts = HueLuts::build(&hsl);
        let out = apply_hsl([255.0, 0.0, 0.0], &luts);
        let (after, _, _) = rgb_to_hsl(out);
        // red weighs 1 and orange 0.5 at 0°, so the average is 100 / 1.5
        assert!((after - 100.0 / 1.5).abs() < 0.5, "hue after shift: {after}");
    }
}
