//! Linear per-pixel color stages.
//!
//! These depend on more than one channel of the pixel (gray level, channel
//! spread) so they cannot be folded into the per-channel tone tables.

use crate::color::{clamp_channel, gray, hsl_to_rgb, rgb_to_hsl};

/// Channel push per unit of temperature.
const TEMPERATURE_SCALE: f32 = 30.0;
/// Vibrance gain at zero existing saturation.
const VIBRANCE_SCALE: f32 = 1.5;
/// Contrast part of dehaze.
const DEHAZE_CONTRAST: f32 = 0.5;
/// Saturation part of dehaze.
const DEHAZE_SATURATION: f32 = 0.3;

#[inline]
fn map(rgb: [f32; 3], f: impl Fn(f32) -> f32) -> [f32; 3] {
    [
        clamp_channel(f(rgb[0])),
        clamp_channel(f(rgb[1])),
        clamp_channel(f(rgb[2])),
    ]
}

/// Blend every channel away from (or toward) the pixel's gray level.
#[inline]
pub fn blend_from_gray(rgb: [f32; 3], factor: f32) -> [f32; 3] {
    let g = gray(rgb);
    map(rgb, |c| g + (c - g) * factor)
}

/// Warm/cool push: red up and blue down for positive temperature.
pub fn temperature(rgb: [f32; 3], temperature: f32) -> [f32; 3] {
    let shift = temperature * TEMPERATURE_SCALE;
    [
        clamp_channel(rgb[0] + shift),
        clamp_channel(rgb[1]),
        clamp_channel(rgb[2] - shift),
    ]
}

/// Rotate the pixel hue by `degrees`.
pub fn hue_rotate(rgb: [f32; 3], degrees: f32) -> [f32; 3] {
    let (h, s, l) = rgb_to_hsl(rgb);
    if s <= 0.0 {
        return rgb;
    }
    hsl_to_rgb(h + degrees, s, l)
}

pub fn saturation(rgb: [f32; 3], saturation: f32) -> [f32; 3] {
    blend_from_gray(rgb, 1.0 + saturation)
}

/// Saturation boost weighted against the pixel's existing saturation, so
/// muted colors move more than vivid ones.
pub fn vibrance(rgb: [f32; 3], vibrance: f32) -> [f32; 3] {
    let max = rgb[0].max(rgb[1]).max(rgb[2]);
    let min = rgb[0].min(rgb[1]).min(rgb[2]);
    let sat = if max > 0.0 { (max - min) / max } else { 0.0 };
    blend_from_gray(rgb, 1.0 + vibrance * VIBRANCE_SCALE * (1.0 - sat))
}

/// Contrast boost around mid gray followed by a saturation boost.
pub fn dehaze(rgb: [f32; 3], dehaze: f32) -> [f32; 3] {
    let k = 1.0 + dehaze * DEHAZE_CONTRAST;
    let contrasted = map(rgb, |c| 128.0 + (c - 128.0) * k);
    blend_from_gray(contrasted, 1.0 + dehaze * DEHAZE_SATURATION)
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 1e-2;

    fn assert_rgb_eq(actual: [f32; 3], expected: [f32; 3]) {
        for i in 0..3 {
            assert!(
                (actual[i] - expected[i]).abs() < EPSILON,
                "channel {i}: expected {:.4}, got {:.4}",
                expected[i],
                actual[i]
            );
        }
    }

    #[test]
    fn test_temperature_pushes_red_and_blue() {
        assert_rgb_eq(temperature([100.0, 100.0, 100.0], 1.0), [130.0, 100.0, 70.0]);
        assert_rgb_eq(temperature([100.0, 100.0, 100.0], -0.5), [85.0, 100.0, 115.0]);
        assert_rgb_eq(temperature([250.0, 0.0, 10.0], 1.0), [255.0, 0.0, 0.0]);
    }

    #[test]
    fn test_full_desaturation_yields_gray() {
        let out = saturation([200.0, 100.0, 50.0], -1.0);
        let g = 0.299 * 200.0 + 0.587 * 100.0 + 0.114 * 50.0;
        assert_rgb_eq(out, [g, g, g]);
    }

    #[test]
    fn test_saturation_leaves_gray_alone() {
        assert_rgb_eq(saturation([90.0, 90.0, 90.0], 1.0), [90.0, 90.0, 90.0]);
        assert_rgb_eq(vibrance([90.0, 90.0, 90.0], 1.0), [90.0, 90.0, 90.0]);
    }

    #[test]
    fn test_vibrance_spares_saturated_pixels() {
        // Fully saturated red: sat = 1, so vibrance has no effect.
        assert_rgb_eq(vibrance([255.0, 0.0, 0.0], 1.0), [255.0, 0.0, 0.0]);

        let muted = [140.0, 120.0, 110.0];
        let boosted = vibrance(muted, 1.0);
        let plain = saturation(muted, 1.0);
        assert!(boosted[0] - boosted[2] > plain[0] - plain[2]);
    }

    #[test]
    fn test_hue_rotate_moves_primaries() {
        let out = hue_rotate([255.0, 0.0, 0.0], 120.0);
        assert_rgb_eq(out, [0.0, 255.0, 0.0]);
        assert_rgb_eq(hue_rotate([60.0, 60.0, 60.0], 90.0), [60.0, 60.0, 60.0]);
    }

    #[test]
    fn test_dehaze_expands_contrast() {
        let out = dehaze([64.0, 64.0, 64.0], 1.0);
        assert_rgb_eq(out, [32.0, 32.0, 32.0]);
        let out = dehaze([64.0, 64.0, 64.0], -1.0);
        assert_rgb_eq(out, [96.0, 96.0, 96.0]);
    }
}
