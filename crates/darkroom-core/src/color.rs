//! Shared color helpers: luminance, clamping, and HSL conversion.
//!
//! Channel values inside the pipeline are `f32` in the 0..255 range so every
//! stage shares one scale with the 8-bit source and the GPU shader.

use palette::{Hsl, IntoColor, Srgb};

/// Rec. 601 luma weights used by every gray/luminance computation.
pub const LUMA_REC601: [f32; 3] = [0.299, 0.587, 0.114];

/// Weighted gray level of a pixel, same scale as the input.
#[inline]
pub fn gray(rgb: [f32; 3]) -> f32 {
    rgb[0] * LUMA_REC601[0] + rgb[1] * LUMA_REC601[1] + rgb[2] * LUMA_REC601[2]
}

/// Normalised luminance in 0..1 for a 0..255 pixel.
#[inline]
pub fn luminance(rgb: [f32; 3]) -> f32 {
    gray(rgb) / 255.0
}

/// Clamp a channel value into the 8-bit range without rounding.
#[inline]
pub fn clamp_channel(v: f32) -> f32 {
    v.clamp(0.0, 255.0)
}

/// Round and clamp a channel value into a byte.
#[inline]
pub fn clamp8(v: f32) -> u8 {
    if v.is_nan() {
        return 0;
    }
    v.round().clamp(0.0, 255.0) as u8
}

/// Convert a 0..255 pixel to `(hue°, saturation, lightness)`.
///
/// Hue is in `[0, 360)`; saturation and lightness are in 0..1.
/// Achromatic pixels report hue 0.
pub fn rgb_to_hsl(rgb: [f32; 3]) -> (f32, f32, f32) {
    let hsl: Hsl = Srgb::new(rgb[0] / 255.0, rgb[1] / 255.0, rgb[2] / 255.0).into_color();
    let hue = hsl.hue.into_positive_degrees();
    let hue = if hue >= 360.0 { hue - 360.0 } else { hue };
    (hue, hsl.saturation, hsl.lightness)
}

/// Convert `(hue°, saturation, lightness)` back to a 0..255 pixel.
pub fn hsl_to_rgb(hue: f32, saturation: f32, lightness: f32) -> [f32; 3] {
    let hsl: Hsl = Hsl::new(
        wrap_hue(hue),
        saturation.clamp(0.0, 1.0),
        lightness.clamp(0.0, 1.0),
    );
    let rgb: Srgb = hsl.into_color();
    [
        clamp_channel(rgb.red * 255.0),
        clamp_channel(rgb.green * 255.0),
        clamp_channel(rgb.blue * 255.0),
    ]
}

/// Wrap a hue in degrees into `[0, 360)`.
#[inline]
pub fn wrap_hue(hue: f32) -> f32 {
    let h = hue.rem_euclid(360.0);
    if h >= 360.0 { 0.0 } else { h }
}

/// Shortest angular distance between two hues, in degrees (0..=180).
#[inline]
pub fn hue_distance(a: f32, b: f32) -> f32 {
    let d = (a - b).rem_euclid(360.0);
    d.min(360.0 - d)
}
