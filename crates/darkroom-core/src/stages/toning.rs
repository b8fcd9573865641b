//! Luminance-gated toning: split toning, shadow tint, three-way grading and
//! channel calibration.
//!
//! Tone colors are generated at full saturation with the pixel's own HSL
//! lightness, so tinting changes hue and chroma without shifting brightness.

use crate::color::{clamp_channel, hsl_to_rgb, hue_distance, luminance, rgb_to_hsl};
use crate::edit::{ColorCalibration, ColorGrading, SplitToning};

/// Largest channel push of the shadow tint, reached on black pixels.
const SHADOW_TINT_SCALE: f32 = 20.0;
/// Luminance shift per unit of a grading luminance slider (±100 → ±0.5).
const GRADING_LUM_SCALE: f32 = 0.5;
/// Hue distance at which a calibration primary stops having influence.
const CALIBRATION_SPAN_DEGREES: f32 = 120.0;

/// Mix `rgb` toward `tone` by `strength` (0..1).
#[inline]
fn mix_toward(rgb: [f32; 3], tone: [f32; 3], strength: f32) -> [f32; 3] {
    let t = strength.clamp(0.0, 1.0);
    [
        clamp_channel(rgb[0] + (tone[0] - rgb[0]) * t),
        clamp_channel(rgb[1] + (tone[1] - rgb[1]) * t),
        clamp_channel(rgb[2] + (tone[2] - rgb[2]) * t),
    ]
}

/// Fully saturated `hue` at the lightness of `rgb`.
#[inline]
fn tone_color(rgb: [f32; 3], hue: f32) -> [f32; 3] {
    let (_, _, l) = rgb_to_hsl(rgb);
    hsl_to_rgb(hue, 1.0, l)
}

/// Luminance threshold between the shadow and highlight tones.
#[inline]
pub fn split_threshold(balance: f32) -> f32 {
    (balance + 100.0) / 200.0
}

pub fn split_toning(rgb: [f32; 3], toning: &SplitToning) -> [f32; 3] {
    let lum = luminance(rgb);
    let (hue, strength) = if lum < split_threshold(toning.balance) {
        (toning.shadow_hue, toning.shadow_saturation / 100.0 * (1.0 - lum))
    } else {
        (toning.highlight_hue, toning.highlight_saturation / 100.0 * lum)
    };
    if strength <= 0.0 {
        return rgb;
    }
    mix_toward(rgb, tone_color(rgb, hue), strength)
}

/// Push that fades out toward white: positive tint is (+R, -G, +B),
/// negative tint is (-R, -G, +B).
pub fn shadow_tint(rgb: [f32; 3], tint: f32) -> [f32; 3] {
    let amount = tint.abs() * (1.0 - luminance(rgb)) * SHADOW_TINT_SCALE;
    let red = if tint > 0.0 { amount } else { -amount };
    [
        clamp_channel(rgb[0] + red),
        clamp_channel(rgb[1] - amount),
        clamp_channel(rgb[2] + amount),
    ]
}

/// Shadow, midtone and highlight weights for a normalised luminance.
///
/// Shadows peak at black, highlights at white, midtones at 0.5; every
/// weight falls linearly to zero half a range away from its peak.
#[inline]
pub fn zone_weights(lum: f32) -> (f32, f32, f32) {
    let shadow = (1.0 - 2.0 * lum).max(0.0);
    let highlight = (2.0 * lum - 1.0).max(0.0);
    let midtone = (1.0 - (lum - 0.5).abs() * 2.0).max(0.0);
    (shadow, midtone, highlight)
}

pub fn color_grading(rgb: [f32; 3], grading: &ColorGrading) -> [f32; 3] {
    let (shadow_w, mid_w, highlight_w) = zone_weights(luminance(rgb));
    let shift = (grading.shadow_lum * shadow_w
        + grading.midtone_lum * mid_w
        + grading.highlight_lum * highlight_w
        + grading.global_lum)
        / 100.0
        * GRADING_LUM_SCALE
        * 255.0;
    let mut out = [
        clamp_channel(rgb[0] + shift),
        clamp_channel(rgb[1] + shift),
        clamp_channel(rgb[2] + shift),
    ];

    let blend = grading.blending / 100.0;
    let midtone_strength = grading.midtone_sat / 100.0 * mid_w * blend;
    if midtone_strength > 0.0 {
        out = mix_toward(out, tone_color(out, grading.midtone_hue), midtone_strength);
    }
    let global_strength = grading.global_sat / 100.0 * blend;
    if global_strength > 0.0 {
        out = mix_toward(out, tone_color(out, grading.global_hue), global_strength);
    }
    out
}

/// Red, green and blue influence of a hue, each peaking on its primary.
#[inline]
pub fn primary_weights(hue: f32) -> [f32; 3] {
    [0.0, 120.0, 240.0]
        .map(|center| (1.0 - hue_distance(hue, center) / CALIBRATION_SPAN_DEGREES).max(0.0))
}

/// Scale saturation by the weighted primary saturation sliders.
pub fn calibration(rgb: [f32; 3], calibration: &ColorCalibration) -> [f32; 3] {
    let (h, s, l) = rgb_to_hsl(rgb);
    if s <= 0.0 {
        return rgb;
    }
    let [wr, wg, wb] = primary_weights(h);
    let adjust = (wr * calibration.red_saturation
        + wg * calibration.green_saturation
        + wb * calibration.blue_saturation)
        / 100.0;
    hsl_to_rgb(h, (s * (1.0 + adjust)).clamp(0.0, 1.0), l)
}
