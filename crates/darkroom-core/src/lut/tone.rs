//! Per-level light adjustments baked into 256-entry tables.
//!
//! Every function here maps a channel level to a new level independently
//! of the other channels, so each can be pre-baked once per edit state.

use std::f32::consts::PI;

use crate::color::clamp8;
use crate::lut::{LUT_SIZE, Lut};

fn bake(f: impl Fn(f32) -> f32) -> Lut {
    let mut lut = [0u8; LUT_SIZE];
    for (i, entry) in lut.iter_mut().enumerate() {
        *entry = clamp8(f(i as f32));
    }
    lut
}

/// `out = in × 2^exposure`.
pub fn exposure_lut(exposure: f32) -> Lut {
    let gain = 2.0_f32.powf(exposure);
    bake(|v| v * gain)
}

/// Evaluate the tonal-zone rules on a normalised level.
///
/// Rules run in sequence and are cumulative: a level near 0.5 is touched
/// by both the shadows and the highlights rule. Each rule's mask fades to
/// zero at its region boundary.
pub fn tonal_zone(v: f32, highlights: f32, shadows: f32, whites: f32, blacks: f32) -> f32 {
    let mut v = v;
    if v < 0.25 {
        v += blacks * 0.5 * (0.25 - v);
    }
    if v < 0.5 {
        v += shadows * 0.4 * (v * PI).sin() * (0.5 - v);
    }
    if v > 0.5 {
        v += highlights * 0.3 * ((v - 0.5) * PI).sin() * (v - 0.5);
    }
    if v > 0.75 {
        v += whites * 0.5 * (v - 0.75);
    }
    v
}

/// Highlights/shadows/whites/blacks as one table shared by all channels.
pub fn tonal_lut(highlights: f32, shadows: f32, whites: f32, blacks: f32) -> Lut {
    bake(|level| tonal_zone(level / 255.0, highlights, shadows, whites, blacks) * 255.0)
}

/// Midtone contrast around 0.5.
pub fn clarity_lut(clarity: f32) -> Lut {
    let k = 1.0 + clarity * 0.5;
    bake(|level| (0.5 + (level / 255.0 - 0.5) * k) * 255.0)
}

/// `out = in × (1 + brightness)`.
pub fn brightness_lut(brightness: f32) -> Lut {
    let k = 1.0 + brightness;
    bake(|v| v * k)
}

/// `out = 128 + (in − 128) × (1 + contrast)`.
pub fn contrast_lut(contrast: f32) -> Lut {
    let k = 1.0 + contrast;
    bake(|v| 128.0 + (v - 128.0) * k)
}
