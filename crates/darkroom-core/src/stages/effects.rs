//! Position-dependent and whole-image effects: vignette, grain, legacy
//! filters and box blur.
//!
//! Grain uses an integer hash of the pixel position instead of a random
//! generator so the GPU shader can reproduce the exact same pattern.

use glam::Vec2;

use crate::buffer::{CHANNELS, PixelBuffer};
use crate::color::{clamp8, clamp_channel, gray};
use crate::edit::LegacyFilter;

/// Grain amplitude in channel levels at `grain = 1`.
pub const GRAIN_SCALE: f32 = 50.0;
/// Seed for the grain hash; shared with the shader.
pub const GRAIN_SEED: u32 = 0x9e37_79b9;
/// Seed offset for the per-pixel noise mixed into clumped grain.
const ROUGHNESS_SEED: u32 = 0x68bc_21eb;
/// Largest box blur radius in pixels.
pub const MAX_BLUR_RADIUS: u32 = 10;

const SEPIA: [[f32; 3]; 3] = [
    [0.393, 0.769, 0.189],
    [0.349, 0.686, 0.168],
    [0.272, 0.534, 0.131],
];

// ── Vignette ────────────────────────────────────────────────────

/// Image center in pixel coordinates.
#[inline]
pub fn vignette_center(width: u32, height: u32) -> Vec2 {
    Vec2::new(
        (width.max(1) - 1) as f32 / 2.0,
        (height.max(1) - 1) as f32 / 2.0,
    )
}

/// Brightness multiplier for pixel `(x, y)`.
///
/// Squared distance from the center is normalised by the squared corner
/// distance, so corners fall off by exactly `amount`.
pub fn vignette_factor(x: u32, y: u32, center: Vec2, amount: f32) -> f32 {
    let max_dist_sq = center.length_squared();
    if max_dist_sq <= 0.0 {
        return 1.0;
    }
    let dist_sq = (Vec2::new(x as f32, y as f32) - center).length_squared() / max_dist_sq;
    (1.0 - dist_sq * amount).max(0.0)
}

#[inline]
pub fn vignette(rgb: [f32; 3], factor: f32) -> [f32; 3] {
    rgb.map(|c| clamp_channel(c * factor))
}

// ── Grain ───────────────────────────────────────────────────────

/// 32-bit integer hash of a pixel position.
#[inline]
pub fn grain_hash(x: u32, y: u32, seed: u32) -> u32 {
    let mut h = x.wrapping_mul(0x8da6_b343)
        ^ y.wrapping_mul(0xd816_3841)
        ^ seed.wrapping_mul(0xcb1a_b31f);
    h ^= h >> 16;
    h = h.wrapping_mul(0x7feb_352d);
    h ^= h >> 15;
    h = h.wrapping_mul(0x846c_a68b);
    h ^= h >> 16;
    h
}

/// Hash mapped to `[0, 1)` using its top 24 bits.
#[inline]
pub fn grain_unit(x: u32, y: u32, seed: u32) -> f32 {
    (grain_hash(x, y, seed) >> 8) as f32 / 16_777_216.0
}

/// Side length of a grain cell: 1 px at size 0, up to 5 px at size 100.
#[inline]
pub fn grain_cell_size(grain_size: f32) -> u32 {
    1 + (grain_size.max(0.0) / 25.0).floor() as u32
}

/// Monochrome grain offset for pixel `(x, y)` in channel levels.
pub fn grain_noise(x: u32, y: u32, grain: f32, grain_size: f32, roughness: f32) -> f32 {
    let cell = grain_cell_size(grain_size);
    let mut r = grain_unit(x / cell, y / cell, GRAIN_SEED);
    if cell > 1 {
        let fine = grain_unit(x, y, GRAIN_SEED ^ ROUGHNESS_SEED);
        r += (fine - r) * (roughness / 100.0);
    }
    (r - 0.5) * grain * GRAIN_SCALE
}

#[inline]
pub fn add_grain(rgb: [f32; 3], noise: f32) -> [f32; 3] {
    rgb.map(|c| clamp_channel(c + noise))
}

// ── Legacy filters ──────────────────────────────────────────────

pub fn legacy_filter(rgb: [f32; 3], filter: LegacyFilter) -> [f32; 3] {
    match filter {
        LegacyFilter::Grayscale => {
            let g = gray(rgb);
            [g, g, g]
        }
        LegacyFilter::Sepia => SEPIA.map(|row| {
            clamp_channel(row[0] * rgb[0] + row[1] * rgb[1] + row[2] * rgb[2])
        }),
        LegacyFilter::Invert => rgb.map(|c| 255.0 - c),
    }
}

// ── Blur ────────────────────────────────────────────────────────

/// Box radius for a blur setting, clamped to [`MAX_BLUR_RADIUS`].
#[inline]
pub fn blur_radius(blur: f32) -> u32 {
    if blur.is_nan() || blur <= 0.0 {
        return 0;
    }
    (blur.round() as u32).min(MAX_BLUR_RADIUS)
}

/// Separable box blur with edge pixels repeated past the border.
pub fn box_blur(pixels: &PixelBuffer, radius: u32) -> PixelBuffer {
    let mut out = pixels.clone();
    if radius == 0 || pixels.pixel_count() == 0 {
        return out;
    }
    let w = pixels.width() as usize;
    let h = pixels.height() as usize;
    let r = radius as isize;
    let taps = (2 * radius + 1) as f32;
    let src = pixels.as_bytes();

    let mut horizontal = vec![0.0_f32; src.len()];
    for y in 0..h {
        for x in 0..w {
            for c in 0..CHANNELS {
                let mut sum = 0.0;
                for dx in -r..=r {
                    let sx = (x as isize + dx).clamp(0, w as isize - 1) as usize;
                    sum += src[(y * w + sx) * CHANNELS + c] as f32;
                }
                horizontal[(y * w + x) * CHANNELS + c] = sum / taps;
            }
        }
    }

    let dst = out.as_bytes_mut();
    for y in 0..h {
        for x in 0..w {
            for c in 0..CHANNELS {
                let mut sum = 0.0;
                for dy in -r..=r {
                    let sy = (y as isize + dy).clamp(0, h as isize - 1) as usize;
                    sum += horizontal[(sy * w + x) * CHANNELS + c];
                }
                dst[(y * w + x) * CHANNELS + c] = clamp8(sum / taps);
            }
        }
    }
    out
}
