//! Tone-curve evaluation and 1D LUT baking.
//!
//! Curves are evaluated with piecewise-linear interpolation between
//! control points, so an unmodified curve is always monotonic. Inputs
//! outside the first/last point clamp to that endpoint's `y`.
//!
//! The master (RGB) curve and each channel curve are composed (master
//! first) and the result is blended with the unfiltered input at
//! [`CURVE_STRENGTH`], which keeps aggressive curves from overshooting.

use crate::color::clamp8;
use crate::edit::{ChannelCurves, CurvePoint, ToneCurve};
use crate::lut::{LUT_SIZE, Lut};

/// Fraction of the composed curve mixed into the output.
pub const CURVE_STRENGTH: f32 = 0.6;

/// Evaluate a sorted point sequence at `x` with linear interpolation.
///
/// Returns `x` (identity) if fewer than 2 control points.
pub fn eval_curve_linear(points: &[CurvePoint], x: f32) -> f32 {
    if points.len() < 2 {
        return x;
    }
    let first = points[0];
    if x <= first.x {
        return first.y;
    }
    let last = points[points.len() - 1];
    if x >= last.x {
        return last.y;
    }
    for pair in points.windows(2) {
        let (a, b) = (pair[0], pair[1]);
        if x >= a.x && x <= b.x {
            let span = b.x - a.x;
            if span.abs() < 1e-6 {
                return b.y;
            }
            let frac = (x - a.x) / span;
            return a.y + frac * (b.y - a.y);
        }
    }
    last.y
}

/// Bake a single curve into a 256-entry table at full strength.
///
/// Malformed curves (fewer than two points) bake to identity; unsorted
/// points are sorted first.
pub fn build_curve_lut(curve: &ToneCurve) -> Lut {
    let curve = curve.sanitized();
    let mut lut = [0u8; LUT_SIZE];
    for (i, entry) in lut.iter_mut().enumerate() {
        *entry = clamp8(eval_curve_linear(&curve.points, i as f32));
    }
    lut
}

/// Bake the per-channel curve tables: master then channel, blended at
/// [`CURVE_STRENGTH`] with the input level.
pub fn build_channel_curve_luts(curves: &ChannelCurves) -> [Lut; 3] {
    let curves = curves.sanitized();
    std::array::from_fn(|c| {
        let channel = curves.channel(c);
        let mut lut = [0u8; LUT_SIZE];
        for (i, entry) in lut.iter_mut().enumerate() {
            let input = i as f32;
            let master = eval_curve_linear(&curves.rgb.points, input);
            let composed = eval_curve_linear(&channel.points, master);
            *entry = clamp8(input + (composed - input) * CURVE_STRENGTH);
        }
        lut
    })
}
