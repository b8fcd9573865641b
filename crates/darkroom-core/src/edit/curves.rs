//! Tone curve control points.

use serde::{Deserialize, Serialize};

/// A control point on a tone curve, both axes in 0..255.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CurvePoint {
    pub x: f32,
    pub y: f32,
}

impl_bitwise_hash!(CurvePoint { floats: [x, y] });

impl CurvePoint {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// An ordered sequence of control points.
///
/// The identity curve is exactly `[(0,0), (255,255)]`.
#[derive(Debug, Clone, PartialEq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ToneCurve {
    pub points: Vec<CurvePoint>,
}

impl ToneCurve {
    /// The identity curve `[(0,0), (255,255)]`.
    pub fn identity() -> Self {
        Self {
            points: vec![CurvePoint::new(0.0, 0.0), CurvePoint::new(255.0, 255.0)],
        }
    }

    pub fn from_points(points: &[(f32, f32)]) -> Self {
        Self {
            points: points.iter().map(|&(x, y)| CurvePoint::new(x, y)).collect(),
        }
    }

    /// A curve is modified iff it has more than two points or its
    /// endpoints moved away from `(0,0)` / `(255,255)`.
    pub fn is_modified(&self) -> bool {
        match self.points.as_slice() {
            [first, last] => {
                *first != CurvePoint::new(0.0, 0.0) || *last != CurvePoint::new(255.0, 255.0)
            }
            _ => true,
        }
    }

    /// Repair the curve so the LUT builder can rely on it.
    ///
    /// Fewer than two points fall back to identity; coordinates are clamped
    /// to 0..255, non-finite points are dropped, and points are sorted by `x`.
    pub fn sanitized(&self) -> Self {
        let mut points: Vec<CurvePoint> = self
            .points
            .iter()
            .filter(|p| p.x.is_finite() && p.y.is_finite())
            .map(|p| CurvePoint::new(p.x.clamp(0.0, 255.0), p.y.clamp(0.0, 255.0)))
            .collect();
        if points.len() < 2 {
            return Self::identity();
        }
        points.sort_by(|a, b| a.x.total_cmp(&b.x));
        Self { points }
    }
}

impl Default for ToneCurve {
    fn default() -> Self {
        Self::identity()
    }
}

/// Master and per-channel curves.
#[derive(Debug, Clone, Default, PartialEq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct ChannelCurves {
    pub rgb: ToneCurve,
    pub red: ToneCurve,
    pub green: ToneCurve,
    pub blue: ToneCurve,
}

impl ChannelCurves {
    pub fn is_modified(&self) -> bool {
        self.rgb.is_modified()
            || self.red.is_modified()
            || self.green.is_modified()
            || self.blue.is_modified()
    }

    pub fn sanitized(&self) -> Self {
        Self {
            rgb: self.rgb.sanitized(),
            red: self.red.sanitized(),
            green: self.green.sanitized(),
            blue: self.blue.sanitized(),
        }
    }

    /// The per-channel curve for channel index 0 (R), 1 (G) or 2 (B).
    pub fn channel(&self, index: usize) -> &ToneCurve {
        match index {
            0 => &self.red,
            1 => &self.green,
            _ => &self.blue,
        }
    }
}
