//! Color parameter groups: per-hue HSL, split toning, grading, calibration.

use serde::{Deserialize, Serialize};

/// The eight named hue buckets of the HSL panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HueBucket {
    Red,
    Orange,
    Yellow,
    Green,
    Aqua,
    Blue,
    Purple,
    Magenta,
}

impl HueBucket {
    /// All buckets, in hue order.
    pub const ALL: [Self; 8] = [
        Self::Red,
        Self::Orange,
        Self::Yellow,
        Self::Green,
        Self::Aqua,
        Self::Blue,
        Self::Purple,
        Self::Magenta,
    ];

    /// Anchor hue of the bucket in degrees.
    pub const fn center(self) -> f32 {
        match self {
            Self::Red => 0.0,
            Self::Orange => 30.0,
            Self::Yellow => 60.0,
            Self::Green => 120.0,
            Self::Aqua => 180.0,
            Self::Blue => 225.0,
            Self::Purple => 270.0,
            Self::Magenta => 315.0,
        }
    }
}

/// Hue/saturation/luminance sliders for one bucket, each -100..100.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HslAdjustment {
    pub hue: f32,
    pub saturation: f32,
    pub luminance: f32,
}

impl_bitwise_hash!(HslAdjustment { floats: [hue, saturation, luminance] });

impl HslAdjustment {
    pub fn is_neutral(&self) -> bool {
        self.hue == 0.0 && self.saturation == 0.0 && self.luminance == 0.0
    }

    pub(crate) fn sanitized(&self) -> Self {
        Self {
            hue: clamp(self.hue, -100.0, 100.0),
            saturation: clamp(self.saturation, -100.0, 100.0),
            luminance: clamp(self.luminance, -100.0, 100.0),
        }
    }
}

/// Per-bucket HSL adjustments.
#[derive(Debug, Clone, Copy, Default, PartialEq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct ColorHsl {
    pub red: HslAdjustment,
    pub orange: HslAdjustment,
    pub yellow: HslAdjustment,
    pub green: HslAdjustment,
    pub aqua: HslAdjustment,
    pub blue: HslAdjustment,
    pub purple: HslAdjustment,
    pub magenta: HslAdjustment,
}

impl ColorHsl {
    pub fn get(&self, bucket: HueBucket) -> &HslAdjustment {
        match bucket {
            HueBucket::Red => &self.red,
            HueBucket::Orange => &self.orange,
            HueBucket::Yellow => &self.yellow,
            HueBucket::Green => &self.green,
            HueBucket::Aqua => &self.aqua,
            HueBucket::Blue => &self.blue,
            HueBucket::Purple => &self.purple,
            HueBucket::Magenta => &self.magenta,
        }
    }

    pub fn get_mut(&mut self, bucket: HueBucket) -> &mut HslAdjustment {
        match bucket {
            HueBucket::Red => &mut self.red,
            HueBucket::Orange => &mut self.orange,
            HueBucket::Yellow => &mut self.yellow,
            HueBucket::Green => &mut self.green,
            HueBucket::Aqua => &mut self.aqua,
            HueBucket::Blue => &mut self.blue,
            HueBucket::Purple => &mut self.purple,
            HueBucket::Magenta => &mut self.magenta,
        }
    }

    pub fn is_neutral(&self) -> bool {
        HueBucket::ALL.iter().all(|&b| self.get(b).is_neutral())
    }

    pub(crate) fn sanitized(&self) -> Self {
        let mut out = *self;
        for bucket in HueBucket::ALL {
            *out.get_mut(bucket) = self.get(bucket).sanitized();
        }
        out
    }
}

/// Shadow/highlight toning split at a balance-derived luminance threshold.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SplitToning {
    /// 0..360 degrees.
    pub shadow_hue: f32,
    /// 0..100.
    pub shadow_saturation: f32,
    /// 0..360 degrees.
    pub highlight_hue: f32,
    /// 0..100.
    pub highlight_saturation: f32,
    /// -100..100; positive values move the split toward the highlights.
    pub balance: f32,
}

impl_bitwise_hash!(SplitToning {
    floats: [shadow_hue, shadow_saturation, highlight_hue, highlight_saturation, balance],
});

impl SplitToning {
    /// Toning only has a visible effect when a saturation is non-zero.
    pub fn is_neutral(&self) -> bool {
        self.shadow_saturation == 0.0 && self.highlight_saturation == 0.0
    }

    pub(crate) fn sanitized(&self) -> Self {
        Self {
            shadow_hue: clamp(self.shadow_hue, 0.0, 360.0),
            shadow_saturation: clamp(self.shadow_saturation, 0.0, 100.0),
            highlight_hue: clamp(self.highlight_hue, 0.0, 360.0),
            highlight_saturation: clamp(self.highlight_saturation, 0.0, 100.0),
            balance: clamp(self.balance, -100.0, 100.0),
        }
    }
}

/// Three-way color grading with global controls.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ColorGrading {
    pub shadow_lum: f32,
    pub midtone_lum: f32,
    pub highlight_lum: f32,
    pub midtone_hue: f32,
    pub midtone_sat: f32,
    pub global_hue: f32,
    pub global_sat: f32,
    pub global_lum: f32,
    /// 0..100, scales the hue/saturation tints.
    pub blending: f32,
}

impl_bitwise_hash!(ColorGrading {
    floats: [
        shadow_lum,
        midtone_lum,
        highlight_lum,
        midtone_hue,
        midtone_sat,
        global_hue,
        global_sat,
        global_lum,
        blending,
    ],
});

impl Default for ColorGrading {
    fn default() -> Self {
        Self {
            shadow_lum: 0.0,
            midtone_lum: 0.0,
            highlight_lum: 0.0,
            midtone_hue: 0.0,
            midtone_sat: 0.0,
            global_hue: 0.0,
            global_sat: 0.0,
            global_lum: 0.0,
            blending: 50.0,
        }
    }
}

impl ColorGrading {
    pub fn is_neutral(&self) -> bool {
        self.shadow_lum == 0.0
            && self.midtone_lum == 0.0
            && self.highlight_lum == 0.0
            && self.global_lum == 0.0
            && (self.blending == 0.0 || (self.midtone_sat == 0.0 && self.global_sat == 0.0))
    }

    pub(crate) fn sanitized(&self) -> Self {
        Self {
            shadow_lum: clamp(self.shadow_lum, -100.0, 100.0),
            midtone_lum: clamp(self.midtone_lum, -100.0, 100.0),
            highlight_lum: clamp(self.highlight_lum, -100.0, 100.0),
            midtone_hue: clamp(self.midtone_hue, 0.0, 360.0),
            midtone_sat: clamp(self.midtone_sat, 0.0, 100.0),
            global_hue: clamp(self.global_hue, 0.0, 360.0),
            global_sat: clamp(self.global_sat, 0.0, 100.0),
            global_lum: clamp(self.global_lum, -100.0, 100.0),
            blending: clamp(self.blending, 0.0, 100.0),
        }
    }
}

/// Camera-calibration style primary adjustments, each -100..100.
///
/// Only the saturation sliders affect pixels; the hue sliders are stored
/// and round-tripped but have no effect.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ColorCalibration {
    pub red_hue: f32,
    pub red_saturation: f32,
    pub green_hue: f32,
    pub green_saturation: f32,
    pub blue_hue: f32,
    pub blue_saturation: f32,
}

impl_bitwise_hash!(ColorCalibration {
    floats: [red_hue, red_saturation, green_hue, green_saturation, blue_hue, blue_saturation],
});

impl ColorCalibration {
    pub fn is_neutral(&self) -> bool {
        self.red_saturation == 0.0 && self.green_saturation == 0.0 && self.blue_saturation == 0.0
    }

    pub(crate) fn sanitized(&self) -> Self {
        Self {
            red_hue: clamp(self.red_hue, -100.0, 100.0),
            red_saturation: clamp(self.red_saturation, -100.0, 100.0),
            green_hue: clamp(self.green_hue, -100.0, 100.0),
            green_saturation: clamp(self.green_saturation, -100.0, 100.0),
            blue_hue: clamp(self.blue_hue, -100.0, 100.0),
            blue_saturation: clamp(self.blue_saturation, -100.0, 100.0),
        }
    }
}

/// Clamp into `min..=max`; NaN collapses to the neutral end nearest zero.
pub(crate) fn clamp(v: f32, min: f32, max: f32) -> f32 {
    if v.is_nan() {
        return 0.0_f32.clamp(min, max);
    }
    v.clamp(min, max)
}
