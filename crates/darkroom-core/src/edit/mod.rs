//! The edit-state model consumed by the pipeline.
//!
//! `EditState` is the single description of every adjustment applied to an
//! image. The pipeline never mutates it; UI code produces a new value for
//! each change via [`EditState::updated`].

/// `Hash` for structs with `f32` fields, hashing floats by bit pattern.
/// `-0.0` is folded into `0.0` so hashing agrees with the derived `PartialEq`.
macro_rules! impl_bitwise_hash {
    ($ty:ty { floats: [$($float:ident),* $(,)?] $(, other: [$($other:ident),* $(,)?])? $(,)? }) => {
        impl ::std::hash::Hash for $ty {
            fn hash<H: ::std::hash::Hasher>(&self, state: &mut H) {
                $(state.write_u32((self.$float + 0.0).to_bits());)*
                $($(::std::hash::Hash::hash(&self.$other, state);)*)?
            }
        }
    };
}

pub mod bypass;
pub mod color;
pub mod curves;

use std::collections::BTreeSet;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

pub use bypass::{BypassSet, StageGroup};
pub use color::{ColorCalibration, ColorGrading, ColorHsl, HslAdjustment, HueBucket, SplitToning};
pub use curves::{ChannelCurves, CurvePoint, ToneCurve};

use self::color::clamp;

/// Default grain roughness; only matters once grain size exceeds one pixel.
const DEFAULT_GRAIN_ROUGHNESS: f32 = 50.0;

/// Legacy whole-image filters, applied in declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LegacyFilter {
    Grayscale,
    Sepia,
    Invert,
}

/// Every adjustment for one image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EditState {
    pub curves: ChannelCurves,

    // Light, -1..1
    pub exposure: f32,
    pub contrast: f32,
    pub highlights: f32,
    pub shadows: f32,
    pub whites: f32,
    pub blacks: f32,
    /// Stored for round-tripping; no stage reads it.
    pub texture: f32,
    pub clarity: f32,
    /// Legacy multiplicative brightness, -1..1.
    pub brightness: f32,

    // Color, -1..1
    pub temperature: f32,
    pub vibrance: f32,
    pub saturation: f32,
    pub shadow_tint: f32,
    /// Legacy hue rotation in degrees, -180..180.
    pub hue: f32,
    pub hsl: ColorHsl,
    pub split_toning: SplitToning,
    pub color_grading: ColorGrading,
    pub calibration: ColorCalibration,

    // Effects
    /// -1..1.
    pub dehaze: f32,
    /// 0..1.
    pub vignette: f32,
    /// 0..1.
    pub grain: f32,
    /// 0..100; larger values clump noise into bigger cells.
    pub grain_size: f32,
    /// 0..100; mixes per-pixel noise back into clumped grain.
    pub grain_roughness: f32,
    pub filters: BTreeSet<LegacyFilter>,
    /// Box blur radius in pixels, 0..10.
    pub blur: f32,
}

impl Default for EditState {
    /// The neutral edit: every stage is a no-op.
    fn default() -> Self {
        Self {
            curves: ChannelCurves::default(),
            exposure: 0.0,
            contrast: 0.0,
            highlights: 0.0,
            shadows: 0.0,
            whites: 0.0,
            blacks: 0.0,
            texture: 0.0,
            clarity: 0.0,
            brightness: 0.0,
            temperature: 0.0,
            vibrance: 0.0,
            saturation: 0.0,
            shadow_tint: 0.0,
            hue: 0.0,
            hsl: ColorHsl::default(),
            split_toning: SplitToning::default(),
            color_grading: ColorGrading::default(),
            calibration: ColorCalibration::default(),
            dehaze: 0.0,
            vignette: 0.0,
            grain: 0.0,
            grain_size: 0.0,
            grain_roughness: DEFAULT_GRAIN_ROUGHNESS,
            filters: BTreeSet::new(),
            blur: 0.0,
        }
    }
}

impl EditState {
    /// Return a new state with `change` applied; `self` is left untouched.
    pub fn updated(&self, change: impl FnOnce(&mut Self)) -> Self {
        let mut next = self.clone();
        change(&mut next);
        next
    }

    /// Parse a persisted or imported state and bring it into range.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let state: Self = serde_json::from_str(json)?;
        Ok(state.sanitized())
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Clamp every field into its documented range and repair curves.
    pub fn sanitized(&self) -> Self {
        Self {
            curves: self.curves.sanitized(),
            exposure: clamp_field("exposure", self.exposure, -1.0, 1.0),
            contrast: clamp_field("contrast", self.contrast, -1.0, 1.0),
            highlights: clamp_field("highlights", self.highlights, -1.0, 1.0),
            shadows: clamp_field("shadows", self.shadows, -1.0, 1.0),
            whites: clamp_field("whites", self.whites, -1.0, 1.0),
            blacks: clamp_field("blacks", self.blacks, -1.0, 1.0),
            texture: clamp_field("texture", self.texture, -1.0, 1.0),
            clarity: clamp_field("clarity", self.clarity, -1.0, 1.0),
            brightness: clamp_field("brightness", self.brightness, -1.0, 1.0),
            temperature: clamp_field("temperature", self.temperature, -1.0, 1.0),
            vibrance: clamp_field("vibrance", self.vibrance, -1.0, 1.0),
            saturation: clamp_field("saturation", self.saturation, -1.0, 1.0),
            shadow_tint: clamp_field("shadowTint", self.shadow_tint, -1.0, 1.0),
            hue: clamp_field("hue", self.hue, -180.0, 180.0),
            hsl: self.hsl.sanitized(),
            split_toning: self.split_toning.sanitized(),
            color_grading: self.color_grading.sanitized(),
            calibration: self.calibration.sanitized(),
            dehaze: clamp_field("dehaze", self.dehaze, -1.0, 1.0),
            vignette: clamp_field("vignette", self.vignette, 0.0, 1.0),
            grain: clamp_field("grain", self.grain, 0.0, 1.0),
            grain_size: clamp_field("grainSize", self.grain_size, 0.0, 100.0),
            grain_roughness: clamp_field("grainRoughness", self.grain_roughness, 0.0, 100.0),
            filters: self.filters.clone(),
            blur: clamp_field("blur", self.blur, 0.0, 10.0),
        }
    }

    /// Reset every field belonging to a bypassed group to its default.
    ///
    /// Bypassing a group is exactly equivalent to editing with that group's
    /// fields at their defaults.
    pub fn without_groups(&self, bypass: &BypassSet) -> Self {
        let mut out = self.clone();
        let neutral = Self::default();
        for group in bypass.iter() {
            match group {
                StageGroup::Curves => {
                    out.curves = neutral.curves.clone();
                }
                StageGroup::Light => {
                    out.exposure = neutral.exposure;
                    out.contrast = neutral.contrast;
                    out.highlights = neutral.highlights;
                    out.shadows = neutral.shadows;
                    out.whites = neutral.whites;
                    out.blacks = neutral.blacks;
                    out.texture = neutral.texture;
                    out.clarity = neutral.clarity;
                    out.brightness = neutral.brightness;
                }
                StageGroup::Color => {
                    out.temperature = neutral.temperature;
                    out.vibrance = neutral.vibrance;
                    out.saturation = neutral.saturation;
                    out.shadow_tint = neutral.shadow_tint;
                    out.hue = neutral.hue;
                    out.hsl = neutral.hsl;
                    out.split_toning = neutral.split_toning;
                    out.color_grading = neutral.color_grading;
                    out.calibration = neutral.calibration;
                }
                StageGroup::Effects => {
                    out.dehaze = neutral.dehaze;
                    out.vignette = neutral.vignette;
                    out.grain = neutral.grain;
                    out.grain_size = neutral.grain_size;
                    out.grain_roughness = neutral.grain_roughness;
                    out.filters = neutral.filters.clone();
                    out.blur = neutral.blur;
                }
            }
        }
        out
    }

    /// Stable cache key for this state rendered under `bypass`.
    pub fn fingerprint(&self, bypass: &BypassSet) -> u64 {
        let mut hasher = DefaultHasher::new();
        self.hash(&mut hasher);
        bypass.hash(&mut hasher);
        hasher.finish()
    }
}

impl_bitwise_hash!(EditState {
    floats: [
        exposure,
        contrast,
        highlights,
        shadows,
        whites,
        blacks,
        texture,
        clarity,
        brightness,
        temperature,
        vibrance,
        saturation,
        shadow_tint,
        hue,
        dehaze,
        vignette,
        grain,
        grain_size,
        grain_roughness,
        blur,
    ],
    other: [curves, hsl, split_toning, color_grading, calibration, filters],
});

fn clamp_field(name: &str, value: f32, min: f32, max: f32) -> f32 {
    let out = clamp(value, min, max);
    if out != value {
        tracing::debug!("clamped {name} from {value} to {out}");
    }
    out
}
