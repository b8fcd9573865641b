//! The canonical stage list and the per-pixel stage functions.
//!
//! Every backend executes enabled stages in [`Stage::CANONICAL_ORDER`]:
//!
//! ```text
//! curves → exposure → tonal zones → clarity → brightness → contrast
//!   → temperature → hue rotate → saturation → vibrance → HSL
//!   → split toning → shadow tint → color grading → calibration
//!   → dehaze → vignette → grain → legacy filters → blur
//! ```

pub mod effects;
pub mod hsl;
pub mod tone;
pub mod toning;

use crate::edit::{EditState, StageGroup};

/// One named transformation of the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    Curves,
    Exposure,
    TonalZones,
    Clarity,
    Brightness,
    Contrast,
    Temperature,
    HueRotate,
    Saturation,
    Vibrance,
    Hsl,
    SplitToning,
    ShadowTint,
    ColorGrading,
    Calibration,
    Dehaze,
    Vignette,
    Grain,
    LegacyFilters,
    Blur,
}

impl Stage {
    /// Every stage, in execution order.
    pub const CANONICAL_ORDER: [Self; 20] = [
        Self::Curves,
        Self::Exposure,
        Self::TonalZones,
        Self::Clarity,
        Self::Brightness,
        Self::Contrast,
        Self::Temperature,
        Self::HueRotate,
        Self::Saturation,
        Self::Vibrance,
        Self::Hsl,
        Self::SplitToning,
        Self::ShadowTint,
        Self::ColorGrading,
        Self::Calibration,
        Self::Dehaze,
        Self::Vignette,
        Self::Grain,
        Self::LegacyFilters,
        Self::Blur,
    ];

    /// The bypass group that disables this stage.
    pub const fn group(self) -> StageGroup {
        match self {
            Self::Curves => StageGroup::Curves,
            Self::Exposure
            | Self::TonalZones
            | Self::Clarity
            | Self::Brightness
            | Self::Contrast => StageGroup::Light,
            Self::Temperature
            | Self::HueRotate
            | Self::Saturation
            | Self::Vibrance
            | Self::Hsl
            | Self::SplitToning
            | Self::ShadowTint
            | Self::ColorGrading
            | Self::Calibration => StageGroup::Color,
            Self::Dehaze | Self::Vignette | Self::Grain | Self::LegacyFilters | Self::Blur => {
                StageGroup::Effects
            }
        }
    }

    /// Level-only stages are baked into the per-channel tone tables.
    pub const fn is_level_only(self) -> bool {
        matches!(
            self,
            Self::Curves
                | Self::Exposure
                | Self::TonalZones
                | Self::Clarity
                | Self::Brightness
                | Self::Contrast
        )
    }

    /// Whether the stage changes anything for this edit state.
    pub fn is_active(self, edit: &EditState) -> bool {
        match self {
            Self::Curves => edit.curves.is_modified(),
            Self::Exposure => edit.exposure != 0.0,
            Self::TonalZones => {
                edit.highlights != 0.0
                    || edit.shadows != 0.0
                    || edit.whites != 0.0
                    || edit.blacks != 0.0
            }
            Self::Clarity => edit.clarity != 0.0,
            Self::Brightness => edit.brightness != 0.0,
            Self::Contrast => edit.contrast != 0.0,
            Self::Temperature => edit.temperature != 0.0,
            Self::HueRotate => edit.hue != 0.0,
            Self::Saturation => edit.saturation != 0.0,
            Self::Vibrance => edit.vibrance != 0.0,
            Self::Hsl => !edit.hsl.is_neutral(),
            Self::SplitToning => !edit.split_toning.is_neutral(),
            Self::ShadowTint => edit.shadow_tint != 0.0,
            Self::ColorGrading => !edit.color_grading.is_neutral(),
            Self::Calibration => !edit.calibration.is_neutral(),
            Self::Dehaze => edit.dehaze != 0.0,
            Self::Vignette => edit.vignette > 0.0,
            Self::Grain => edit.grain > 0.0,
            Self::LegacyFilters => !edit.filters.is_empty(),
            Self::Blur => effects::blur_radius(edit.blur) > 0,
        }
    }

    /// Active stages for `edit`, in canonical order.
    pub fn active(edit: &EditState) -> Vec<Self> {
        Self::CANONICAL_ORDER
            .into_iter()
            .filter(|stage| stage.is_active(edit))
            .collect()
    }
}
