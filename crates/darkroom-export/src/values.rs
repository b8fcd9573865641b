//! The edit values accepted by the export endpoint.

use darkroom_core::EditState;
use darkroom_core::edit::{
    ChannelCurves, ColorCalibration, ColorGrading, ColorHsl, LegacyFilter, SplitToning,
};
use serde::{Deserialize, Serialize};

/// The persisted subset of [`EditState`] a client sends with an export.
///
/// Every field is optional; anything missing keeps its neutral value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EditValues {
    pub curves: Option<ChannelCurves>,
    pub exposure: Option<f32>,
    pub contrast: Option<f32>,
    pub highlights: Option<f32>,
    pub shadows: Option<f32>,
    pub whites: Option<f32>,
    pub blacks: Option<f32>,
    pub texture: Option<f32>,
    pub clarity: Option<f32>,
    pub brightness: Option<f32>,
    pub temperature: Option<f32>,
    pub vibrance: Option<f32>,
    pub saturation: Option<f32>,
    pub shadow_tint: Option<f32>,
    pub hue: Option<f32>,
    pub hsl: Option<ColorHsl>,
    pub split_toning: Option<SplitToning>,
    pub color_grading: Option<ColorGrading>,
    pub calibration: Option<ColorCalibration>,
    pub dehaze: Option<f32>,
    pub vignette: Option<f32>,
    pub grain: Option<f32>,
    pub grain_size: Option<f32>,
    pub grain_roughness: Option<f32>,
    pub filters: Option<Vec<LegacyFilter>>,
    pub blur: Option<f32>,
}

impl EditValues {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

impl From<EditValues> for EditState {
    fn from(values: EditValues) -> Self {
        let mut state = EditState::default();
        macro_rules! take {
            ($($field:ident),* $(,)?) => {
                $(if let Some(v) = values.$field {
                    state.$field = v;
                })*
            };
        }
        take!(
            curves,
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
            hsl,
            split_toning,
            color_grading,
            calibration,
            dehaze,
            vignette,
            grain,
            grain_size,
            grain_roughness,
            blur,
        );
        if let Some(filters) = values.filters {
            state.filters = filters.into_iter().collect();
        }
        state.sanitized()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_values_are_neutral() {
        let state: EditState = EditValues::default().into();
        assert_eq!(state, EditState::default());
    }

    #[test]
    fn test_partial_json() {
        let values = EditValues::from_json(
            r#"{"exposure":0.4,"shadowTint":-0.2,"splitToning":{"shadowHue":200,"shadowSaturation":30},"filters":["sepia"]}"#,
        )
        .expect("valid json");
        let state: EditState = values.into();
        assert_eq!(state.exposure, 0.4);
        assert_eq!(state.shadow_tint, -0.2);
        assert_eq!(state.split_toning.shadow_hue, 200.0);
        assert_eq!(state.split_toning.shadow_saturation, 30.0);
        assert!(state.filters.contains(&LegacyFilter::Sepia));
        assert_eq!(state.grain_roughness, 50.0);
    }

    #[test]
    fn test_out_of_range_values_are_clamped() {
        let values = EditValues {
            exposure: Some(4.0),
            vignette: Some(-1.0),
            ..Default::default()
        };
        let state: EditState = values.into();
        assert_eq!(state.exposure, 1.0);
        assert_eq!(state.vignette, 0.0);
    }
}
