//! Uniform block and table packing shared with `develop.wgsl`.
//!
//! Field order here must match the `Develop` struct in the shader. Every
//! field is a 4-byte scalar and the block is a multiple of 16 bytes, so no
//! hidden padding is needed.

use bytemuck::{Pod, Zeroable};
use darkroom_core::PreparedPipeline;
use darkroom_core::edit::LegacyFilter;
use darkroom_core::lut::hue::HUE_LUT_SIZE;
use darkroom_core::lut::{HueLuts, LUT_SIZE, ToneLuts};
use darkroom_core::stages::Stage;

pub const FILTER_GRAYSCALE: u32 = 1;
pub const FILTER_SEPIA: u32 = 1 << 1;
pub const FILTER_INVERT: u32 = 1 << 2;

/// Bit of `stage` in [`DevelopUniforms::stage_mask`]: its canonical index.
pub fn stage_bit(stage: Stage) -> u32 {
    let index = Stage::CANONICAL_ORDER
        .iter()
        .position(|&s| s == stage)
        .unwrap_or(0);
    1 << index
}

pub fn filter_bit(filter: LegacyFilter) -> u32 {
    match filter {
        LegacyFilter::Grayscale => FILTER_GRAYSCALE,
        LegacyFilter::Sepia => FILTER_SEPIA,
        LegacyFilter::Invert => FILTER_INVERT,
    }
}

/// Scalar parameters for one develop dispatch.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct DevelopUniforms {
    pub width: u32,
    pub height: u32,
    pub stage_mask: u32,
    pub filter_mask: u32,

    pub temperature: f32,
    pub hue: f32,
    pub saturation: f32,
    pub vibrance: f32,

    pub shadow_tint: f32,
    pub dehaze: f32,
    pub vignette: f32,
    pub grain: f32,

    pub grain_size: f32,
    pub grain_roughness: f32,
    pub split_shadow_hue: f32,
    pub split_shadow_sat: f32,

    pub split_highlight_hue: f32,
    pub split_highlight_sat: f32,
    pub split_balance: f32,
    pub grade_shadow_lum: f32,

    pub grade_midtone_lum: f32,
    pub grade_highlight_lum: f32,
    pub grade_midtone_hue: f32,
    pub grade_midtone_sat: f32,

    pub grade_global_hue: f32,
    pub grade_global_sat: f32,
    pub grade_global_lum: f32,
    pub grade_blending: f32,

    pub cal_red_sat: f32,
    pub cal_green_sat: f32,
    pub cal_blue_sat: f32,
    pub _pad0: u32,
}

impl DevelopUniforms {
    /// Build the block for a prepared pipeline over a `width × height` image.
    ///
    /// Level-only stages and blur never appear in the mask; the former are
    /// in the tone table and the latter runs after readback.
    pub fn from_prepared(prepared: &PreparedPipeline, width: u32, height: u32) -> Self {
        let edit = prepared.edit();
        let stage_mask = prepared
            .stages()
            .iter()
            .filter(|s| !s.is_level_only() && **s != Stage::Blur)
            .fold(0, |mask, &s| mask | stage_bit(s));
        let filter_mask = edit
            .filters
            .iter()
            .fold(0, |mask, &f| mask | filter_bit(f));
        let split = &edit.split_toning;
        let grade = &edit.color_grading;
        let cal = &edit.calibration;

        Self {
            width,
            height,
            stage_mask,
            filter_mask,
            temperature: edit.temperature,
            hue: edit.hue,
            saturation: edit.saturation,
            vibrance: edit.vibrance,
            shadow_tint: edit.shadow_tint,
            dehaze: edit.dehaze,
            vignette: edit.vignette,
            grain: edit.grain,
            grain_size: edit.grain_size,
            grain_roughness: edit.grain_roughness,
            split_shadow_hue: split.shadow_hue,
            split_shadow_sat: split.shadow_saturation,
            split_highlight_hue: split.highlight_hue,
            split_highlight_sat: split.highlight_saturation,
            split_balance: split.balance,
            grade_shadow_lum: grade.shadow_lum,
            grade_midtone_lum: grade.midtone_lum,
            grade_highlight_lum: grade.highlight_lum,
            grade_midtone_hue: grade.midtone_hue,
            grade_midtone_sat: grade.midtone_sat,
            grade_global_hue: grade.global_hue,
            grade_global_sat: grade.global_sat,
            grade_global_lum: grade.global_lum,
            grade_blending: grade.blending,
            cal_red_sat: cal.red_saturation,
            cal_green_sat: cal.green_saturation,
            cal_blue_sat: cal.blue_saturation,
            _pad0: 0,
        }
    }

    pub fn has_stage(&self, stage: Stage) -> bool {
        self.stage_mask & stage_bit(stage) != 0
    }
}

/// Three 256-entry channel tables, red then green then blue, as `u32`.
pub fn pack_tone_luts(luts: &ToneLuts) -> Vec<u32> {
    luts.channels
        .iter()
        .flat_map(|lut| lut.iter().map(|&v| u32::from(v)))
        .collect()
}

/// Hue, saturation and luminance deltas, 360 entries each.
pub fn pack_hue_luts(luts: &HueLuts) -> Vec<f32> {
    let mut out = Vec::with_capacity(HUE_LUT_SIZE * 3);
    out.extend_from_slice(&luts.hue);
    out.extend_from_slice(&luts.saturation);
    out.extend_from_slice(&luts.luminance);
    out
}

/// Entries in the packed tone table.
pub const TONE_TABLE_LEN: usize = LUT_SIZE * 3;
/// Entries in the packed hue table.
pub const HUE_TABLE_LEN: usize = HUE_LUT_SIZE * 3;

#[cfg(test)]
mod tests {
    use super::*;
    use darkroom_core::{BypassSet, EditState};

    const SHADER: &str = include_str!("../shaders/develop.wgsl");

    #[test]
    fn test_uniform_block_is_16_byte_aligned() {
        assert_eq!(std::mem::size_of::<DevelopUniforms>() % 16, 0);
        assert_eq!(std::mem::size_of::<DevelopUniforms>(), 128);
    }

    #[test]
    fn test_shader_stage_constants_match_canonical_order() {
        let shader_names = [
            (Stage::Temperature, "STAGE_TEMPERATURE"),
            (Stage::HueRotate, "STAGE_HUE_ROTATE"),
            (Stage::Saturation, "STAGE_SATURATION"),
            (Stage::Vibrance, "STAGE_VIBRANCE"),
            (Stage::Hsl, "STAGE_HSL"),
            (Stage::SplitToning, "STAGE_SPLIT_TONING"),
            (Stage::ShadowTint, "STAGE_SHADOW_TINT"),
            (Stage::ColorGrading, "STAGE_COLOR_GRADING"),
            (Stage::Calibration, "STAGE_CALIBRATION"),
            (Stage::Dehaze, "STAGE_DEHAZE"),
            (Stage::Vignette, "STAGE_VIGNETTE"),
            (Stage::Grain, "STAGE_GRAIN"),
            (Stage::LegacyFilters, "STAGE_LEGACY_FILTERS"),
        ];
        for (stage, name) in shader_names {
            let decl = format!("const {name}: u32 = {:#x}u;", stage_bit(stage));
            assert!(SHADER.contains(&decl), "shader is missing `{decl}`");
        }
    }

    #[test]
    fn test_mask_skips_table_stages_and_blur() {
        let edit = EditState::default().updated(|s| {
            s.exposure = 0.5;
            s.saturation = 0.2;
            s.vignette = 0.3;
            s.blur = 3.0;
            s.filters.insert(LegacyFilter::Invert);
        });
        let prepared = PreparedPipeline::new(&edit, &BypassSet::none());
        let u = DevelopUniforms::from_prepared(&prepared, 8, 4);
        assert!(u.has_stage(Stage::Saturation));
        assert!(u.has_stage(Stage::Vignette));
        assert!(u.has_stage(Stage::LegacyFilters));
        assert!(!u.has_stage(Stage::Exposure));
        assert!(!u.has_stage(Stage::Blur));
        assert_eq!(u.filter_mask, FILTER_INVERT);
        assert_eq!((u.width, u.height), (8, 4));
    }

    #[test]
    fn test_table_packing_lengths_and_order() {
        let edit = EditState::default().updated(|s| s.hsl.red.hue = 100.0);
        let prepared = PreparedPipeline::new(&edit, &BypassSet::none());
        let tone = pack_tone_luts(prepared.tone_luts());
        assert_eq!(tone.len(), TONE_TABLE_LEN);
        assert_eq!(tone[255], 255);
        assert_eq!(tone[256], 0);

        let hue = pack_hue_luts(prepared.hue_luts());
        assert_eq!(hue.len(), HUE_TABLE_LEN);
        assert_eq!(hue[0], prepared.hue_luts().hue[0]);
        assert_eq!(hue[HUE_LUT_SIZE], prepared.hue_luts().saturation[0]);
    }
}
