//! The reference CPU pipeline. Every other backend is tested against it.

use glam::Vec2;

use crate::buffer::{CHANNELS, PixelBuffer};
use crate::color::clamp8;
use crate::edit::{BypassSet, EditState};
use crate::error::PipelineError;
use crate::lut::{HueLuts, ToneLuts};
use crate::stages::{Stage, effects, hsl, tone, toning};

/// An edit state resolved against a bypass set, with its tables baked.
///
/// Building one sanitises the state, resets bypassed groups, lists the
/// active stages in canonical order and bakes the tone and hue tables.
/// It is immutable and can be shared between threads and frames.
#[derive(Debug, Clone)]
pub struct PreparedPipeline {
    edit: EditState,
    stages: Vec<Stage>,
    tone_luts: ToneLuts,
    hue_luts: HueLuts,
}

impl PreparedPipeline {
    pub fn new(edit: &EditState, bypass: &BypassSet) -> Self {
        let edit = edit.sanitized().without_groups(bypass);
        let stages = Stage::active(&edit);
        let tone_luts = ToneLuts::build(&edit, &stages);
        let hue_luts = if stages.contains(&Stage::Hsl) {
            HueLuts::build(&edit.hsl)
        } else {
            HueLuts::neutral()
        };
        Self {
            edit,
            stages,
            tone_luts,
            hue_luts,
        }
    }

    /// The sanitised state with bypassed groups reset.
    pub fn edit(&self) -> &EditState {
        &self.edit
    }

    /// Active stages in execution order.
    pub fn stages(&self) -> &[Stage] {
        &self.stages
    }

    pub fn tone_luts(&self) -> &ToneLuts {
        &self.tone_luts
    }

    pub fn hue_luts(&self) -> &HueLuts {
        &self.hue_luts
    }

    pub fn is_identity(&self) -> bool {
        self.stages.is_empty()
    }

    pub fn has_stage(&self, stage: Stage) -> bool {
        self.stages.contains(&stage)
    }

    /// Run every stage except blur on one pixel at `(x, y)`. `center` is
    /// the image's [`effects::vignette_center`].
    pub fn shade_pixel(&self, x: u32, y: u32, center: Vec2, rgb: [u8; 3]) -> [u8; 3] {
        let leveled = self.tone_luts.map(rgb);
        let mut px = leveled.map(f32::from);
        let edit = &self.edit;
        for &stage in &self.stages {
            px = match stage {
                Stage::Temperature => tone::temperature(px, edit.temperature),
                Stage::HueRotate => tone::hue_rotate(px, edit.hue),
                Stage::Saturation => tone::saturation(px, edit.saturation),
                Stage::Vibrance => tone::vibrance(px, edit.vibrance),
                Stage::Hsl => hsl::apply_hsl(px, &self.hue_luts),
                Stage::SplitToning => toning::split_toning(px, &edit.split_toning),
                Stage::ShadowTint => toning::shadow_tint(px, edit.shadow_tint),
                Stage::ColorGrading => toning::color_grading(px, &edit.color_grading),
                Stage::Calibration => toning::calibration(px, &edit.calibration),
                Stage::Dehaze => tone::dehaze(px, edit.dehaze),
                Stage::Vignette => {
                    let factor = effects::vignette_factor(x, y, center, edit.vignette);
                    effects::vignette(px, factor)
                }
                Stage::Grain => {
                    let noise = effects::grain_noise(
                        x,
                        y,
                        edit.grain,
                        edit.grain_size,
                        edit.grain_roughness,
                    );
                    effects::add_grain(px, noise)
                }
                Stage::LegacyFilters => edit
                    .filters
                    .iter()
                    .fold(px, |acc, &filter| effects::legacy_filter(acc, filter)),
                // Level-only stages are in the tone tables; blur runs per image.
                _ => px,
            };
        }
        px.map(clamp8)
    }

    /// Produce a new buffer; `pixels` is left untouched.
    pub fn run(&self, pixels: &PixelBuffer) -> PixelBuffer {
        if self.is_identity() {
            return pixels.clone();
        }
        let (width, height) = (pixels.width(), pixels.height());
        let mut out = pixels.clone();
        let per_pixel = self.stages.iter().any(|s| *s != Stage::Blur);
        if per_pixel {
            let center = effects::vignette_center(width, height);
            for (i, px) in out.as_bytes_mut().chunks_exact_mut(CHANNELS).enumerate() {
                let x = (i % width as usize) as u32;
                let y = (i / width as usize) as u32;
                let shaded = self.shade_pixel(x, y, center, [px[0], px[1], px[2]]);
                px.copy_from_slice(&shaded);
            }
        }
        if self.has_stage(Stage::Blur) {
            out = effects::box_blur(&out, effects::blur_radius(self.edit.blur));
        }
        out
    }
}

/// Apply `edit` to a raw RGB buffer of `width × height` pixels.
///
/// The input is never modified. Fails only when the buffer length does not
/// match the stated shape.
pub fn apply(
    pixels: &[u8],
    width: u32,
    height: u32,
    edit: &EditState,
    bypass: &BypassSet,
) -> Result<PixelBuffer, PipelineError> {
    let source = PixelBuffer::from_slice(pixels, width, height)?;
    Ok(PreparedPipeline::new(edit, bypass).run(&source))
}
