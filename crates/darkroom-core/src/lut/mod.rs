//! Lookup-table builders for the tone chain and the HSL hue deltas.

pub mod curves;
pub mod hue;
pub mod tone;

use crate::edit::EditState;
use crate::stages::Stage;

pub use hue::HueLuts;

/// Entries in a per-level table.
pub const LUT_SIZE: usize = 256;

/// A byte-to-byte lookup table.
pub type Lut = [u8; LUT_SIZE];

/// The identity table.
pub fn identity_lut() -> Lut {
    std::array::from_fn(|i| i as u8)
}

/// `second ∘ first`: look up `first`, then feed the result through `second`.
pub fn compose(first: &Lut, second: &Lut) -> Lut {
    std::array::from_fn(|i| second[first[i] as usize])
}

/// Per-channel tables covering every level-only stage.
///
/// Curves are per channel; exposure, tonal zones, clarity, brightness and
/// contrast are shared and composed after the curves in that order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToneLuts {
    pub channels: [Lut; 3],
}

impl ToneLuts {
    /// Bake the tables for the stages of `stages` that are level-only.
    ///
    /// `edit` is expected to be sanitised already.
    pub fn build(edit: &EditState, stages: &[Stage]) -> Self {
        let mut channels = if stages.contains(&Stage::Curves) {
            curves::build_channel_curve_luts(&edit.curves)
        } else {
            [identity_lut(); 3]
        };

        let mut light = identity_lut();
        for stage in stages {
            let table = match stage {
                Stage::Exposure => tone::exposure_lut(edit.exposure),
                Stage::TonalZones => {
                    tone::tonal_lut(edit.highlights, edit.shadows, edit.whites, edit.blacks)
                }
                Stage::Clarity => tone::clarity_lut(edit.clarity),
                Stage::Brightness => tone::brightness_lut(edit.brightness),
                Stage::Contrast => tone::contrast_lut(edit.contrast),
                _ => continue,
            };
            light = compose(&light, &table);
        }

        for channel in &mut channels {
            *channel = compose(channel, &light);
        }
        Self { channels }
    }

    pub fn identity() -> Self {
        Self {
            channels: [identity_lut(); 3],
        }
    }

    pub fn is_identity(&self) -> bool {
        let id = identity_lut();
        self.channels.iter().all(|c| *c == id)
    }

    #[inline]
    pub fn map(&self, rgb: [u8; 3]) -> [u8; 3] {
        [
            self.channels[0][rgb[0] as usize],
            self.channels[1][rgb[1] as usize],
            self.channels[2][rgb[2] as usize],
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compose_applies_first_then_second() {
        let invert: Lut = std::array::from_fn(|i| 255 - i as u8);
        let halve: Lut = std::array::from_fn(|i| (i / 2) as u8);
        let lut = compose(&invert, &halve);
        assert_eq!(lut[0], 127);
        assert_eq!(lut[255], 0);
    }

    #[test]
    fn test_default_edit_builds_identity() {
        let edit = EditState::default();
        let luts = ToneLuts::build(&edit, &Stage::active(&edit));
        assert!(luts.is_identity());
    }

    #[test]
    fn test_exposure_then_contrast_order() {
        let edit = EditState::default().updated(|s| {
            s.exposure = 1.0;
            s.contrast = 1.0;
        });
        let luts = ToneLuts::build(&edit, &Stage::active(&edit));
        // 64 → 128 (exposure) → 128 (contrast pivot)
        assert_eq!(luts.map([64, 64, 64]), [128, 128, 128]);
        // 32 → 64 → 0
        assert_eq!(luts.map([32, 32, 32]), [0, 0, 0]);
    }
}
