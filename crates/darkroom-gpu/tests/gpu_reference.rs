//! GPU golden tests against the reference CPU pipeline.
//!
//! Run with: `cargo test -p darkroom-gpu`. Tests return early when the
//! machine has no usable adapter.

use std::sync::{Mutex, OnceLock};

use darkroom_core::edit::{LegacyFilter, ToneCurve};
use darkroom_core::{BufferDiff, BypassSet, EditState, PixelBuffer, PreparedPipeline, StageGroup};
use darkroom_gpu::{GpuContext, GpuDevelopPipeline};

fn gpu_test_lock() -> &'static Mutex<()> {
    static LOCK: OnceLock<Mutex<()>> = OnceLock::new();
    LOCK.get_or_init(|| Mutex::new(()))
}

fn create_test_pipeline() -> Option<GpuDevelopPipeline> {
    match GpuContext::new() {
        Ok(ctx) => Some(GpuDevelopPipeline::new(ctx)),
        Err(e) => {
            eprintln!("skipping GPU test: {e}");
            None
        }
    }
}

/// Red/green gradients with a varying blue channel, so every hue bucket
/// and luminance zone is represented.
fn create_test_image(width: u32, height: u32) -> PixelBuffer {
    let mut data = Vec::with_capacity((width * height * 3) as usize);
    for y in 0..height {
        for x in 0..width {
            data.push((x * 255 / (width - 1)) as u8);
            data.push((y * 255 / (height - 1)) as u8);
            data.push(((x * 7 + y * 13) % 256) as u8);
        }
    }
    PixelBuffer::new(width, height, data).expect("test image shape")
}

fn assert_matches_reference(gpu: &GpuDevelopPipeline, edit: &EditState, bypass: &BypassSet) {
    let image = create_test_image(37, 29);
    let reference = darkroom_core::apply(image.as_bytes(), 37, 29, edit, bypass)
        .expect("reference render");
    let prepared = PreparedPipeline::new(edit, bypass);
    let developed = gpu.render(&prepared, &image).expect("gpu render");

    let diff = BufferDiff::between(&reference, &developed).expect("same shape");
    eprintln!("mean delta {:.5}, max delta {}", diff.mean, diff.max);
    assert!(
        diff.is_equivalent(),
        "GPU output drifted from reference: mean {} (max {})",
        diff.mean,
        diff.max
    );
}

#[test]
fn test_gpu_identity_returns_source() {
    let _lock = gpu_test_lock().lock().expect("gpu test lock poisoned");
    let Some(gpu) = create_test_pipeline() else {
        return;
    };
    let image = create_test_image(16, 16);
    let prepared = PreparedPipeline::new(&EditState::default(), &BypassSet::none());
    let out = gpu.render(&prepared, &image).expect("gpu render");
    assert_eq!(out, image);
}

#[test]
fn test_gpu_exposure_saturates_gray() {
    let _lock = gpu_test_lock().lock().expect("gpu test lock poisoned");
    let Some(gpu) = create_test_pipeline() else {
        return;
    };
    let image = PixelBuffer::filled(4, 4, [128, 128, 128]);
    let edit = EditState::default().updated(|s| s.exposure = 1.0);
    let prepared = PreparedPipeline::new(&edit, &BypassSet::none());
    let out = gpu.render(&prepared, &image).expect("gpu render");
    assert!(out.as_bytes().iter().all(|&v| v == 255));
}

#[test]
fn test_gpu_matches_reference_per_stage() {
    let _lock = gpu_test_lock().lock().expect("gpu test lock poisoned");
    let Some(gpu) = create_test_pipeline() else {
        return;
    };
    let edits: Vec<(&str, EditState)> = vec![
        ("curves", EditState::default().updated(|s| {
            s.curves.rgb = ToneCurve::from_points(&[(0.0, 0.0), (128.0, 200.0), (255.0, 255.0)]);
        })),
        ("tonal", EditState::default().updated(|s| {
            s.shadows = 0.6;
            s.highlights = -0.5;
            s.blacks = 0.3;
            s.whites = -0.2;
        })),
        ("temperature", EditState::default().updated(|s| s.temperature = -0.7)),
        ("hue", EditState::default().updated(|s| s.hue = 45.0)),
        ("saturation", EditState::default().updated(|s| s.saturation = 0.6)),
        ("vibrance", EditState::default().updated(|s| s.vibrance = -0.8)),
        ("hsl", EditState::default().updated(|s| {
            s.hsl.red.hue = 60.0;
            s.hsl.green.saturation = -80.0;
            s.hsl.blue.luminance = 50.0;
        })),
        ("split toning", EditState::default().updated(|s| {
            s.split_toning.shadow_hue = 200.0;
            s.split_toning.shadow_saturation = 60.0;
            s.split_toning.highlight_hue = 30.0;
            s.split_toning.highlight_saturation = 40.0;
            s.split_toning.balance = 20.0;
        })),
        ("shadow tint", EditState::default().updated(|s| s.shadow_tint = -0.8)),
        ("grading", EditState::default().updated(|s| {
            s.color_grading.shadow_lum = 30.0;
            s.color_grading.highlight_lum = -20.0;
            s.color_grading.midtone_hue = 120.0;
            s.color_grading.midtone_sat = 50.0;
            s.color_grading.global_lum = 10.0;
        })),
        ("calibration", EditState::default().updated(|s| {
            s.calibration.red_saturation = 60.0;
            s.calibration.blue_saturation = -60.0;
        })),
        ("dehaze", EditState::default().updated(|s| s.dehaze = 0.7)),
        ("vignette", EditState::default().updated(|s| s.vignette = 0.9)),
        ("grain", EditState::default().updated(|s| {
            s.grain = 0.8;
            s.grain_size = 60.0;
        })),
        ("filters", EditState::default().updated(|s| {
            s.filters.insert(LegacyFilter::Sepia);
            s.filters.insert(LegacyFilter::Invert);
        })),
        ("blur", EditState::default().updated(|s| s.blur = 3.0)),
    ];
    for (name, edit) in &edits {
        eprintln!("stage: {name}");
        assert_matches_reference(&gpu, edit, &BypassSet::none());
    }
}

#[test]
fn test_gpu_matches_reference_with_bypass() {
    let _lock = gpu_test_lock().lock().expect("gpu test lock poisoned");
    let Some(gpu) = create_test_pipeline() else {
        return;
    };
    let edit = EditState::default().updated(|s| {
        s.exposure = 0.4;
        s.contrast = 0.3;
        s.saturation = 0.5;
        s.hsl.orange.hue = -40.0;
        s.vignette = 0.5;
        s.grain = 0.4;
    });
    for group in StageGroup::ALL {
        assert_matches_reference(&gpu, &edit, &BypassSet::only(group));
    }
}
