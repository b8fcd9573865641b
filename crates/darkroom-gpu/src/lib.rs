//! Darkroom GPU — wgpu compute adapter for the edit pipeline.
//!
//! Tone and hue tables are baked on the CPU by `darkroom-core` and uploaded
//! with a uniform block; a single WGSL pass then applies every per-pixel
//! stage in canonical order. Blur runs on the CPU after readback.

pub mod buffers;
pub mod context;
pub mod develop;
pub mod error;
pub mod readback;
pub mod uniforms;

pub use context::GpuContext;
pub use develop::GpuDevelopPipeline;
pub use error::GpuError;
pub use uniforms::DevelopUniforms;

/// Features the develop pass needs. Plain storage buffers only.
pub fn required_features() -> wgpu::Features {
    wgpu::Features::empty()
}
