//! wgpu adapter with CPU fallback.

use std::panic::{AssertUnwindSafe, catch_unwind};

use darkroom_core::{BypassSet, EditState, PixelBuffer, PreparedPipeline};
use darkroom_gpu::{GpuContext, GpuDevelopPipeline, GpuError};

use crate::backend::{BackendKind, PreparedCache, RenderBackend};
use crate::error::RenderError;

/// Runs the develop compute pass. Any GPU error or panic is logged and the
/// same prepared pipeline is run on the CPU instead.
pub struct GpuBackend {
    develop: GpuDevelopPipeline,
    cache: PreparedCache,
}

impl GpuBackend {
    /// Create a device on the default adapter and compile the shader.
    pub fn new() -> Result<Self, GpuError> {
        Ok(Self::with_context(GpuContext::new()?))
    }

    /// Reuse a device owned by the host application.
    pub fn with_context(ctx: GpuContext) -> Self {
        Self {
            develop: GpuDevelopPipeline::new(ctx),
            cache: PreparedCache::default(),
        }
    }

    pub fn adapter_name(&self) -> &str {
        &self.develop.context().adapter_name
    }

    /// Render on the GPU only, without the CPU fallback.
    pub fn try_render(
        &self,
        prepared: &PreparedPipeline,
        pixels: &PixelBuffer,
    ) -> Result<PixelBuffer, RenderError> {
        match catch_unwind(AssertUnwindSafe(|| self.develop.render(prepared, pixels))) {
            Ok(result) => Ok(result?),
            Err(_) => Err(RenderError::Gpu("develop pass panicked".to_string())),
        }
    }
}

impl RenderBackend for GpuBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::Gpu
    }

    fn render(
        &self,
        pixels: &PixelBuffer,
        edit: &EditState,
        bypass: &BypassSet,
    ) -> Result<PixelBuffer, RenderError> {
        let prepared = self.cache.get_or_prepare(edit, bypass);
        match self.try_render(&prepared, pixels) {
            Ok(developed) => Ok(developed),
            Err(e) => {
                tracing::warn!("{e}; falling back to CPU pipeline");
                Ok(prepared.run(pixels))
            }
        }
    }
}
