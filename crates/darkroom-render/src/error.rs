//! Errors raised by render backends and the preview renderer.

use darkroom_core::PipelineError;

#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error(transparent)]
    Pipeline(#[from] PipelineError),
    #[error("GPU render failed: {0}")]
    Gpu(String),
    #[error("render task was cancelled before it finished")]
    Cancelled,
}

#[cfg(feature = "gpu")]
impl From<darkroom_gpu::GpuError> for RenderError {
    fn from(e: darkroom_gpu::GpuError) -> Self {
        Self::Gpu(e.to_string())
    }
}
