//! Darkroom Render — backend adapters and preview scheduling.
//!
//! Wraps the core pipeline in the [`RenderBackend`] trait so the server,
//! the interactive CPU preview and the wgpu compute path are
//! interchangeable, and adds the generation bookkeeping that keeps a
//! slow render from overwriting a newer one.

pub mod backend;
pub mod config;
pub mod error;
pub mod frame_cache;
pub mod generation;
#[cfg(feature = "gpu")]
pub mod gpu;
pub mod preview;

use std::sync::Arc;

pub use backend::{BackendKind, InteractiveBackend, PreparedCache, ReferenceBackend, RenderBackend};
pub use config::{BackendPreference, RenderConfig};
pub use error::RenderError;
pub use frame_cache::FrameCache;
pub use generation::{Generation, GenerationCounter};
#[cfg(feature = "gpu")]
pub use gpu::GpuBackend;
pub use preview::{PreviewFrame, PreviewRenderer};

/// Pick the interactive backend for `config`.
///
/// A GPU preference falls back to the cached CPU pipeline when no device
/// can be created.
pub fn select_backend(config: &RenderConfig) -> Arc<dyn RenderBackend> {
    if config.backend == BackendPreference::Gpu {
        if let Some(gpu) = try_gpu_backend() {
            return gpu;
        }
    }
    tracing::info!("using interactive CPU backend");
    Arc::new(InteractiveBackend::new())
}

#[cfg(feature = "gpu")]
fn try_gpu_backend() -> Option<Arc<dyn RenderBackend>> {
    match GpuBackend::new() {
        Ok(gpu) => {
            tracing::info!("using GPU backend on '{}'", gpu.adapter_name());
            Some(Arc::new(gpu))
        }
        Err(e) => {
            tracing::warn!("GPU backend unavailable ({e}); falling back to CPU");
            None
        }
    }
}

#[cfg(not(feature = "gpu"))]
fn try_gpu_backend() -> Option<Arc<dyn RenderBackend>> {
    tracing::warn!("GPU backend requested but the `gpu` feature is disabled");
    None
}
