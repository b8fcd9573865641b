//! Backend adapters for the canonical stage pipeline.
//!
//! Every adapter must produce output equivalent to [`darkroom_core::apply`]
//! within [`darkroom_core::compare::BACKEND_TOLERANCE`].

use std::collections::VecDeque;
use std::sync::Arc;

use darkroom_core::{BypassSet, EditState, PixelBuffer, PreparedPipeline};
use parking_lot::Mutex;

use crate::error::RenderError;

/// Prepared pipelines kept by a cached backend. Slider drags revisit a
/// handful of states, so this stays small.
const PREPARED_CACHE_CAPACITY: usize = 4;

/// Identifies an adapter in logs and tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BackendKind {
    /// Uncached reference pipeline, used on the server.
    Reference,
    /// CPU pipeline with cached LUTs, used for interactive preview.
    Interactive,
    /// wgpu compute pass.
    Gpu,
}

impl BackendKind {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Reference => "reference",
            Self::Interactive => "interactive",
            Self::Gpu => "gpu",
        }
    }
}

/// An environment-specific executor of the stage pipeline.
pub trait RenderBackend: Send + Sync {
    fn kind(&self) -> BackendKind;

    /// Render `pixels` with `edit`, skipping the groups in `bypass`.
    /// The source buffer is never modified.
    fn render(
        &self,
        pixels: &PixelBuffer,
        edit: &EditState,
        bypass: &BypassSet,
    ) -> Result<PixelBuffer, RenderError>;
}

/// Server path: the raw-buffer entry point with no caching.
#[derive(Debug, Default, Clone, Copy)]
pub struct ReferenceBackend;

impl RenderBackend for ReferenceBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::Reference
    }

    fn render(
        &self,
        pixels: &PixelBuffer,
        edit: &EditState,
        bypass: &BypassSet,
    ) -> Result<PixelBuffer, RenderError> {
        Ok(darkroom_core::apply(
            pixels.as_bytes(),
            pixels.width(),
            pixels.height(),
            edit,
            bypass,
        )?)
    }
}

/// Most-recently-used prepared pipelines keyed by edit fingerprint.
#[derive(Debug)]
pub struct PreparedCache {
    capacity: usize,
    entries: Mutex<VecDeque<(u64, Arc<PreparedPipeline>)>>,
}

impl Default for PreparedCache {
    fn default() -> Self {
        Self::with_capacity(PREPARED_CACHE_CAPACITY)
    }
}

impl PreparedCache {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            entries: Mutex::new(VecDeque::with_capacity(capacity.max(1))),
        }
    }

    /// Return the cached pipeline for this state, baking it on a miss.
    pub fn get_or_prepare(&self, edit: &EditState, bypass: &BypassSet) -> Arc<PreparedPipeline> {
        let key = edit.fingerprint(bypass);
        {
            let mut entries = self.entries.lock();
            if let Some(pos) = entries.iter().position(|(k, _)| *k == key) {
                if let Some(entry) = entries.remove(pos) {
                    let prepared = Arc::clone(&entry.1);
                    entries.push_back(entry);
                    tracing::debug!("prepared pipeline cache hit ({key:016x})");
                    return prepared;
                }
            }
        }

        // Bake outside the lock; a concurrent miss on the same key only
        // costs a duplicate bake.
        tracing::debug!("prepared pipeline cache miss ({key:016x})");
        let prepared = Arc::new(PreparedPipeline::new(edit, bypass));
        let mut entries = self.entries.lock();
        if !entries.iter().any(|(k, _)| *k == key) {
            if entries.len() >= self.capacity {
                entries.pop_front();
            }
            entries.push_back((key, Arc::clone(&prepared)));
        }
        prepared
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }
}

/// Interactive CPU path: reuses baked LUTs while the edit is unchanged.
#[derive(Debug, Default)]
pub struct InteractiveBackend {
    cache: PreparedCache,
}

impl InteractiveBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cache(&self) -> &PreparedCache {
        &self.cache
    }
}

impl RenderBackend for InteractiveBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::Interactive
    }

    fn render(
        &self,
        pixels: &PixelBuffer,
        edit: &EditState,
        bypass: &BypassSet,
    ) -> Result<PixelBuffer, RenderError> {
        Ok(self.cache.get_or_prepare(edit, bypass).run(pixels))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_image() -> PixelBuffer {
        let data: Vec<u8> = (0..4 * 4 * 3).map(|i| (i * 5) as u8).collect();
        PixelBuffer::new(4, 4, data).expect("valid shape")
    }

    #[test]
    fn test_reference_matches_apply() {
        let img = test_image();
        let edit = EditState::default().updated(|s| s.contrast = 0.4);
        let out = ReferenceBackend
            .render(&img, &edit, &BypassSet::none())
            .expect("render");
        let expected = darkroom_core::apply(img.as_bytes(), 4, 4, &edit, &BypassSet::none())
            .expect("apply");
        assert_eq!(out, expected);
    }

    #[test]
    fn test_cache_hit_reuses_pipeline() {
        let cache = PreparedCache::default();
        let edit = EditState::default().updated(|s| s.exposure = 0.2);
        let a = cache.get_or_prepare(&edit, &BypassSet::none());
        let b = cache.get_or_prepare(&edit, &BypassSet::none());
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_cache_key_includes_bypass() {
        let cache = PreparedCache::default();
        let edit = EditState::default().updated(|s| s.exposure = 0.2);
        let a = cache.get_or_prepare(&edit, &BypassSet::none());
        let b = cache.get_or_prepare(&edit, &BypassSet::only(darkroom_core::StageGroup::Light));
        assert!(!Arc::ptr_eq(&a, &b));
        assert!(b.is_identity());
    }

    #[test]
    fn test_cache_evicts_oldest() {
        let cache = PreparedCache::with_capacity(2);
        let edits: Vec<EditState> = (1..=3)
            .map(|i| EditState::default().updated(|s| s.exposure = i as f32 * 0.1))
            .collect();
        let first = cache.get_or_prepare(&edits[0], &BypassSet::none());
        cache.get_or_prepare(&edits[1], &BypassSet::none());
        cache.get_or_prepare(&edits[2], &BypassSet::none());
        assert_eq!(cache.len(), 2);
        let again = cache.get_or_prepare(&edits[0], &BypassSet::none());
        assert!(!Arc::ptr_eq(&first, &again));
    }

    #[test]
    fn test_interactive_leaves_source_untouched() {
        let img = test_image();
        let before = img.clone();
        let edit = EditState::default().updated(|s| s.saturation = 0.8);
        let backend = InteractiveBackend::new();
        let _ = backend.render(&img, &edit, &BypassSet::none()).expect("render");
        assert_eq!(img, before);
        assert_eq!(backend.kind(), BackendKind::Interactive);
    }
}
