//! Async preview rendering with stale-result discarding.
//!
//! Each request is tagged with a [`Generation`]. Renders run on tokio's
//! blocking pool and may finish out of order; a result is only published
//! if no newer request was issued while it ran and it is newer than the
//! frame already on screen.

use std::sync::Arc;

use darkroom_core::{BypassSet, EditState, PixelBuffer};
use parking_lot::{Mutex, RwLock};
use tokio::sync::watch;

use crate::backend::RenderBackend;
use crate::config::RenderConfig;
use crate::error::RenderError;
use crate::frame_cache::FrameCache;
use crate::generation::{Generation, GenerationCounter};

/// A rendered frame ready for display.
#[derive(Debug, Clone)]
pub struct PreviewFrame {
    pub generation: Generation,
    pub pixels: Arc<PixelBuffer>,
}

struct SourceSlot {
    /// Bumped on every source change so in-flight renders of the old
    /// image never populate the frame cache.
    epoch: u64,
    pixels: Arc<PixelBuffer>,
}

/// Schedules preview renders for one source image.
pub struct PreviewRenderer {
    backend: Arc<dyn RenderBackend>,
    source: RwLock<SourceSlot>,
    generations: GenerationCounter,
    frames: Mutex<FrameCache>,
    committed: watch::Sender<Option<PreviewFrame>>,
}

impl PreviewRenderer {
    pub fn new(backend: Arc<dyn RenderBackend>, source: PixelBuffer, config: &RenderConfig) -> Self {
        let (committed, _) = watch::channel(None);
        Self {
            backend,
            source: RwLock::new(SourceSlot {
                epoch: 0,
                pixels: Arc::new(source),
            }),
            generations: GenerationCounter::new(),
            frames: Mutex::new(FrameCache::new(config.frame_cache_capacity)),
            committed,
        }
    }

    /// Receive every frame that gets published.
    pub fn subscribe(&self) -> watch::Receiver<Option<PreviewFrame>> {
        self.committed.subscribe()
    }

    /// The most recently published frame.
    pub fn latest_frame(&self) -> Option<PreviewFrame> {
        self.committed.borrow().clone()
    }

    pub fn backend(&self) -> &Arc<dyn RenderBackend> {
        &self.backend
    }

    /// Replace the source image. Cached frames are dropped and any
    /// in-flight render becomes stale.
    pub fn set_source(&self, source: PixelBuffer) {
        {
            // Frames are cleared under the write guard, so no request can
            // observe the new epoch alongside frames of the old image.
            let mut slot = self.source.write();
            slot.epoch += 1;
            slot.pixels = Arc::new(source);
            self.frames.lock().clear();
        }
        let superseding = self.generations.issue();
        tracing::debug!("preview source replaced at generation {}", superseding.value());
    }

    /// Render `edit` and publish it if it is still wanted.
    ///
    /// Returns `Ok(None)` when a newer request superseded this one.
    pub async fn request(
        &self,
        edit: EditState,
        bypass: BypassSet,
    ) -> Result<Option<PreviewFrame>, RenderError> {
        let generation = self.generations.issue();
        let key = edit.fingerprint(&bypass);
        let (epoch, source, cached) = {
            let slot = self.source.read();
            let cached = self.frames.lock().get(key);
            (slot.epoch, Arc::clone(&slot.pixels), cached)
        };

        let pixels = match cached {
            Some(frame) => {
                tracing::debug!("frame cache hit for generation {}", generation.value());
                frame
            }
            None => {
                let backend = Arc::clone(&self.backend);
                let rendered =
                    tokio::task::spawn_blocking(move || backend.render(&source, &edit, &bypass))
                        .await
                        .map_err(|e| {
                            tracing::debug!("preview render task ended early: {e}");
                            RenderError::Cancelled
                        })??;
                let rendered = Arc::new(rendered);
                {
                    // Hold the source guard across the insert so a
                    // concurrent set_source cannot clear in between.
                    let slot = self.source.read();
                    if slot.epoch == epoch {
                        self.frames.lock().insert(key, Arc::clone(&rendered));
                    }
                }
                rendered
            }
        };

        Ok(self.commit(PreviewFrame { generation, pixels }))
    }

    /// Publish `frame` if it belongs to the latest request and is newer
    /// than the frame already committed.
    pub fn commit(&self, frame: PreviewFrame) -> Option<PreviewFrame> {
        if !self.generations.is_current(frame.generation) {
            tracing::debug!(
                "discarding stale preview (generation {}, latest {})",
                frame.generation.value(),
                self.generations.latest().value()
            );
            return None;
        }
        let published = self.committed.send_if_modified(|current| {
            if current
                .as_ref()
                .is_some_and(|shown| shown.generation >= frame.generation)
            {
                return false;
            }
            *current = Some(frame.clone());
            true
        });
        published.then_some(frame)
    }

    /// Issue a generation without rendering, e.g. to cancel pending work.
    pub fn supersede(&self) -> Generation {
        self.generations.issue()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::InteractiveBackend;

    fn renderer() -> PreviewRenderer {
        let source = PixelBuffer::filled(4, 4, [100, 120, 140]);
        PreviewRenderer::new(Arc::new(InteractiveBackend::new()), source, &RenderConfig::cpu())
    }

    #[tokio::test]
    async fn test_request_publishes_frame() {
        let preview = renderer();
        let mut rx = preview.subscribe();
        let edit = EditState::default().updated(|s| s.exposure = 0.3);
        let frame = preview
            .request(edit, BypassSet::none())
            .await
            .expect("render")
            .expect("current request is published");
        assert!(rx.has_changed().expect("sender alive"));
        let shown = rx.borrow_and_update().clone().expect("frame published");
        assert_eq!(shown.generation, frame.generation);
    }

    #[tokio::test]
    async fn test_cached_frame_is_shared() {
        let preview = renderer();
        let edit = EditState::default().updated(|s| s.saturation = 0.5);
        let a = preview
            .request(edit.clone(), BypassSet::none())
            .await
            .expect("render")
            .expect("published");
        let b = preview
            .request(edit, BypassSet::none())
            .await
            .expect("render")
            .expect("published");
        assert!(Arc::ptr_eq(&a.pixels, &b.pixels));
        assert!(b.generation > a.generation);
    }

    #[test]
    fn test_stale_commit_is_discarded() {
        let preview = renderer();
        let old = preview.supersede();
        let new = preview.supersede();
        let pixels = Arc::new(PixelBuffer::filled(1, 1, [0, 0, 0]));
        let stale = PreviewFrame {
            generation: old,
            pixels: Arc::clone(&pixels),
        };
        assert!(preview.commit(stale).is_none());
        assert!(preview.latest_frame().is_none());
        let fresh = PreviewFrame {
            generation: new,
            pixels,
        };
        assert!(preview.commit(fresh).is_some());
        assert_eq!(preview.latest_frame().map(|f| f.generation), Some(new));
    }

    #[test]
    fn test_commit_never_goes_backwards() {
        let preview = renderer();
        let generation = preview.supersede();
        let frame = PreviewFrame {
            generation,
            pixels: Arc::new(PixelBuffer::filled(1, 1, [1, 1, 1])),
        };
        assert!(preview.commit(frame.clone()).is_some());
        // same generation again is not newer than what is shown
        assert!(preview.commit(frame).is_none());
    }

    #[tokio::test]
    async fn test_set_source_clears_cache() {
        let preview = renderer();
        let edit = EditState::default().updated(|s| s.contrast = 0.2);
        let before = preview
            .request(edit.clone(), BypassSet::none())
            .await
            .expect("render")
            .expect("published");
        preview.set_source(PixelBuffer::filled(4, 4, [10, 10, 10]));
        let after = preview
            .request(edit, BypassSet::none())
            .await
            .expect("render")
            .expect("published");
        assert!(!Arc::ptr_eq(&before.pixels, &after.pixels));
        assert_ne!(before.pixels.pixel(0, 0), after.pixels.pixel(0, 0));
    }

    /// Swaps the renderer's source the first time it renders, standing in
    /// for a user opening another image while a preview is in flight.
    struct SwapSourceDuringRender {
        inner: InteractiveBackend,
        preview: std::sync::OnceLock<std::sync::Weak<PreviewRenderer>>,
        next_source: Mutex<Option<PixelBuffer>>,
    }

    impl RenderBackend for SwapSourceDuringRender {
        fn kind(&self) -> crate::backend::BackendKind {
            self.inner.kind()
        }

        fn render(
            &self,
            pixels: &PixelBuffer,
            edit: &EditState,
            bypass: &BypassSet,
        ) -> Result<PixelBuffer, RenderError> {
            let out = self.inner.render(pixels, edit, bypass)?;
            let next = self.next_source.lock().take();
            if let (Some(next), Some(preview)) =
                (next, self.preview.get().and_then(std::sync::Weak::upgrade))
            {
                preview.set_source(next);
            }
            Ok(out)
        }
    }

    #[tokio::test]
    async fn test_source_swap_mid_render_never_serves_old_frame() {
        let new_source = PixelBuffer::filled(4, 4, [10, 200, 30]);
        let backend = Arc::new(SwapSourceDuringRender {
            inner: InteractiveBackend::new(),
            preview: std::sync::OnceLock::new(),
            next_source: Mutex::new(Some(new_source.clone())),
        });
        let preview = Arc::new(PreviewRenderer::new(
            Arc::clone(&backend) as Arc<dyn RenderBackend>,
            PixelBuffer::filled(4, 4, [100, 120, 140]),
            &RenderConfig::cpu(),
        ));
        assert!(backend.preview.set(Arc::downgrade(&preview)).is_ok());

        let edit = EditState::default().updated(|s| s.contrast = 0.3);
        let first = preview
            .request(edit.clone(), BypassSet::none())
            .await
            .expect("render");
        assert!(first.is_none(), "render of the replaced image must not publish");

        let second = preview
            .request(edit.clone(), BypassSet::none())
            .await
            .expect("render")
            .expect("published");
        let expected = InteractiveBackend::new()
            .render(&new_source, &edit, &BypassSet::none())
            .expect("render");
        assert_eq!(*second.pixels, expected);
    }
}
