//! Small LRU of rendered preview frames.

use std::collections::VecDeque;
use std::sync::Arc;

use darkroom_core::PixelBuffer;

/// Rendered frames keyed by edit fingerprint, oldest evicted first.
#[derive(Debug)]
pub struct FrameCache {
    capacity: usize,
    entries: VecDeque<(u64, Arc<PixelBuffer>)>,
}

impl FrameCache {
    /// A capacity of 0 disables caching.
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            entries: VecDeque::with_capacity(capacity),
        }
    }

    /// Look up a frame and mark it most recently used.
    pub fn get(&mut self, key: u64) -> Option<Arc<PixelBuffer>> {
        let pos = self.entries.iter().position(|(k, _)| *k == key)?;
        let entry = self.entries.remove(pos)?;
        let frame = Arc::clone(&entry.1);
        self.entries.push_back(entry);
        Some(frame)
    }

    pub fn insert(&mut self, key: u64, frame: Arc<PixelBuffer>) {
        if self.capacity == 0 {
            return;
        }
        if let Some(pos) = self.entries.iter().position(|(k, _)| *k == key) {
            self.entries.remove(pos);
        }
        while self.entries.len() >= self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back((key, frame));
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
