//! Buffer comparison used to hold backends to the reference output.

use crate::buffer::PixelBuffer;

/// Mean channel delta (in 0..1 units) two backends may differ by.
pub const BACKEND_TOLERANCE: f32 = 2.0 / 255.0;

/// Channel differences between two equally-shaped buffers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BufferDiff {
    /// Mean absolute channel delta, normalised to 0..1.
    pub mean: f32,
    /// Largest absolute channel delta in levels.
    pub max: u8,
}

impl BufferDiff {
    /// Compare two buffers; `None` if their shapes differ.
    pub fn between(a: &PixelBuffer, b: &PixelBuffer) -> Option<Self> {
        if a.width() != b.width() || a.height() != b.height() {
            return None;
        }
        let mut total = 0u64;
        let mut max = 0u8;
        for (&x, &y) in a.as_bytes().iter().zip(b.as_bytes()) {
            let d = x.abs_diff(y);
            total += u64::from(d);
            max = max.max(d);
        }
        let count = a.as_bytes().len().max(1) as f64;
        Some(Self {
            mean: (total as f64 / count / 255.0) as f32,
            max,
        })
    }

    pub fn within(&self, tolerance: f32) -> bool {
        self.mean <= tolerance
    }

    /// Whether the difference is visually equivalent.
    pub fn is_equivalent(&self) -> bool {
        self.within(BACKEND_TOLERANCE)
    }
}
