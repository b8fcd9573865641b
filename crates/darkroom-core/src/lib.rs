//! Darkroom Core — the non-destructive edit pipeline.
//!
//! This crate contains the edit-state model, LUT builders, per-stage pixel
//! math, and the reference CPU pipeline every backend adapter is tested
//! against. No GPU or framework dependencies.

pub mod buffer;
pub mod color;
pub mod compare;
pub mod edit;
pub mod error;
pub mod lut;
pub mod pipeline;
pub mod stages;

// Re-exports for convenience.
pub use buffer::PixelBuffer;
pub use compare::BufferDiff;
pub use edit::{BypassSet, EditState, StageGroup};
pub use error::PipelineError;
pub use pipeline::{PreparedPipeline, apply};
pub use stages::Stage;
