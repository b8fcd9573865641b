//! Errors raised by the edit pipeline.

/// Errors that can occur when invoking the pipeline.
///
/// Out-of-range parameters and malformed curves are recovered by the
/// edit-state layer and never surface here.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PipelineError {
    #[error(
        "buffer of {actual} bytes does not match {width}x{height} RGB (expected {expected} bytes)"
    )]
    InvalidBufferShape {
        width: u32,
        height: u32,
        expected: usize,
        actual: usize,
    },
}
