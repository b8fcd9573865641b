//! Errors raised at the export boundary.

use darkroom_render::RenderError;

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    /// RAW/DNG or otherwise undecodable container; decoding these is the
    /// caller's responsibility.
    #[error("unsupported source format: {0}")]
    UnsupportedSourceFormat(String),
    #[error("failed to decode source image: {0}")]
    Decode(String),
    #[error("failed to encode {format} output: {message}")]
    Encode {
        format: &'static str,
        message: String,
    },
    #[error("render failed: {0}")]
    Render(#[from] RenderError),
    #[error("quality must be between 1 and 100, got {0}")]
    InvalidQuality(u8),
}
