//! Darkroom Export — the server export boundary.
//!
//! Decodes a source image, develops it with an [`EditValues`] through any
//! [`RenderBackend`], and encodes the result as JPEG, PNG or TIFF together
//! with the headers an HTTP handler needs. RAW sources are rejected here;
//! decoding them is somebody else's job.

pub mod config;
pub mod encode;
pub mod error;
pub mod format;
pub mod values;

use std::sync::Arc;

use darkroom_core::{BypassSet, EditState};
use darkroom_render::RenderBackend;
use serde::{Deserialize, Serialize};

pub use config::ExportConfig;
pub use error::ExportError;
pub use format::ExportFormat;
pub use values::EditValues;

/// The uploaded source file.
#[derive(Debug, Clone)]
pub struct SourceImage {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

/// One export job.
#[derive(Debug, Clone)]
pub struct ExportRequest {
    pub source: SourceImage,
    pub edits: EditValues,
    pub format: ExportFormat,
    /// JPEG quality, 1..=100. `None` uses the configured default.
    pub quality: Option<u8>,
}

/// Encoded output plus response headers.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportResponse {
    #[serde(skip)]
    pub bytes: Vec<u8>,
    pub content_type: String,
    pub content_disposition: String,
    pub width: u32,
    pub height: u32,
}

/// Runs export jobs against a render backend.
pub struct Exporter {
    backend: Arc<dyn RenderBackend>,
    config: ExportConfig,
}

impl Exporter {
    pub fn new(backend: Arc<dyn RenderBackend>, config: ExportConfig) -> Self {
        Self { backend, config }
    }

    pub fn config(&self) -> &ExportConfig {
        &self.config
    }

    /// Decode, develop and encode one image. Exports never bypass groups.
    pub fn export(&self, request: &ExportRequest) -> Result<ExportResponse, ExportError> {
        let quality = request.quality.unwrap_or(self.config.default_jpeg_quality);
        if !(1..=100).contains(&quality) {
            return Err(ExportError::InvalidQuality(quality));
        }

        let source = encode::decode_source(&request.source.file_name, &request.source.bytes)?;
        let edit: EditState = request.edits.clone().into();
        let developed = self.backend.render(&source, &edit, &BypassSet::none())?;
        let (width, height) = (developed.width(), developed.height());
        let bytes = encode::encode(developed, request.format, quality)?;

        tracing::info!(
            "exported '{}' as {} ({width}x{height}, {} bytes, {} backend)",
            request.source.file_name,
            request.format,
            bytes.len(),
            self.backend.kind().label()
        );
        Ok(ExportResponse {
            content_type: request.format.content_type().to_string(),
            content_disposition: format::content_disposition(
                &request.source.file_name,
                request.format,
            ),
            width,
            height,
            bytes,
        })
    }
}
