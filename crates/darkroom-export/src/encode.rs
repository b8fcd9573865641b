//! Source decoding and output encoding through the `image` crate.

use std::io::Cursor;

use darkroom_core::PixelBuffer;
use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::codecs::tiff::TiffEncoder;
use image::{ExtendedColorType, ImageEncoder};

use crate::error::ExportError;
use crate::format::{ExportFormat, is_raw_file_name};

/// Decode a JPEG/PNG/TIFF source into 8-bit RGB. Alpha is dropped.
pub fn decode_source(file_name: &str, bytes: &[u8]) -> Result<PixelBuffer, ExportError> {
    if is_raw_file_name(file_name) {
        return Err(ExportError::UnsupportedSourceFormat(format!(
            "'{file_name}' is a camera RAW file"
        )));
    }
    let format = image::guess_format(bytes)
        .map_err(|_| ExportError::UnsupportedSourceFormat(format!("'{file_name}' is not a known image")))?;
    let decoded = image::load_from_memory_with_format(bytes, format)
        .map_err(|e| ExportError::Decode(e.to_string()))?;
    Ok(PixelBuffer::from_image(&decoded))
}

/// Encode developed pixels. `quality` only affects JPEG.
pub fn encode(pixels: PixelBuffer, format: ExportFormat, quality: u8) -> Result<Vec<u8>, ExportError> {
    let rgb = pixels.into_rgb_image();
    let (width, height) = rgb.dimensions();
    let mut buf = Cursor::new(Vec::new());
    let result = match format {
        ExportFormat::Jpeg => JpegEncoder::new_with_quality(&mut buf, quality).write_image(
            rgb.as_raw(),
            width,
            height,
            ExtendedColorType::Rgb8,
        ),
        ExportFormat::Png => {
            PngEncoder::new(&mut buf).write_image(rgb.as_raw(), width, height, ExtendedColorType::Rgb8)
        }
        ExportFormat::Tiff => TiffEncoder::new(&mut buf).write_image(
            rgb.as_raw(),
            width,
            height,
            ExtendedColorType::Rgb8,
        ),
    };
    result.map_err(|e| ExportError::Encode {
        format: format.label(),
        message: e.to_string(),
    })?;
    Ok(buf.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> PixelBuffer {
        let data: Vec<u8> = (0..8 * 6 * 3).map(|i| (i * 7 % 256) as u8).collect();
        PixelBuffer::new(8, 6, data).expect("valid shape")
    }

    #[test]
    fn test_png_is_lossless() {
        let px = sample();
        let bytes = encode(px.clone(), ExportFormat::Png, 95).expect("encode");
        let back = decode_source("out.png", &bytes).expect("decode");
        assert_eq!(back, px);
    }

    #[test]
    fn test_tiff_is_lossless() {
        let px = sample();
        let bytes = encode(px.clone(), ExportFormat::Tiff, 95).expect("encode");
        let back = decode_source("out.tiff", &bytes).expect("decode");
        assert_eq!(back, px);
    }

    #[test]
    fn test_jpeg_keeps_dimensions() {
        let bytes = encode(sample(), ExportFormat::Jpeg, 90).expect("encode");
        assert_eq!(&bytes[..2], &[0xff, 0xd8]);
        let back = decode_source("out.jpg", &bytes).expect("decode");
        assert_eq!((back.width(), back.height()), (8, 6));
    }

    #[test]
    fn test_raw_name_rejected_before_decoding() {
        let bytes = encode(sample(), ExportFormat::Tiff, 95).expect("encode");
        // DNG is a TIFF container, so the name is what gives it away
        let err = decode_source("photo.DNG", &bytes).expect_err("raw must be rejected");
        assert!(matches!(err, ExportError::UnsupportedSourceFormat(_)));
    }

    #[test]
    fn test_garbage_is_unsupported() {
        let err = decode_source("notes.txt", b"hello world").expect_err("not an image");
        assert!(matches!(err, ExportError::UnsupportedSourceFormat(_)));
    }
}
