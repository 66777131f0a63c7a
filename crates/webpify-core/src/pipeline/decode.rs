//! Image decoding with content-based format detection.

use image::{DynamicImage, GenericImageView, ImageFormat};
use std::io::Cursor;
use std::path::Path;

use crate::error::ConvertError;

use super::validate::check_magic_bytes;

/// Result of decoding an image.
#[derive(Debug)]
pub struct DecodedImage {
    /// The decoded image data
    pub image: DynamicImage,
    /// Detected image format
    pub format: ImageFormat,
    /// Original file size in bytes
    pub file_size: u64,
}

/// Read and decode the image at `path`.
///
/// The format is sniffed from the content, falling back to the extension, so
/// a PNG saved as `.jpg` still decodes.
pub fn decode_file(path: &Path) -> Result<DecodedImage, ConvertError> {
    let bytes = std::fs::read(path).map_err(|e| ConvertError::Decode {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    decode_bytes(bytes, path)
}

/// Decode an in-memory buffer that was read from `path`.
pub fn decode_bytes(bytes: Vec<u8>, path: &Path) -> Result<DecodedImage, ConvertError> {
    check_magic_bytes(path, &bytes)?;

    let file_size = bytes.len() as u64;
    let mut reader = image::ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| ConvertError::Decode {
            path: path.to_path_buf(),
            message: format!("cannot detect image format: {}", e),
        })?;
    let format = match reader.format() {
        Some(f) => f,
        None => {
            let f = ImageFormat::from_path(path).map_err(|_| ConvertError::Decode {
                path: path.to_path_buf(),
                message: "unsupported image format".to_string(),
            })?;
            reader.set_format(f);
            f
        }
    };
    let image = reader.decode().map_err(|e| ConvertError::Decode {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    let (width, height) = image.dimensions();
    tracing::trace!(
        "Decoded {:?} as {} ({}x{}, {} bytes)",
        path,
        format_to_string(format),
        width,
        height,
        file_size
    );

    Ok(DecodedImage {
        image,
        format,
        file_size,
    })
}

/// Convert an ImageFormat to a string representation.
pub fn format_to_string(format: ImageFormat) -> &'static str {
    match format {
        ImageFormat::Jpeg => "jpeg",
        ImageFormat::Png => "png",
        ImageFormat::WebP => "webp",
        ImageFormat::Gif => "gif",
        ImageFormat::Tiff => "tiff",
        ImageFormat::Bmp => "bmp",
        _ => "unknown",
    }
}
