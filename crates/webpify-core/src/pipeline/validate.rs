//! Input validation before decoding.

use std::path::Path;

use crate::error::ConvertError;

/// Reject files whose first bytes don't match a supported raster format.
///
/// Runs on the already-read buffer so misnamed non-images fail with a short
/// `decode:` cause instead of a codec error.
pub fn check_magic_bytes(path: &Path, bytes: &[u8]) -> Result<(), ConvertError> {
    if bytes.len() < 4 {
        return Err(ConvertError::Decode {
            path: path.to_path_buf(),
            message: "file too small to be a valid image".to_string(),
        });
    }

    if !is_valid_image_header(bytes) {
        return Err(ConvertError::Decode {
            path: path.to_path_buf(),
            message: "unrecognized image format (invalid magic bytes)".to_string(),
        });
    }

    Ok(())
}

/// Check if the header bytes match a format we can decode.
fn is_valid_image_header(header: &[u8]) -> bool {
    match header {
        // JPEG: FF D8 FF
        [0xFF, 0xD8, 0xFF, ..] => true,
        // PNG: 89 50 4E 47
        [0x89, b'P', b'N', b'G', ..] => true,
        // GIF: GIF8
        [b'G', b'I', b'F', b'8', ..] => true,
        // WebP: RIFF....WEBP
        [b'R', b'I', b'F', b'F', _, _, _, _, b'W', b'E', b'B', b'P', ..] => true,
        // BMP: BM
        [b'B', b'M', ..] => true,
        // TIFF: II or MM followed by version 42
        [b'I', b'I', 0x2A, 0x00, ..] | [b'M', b'M', 0x00, 0x2A, ..] => true,
        _ => false,
    }
}
