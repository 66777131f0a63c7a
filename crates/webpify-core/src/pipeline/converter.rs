//! Per-file conversion - wires together decode, trim, resize, encode and the
//! atomic writes.
//!
//! A [`Converter`] is synchronous and owns no mutable state, so one instance
//! is shared by every worker. Each call to [`Converter::convert`] owns its
//! decoded image for the duration of the job.

use std::io::Write;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use image::{DynamicImage, GenericImageView};

use crate::error::{ConvertError, ConvertResult};
use crate::types::{ConversionJob, ConversionOptions, ConversionOutcome};

use super::atomic::write_atomic;
use super::decode::{decode_file, format_to_string};
use super::discovery::{thumbnail_path, webp_path};
use super::encode::{OutputEncoder, WebpEncoder};
use super::pool::JobHandler;
use super::scale::{clamp_resize, thumbnail};
use super::trim::trim;

/// What a successful conversion did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Converted {
    Written,
    Skipped,
}

/// Converts one source image to WebP.
pub struct Converter {
    options: Arc<ConversionOptions>,
    encoder: Arc<dyn OutputEncoder>,
}

impl Converter {
    /// Create a converter using the libwebp encoder.
    pub fn new(options: Arc<ConversionOptions>) -> Self {
        Self::with_encoder(options, Arc::new(WebpEncoder))
    }

    /// Create a converter with a specific encoder.
    pub fn with_encoder(options: Arc<ConversionOptions>, encoder: Arc<dyn OutputEncoder>) -> Self {
        Self { options, encoder }
    }

    /// Convert `path`, folding every error into the outcome.
    pub fn convert(&self, path: &Path) -> ConversionOutcome {
        match self.try_convert(path) {
            Ok(Converted::Written) => ConversionOutcome::success(path),
            Ok(Converted::Skipped) => ConversionOutcome::skipped(path),
            Err(e) => {
                tracing::debug!("Conversion failed for {:?}: {}", path, e);
                ConversionOutcome::failed(path, e.to_string())
            }
        }
    }

    fn try_convert(&self, path: &Path) -> ConvertResult<Converted> {
        let start = Instant::now();
        let options = &*self.options;

        // Decode
        let decoded = decode_file(path)?;
        let format = format_to_string(decoded.format);
        let file_size = decoded.file_size;
        let mut image = decoded.image;
        tracing::trace!("  Decode: {:?}", start.elapsed());

        // Trim
        if options.trim {
            let trim_start = Instant::now();
            image = trim(image, options.trim_threshold);
            tracing::trace!("  Trim: {:?}", trim_start.elapsed());
        }

        // Clamp to max dimensions
        if options.clamps() {
            let resize_start = Instant::now();
            image = clamp_resize(image, options.max_width, options.max_height);
            tracing::trace!("  Resize: {:?}", resize_start.elapsed());
        }

        // Existence gate, before anything is written
        let dest = webp_path(path);
        if !options.overwrite && dest.exists() {
            if options.delete_original {
                delete_original(path)?;
                tracing::debug!("{:?} exists, removed source {:?}", dest, path);
            } else {
                tracing::debug!("{:?} exists, skipping {:?}", dest, path);
            }
            return Ok(Converted::Skipped);
        }

        // Primary output
        let encode_start = Instant::now();
        write_webp(&dest, &image, self.encoder.as_ref(), options)?;
        tracing::trace!("  Encode: {:?}", encode_start.elapsed());

        // Thumbnail from the final image
        if options.thumbnails() {
            let thumb_dest = thumbnail_path(&dest);
            if !options.overwrite && thumb_dest.exists() {
                tracing::debug!("Thumbnail {:?} exists, keeping it", thumb_dest);
            } else {
                let thumb = thumbnail(&image, options.thumbnail_percent);
                write_webp(&thumb_dest, &thumb, self.encoder.as_ref(), options)?;
            }
        }

        if options.delete_original {
            delete_original(path)?;
        }

        let (width, height) = image.dimensions();
        tracing::debug!(
            "Converted {:?} ({}, {} bytes) -> {:?} {}x{} in {:?}",
            path,
            format,
            file_size,
            dest,
            width,
            height,
            start.elapsed()
        );
        Ok(Converted::Written)
    }
}

impl JobHandler for Converter {
    fn handle(&self, job: &ConversionJob) -> ConversionOutcome {
        self.convert(&job.source_path)
    }
}

/// Encode `image` and commit it to `dest` through a temp file.
pub(crate) fn write_webp(
    dest: &Path,
    image: &DynamicImage,
    encoder: &dyn OutputEncoder,
    options: &ConversionOptions,
) -> ConvertResult<()> {
    write_atomic(dest, |w| {
        let bytes = encoder
            .encode(image, options.quality, options.lossless)
            .map_err(|message| ConvertError::Encode {
                path: dest.to_path_buf(),
                message,
            })?;
        w.write_all(&bytes)
            .map_err(|e| ConvertError::io("write", dest, e))
    })
}

fn delete_original(path: &Path) -> ConvertResult<()> {
    std::fs::remove_file(path).map_err(|source| ConvertError::DeleteOriginal {
        path: path.to_path_buf(),
        source,
    })
}
