//! Thumbnail backfill for WebP files that already exist.
//!
//! When thumbnails are requested, primary `.webp` outputs from earlier runs
//! (or produced by other tools) get a `_thumbnail.webp` sibling too. Each
//! file is a job on the regular worker pool.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::error::ConvertResult;
use crate::types::{ConversionJob, ConversionOptions, ConversionOutcome};

use super::converter::write_webp;
use super::decode::decode_file;
use super::discovery::thumbnail_path;
use super::encode::{OutputEncoder, WebpEncoder};
use super::pool::JobHandler;
use super::scale::thumbnail;

/// Generates thumbnails for existing primary WebP files.
pub struct ThumbnailBackfill {
    options: Arc<ConversionOptions>,
    encoder: Arc<dyn OutputEncoder>,
}

impl ThumbnailBackfill {
    /// Create a backfill pass using the libwebp encoder.
    pub fn new(options: Arc<ConversionOptions>) -> Self {
        Self::with_encoder(options, Arc::new(WebpEncoder))
    }

    pub fn with_encoder(options: Arc<ConversionOptions>, encoder: Arc<dyn OutputEncoder>) -> Self {
        Self { options, encoder }
    }

    /// Check if thumbnail generation is enabled.
    pub fn is_enabled(&self) -> bool {
        self.options.thumbnails()
    }

    /// Keep the WebP files whose thumbnail would be (re)written.
    pub fn pending(&self, webps: Vec<PathBuf>) -> Vec<PathBuf> {
        if !self.is_enabled() {
            return Vec::new();
        }
        if self.options.overwrite {
            return webps;
        }
        webps
            .into_iter()
            .filter(|p| !thumbnail_path(p).exists())
            .collect()
    }

    /// Write the thumbnail for one primary WebP file.
    pub fn generate(&self, webp: &Path) -> ConversionOutcome {
        let thumb_dest = thumbnail_path(webp);
        if !self.options.overwrite && thumb_dest.exists() {
            return ConversionOutcome::skipped(webp);
        }
        match self.try_generate(webp, &thumb_dest) {
            Ok(()) => ConversionOutcome::success(webp),
            Err(e) => {
                tracing::debug!("Thumbnail failed for {:?}: {}", webp, e);
                ConversionOutcome::failed(webp, e.to_string())
            }
        }
    }

    fn try_generate(&self, webp: &Path, thumb_dest: &Path) -> ConvertResult<()> {
        let decoded = decode_file(webp)?;
        let thumb = thumbnail(&decoded.image, self.options.thumbnail_percent);
        write_webp(thumb_dest, &thumb, self.encoder.as_ref(), &self.options)?;
        tracing::debug!("Thumbnail written: {:?}", thumb_dest);
        Ok(())
    }
}

impl JobHandler for ThumbnailBackfill {
    fn handle(&self, job: &ConversionJob) -> ConversionOutcome {
        self.generate(&job.source_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, GenericImageView};

    fn options(percent: u32, overwrite: bool) -> Arc<ConversionOptions> {
        Arc::new(ConversionOptions {
            thumbnail_percent: percent,
            overwrite,
            ..ConversionOptions::default()
        })
    }

    fn write_webp_fixture(path: &Path, width: u32, height: u32) {
        let img = DynamicImage::new_rgba8(width, height);
        let bytes = WebpEncoder.encode(&img, 90.0, true).unwrap();
        std::fs::write(path, bytes).unwrap();
    }

    #[test]
    fn test_generate_creates_scaled_thumbnail() {
        let dir = tempfile::tempdir().unwrap();
        let webp = dir.path().join("photo.webp");
        write_webp_fixture(&webp, 80, 60);

        let backfill = ThumbnailBackfill::new(options(50, false));
        assert!(backfill.generate(&webp).is_success());

        let thumb = image::open(dir.path().join("photo_thumbnail.webp")).unwrap();
        assert_eq!(thumb.dimensions(), (40, 30));
    }

    #[test]
    fn test_pending_skips_existing_thumbnails() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("a.webp");
        let b = dir.path().join("b.webp");
        write_webp_fixture(&a, 4, 4);
        write_webp_fixture(&b, 4, 4);
        std::fs::write(dir.path().join("a_thumbnail.webp"), b"x").unwrap();

        let backfill = ThumbnailBackfill::new(options(10, false));
        assert_eq!(backfill.pending(vec![a.clone(), b.clone()]), vec![b.clone()]);

        let overwrite = ThumbnailBackfill::new(options(10, true));
        assert_eq!(overwrite.pending(vec![a.clone(), b.clone()]), vec![a, b]);
    }

    #[test]
    fn test_disabled_backfill_has_nothing_pending() {
        let backfill = ThumbnailBackfill::new(options(0, false));
        assert!(!backfill.is_enabled());
        assert!(backfill.pending(vec![PathBuf::from("a.webp")]).is_empty());
    }

    #[test]
    fn test_existing_thumbnail_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let webp = dir.path().join("a.webp");
        write_webp_fixture(&webp, 8, 8);
        let thumb = dir.path().join("a_thumbnail.webp");
        std::fs::write(&thumb, b"keep").unwrap();

        let outcome = ThumbnailBackfill::new(options(50, false)).generate(&webp);
        assert!(outcome.is_skipped());
        assert_eq!(std::fs::read(&thumb).unwrap(), b"keep");
    }
}
