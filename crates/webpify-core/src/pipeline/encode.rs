//! WebP encoding.
//!
//! The encoder is a trait so the converter can be driven with a stand-in
//! codec in tests; the production implementation wraps libwebp through the
//! `webp` crate, which supports both lossy (quality-driven) and lossless
//! output.

use image::{DynamicImage, GenericImageView};

/// Turns a raster image into encoded output bytes.
pub trait OutputEncoder: Send + Sync {
    /// Encode `image`. Errors are returned as a human-readable cause.
    fn encode(&self, image: &DynamicImage, quality: f32, lossless: bool)
        -> Result<Vec<u8>, String>;
}

/// libwebp-backed encoder.
#[derive(Debug, Default, Clone, Copy)]
pub struct WebpEncoder;

impl OutputEncoder for WebpEncoder {
    fn encode(
        &self,
        image: &DynamicImage,
        quality: f32,
        lossless: bool,
    ) -> Result<Vec<u8>, String> {
        let rgba = image.to_rgba8();
        let (width, height) = image.dimensions();
        let encoder = webp::Encoder::from_rgba(rgba.as_raw(), width, height);

        let mut config =
            webp::WebPConfig::new().map_err(|_| "failed to create WebPConfig".to_string())?;
        config.lossless = i32::from(lossless);
        config.quality = quality;

        let memory = encoder
            .encode_advanced(&config)
            .map_err(|e| format!("{e:?}"))?;
        Ok(memory.to_vec())
    }
}
