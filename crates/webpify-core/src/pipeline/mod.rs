//! Image conversion pipeline components.
//!
//! This module contains all the stages of a conversion run:
//! - **discovery**: Find source images and existing WebP outputs
//! - **validate**: Magic-byte check before decoding
//! - **decode**: Load and decode images from various formats
//! - **trim**: Crop transparent borders
//! - **scale**: Clamp to maximum dimensions and derive thumbnails
//! - **encode**: WebP encoding
//! - **atomic**: Temp-file-then-rename output writes
//! - **converter**: Per-file conversion
//! - **thumbnail**: Thumbnail backfill for existing WebP files
//! - **pool**: Bounded worker pool fan-out/fan-in

pub mod atomic;
pub mod converter;
pub mod decode;
pub mod discovery;
pub mod encode;
pub mod pool;
pub mod scale;
pub mod thumbnail;
pub mod trim;
pub mod validate;

// Re-exports for convenient access
pub use converter::Converter;
pub use decode::{decode_file, DecodedImage};
pub use discovery::{thumbnail_path, webp_path, FileDiscovery, THUMBNAIL_SUFFIX};
pub use encode::{OutputEncoder, WebpEncoder};
pub use pool::{JobHandler, WorkerPool};
pub use scale::{clamp_dimensions, clamp_resize, thumbnail, thumbnail_dimensions};
pub use thumbnail::ThumbnailBackfill;
pub use trim::{find_content_bounds, trim, Rectangle};
