//! Webpify Core - batch conversion of raster images to WebP.
//!
//! Each source image is decoded, optionally trimmed of transparent borders,
//! optionally clamped to maximum dimensions, and written next to the source
//! as `<name>.webp` (plus an optional `<name>_thumbnail.webp`). A bounded
//! pool of workers processes files concurrently; every output is written
//! through a temp file and an atomic rename.
//!
//! # Architecture
//!
//! ```text
//! Discover → Decode → Trim → Clamp → Encode → Atomic write (+ thumbnail)
//!                     ╰──────── one job per file, N workers ───────╯
//! ```
//!
//! # Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use webpify_core::{Config, ConversionOptions, FileDiscovery, WorkerPool};
//!
//! #[tokio::main]
//! async fn main() -> webpify_core::Result<()> {
//!     let config = Config::load()?;
//!     let files = FileDiscovery::new(&config.processing).discover("./photos".as_ref());
//!     let options = Arc::new(ConversionOptions::from_config(&config));
//!
//!     let outcomes = WorkerPool::from_config(&config)
//!         .convert(files, options, |outcome| println!("{outcome}"))
//!         .await;
//!     println!("{}", webpify_core::BatchSummary::from_outcomes(&outcomes));
//!     Ok(())
//! }
//! ```

// Module declarations
pub mod config;
pub mod error;
pub mod export;
pub mod pipeline;
pub mod types;

// Re-exports for convenient access
pub use config::Config;
pub use error::{ConfigError, ConvertError, ConvertResult, Result, WebpifyError};
pub use export::{export_info, ExportSummary, ImageInfo};
pub use pipeline::{
    Converter, FileDiscovery, JobHandler, OutputEncoder, ThumbnailBackfill, WebpEncoder,
    WorkerPool,
};
pub use types::{BatchSummary, ConversionJob, ConversionOptions, ConversionOutcome, OutcomeKind};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
