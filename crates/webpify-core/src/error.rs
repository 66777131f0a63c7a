//! Error types for the webpify conversion pipeline.
//!
//! Errors are organized by concern so that a failed job can be reported with
//! the file path and the stage that failed. Per-file errors never abort a
//! batch; they are folded into a [`ConversionOutcome`](crate::ConversionOutcome).

use std::path::PathBuf;
use thiserror::Error;

/// Top-level error type for webpify operations.
#[derive(Error, Debug)]
pub enum WebpifyError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Per-file conversion errors
    #[error("Conversion error: {0}")]
    Convert(#[from] ConvertError),

    /// General I/O errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read the config file from disk
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    /// Failed to parse TOML configuration
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Configuration values are invalid
    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// Errors raised while converting a single file.
///
/// The `Display` output is what ends up in `[FAIL]` lines, so the decode
/// variant keeps the `decode:` prefix users grep for.
#[derive(Error, Debug)]
pub enum ConvertError {
    /// Source file unreadable or not a recognized raster format
    #[error("decode: {message}")]
    Decode { path: PathBuf, message: String },

    /// The WebP codec rejected the image
    #[error("encode webp {path}: {message}")]
    Encode { path: PathBuf, message: String },

    /// Filesystem failure while creating, renaming or removing a file
    #[error("{action} {path}: {source}")]
    Io {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The output was written but the source could not be removed
    #[error("failed to delete original file {path}: {source}")]
    DeleteOriginal {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Reading dimensions for the metadata export failed
    #[error("export {path}: {message}")]
    Export { path: PathBuf, message: String },
}

impl ConvertError {
    /// Build an [`ConvertError::Io`] for the given action and path.
    pub fn io(action: &'static str, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            action,
            path: path.into(),
            source,
        }
    }
}

/// Convenience type alias for webpify results.
pub type Result<T> = std::result::Result<T, WebpifyError>;

/// Convenience type alias for per-file conversion results.
pub type ConvertResult<T> = std::result::Result<T, ConvertError>;
