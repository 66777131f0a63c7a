//! Sub-configuration structs with defaults matching the command-line tool.

use serde::{Deserialize, Serialize};

/// WebP encoder and output-handling settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ConversionConfig {
    /// WebP quality factor (0-100). Lossless output treats it as
    /// compression effort.
    pub quality: f32,

    /// Use lossless WebP encoding
    pub lossless: bool,

    /// Overwrite existing .webp files
    pub overwrite: bool,

    /// Delete the source image after a successful conversion
    pub delete_original: bool,
}

impl Default for ConversionConfig {
    fn default() -> Self {
        Self {
            quality: 100.0,
            lossless: false,
            overwrite: false,
            delete_original: false,
        }
    }
}

/// Transparent border trimming.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TrimConfig {
    /// Trim transparent borders before encoding
    pub enabled: bool,

    /// Alpha at or below this value counts as transparent
    pub threshold: u8,
}

/// Downscaling and thumbnail settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ResizeConfig {
    /// Maximum output width (0 = no limit)
    pub max_width: u32,

    /// Maximum output height (0 = no limit)
    pub max_height: u32,

    /// Thumbnail size as a percentage of the output (0 = disabled)
    pub thumbnail_percent: u32,
}

/// Processing settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProcessingConfig {
    /// Number of parallel workers
    pub parallel_workers: usize,

    /// Recurse into subdirectories
    pub recursive: bool,

    /// Supported input formats
    pub supported_formats: Vec<String>,
}

impl Default for ProcessingConfig {
    fn default() -> Self {
        Self {
            parallel_workers: default_workers(),
            recursive: false,
            supported_formats: vec![
                "jpg".to_string(),
                "jpeg".to_string(),
                "png".to_string(),
                "gif".to_string(),
                "bmp".to_string(),
                "tif".to_string(),
                "tiff".to_string(),
            ],
        }
    }
}

/// One worker per available core, falling back to a single worker.
pub fn default_workers() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}

/// Job queue settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Paths buffered between the feeder and the workers
    pub buffer_size: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self { buffer_size: 1 }
    }
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: error, warn, info, debug, trace
    pub level: String,

    /// Log format: "pretty" or "json"
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}
