//! Conversion setup: config overrides, validation, options snapshot.

use std::path::PathBuf;
use std::sync::Arc;

use webpify_core::{Config, ConversionOptions, FileDiscovery, WorkerPool};

use super::ConvertArgs;

/// Everything a conversion run needs, assembled before any worker starts.
pub(crate) struct ConversionContext {
    pub directory: PathBuf,
    pub options: Arc<ConversionOptions>,
    pub discovery: FileDiscovery,
    pub pool: WorkerPool,
}

/// Apply CLI overrides, validate, and freeze the options snapshot.
pub(crate) fn setup_conversion(
    args: &ConvertArgs,
    mut config: Config,
) -> anyhow::Result<ConversionContext> {
    apply_overrides(args, &mut config);
    config.validate()?;

    let directory = crate::cli::resolve_directory(&args.directory)?;
    let options = Arc::new(ConversionOptions::from_config(&config));
    tracing::debug!("Conversion options: {:?}", options);

    let pool = WorkerPool::from_config(&config);
    tracing::debug!(
        "Using {} worker(s), queue depth {}",
        pool.workers(),
        config.pipeline.buffer_size
    );

    Ok(ConversionContext {
        directory,
        options,
        discovery: FileDiscovery::new(&config.processing),
        pool,
    })
}

/// Merge command-line values over the loaded config.
///
/// Boolean flags can only switch a setting on; leaving one off keeps the
/// config file value.
fn apply_overrides(args: &ConvertArgs, config: &mut Config) {
    if let Some(quality) = args.quality {
        config.conversion.quality = quality;
    }
    if args.lossless {
        config.conversion.lossless = true;
    }
    if args.overwrite {
        config.conversion.overwrite = true;
    }
    if args.delete_original {
        config.conversion.delete_original = true;
    }
    if args.recursive {
        config.processing.recursive = true;
    }
    if args.trim {
        config.trim.enabled = true;
    }
    if let Some(threshold) = args.trim_threshold {
        config.trim.threshold = threshold;
    }
    if let Some(workers) = args.workers {
        config.processing.parallel_workers = workers;
    }
    if let Some(width) = args.width {
        config.resize.max_width = width;
    }
    if let Some(height) = args.height {
        config.resize.max_height = height;
    }
    if let Some(percent) = args.thumbnail {
        config.resize.thumbnail_percent = percent;
    }
}
