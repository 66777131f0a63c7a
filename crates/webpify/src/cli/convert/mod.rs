//! The `webpify convert` command.

mod batch;
mod setup;

use clap::Args;
use webpify_core::Config;

use batch::{run_backfill, run_batch};
use setup::setup_conversion;

/// Arguments for the `convert` command.
///
/// Every option left unset falls back to the config file value.
#[derive(Args, Debug, Default)]
pub struct ConvertArgs {
    /// Directory (or single image) to process
    #[arg(short = 'D', long, default_value = ".")]
    pub directory: String,

    /// WebP quality (0-100)
    #[arg(short, long)]
    pub quality: Option<f32>,

    /// Use lossless WebP encoding
    #[arg(short, long)]
    pub lossless: bool,

    /// Overwrite existing .webp files if present
    #[arg(short, long)]
    pub overwrite: bool,

    /// Delete the original image after successful conversion
    #[arg(short, long)]
    pub delete_original: bool,

    /// Recurse into subdirectories
    #[arg(short, long)]
    pub recursive: bool,

    /// Trim transparent borders from images
    #[arg(short = 'p', long)]
    pub trim: bool,

    /// Alpha threshold for transparent pixels (0-255, higher trims more)
    #[arg(short = 'T', long)]
    pub trim_threshold: Option<u8>,

    /// Number of concurrent workers
    #[arg(short = 'C', long)]
    pub workers: Option<usize>,

    /// Max output width (0 = no limit)
    #[arg(short, long)]
    pub width: Option<u32>,

    /// Max output height (0 = no limit)
    #[arg(short = 'H', long)]
    pub height: Option<u32>,

    /// Thumbnail percent size (1-100), creates <name>_thumbnail.webp
    #[arg(short, long)]
    pub thumbnail: Option<u32>,
}

/// Execute the convert command.
pub async fn execute(args: ConvertArgs, config: Config) -> anyhow::Result<()> {
    let ctx = setup_conversion(&args, config)?;

    let files = ctx.discovery.discover(&ctx.directory);
    if files.is_empty() {
        if ctx.options.thumbnails() {
            run_backfill(&ctx, &[]).await;
        } else {
            println!("No images found to convert.");
        }
        return Ok(());
    }

    println!("Found {} image(s). Converting to WebP...", files.len());
    let outcomes = run_batch(&ctx, files).await;

    if ctx.options.thumbnails() {
        run_backfill(&ctx, &outcomes).await;
    }
    Ok(())
}
