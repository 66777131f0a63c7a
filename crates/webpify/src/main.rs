//! Webpify CLI - batch-convert raster images to WebP.
//!
//! Every supported image in a directory is converted to `<name>.webp` next
//! to the source, optionally trimmed of transparent borders, clamped to a
//! maximum size, and accompanied by a `<name>_thumbnail.webp`.
//!
//! # Usage
//!
//! ```bash
//! # Convert the current directory at quality 80
//! webpify convert -q 80
//!
//! # Recurse, trim, clamp to 1024px wide, 4 workers, 25% thumbnails
//! webpify convert -D ./assets -r -p -w 1024 -C 4 -t 25
//!
//! # Write info.json describing the converted files
//! webpify export -D ./assets
//!
//! # View configuration
//! webpify config show
//! ```

use clap::{Parser, Subcommand};

mod cli;
mod logging;

/// Webpify - batch-convert raster images to WebP.
#[derive(Parser, Debug)]
#[command(name = "webpify")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose (debug) logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output logs in JSON format
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Convert images to WebP
    Convert(cli::convert::ConvertArgs),

    /// Write info.json describing the .webp files in a directory
    Export(cli::export::ExportArgs),

    /// View and manage configuration
    Config(cli::config::ConfigArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Logging isn't initialized yet, so config warnings go through eprintln
    let config = match webpify_core::Config::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!(
                "Warning: Failed to load config: {e}\n  \
                 Using default configuration. Check your config file with `webpify config path`."
            );
            webpify_core::Config::default()
        }
    };
    logging::init_from_config(&config, cli.verbose, cli.json_logs);

    tracing::debug!("Webpify v{}", webpify_core::VERSION);

    match cli.command {
        Commands::Convert(args) => cli::convert::execute(args, config).await,
        Commands::Export(args) => cli::export::execute(args, config).await,
        Commands::Config(args) => cli::config::execute(args).await,
    }
}
