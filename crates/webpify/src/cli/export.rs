//! The `webpify export` command.

use clap::Args;
use webpify_core::{export_info, Config, FileDiscovery};

/// Arguments for the `export` command.
#[derive(Args, Debug)]
pub struct ExportArgs {
    /// Directory containing the .webp files
    #[arg(short = 'D', long, default_value = ".")]
    pub directory: String,

    /// Include subdirectories
    #[arg(short, long)]
    pub recursive: bool,
}

/// Execute the export command.
pub async fn execute(args: ExportArgs, mut config: Config) -> anyhow::Result<()> {
    if args.recursive {
        config.processing.recursive = true;
    }
    let directory = super::resolve_directory(&args.directory)?;
    let discovery = FileDiscovery::new(&config.processing);

    let summary = export_info(&directory, &discovery)?;
    println!(
        "Wrote {} entries to {}",
        summary.entries,
        summary.path.display()
    );
    Ok(())
}
