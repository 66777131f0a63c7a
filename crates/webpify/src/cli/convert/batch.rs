//! Batch conversion and thumbnail backfill with progress and console lines.

use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use indicatif::ProgressBar;
use webpify_core::pipeline::{thumbnail_path, webp_path};
use webpify_core::{BatchSummary, ConversionOutcome, OutcomeKind, ThumbnailBackfill};

use super::setup::ConversionContext;

/// Convert every discovered file and print one line per outcome.
pub(crate) async fn run_batch(
    ctx: &ConversionContext,
    files: Vec<PathBuf>,
) -> Vec<ConversionOutcome> {
    let progress = create_progress_bar(files.len() as u64);
    let start_time = Instant::now();
    let mut summary = BatchSummary::default();

    let outcomes = ctx
        .pool
        .convert(files, Arc::clone(&ctx.options), |outcome| {
            summary.record(outcome);
            report(&progress, outcome);

            progress.inc(1);
            let elapsed = start_time.elapsed().as_secs_f64();
            if elapsed > 0.0 {
                progress.set_message(format!("{:.1} img/sec", summary.total() as f64 / elapsed));
            }
        })
        .await;

    progress.finish_and_clear();
    tracing::debug!(
        "Batch finished in {:.1}s ({} skipped)",
        start_time.elapsed().as_secs_f64(),
        summary.skipped
    );
    println!("{summary}");
    outcomes
}

/// Create thumbnails for existing WebP files that lack one.
///
/// Outputs written by `converted` already carry their thumbnail and are left
/// alone.
pub(crate) async fn run_backfill(ctx: &ConversionContext, converted: &[ConversionOutcome]) {
    let fresh: HashSet<PathBuf> = converted
        .iter()
        .filter(|o| o.is_success())
        .map(|o| webp_path(&o.source_path))
        .collect();

    let backfill = Arc::new(ThumbnailBackfill::new(Arc::clone(&ctx.options)));
    let candidates: Vec<PathBuf> = ctx
        .discovery
        .discover_webp(&ctx.directory)
        .into_iter()
        .filter(|p| !fresh.contains(p))
        .collect();
    let pending = backfill.pending(candidates);
    if pending.is_empty() {
        tracing::debug!("No WebP files need thumbnails");
        return;
    }
    tracing::info!("Generating {} missing thumbnail(s)", pending.len());

    let progress = create_progress_bar(pending.len() as u64);
    let jobs = pending
        .into_iter()
        .map(webpify_core::ConversionJob::new)
        .collect();
    let outcomes = ctx
        .pool
        .run(backfill, jobs, |outcome| {
            match &outcome.kind {
                OutcomeKind::Success => {
                    let thumb = thumbnail_path(&outcome.source_path);
                    progress.suspend(|| println!("[THUMB]\t{}", thumb.display()));
                }
                OutcomeKind::Skipped => {}
                OutcomeKind::Failed(_) => report(&progress, outcome),
            }
            progress.inc(1);
        })
        .await;
    progress.finish_and_clear();

    let failed = outcomes.iter().filter(|o| o.is_failed()).count();
    if failed > 0 {
        tracing::warn!("{} thumbnail(s) could not be generated", failed);
    }
}

/// Print an outcome line above the progress bar. Failures go to stderr.
fn report(progress: &ProgressBar, outcome: &ConversionOutcome) {
    if outcome.is_failed() {
        tracing::error!("Failed: {}", outcome);
        progress.suspend(|| eprintln!("{outcome}"));
    } else {
        progress.suspend(|| println!("{outcome}"));
    }
}

/// Create a progress bar for batch processing.
fn create_progress_bar(total: u64) -> ProgressBar {
    use indicatif::ProgressStyle;

    let pb = ProgressBar::new(total);
    let style = ProgressStyle::default_bar()
        .template(
            "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({percent}%) {msg}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("##-");
    pb.set_style(style);
    pb.set_message("starting...");
    pb
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::convert::setup::setup_conversion;
    use crate::cli::convert::ConvertArgs;
    use image::{ImageFormat, Rgba, RgbaImage};
    use webpify_core::Config;

    fn write_png(dir: &std::path::Path, name: &str) {
        RgbaImage::from_pixel(20, 10, Rgba([10, 20, 30, 255]))
            .save_with_format(dir.join(name), ImageFormat::Png)
            .unwrap();
    }

    fn context(dir: &std::path::Path, thumbnail: Option<u32>) -> ConversionContext {
        let args = ConvertArgs {
            directory: dir.to_string_lossy().into_owned(),
            workers: Some(2),
            thumbnail,
            ..ConvertArgs::default()
        };
        setup_conversion(&args, Config::default()).unwrap()
    }

    #[tokio::test]
    async fn test_run_batch_converts_all_files() {
        let dir = tempfile::tempdir().unwrap();
        write_png(dir.path(), "a.png");
        write_png(dir.path(), "b.png");

        let ctx = context(dir.path(), None);
        let files = ctx.discovery.discover(&ctx.directory);
        let outcomes = run_batch(&ctx, files).await;

        assert_eq!(outcomes.len(), 2);
        assert!(outcomes.iter().all(|o| o.is_success()));
        assert!(dir.path().join("a.webp").exists());
        assert!(dir.path().join("b.webp").exists());
    }

    #[tokio::test]
    async fn test_backfill_skips_fresh_outputs_and_fills_old_ones() {
        let dir = tempfile::tempdir().unwrap();
        write_png(dir.path(), "new.png");

        // A WebP from an earlier run, without a thumbnail
        let ctx = context(dir.path(), None);
        write_png(dir.path(), "old.png");
        let old = dir.path().join("old.png");
        run_batch(&ctx, vec![old.clone()]).await;
        std::fs::remove_file(&old).unwrap();
        assert!(!dir.path().join("old_thumbnail.webp").exists());

        let ctx = context(dir.path(), Some(50));
        let files = ctx.discovery.discover(&ctx.directory);
        let outcomes = run_batch(&ctx, files).await;
        run_backfill(&ctx, &outcomes).await;

        assert!(dir.path().join("new_thumbnail.webp").exists());
        assert!(dir.path().join("old_thumbnail.webp").exists());
        assert!(!dir.path().join("old_thumbnail_thumbnail.webp").exists());
    }
}
