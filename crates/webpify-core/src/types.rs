//! Core data types shared by the conversion pipeline and the worker pool.

use std::fmt;
use std::path::{Path, PathBuf};

use crate::config::Config;

/// One source file submitted for conversion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionJob {
    /// Path of the image to convert
    pub source_path: PathBuf,
}

impl ConversionJob {
    pub fn new(source_path: impl Into<PathBuf>) -> Self {
        Self {
            source_path: source_path.into(),
        }
    }
}

/// Read-only settings snapshot handed to every worker.
///
/// Built once from the merged [`Config`] before dispatch and shared behind an
/// `Arc`; nothing mutates it afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct ConversionOptions {
    /// WebP quality factor (0-100)
    pub quality: f32,
    /// Lossless WebP encoding
    pub lossless: bool,
    /// Replace existing outputs instead of skipping
    pub overwrite: bool,
    /// Remove the source after a successful conversion
    pub delete_original: bool,
    /// Trim transparent borders
    pub trim: bool,
    /// Alpha at or below this value is transparent
    pub trim_threshold: u8,
    /// Maximum output width, 0 = unconstrained
    pub max_width: u32,
    /// Maximum output height, 0 = unconstrained
    pub max_height: u32,
    /// Thumbnail percent, 0 = no thumbnail
    pub thumbnail_percent: u32,
}

impl Default for ConversionOptions {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

impl ConversionOptions {
    /// Freeze the conversion-relevant parts of a validated config.
    pub fn from_config(config: &Config) -> Self {
        Self {
            quality: config.conversion.quality,
            lossless: config.conversion.lossless,
            overwrite: config.conversion.overwrite,
            delete_original: config.conversion.delete_original,
            trim: config.trim.enabled,
            trim_threshold: config.trim.threshold,
            max_width: config.resize.max_width,
            max_height: config.resize.max_height,
            thumbnail_percent: config.resize.thumbnail_percent,
        }
    }

    /// Whether a max-dimension clamp applies.
    pub fn clamps(&self) -> bool {
        self.max_width > 0 || self.max_height > 0
    }

    /// Whether thumbnails are requested.
    pub fn thumbnails(&self) -> bool {
        self.thumbnail_percent > 0
    }
}

/// Terminal state of one job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutcomeKind {
    /// Output written (and source removed if requested)
    Success,
    /// Destination already existed and overwrite was off
    Skipped,
    /// The job failed; the string is the user-facing cause
    Failed(String),
}

/// Result of processing one job, consumed by the collector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionOutcome {
    pub source_path: PathBuf,
    pub kind: OutcomeKind,
}

impl ConversionOutcome {
    pub fn success(path: &Path) -> Self {
        Self::with_kind(path, OutcomeKind::Success)
    }

    pub fn skipped(path: &Path) -> Self {
        Self::with_kind(path, OutcomeKind::Skipped)
    }

    pub fn failed(path: &Path, reason: impl Into<String>) -> Self {
        Self::with_kind(path, OutcomeKind::Failed(reason.into()))
    }

    fn with_kind(path: &Path, kind: OutcomeKind) -> Self {
        Self {
            source_path: path.to_path_buf(),
            kind,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self.kind, OutcomeKind::Success)
    }

    pub fn is_skipped(&self) -> bool {
        matches!(self.kind, OutcomeKind::Skipped)
    }

    pub fn is_failed(&self) -> bool {
        matches!(self.kind, OutcomeKind::Failed(_))
    }
}

impl fmt::Display for ConversionOutcome {
    /// Console line: `[OK]`, `[SKIP]` or `[FAIL]`, a tab, then the path.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let path = self.source_path.display();
        match &self.kind {
            OutcomeKind::Success => write!(f, "[OK]\t{path}"),
            OutcomeKind::Skipped => write!(f, "[SKIP]\t{path}"),
            OutcomeKind::Failed(reason) => write!(f, "[FAIL]\t{path}: {reason}"),
        }
    }
}

/// Tally of a finished batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub converted: usize,
    pub skipped: usize,
    pub failed: usize,
}

impl BatchSummary {
    pub fn from_outcomes(outcomes: &[ConversionOutcome]) -> Self {
        let mut summary = Self::default();
        for outcome in outcomes {
            summary.record(outcome);
        }
        summary
    }

    pub fn record(&mut self, outcome: &ConversionOutcome) {
        match outcome.kind {
            OutcomeKind::Success => self.converted += 1,
            OutcomeKind::Skipped => self.skipped += 1,
            OutcomeKind::Failed(_) => self.failed += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.converted + self.skipped + self.failed
    }
}

impl fmt::Display for BatchSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Done. Converted: {}, Failed: {}",
            self.converted, self.failed
        )
    }
}
