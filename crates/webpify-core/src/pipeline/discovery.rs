//! File discovery for finding convertible images and existing WebP outputs.

use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

use crate::config::ProcessingConfig;

/// Suffix appended to the file stem for thumbnail outputs.
pub const THUMBNAIL_SUFFIX: &str = "_thumbnail.webp";

/// Discovers image files in directories.
pub struct FileDiscovery {
    supported_formats: Vec<String>,
    recursive: bool,
}

impl FileDiscovery {
    /// Create a new file discovery instance.
    pub fn new(config: &ProcessingConfig) -> Self {
        Self {
            supported_formats: config
                .supported_formats
                .iter()
                .map(|f| f.to_lowercase())
                .collect(),
            recursive: config.recursive,
        }
    }

    /// Discover all convertible source images at a path.
    ///
    /// If path is a supported file, returns just that file. `.webp` files are
    /// never conversion inputs.
    pub fn discover(&self, path: &Path) -> Vec<PathBuf> {
        self.collect(path, |p| self.is_supported(p))
    }

    /// Discover primary `.webp` files, skipping `*_thumbnail.webp`.
    pub fn discover_webp(&self, path: &Path) -> Vec<PathBuf> {
        self.collect(path, |p| is_webp(p) && !is_thumbnail(p))
    }

    fn collect<F>(&self, path: &Path, keep: F) -> Vec<PathBuf>
    where
        F: Fn(&Path) -> bool,
    {
        if path.is_file() {
            return if keep(path) {
                vec![path.to_path_buf()]
            } else {
                vec![]
            };
        }

        let max_depth = if self.recursive { usize::MAX } else { 1 };
        let mut files: Vec<PathBuf> = WalkDir::new(path)
            .max_depth(max_depth)
            .into_iter()
            // Prune hidden entries below the root; the root itself may be "."
            .filter_entry(|e| e.depth() == 0 || !is_hidden(e))
            .filter_map(|e| match e {
                Ok(entry) => Some(entry),
                Err(err) => {
                    tracing::warn!("Skipping unreadable entry: {}", err);
                    None
                }
            })
            .filter(|e| e.file_type().is_file() && keep(e.path()))
            .map(|e| e.into_path())
            .collect();

        // Sort by path for deterministic ordering
        files.sort();
        files
    }

    /// Check if a file has a supported extension.
    fn is_supported(&self, path: &Path) -> bool {
        extension_lower(path)
            .map(|ext| ext != "webp" && self.supported_formats.iter().any(|f| *f == ext))
            .unwrap_or(false)
    }
}

/// Primary output for a source: same directory, extension replaced by `.webp`.
pub fn webp_path(source: &Path) -> PathBuf {
    source.with_extension("webp")
}

/// Thumbnail output for a primary `.webp` or source path: `<stem>_thumbnail.webp`.
pub fn thumbnail_path(path: &Path) -> PathBuf {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    path.with_file_name(format!("{stem}{THUMBNAIL_SUFFIX}"))
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry
        .file_name()
        .to_str()
        .map(|s| s.starts_with('.'))
        .unwrap_or(false)
}

fn is_webp(path: &Path) -> bool {
    extension_lower(path).is_some_and(|ext| ext == "webp")
}

fn is_thumbnail(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| n.to_lowercase().ends_with(THUMBNAIL_SUFFIX))
}

fn extension_lower(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_lowercase())
}
