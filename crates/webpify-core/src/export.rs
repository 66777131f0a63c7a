//! `info.json` export of converted WebP files.
//!
//! The output is a tab-indented JSON array with one entry per primary
//! `.webp` file. Dimensions are read from the file headers only.

use serde::Serialize;
use std::path::{Path, PathBuf};

use crate::error::{ConvertError, Result};
use crate::pipeline::atomic::write_bytes_atomic;
use crate::pipeline::discovery::{thumbnail_path, FileDiscovery};

/// File name of the export, written into the scanned directory.
pub const INFO_FILE_NAME: &str = "info.json";

/// One exported image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageInfo {
    /// File name without directory
    pub name: String,
    pub width: u32,
    pub height: u32,
    /// Always `image/webp`
    pub mime: &'static str,
    /// Whether a readable thumbnail exists
    pub thumbnail: bool,
    /// 0 when there is no thumbnail
    pub thumbnail_width: u32,
    /// 0 when there is no thumbnail
    pub thumbnail_height: u32,
}

impl ImageInfo {
    /// Read header dimensions for `path` and its thumbnail sibling.
    ///
    /// An unreadable primary is an error; an unreadable or missing thumbnail
    /// just reports no thumbnail.
    pub fn read(path: &Path) -> std::result::Result<Self, ConvertError> {
        let (width, height) =
            image::image_dimensions(path).map_err(|e| ConvertError::Export {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?;

        let thumb = thumbnail_path(path);
        let (thumbnail_width, thumbnail_height) = if thumb.is_file() {
            image::image_dimensions(&thumb).unwrap_or_else(|e| {
                tracing::debug!("Ignoring unreadable thumbnail {:?}: {}", thumb, e);
                (0, 0)
            })
        } else {
            (0, 0)
        };

        Ok(Self {
            name: path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default(),
            width,
            height,
            mime: "image/webp",
            thumbnail: thumbnail_width > 0 && thumbnail_height > 0,
            thumbnail_width,
            thumbnail_height,
        })
    }
}

/// Result of a finished export.
#[derive(Debug, Clone)]
pub struct ExportSummary {
    /// Where `info.json` was written
    pub path: PathBuf,
    /// Number of entries written
    pub entries: usize,
}

/// Collect info for every primary WebP under `dir`.
pub fn collect(dir: &Path, discovery: &FileDiscovery) -> Result<Vec<ImageInfo>> {
    let files = discovery.discover_webp(dir);
    tracing::debug!("Exporting {} WebP file(s) from {:?}", files.len(), dir);

    let mut entries = Vec::with_capacity(files.len());
    for file in &files {
        entries.push(ImageInfo::read(file)?);
    }
    Ok(entries)
}

/// Serialize entries as a tab-indented JSON array with a trailing newline.
pub fn to_json(entries: &[ImageInfo]) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"\t");
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    entries.serialize(&mut ser)?;
    buf.push(b'\n');
    Ok(buf)
}

/// Write `<dir>/info.json` for the WebP files under `dir`.
pub fn export_info(dir: &Path, discovery: &FileDiscovery) -> Result<ExportSummary> {
    let entries = collect(dir, discovery)?;
    let json = to_json(&entries)?;

    let path = dir.join(INFO_FILE_NAME);
    write_bytes_atomic(&path, &json)?;
    tracing::info!("Wrote {} entries to {:?}", entries.len(), path);

    Ok(ExportSummary {
        path,
        entries: entries.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ProcessingConfig;
    use crate::pipeline::encode::{OutputEncoder, WebpEncoder};
    use image::DynamicImage;

    fn write_webp(path: &Path, width: u32, height: u32) {
        let bytes = WebpEncoder
            .encode(&DynamicImage::new_rgba8(width, height), 80.0, false)
            .unwrap();
        std::fs::write(path, bytes).unwrap();
    }

    fn discovery() -> FileDiscovery {
        FileDiscovery::new(&ProcessingConfig::default())
    }

    #[test]
    fn test_export_writes_entries_with_thumbnails() {
        let dir = tempfile::tempdir().unwrap();
        write_webp(&dir.path().join("a.webp"), 40, 20);
        write_webp(&dir.path().join("a_thumbnail.webp"), 10, 5);
        write_webp(&dir.path().join("b.webp"), 8, 8);

        let summary = export_info(dir.path(), &discovery()).unwrap();
        assert_eq!(summary.entries, 2);
        assert_eq!(summary.path, dir.path().join("info.json"));
        assert!(!dir.path().join("info.json.tmp").exists());

        let text = std::fs::read_to_string(&summary.path).unwrap();
        assert!(text.ends_with("]\n"));
        assert!(text.contains("\n\t{\n\t\t\"name\": \"a.webp\""));

        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        let items = value.as_array().unwrap();
        assert_eq!(items[0]["width"], 40);
        assert_eq!(items[0]["mime"], "image/webp");
        assert_eq!(items[0]["thumbnail"], true);
        assert_eq!(items[0]["thumbnailWidth"], 10);
        assert_eq!(items[0]["thumbnailHeight"], 5);
        assert_eq!(items[1]["name"], "b.webp");
        assert_eq!(items[1]["thumbnail"], false);
        assert_eq!(items[1]["thumbnailWidth"], 0);
    }

    #[test]
    fn test_empty_directory_exports_empty_array() {
        let dir = tempfile::tempdir().unwrap();
        let summary = export_info(dir.path(), &discovery()).unwrap();
        assert_eq!(summary.entries, 0);
        assert_eq!(std::fs::read_to_string(&summary.path).unwrap(), "[]\n");
    }

    #[test]
    fn test_unreadable_primary_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("broken.webp"), b"nope").unwrap();

        let err = export_info(dir.path(), &discovery()).unwrap_err();
        assert!(err.to_string().contains("broken.webp"));
        assert!(!dir.path().join("info.json").exists());
    }
}
