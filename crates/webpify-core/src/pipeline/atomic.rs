//! Crash-safe output files.
//!
//! Every output is written to a sibling `<dest>.tmp`, flushed and closed, and
//! only then renamed over `<dest>`. A reader therefore sees either the old
//! file, no file, or the complete new file. Any failure after the temp file
//! exists removes it before the error is returned.

use std::ffi::OsString;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::error::{ConvertError, ConvertResult};

/// `<dest>.tmp`, next to `dest`.
pub fn temp_path(dest: &Path) -> PathBuf {
    let mut name: OsString = dest.as_os_str().to_owned();
    name.push(".tmp");
    PathBuf::from(name)
}

/// Removes the temp file on drop unless the write was committed.
struct TempGuard {
    path: PathBuf,
    committed: bool,
}

impl Drop for TempGuard {
    fn drop(&mut self) {
        if self.committed {
            return;
        }
        if let Err(e) = std::fs::remove_file(&self.path) {
            if e.kind() != std::io::ErrorKind::NotFound {
                tracing::warn!("Failed to remove temp file {:?}: {}", self.path, e);
            }
        }
    }
}

/// Write `dest` atomically.
///
/// `write` receives a buffered handle to the temp file. Parent directories
/// are created as needed.
pub fn write_atomic<F>(dest: &Path, write: F) -> ConvertResult<()>
where
    F: FnOnce(&mut BufWriter<File>) -> ConvertResult<()>,
{
    if let Some(parent) = dest.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| ConvertError::io("create dir", parent, e))?;
    }

    let tmp = temp_path(dest);
    let file = File::create(&tmp).map_err(|e| ConvertError::io("create", &tmp, e))?;
    let mut guard = TempGuard {
        path: tmp,
        committed: false,
    };

    let mut writer = BufWriter::new(file);
    write(&mut writer)?;
    writer
        .flush()
        .map_err(|e| ConvertError::io("write", &guard.path, e))?;
    let file = writer
        .into_inner()
        .map_err(|e| ConvertError::io("write", &guard.path, e.into_error()))?;
    file.sync_all()
        .map_err(|e| ConvertError::io("sync", &guard.path, e))?;
    drop(file);

    std::fs::rename(&guard.path, dest).map_err(|e| ConvertError::io("rename", &guard.path, e))?;
    guard.committed = true;
    tracing::trace!("Committed {:?}", dest);
    Ok(())
}

/// Write a finished buffer atomically.
pub fn write_bytes_atomic(dest: &Path, bytes: &[u8]) -> ConvertResult<()> {
    write_atomic(dest, |w| {
        w.write_all(bytes)
            .map_err(|e| ConvertError::io("write", dest, e))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_temp_path_appends_suffix() {
        assert_eq!(
            temp_path(Path::new("out/a.webp")),
            PathBuf::from("out/a.webp.tmp")
        );
    }

    #[test]
    fn test_write_creates_dest_and_no_temp() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("nested").join("a.webp");

        write_bytes_atomic(&dest, b"payload").unwrap();

        assert_eq!(std::fs::read(&dest).unwrap(), b"payload");
        assert!(!temp_path(&dest).exists());
    }

    #[test]
    fn test_write_replaces_existing() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("a.webp");
        std::fs::write(&dest, b"old").unwrap();

        write_bytes_atomic(&dest, b"new").unwrap();
        assert_eq!(std::fs::read(&dest).unwrap(), b"new");
    }

    #[test]
    fn test_failed_write_removes_temp_and_keeps_dest() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("a.webp");
        std::fs::write(&dest, b"old").unwrap();

        let result = write_atomic(&dest, |w| {
            w.write_all(b"partial").unwrap();
            Err(ConvertError::Encode {
                path: dest.clone(),
                message: "codec exploded".into(),
            })
        });

        assert!(matches!(result, Err(ConvertError::Encode { .. })));
        assert!(!temp_path(&dest).exists());
        assert_eq!(std::fs::read(&dest).unwrap(), b"old");
    }

    #[test]
    fn test_failed_rename_removes_temp() {
        let dir = tempfile::tempdir().unwrap();
        // A non-empty directory can't be replaced by a file
        let dest = dir.path().join("taken.webp");
        std::fs::create_dir(&dest).unwrap();
        std::fs::write(dest.join("inside"), b"x").unwrap();

        let err = write_bytes_atomic(&dest, b"payload").unwrap_err();

        assert!(err.to_string().starts_with("rename"));
        assert!(!temp_path(&dest).exists());
        assert!(dest.is_dir());
    }
}
