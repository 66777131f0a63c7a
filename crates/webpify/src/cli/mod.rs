//! Subcommand implementations.

pub mod config;
pub mod convert;
pub mod export;

use std::path::PathBuf;

/// Resolve a user-supplied directory, expanding `~` and environment
/// variables, and require that it exists.
pub(crate) fn resolve_directory(raw: &str) -> anyhow::Result<PathBuf> {
    let expanded = shellexpand::full(raw)
        .map_err(|e| anyhow::anyhow!("Cannot expand directory {raw:?}: {e}"))?;
    let path = PathBuf::from(expanded.as_ref());
    if !path.exists() {
        anyhow::bail!(
            "Directory does not exist: {:?}\n\n  Hint: Check the path passed to --directory.",
            path
        );
    }
    Ok(path)
}
