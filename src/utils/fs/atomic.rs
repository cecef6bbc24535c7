//! Atomic file write operations using temp-and-rename strategy.
//!
//! Used when a shell profile has to be rewritten (block removal). A crash
//! mid-write leaves either the old file or the new one, never a truncated mix.

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

/// Replace `path` with `content` atomically.
///
/// The content is written to a sibling temp file, synced and renamed over the
/// target. When the target already exists its permissions are carried over so
/// a rewritten profile keeps its mode.
pub fn atomic_write(path: &Path, content: &[u8]) -> Result<()> {
    use std::io::Write;

    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }

    let file_name = path.file_name().map(|n| n.to_string_lossy().into_owned()).unwrap_or_default();
    let temp_path = path.with_file_name(format!(".{file_name}.tmp"));

    {
        let mut file = fs::File::create(&temp_path)
            .with_context(|| format!("Failed to create temp file: {}", temp_path.display()))?;

        file.write_all(content)
            .with_context(|| format!("Failed to write to temp file: {}", temp_path.display()))?;

        file.sync_all().with_context(|| "Failed to sync file to disk")?;
    }

    if let Ok(metadata) = fs::metadata(path) {
        fs::set_permissions(&temp_path, metadata.permissions())
            .with_context(|| format!("Failed to copy permissions to {}", temp_path.display()))?;
    }

    if let Err(e) = fs::rename(&temp_path, path) {
        let _ = fs::remove_file(&temp_path);
        return Err(e)
            .with_context(|| format!("Failed to rename temp file to: {}", path.display()));
    }

    Ok(())
}
