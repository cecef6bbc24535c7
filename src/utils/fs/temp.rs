//! Scratch directories for downloads and extraction.
//!
//! A scratch directory is a [`tempfile::TempDir`] with a recognizable prefix.
//! Dropping the guard removes it, which covers success, error returns and
//! a cancelled future. Only a killed process can leave one behind; those are
//! swept by [`sweep_stale_scratch`] on the next run.

use crate::constants::SCRATCH_PREFIX;
use std::io;
use std::path::Path;
use std::time::{Duration, SystemTime};
use tempfile::TempDir;
use tracing::{debug, warn};

/// Create a fresh, uniquely named scratch directory under `root`.
pub fn create_scratch_dir(root: &Path) -> io::Result<TempDir> {
    let dir = tempfile::Builder::new().prefix(SCRATCH_PREFIX).tempdir_in(root)?;
    debug!("Created scratch directory {}", dir.path().display());
    Ok(dir)
}

/// Remove scratch directories under `root` older than `max_age`.
///
/// Best effort: failures are logged and skipped. Returns how many directories
/// were removed.
pub fn sweep_stale_scratch(root: &Path, max_age: Duration) -> usize {
    let Ok(entries) = std::fs::read_dir(root) else {
        return 0;
    };

    let now = SystemTime::now();
    let mut removed = 0;

    for entry in entries.flatten() {
        let name = entry.file_name();
        if !name.to_string_lossy().starts_with(SCRATCH_PREFIX) {
            continue;
        }
        let Ok(metadata) = entry.metadata() else {
            continue;
        };
        if !metadata.is_dir() {
            continue;
        }
        let age = metadata
            .modified()
            .ok()
            .and_then(|modified| now.duration_since(modified).ok())
            .unwrap_or_default();
        if age < max_age {
            continue;
        }

        match std::fs::remove_dir_all(entry.path()) {
            Ok(()) => {
                debug!("Removed stale scratch directory {}", entry.path().display());
                removed += 1;
            }
            Err(e) => warn!("Failed to remove stale scratch directory {}: {}", entry.path().display(), e),
        }
    }

    removed
}
