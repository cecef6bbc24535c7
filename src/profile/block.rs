//! The marker-identified block binup owns inside a shell profile.
//!
//! A block is always two physical lines, the marker comment followed by the
//! body line:
//!
//! ```text
//!
//! # Added by binup for app
//! export PATH="/home/ada/.local/bin:$PATH"
//! ```
//!
//! The marker is the only thing ever searched for. Everything else in the
//! file belongs to the user: appends never rewrite existing content, and
//! removal drops exactly the marker line and the line after it.

use super::BackupManager;
use crate::utils::atomic_write;
use anyhow::{Context, Result};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OwnedBlock {
    marker: String,
    body: String,
}

/// Result of removing blocks from a profile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Removal {
    /// Number of marker blocks removed.
    pub blocks: usize,
    /// Copy of the profile taken before it was rewritten.
    pub backup: PathBuf,
}

fn is_marker_line(line: &str, marker: &str) -> bool {
    line.trim_end() == marker
}

impl OwnedBlock {
    #[must_use]
    pub fn new(marker: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            marker: marker.into(),
            body: body.into(),
        }
    }

    /// Whether `content` contains the marker line.
    #[must_use]
    pub fn present_in_text(&self, content: &str) -> bool {
        content.lines().any(|line| is_marker_line(line, &self.marker))
    }

    /// Text to append to a file currently holding `existing`: a blank line,
    /// the marker and the body, preceded by a newline if `existing` does not
    /// end with one.
    #[must_use]
    pub fn append_text(&self, existing: &str) -> String {
        let mut text = String::new();
        if !existing.is_empty() && !existing.ends_with('\n') {
            text.push('\n');
        }
        text.push('\n');
        text.push_str(&self.marker);
        text.push('\n');
        text.push_str(&self.body);
        text.push('\n');
        text
    }

    /// `content` without any marker line and the line after each, plus the
    /// number of blocks removed. Other lines keep their exact bytes.
    #[must_use]
    pub fn remove_from_text(&self, content: &str) -> (String, usize) {
        let mut kept = String::with_capacity(content.len());
        let mut removed = 0;
        let mut skip_next = false;

        for line in content.split_inclusive('\n') {
            if skip_next {
                skip_next = false;
                continue;
            }
            if is_marker_line(line, &self.marker) {
                removed += 1;
                skip_next = true;
                continue;
            }
            kept.push_str(line);
        }

        (kept, removed)
    }

    /// Whether the file at `path` contains the marker. A missing file does not.
    ///
    /// # Errors
    ///
    /// Any read error other than the file not existing.
    pub async fn present_in(&self, path: &Path) -> io::Result<bool> {
        match tokio::fs::read_to_string(path).await {
            Ok(content) => Ok(self.present_in_text(&content)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e),
        }
    }

    /// Append the block to `path` in a single write. Existing content is
    /// never rewritten.
    ///
    /// # Errors
    ///
    /// Fails when the file cannot be read or opened for appending.
    pub async fn append_to(&self, path: &Path) -> Result<()> {
        let existing = match tokio::fs::read_to_string(path).await {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => String::new(),
            Err(e) => return Err(e).with_context(|| format!("Failed to read {}", path.display())),
        };
        let text = self.append_text(&existing);

        let mut file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .with_context(|| format!("Failed to open {} for appending", path.display()))?;
        file.write_all(text.as_bytes()).with_context(|| format!("Failed to append to {}", path.display()))?;
        file.sync_all().with_context(|| format!("Failed to sync {}", path.display()))?;

        debug!("Appended '{}' block to {}", self.marker, path.display());
        Ok(())
    }

    /// Remove every block from `path`, backing the file up first.
    ///
    /// Returns `None` without touching the file when no marker is present.
    ///
    /// # Errors
    ///
    /// Fails when the file cannot be read, backed up or rewritten. A failed
    /// rewrite leaves the original file in place.
    pub async fn remove_from(&self, path: &Path) -> Result<Option<Removal>> {
        let content = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read {}", path.display()))?;

        let (kept, blocks) = self.remove_from_text(&content);
        if blocks == 0 {
            return Ok(None);
        }

        let backups = BackupManager::new(path.to_path_buf());
        backups.create_backup().await?;
        atomic_write(path, kept.as_bytes())?;

        debug!("Removed {} '{}' block(s) from {}", blocks, self.marker, path.display());
        Ok(Some(Removal {
            blocks,
            backup: backups.backup_path().to_path_buf(),
        }))
    }
}
