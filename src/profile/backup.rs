use crate::constants::BACKUP_SUFFIX;
use anyhow::{Context, Result, bail};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info};

/// Keeps a copy of a shell profile next to it before binup rewrites it.
///
/// The copy is `<profile>.backup` in the same directory. Only one backup is
/// kept: a new backup replaces the previous one. On Unix the profile's
/// permissions are carried over so a restored copy behaves the same.
///
/// # Examples
///
/// ```rust,no_run
/// use binup::profile::BackupManager;
/// use std::path::PathBuf;
///
/// # async fn example() -> anyhow::Result<()> {
/// let backups = BackupManager::new(PathBuf::from("/home/ada/.zshrc"));
/// backups.create_backup().await?;
/// assert!(backups.backup_path().exists());
/// println!("Backup at {}", backups.backup_path().display());
/// # Ok(())
/// # }
/// ```
pub struct BackupManager {
    /// Profile being protected.
    original_path: PathBuf,
    /// Where its copy is written.
    backup_path: PathBuf,
}

impl BackupManager {
    /// Manager for `profile_path`; the backup goes to `<profile_path>.backup`.
    pub fn new(profile_path: PathBuf) -> Self {
        let mut backup_path = profile_path.clone();
        backup_path.set_file_name(format!(
            "{}.{BACKUP_SUFFIX}",
            profile_path.file_name().unwrap_or_default().to_string_lossy()
        ));

        Self {
            original_path: profile_path,
            backup_path,
        }
    }

    /// Copy the profile to the backup location, replacing an older backup.
    ///
    /// # Errors
    ///
    /// Fails when the profile does not exist or cannot be copied.
    pub async fn create_backup(&self) -> Result<()> {
        if !self.original_path.exists() {
            bail!("Profile does not exist: {}", self.original_path.display());
        }

        if self.backup_path.exists() {
            debug!("Replacing previous backup at {}", self.backup_path.display());
            fs::remove_file(&self.backup_path).await.context("Failed to remove old backup")?;
        }

        fs::copy(&self.original_path, &self.backup_path).await.with_context(|| {
            format!("Failed to back up {} to {}", self.original_path.display(), self.backup_path.display())
        })?;

        #[cfg(unix)]
        {
            let metadata =
                fs::metadata(&self.original_path).await.context("Failed to read profile metadata")?;
            fs::set_permissions(&self.backup_path, metadata.permissions())
                .await
                .context("Failed to set backup permissions")?;
        }

        info!("Backed up {} to {}", self.original_path.display(), self.backup_path.display());
        Ok(())
    }

    pub fn backup_path(&self) -> &Path {
        &self.backup_path
    }
}
