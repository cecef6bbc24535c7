//! Artifact installation.
//!
//! [`ArtifactInstaller::install`] runs a fixed sequence, stopping at the first
//! failure:
//!
//! 1. create a fresh scratch directory
//! 2. stream the asset into it
//! 3. create the install directory
//! 4. unpack the archive and locate the executable
//! 5. move the executable to [`InstallLayout::exe_path`]
//! 6. mark it executable
//! 7. on macOS, clear the quarantine attribute (best effort)
//! 8. remove the scratch directory
//!
//! The scratch directory is a drop guard, so step 8 also happens on every
//! error path. Steps 3 to 6 are not rolled back; running the install again
//! overwrites whatever a failed run left behind.

pub mod activate;
pub mod download;
pub mod extract;

use crate::config::InstallerConfig;
use crate::core::{InstallError, Result};
use crate::release::ReleaseAsset;
use crate::target::{ArchiveFormat, Os, Target};
use crate::utils::create_scratch_dir;
use reqwest::Client;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Where the executable lives. Recomputed every run, never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallLayout {
    pub install_dir: PathBuf,
    pub exe_path: PathBuf,
}

impl InstallLayout {
    #[must_use]
    pub fn new(install_dir: PathBuf, executable_name: &str) -> Self {
        let exe_path = install_dir.join(executable_name);
        Self {
            install_dir,
            exe_path,
        }
    }

    /// Layout for `target`: the configured directory if there is one,
    /// otherwise the platform convention under the user's home.
    ///
    /// # Errors
    ///
    /// [`InstallError::ConfigError`] when the override cannot be expanded or
    /// the home directory cannot be determined.
    pub fn for_target(target: &Target, config: &InstallerConfig) -> Result<Self> {
        let install_dir = match config.install_dir_override()? {
            Some(dir) => dir,
            None => conventional_install_dir(
                target,
                &config.product,
                dirs::home_dir().as_deref(),
                dirs::data_local_dir().as_deref(),
            )
            .ok_or_else(|| InstallError::ConfigError {
                path: "install_dir".to_string(),
                reason: "cannot determine the home directory; set install_dir or BINUP_INSTALL_DIR"
                    .to_string(),
            })?,
        };

        let layout = Self::new(install_dir, &target.executable_name(&config.product));
        debug!("Install layout: {}", layout.exe_path.display());
        Ok(layout)
    }
}

/// Per-user install directory convention for `target`.
///
/// `~/.local/bin` on Linux and macOS, `%LOCALAPPDATA%\Programs\<product>` on
/// Windows.
#[must_use]
pub fn conventional_install_dir(
    target: &Target,
    product: &str,
    home: Option<&Path>,
    local_data: Option<&Path>,
) -> Option<PathBuf> {
    match target.os() {
        Os::Linux | Os::MacOs => home.map(|home| home.join(".local").join("bin")),
        Os::Windows => local_data.map(|data| data.join("Programs").join(product)),
    }
}

/// Downloads and places one release asset.
pub struct ArtifactInstaller {
    client: Client,
    target: Target,
    executable_name: String,
    scratch_root: PathBuf,
    hide_progress: bool,
}

impl ArtifactInstaller {
    /// Installer for `product` built for `target`. Scratch directories go
    /// under the system temp directory.
    #[must_use]
    pub fn new(client: Client, target: Target, product: &str) -> Self {
        Self {
            client,
            target,
            executable_name: target.executable_name(product),
            scratch_root: std::env::temp_dir(),
            hide_progress: false,
        }
    }

    /// Put scratch directories under `root` instead of the system temp dir.
    #[must_use]
    pub fn with_scratch_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.scratch_root = root.into();
        self
    }

    #[must_use]
    pub fn with_progress(mut self, show: bool) -> Self {
        self.hide_progress = !show;
        self
    }

    #[must_use]
    pub fn scratch_root(&self) -> &Path {
        &self.scratch_root
    }

    /// Download `asset` and install its executable at `layout.exe_path`.
    ///
    /// # Errors
    ///
    /// [`InstallError::DownloadFailed`], [`InstallError::ExtractFailed`],
    /// [`InstallError::MoveFailed`] or [`InstallError::PermissionFailed`],
    /// depending on which step failed.
    pub async fn install(&self, asset: &ReleaseAsset, layout: &InstallLayout) -> Result<()> {
        let format = ArchiveFormat::from_file_name(&asset.name).ok_or_else(|| InstallError::ExtractFailed {
            archive: asset.name.clone(),
            reason: "unrecognized archive extension".to_string(),
        })?;

        let scratch = create_scratch_dir(&self.scratch_root)?;
        let archive_path = scratch.path().join(&asset.name);

        download::download_to(&self.client, &asset.download_url, &archive_path, asset.size, self.hide_progress)
            .await?;

        self.place(&archive_path, format, scratch.path(), layout).await?;

        if let Err(e) = scratch.close() {
            warn!("Failed to remove scratch directory: {e}");
        }
        info!("Installed {} {} to {}", asset.name, asset.release_tag, layout.exe_path.display());
        Ok(())
    }

    /// Steps 3 to 7 for an archive already on disk inside `scratch`.
    async fn place(
        &self,
        archive: &Path,
        format: ArchiveFormat,
        scratch: &Path,
        layout: &InstallLayout,
    ) -> Result<()> {
        tokio::fs::create_dir_all(&layout.install_dir).await.map_err(|e| InstallError::MoveFailed {
            destination: layout.install_dir.display().to_string(),
            reason: format!("cannot create install directory: {e}"),
        })?;

        let unpacked = scratch.join("unpacked");
        let extracted = extract::extract_executable(archive, format, &unpacked, &self.executable_name).await?;

        activate::move_into_place(&extracted, &layout.exe_path).await?;
        activate::make_executable(&layout.exe_path).await?;

        if self.target.os() == Os::MacOs {
            activate::clear_quarantine(&layout.exe_path).await;
        }
        Ok(())
    }
}
