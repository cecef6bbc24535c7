//! Removing an installation.
//!
//! [`uninstall`] never fails: each step reports what happened and the CLI
//! turns the [`UninstallReport`] into messages. When the install location
//! cannot be worked out, [`uninstall_unlocated`] still offers to clean the
//! profile. The executable is removed
//! without asking; the shell profile is only rewritten after consent, and a
//! backup is taken first.

use crate::installer::InstallLayout;
use crate::profile::{OwnedBlock, ShellEnvironment};
use crate::utils::Confirm;
use std::io;
use std::path::PathBuf;
use tracing::{debug, info, warn};

/// What happened to the installed executable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecutableRemoval {
    Removed {
        path: PathBuf,
    },
    NotInstalled {
        path: PathBuf,
    },
    Failed {
        path: PathBuf,
        reason: String,
    },
    /// The install location could not be determined, nothing was removed
    Unlocated {
        reason: String,
    },
}

/// What happened to the shell profile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProfileCleanup {
    /// The marker block was removed; the previous content is in `backup`
    Cleaned {
        profile: PathBuf,
        backup: PathBuf,
        blocks: usize,
    },
    /// The user kept the block
    Declined {
        profile: PathBuf,
    },
    /// The profile has no marker block
    NoMarker {
        profile: PathBuf,
    },
    /// No startup file exists for the detected shell
    NoProfile,
    Failed {
        profile: PathBuf,
        reason: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UninstallReport {
    pub executable: ExecutableRemoval,
    pub profile: ProfileCleanup,
}

impl UninstallReport {
    /// Nothing was installed and nothing was configured.
    #[must_use]
    pub fn nothing_to_do(&self) -> bool {
        matches!(self.executable, ExecutableRemoval::NotInstalled { .. })
            && matches!(self.profile, ProfileCleanup::NoMarker { .. } | ProfileCleanup::NoProfile)
    }
}

/// Remove the executable at `layout.exe_path` and, with consent, the marker
/// block from the user's startup file.
pub async fn uninstall(
    layout: &InstallLayout,
    env: &ShellEnvironment,
    prompter: &dyn Confirm,
    marker: &str,
) -> UninstallReport {
    let executable = remove_executable(layout).await;
    let profile = clean_profile(env, prompter, marker).await;
    UninstallReport {
        executable,
        profile,
    }
}

/// Profile cleanup only, for when no [`InstallLayout`] can be computed
/// (unsupported host, unreadable configuration, no home directory).
pub async fn uninstall_unlocated(
    reason: String,
    env: &ShellEnvironment,
    prompter: &dyn Confirm,
    marker: &str,
) -> UninstallReport {
    let profile = clean_profile(env, prompter, marker).await;
    UninstallReport {
        executable: ExecutableRemoval::Unlocated {
            reason,
        },
        profile,
    }
}

async fn remove_executable(layout: &InstallLayout) -> ExecutableRemoval {
    let path = layout.exe_path.clone();
    match tokio::fs::remove_file(&path).await {
        Ok(()) => {
            info!("Removed {}", path.display());
            ExecutableRemoval::Removed {
                path,
            }
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            debug!("{} is not installed", path.display());
            ExecutableRemoval::NotInstalled {
                path,
            }
        }
        Err(e) => {
            warn!("Failed to remove {}: {}", path.display(), e);
            ExecutableRemoval::Failed {
                path,
                reason: e.to_string(),
            }
        }
    }
}

async fn clean_profile(env: &ShellEnvironment, prompter: &dyn Confirm, marker: &str) -> ProfileCleanup {
    let Some(profile) = env.profile() else {
        return ProfileCleanup::NoProfile;
    };

    // Only the marker is matched on removal, the body is irrelevant
    let block = OwnedBlock::new(marker, "");
    match block.present_in(&profile).await {
        Ok(true) => {}
        Ok(false) => {
            return ProfileCleanup::NoMarker {
                profile,
            };
        }
        Err(e) => {
            return ProfileCleanup::Failed {
                profile,
                reason: e.to_string(),
            };
        }
    }

    let question = format!("Remove the PATH entry added to {}?", profile.display());
    let consent = prompter.confirm(&question).unwrap_or_else(|e| {
        warn!("Failed to read answer: {e}");
        false
    });
    if !consent {
        return ProfileCleanup::Declined {
            profile,
        };
    }

    match block.remove_from(&profile).await {
        Ok(Some(removal)) => ProfileCleanup::Cleaned {
            profile,
            backup: removal.backup,
            blocks: removal.blocks,
        },
        Ok(None) => ProfileCleanup::NoMarker {
            profile,
        },
        Err(e) => {
            warn!("Failed to clean {}: {:#}", profile.display(), e);
            ProfileCleanup::Failed {
                profile,
                reason: format!("{e:#}"),
            }
        }
    }
}
