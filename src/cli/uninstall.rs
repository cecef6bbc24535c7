//! `binup uninstall`: remove the executable and the PATH entry.

use crate::config::InstallerConfig;
use crate::core::{InstallError, Result};
use crate::installer::InstallLayout;
use crate::profile::ShellEnvironment;
use crate::target::{HostInfo, Target};
use crate::uninstaller::{ExecutableRemoval, ProfileCleanup, UninstallReport, uninstall, uninstall_unlocated};
use crate::utils::Confirm;
use colored::Colorize;
use tracing::warn;

#[derive(Debug, Clone, Default)]
pub struct UninstallCommand;

impl UninstallCommand {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Remove the installation on `host`.
    ///
    /// Never fails. A configuration that did not load, an unsupported host or
    /// a missing home directory leave the executable alone and are reported
    /// as [`ExecutableRemoval::Unlocated`]; the profile is still offered for
    /// cleanup using the configured marker, or the default one.
    pub async fn execute(
        &self,
        config: &Result<InstallerConfig>,
        host: &HostInfo,
        env: &ShellEnvironment,
        prompter: &dyn Confirm,
    ) -> UninstallReport {
        let marker = match config {
            Ok(config) => config.marker_comment(),
            Err(_) => InstallerConfig::default().marker_comment(),
        };

        match locate(config, host) {
            Ok(layout) => uninstall(&layout, env, prompter, &marker).await,
            Err(e) => {
                warn!("Cannot determine the install location: {e}");
                uninstall_unlocated(e.to_string(), env, prompter, &marker).await
            }
        }
    }
}

fn locate(config: &Result<InstallerConfig>, host: &HostInfo) -> Result<InstallLayout> {
    let config = config.as_ref().map_err(InstallError::clone)?;
    let target = Target::resolve(host)?;
    InstallLayout::for_target(&target, config)
}

pub fn print_report(report: &UninstallReport, config: &InstallerConfig, quiet: bool) {
    if report.nothing_to_do() {
        if !quiet
            && let ExecutableRemoval::NotInstalled {
                path,
            } = &report.executable
        {
            println!("Nothing to do: {} is not installed at {}", config.product, path.display());
        }
        return;
    }

    match &report.executable {
        ExecutableRemoval::Removed {
            path,
        } => {
            if !quiet {
                println!("{} Removed {}", "✓".green(), path.display());
            }
        }
        ExecutableRemoval::NotInstalled {
            path,
        } => {
            if !quiet {
                println!("{} {} was not installed", "•".cyan(), path.display());
            }
        }
        ExecutableRemoval::Failed {
            path,
            reason,
        } => {
            eprintln!("{} could not remove {}: {}", "Warning:".yellow(), path.display(), reason);
        }
        ExecutableRemoval::Unlocated {
            reason,
        } => {
            eprintln!("{} could not locate the installed {}: {}", "Warning:".yellow(), config.product, reason);
        }
    }

    match &report.profile {
        ProfileCleanup::Cleaned {
            profile,
            backup,
            ..
        } => {
            if !quiet {
                println!(
                    "{} Removed the PATH entry from {} (backup at {})",
                    "✓".green(),
                    profile.display(),
                    backup.display()
                );
            }
        }
        ProfileCleanup::Declined {
            profile,
        } => {
            println!(
                "\n{} left {} unchanged. To clean it up, delete the line '{}' and the line after it.",
                "Note:".yellow(),
                profile.display(),
                config.marker_comment()
            );
        }
        ProfileCleanup::Failed {
            profile,
            reason,
        } => {
            eprintln!("{} could not update {}: {}", "Warning:".yellow(), profile.display(), reason);
            println!(
                "Delete the line '{}' and the line after it from {} yourself.",
                config.marker_comment(),
                profile.display()
            );
        }
        ProfileCleanup::NoMarker {
            ..
        }
        | ProfileCleanup::NoProfile => {}
    }
}
