//! `binup [TAG]`: install or update the executable.

use crate::config::InstallerConfig;
use crate::constants::STALE_SCRATCH_AGE;
use crate::installer::{ArtifactInstaller, InstallLayout};
use crate::profile::{ManualReason, PathSetup, ShellEnvironment, ensure_on_path};
use crate::release::{ReleaseAsset, ReleaseResolver, VersionSelector, build_client};
use crate::target::Target;
use crate::utils::{Confirm, sweep_stale_scratch};
use anyhow::Result;
use colored::Colorize;
use std::path::PathBuf;
use tracing::debug;

/// Resolves, downloads and installs one release, then configures `PATH`.
#[derive(Debug, Clone)]
pub struct InstallCommand {
    selector: VersionSelector,
    scratch_root: Option<PathBuf>,
    show_progress: bool,
}

/// Everything an install run did, for reporting.
#[derive(Debug, Clone)]
pub struct InstallReport {
    pub asset: ReleaseAsset,
    pub layout: InstallLayout,
    pub path_setup: PathSetup,
}

impl InstallCommand {
    #[must_use]
    pub fn new(selector: VersionSelector) -> Self {
        Self {
            selector,
            scratch_root: None,
            show_progress: true,
        }
    }

    #[must_use]
    pub fn with_scratch_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.scratch_root = Some(root.into());
        self
    }

    #[must_use]
    pub fn with_progress(mut self, show: bool) -> Self {
        self.show_progress = show;
        self
    }

    /// Run the install flow for `target`.
    ///
    /// Failures up to and including activation are fatal; `PATH` setup never
    /// is and ends up in [`InstallReport::path_setup`].
    pub async fn execute(
        &self,
        config: &InstallerConfig,
        target: Target,
        env: &ShellEnvironment,
        prompter: &dyn Confirm,
    ) -> Result<InstallReport> {
        let client = build_client(config)?;

        let asset = ReleaseResolver::new(config, client.clone()).resolve(&self.selector, &target).await?;
        let layout = InstallLayout::for_target(&target, config)?;

        let mut installer = ArtifactInstaller::new(client, target, &config.product).with_progress(self.show_progress);
        if let Some(root) = &self.scratch_root {
            installer = installer.with_scratch_root(root);
        }

        let swept = sweep_stale_scratch(installer.scratch_root(), STALE_SCRATCH_AGE);
        if swept > 0 {
            debug!("Removed {swept} abandoned scratch director(ies)");
        }

        installer.install(&asset, &layout).await?;

        let path_setup = ensure_on_path(&layout, target.os(), env, prompter, &config.marker_comment()).await;
        Ok(InstallReport {
            asset,
            layout,
            path_setup,
        })
    }
}

impl InstallReport {
    /// Print the outcome. With `quiet`, only steps the user still has to
    /// take are printed.
    pub fn print(&self, config: &InstallerConfig, quiet: bool) {
        if !quiet {
            println!(
                "{} {} {} to {}",
                "✓".green(),
                config.product.bold(),
                self.asset.release_tag.cyan(),
                self.layout.exe_path.display()
            );
        }

        let dir = self.layout.install_dir.display();
        match &self.path_setup {
            PathSetup::AlreadyOnPath => {
                if !quiet {
                    println!("{} {} is already on PATH", "✓".green(), dir);
                }
            }
            PathSetup::AlreadyConfigured {
                profile,
            } => {
                if !quiet {
                    println!("{} PATH is already configured in {}", "✓".green(), profile.display());
                }
            }
            PathSetup::Configured {
                profile,
            } => {
                if !quiet {
                    println!("{} Added {} to PATH in {}", "✓".green(), dir, profile.display());
                    println!(
                        "\n{} restart your shell or run `source {}` to use {}",
                        "Next:".cyan(),
                        profile.display(),
                        config.product
                    );
                }
            }
            PathSetup::ManualRequired {
                reason,
                line,
            } => {
                match reason {
                    ManualReason::NoProfile => {
                        println!("\n{} {} is not on your PATH", "Note:".yellow(), dir);
                    }
                    ManualReason::Declined {
                        profile,
                    } => {
                        println!("\n{} left {} unchanged", "Note:".yellow(), profile.display());
                    }
                    ManualReason::WriteFailed {
                        profile,
                        reason,
                    } => {
                        println!("\n{} could not update {}: {}", "Warning:".yellow(), profile.display(), reason);
                    }
                }
                println!("Run or add this line to your shell startup file to use {}:", config.product);
                println!("  {line}");
            }
        }
    }
}
