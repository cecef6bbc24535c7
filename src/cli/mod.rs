//! Command-line interface for binup.
//!
//! ```text
//! binup              install or update to the latest release
//! binup v1.4.0       install release v1.4.0
//! binup uninstall    remove the executable and, with consent, the PATH entry
//! ```
//!
//! Flags only change how binup talks to the user (logging, progress bars,
//! consent prompts) and where configuration is read from; they never change
//! which steps run.

pub mod install;
pub mod uninstall;

use crate::config::InstallerConfig;
use crate::constants::UNINSTALL_COMMAND;
use crate::profile::ShellEnvironment;
use crate::release::VersionSelector;
use crate::target::{HostInfo, Target};
use crate::utils::TerminalPrompt;
use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing::debug;

pub use install::{InstallCommand, InstallReport};
pub use uninstall::UninstallCommand;

/// Runtime options derived from the global flags.
#[derive(Debug, Clone, Default)]
pub struct CliConfig {
    /// Log filter used when `RUST_LOG` is not set; `None` disables logging.
    pub log_level: Option<String>,

    /// Hide progress bars.
    pub no_progress: bool,

    /// Only print errors and anything the user has to act on.
    pub quiet: bool,

    /// Answer yes to consent prompts.
    pub assume_yes: bool,

    /// Configuration file given on the command line.
    pub config_path: Option<PathBuf>,
}

/// What a run does, decided from the positional argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Install(VersionSelector),
    Uninstall,
}

#[derive(Parser, Debug)]
#[command(
    name = "binup",
    about = "Install, update or remove a prebuilt executable from GitHub releases",
    version,
    long_about = "Installs the release archive built for this machine into a per-user \
                  directory and offers to add that directory to PATH in your shell \
                  startup file.\n\nRun without arguments to install or update to the \
                  latest release, with a tag to install that release, or with \
                  'uninstall' to remove it again."
)]
pub struct Cli {
    /// Release tag to install, or `uninstall`. Installs the latest release when omitted.
    #[arg(value_name = "TARGET")]
    target: Option<String>,

    /// Answer yes to every confirmation prompt.
    #[arg(short = 'y', long)]
    yes: bool,

    /// Enable debug logging.
    #[arg(short, long, conflicts_with = "quiet")]
    verbose: bool,

    /// Only print errors and required manual steps.
    #[arg(short, long)]
    quiet: bool,

    /// Disable progress bars (also `BINUP_NO_PROGRESS`).
    #[arg(long)]
    no_progress: bool,

    /// Path to an installer configuration file.
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,
}

impl Cli {
    #[must_use]
    pub fn action(&self) -> Action {
        match self.target.as_deref() {
            Some(UNINSTALL_COMMAND) => Action::Uninstall,
            other => Action::Install(VersionSelector::parse(other)),
        }
    }

    #[must_use]
    pub fn build_config(&self) -> CliConfig {
        let log_level = if self.verbose {
            Some("debug".to_string())
        } else if self.quiet {
            None
        } else {
            Some("warn".to_string())
        };

        CliConfig {
            log_level,
            no_progress: self.no_progress,
            quiet: self.quiet,
            assume_yes: self.yes,
            config_path: self.config.clone(),
        }
    }

    /// Run against the real host: detected platform, live environment and
    /// terminal prompts.
    ///
    /// Install fails on the first error. Uninstall always succeeds and reports
    /// what it could not do.
    pub async fn execute_with_config(self, cli_config: CliConfig) -> Result<()> {
        let loaded = InstallerConfig::load(cli_config.config_path.as_deref()).await;
        let host = HostInfo::detect();
        let env = ShellEnvironment::from_process();
        let prompter = TerminalPrompt::new(cli_config.assume_yes).with_quiet(cli_config.quiet);

        match self.action() {
            Action::Install(selector) => {
                let installer_config = loaded.context("Failed to load installer configuration")?;
                debug!("Installing from {} via {}", installer_config.repository(), installer_config.api_url);
                let target = Target::resolve(&host)?;

                let report = InstallCommand::new(selector)
                    .with_progress(!cli_config.no_progress)
                    .execute(&installer_config, target, &env, &prompter)
                    .await?;
                report.print(&installer_config, cli_config.quiet);
            }
            Action::Uninstall => {
                let report = UninstallCommand::new().execute(&loaded, &host, &env, &prompter).await;
                uninstall::print_report(&report, &loaded.unwrap_or_default(), cli_config.quiet);
            }
        }
        Ok(())
    }
}
