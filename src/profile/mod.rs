//! Shell environment configuration.
//!
//! Makes sure the install directory ends up on the user's `PATH`. Nothing is
//! read from the process here: the caller passes a [`ShellEnvironment`]
//! snapshot, so every decision can be exercised with fabricated input.
//!
//! Decision order in [`ensure_on_path`]:
//!
//! 1. install directory already in `PATH` → nothing to do, no file touched
//! 2. no startup file for the detected shell → manual instructions
//! 3. marker already in that file → already configured
//! 4. user declines → manual instructions
//! 5. otherwise append the [`OwnedBlock`] once
//!
//! Failing to configure the shell never fails the install; every problem
//! degrades to [`PathSetup::ManualRequired`].

mod backup;
mod block;

pub use backup::BackupManager;
pub use block::{OwnedBlock, Removal};

use crate::installer::InstallLayout;
use crate::target::Os;
use crate::utils::Confirm;
use std::ffi::OsString;
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Interactive shells binup knows how to configure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Shell {
    Zsh,
    Bash,
    Fish,
    /// A shell binup has no startup-file table for, by program name
    Other(String),
    /// No shell could be detected (`SHELL` unset, as on Windows)
    Unknown,
}

impl Shell {
    /// Detect the shell from its program path, e.g. `/usr/bin/zsh`.
    #[must_use]
    pub fn from_program(program: Option<&str>) -> Self {
        let Some(program) = program.map(str::trim).filter(|p| !p.is_empty()) else {
            return Self::Unknown;
        };
        let name = Path::new(program).file_name().map(|n| n.to_string_lossy().into_owned()).unwrap_or_default();
        let name = name.strip_suffix(".exe").unwrap_or(&name);

        match name {
            "zsh" => Self::Zsh,
            "bash" => Self::Bash,
            "fish" => Self::Fish,
            "" => Self::Unknown,
            other => Self::Other(other.to_string()),
        }
    }

    /// Startup files to consider, in priority order.
    #[must_use]
    pub fn candidates(&self, home: &Path) -> Vec<PathBuf> {
        match self {
            Self::Zsh => vec![home.join(".zshrc")],
            Self::Bash => vec![home.join(".bashrc"), home.join(".bash_profile")],
            Self::Fish => vec![home.join(".config").join("fish").join("config.fish")],
            Self::Other(_) | Self::Unknown => Vec::new(),
        }
    }

    /// Line that puts `dir` on `PATH` in this shell's syntax.
    ///
    /// With no detected shell the line is picked from the target OS: a
    /// PowerShell command updating the user `Path` on Windows, a POSIX
    /// `export` elsewhere.
    #[must_use]
    pub fn path_line(&self, dir: &Path, os: Os) -> String {
        match (self, os) {
            (Self::Fish, _) => format!("fish_add_path \"{}\"", dir.display()),
            (Self::Unknown, Os::Windows) => format!(
                "[Environment]::SetEnvironmentVariable(\"Path\", \"{};\" + \
                 [Environment]::GetEnvironmentVariable(\"Path\", \"User\"), \"User\")",
                dir.display()
            ),
            _ => format!("export PATH=\"{}:$PATH\"", dir.display()),
        }
    }
}

impl fmt::Display for Shell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Zsh => write!(f, "zsh"),
            Self::Bash => write!(f, "bash"),
            Self::Fish => write!(f, "fish"),
            Self::Other(name) => write!(f, "{name}"),
            Self::Unknown => write!(f, "unknown shell"),
        }
    }
}

/// The parts of the user's environment the configurator looks at.
#[derive(Debug, Clone, Default)]
pub struct ShellEnvironment {
    /// Value of `PATH`
    pub path_var: Option<OsString>,
    /// Value of `SHELL`
    pub shell: Option<String>,
    /// The user's home directory
    pub home: Option<PathBuf>,
}

impl ShellEnvironment {
    /// Snapshot of the running process's environment.
    #[must_use]
    pub fn from_process() -> Self {
        Self {
            path_var: std::env::var_os("PATH"),
            shell: std::env::var("SHELL").ok(),
            home: dirs::home_dir(),
        }
    }

    #[must_use]
    pub fn shell(&self) -> Shell {
        Shell::from_program(self.shell.as_deref())
    }

    /// Whether `dir` is one of the `PATH` entries. Trailing separators and
    /// `.` components are ignored.
    #[must_use]
    pub fn path_contains(&self, dir: &Path) -> bool {
        let Some(path_var) = &self.path_var else {
            return false;
        };
        std::env::split_paths(path_var).any(|entry| entry.components().eq(dir.components()))
    }

    /// First existing startup file for the detected shell.
    #[must_use]
    pub fn profile(&self) -> Option<PathBuf> {
        let home = self.home.as_deref()?;
        let shell = self.shell();
        let found = shell.candidates(home).into_iter().find(|candidate| candidate.is_file());
        debug!("Startup file for {}: {:?}", shell, found);
        found
    }
}

/// Why the user has to finish `PATH` setup by hand.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ManualReason {
    /// No startup file exists for the detected shell
    NoProfile,
    /// The user did not consent to the edit
    Declined {
        profile: PathBuf,
    },
    /// Reading or appending to the startup file failed
    WriteFailed {
        profile: PathBuf,
        reason: String,
    },
}

/// What [`ensure_on_path`] did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathSetup {
    /// The install directory is already in the live `PATH`
    AlreadyOnPath,
    /// The startup file already carries the marker block
    AlreadyConfigured {
        profile: PathBuf,
    },
    /// The marker block was appended; takes effect in new shells
    Configured {
        profile: PathBuf,
    },
    /// Nothing was written; `line` is what the user should run or add
    ManualRequired {
        reason: ManualReason,
        line: String,
    },
}

/// Make sure `layout.install_dir` is on the user's `PATH`.
///
/// Never fails. Writes at most one block to one file, and only after
/// `prompter` consents. `os` picks the manual line when no shell is known.
pub async fn ensure_on_path(
    layout: &InstallLayout,
    os: Os,
    env: &ShellEnvironment,
    prompter: &dyn Confirm,
    marker: &str,
) -> PathSetup {
    let dir = &layout.install_dir;
    if env.path_contains(dir) {
        debug!("{} is already on PATH", dir.display());
        return PathSetup::AlreadyOnPath;
    }

    let line = env.shell().path_line(dir, os);
    let Some(profile) = env.profile() else {
        return PathSetup::ManualRequired {
            reason: ManualReason::NoProfile,
            line,
        };
    };

    let block = OwnedBlock::new(marker, line.clone());
    match block.present_in(&profile).await {
        Ok(true) => {
            debug!("Marker already present in {}", profile.display());
            return PathSetup::AlreadyConfigured {
                profile,
            };
        }
        Ok(false) => {}
        Err(e) => {
            warn!("Failed to read {}: {}", profile.display(), e);
            return PathSetup::ManualRequired {
                reason: ManualReason::WriteFailed {
                    profile,
                    reason: e.to_string(),
                },
                line,
            };
        }
    }

    let question = format!("Add {} to PATH in {}?", dir.display(), profile.display());
    let consent = prompter.confirm(&question).unwrap_or_else(|e| {
        warn!("Failed to read answer: {e}");
        false
    });
    if !consent {
        return PathSetup::ManualRequired {
            reason: ManualReason::Declined {
                profile,
            },
            line,
        };
    }

    match block.append_to(&profile).await {
        Ok(()) => {
            info!("Added {} to PATH in {}", dir.display(), profile.display());
            PathSetup::Configured {
                profile,
            }
        }
        Err(e) => {
            warn!("Failed to update {}: {:#}", profile.display(), e);
            PathSetup::ManualRequired {
                reason: ManualReason::WriteFailed {
                    profile,
                    reason: format!("{e:#}"),
                },
                line,
            }
        }
    }
}
