//! Error handling for binup
//!
//! Every fatal condition the installer can hit is a variant of [`InstallError`].
//! Variants carry the concrete value that did not match (the unrecognized
//! architecture string, the tag that was not found, the asset suffix that was
//! looked for) so the message printed to the user names the actual problem.
//!
//! The CLI converts failures into an [`ErrorContext`] via
//! [`user_friendly_error`], which adds details and an actionable suggestion
//! before the process exits with a non-zero status.
//!
//! # Error Categories
//!
//! - **Environment**: [`InstallError::MissingDependency`], [`InstallError::UnsupportedPlatform`],
//!   [`InstallError::ConfigError`]
//! - **Registry**: [`InstallError::NetworkError`], [`InstallError::ReleaseNotFound`],
//!   [`InstallError::AssetNotFound`]
//! - **Installation**: [`InstallError::DownloadFailed`], [`InstallError::ExtractFailed`],
//!   [`InstallError::MoveFailed`], [`InstallError::PermissionFailed`]
//!
//! There is no retry logic anywhere: each of these ends the current invocation.

use colored::Colorize;
use std::fmt;
use thiserror::Error;

/// Result alias used by the installer components.
pub type Result<T> = std::result::Result<T, InstallError>;

/// Failures of the install, update and uninstall flows.
#[derive(Error, Debug)]
pub enum InstallError {
    /// A capability the installer needs (HTTP client, home directory, ...)
    /// is unavailable on this host.
    #[error("Required dependency is unavailable: {dependency}")]
    MissingDependency {
        /// What is missing
        dependency: String,
        /// Why it could not be obtained
        reason: String,
    },

    /// The host operating system or architecture is not in the support matrix.
    #[error("Unsupported {component}: '{value}'")]
    UnsupportedPlatform {
        /// Either "operating system" or "architecture"
        component: String,
        /// The value reported by the host
        value: String,
    },

    /// The registry request failed before a usable answer was received.
    #[error("Network error while requesting {url}")]
    NetworkError {
        /// URL that was requested
        url: String,
        /// Underlying transport or HTTP failure
        reason: String,
    },

    /// The registry answered but has no release for the selector.
    #[error("Release '{selector}' not found in {repository}")]
    ReleaseNotFound {
        /// "latest" or the explicit tag
        selector: String,
        /// owner/name of the repository
        repository: String,
    },

    /// The release exists but publishes no archive for this target.
    #[error("No asset ending in '{suffix}' in release {release}")]
    AssetNotFound {
        /// The `<target-slug>.<archive-format>` suffix that was looked for
        suffix: String,
        /// Tag of the release that was searched
        release: String,
        /// Names of the assets the release does publish
        available: Vec<String>,
    },

    /// The artifact download failed or produced no data.
    #[error("Failed to download {url}")]
    DownloadFailed {
        /// Asset download URL
        url: String,
        /// What went wrong
        reason: String,
    },

    /// The archive could not be unpacked or did not contain the executable.
    #[error("Failed to extract {archive}")]
    ExtractFailed {
        /// Archive file name
        archive: String,
        /// What went wrong
        reason: String,
    },

    /// The extracted executable could not be moved into the install directory.
    #[error("Failed to move executable to {destination}")]
    MoveFailed {
        /// Final executable path
        destination: String,
        /// What went wrong
        reason: String,
    },

    /// The executable bit could not be set.
    #[error("Failed to make {path} executable")]
    PermissionFailed {
        /// Installed executable path
        path: String,
        /// What went wrong
        reason: String,
    },

    /// The configuration file exists but cannot be used.
    #[error("Invalid configuration in {path}")]
    ConfigError {
        /// Configuration file path
        path: String,
        /// Parse or read failure
        reason: String,
    },

    /// Filesystem failure outside the categories above.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Anything else, already rendered.
    #[error("{message}")]
    Other {
        /// Error message
        message: String,
    },
}

impl InstallError {
    /// Extra detail carried by the variant, if any.
    #[must_use]
    pub fn reason(&self) -> Option<String> {
        match self {
            Self::MissingDependency {
                reason,
                ..
            }
            | Self::NetworkError {
                reason,
                ..
            }
            | Self::DownloadFailed {
                reason,
                ..
            }
            | Self::ExtractFailed {
                reason,
                ..
            }
            | Self::MoveFailed {
                reason,
                ..
            }
            | Self::PermissionFailed {
                reason,
                ..
            }
            | Self::ConfigError {
                reason,
                ..
            } => Some(reason.clone()),
            Self::AssetNotFound {
                available,
                ..
            } if !available.is_empty() => {
                Some(format!("Release assets: {}", available.join(", ")))
            }
            _ => None,
        }
    }
}

impl Clone for InstallError {
    fn clone(&self) -> Self {
        match self {
            Self::MissingDependency {
                dependency,
                reason,
            } => Self::MissingDependency {
                dependency: dependency.clone(),
                reason: reason.clone(),
            },
            Self::UnsupportedPlatform {
                component,
                value,
            } => Self::UnsupportedPlatform {
                component: component.clone(),
                value: value.clone(),
            },
            Self::NetworkError {
                url,
                reason,
            } => Self::NetworkError {
                url: url.clone(),
                reason: reason.clone(),
            },
            Self::ReleaseNotFound {
                selector,
                repository,
            } => Self::ReleaseNotFound {
                selector: selector.clone(),
                repository: repository.clone(),
            },
            Self::AssetNotFound {
                suffix,
                release,
                available,
            } => Self::AssetNotFound {
                suffix: suffix.clone(),
                release: release.clone(),
                available: available.clone(),
            },
            Self::DownloadFailed {
                url,
                reason,
            } => Self::DownloadFailed {
                url: url.clone(),
                reason: reason.clone(),
            },
            Self::ExtractFailed {
                archive,
                reason,
            } => Self::ExtractFailed {
                archive: archive.clone(),
                reason: reason.clone(),
            },
            Self::MoveFailed {
                destination,
                reason,
            } => Self::MoveFailed {
                destination: destination.clone(),
                reason: reason.clone(),
            },
            Self::PermissionFailed {
                path,
                reason,
            } => Self::PermissionFailed {
                path: path.clone(),
                reason: reason.clone(),
            },
            Self::ConfigError {
                path,
                reason,
            } => Self::ConfigError {
                path: path.clone(),
                reason: reason.clone(),
            },
            // io::Error is not Clone; keep kind and message
            Self::Io(e) => Self::Io(std::io::Error::new(e.kind(), e.to_string())),
            Self::Other {
                message,
            } => Self::Other {
                message: message.clone(),
            },
        }
    }
}

/// An error together with the details and suggestion shown to the user.
#[derive(Debug)]
pub struct ErrorContext {
    /// The underlying error
    pub error: InstallError,
    /// Optional suggestion for resolving the error
    pub suggestion: Option<String>,
    /// Optional additional details about the error
    pub details: Option<String>,
}

impl ErrorContext {
    #[must_use]
    pub const fn new(error: InstallError) -> Self {
        Self {
            error,
            suggestion: None,
            details: None,
        }
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Print the error to stderr with colored labels.
    pub fn display(&self) {
        eprintln!("{}: {}", "error".red().bold(), self.error);

        if let Some(details) = &self.details {
            eprintln!("{}: {}", "details".yellow(), details);
        }

        if let Some(suggestion) = &self.suggestion {
            eprintln!("{}: {}", "suggestion".green(), suggestion);
        }
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.error)?;

        if let Some(details) = &self.details {
            write!(f, "\nDetails: {details}")?;
        }

        if let Some(suggestion) = &self.suggestion {
            write!(f, "\nSuggestion: {suggestion}")?;
        }

        Ok(())
    }
}

impl std::error::Error for ErrorContext {}

/// Convert any error reaching `main` into something worth printing.
///
/// [`InstallError`]s anywhere in the chain get category-specific advice. Bare
/// I/O errors get permission or not-found advice. Anything else is reported
/// with its full cause chain.
#[must_use]
pub fn user_friendly_error(error: anyhow::Error) -> ErrorContext {
    if let Some(install_error) = error.chain().find_map(|e| e.downcast_ref::<InstallError>()) {
        return create_error_context(install_error.clone());
    }

    if let Some(io_error) = error.downcast_ref::<std::io::Error>() {
        match io_error.kind() {
            std::io::ErrorKind::PermissionDenied => {
                return ErrorContext::new(InstallError::Io(std::io::Error::new(
                    io_error.kind(),
                    io_error.to_string(),
                )))
                .with_suggestion("Check ownership of the install directory and your shell profile")
                .with_details(format!("{error:#}"));
            }
            std::io::ErrorKind::NotFound => {
                return ErrorContext::new(InstallError::Io(std::io::Error::new(
                    io_error.kind(),
                    io_error.to_string(),
                )))
                .with_suggestion("Check that the file or directory exists and the path is correct")
                .with_details(format!("{error:#}"));
            }
            _ => {}
        }
    }

    let mut message = error.to_string();
    let chain: Vec<String> =
        error.chain().skip(1).map(std::string::ToString::to_string).collect();

    if !chain.is_empty() {
        message.push_str("\n\nCaused by:");
        for (i, cause) in chain.iter().enumerate() {
            message.push_str(&format!("\n  {}: {}", i + 1, cause));
        }
    }

    ErrorContext::new(InstallError::Other {
        message,
    })
}

fn create_error_context(error: InstallError) -> ErrorContext {
    let details = error.reason();
    let ctx = match &error {
        InstallError::MissingDependency {
            dependency,
            ..
        } => ErrorContext::new(error.clone()).with_suggestion(format!(
            "binup cannot continue without {dependency}. Check your environment (HOME, TLS roots) and try again"
        )),

        InstallError::UnsupportedPlatform {
            component,
            value,
        } => ErrorContext::new(error.clone()).with_suggestion(format!(
            "Prebuilt releases exist for linux, macos and windows on x64 and arm64. Your {component} '{value}' is not one of them; build from source instead"
        )),

        InstallError::NetworkError {
            reason,
            ..
        } => {
            let suggestion = if reason.contains("403") || reason.contains("429") {
                "The registry is rate limiting anonymous requests. Set GITHUB_TOKEN and retry"
            } else {
                "Check your internet connection and proxy settings, then retry"
            };
            ErrorContext::new(error.clone()).with_suggestion(suggestion)
        }

        InstallError::ReleaseNotFound {
            selector,
            repository,
        } => ErrorContext::new(error.clone()).with_suggestion(format!(
            "Check that '{selector}' is a published release tag of {repository}, or run without a version to install the latest"
        )),

        InstallError::AssetNotFound {
            suffix,
            ..
        } => ErrorContext::new(error.clone()).with_suggestion(format!(
            "This release does not ship a '{suffix}' archive. Try another release or build from source"
        )),

        InstallError::DownloadFailed {
            ..
        } => ErrorContext::new(error.clone())
            .with_suggestion("Retry the installation; re-running is always safe"),

        InstallError::ExtractFailed {
            ..
        } => ErrorContext::new(error.clone()).with_suggestion(
            "The archive may be corrupt or use an unexpected layout. Retry, or report it to the release maintainers",
        ),

        InstallError::MoveFailed {
            destination,
            ..
        } => ErrorContext::new(error.clone()).with_suggestion(format!(
            "Make sure {destination} is not in use and its directory is writable, then run the installer again"
        )),

        InstallError::PermissionFailed {
            path,
            ..
        } => ErrorContext::new(error.clone())
            .with_suggestion(format!("Run 'chmod +x {path}' manually or check the filesystem mount options")),

        InstallError::ConfigError {
            path,
            ..
        } => ErrorContext::new(error.clone())
            .with_suggestion(format!("Fix or remove {path}; every key in it is optional")),

        InstallError::Io(_)
        | InstallError::Other {
            ..
        } => ErrorContext::new(error.clone()),
    };

    match details {
        Some(details) => ctx.with_details(details),
        None => ctx,
    }
}
