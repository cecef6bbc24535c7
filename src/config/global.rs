//! Installer configuration file.
//!
//! binup works with no configuration at all; the file only exists to point the
//! installer at a different product, repository, registry or install
//! directory.
//!
//! # Location
//!
//! 1. `--config <path>` on the command line
//! 2. `$BINUP_CONFIG`
//! 3. `<config_dir>/binup/config.toml` (`~/.config/binup/config.toml` on Linux,
//!    `~/Library/Application Support/binup/config.toml` on macOS,
//!    `%APPDATA%\binup\config.toml` on Windows)
//!
//! # Example
//!
//! ```toml
//! product = "app"
//! repo_owner = "binup-dev"
//! repo_name = "app"
//! api_url = "https://github.example.com/api/v3"
//! install_dir = "~/bin"
//! ```
//!
//! Environment variables override the file: `BINUP_API_URL`,
//! `BINUP_INSTALL_DIR` and `GITHUB_TOKEN`.

use crate::constants::{
    DEFAULT_API_URL, DEFAULT_PRODUCT, DEFAULT_REPO_NAME, DEFAULT_REPO_OWNER, ENV_API_URL,
    ENV_CONFIG, ENV_GITHUB_TOKEN, ENV_INSTALL_DIR,
};
use crate::core::{InstallError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::debug;

fn default_product() -> String {
    DEFAULT_PRODUCT.to_string()
}

fn default_repo_owner() -> String {
    DEFAULT_REPO_OWNER.to_string()
}

fn default_repo_name() -> String {
    DEFAULT_REPO_NAME.to_string()
}

fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}

/// Settings for one installer run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstallerConfig {
    /// Executable name, also used as the optional asset name prefix.
    #[serde(default = "default_product")]
    pub product: String,

    /// Owner of the repository publishing releases.
    #[serde(default = "default_repo_owner")]
    pub repo_owner: String,

    /// Repository publishing releases.
    #[serde(default = "default_repo_name")]
    pub repo_name: String,

    /// Base URL of the release registry API, without a trailing slash.
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Replaces the platform-conventional install directory. `~` and `$VAR`
    /// are expanded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub install_dir: Option<String>,

    /// Replaces the marker comment written to shell profiles.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub marker: Option<String>,

    /// Bearer token for registry requests. Only ever read from the
    /// environment, never from or to disk.
    #[serde(skip)]
    pub github_token: Option<String>,
}

impl Default for InstallerConfig {
    fn default() -> Self {
        Self {
            product: default_product(),
            repo_owner: default_repo_owner(),
            repo_name: default_repo_name(),
            api_url: default_api_url(),
            install_dir: None,
            marker: None,
            github_token: None,
        }
    }
}

impl InstallerConfig {
    /// Load configuration for this run and apply environment overrides.
    ///
    /// An explicit path must exist. The default locations are optional: when
    /// no file is there, defaults apply.
    pub async fn load(explicit: Option<&Path>) -> Result<Self> {
        let config = match explicit {
            Some(path) => Self::load_from(path).await?,
            None => match Self::default_path() {
                Some(path) if path.exists() => Self::load_from(&path).await?,
                _ => Self::default(),
            },
        };

        Ok(config.with_env_overrides(|key| std::env::var(key).ok()))
    }

    /// Parse a configuration file.
    pub async fn load_from(path: &Path) -> Result<Self> {
        debug!("Loading configuration from {}", path.display());
        let content = fs::read_to_string(path).await.map_err(|e| InstallError::ConfigError {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;

        toml::from_str(&content).map_err(|e| InstallError::ConfigError {
            path: path.display().to_string(),
            reason: e.to_string(),
        })
    }

    /// Default configuration file location: `$BINUP_CONFIG`, then the
    /// per-user config directory.
    #[must_use]
    pub fn default_path() -> Option<PathBuf> {
        if let Ok(path) = std::env::var(ENV_CONFIG)
            && !path.is_empty()
        {
            return Some(PathBuf::from(path));
        }
        dirs::config_dir().map(|dir| dir.join("binup").join("config.toml"))
    }

    /// Apply environment overrides using `lookup` to read variables.
    #[must_use]
    pub fn with_env_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(url) = non_empty(ENV_API_URL) {
            self.api_url = url;
        }
        if let Some(dir) = non_empty(ENV_INSTALL_DIR) {
            self.install_dir = Some(dir);
        }
        if let Some(token) = non_empty(ENV_GITHUB_TOKEN) {
            self.github_token = Some(token);
        }
        self.api_url = self.api_url.trim_end_matches('/').to_string();
        self
    }

    /// `owner/name` of the release repository.
    #[must_use]
    pub fn repository(&self) -> String {
        format!("{}/{}", self.repo_owner, self.repo_name)
    }

    /// Comment line that identifies the block binup owns in a shell profile.
    #[must_use]
    pub fn marker_comment(&self) -> String {
        match &self.marker {
            Some(marker) if marker.starts_with('#') => marker.clone(),
            Some(marker) => format!("# {marker}"),
            None => format!("# Added by binup for {}", self.product),
        }
    }

    /// Expanded install directory override, if one is configured.
    pub fn install_dir_override(&self) -> Result<Option<PathBuf>> {
        let Some(raw) = &self.install_dir else {
            return Ok(None);
        };
        let expanded = shellexpand::full(raw).map_err(|e| InstallError::ConfigError {
            path: "install_dir".to_string(),
            reason: format!("cannot expand '{raw}': {e}"),
        })?;
        Ok(Some(PathBuf::from(expanded.as_ref())))
    }
}
