//! Release resolution.
//!
//! Turns a [`VersionSelector`] and a resolved [`Target`] into the one
//! [`ReleaseAsset`] to download:
//!
//! ```text
//! selector ──► GET /repos/{owner}/{repo}/releases/latest
//!              GET /repos/{owner}/{repo}/releases/tags/{tag}
//!          ──► filter assets by "<target-slug>.<archive-format>" suffix
//!          ──► first match in registry order
//! ```
//!
//! A release with several matching assets is resolved to the first one in the
//! order the registry lists them, with a warning naming all of them.

pub mod github;

pub use github::{GitHubAsset, GitHubRelease, build_client};

use crate::config::InstallerConfig;
use crate::constants::{LATEST, REGISTRY_REQUEST_TIMEOUT};
use crate::core::{InstallError, Result};
use crate::target::Target;
use reqwest::header::{ACCEPT, HeaderValue};
use reqwest::{Client, StatusCode, Url};
use std::fmt;
use tracing::{debug, warn};

/// Which release to install.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VersionSelector {
    /// The newest published release
    Latest,
    /// An explicit, immutable release tag, used verbatim
    Tag(String),
}

impl VersionSelector {
    /// `None`, empty or `"latest"` select the newest release; anything else
    /// is taken as a tag.
    #[must_use]
    pub fn parse(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            None | Some("") => Self::Latest,
            Some(v) if v.eq_ignore_ascii_case(LATEST) => Self::Latest,
            Some(tag) => Self::Tag(tag.to_string()),
        }
    }
}

impl fmt::Display for VersionSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Latest => write!(f, "{LATEST}"),
            Self::Tag(tag) => write!(f, "{tag}"),
        }
    }
}

/// The downloadable file chosen for this run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseAsset {
    /// Asset file name, e.g. `app-linux-x64.tar.gz`
    pub name: String,
    /// Direct download URL
    pub download_url: String,
    /// Size in bytes, when the registry reports it
    pub size: Option<u64>,
    /// Tag of the release the asset belongs to
    pub release_tag: String,
}

/// Pick the asset for `target` from a release's asset list.
///
/// # Errors
///
/// [`InstallError::AssetNotFound`] when no asset name ends with the target's
/// `<slug>.<archive-format>` suffix.
pub fn select_asset(release: &GitHubRelease, target: &Target) -> Result<ReleaseAsset> {
    let suffix = target.asset_suffix();
    let matches: Vec<&GitHubAsset> =
        release.assets.iter().filter(|asset| asset.name.ends_with(&suffix)).collect();

    let Some(first) = matches.first() else {
        return Err(InstallError::AssetNotFound {
            suffix,
            release: release.tag_name.clone(),
            available: release.assets.iter().map(|a| a.name.clone()).collect(),
        });
    };

    if matches.len() > 1 {
        let names: Vec<&str> = matches.iter().map(|a| a.name.as_str()).collect();
        warn!(
            "Release {} has {} assets ending in '{}' ({}); using '{}'",
            release.tag_name,
            matches.len(),
            suffix,
            names.join(", "),
            first.name
        );
    }

    debug!("Selected asset {} from release {}", first.name, release.tag_name);
    Ok(ReleaseAsset {
        name: first.name.clone(),
        download_url: first.browser_download_url.clone(),
        size: first.size,
        release_tag: release.tag_name.clone(),
    })
}

/// Queries the release registry for one repository.
pub struct ReleaseResolver {
    client: Client,
    api_url: String,
    repo_owner: String,
    repo_name: String,
}

impl ReleaseResolver {
    #[must_use]
    pub fn new(config: &InstallerConfig, client: Client) -> Self {
        Self {
            client,
            api_url: config.api_url.clone(),
            repo_owner: config.repo_owner.clone(),
            repo_name: config.repo_name.clone(),
        }
    }

    fn repository(&self) -> String {
        format!("{}/{}", self.repo_owner, self.repo_name)
    }

    /// Registry endpoint for `selector`.
    ///
    /// Path segments are percent-encoded, so a tag containing `/` or spaces
    /// still addresses a single release.
    pub fn release_url(&self, selector: &VersionSelector) -> Result<Url> {
        let invalid = |reason: String| InstallError::ConfigError {
            path: "api_url".to_string(),
            reason,
        };

        let mut url = Url::parse(&self.api_url)
            .map_err(|e| invalid(format!("'{}' is not a valid URL: {e}", self.api_url)))?;
        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|()| invalid(format!("'{}' cannot be a base URL", self.api_url)))?;
            segments.pop_if_empty().extend(["repos", self.repo_owner.as_str(), self.repo_name.as_str(), "releases"]);
            match selector {
                VersionSelector::Latest => {
                    segments.push("latest");
                }
                VersionSelector::Tag(tag) => {
                    segments.extend(["tags", tag.as_str()]);
                }
            }
        }
        Ok(url)
    }

    /// Fetch release metadata for `selector`.
    ///
    /// # Errors
    ///
    /// - [`InstallError::NetworkError`] for transport failures, unexpected
    ///   HTTP statuses and unparseable bodies
    /// - [`InstallError::ReleaseNotFound`] when the registry answers 404
    pub async fn fetch_release(&self, selector: &VersionSelector) -> Result<GitHubRelease> {
        let url = self.release_url(selector)?;
        debug!("Querying release registry: {url}");

        let network_error = |reason: String| InstallError::NetworkError {
            url: url.to_string(),
            reason,
        };

        let response = self
            .client
            .get(url.clone())
            .header(ACCEPT, HeaderValue::from_static("application/vnd.github+json"))
            .timeout(REGISTRY_REQUEST_TIMEOUT)
            .send()
            .await
            .map_err(|e| network_error(e.to_string()))?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(InstallError::ReleaseNotFound {
                selector: selector.to_string(),
                repository: self.repository(),
            });
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let mut reason = format!("HTTP {status}");
            if !body.trim().is_empty() {
                reason.push_str(": ");
                reason.push_str(body.trim());
            }
            return Err(network_error(reason));
        }

        response
            .json::<GitHubRelease>()
            .await
            .map_err(|e| network_error(format!("invalid release metadata: {e}")))
    }

    /// Resolve the asset to install.
    pub async fn resolve(&self, selector: &VersionSelector, target: &Target) -> Result<ReleaseAsset> {
        let release = self.fetch_release(selector).await?;
        select_asset(&release, target)
    }
}
