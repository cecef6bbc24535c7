//! GitHub releases API model and HTTP client setup.

use crate::config::InstallerConfig;
use crate::constants::HTTP_CONNECT_TIMEOUT;
use crate::core::{InstallError, Result};
use reqwest::Client;
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue, USER_AGENT};
use serde::Deserialize;
use tracing::debug;

/// Release metadata as returned by `/repos/{owner}/{repo}/releases/...`.
///
/// Only the fields the installer uses are modelled; everything else in the
/// response is ignored.
#[derive(Deserialize, Debug, Clone)]
pub struct GitHubRelease {
    pub tag_name: String,
    #[serde(default)]
    pub assets: Vec<GitHubAsset>,
}

/// One downloadable file attached to a release.
#[derive(Deserialize, Debug, Clone)]
pub struct GitHubAsset {
    pub name: String,
    pub browser_download_url: String,
    #[serde(default)]
    pub size: Option<u64>,
}

/// Build the HTTP client shared by the registry query and the download.
///
/// Sends a `binup/<version>` user agent and, when a token is configured, a
/// sensitive bearer `Authorization` header.
///
/// # Errors
///
/// [`InstallError::MissingDependency`] when no HTTP client can be built (for
/// example, no usable TLS backend) or the token is not a valid header value.
pub fn build_client(config: &InstallerConfig) -> Result<Client> {
    let mut headers = HeaderMap::new();
    headers.insert(
        USER_AGENT,
        HeaderValue::from_str(&format!("binup/{}", env!("CARGO_PKG_VERSION"))).map_err(|e| {
            InstallError::MissingDependency {
                dependency: "HTTP client".to_string(),
                reason: e.to_string(),
            }
        })?,
    );

    if let Some(token) = &config.github_token {
        debug!("Adding GitHub token to registry requests");
        let mut auth = HeaderValue::from_str(&format!("Bearer {token}")).map_err(|_| {
            InstallError::MissingDependency {
                dependency: "GitHub token".to_string(),
                reason: "GITHUB_TOKEN contains characters not allowed in an HTTP header".to_string(),
            }
        })?;
        auth.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth);
    }

    Client::builder()
        .default_headers(headers)
        .connect_timeout(HTTP_CONNECT_TIMEOUT)
        .build()
        .map_err(|e| InstallError::MissingDependency {
            dependency: "HTTP client".to_string(),
            reason: e.to_string(),
        })
}
