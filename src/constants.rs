//! Compiled-in defaults used across the binup codebase.
//!
//! Everything here can be overridden through the configuration file or
//! environment (see [`crate::config`]); these values only apply when
//! nothing else is set.

use std::time::Duration;

/// Executable (and product) name installed when no configuration names one.
pub const DEFAULT_PRODUCT: &str = "app";

/// Owner of the repository whose releases are installed.
pub const DEFAULT_REPO_OWNER: &str = "binup-dev";

/// Repository whose releases are installed.
pub const DEFAULT_REPO_NAME: &str = "app";

/// Base URL of the release registry API.
pub const DEFAULT_API_URL: &str = "https://api.github.com";

/// Version selector sentinel meaning "the newest published release".
pub const LATEST: &str = "latest";

/// Positional argument that switches the CLI into uninstall mode.
pub const UNINSTALL_COMMAND: &str = "uninstall";

/// Suffix appended to a shell profile when it is backed up before editing.
pub const BACKUP_SUFFIX: &str = "backup";

/// Prefix of every scratch directory created under the system temp dir.
pub const SCRATCH_PREFIX: &str = "binup-scratch-";

/// Scratch directories older than this are considered abandoned.
pub const STALE_SCRATCH_AGE: Duration = Duration::from_secs(24 * 60 * 60);

/// Connect timeout for registry and download requests.
pub const HTTP_CONNECT_TIMEOUT: Duration = Duration::from_secs(30);

/// Overall timeout for the registry metadata request.
pub const REGISTRY_REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// A download that receives no bytes for this long is abandoned.
pub const DOWNLOAD_STALL_TIMEOUT: Duration = Duration::from_secs(5 * 60);

/// Extended attribute macOS sets on files downloaded from the internet.
pub const QUARANTINE_ATTRIBUTE: &str = "com.apple.quarantine";

/// Environment variable pointing at an alternative configuration file.
pub const ENV_CONFIG: &str = "BINUP_CONFIG";

/// Environment variable overriding the registry base URL.
pub const ENV_API_URL: &str = "BINUP_API_URL";

/// Environment variable overriding the install directory.
pub const ENV_INSTALL_DIR: &str = "BINUP_INSTALL_DIR";

/// Environment variable disabling progress bars.
pub const ENV_NO_PROGRESS: &str = "BINUP_NO_PROGRESS";

/// Token sent to the registry to lift anonymous rate limits.
pub const ENV_GITHUB_TOKEN: &str = "GITHUB_TOKEN";
