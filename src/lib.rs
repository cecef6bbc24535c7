//! binup - install a prebuilt command-line executable from GitHub releases
//!
//! binup installs, updates and removes a single executable published as
//! per-platform archives on a GitHub releases page. One run resolves the
//! platform, picks the matching release asset, installs the executable into a
//! per-user directory and, with the user's consent, puts that directory on
//! `PATH` by appending a marked block to their shell startup file.
//!
//! # Architecture Overview
//!
//! ```text
//! target ──► release ──► installer ──► profile        (binup [TAG])
//!   │
//!   └──────────────────► uninstaller ─► profile       (binup uninstall)
//! ```
//!
//! Each step consumes the previous step's output; nothing runs concurrently.
//! After the [`target::Target`] is resolved no code branches on the host
//! platform again: install directory, executable name, archive format and
//! the macOS quarantine step all follow from that value.
//!
//! # Core Modules
//!
//! - [`target`] - host OS/architecture detection, including Rosetta
//! - [`release`] - release registry queries and asset selection
//! - [`installer`] - download, extraction and activation of the executable
//! - [`profile`] - shell detection and the marker block in startup files
//! - [`uninstaller`] - removal of the executable and the marker block
//!
//! # Supporting Modules
//!
//! - [`cli`] - argument parsing and the install/uninstall commands
//! - [`config`] - optional configuration file and environment overrides
//! - [`core`] - error taxonomy and user-facing error rendering
//! - [`utils`] - consent prompts, progress bars and file system helpers
//! - [`constants`] - compiled-in defaults
//!
//! # Configuration
//!
//! An optional `config.toml` in the platform config directory (or the file
//! named by `BINUP_CONFIG` / `--config`) changes the product name, release
//! repository, registry URL, install directory and marker comment. See
//! [`config::InstallerConfig`].

// Installer components
pub mod installer;
pub mod profile;
pub mod release;
pub mod target;
pub mod uninstaller;

// Supporting modules
pub mod cli;
pub mod config;
pub mod constants;
pub mod core;
pub mod utils;

// test_utils module is available for both unit tests and integration tests
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
