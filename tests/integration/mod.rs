//! Integration test suite for binup
//!
//! End-to-end tests of the install and uninstall flows against a mock
//! release registry (`mockito`) and a temporary home directory. Nothing here
//! touches the real network or the real shell profile.
//!
//! # Running Integration Tests
//!
//! ```bash
//! cargo test --test integration
//! ```
//!
//! # Test Organization
//!
//! - **install_flow**: resolve, download, extract, activate and PATH setup
//! - **uninstall_flow**: removal after install, with and without consent
//! - **cli**: the `binup` binary via `assert_cmd`

mod common;

mod cli;
mod install_flow;
mod uninstall_flow;
