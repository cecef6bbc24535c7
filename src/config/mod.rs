//! Configuration management for binup.
//!
//! See [`InstallerConfig`] for the file format, search order and environment
//! overrides.

pub mod global;

pub use global::InstallerConfig;
