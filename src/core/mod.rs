//! Core types shared by every installer component.
//!
//! At the moment this is the error taxonomy: [`InstallError`] for library
//! code, [`ErrorContext`] and [`user_friendly_error`] for what the CLI prints.

pub mod error;

pub use error::{ErrorContext, InstallError, Result, user_friendly_error};
