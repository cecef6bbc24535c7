//! Test utilities for binup
//!
//! Shared by the unit tests inside the crate and the integration suite under
//! `tests/` (through the `test-utils` feature):
//!
//! - [`init_test_logging`] for tracing output in tests
//! - archive and registry fixtures in [`fixtures`]
//! - [`CountingPrompt`], a scripted consent prompt that records how often it
//!   was asked
//!
//! # Example
//!
//! ```rust,no_run
//! use binup::test_utils::{CountingPrompt, write_tar_gz};
//! use std::path::Path;
//!
//! write_tar_gz(Path::new("/tmp/app-linux-x64.tar.gz"), &[("app-linux-x64/app", b"#!/bin/sh\n")]);
//! let prompt = CountingPrompt::new(true);
//! assert_eq!(prompt.asked(), 0);
//! ```

pub mod fixtures;

pub use fixtures::{release_json, write_tar_gz, write_tar_gz_symlink, write_zip};

use crate::utils::Confirm;
use std::io;
use std::sync::Once;
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Global flag to ensure logging is only initialized once in tests
static INIT_LOGGING: Once = Once::new();

/// Initialize logging for tests.
///
/// Only the first call has an effect. With `level` set, that level is used;
/// otherwise `RUST_LOG` is honoured, and without either nothing is logged.
///
/// ```bash
/// RUST_LOG=binup=debug cargo test
/// ```
pub fn init_test_logging(level: Option<Level>) {
    INIT_LOGGING.call_once(|| {
        let filter = if let Some(level) = level {
            EnvFilter::new(level.to_string())
        } else if std::env::var("RUST_LOG").is_ok() {
            EnvFilter::from_default_env()
        } else {
            return;
        };

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .with_target(true)
            .with_thread_ids(false)
            .try_init();
    });
}

/// Gives a fixed answer and counts the questions it was asked.
#[derive(Debug, Default)]
pub struct CountingPrompt {
    answer: bool,
    asked: AtomicUsize,
}

impl CountingPrompt {
    #[must_use]
    pub fn new(answer: bool) -> Self {
        Self {
            answer,
            asked: AtomicUsize::new(0),
        }
    }

    /// How many times [`Confirm::confirm`] was called.
    pub fn asked(&self) -> usize {
        self.asked.load(Ordering::SeqCst)
    }
}

impl Confirm for CountingPrompt {
    fn confirm(&self, _question: &str) -> io::Result<bool> {
        self.asked.fetch_add(1, Ordering::SeqCst);
        Ok(self.answer)
    }
}
