//! Progress indicators for the artifact download.
//!
//! Thin wrapper over `indicatif` with binup's styling. Bars are hidden when
//! progress is disabled (`--no-progress` or `BINUP_NO_PROGRESS`) or when
//! stderr is not a terminal, so piped output and CI logs stay clean.
//!
//! # Examples
//!
//! ```rust
//! use binup::utils::progress::ProgressBar;
//!
//! let bar = ProgressBar::for_download(Some(1024), false);
//! bar.set_prefix("app-linux-x64.tar.gz");
//! bar.inc(512);
//! bar.inc(512);
//! bar.finish_and_clear();
//! ```

use crate::constants::ENV_NO_PROGRESS;
use indicatif::{ProgressBar as IndicatifBar, ProgressStyle as IndicatifStyle};
use std::time::Duration;

/// Checks if progress bars should be disabled.
///
/// Progress is disabled when `BINUP_NO_PROGRESS` is set to any value.
fn is_progress_disabled() -> bool {
    std::env::var(ENV_NO_PROGRESS).is_ok()
}

/// A progress bar with consistent styling.
pub struct ProgressBar {
    inner: IndicatifBar,
}

impl ProgressBar {
    /// Byte counter for a download.
    ///
    /// With a known length this is a bar with ETA; without one, a spinner
    /// that still shows the byte count.
    #[must_use]
    pub fn for_download(total_bytes: Option<u64>, hidden: bool) -> Self {
        if hidden || is_progress_disabled() {
            return Self {
                inner: IndicatifBar::hidden(),
            };
        }

        let inner = match total_bytes {
            Some(len) if len > 0 => {
                let bar = IndicatifBar::new(len);
                bar.set_style(ProgressStyle::download());
                bar
            }
            _ => {
                let bar = IndicatifBar::new_spinner();
                bar.set_style(ProgressStyle::spinner());
                bar.enable_steady_tick(Duration::from_millis(100));
                bar
            }
        };
        Self {
            inner,
        }
    }

    pub fn set_prefix(&self, prefix: impl Into<String>) {
        self.inner.set_prefix(prefix.into());
    }

    pub fn inc(&self, delta: u64) {
        self.inner.inc(delta);
    }

    pub fn finish_and_clear(&self) {
        self.inner.finish_and_clear();
    }
}

/// Predefined styles.
pub struct ProgressStyle;

impl ProgressStyle {
    /// Byte-based bar for downloads with a known size.
    ///
    /// Example output:
    /// ```text
    /// app-linux-x64.tar.gz [━━━━━━━━━━━━━━━━━━━━╸━━━━━━━━━━━━━━━━━━━] 2.1 MiB/4.0 MiB (00:03)
    /// ```
    #[must_use]
    pub fn download() -> IndicatifStyle {
        IndicatifStyle::default_bar()
            .template("{prefix:.bold.cyan} [{bar:40.cyan/blue}] {bytes}/{total_bytes} ({eta})")
            .unwrap_or_else(|_| IndicatifStyle::default_bar())
            .progress_chars("━╸━")
    }

    /// Spinner for downloads without a declared size.
    #[must_use]
    pub fn spinner() -> IndicatifStyle {
        IndicatifStyle::default_spinner()
            .template("{prefix:.bold.cyan} {spinner:.cyan} {bytes}")
            .unwrap_or_else(|_| IndicatifStyle::default_spinner())
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"])
    }
}
