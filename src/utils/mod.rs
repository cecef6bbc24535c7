//! Supporting utilities: consent prompts, progress bars and file system helpers.

pub mod fs;
pub mod progress;
pub mod prompt;

pub use fs::{atomic_write, create_scratch_dir, sweep_stale_scratch};
pub use progress::{ProgressBar, ProgressStyle};
pub use prompt::{Confirm, TerminalPrompt};
