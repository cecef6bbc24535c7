//! File system helpers.
//!
//! - [`atomic`]: temp-and-rename writes for files the user also edits
//! - [`temp`]: self-cleaning scratch directories and the stale-scratch sweep

pub mod atomic;
pub mod temp;

pub use atomic::atomic_write;
pub use temp::{create_scratch_dir, sweep_stale_scratch};
