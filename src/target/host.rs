//! Host introspection feeding [`Target::resolve`](super::Target::resolve).

use std::process::Command;
use tracing::{debug, warn};

/// What the running process knows about the machine it is on.
///
/// Kept as plain data so platform resolution can be tested with fabricated
/// hosts. [`HostInfo::detect`] is the only function that reads real host state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostInfo {
    /// Operating system name (`std::env::consts::OS` spelling)
    pub os: String,
    /// Machine architecture (`std::env::consts::ARCH` spelling)
    pub arch: String,
    /// The process is an x64 binary running under an ARM64 translation layer
    pub translated: bool,
}

impl HostInfo {
    /// Inspect the running host.
    ///
    /// The translation probe only runs for x64 processes on macOS, the one
    /// case where its answer changes the resolved target.
    #[must_use]
    pub fn detect() -> Self {
        let os = std::env::consts::OS.to_string();
        let arch = std::env::consts::ARCH.to_string();
        let translated = os == "macos" && arch == "x86_64" && is_rosetta_translated();

        debug!("Host: os={os} arch={arch} translated={translated}");
        Self {
            os,
            arch,
            translated,
        }
    }
}

/// Ask the kernel whether this process runs under Rosetta 2.
///
/// `sysctl.proc_translated` is `1` for translated processes, `0` for native
/// ones and absent on Intel Macs.
fn is_rosetta_translated() -> bool {
    match Command::new("sysctl").args(["-n", "sysctl.proc_translated"]).output() {
        Ok(output) if output.status.success() => {
            String::from_utf8_lossy(&output.stdout).trim() == "1"
        }
        Ok(_) => {
            // Unknown OID: Intel hardware
            false
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => false,
        Err(e) => {
            warn!("Failed to probe for Rosetta translation: {}", e);
            false
        }
    }
}
