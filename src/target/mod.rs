//! Platform resolution.
//!
//! Maps the host operating system and CPU architecture to the [`Target`] whose
//! release archive should be installed. This is the only place where the
//! installer looks at what it is running on; everything downstream is driven
//! by the resolved [`Target`] value.
//!
//! # Support Matrix
//!
//! | OS      | x64                | arm64                |
//! |---------|--------------------|----------------------|
//! | linux   | `linux-x64.tar.gz` | `linux-arm64.tar.gz` |
//! | macos   | `osx-x64.zip`      | `osx-arm64.zip`      |
//! | windows | `win-x64.zip`      | `win-arm64.zip`      |
//!
//! An x64 process on macOS that runs under Rosetta translation is resolved as
//! arm64, so Apple Silicon machines always receive the native build.

mod host;

pub use host::HostInfo;

use crate::core::{InstallError, Result};
use std::fmt;
use tracing::debug;

/// Operating systems with published release archives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Os {
    Linux,
    MacOs,
    Windows,
}

impl Os {
    /// Parse an OS name as reported by the host.
    ///
    /// Accepts the Rust `std::env::consts::OS` spellings and the common
    /// `uname -s` aliases.
    pub fn parse(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "linux" => Ok(Self::Linux),
            "macos" | "darwin" | "osx" => Ok(Self::MacOs),
            "windows" | "win32" | "win" => Ok(Self::Windows),
            _ => Err(InstallError::UnsupportedPlatform {
                component: "operating system".to_string(),
                value: value.to_string(),
            }),
        }
    }

    /// OS part of the release asset name.
    #[must_use]
    pub const fn slug(self) -> &'static str {
        match self {
            Self::Linux => "linux",
            Self::MacOs => "osx",
            Self::Windows => "win",
        }
    }

    /// File name suffix of executables.
    #[must_use]
    pub const fn exe_suffix(self) -> &'static str {
        match self {
            Self::Windows => ".exe",
            Self::Linux | Self::MacOs => "",
        }
    }
}

/// CPU architectures with published release archives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Arch {
    X64,
    Arm64,
}

impl Arch {
    /// Parse a machine architecture string as reported by the host.
    pub fn parse(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "x86_64" | "amd64" | "x64" => Ok(Self::X64),
            "aarch64" | "arm64" => Ok(Self::Arm64),
            _ => Err(InstallError::UnsupportedPlatform {
                component: "architecture".to_string(),
                value: value.to_string(),
            }),
        }
    }

    #[must_use]
    pub const fn slug(self) -> &'static str {
        match self {
            Self::X64 => "x64",
            Self::Arm64 => "arm64",
        }
    }
}

/// Archive container used for a target's release asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArchiveFormat {
    TarGz,
    Zip,
}

impl ArchiveFormat {
    /// Extension without the leading dot, as it appears in asset names.
    #[must_use]
    pub const fn extension(self) -> &'static str {
        match self {
            Self::TarGz => "tar.gz",
            Self::Zip => "zip",
        }
    }

    /// Detect the format from a file name, if it has a known extension.
    #[must_use]
    pub fn from_file_name(name: &str) -> Option<Self> {
        let lower = name.to_ascii_lowercase();
        if lower.ends_with(".tar.gz") || lower.ends_with(".tgz") {
            Some(Self::TarGz)
        } else if lower.ends_with(".zip") {
            Some(Self::Zip)
        } else {
            None
        }
    }
}

/// The canonical (OS, architecture, archive format) triple for this run.
///
/// Resolved exactly once, before any network access, and never changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Target {
    os: Os,
    arch: Arch,
    archive_format: ArchiveFormat,
}

impl Target {
    /// Build a target from its parts. The archive format follows from the OS:
    /// tarballs on Linux, zip everywhere else.
    #[must_use]
    pub const fn new(os: Os, arch: Arch) -> Self {
        let archive_format = match os {
            Os::Linux => ArchiveFormat::TarGz,
            Os::MacOs | Os::Windows => ArchiveFormat::Zip,
        };
        Self {
            os,
            arch,
            archive_format,
        }
    }

    /// Resolve the target from host introspection results.
    ///
    /// # Errors
    ///
    /// [`InstallError::UnsupportedPlatform`] naming the unrecognized OS or
    /// architecture string.
    pub fn resolve(host: &HostInfo) -> Result<Self> {
        let os = Os::parse(&host.os)?;
        let mut arch = Arch::parse(&host.arch)?;

        if os == Os::MacOs && arch == Arch::X64 && host.translated {
            debug!("x64 process running under Rosetta translation, selecting arm64 build");
            arch = Arch::Arm64;
        }

        let target = Self::new(os, arch);
        debug!("Resolved target {} ({})", target, target.archive_format.extension());
        Ok(target)
    }

    #[must_use]
    pub const fn os(&self) -> Os {
        self.os
    }

    #[must_use]
    pub const fn arch(&self) -> Arch {
        self.arch
    }

    #[must_use]
    pub const fn archive_format(&self) -> ArchiveFormat {
        self.archive_format
    }

    /// `<os>-<arch>`, e.g. `linux-x64`.
    #[must_use]
    pub fn slug(&self) -> String {
        format!("{}-{}", self.os.slug(), self.arch.slug())
    }

    /// The suffix a release asset for this target must end with,
    /// e.g. `osx-arm64.zip`.
    #[must_use]
    pub fn asset_suffix(&self) -> String {
        format!("{}.{}", self.slug(), self.archive_format.extension())
    }

    /// Platform-specific executable file name for `product`.
    #[must_use]
    pub fn executable_name(&self, product: &str) -> String {
        format!("{product}{}", self.os.exe_suffix())
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.slug())
    }
}
