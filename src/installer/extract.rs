//! Archive extraction.
//!
//! Release archives wrap the executable in a directory named after the
//! archive itself:
//!
//! ```text
//! app-linux-x64.tar.gz
//! └── app-linux-x64/
//!     └── app
//! ```
//!
//! The whole archive is unpacked into the scratch area and the executable is
//! looked up at exactly `<archive-stem>/<executable>`.

use crate::core::{InstallError, Result};
use crate::target::ArchiveFormat;
use flate2::read::GzDecoder;
use std::fs::File;
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

/// Listing cap for the "executable not found" error.
const MAX_LISTED_ENTRIES: usize = 20;

/// Archive file name without its archive extension:
/// `app-osx-arm64.zip` → `app-osx-arm64`.
#[must_use]
pub fn archive_stem(name: &str) -> &str {
    let lower = name.to_ascii_lowercase();
    for ext in [".tar.gz", ".tgz", ".zip"] {
        if lower.ends_with(ext) {
            return &name[..name.len() - ext.len()];
        }
    }
    name
}

/// Unpack `archive` into `dest` and return the path of `executable` inside it.
///
/// # Errors
///
/// [`InstallError::ExtractFailed`] when the archive is corrupt, when the
/// executable is not at `<archive-stem>/<executable>` (the error lists what
/// the archive did contain) or when that entry is a link or directory.
pub async fn extract_executable(
    archive: &Path,
    format: ArchiveFormat,
    dest: &Path,
    executable: &str,
) -> Result<PathBuf> {
    let archive_name = archive.file_name().map(|n| n.to_string_lossy().into_owned()).unwrap_or_default();
    let failed = |reason: String| InstallError::ExtractFailed {
        archive: archive_name.clone(),
        reason,
    };

    let archive_path = archive.to_path_buf();
    let dest_path = dest.to_path_buf();
    tokio::task::spawn_blocking(move || unpack(&archive_path, format, &dest_path))
        .await
        .map_err(|e| failed(format!("extraction task failed: {e}")))?
        .map_err(failed)?;

    let expected = dest.join(archive_stem(&archive_name)).join(executable);
    let relative = expected.strip_prefix(dest).unwrap_or(&expected);
    debug!("Looking for executable at {}", expected.display());

    // Links are not followed: a symlinked entry could point outside the scratch area
    match std::fs::symlink_metadata(&expected) {
        Ok(meta) if meta.file_type().is_file() => return Ok(expected),
        Ok(_) => {
            return Err(failed(format!("'{}' in archive is not a regular file", relative.display())));
        }
        Err(_) => {}
    }

    let listing = list_entries(dest);
    Err(failed(format!(
        "expected '{}' in archive, found: {}",
        relative.display(),
        if listing.is_empty() { "nothing".to_string() } else { listing.join(", ") }
    )))
}

fn unpack(archive: &Path, format: ArchiveFormat, dest: &Path) -> std::result::Result<(), String> {
    std::fs::create_dir_all(dest).map_err(|e| format!("cannot create {}: {e}", dest.display()))?;
    let file = File::open(archive).map_err(|e| format!("cannot open archive: {e}"))?;

    match format {
        ArchiveFormat::TarGz => {
            let mut tarball = tar::Archive::new(GzDecoder::new(file));
            tarball.set_preserve_permissions(true);
            tarball.unpack(dest).map_err(|e| format!("invalid tar.gz archive: {e}"))
        }
        ArchiveFormat::Zip => {
            let mut zip = zip::ZipArchive::new(file).map_err(|e| format!("invalid zip archive: {e}"))?;
            zip.extract(dest).map_err(|e| format!("invalid zip archive: {e}"))
        }
    }
}

fn list_entries(root: &Path) -> Vec<String> {
    WalkDir::new(root)
        .min_depth(1)
        .sort_by_file_name()
        .into_iter()
        .filter_map(std::result::Result::ok)
        .filter(|entry| entry.file_type().is_file())
        .filter_map(|entry| entry.path().strip_prefix(root).ok().map(|p| p.display().to_string()))
        .take(MAX_LISTED_ENTRIES)
        .collect()
}
