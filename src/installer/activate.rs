//! Putting the extracted executable in place and making it runnable.

use crate::constants::QUARANTINE_ATTRIBUTE;
use crate::core::{InstallError, Result};
use std::io;
use std::path::Path;
use tokio::fs;
use tracing::{debug, info, warn};

/// Move `source` to `dest`, replacing whatever is at `dest`.
///
/// A plain rename when both paths share a filesystem. The scratch area
/// usually lives on another device (`/tmp` on tmpfs), so a cross-device
/// rename falls back to copying next to `dest` and renaming from there,
/// which keeps the final replacement atomic.
///
/// # Errors
///
/// [`InstallError::MoveFailed`] naming `dest`.
pub async fn move_into_place(source: &Path, dest: &Path) -> Result<()> {
    let failed = |e: io::Error| InstallError::MoveFailed {
        destination: dest.display().to_string(),
        reason: e.to_string(),
    };

    match fs::rename(source, dest).await {
        Ok(()) => {
            debug!("Moved {} to {}", source.display(), dest.display());
            Ok(())
        }
        Err(e) if e.kind() == io::ErrorKind::CrossesDevices => {
            debug!("{} is on another filesystem, copying into place", source.display());
            let file_name = dest.file_name().map(|n| n.to_string_lossy().into_owned()).unwrap_or_default();
            let staged = dest.with_file_name(format!(".{file_name}.new"));

            if let Err(e) = fs::copy(source, &staged).await {
                let _ = fs::remove_file(&staged).await;
                return Err(failed(e));
            }
            if let Err(e) = fs::rename(&staged, dest).await {
                let _ = fs::remove_file(&staged).await;
                return Err(failed(e));
            }
            if let Err(e) = fs::remove_file(source).await {
                debug!("Could not remove {} after copying: {}", source.display(), e);
            }
            Ok(())
        }
        Err(e) => Err(failed(e)),
    }
}

/// Set the executable bits (`0o755`) on `path`. No-op where the filesystem
/// has no such bits.
///
/// # Errors
///
/// [`InstallError::PermissionFailed`] naming `path`.
pub async fn make_executable(path: &Path) -> Result<()> {
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;

        fs::set_permissions(path, std::fs::Permissions::from_mode(0o755)).await.map_err(|e| {
            InstallError::PermissionFailed {
                path: path.display().to_string(),
                reason: e.to_string(),
            }
        })?;
        debug!("Marked {} executable", path.display());
    }
    #[cfg(not(unix))]
    {
        debug!("No executable bit to set on {}", path.display());
    }
    Ok(())
}

/// Best-effort removal of the macOS quarantine attribute from `path`.
///
/// Never fails: without `xattr`, or when the attribute cannot be removed, the
/// user is left to approve the binary on first launch. Returns whether the
/// attribute was cleared.
pub async fn clear_quarantine(path: &Path) -> bool {
    let xattr = match which::which("xattr") {
        Ok(xattr) => xattr,
        Err(_) => {
            warn!("xattr not found; {} may need to be approved on first launch", path.display());
            return false;
        }
    };

    match tokio::process::Command::new(xattr).arg("-d").arg(QUARANTINE_ATTRIBUTE).arg(path).output().await {
        Ok(output) if output.status.success() => {
            info!("Cleared {} on {}", QUARANTINE_ATTRIBUTE, path.display());
            true
        }
        Ok(output) => {
            // xattr exits non-zero when the attribute was never set
            debug!(
                "xattr -d {} {} exited with {}: {}",
                QUARANTINE_ATTRIBUTE,
                path.display(),
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            );
            false
        }
        Err(e) => {
            warn!("Failed to run xattr on {}: {}", path.display(), e);
            false
        }
    }
}
