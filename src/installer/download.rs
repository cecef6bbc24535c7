//! Streaming artifact download.

use crate::constants::DOWNLOAD_STALL_TIMEOUT;
use crate::core::{InstallError, Result};
use crate::utils::ProgressBar;
use futures::StreamExt;
use reqwest::Client;
use std::path::Path;
use tokio::fs::File;
use tokio::io::AsyncWriteExt;
use tokio::time::timeout;
use tracing::{debug, info};

/// Stream `url` into `dest`, returning the number of bytes written.
///
/// The body is written chunk by chunk and never held in memory as a whole.
/// `expected_size` sizes the progress bar when the response carries no
/// content length.
///
/// # Errors
///
/// [`InstallError::DownloadFailed`] for a transport error, a non-2xx status,
/// a stalled stream or an empty body.
pub async fn download_to(
    client: &Client,
    url: &str,
    dest: &Path,
    expected_size: Option<u64>,
    hide_progress: bool,
) -> Result<u64> {
    let failed = |reason: String| InstallError::DownloadFailed {
        url: url.to_string(),
        reason,
    };

    debug!("Downloading {} to {}", url, dest.display());
    let response = client.get(url).send().await.map_err(|e| failed(e.to_string()))?;

    let status = response.status();
    if !status.is_success() {
        return Err(failed(format!("HTTP {status}")));
    }

    let total = response.content_length().or(expected_size);
    let progress = ProgressBar::for_download(total, hide_progress);
    if let Some(name) = dest.file_name() {
        progress.set_prefix(name.to_string_lossy());
    }

    let mut file = File::create(dest)
        .await
        .map_err(|e| failed(format!("cannot create {}: {e}", dest.display())))?;
    let mut stream = response.bytes_stream();
    let mut downloaded: u64 = 0;

    loop {
        let chunk = match timeout(DOWNLOAD_STALL_TIMEOUT, stream.next()).await {
            Ok(Some(Ok(chunk))) => chunk,
            Ok(Some(Err(e))) => {
                progress.finish_and_clear();
                return Err(failed(e.to_string()));
            }
            Ok(None) => break,
            Err(_) => {
                progress.finish_and_clear();
                return Err(failed(format!(
                    "no data received for {} seconds after {downloaded} bytes",
                    DOWNLOAD_STALL_TIMEOUT.as_secs()
                )));
            }
        };

        file.write_all(&chunk)
            .await
            .map_err(|e| failed(format!("cannot write {}: {e}", dest.display())))?;
        downloaded += chunk.len() as u64;
        progress.inc(chunk.len() as u64);
    }

    file.flush().await.map_err(|e| failed(format!("cannot write {}: {e}", dest.display())))?;
    progress.finish_and_clear();

    if downloaded == 0 {
        return Err(failed("server returned an empty file".to_string()));
    }

    info!("Downloaded {downloaded} bytes from {url}");
    Ok(downloaded)
}
