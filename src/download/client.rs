//! HTTP client wrapper for streaming media downloads.
//!
//! [`HttpDownloader`] streams a response into a `.part` sibling of the
//! destination and renames it into place only once the body is complete.

use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;
use futures_util::StreamExt;
use reqwest::Client;
use tokio::fs::File;
use tokio::io::{AsyncWriteExt, BufWriter};
use tracing::{debug, info, instrument, warn};
use url::Url;

use super::constants::{PARTIAL_SUFFIX, POST_DOWNLOAD_PAUSE};
use super::error::DownloadError;
use super::{DownloadOutcome, FileDownloader};
use crate::http_client::{CONNECT_TIMEOUT_SECS, DOWNLOAD_READ_TIMEOUT_SECS, build_http_client};

/// Streaming file downloader.
///
/// Every call to [`FileDownloader::download`] is followed by a fixed pause
/// before it returns, regardless of outcome.
///
/// # Example
///
/// ```no_run
/// use imgur_folder_core::download::{FileDownloader, HttpDownloader};
/// use std::path::Path;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let downloader = HttpDownloader::new()?;
/// let outcome = downloader
///     .download("cat.jpg", "https://i.imgur.com/cat.jpg", Path::new("./cats"), false)
///     .await?;
/// println!("{outcome:?}");
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct HttpDownloader {
    client: Client,
    pause: Duration,
}

impl HttpDownloader {
    /// Creates a downloader with the default timeouts (10s connect, 5min read).
    ///
    /// # Errors
    ///
    /// Returns [`DownloadError::ClientBuild`] if the HTTP client cannot be
    /// initialised.
    pub fn new() -> Result<Self, DownloadError> {
        Self::new_with_timeouts(CONNECT_TIMEOUT_SECS, DOWNLOAD_READ_TIMEOUT_SECS)
    }

    /// Creates a downloader with custom timeouts.
    ///
    /// # Errors
    ///
    /// Returns [`DownloadError::ClientBuild`] if the HTTP client cannot be
    /// initialised.
    pub fn new_with_timeouts(
        connect_timeout_secs: u64,
        read_timeout_secs: u64,
    ) -> Result<Self, DownloadError> {
        let client = build_http_client(connect_timeout_secs, read_timeout_secs)
            .map_err(DownloadError::ClientBuild)?;
        Ok(Self {
            client,
            pause: POST_DOWNLOAD_PAUSE,
        })
    }

    /// Overrides the pause that follows every call.
    #[must_use]
    pub fn with_pause(mut self, pause: Duration) -> Self {
        self.pause = pause;
        self
    }

    /// The pause that follows every call.
    #[must_use]
    pub fn pause(&self) -> Duration {
        self.pause
    }

    async fn fetch(
        &self,
        filename: &str,
        source_url: &str,
        folder: &Path,
        overwrite: bool,
    ) -> Result<DownloadOutcome, DownloadError> {
        if !tokio::fs::try_exists(folder).await.unwrap_or(false) {
            debug!(folder = %folder.display(), "creating folder");
        }
        tokio::fs::create_dir_all(folder)
            .await
            .map_err(|e| DownloadError::io(folder, e))?;

        let target = folder.join(filename);
        if !overwrite && tokio::fs::try_exists(&target).await.unwrap_or(false) {
            info!(file = filename, "Skipping existing file");
            return Ok(DownloadOutcome::Skipped { path: target });
        }

        let parsed_url =
            Url::parse(source_url).map_err(|_| DownloadError::invalid_url(source_url))?;

        let response = self
            .client
            .get(parsed_url)
            .send()
            .await
            .map_err(|e| DownloadError::from_reqwest(source_url, e))?;

        let status = response.status();
        if !status.is_success() {
            warn!(
                file = filename,
                path = %target.display(),
                status = status.as_u16(),
                "Cannot download file"
            );
            return Ok(DownloadOutcome::Failed {
                url: source_url.to_string(),
                status: status.as_u16(),
            });
        }

        let partial = partial_path(&target);
        let mut file = File::create(&partial)
            .await
            .map_err(|e| DownloadError::io(partial.clone(), e))?;

        let stream_result = stream_to_file(&mut file, response, source_url, &partial).await;
        drop(file);

        let bytes = match stream_result {
            Ok(bytes) => bytes,
            Err(err) => {
                debug!(path = %partial.display(), "cleaning up partial file after error");
                let _ = tokio::fs::remove_file(&partial).await;
                return Err(err);
            }
        };

        if let Err(e) = tokio::fs::rename(&partial, &target).await {
            let _ = tokio::fs::remove_file(&partial).await;
            return Err(DownloadError::io(target, e));
        }

        info!(
            file = filename,
            size_mb = %format!("{:.2}", megabytes(bytes)),
            "Downloaded file"
        );
        Ok(DownloadOutcome::Downloaded {
            path: target,
            bytes,
        })
    }
}

#[async_trait]
impl FileDownloader for HttpDownloader {
    #[instrument(skip(self, folder), fields(folder = %folder.display()))]
    async fn download(
        &self,
        filename: &str,
        source_url: &str,
        folder: &Path,
        overwrite: bool,
    ) -> Result<DownloadOutcome, DownloadError> {
        let result = self.fetch(filename, source_url, folder, overwrite).await;
        tokio::time::sleep(self.pause).await;
        result
    }
}

/// `<target>.part`, in the same folder as the target.
fn partial_path(target: &Path) -> PathBuf {
    let mut name = target.as_os_str().to_owned();
    name.push(PARTIAL_SUFFIX);
    PathBuf::from(name)
}

#[allow(clippy::cast_precision_loss)]
fn megabytes(bytes: u64) -> f64 {
    bytes as f64 / f64::from(1u32 << 20)
}

/// Streams response body to file, returning bytes written.
async fn stream_to_file(
    file: &mut File,
    response: reqwest::Response,
    url: &str,
    file_path: &Path,
) -> Result<u64, DownloadError> {
    let mut writer = BufWriter::new(file);
    let mut stream = response.bytes_stream();
    let mut bytes_written: u64 = 0;

    while let Some(chunk_result) = stream.next().await {
        let chunk = chunk_result.map_err(|e| DownloadError::from_reqwest(url, e))?;

        writer
            .write_all(&chunk)
            .await
            .map_err(|e| DownloadError::io(file_path.to_path_buf(), e))?;

        bytes_written += chunk.len() as u64;
    }

    writer
        .flush()
        .await
        .map_err(|e| DownloadError::io(file_path.to_path_buf(), e))?;

    Ok(bytes_written)
}
