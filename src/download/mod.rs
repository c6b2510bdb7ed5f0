//! Download executor: fetches one media link into one file.
//!
//! # Features
//!
//! - Streaming downloads (memory-efficient for long videos)
//! - Skip-if-exists unless overwriting
//! - Atomic finalisation through a `.part` sibling and a rename
//! - Fixed pause after every call
//!
//! # Example
//!
//! ```no_run
//! use imgur_folder_core::download::{DownloadOutcome, FileDownloader, HttpDownloader};
//! use std::path::Path;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let downloader = HttpDownloader::new()?;
//! match downloader
//!     .download("Xy7Kq - 1.mp4", "https://i.imgur.com/a.mp4", Path::new("./album"), false)
//!     .await?
//! {
//!     DownloadOutcome::Downloaded { path, bytes } => println!("{} ({bytes} bytes)", path.display()),
//!     DownloadOutcome::Skipped { path } => println!("exists: {}", path.display()),
//!     DownloadOutcome::Failed { status, .. } => println!("HTTP {status}"),
//! }
//! # Ok(())
//! # }
//! ```

mod client;
mod constants;
mod error;

pub use client::HttpDownloader;
pub use constants::{PARTIAL_SUFFIX, POST_DOWNLOAD_PAUSE};
pub use error::DownloadError;

use std::path::{Path, PathBuf};

use async_trait::async_trait;

/// Result of one download call that reached a decision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DownloadOutcome {
    /// The body was written to `path`.
    Downloaded {
        /// Final file location.
        path: PathBuf,
        /// Bytes written.
        bytes: u64,
    },
    /// The file already existed and overwriting was off. No request was made.
    Skipped {
        /// Existing file location.
        path: PathBuf,
    },
    /// The server answered with a non-success status. No file was produced.
    Failed {
        /// The link that was requested.
        url: String,
        /// HTTP status code.
        status: u16,
    },
}

/// Fetches a single link into `folder/filename`.
///
/// Implementations create `folder` when missing, skip existing files unless
/// `overwrite` is set, and pause before returning.
#[async_trait]
pub trait FileDownloader: Send + Sync {
    /// Downloads `source_url` to `folder/filename`.
    ///
    /// # Errors
    ///
    /// Returns [`DownloadError`] for transport and filesystem failures. An HTTP
    /// error status is an `Ok(DownloadOutcome::Failed)`.
    async fn download(
        &self,
        filename: &str,
        source_url: &str,
        folder: &Path,
        overwrite: bool,
    ) -> Result<DownloadOutcome, DownloadError>;
}
