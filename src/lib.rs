//! imgur-folder core library
//!
//! Turns Imgur URLs into folders of downloaded media: a URL is classified,
//! its metadata fetched from the API, and every item streamed to disk under
//! a folder named after the collection.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//! - [`resolver`] - URL classification through an ordered rule table
//! - [`gateway`] - Metadata access (albums, galleries, listings, accounts)
//! - [`download`] - Streaming executor with skip, overwrite and pacing
//! - [`orchestrator`] - Resolve, fetch, name and download, one item at a time
//! - [`naming`] - Filename sanitizing and target derivation
//! - [`config`] - Persistent JSON configuration
//! - [`auth`] - OAuth authorization helpers

// Clippy lints - strict for library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod auth;
pub mod config;
pub mod download;
pub mod gateway;
pub(crate) mod http_client;
pub mod media;
pub mod naming;
pub mod orchestrator;
pub mod resolver;
#[cfg(test)]
pub mod test_support;
pub(crate) mod user_agent;

// Re-export commonly used types
pub use auth::{AuthError, TokenPair, authorize_url, parse_authorization_redirect};
pub use config::{ConfigError, ConfigStore, Configuration, DownloadSettings};
pub use download::{
    DownloadError, DownloadOutcome, FileDownloader, HttpDownloader, POST_DOWNLOAD_PAUSE,
};
pub use gateway::{
    GatewayError, ImgurClient, ListingPage, ListingQuery, MetadataGateway, TokenResponse,
    accumulate_pages,
};
pub use media::{Collection, MediaItem, MediaSource};
pub use naming::{DownloadTarget, sanitize};
pub use orchestrator::{ArchiveError, ArchiveOptions, Archiver, DownloadReport};
pub use resolver::{ResolveError, ResourceKind, ResourceReference, resolve};
