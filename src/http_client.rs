//! Shared HTTP client construction policy.
//!
//! The metadata gateway and the download executor both build their reqwest
//! client here so timeout, user-agent and compression settings stay in one
//! place.

use std::time::Duration;

use reqwest::Client;

use crate::user_agent;

/// Connect timeout for every client (10 seconds).
pub const CONNECT_TIMEOUT_SECS: u64 = 10;

/// Read timeout for metadata requests (30 seconds).
pub const API_READ_TIMEOUT_SECS: u64 = 30;

/// Read timeout for media downloads (5 minutes, videos can be large).
pub const DOWNLOAD_READ_TIMEOUT_SECS: u64 = 300;

/// Builds a reqwest client with the project defaults.
///
/// # Errors
///
/// Returns the underlying [`reqwest::Error`] when the TLS backend or system
/// configuration cannot be initialised.
pub fn build_http_client(
    connect_timeout_secs: u64,
    read_timeout_secs: u64,
) -> Result<Client, reqwest::Error> {
    Client::builder()
        .connect_timeout(Duration::from_secs(connect_timeout_secs))
        .timeout(Duration::from_secs(read_timeout_secs))
        .gzip(true)
        .user_agent(user_agent::default_user_agent())
        .build()
}
