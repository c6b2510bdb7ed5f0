//! Error types for the metadata gateway.

use thiserror::Error;

/// Errors returned by [`MetadataGateway`](super::MetadataGateway) operations.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// The API answered, but reported `success: false` or a non-2xx status.
    #[error("API call {endpoint} was not successful (status {})", status_label(.status))]
    NotSuccessful {
        /// Path of the endpoint that was called.
        endpoint: String,
        /// HTTP or envelope status, when one was reported.
        status: Option<u16>,
    },

    /// The request never produced a response (DNS, connect, TLS, timeout).
    #[error("transport error calling {url}: {source}")]
    Transport {
        /// Full URL of the request.
        url: String,
        /// The underlying reqwest error.
        #[source]
        source: reqwest::Error,
    },

    /// A successful response body did not have the expected shape.
    #[error("could not decode response from {url}: {reason}")]
    Decode {
        /// Full URL of the request.
        url: String,
        /// Decoder message.
        reason: String,
    },

    /// The HTTP client could not be constructed.
    #[error("failed to build HTTP client: {0}")]
    ClientBuild(#[source] reqwest::Error),

    /// A configured base URL could not be joined with an endpoint path.
    #[error("invalid API URL {url}: {reason}")]
    InvalidUrl {
        /// The URL that failed to parse.
        url: String,
        /// Parser message.
        reason: String,
    },
}

fn status_label(status: &Option<u16>) -> String {
    status.map_or_else(|| "unknown".to_string(), |code| code.to_string())
}

impl GatewayError {
    /// Creates a not-successful error.
    pub fn not_successful(endpoint: impl Into<String>, status: Option<u16>) -> Self {
        Self::NotSuccessful {
            endpoint: endpoint.into(),
            status,
        }
    }

    /// Creates a transport error.
    pub fn transport(url: impl Into<String>, source: reqwest::Error) -> Self {
        Self::Transport {
            url: url.into(),
            source,
        }
    }

    /// Creates a decode error.
    pub fn decode(url: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Decode {
            url: url.into(),
            reason: reason.into(),
        }
    }

    /// Creates an invalid URL error.
    pub fn invalid_url(url: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidUrl {
            url: url.into(),
            reason: reason.into(),
        }
    }

    /// True when the remote answered with `success: false`.
    ///
    /// Pagination treats this as the end of the listing rather than a failure.
    #[must_use]
    pub fn is_not_successful(&self) -> bool {
        matches!(self, Self::NotSuccessful { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_successful_display_with_status() {
        let err = GatewayError::not_successful("/album/abc", Some(404));
        assert_eq!(
            err.to_string(),
            "API call /album/abc was not successful (status 404)"
        );
        assert!(err.is_not_successful());
    }

    #[test]
    fn test_not_successful_display_without_status() {
        let err = GatewayError::not_successful("/gallery/t/cats/top/week/0", None);
        assert!(err.to_string().contains("status unknown"));
    }

    #[test]
    fn test_decode_is_not_a_not_successful() {
        let err = GatewayError::decode("http://x/album/a", "missing field `id`");
        assert!(!err.is_not_successful());
        assert!(err.to_string().contains("missing field"));
    }
}
