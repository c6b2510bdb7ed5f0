//! OAuth helpers for the token-in-redirect authorization flow.
//!
//! The user opens [`authorize_url`] in a browser, signs in, and pastes the
//! URL they were redirected to. The tokens are read from its fragment by
//! [`parse_authorization_redirect`].

use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

/// Authorization endpoint for the implicit (token) grant.
pub const AUTHORIZE_ENDPOINT: &str = "https://api.imgur.com/oauth2/authorize";

#[allow(clippy::expect_used)]
static ACCESS_TOKEN_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"access_token=(\w+)").expect("access token pattern is valid") // Static pattern, safe to panic
});

#[allow(clippy::expect_used)]
static REFRESH_TOKEN_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"refresh_token=(\w+)").expect("refresh token pattern is valid") // Static pattern, safe to panic
});

/// Errors from parsing an authorization redirect.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    /// The pasted URL does not carry the named token.
    #[error("redirect URL has no {name}\n  Suggestion: paste the full address bar URL after signing in")]
    MissingToken {
        /// `access_token` or `refresh_token`.
        name: &'static str,
    },
}

/// Access and refresh token issued by the authorization flow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenPair {
    /// Short-lived access token.
    pub access_token: String,
    /// Long-lived refresh token.
    pub refresh_token: String,
}

/// URL the user opens to grant access to `client_id`.
#[must_use]
pub fn authorize_url(client_id: &str) -> String {
    let query = url::form_urlencoded::Serializer::new(String::new())
        .append_pair("response_type", "token")
        .append_pair("client_id", client_id)
        .finish();
    format!("{AUTHORIZE_ENDPOINT}?{query}")
}

/// Extracts both tokens from the redirected URL.
///
/// # Errors
///
/// Returns [`AuthError::MissingToken`] naming the first token not found.
pub fn parse_authorization_redirect(redirect: &str) -> Result<TokenPair, AuthError> {
    let access_token = capture(&ACCESS_TOKEN_PATTERN, redirect)
        .ok_or(AuthError::MissingToken {
            name: "access_token",
        })?;
    let refresh_token = capture(&REFRESH_TOKEN_PATTERN, redirect)
        .ok_or(AuthError::MissingToken {
            name: "refresh_token",
        })?;
    Ok(TokenPair {
        access_token,
        refresh_token,
    })
}

fn capture(pattern: &Regex, input: &str) -> Option<String> {
    pattern
        .captures(input)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}
