//! Shared User-Agent string for API and media requests.
//!
//! Single source for project URL and UA format so metadata and download
//! traffic identify the tool the same way.

/// Project URL for User-Agent identification.
const PROJECT_UA_URL: &str = "https://github.com/fierce/imgur-folder";

/// Default User-Agent for every request the tool makes.
#[must_use]
pub(crate) fn default_user_agent() -> String {
    let version = env!("CARGO_PKG_VERSION");
    format!("imgur-folder/{version} (personal-archiver; +{PROJECT_UA_URL})")
}
