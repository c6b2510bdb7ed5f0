//! URL classification into canonical resource references.
//!
//! This module turns the many URL shapes Imgur uses into a typed
//! [`ResourceReference`] through an explicit, ordered rule table.
//!
//! # Architecture
//!
//! - [`ResourceKind`] - The closed set of things a URL can point at
//! - [`ResourceReference`] - Immutable `(kind, identifier)` pair
//! - [`resolve`] - First-match-wins evaluation of the rule table
//!
//! # Example
//!
//! ```
//! use imgur_folder_core::resolver::{ResourceKind, resolve};
//!
//! let reference = resolve("https://imgur.com/r/pics/AbC12").unwrap();
//! assert_eq!(reference.kind(), ResourceKind::SubredditImage);
//! assert_eq!(reference.identifier(), "pics/AbC12");
//! ```

mod error;
mod rules;

pub use error::ResolveError;

use std::fmt;

use tracing::{debug, instrument};

use rules::RULES;

/// The category a URL resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    /// `/a/<id>`
    Album,
    /// `/g/<id>` or `/gallery/<id>`
    Gallery,
    /// `/r/<subreddit>` with nothing after it
    Subreddit,
    /// `/r/<subreddit>/<imageId>`
    SubredditImage,
    /// `/t/<tag>`
    Tag,
}

impl ResourceKind {
    /// Returns the stable label for this kind.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Album => "album",
            Self::Gallery => "gallery",
            Self::Subreddit => "subreddit",
            Self::SubredditImage => "subreddit-image",
            Self::Tag => "tag",
        }
    }

    /// Returns the rule family this kind belongs to.
    ///
    /// Both subreddit shapes share the `subreddit` family.
    #[must_use]
    pub fn family(self) -> &'static str {
        match self {
            Self::SubredditImage => "subreddit",
            other => other.as_str(),
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An immutable `(kind, identifier)` pair.
///
/// The identifier is never empty. For [`ResourceKind::SubredditImage`] it has
/// the composite form `"<subreddit>/<imageId>"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResourceReference {
    kind: ResourceKind,
    identifier: String,
}

impl ResourceReference {
    /// Creates a reference, rejecting empty identifiers.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError::EmptyIdentifier`] when `identifier` is empty.
    pub fn new(kind: ResourceKind, identifier: impl Into<String>) -> Result<Self, ResolveError> {
        let identifier = identifier.into();
        if identifier.is_empty() {
            return Err(ResolveError::empty_identifier(kind.as_str()));
        }
        Ok(Self { kind, identifier })
    }

    /// The resolved kind.
    #[must_use]
    pub fn kind(&self) -> ResourceKind {
        self.kind
    }

    /// The canonical identifier.
    #[must_use]
    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    /// Splits a subreddit-image identifier into `(subreddit, image_id)`.
    ///
    /// Returns `None` for every other kind.
    #[must_use]
    pub fn subreddit_parts(&self) -> Option<(&str, &str)> {
        if self.kind != ResourceKind::SubredditImage {
            return None;
        }
        self.identifier.split_once('/')
    }
}

impl fmt::Display for ResourceReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.kind, self.identifier)
    }
}

/// Classifies a URL against the ordered rule table.
///
/// Query strings, fragments and trailing slashes are ignored so that
/// `https://imgur.com/r/pics/` resolves like `https://imgur.com/r/pics`.
///
/// # Errors
///
/// Returns [`ResolveError::UnrecognizedReference`] when no rule matches.
#[instrument(level = "debug")]
pub fn resolve(url: &str) -> Result<ResourceReference, ResolveError> {
    let candidate = matchable_part(url);

    for rule in RULES.iter() {
        if let Some(identifier) = rule.capture(candidate) {
            debug!(kind = %rule.kind, identifier, "URL matched rule");
            return ResourceReference::new(rule.kind, identifier);
        }
    }

    Err(ResolveError::unrecognized(url))
}

/// Strips whitespace, query, fragment and trailing slashes.
fn matchable_part(url: &str) -> &str {
    url.trim()
        .split(['?', '#'])
        .next()
        .unwrap_or_default()
        .trim_end_matches('/')
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn resolved(url: &str) -> (ResourceKind, String) {
        let reference = resolve(url).unwrap();
        (reference.kind(), reference.identifier().to_string())
    }

    #[test]
    fn test_resolve_album() {
        assert_eq!(
            resolved("https://imgur.com/a/Xy7Kq"),
            (ResourceKind::Album, "Xy7Kq".to_string())
        );
    }

    #[test]
    fn test_resolve_gallery_short_and_long_forms() {
        assert_eq!(
            resolved("https://imgur.com/g/abc123"),
            (ResourceKind::Gallery, "abc123".to_string())
        );
        assert_eq!(
            resolved("https://imgur.com/gallery/abc123"),
            (ResourceKind::Gallery, "abc123".to_string())
        );
    }

    #[test]
    fn test_resolve_subreddit_image_is_composite() {
        let reference = resolve("https://imgur.com/r/pics/AbC12").unwrap();
        assert_eq!(reference.kind(), ResourceKind::SubredditImage);
        assert_eq!(reference.kind().family(), "subreddit");
        assert_eq!(reference.identifier(), "pics/AbC12");
        assert_eq!(reference.subreddit_parts(), Some(("pics", "AbC12")));
    }

    #[test]
    fn test_resolve_bare_subreddit() {
        let reference = resolve("https://imgur.com/r/earthporn").unwrap();
        assert_eq!(reference.kind(), ResourceKind::Subreddit);
        assert_eq!(reference.kind().family(), "subreddit");
        assert_eq!(reference.identifier(), "earthporn");
        assert_eq!(reference.subreddit_parts(), None);
    }

    #[test]
    fn test_resolve_bare_subreddit_with_trailing_slash() {
        assert_eq!(
            resolved("https://imgur.com/r/earthporn/"),
            (ResourceKind::Subreddit, "earthporn".to_string())
        );
    }

    #[test]
    fn test_resolve_tag() {
        assert_eq!(
            resolved("https://imgur.com/t/programming"),
            (ResourceKind::Tag, "programming".to_string())
        );
    }

    #[test]
    fn test_resolve_album_wins_over_later_families() {
        // Satisfies both the album and the tag rule
        assert_eq!(
            resolved("https://imgur.com/t/cats/a/Xy7Kq"),
            (ResourceKind::Album, "Xy7Kq".to_string())
        );
    }

    #[test]
    fn test_resolve_gallery_wins_over_subreddit() {
        assert_eq!(
            resolved("https://imgur.com/r/pics/gallery/abc"),
            (ResourceKind::Gallery, "abc".to_string())
        );
    }

    #[test]
    fn test_resolve_ignores_query_and_fragment() {
        assert_eq!(
            resolved("https://imgur.com/r/pics?sort=top#frag"),
            (ResourceKind::Subreddit, "pics".to_string())
        );
    }

    #[test]
    fn test_resolve_unrecognized() {
        let err = resolve("https://imgur.com/user/someone").unwrap_err();
        assert!(matches!(err, ResolveError::UnrecognizedReference { .. }));
    }

    #[test]
    fn test_resolve_empty_input_is_unrecognized() {
        assert!(matches!(
            resolve(""),
            Err(ResolveError::UnrecognizedReference { .. })
        ));
    }

    #[test]
    fn test_reference_rejects_empty_identifier() {
        let err = ResourceReference::new(ResourceKind::Tag, "").unwrap_err();
        assert_eq!(err, ResolveError::empty_identifier("tag"));
    }

    #[test]
    fn test_reference_display() {
        let reference = ResourceReference::new(ResourceKind::Album, "abc").unwrap();
        assert_eq!(reference.to_string(), "album:abc");
    }
}
