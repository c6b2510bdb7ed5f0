//! The ordered rule table used to classify URLs.
//!
//! Rules are evaluated top to bottom and the first capturing match wins.
//! Kind families appear in the order album, gallery, subreddit, tag. Inside
//! the subreddit family the composite `/r/<sub>/<image>` rule must precede the
//! bare `/r/<sub>` rule; [`RULES`] is checked against that constraint in tests.

use std::sync::LazyLock;

use regex::Regex;

use super::ResourceKind;

/// One typed match rule: a kind and the pattern whose first group is the id.
#[derive(Debug)]
pub(crate) struct MatchRule {
    pub(crate) kind: ResourceKind,
    pub(crate) pattern: Regex,
}

impl MatchRule {
    #[allow(clippy::expect_used)]
    fn new(kind: ResourceKind, pattern: &str) -> Self {
        Self {
            kind,
            pattern: Regex::new(pattern).expect("rule pattern is valid"), // Static pattern, safe to panic
        }
    }

    /// Returns the captured identifier when the rule matches.
    pub(crate) fn capture<'a>(&self, input: &'a str) -> Option<&'a str> {
        self.pattern
            .captures(input)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str())
    }
}

/// The rule table, in evaluation order.
pub(crate) static RULES: LazyLock<Vec<MatchRule>> = LazyLock::new(|| {
    vec![
        MatchRule::new(ResourceKind::Album, r"/a/(\w+)"),
        MatchRule::new(ResourceKind::Gallery, r"/g/(\w+)"),
        MatchRule::new(ResourceKind::Gallery, r"/gallery/(\w+)"),
        MatchRule::new(ResourceKind::SubredditImage, r"/r/(\w+/\w+)"),
        MatchRule::new(ResourceKind::Subreddit, r"/r/(\w+)$"),
        MatchRule::new(ResourceKind::Tag, r"/t/(\w+)"),
    ]
});

#[cfg(test)]
mod tests {
    use super::*;

    fn position_of(kind: ResourceKind) -> usize {
        RULES
            .iter()
            .position(|rule| rule.kind == kind)
            .unwrap_or(usize::MAX)
    }

    #[test]
    fn test_family_order_is_album_gallery_subreddit_tag() {
        let album = position_of(ResourceKind::Album);
        let gallery = position_of(ResourceKind::Gallery);
        let subreddit = position_of(ResourceKind::SubredditImage);
        let tag = position_of(ResourceKind::Tag);
        assert!(album < gallery);
        assert!(gallery < subreddit);
        assert!(subreddit < tag);
    }

    #[test]
    fn test_subreddit_image_rule_precedes_bare_subreddit_rule() {
        assert!(position_of(ResourceKind::SubredditImage) < position_of(ResourceKind::Subreddit));
    }

    #[test]
    fn test_short_gallery_rule_precedes_long_form() {
        let gallery_rules: Vec<&str> = RULES
            .iter()
            .filter(|rule| rule.kind == ResourceKind::Gallery)
            .map(|rule| rule.pattern.as_str())
            .collect();
        assert_eq!(gallery_rules, vec![r"/g/(\w+)", r"/gallery/(\w+)"]);
    }

    #[test]
    fn test_capture_returns_first_group() {
        let rule = MatchRule::new(ResourceKind::Tag, r"/t/(\w+)");
        assert_eq!(rule.capture("https://imgur.com/t/cats"), Some("cats"));
        assert_eq!(rule.capture("https://imgur.com/a/cats"), None);
    }
}
