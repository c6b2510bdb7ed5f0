//! Error types for URL resolution.
//!
//! Follows the What/Why/Fix message layout used across the project.

use thiserror::Error;

/// Errors that can occur while classifying an input URL.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    /// No rule in the table matched the input
    #[error("unrecognized reference '{input}': {reason}\n  Suggestion: {suggestion}")]
    UnrecognizedReference {
        /// The input that no rule matched
        input: String,
        /// Why nothing matched
        reason: String,
        /// How to fix the issue
        suggestion: String,
    },

    /// A reference was built with an empty identifier
    #[error("empty identifier for {kind} reference")]
    EmptyIdentifier {
        /// The kind label the reference was meant to carry
        kind: &'static str,
    },
}

impl ResolveError {
    /// Creates an `UnrecognizedReference` error.
    #[must_use]
    pub fn unrecognized(input: &str) -> Self {
        Self::UnrecognizedReference {
            input: input.to_string(),
            reason: "no /a/, /g/, /gallery/, /r/ or /t/ segment found".to_string(),
            suggestion: "Pass an album, gallery, subreddit or tag URL".to_string(),
        }
    }

    /// Creates an `EmptyIdentifier` error.
    #[must_use]
    pub fn empty_identifier(kind: &'static str) -> Self {
        Self::EmptyIdentifier { kind }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unrecognized_message() {
        let err = ResolveError::unrecognized("https://example.com/nothing");
        let msg = err.to_string();
        assert!(msg.contains("https://example.com/nothing"), "should contain input");
        assert!(msg.contains("Suggestion"), "should have suggestion");
    }

    #[test]
    fn test_empty_identifier_message() {
        let err = ResolveError::empty_identifier("album");
        assert_eq!(err.to_string(), "empty identifier for album reference");
    }
}
