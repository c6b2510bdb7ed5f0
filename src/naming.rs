//! Filename sanitization and destination path derivation.
//!
//! Everything that turns remote metadata into a place on disk lives here:
//! the character filter applied to collection titles, the positional
//! filename scheme for album members, and the folder fallback rules.

use std::path::{Path, PathBuf};

/// Characters removed from titles before they become folder names.
const FORBIDDEN_CHARACTERS: [char; 12] = ['\\', '\'', '/', ':', '*', '?', '"', '<', '>', '|', '.', '\n'];

/// Removes every filesystem-hostile character and trims surrounding whitespace.
///
/// Empty or whitespace-only input yields an empty string; callers fall back
/// to another identifier in that case.
///
/// # Examples
///
/// ```
/// use imgur_folder_core::naming::sanitize;
///
/// assert_eq!(sanitize("  Cats: the \"best\" ones.  "), "Cats the best ones");
/// assert_eq!(sanitize(" ... "), "");
/// ```
#[must_use]
pub fn sanitize(text: &str) -> String {
    text.chars()
        .filter(|c| !FORBIDDEN_CHARACTERS.contains(c))
        .collect::<String>()
        .trim()
        .to_string()
}

/// Folder name for a collection: its sanitized title, or its sanitized id
/// when the title sanitizes to nothing.
#[must_use]
pub fn folder_name(title: &str, fallback_id: &str) -> String {
    let cleaned = sanitize(title);
    if cleaned.is_empty() {
        sanitize(fallback_id)
    } else {
        cleaned
    }
}

/// Returns the trailing extension of a link, including the dot.
///
/// The extension is the substring from the last `.` to the end, considering
/// only the final path segment so dots in host names are never picked up.
/// Query strings and fragments are not part of the extension.
#[must_use]
pub fn extension_from_link(link: &str) -> String {
    let without_query = link
        .split(['?', '#'])
        .next()
        .unwrap_or_default();
    let last_segment = without_query
        .rsplit('/')
        .next()
        .unwrap_or_default();
    last_segment
        .rfind('.')
        .map(|dot| last_segment[dot..].to_string())
        .unwrap_or_default()
}

/// Sanitized id for use inside a filename, or the sanitized fallback when
/// the id sanitizes to nothing.
#[must_use]
pub fn filename_id(id: &str, fallback: &str) -> String {
    folder_name(id, fallback)
}

/// Positional filename used for album members: `"<id> - <position><ext>"`.
#[must_use]
pub fn positional_filename(collection_id: &str, position: usize, extension: &str) -> String {
    format!("{collection_id} - {position}{extension}")
}

/// Where one media item lands on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadTarget {
    /// Destination folder (root joined with the collection folder name).
    pub folder: PathBuf,
    /// Destination filename inside `folder`.
    pub filename: String,
}

impl DownloadTarget {
    /// Creates a target from a folder and filename.
    #[must_use]
    pub fn new(folder: impl Into<PathBuf>, filename: impl Into<String>) -> Self {
        Self {
            folder: folder.into(),
            filename: filename.into(),
        }
    }

    /// Full path of the destination file.
    #[must_use]
    pub fn path(&self) -> PathBuf {
        self.folder.join(&self.filename)
    }
}

/// Joins the configured root with a collection's folder name.
#[must_use]
pub fn collection_folder(root: &Path, title: &str, fallback_id: &str) -> PathBuf {
    root.join(folder_name(title, fallback_id))
}
