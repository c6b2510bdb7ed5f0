//! Config file location and download path normalisation.

use std::env;
use std::ffi::OsString;
use std::path::{Component, Path, PathBuf};

/// Directory under the config root that holds the file.
pub const CONFIG_DIR_NAME: &str = "imgurToFolder";

/// File name of the configuration.
pub const CONFIG_FILE_NAME: &str = "config.json";

/// `$XDG_CONFIG_HOME/imgurToFolder/config.json`, else
/// `$HOME/.config/imgurToFolder/config.json`.
#[must_use]
pub fn resolve_default_config_path() -> Option<PathBuf> {
    if let Some(xdg_config_home) = env_var_non_empty_os("XDG_CONFIG_HOME") {
        return Some(
            PathBuf::from(xdg_config_home)
                .join(CONFIG_DIR_NAME)
                .join(CONFIG_FILE_NAME),
        );
    }

    let home = env_var_non_empty_os("HOME")?;
    Some(
        PathBuf::from(home)
            .join(".config")
            .join(CONFIG_DIR_NAME)
            .join(CONFIG_FILE_NAME),
    )
}

fn env_var_non_empty_os(name: &str) -> Option<OsString> {
    let value = env::var_os(name)?;
    if value.is_empty() { None } else { Some(value) }
}

/// Turns a user-supplied folder into an absolute path.
///
/// A leading `~` is replaced with `$HOME`, relative paths are joined to the
/// current directory, and symlinks are resolved when the path exists. A
/// missing path is normalised lexically instead, so this never fails.
#[must_use]
pub fn canonicalize_download_path(raw: impl AsRef<Path>) -> PathBuf {
    let expanded = expand_home(raw.as_ref());
    let absolute = if expanded.is_absolute() {
        expanded
    } else {
        match env::current_dir() {
            Ok(cwd) => cwd.join(expanded),
            Err(_) => expanded,
        }
    };

    std::fs::canonicalize(&absolute).unwrap_or_else(|_| normalize_lexically(&absolute))
}

fn expand_home(path: &Path) -> PathBuf {
    let Ok(rest) = path.strip_prefix("~") else {
        return path.to_path_buf();
    };
    match env_var_non_empty_os("HOME") {
        Some(home) => PathBuf::from(home).join(rest),
        None => path.to_path_buf(),
    }
}

fn normalize_lexically(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                normalized.pop();
            }
            other => normalized.push(other.as_os_str()),
        }
    }
    normalized
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    use tempfile::TempDir;

    #[test]
    fn test_normalize_lexically_resolves_dots() {
        assert_eq!(
            normalize_lexically(Path::new("/a/./b/../c/")),
            PathBuf::from("/a/c")
        );
    }

    #[test]
    fn test_canonicalize_existing_dir() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("x");
        std::fs::create_dir(&nested).unwrap();

        let raw = dir.path().join("x").join("..").join("x");
        assert_eq!(
            canonicalize_download_path(&raw),
            std::fs::canonicalize(&nested).unwrap()
        );
    }

    #[test]
    fn test_canonicalize_missing_dir_does_not_fail() {
        let dir = TempDir::new().unwrap();
        let raw = dir.path().join("not").join("yet").join("..").join("here");
        let resolved = canonicalize_download_path(&raw);
        assert!(resolved.is_absolute());
        assert!(resolved.ends_with("not/here"));
    }

    #[test]
    fn test_relative_path_becomes_absolute() {
        let resolved = canonicalize_download_path("some-relative-folder-that-does-not-exist");
        assert!(resolved.is_absolute());
        assert!(resolved.ends_with("some-relative-folder-that-does-not-exist"));
    }

    #[test]
    fn test_expand_home_only_touches_leading_tilde() {
        let untouched = expand_home(Path::new("/tmp/~/x"));
        assert_eq!(untouched, PathBuf::from("/tmp/~/x"));
        if let Some(home) = env_var_non_empty_os("HOME") {
            assert_eq!(
                expand_home(Path::new("~/Pictures")),
                PathBuf::from(home).join("Pictures")
            );
        }
    }
}
