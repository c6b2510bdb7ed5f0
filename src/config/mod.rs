//! Persistent user configuration.
//!
//! The configuration is a JSON object with exactly six keys, written sorted
//! with 4-space indentation. The download core only sees it through
//! [`DownloadSettings`]; everything else (credentials, persistence) is used
//! by the binary.

mod error;
mod paths;

pub use error::ConfigError;
pub use paths::{
    CONFIG_DIR_NAME, CONFIG_FILE_NAME, canonicalize_download_path, resolve_default_config_path,
};

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

/// Read-only settings the download core depends on.
pub trait DownloadSettings: Send + Sync {
    /// Root folder under which collection folders are created.
    fn download_path(&self) -> &Path;

    /// Whether existing files are downloaded again.
    fn overwrite(&self) -> bool;
}

/// The stored configuration.
///
/// Fields are declared in key order so the serialized object is sorted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Configuration {
    access_token: String,
    client_id: String,
    client_secret: String,
    download_path: PathBuf,
    overwrite: bool,
    refresh_token: String,
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            access_token: String::new(),
            client_id: String::new(),
            client_secret: String::new(),
            download_path: canonicalize_download_path(""),
            overwrite: false,
            refresh_token: String::new(),
        }
    }
}

impl Configuration {
    /// OAuth access token (empty when not authorized).
    #[must_use]
    pub fn access_token(&self) -> &str {
        &self.access_token
    }

    /// Registered application client id.
    #[must_use]
    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    /// Registered application client secret.
    #[must_use]
    pub fn client_secret(&self) -> &str {
        &self.client_secret
    }

    /// OAuth refresh token (empty when not authorized).
    #[must_use]
    pub fn refresh_token(&self) -> &str {
        &self.refresh_token
    }

    /// Replaces the download root, canonicalizing it.
    pub fn set_download_path(&mut self, path: impl AsRef<Path>) {
        self.download_path = canonicalize_download_path(path);
        debug!(path = %self.download_path.display(), "Download path set");
    }

    /// Sets whether existing files are downloaded again.
    pub fn set_overwrite(&mut self, overwrite: bool) {
        self.overwrite = overwrite;
    }

    /// Serializes to the on-disk JSON form (sorted keys, 4-space indent).
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Serialize`] when the download path is not UTF-8.
    pub fn to_json(&self) -> Result<String, ConfigError> {
        let mut buffer = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut serializer = serde_json::Serializer::with_formatter(&mut buffer, formatter);
        self.serialize(&mut serializer)
            .map_err(ConfigError::Serialize)?;
        Ok(String::from_utf8_lossy(&buffer).into_owned())
    }
}

impl DownloadSettings for Configuration {
    fn download_path(&self) -> &Path {
        &self.download_path
    }

    fn overwrite(&self) -> bool {
        self.overwrite
    }
}

/// A configuration bound to the file it was loaded from.
///
/// Credential setters and [`set_default_download_path`](Self::set_default_download_path)
/// write the file immediately. [`Configuration::set_download_path`] through
/// [`config_mut`](Self::config_mut) only affects the current run.
#[derive(Debug, Clone)]
pub struct ConfigStore {
    path: PathBuf,
    config: Configuration,
}

impl ConfigStore {
    /// Loads the file at `path`.
    ///
    /// Keys missing from the file take their default values, and the stored
    /// download path is canonicalized again.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] when the file cannot be read and
    /// [`ConfigError::Parse`] when it is not a configuration object.
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let path = path.into();
        let content = std::fs::read_to_string(&path).map_err(|e| ConfigError::io(&path, e))?;
        let mut config: Configuration =
            serde_json::from_str(&content).map_err(|e| ConfigError::parse(&path, e))?;
        config.download_path = canonicalize_download_path(&config.download_path);
        debug!(path = %path.display(), "Configuration loaded");
        Ok(Self { path, config })
    }

    /// Loads the file at `path`, or starts from defaults when it does not exist.
    ///
    /// # Errors
    ///
    /// Same as [`load`](Self::load) for an existing file.
    pub fn load_or_default(path: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let path = path.into();
        if path.exists() {
            return Self::load(path);
        }
        debug!(path = %path.display(), "No configuration file, using defaults");
        Ok(Self {
            path,
            config: Configuration::default(),
        })
    }

    /// Loads from [`resolve_default_config_path`], falling back to defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NoConfigDir`] when no config root can be found,
    /// otherwise the errors of [`load_or_default`](Self::load_or_default).
    pub fn load_default() -> Result<Self, ConfigError> {
        let path = resolve_default_config_path().ok_or(ConfigError::NoConfigDir)?;
        Self::load_or_default(path)
    }

    /// Writes the configuration, creating parent directories as needed.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] on filesystem failure and
    /// [`ConfigError::Serialize`] when the configuration cannot be encoded.
    pub fn save(&self) -> Result<(), ConfigError> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::io(parent, e))?;
        }
        let json = self.config.to_json()?;
        std::fs::write(&self.path, json).map_err(|e| ConfigError::io(&self.path, e))?;
        debug!(path = %self.path.display(), "Configuration saved");
        Ok(())
    }

    /// The config file location.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The loaded configuration.
    #[must_use]
    pub fn config(&self) -> &Configuration {
        &self.config
    }

    /// Mutable access for run-only changes; nothing is saved.
    pub fn config_mut(&mut self) -> &mut Configuration {
        &mut self.config
    }

    /// Stores a new access token and saves.
    ///
    /// # Errors
    ///
    /// See [`save`](Self::save).
    pub fn set_access_token(&mut self, token: impl Into<String>) -> Result<(), ConfigError> {
        debug!("Setting access_token");
        self.config.access_token = token.into();
        self.save()
    }

    /// Stores a new refresh token and saves.
    ///
    /// # Errors
    ///
    /// See [`save`](Self::save).
    pub fn set_refresh_token(&mut self, token: impl Into<String>) -> Result<(), ConfigError> {
        debug!("Setting refresh_token");
        self.config.refresh_token = token.into();
        self.save()
    }

    /// Stores a new client id and saves.
    ///
    /// # Errors
    ///
    /// See [`save`](Self::save).
    pub fn set_client_id(&mut self, client_id: impl Into<String>) -> Result<(), ConfigError> {
        debug!("Setting client_id");
        self.config.client_id = client_id.into();
        self.save()
    }

    /// Stores a new client secret and saves.
    ///
    /// # Errors
    ///
    /// See [`save`](Self::save).
    pub fn set_client_secret(
        &mut self,
        client_secret: impl Into<String>,
    ) -> Result<(), ConfigError> {
        debug!("Setting client_secret");
        self.config.client_secret = client_secret.into();
        self.save()
    }

    /// Changes the stored download root and saves.
    ///
    /// # Errors
    ///
    /// See [`save`](Self::save).
    pub fn set_default_download_path(&mut self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        self.config.set_download_path(path);
        self.save()
    }
}

impl DownloadSettings for ConfigStore {
    fn download_path(&self) -> &Path {
        self.config.download_path()
    }

    fn overwrite(&self) -> bool {
        self.config.overwrite()
    }
}
