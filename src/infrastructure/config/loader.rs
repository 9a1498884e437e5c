//! Configuration file loading.

use super::app_config::{APP_NAME, APP_ORGANIZATION, APP_QUALIFIER, AppConfig};
use directories::ProjectDirs;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, warn};

const CONFIG_FILE_NAME: &str = "config.toml";

/// Configuration loading errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// No platform config directory could be determined.
    #[error("failed to determine config directory")]
    ConfigDirNotFound,
    /// The configuration file could not be read.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    /// The configuration file is not valid TOML for this application.
    #[error("toml deserialization error: {0}")]
    TomlDe(#[from] toml::de::Error),
}

/// Where the loaded configuration came from.
#[derive(Debug)]
pub enum ConfigSource {
    /// Parsed from the file at this path.
    File(PathBuf),
    /// No file at this path; defaults were used.
    Missing(PathBuf),
    /// The file at this path could not be parsed; defaults were used.
    Malformed {
        /// Path of the rejected file.
        path: PathBuf,
        /// Parse failure.
        error: ConfigError,
    },
}

/// Configuration together with its source.
///
/// Loading happens before logging is initialized, so the outcome is kept
/// here and logged through [`LoadedConfig::report`] afterwards.
#[derive(Debug)]
pub struct LoadedConfig {
    /// Effective configuration.
    pub config: AppConfig,
    /// Origin of `config`.
    pub source: ConfigSource,
}

impl LoadedConfig {
    /// Returns whether defaults replaced a malformed file.
    #[must_use]
    pub const fn is_malformed(&self) -> bool {
        matches!(self.source, ConfigSource::Malformed { .. })
    }

    /// Logs how the configuration was obtained.
    pub fn report(&self) {
        match &self.source {
            ConfigSource::File(path) => info!(path = %path.display(), "Loaded config file"),
            ConfigSource::Missing(path) => {
                info!(path = %path.display(), "Config file not found, using defaults");
            }
            ConfigSource::Malformed { path, error } => {
                warn!(path = %path.display(), error = %error, "Failed to parse config file, using defaults");
            }
        }
    }
}

/// Read-only access to the configuration file.
pub struct ConfigLoader {
    config_dir: PathBuf,
}

impl ConfigLoader {
    /// Create a new `ConfigLoader` for the platform config directory.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the configuration directory cannot be determined.
    pub fn new() -> Result<Self, ConfigError> {
        let config_dir = ProjectDirs::from(APP_QUALIFIER, APP_ORGANIZATION, APP_NAME)
            .map(|dirs| dirs.config_dir().to_path_buf())
            .ok_or(ConfigError::ConfigDirNotFound)?;

        Ok(Self { config_dir })
    }

    /// Creates a new `ConfigLoader` with a specific directory (useful for testing).
    #[must_use]
    pub fn with_dir(path: PathBuf) -> Self {
        Self { config_dir: path }
    }

    /// Returns the configuration directory path.
    #[must_use]
    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    /// Loads the application configuration.
    ///
    /// A missing file yields defaults; a malformed file is replaced by
    /// defaults and recorded in the returned [`ConfigSource`].
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if an existing file cannot be read.
    pub fn load(&self, path_override: Option<&Path>) -> Result<LoadedConfig, ConfigError> {
        let config_path = path_override.map_or_else(
            || self.config_dir.join(CONFIG_FILE_NAME),
            Path::to_path_buf,
        );

        if !config_path.exists() {
            return Ok(LoadedConfig {
                config: AppConfig::default(),
                source: ConfigSource::Missing(config_path),
            });
        }

        let content = fs::read_to_string(&config_path)?;
        let loaded = match Self::parse(&content) {
            Ok(config) => LoadedConfig {
                config,
                source: ConfigSource::File(config_path),
            },
            Err(error) => LoadedConfig {
                config: AppConfig::default(),
                source: ConfigSource::Malformed {
                    path: config_path,
                    error,
                },
            },
        };
        Ok(loaded)
    }

    /// Parses configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::TomlDe` if the text is not a valid configuration.
    pub fn parse(content: &str) -> Result<AppConfig, ConfigError> {
        Ok(toml::from_str(content)?)
    }
}
