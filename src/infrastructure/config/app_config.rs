//! Application configuration.

use std::path::PathBuf;
use std::time::Duration;

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use super::args::CliArgs;
use crate::domain::entities::ApiKey;
use crate::infrastructure::steam::DEFAULT_USER_AGENT;

pub(crate) const APP_NAME: &str = "steamlens";
pub(crate) const APP_QUALIFIER: &str = "com";
pub(crate) const APP_ORGANIZATION: &str = "linuxmobile";

/// Log level configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Trace level.
    Trace,
    /// Debug level.
    Debug,
    /// Info level.
    #[default]
    Info,
    /// Warning level.
    Warn,
    /// Error level.
    Error,
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Trace => write!(f, "trace"),
            Self::Debug => write!(f, "debug"),
            Self::Info => write!(f, "info"),
            Self::Warn => write!(f, "warn"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// Application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Log file path.
    #[serde(default)]
    pub log_path: Option<PathBuf>,

    /// Log verbosity level.
    #[serde(default)]
    pub log_level: LogLevel,

    /// Steam Web API key. Vanity names are scraped when absent.
    #[serde(default)]
    pub api_key: Option<String>,

    /// Steam market currency code.
    #[serde(default = "default_currency")]
    pub currency: u32,

    /// Language passed to the loyalty rewards service.
    #[serde(default = "default_language")]
    pub language: String,

    /// Cache lifetimes.
    #[serde(default)]
    pub cache: CacheConfig,

    /// Outbound HTTP settings.
    #[serde(default)]
    pub http: HttpConfig,
}

/// Cache lifetimes, in seconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Lifetime of a found profile background.
    pub background_ttl_secs: u64,
    /// Lifetime of a "no background" result.
    pub no_background_ttl_secs: u64,
    /// Lifetime of a resolved identity.
    pub identity_ttl_secs: u64,
    /// Lifetime of a resolved game name.
    pub game_name_ttl_secs: u64,
    /// Lifetime of an "unknown app" result.
    pub missing_game_ttl_secs: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            background_ttl_secs: 7 * 60,
            no_background_ttl_secs: 60,
            identity_ttl_secs: 32 * 60,
            game_name_ttl_secs: 32 * 60,
            missing_game_ttl_secs: 7 * 60,
        }
    }
}

impl CacheConfig {
    /// Lifetime of a found profile background.
    #[must_use]
    pub const fn background_ttl(&self) -> Duration {
        Duration::from_secs(self.background_ttl_secs)
    }

    /// Lifetime of a "no background" result.
    #[must_use]
    pub const fn no_background_ttl(&self) -> Duration {
        Duration::from_secs(self.no_background_ttl_secs)
    }

    /// Lifetime of a resolved identity.
    #[must_use]
    pub const fn identity_ttl(&self) -> Duration {
        Duration::from_secs(self.identity_ttl_secs)
    }

    /// Lifetime of a resolved game name.
    #[must_use]
    pub const fn game_name_ttl(&self) -> Duration {
        Duration::from_secs(self.game_name_ttl_secs)
    }

    /// Lifetime of an "unknown app" result.
    #[must_use]
    pub const fn missing_game_ttl(&self) -> Duration {
        Duration::from_secs(self.missing_game_ttl_secs)
    }
}

/// Outbound HTTP settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Overall timeout applied by the transport to every request.
    pub timeout_secs: u64,
    /// Timeout of each market listing and price request.
    pub market_timeout_secs: u64,
    /// Maximum market enrichment tasks in flight.
    pub max_concurrency: usize,
    /// User agent sent with every request.
    pub user_agent: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 30,
            market_timeout_secs: 10,
            max_concurrency: 8,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl HttpConfig {
    /// Overall transport timeout.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Per-call market timeout.
    #[must_use]
    pub const fn market_timeout(&self) -> Duration {
        Duration::from_secs(self.market_timeout_secs)
    }
}

fn default_currency() -> u32 {
    1
}

fn default_language() -> String {
    "english".to_string()
}

impl AppConfig {
    /// Merges CLI arguments into the configuration.
    pub fn merge_with_args(&mut self, args: &CliArgs) {
        if let Some(log_path) = &args.log_path {
            self.log_path = Some(log_path.clone());
        }
        if let Some(log_level) = args.log_level {
            self.log_level = log_level;
        }
        if let Some(api_key) = &args.api_key {
            self.api_key = Some(api_key.clone());
        }
        if let Some(currency) = args.currency {
            self.currency = currency;
        }
        if let Some(language) = &args.language {
            self.language.clone_from(language);
        }
        if let Some(max_concurrency) = args.max_concurrency {
            self.http.max_concurrency = max_concurrency;
        }
    }

    /// Returns the configured API key, if non-blank.
    #[must_use]
    pub fn api_key(&self) -> Option<ApiKey> {
        self.api_key.as_deref().and_then(ApiKey::new)
    }

    /// Returns default config directory.
    #[must_use]
    pub fn default_config_dir() -> Option<PathBuf> {
        ProjectDirs::from(APP_QUALIFIER, APP_ORGANIZATION, APP_NAME)
            .map(|dirs| dirs.config_dir().to_path_buf())
    }

    /// Returns default config file path.
    #[must_use]
    pub fn default_config_path() -> Option<PathBuf> {
        Self::default_config_dir().map(|dir| dir.join("config.toml"))
    }

    /// Returns default log file path.
    #[must_use]
    pub fn default_log_path() -> Option<PathBuf> {
        ProjectDirs::from(APP_QUALIFIER, APP_ORGANIZATION, APP_NAME)
            .map(|dirs| dirs.data_dir().join("steamlens.log"))
    }

    /// Returns effective log path.
    #[must_use]
    pub fn effective_log_path(&self) -> Option<PathBuf> {
        self.log_path.clone().or_else(Self::default_log_path)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            log_path: None,
            log_level: LogLevel::Info,
            api_key: None,
            currency: default_currency(),
            language: default_language(),
            cache: CacheConfig::default(),
            http: HttpConfig::default(),
        }
    }
}
