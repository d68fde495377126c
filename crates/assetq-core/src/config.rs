//! Configuration management for assetq.
//!
//! Provides TOML-based configuration with XDG-compliant paths and
//! environment variable overrides for API keys.

use crate::error::{ConfigError, ConfigResult};
use crate::types::Provider;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

const TEMPLATE_HEADER: &str = "# assetq configuration\n# Fill in one API key per provider you intend to query.\n\n";

/// Main application configuration.
///
/// This is loaded from `~/.config/assetq/config.toml` (or platform equivalent).
/// If the file doesn't exist, default values are used.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// FOFA credentials
    pub fofa: KeyConfig,
    /// Hunter credentials
    pub hunter: KeyConfig,
    /// Quake credentials
    pub quake: KeyConfig,
    /// Request pacing and retry settings
    pub pacing: PacingConfig,
    /// HTTP client settings
    pub http: HttpConfig,
}

impl AppConfig {
    /// Load configuration from disk, falling back to defaults if not found.
    ///
    /// # Errors
    /// Returns error if:
    /// - Config directory cannot be determined
    /// - File exists but cannot be read
    /// - File contents are not valid TOML
    pub fn load() -> ConfigResult<Self> {
        Self::load_from(&Self::config_path()?)
    }

    /// Load configuration from an explicit path, falling back to defaults if
    /// the file does not exist.
    pub fn load_from(path: &Path) -> ConfigResult<Self> {
        if path.exists() {
            tracing::debug!("Loading config from {}", path.display());
            let contents = fs::read_to_string(path)?;
            let config = toml::from_str(&contents)?;
            Ok(config)
        } else {
            tracing::debug!("Config file not found at {}, using defaults", path.display());
            Ok(Self::default())
        }
    }

    /// Load configuration with environment variable overrides.
    ///
    /// Supports the following environment variables:
    /// - `ASSETQ_FOFA_KEY`: Override the FOFA API key
    /// - `ASSETQ_HUNTER_KEY`: Override the Hunter API key
    /// - `ASSETQ_QUAKE_KEY`: Override the Quake API key
    pub fn load_with_env() -> ConfigResult<Self> {
        let mut config = Self::load()?;
        config.apply_overrides(|name| std::env::var(name).ok());
        Ok(config)
    }

    /// Apply key overrides from a variable lookup (the process environment in
    /// production).
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        for provider in Provider::ALL {
            let name = format!("ASSETQ_{}_KEY", provider.as_str().to_ascii_uppercase());
            if let Some(key) = lookup(&name).filter(|key| !key.trim().is_empty()) {
                tracing::debug!("Override {}.key from env", provider);
                self.key_config_mut(provider).key = key;
            }
        }
    }

    /// Write a default config file if none exists yet and return its path.
    ///
    /// Creates the config directory if it doesn't exist.
    pub fn ensure_default() -> ConfigResult<PathBuf> {
        let config_path = Self::config_path()?;
        Self::ensure_default_at(&config_path)?;
        Ok(config_path)
    }

    /// Write a default config file at `path` unless one already exists.
    ///
    /// Returns `true` when a new file was written.
    pub fn ensure_default_at(path: &Path) -> ConfigResult<bool> {
        if path.exists() {
            return Ok(false);
        }
        Self::default().save_to(path)?;
        Ok(true)
    }

    /// Save configuration to an explicit path.
    pub fn save_to(&self, path: &Path) -> ConfigResult<()> {
        let config_dir = path.parent().ok_or_else(|| ConfigError::InvalidValue {
            field: "config_path".to_string(),
            reason: "no parent directory".to_string(),
        })?;

        fs::create_dir_all(config_dir)?;
        tracing::debug!("Saving config to {}", path.display());

        let contents = format!("{TEMPLATE_HEADER}{}", toml::to_string_pretty(self)?);
        fs::write(path, contents)?;
        Ok(())
    }

    /// Get the path to the configuration file.
    ///
    /// Uses XDG base directories: `~/.config/assetq/config.toml`
    pub fn config_path() -> ConfigResult<PathBuf> {
        let dirs = ProjectDirs::from("com", "assetq", "assetq").ok_or(ConfigError::NoConfigDir)?;
        Ok(dirs.config_dir().join("config.toml"))
    }

    /// Credentials section for a provider.
    #[must_use]
    pub fn key_config(&self, provider: Provider) -> &KeyConfig {
        match provider {
            Provider::Fofa => &self.fofa,
            Provider::Hunter => &self.hunter,
            Provider::Quake => &self.quake,
        }
    }

    fn key_config_mut(&mut self, provider: Provider) -> &mut KeyConfig {
        match provider {
            Provider::Fofa => &mut self.fofa,
            Provider::Hunter => &mut self.hunter,
            Provider::Quake => &mut self.quake,
        }
    }

    /// API key for a provider.
    ///
    /// # Errors
    /// Returns [`ConfigError::MissingApiKey`] when the key is empty; callers
    /// treat this as fatal before any request is made.
    pub fn api_key(&self, provider: Provider) -> ConfigResult<&str> {
        let key = self.key_config(provider).key.trim();
        if key.is_empty() {
            let path = Self::config_path()
                .map_or_else(|_| "config.toml".to_string(), |p| p.display().to_string());
            return Err(ConfigError::MissingApiKey { provider, path });
        }
        Ok(key)
    }
}

/// Per-provider credentials.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyConfig {
    /// API key
    pub key: String,
}

/// Request pacing and retry settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PacingConfig {
    /// Delay before every FOFA request in milliseconds
    pub fofa_delay_ms: u64,
    /// Delay before every Hunter request in milliseconds
    pub hunter_delay_ms: u64,
    /// Delay before every Quake request in milliseconds
    pub quake_delay_ms: u64,
    /// Attempts per page, including the first
    pub retry_attempts: u32,
    /// Delay between attempts in milliseconds
    pub retry_delay_ms: u64,
    /// Delay between queries of a batch in milliseconds
    pub query_delay_ms: u64,
    /// Extra delay after a failed query in milliseconds
    pub failure_delay_ms: u64,
    /// Delay before retrying a failed CSV write in milliseconds
    pub sink_retry_delay_ms: u64,
}

impl PacingConfig {
    /// Minimum delay before each request to a provider.
    #[must_use]
    pub fn request_delay(&self, provider: Provider) -> Duration {
        let ms = match provider {
            Provider::Fofa => self.fofa_delay_ms,
            Provider::Hunter => self.hunter_delay_ms,
            Provider::Quake => self.quake_delay_ms,
        };
        Duration::from_millis(ms)
    }
}

impl Default for PacingConfig {
    fn default() -> Self {
        Self {
            fofa_delay_ms: 1000,
            hunter_delay_ms: 2000,
            quake_delay_ms: 3000,
            retry_attempts: 3,
            retry_delay_ms: 2000,
            query_delay_ms: 3000,
            failure_delay_ms: 2000,
            sink_retry_delay_ms: 1000,
        }
    }
}

/// HTTP client settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// User agent string
    pub user_agent: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 30,
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36"
                .to_string(),
        }
    }
}
