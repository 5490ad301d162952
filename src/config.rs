use anyhow::{Context, Result};
use chrono::FixedOffset;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::rewards::achievements::ProgressPolicy;
use crate::rewards::locale::Locale;
use crate::rewards::RewardSettings;

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct HollowConfig {
    pub server: ServerConfig,
    pub storage: StorageConfig,
    pub rewards: RewardsConfig,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub log_level: String,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct StorageConfig {
    pub db_path: String,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct RewardsConfig {
    /// `zh`, `en` or `ja`; anything else resolves to `zh`.
    pub default_locale: String,
    /// Offset of the calendar used for check-in days, in minutes east of UTC.
    pub utc_offset_minutes: i32,
    pub progress_policy: ProgressPolicy,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".into(),
            port: 8787,
            log_level: "info".into(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        let db_path = default_hollow_dir()
            .join("rewards.db")
            .to_string_lossy()
            .into_owned();
        Self { db_path }
    }
}

impl Default for RewardsConfig {
    fn default() -> Self {
        Self {
            default_locale: Locale::default().as_str().into(),
            utc_offset_minutes: 0,
            progress_policy: ProgressPolicy::default(),
        }
    }
}

impl RewardsConfig {
    /// Resolve into engine settings, rejecting offsets beyond ±24h.
    pub fn settings(&self) -> Result<RewardSettings> {
        let utc_offset = self
            .utc_offset_minutes
            .checked_mul(60)
            .and_then(FixedOffset::east_opt)
            .with_context(|| {
                format!("utc_offset_minutes out of range: {}", self.utc_offset_minutes)
            })?;
        Ok(RewardSettings {
            default_locale: Locale::from_code(&self.default_locale),
            utc_offset,
            progress_policy: self.progress_policy,
        })
    }
}

/// Returns `~/.hollow/`, or `./.hollow/` when no home directory is known.
pub fn default_hollow_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".hollow")
}

/// Returns the default config file path: `~/.hollow/config.toml`
pub fn default_config_path() -> PathBuf {
    default_hollow_dir().join("config.toml")
}

impl HollowConfig {
    /// Load config from TOML file (if it exists) then apply env var overrides.
    pub fn load() -> Result<Self> {
        Self::load_from(default_config_path())
    }

    /// Load from a specific path, then apply env var overrides.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let mut config = if path.exists() {
            let contents =
                std::fs::read_to_string(path).context("failed to read config file")?;
            toml::from_str(&contents).context("failed to parse config TOML")?
        } else {
            info!("no config file at {}, using defaults", path.display());
            HollowConfig::default()
        };

        config.apply_env_overrides()?;
        Ok(config)
    }

    /// Apply environment variable overrides (HOLLOW_DB, HOLLOW_LOG_LEVEL, HOLLOW_LOCALE, HOLLOW_PORT).
    fn apply_env_overrides(&mut self) -> Result<()> {
        if let Ok(val) = std::env::var("HOLLOW_DB") {
            self.storage.db_path = val;
        }
        if let Ok(val) = std::env::var("HOLLOW_LOG_LEVEL") {
            self.server.log_level = val;
        }
        if let Ok(val) = std::env::var("HOLLOW_LOCALE") {
            self.rewards.default_locale = val;
        }
        if let Ok(val) = std::env::var("HOLLOW_PORT") {
            self.server.port = val
                .parse()
                .with_context(|| format!("HOLLOW_PORT is not a port number: {val}"))?;
        }
        Ok(())
    }

    /// Resolve the database path, expanding `~` if needed.
    pub fn resolved_db_path(&self) -> PathBuf {
        expand_tilde(&self.storage.db_path)
    }
}

pub fn expand_tilde(path: &str) -> PathBuf {
    match (path.strip_prefix("~/"), dirs::home_dir()) {
        (Some(rest), Some(home)) => home.join(rest),
        _ => PathBuf::from(path),
    }
}
