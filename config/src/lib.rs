//! # Configuration Management for jsoncache
//!
//! This crate provides the configuration structures consumed by the cache adapter.
//!
//! ## Quick Start
//!
//! ### Programmatic Configuration
//! ```rust
//! use config::CacheConfig;
//!
//! let cache_config = CacheConfig::new(
//!     true,
//!     "localhost".to_string(),
//!     "6379".to_string(),
//!     String::new(),
//!     0,
//!     300,
//! );
//! assert_eq!(cache_config.address(), "localhost:6379");
//! ```
//!
//! ### TOML File Configuration
//! ```toml
//! [cache]
//! enabled = true
//! host = "localhost"
//! port = "6379"
//! password = ""
//! db = 0
//! default_ttl_seconds = 300
//! probe_timeout_ms = 2000
//! ```
//!
//! Load configuration:
//! ```rust,no_run
//! use config::AppConfig;
//!
//! // Load from jsoncache.toml, then apply REDIS_* / CACHE_* overrides
//! let config = AppConfig::load()?;
//!
//! // Or load from custom path
//! let config = AppConfig::from_file("config/production.toml")?;
//! # Ok::<(), config::ConfigError>(())
//! ```

use serde::{Deserialize, Serialize};
use std::{env, path::Path, time::Duration};
use thiserror::Error;

const DEFAULT_CONFIG_PATH: &str = "./jsoncache.toml";

/// Upper bound for the connect + ping check done when a cache is built.
pub const DEFAULT_PROBE_TIMEOUT_MS: u64 = 2000;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Environment variable error: {0}")]
    Env(#[from] env::VarError),
    #[error("Dotenvy error: {0}")]
    Dotenvy(#[from] dotenvy::Error),
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Complete application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub cache: CacheConfig,
}

/// Cache configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    pub enabled: bool,
    pub host: String,
    /// Kept as text; it is joined with the host to form the address.
    pub port: String,
    /// Empty means no AUTH.
    pub password: String,
    pub db: i64,
    pub default_ttl_seconds: u64,
    pub probe_timeout_ms: u64,
}

impl AppConfig {
    /// Load configuration from the TOML file named in .env, or the default path,
    /// then apply environment overrides.
    pub fn load() -> Result<Self, ConfigError> {
        match dotenvy::dotenv() {
            Ok(_) => {}
            Err(e) if e.not_found() => {}
            Err(e) => return Err(e.into()),
        }

        let mut config = if let Ok(config_path) = env::var("JSONCACHE_CONFIG") {
            Self::read_file(&config_path)?
        } else if Path::new(DEFAULT_CONFIG_PATH).exists() {
            Self::read_file(DEFAULT_CONFIG_PATH)?
        } else {
            // Environment alone is enough to describe a cache
            Self::default()
        };

        config.cache.apply_env_overrides()?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let config = Self::read_file(path)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    fn read_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Validate configuration values
    fn validate(&self) -> Result<(), ConfigError> {
        self.cache.validate()
    }
}

impl CacheConfig {
    /// Create a new cache configuration
    pub fn new(
        enabled: bool,
        host: String,
        port: String,
        password: String,
        db: i64,
        default_ttl_seconds: u64,
    ) -> Self {
        Self {
            enabled,
            host,
            port,
            password,
            db,
            default_ttl_seconds,
            probe_timeout_ms: DEFAULT_PROBE_TIMEOUT_MS,
        }
    }

    /// Configuration that never touches the network
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Self::default()
        }
    }

    pub fn with_probe_timeout(mut self, timeout_ms: u64) -> Self {
        self.probe_timeout_ms = timeout_ms;
        self
    }

    pub fn with_default_ttl(mut self, ttl_seconds: u64) -> Self {
        self.default_ttl_seconds = ttl_seconds;
        self
    }

    /// `host:port` as handed to the store client
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Numeric port, if the configured text is a valid non-zero port
    pub fn port_number(&self) -> Option<u16> {
        self.port.trim().parse::<u16>().ok().filter(|p| *p != 0)
    }

    /// Password to send on connect, `None` when empty
    pub fn password(&self) -> Option<&str> {
        if self.password.is_empty() {
            None
        } else {
            Some(self.password.as_str())
        }
    }

    /// Get default TTL as Duration
    pub fn default_ttl(&self) -> Duration {
        Duration::from_secs(self.default_ttl_seconds)
    }

    /// Get probe timeout as Duration
    pub fn probe_timeout(&self) -> Duration {
        Duration::from_millis(self.probe_timeout_ms)
    }

    /// Override fields from `CACHE_ENABLED`, `REDIS_HOST`, `REDIS_PORT`,
    /// `REDIS_PASSWORD`, `REDIS_DB` and `CACHE_DEFAULT_TTL_SECONDS`.
    pub fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        self.apply_overrides(|name| env::var(name).ok())
    }

    fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(value) = lookup("CACHE_ENABLED") {
            self.enabled = parse_bool(&value).ok_or_else(|| {
                ConfigError::Invalid(format!("CACHE_ENABLED must be a boolean, got '{}'", value))
            })?;
        }
        if let Some(value) = lookup("REDIS_HOST") {
            self.host = value;
        }
        if let Some(value) = lookup("REDIS_PORT") {
            self.port = value;
        }
        if let Some(value) = lookup("REDIS_PASSWORD") {
            self.password = value;
        }
        if let Some(value) = lookup("REDIS_DB") {
            self.db = value.trim().parse().map_err(|_| {
                ConfigError::Invalid(format!("REDIS_DB must be an integer, got '{}'", value))
            })?;
        }
        if let Some(value) = lookup("CACHE_DEFAULT_TTL_SECONDS") {
            self.default_ttl_seconds = value.trim().parse().map_err(|_| {
                ConfigError::Invalid(format!(
                    "CACHE_DEFAULT_TTL_SECONDS must be a whole number of seconds, got '{}'",
                    value
                ))
            })?;
        }
        Ok(())
    }

    /// Validate configuration values. A disabled cache is always valid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.enabled {
            return Ok(());
        }

        if self.host.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "Cache host cannot be empty".to_string(),
            ));
        }
        if self.port_number().is_none() {
            return Err(ConfigError::Invalid(format!(
                "Cache port must be a number between 1 and 65535, got '{}'",
                self.port
            )));
        }
        if self.db < 0 {
            return Err(ConfigError::Invalid(
                "Cache db index cannot be negative".to_string(),
            ));
        }
        if self.probe_timeout_ms == 0 {
            return Err(ConfigError::Invalid(
                "Cache probe_timeout_ms must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            host: "localhost".to_string(),
            port: "6379".to_string(),
            password: String::new(),
            db: 0,
            default_ttl_seconds: 300, // 5 minutes
            probe_timeout_ms: DEFAULT_PROBE_TIMEOUT_MS,
        }
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_address_joins_host_and_port() {
        let config = CacheConfig::new(
            true,
            "cache.internal".to_string(),
            "6380".to_string(),
            String::new(),
            2,
            60,
        );

        assert_eq!(config.address(), "cache.internal:6380");
        assert_eq!(config.port_number(), Some(6380));
        assert_eq!(config.password(), None);
        assert_eq!(config.default_ttl(), Duration::from_secs(60));
        assert_eq!(config.probe_timeout(), Duration::from_secs(2));
    }

    #[test]
    fn test_validate_rejects_bad_port_only_when_enabled() {
        let mut config = CacheConfig::default();
        config.port = "redis".to_string();
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        config.enabled = false;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_empty_host_and_negative_db() {
        let mut config = CacheConfig::default();
        config.host = "  ".to_string();
        assert!(config.validate().is_err());

        let mut config = CacheConfig::default();
        config.db = -1;
        assert!(config.validate().is_err());

        let config = CacheConfig::default().with_probe_timeout(0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config = AppConfig::from_toml_str(
            r#"
            [cache]
            host = "10.0.0.5"
            password = "s3cret"
            "#,
        )
        .unwrap();

        assert!(config.cache.enabled);
        assert_eq!(config.cache.address(), "10.0.0.5:6379");
        assert_eq!(config.cache.password(), Some("s3cret"));
        assert_eq!(config.cache.probe_timeout_ms, DEFAULT_PROBE_TIMEOUT_MS);
    }

    #[test]
    fn test_empty_toml_is_default() {
        let config = AppConfig::from_toml_str("").unwrap();
        assert_eq!(config.cache.host, "localhost");
        assert_eq!(config.cache.default_ttl_seconds, 300);
    }

    #[test]
    fn test_overrides_replace_file_values() {
        let vars: HashMap<&str, &str> = [
            ("CACHE_ENABLED", "false"),
            ("REDIS_HOST", "redis"),
            ("REDIS_PORT", "6390"),
            ("REDIS_DB", "4"),
            ("CACHE_DEFAULT_TTL_SECONDS", "30"),
        ]
        .into_iter()
        .collect();

        let mut config = CacheConfig::default();
        config
            .apply_overrides(|name| vars.get(name).map(|v| v.to_string()))
            .unwrap();

        assert!(!config.enabled);
        assert_eq!(config.address(), "redis:6390");
        assert_eq!(config.db, 4);
        assert_eq!(config.default_ttl_seconds, 30);
    }

    #[test]
    fn test_overrides_reject_garbage() {
        let mut config = CacheConfig::default();
        let result = config.apply_overrides(|name| {
            (name == "CACHE_ENABLED").then(|| "maybe".to_string())
        });
        assert!(matches!(result, Err(ConfigError::Invalid(_))));

        let result = config.apply_overrides(|name| (name == "REDIS_DB").then(|| "x".to_string()));
        assert!(matches!(result, Err(ConfigError::Invalid(_))));
    }
}
