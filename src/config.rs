//! Configuration loading from TOML with environment variable resolution.
//!
//! Reads `config.toml` and deserializes into strongly-typed structs.
//! Vendor API keys are referenced by env-var name in the config and
//! resolved at runtime into `SecretString`s.

use anyhow::{Context, Result};
use chrono::Duration as ChronoDuration;
use secrecy::SecretString;
use serde::Deserialize;
use std::fs;
use std::time::Duration;

use crate::odds::AggregatorConfig;
use crate::types::OddsError;

/// Env var overriding the config file path.
pub const CONFIG_PATH_ENV: &str = "ODDSROOM_CONFIG";
pub const DEFAULT_CONFIG_PATH: &str = "config.toml";

/// Longest accepted cache TTL: 30 days.
pub const MAX_CACHE_TTL_SECS: i64 = 30 * 24 * 60 * 60;

/// Top-level application configuration.
#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    #[serde(default)]
    pub aggregator: AggregatorConfig,
    pub feeds: FeedsConfig,
    #[serde(default)]
    pub cache: CacheConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub name: String,
    #[serde(default = "default_host")]
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct FeedsConfig {
    pub the_odds_api_key_env: String,
    pub api_football_key_env: String,
    #[serde(default = "default_region")]
    pub default_region: String,
    pub season: u16,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct CacheConfig {
    pub enabled: bool,
    pub ttl_secs: i64,
    pub capacity: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            ttl_secs: 300,
            capacity: 256,
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_region() -> String {
    "br".to_string()
}

fn default_timeout_secs() -> u64 {
    15
}

impl FeedsConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl CacheConfig {
    /// TTL as a duration, clamped to `0..=MAX_CACHE_TTL_SECS`.
    pub fn ttl(&self) -> ChronoDuration {
        ChronoDuration::seconds(self.ttl_secs.clamp(0, MAX_CACHE_TTL_SECS))
    }
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &str) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {path}"))?;
        Self::parse(&contents).with_context(|| format!("Failed to parse config file: {path}"))
    }

    /// Parse and validate configuration text.
    pub fn parse(contents: &str) -> Result<Self> {
        let config: AppConfig = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), OddsError> {
        let agg = &self.aggregator;
        if !agg.value_threshold.is_finite() || agg.value_threshold < 0.0 {
            return Err(OddsError::Config(format!(
                "aggregator.value_threshold must be a non-negative number, got {}",
                agg.value_threshold
            )));
        }
        if !agg.min_price.is_finite() || agg.min_price < 1.0 {
            return Err(OddsError::Config(format!(
                "aggregator.min_price must be at least 1.0, got {}",
                agg.min_price
            )));
        }
        if self.cache.enabled && (self.cache.capacity == 0 || self.cache.ttl_secs <= 0) {
            return Err(OddsError::Config(
                "cache.capacity and cache.ttl_secs must be positive when the cache is enabled"
                    .to_string(),
            ));
        }
        if self.cache.ttl_secs > MAX_CACHE_TTL_SECS {
            return Err(OddsError::Config(format!(
                "cache.ttl_secs must be at most {MAX_CACHE_TTL_SECS}, got {}",
                self.cache.ttl_secs
            )));
        }
        Ok(())
    }

    /// Config path from `ODDSROOM_CONFIG`, falling back to `config.toml`.
    pub fn path_from_env() -> String {
        std::env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string())
    }

    /// Resolve an environment variable name to its value.
    pub fn resolve_env(env_name: &str) -> Result<String> {
        std::env::var(env_name)
            .with_context(|| format!("Environment variable not set: {env_name}"))
    }

    /// Resolve a secret referenced by env-var name. Unset or blank
    /// variables yield `None`.
    pub fn resolve_secret(env_name: &str) -> Option<SecretString> {
        Self::resolve_env(env_name)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .map(SecretString::new)
    }
}
