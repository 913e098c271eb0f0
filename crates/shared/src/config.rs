//! Configuration management for the book finder.
//!
//! This module handles loading and parsing configuration from TOML files,
//! with sensible defaults for all settings. Credentials may also come from
//! the environment so they never have to be written to disk.

use crate::error::{FinderError, FinderResult};
use crate::models::{default_languages, LanguageOption};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Environment variable that overrides `api.api_key`
pub const API_KEY_ENV: &str = "BOOK_FINDER_API_KEY";

/// Environment variable that overrides `retail.affiliate_tag`
pub const AFFILIATE_TAG_ENV: &str = "BOOK_FINDER_AFFILIATE_TAG";

/// Largest page the volumes endpoint will serve
pub const MAX_PAGE_SIZE: u32 = 40;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Search API settings
    pub api: ApiConfig,

    /// Retail link settings
    pub retail: RetailConfig,

    /// Paginated search settings
    pub search: SearchConfig,

    /// Category discovery settings
    #[serde(default)]
    pub discovery: DiscoveryConfig,

    /// Logging settings
    pub logging: LoggingConfig,
}

/// Search API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Volumes endpoint URL
    pub base_url: String,

    /// API access key (overridden by BOOK_FINDER_API_KEY)
    #[serde(default)]
    pub api_key: String,

    /// HTTP timeout in seconds
    pub timeout_secs: u64,
}

/// Retail link configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetailConfig {
    /// Retail search URL
    pub base_url: String,

    /// Affiliate tag appended to every link (overridden by BOOK_FINDER_AFFILIATE_TAG)
    #[serde(default)]
    pub affiliate_tag: String,
}

/// Paginated search configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Items requested per page (1..=40)
    pub page_size: u32,

    /// Query term used when no category is selected
    pub fallback_term: String,

    /// Language selected at startup
    pub default_language: String,

    /// Languages offered by the selector
    #[serde(default = "default_languages")]
    pub languages: Vec<LanguageOption>,
}

/// Category discovery configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiscoveryConfig {
    /// Enable discovery at startup
    pub enabled: bool,

    /// Broad query term for the sample request
    pub term: String,

    /// Number of sample items requested
    pub sample_size: u32,

    /// Keep only the top N discovered categories (None = keep all)
    pub max_categories: Option<usize>,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log directory path
    pub log_dir: String,

    /// Default log level (trace, debug, info, warn, error)
    pub default_level: String,

    /// Enable console output
    pub console: bool,

    /// Enable file output
    pub file: bool,

    /// Enable JSON formatting for file logs
    pub json_format: bool,
}

/// Validated credentials, resolved once at startup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub api_key: String,
    pub affiliate_tag: String,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            term: "libros".to_string(),
            sample_size: MAX_PAGE_SIZE,
            max_categories: None,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api: ApiConfig {
                base_url: "https://www.googleapis.com/books/v1/volumes".to_string(),
                api_key: String::new(),
                timeout_secs: 30,
            },
            retail: RetailConfig {
                base_url: "https://www.amazon.com/s".to_string(),
                affiliate_tag: String::new(),
            },
            search: SearchConfig {
                page_size: MAX_PAGE_SIZE,
                fallback_term: "books".to_string(),
                default_language: "es".to_string(),
                languages: default_languages(),
            },
            discovery: DiscoveryConfig::default(),
            logging: LoggingConfig {
                log_dir: "logs".to_string(),
                default_level: "info".to_string(),
                console: true,
                file: false,
                json_format: false,
            },
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    ///
    /// If the file doesn't exist, returns the default configuration.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            tracing::warn!(
                path = %path.display(),
                "Config file not found, using defaults"
            );
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        config
            .validate()
            .with_context(|| format!("Invalid config file: {}", path.display()))?;

        tracing::info!(
            path = %path.display(),
            "Configuration loaded successfully"
        );

        Ok(config)
    }

    /// Save configuration to a TOML file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();

        let content = toml::to_string_pretty(self)
            .context("Failed to serialize configuration")?;

        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        tracing::info!(
            path = %path.display(),
            "Configuration saved successfully"
        );

        Ok(())
    }

    /// Check value ranges that serde cannot express
    pub fn validate(&self) -> FinderResult<()> {
        if self.search.page_size == 0 || self.search.page_size > MAX_PAGE_SIZE {
            return Err(FinderError::configuration(format!(
                "search.page_size must be between 1 and {}, got {}",
                MAX_PAGE_SIZE, self.search.page_size
            )));
        }
        if self.discovery.sample_size == 0 || self.discovery.sample_size > MAX_PAGE_SIZE {
            return Err(FinderError::configuration(format!(
                "discovery.sample_size must be between 1 and {}, got {}",
                MAX_PAGE_SIZE, self.discovery.sample_size
            )));
        }
        if self.search.default_language.trim().is_empty() {
            return Err(FinderError::configuration("search.default_language is empty"));
        }
        Ok(())
    }

    /// Resolve credentials from the process environment, falling back to the file
    pub fn credentials(&self) -> FinderResult<Credentials> {
        self.credentials_with(|name| std::env::var(name).ok())
    }

    /// Resolve credentials with an explicit environment lookup
    pub fn credentials_with<F>(&self, lookup: F) -> FinderResult<Credentials>
    where
        F: Fn(&str) -> Option<String>,
    {
        let resolve = |env_name: &str, configured: &str, setting: &str| {
            lookup(env_name)
                .filter(|value| !value.trim().is_empty())
                .or_else(|| Some(configured.to_string()).filter(|v| !v.trim().is_empty()))
                .ok_or_else(|| {
                    FinderError::configuration(format!(
                        "{} is not set (use {} or the config file)",
                        setting, env_name
                    ))
                })
        };

        Ok(Credentials {
            api_key: resolve(API_KEY_ENV, &self.api.api_key, "api.api_key")?,
            affiliate_tag: resolve(AFFILIATE_TAG_ENV, &self.retail.affiliate_tag, "retail.affiliate_tag")?,
        })
    }
}
