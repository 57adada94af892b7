//! Runtime configuration.
//!
//! Settings live in an optional YAML file; every field has a default so an
//! empty or missing file is valid. Secrets (the model API key) are taken from
//! the command line or environment only, see [`crate::cli::Cli`].
//!
//! ```yaml
//! site:
//!   base_url: https://saudigazette.com.sa/
//!   domain: saudigazette.com
//! cache_ttl_minutes: 60
//! summary:
//!   model: gpt-4
//!   temperature: 0.7
//! ```

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{info, instrument};

/// Top-level configuration for the crawler and summarizer.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct DigestConfig {
    pub site: SiteConfig,
    /// How long a successful listing stays fresh.
    pub cache_ttl_minutes: u64,
    pub translation: TranslationConfig,
    pub summary: SummaryConfig,
}

impl Default for DigestConfig {
    fn default() -> Self {
        Self {
            site: SiteConfig::default(),
            cache_ttl_minutes: 60,
            translation: TranslationConfig::default(),
            summary: SummaryConfig::default(),
        }
    }
}

impl DigestConfig {
    /// The TTL as a duration; values too large to represent are rejected.
    pub fn cache_ttl(&self) -> Result<chrono::Duration, ConfigError> {
        i64::try_from(self.cache_ttl_minutes)
            .ok()
            .and_then(chrono::Duration::try_minutes)
            .ok_or(ConfigError::CacheTtl {
                minutes: self.cache_ttl_minutes,
            })
    }
}

/// The one site we crawl.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct SiteConfig {
    /// Front page URL; relative links are resolved against it.
    pub base_url: String,
    /// Substring every accepted article link must contain.
    pub domain: String,
    pub listing_timeout_secs: u64,
    pub article_timeout_secs: u64,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            base_url: "https://saudigazette.com.sa/".to_string(),
            domain: "saudigazette.com".to_string(),
            listing_timeout_secs: 10,
            article_timeout_secs: 15,
        }
    }
}

impl SiteConfig {
    pub fn listing_timeout(&self) -> Duration {
        Duration::from_secs(self.listing_timeout_secs)
    }

    pub fn article_timeout(&self) -> Duration {
        Duration::from_secs(self.article_timeout_secs)
    }

    /// Check that `base_url` is an absolute URL.
    pub fn validate(&self) -> Result<(), ConfigError> {
        url::Url::parse(&self.base_url)
            .map(|_| ())
            .map_err(|source| ConfigError::BaseUrl {
                url: self.base_url.clone(),
                source,
            })
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct TranslationConfig {
    pub endpoint: String,
    pub target_language: String,
    /// Upper bound, in characters, of a single translation request.
    pub chunk_chars: usize,
    pub timeout_secs: u64,
}

impl Default for TranslationConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://translate.googleapis.com/translate_a/single".to_string(),
            target_language: "ar".to_string(),
            chunk_chars: 4000,
            timeout_secs: 15,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct SummaryConfig {
    /// OpenAI-compatible chat completions base URL.
    pub base_url: String,
    pub model: String,
    pub max_output_tokens: u32,
    pub temperature: f32,
    pub timeout_secs: u64,
    /// Longest text, after translation, that will be summarized.
    pub max_input_chars: usize,
}

impl Default for SummaryConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com/v1".to_string(),
            model: "gpt-4".to_string(),
            max_output_tokens: 400,
            temperature: 0.7,
            timeout_secs: 60,
            max_input_chars: 8000,
        }
    }
}

/// Load a [`DigestConfig`] from a YAML file.
#[instrument(level = "info", skip_all, fields(%path))]
pub fn load_config(path: &str) -> Result<DigestConfig, ConfigError> {
    let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_string(),
        source,
    })?;
    let config = parse_config(&raw).map_err(|source| ConfigError::Parse {
        path: path.to_string(),
        source,
    })?;
    config.site.validate()?;
    info!(base_url = %config.site.base_url, ttl_minutes = config.cache_ttl_minutes, "Loaded configuration");
    Ok(config)
}

fn parse_config(raw: &str) -> Result<DigestConfig, serde_yaml::Error> {
    if raw.trim().is_empty() {
        return Ok(DigestConfig::default());
    }
    serde_yaml::from_str(raw)
}
