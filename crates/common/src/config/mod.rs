//! Configuration management for CiteTrail
//!
//! Supports loading configuration from:
//! - Environment variables (prefixed with APP__)
//! - Configuration files (config.toml, config.yaml)
//! - Default values

use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Main application configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppConfig {
    /// Traversal configuration
    #[serde(default)]
    pub crawl: CrawlConfig,

    /// Literature-search provider configuration
    #[serde(default)]
    pub search: SearchConfig,

    /// Document acquisition configuration
    #[serde(default)]
    pub acquisition: AcquisitionConfig,

    /// Observability configuration
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CrawlConfig {
    /// Maximum number of papers in the graph
    #[serde(default = "default_max_papers")]
    pub max_papers: usize,

    /// Maximum BFS depth
    #[serde(default = "default_max_level")]
    pub max_level: u32,

    /// Bounded pool size for per-paper document fetches within a level
    #[serde(default = "default_fetch_concurrency")]
    pub fetch_concurrency: usize,

    /// Number of seed papers taken from the topic search
    #[serde(default = "default_seed_count")]
    pub seed_count: usize,

    /// Outer timeout applied to each collaborator call, in seconds
    #[serde(default = "default_collaborator_timeout")]
    pub collaborator_timeout_secs: u64,

    /// Path of the JSON artifact written at completion
    #[serde(default = "default_output_path")]
    pub output_path: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SearchConfig {
    /// API key for the search provider (falls back to SERPER_API_KEY)
    pub api_key: Option<String>,

    /// Provider base URL
    #[serde(default = "default_search_base_url")]
    pub base_url: String,

    /// Request timeout in seconds
    #[serde(default = "default_search_timeout")]
    pub timeout_secs: u64,

    /// Maximum retries per request
    #[serde(default = "default_search_retries")]
    pub max_retries: u32,

    /// Candidates kept per query (provider order)
    #[serde(default = "default_search_max_results")]
    pub max_results: usize,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AcquisitionConfig {
    /// Request timeout in seconds
    #[serde(default = "default_acquisition_timeout")]
    pub timeout_secs: u64,

    /// Base URL of the DOI-based document resolver
    #[serde(default = "default_doi_resolver_base")]
    pub doi_resolver_base: String,

    /// User-Agent header sent on downloads
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Downloads larger than this are discarded
    #[serde(default = "default_max_document_bytes")]
    pub max_document_bytes: usize,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ObservabilityConfig {
    /// Log level (debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Enable JSON logging
    #[serde(default = "default_json_logging")]
    pub json_logging: bool,
}

// Default value functions
fn default_max_papers() -> usize { 100 }
fn default_max_level() -> u32 { 3 }
fn default_fetch_concurrency() -> usize { 4 }
fn default_seed_count() -> usize { 3 }
fn default_collaborator_timeout() -> u64 { 45 }
fn default_output_path() -> String { "citation_graph.json".to_string() }
fn default_search_base_url() -> String { "https://google.serper.dev".to_string() }
fn default_search_timeout() -> u64 { 10 }
fn default_search_retries() -> u32 { 3 }
fn default_search_max_results() -> usize { 3 }
fn default_acquisition_timeout() -> u64 { 30 }
fn default_doi_resolver_base() -> String { "https://sci-hub.se".to_string() }
fn default_user_agent() -> String { "Mozilla/5.0".to_string() }
fn default_max_document_bytes() -> usize { 20 * 1024 * 1024 }
fn default_log_level() -> String { "info".to_string() }
fn default_json_logging() -> bool { false }

impl AppConfig {
    /// Load configuration from environment and files
    pub fn load() -> Result<Self, ConfigError> {
        let env = std::env::var("APP_ENV").unwrap_or_else(|_| "development".to_string());

        let config = Config::builder()
            // Start with defaults
            .set_default("crawl.max_papers", default_max_papers() as i64)?
            .set_default("crawl.max_level", default_max_level() as i64)?

            // Load base config file
            .add_source(File::with_name("config/default").required(false))

            // Load environment-specific config
            .add_source(File::with_name(&format!("config/{}", env)).required(false))

            // Load local overrides
            .add_source(File::with_name("config/local").required(false))

            // Load from environment variables with APP__ prefix
            // e.g., APP__CRAWL__MAX_PAPERS=50
            .add_source(
                Environment::with_prefix("APP")
                    .separator("__")
                    .try_parsing(true)
            )

            .build()?;

        config.try_deserialize()
    }

    /// Load from a specific TOML file
    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        let config = Config::builder()
            .add_source(File::with_name(path))
            .add_source(
                Environment::with_prefix("APP")
                    .separator("__")
                    .try_parsing(true)
            )
            .build()?;

        config.try_deserialize()
    }

    /// Get the outer collaborator timeout as Duration
    pub fn collaborator_timeout(&self) -> Duration {
        Duration::from_secs(self.crawl.collaborator_timeout_secs)
    }

    /// Get the search request timeout as Duration
    pub fn search_timeout(&self) -> Duration {
        Duration::from_secs(self.search.timeout_secs)
    }

    /// Get the acquisition request timeout as Duration
    pub fn acquisition_timeout(&self) -> Duration {
        Duration::from_secs(self.acquisition.timeout_secs)
    }
}

impl SearchConfig {
    /// The API key from config, or the SERPER_API_KEY environment variable.
    pub fn resolved_api_key(&self) -> Option<String> {
        self.api_key
            .clone()
            .filter(|key| !key.is_empty())
            .or_else(|| std::env::var("SERPER_API_KEY").ok().filter(|key| !key.is_empty()))
    }
}

impl Default for CrawlConfig {
    fn default() -> Self {
        Self {
            max_papers: default_max_papers(),
            max_level: default_max_level(),
            fetch_concurrency: default_fetch_concurrency(),
            seed_count: default_seed_count(),
            collaborator_timeout_secs: default_collaborator_timeout(),
            output_path: default_output_path(),
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_search_base_url(),
            timeout_secs: default_search_timeout(),
            max_retries: default_search_retries(),
            max_results: default_search_max_results(),
        }
    }
}

impl Default for AcquisitionConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_acquisition_timeout(),
            doi_resolver_base: default_doi_resolver_base(),
            user_agent: default_user_agent(),
            max_document_bytes: default_max_document_bytes(),
        }
    }
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            json_logging: default_json_logging(),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            crawl: CrawlConfig::default(),
            search: SearchConfig::default(),
            acquisition: AcquisitionConfig::default(),
            observability: ObservabilityConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.crawl.max_papers, 100);
        assert_eq!(config.crawl.max_level, 3);
        assert_eq!(config.search.max_results, 3);
        assert_eq!(config.acquisition.doi_resolver_base, "https://sci-hub.se");
    }

    #[test]
    fn test_timeout_helpers() {
        let config = AppConfig::default();
        assert_eq!(config.search_timeout(), Duration::from_secs(10));
        assert_eq!(config.acquisition_timeout(), Duration::from_secs(30));
    }

    #[test]
    fn test_resolved_api_key_prefers_config() {
        let search = SearchConfig {
            api_key: Some("from-config".into()),
            ..SearchConfig::default()
        };
        assert_eq!(search.resolved_api_key().as_deref(), Some("from-config"));
    }

    #[test]
    fn test_empty_api_key_is_unset() {
        let search = SearchConfig {
            api_key: Some(String::new()),
            ..SearchConfig::default()
        };
        // An empty key in config must not mask the environment fallback
        // (which is absent here), so resolution yields nothing.
        std::env::remove_var("SERPER_API_KEY");
        assert_eq!(search.resolved_api_key(), None);
    }
}
