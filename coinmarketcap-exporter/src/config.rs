//! Configuration for the CoinMarketCap exporter.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Environment variable that switches the exporter to fixture mode.
pub const TEST_MODE_VAR: &str = "TEST_MODE";

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config: {0}")]
    Parse(#[from] json5::Error),
    #[error("Validation error: {0}")]
    Validation(String),
}

/// Complete exporter configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExporterConfig {
    /// HTTP endpoint settings.
    #[serde(default)]
    pub http: HttpConfig,

    /// Ticker data source settings.
    #[serde(default)]
    pub source: SourceConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Prometheus HTTP endpoint configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Address to listen on (default: "0.0.0.0:9700").
    #[serde(default = "default_listen")]
    pub listen: String,

    /// Path for metrics endpoint (default: "/metrics").
    #[serde(default = "default_path")]
    pub path: String,
}

fn default_listen() -> String {
    "0.0.0.0:9700".to_string()
}

fn default_path() -> String {
    "/metrics".to_string()
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            listen: default_listen(),
            path: default_path(),
        }
    }
}

/// Where ticker data comes from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceMode {
    /// Query the remote ticker API on every scrape.
    #[default]
    Live,
    /// Read a local JSON file on every scrape.
    Fixture,
}

/// Ticker data source configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Live API or local fixture.
    #[serde(default)]
    pub mode: SourceMode,

    /// Ticker endpoint URL.
    #[serde(default = "default_url")]
    pub url: String,

    /// Extra currency requested from the API (default: "EUR").
    #[serde(default = "default_convert")]
    pub convert: String,

    /// Number of top-ranked assets to request.
    #[serde(default = "default_limit")]
    pub limit: u32,

    /// Request timeout (seconds).
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Fixture file, relative to the working directory unless absolute.
    #[serde(default = "default_fixture_path")]
    pub fixture_path: PathBuf,
}

fn default_url() -> String {
    "https://api.coinmarketcap.com/v1/ticker/".to_string()
}

fn default_convert() -> String {
    "EUR".to_string()
}

fn default_limit() -> u32 {
    50
}

fn default_timeout() -> u64 {
    10
}

fn default_fixture_path() -> PathBuf {
    PathBuf::from("test.json")
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            mode: SourceMode::default(),
            url: default_url(),
            convert: default_convert(),
            limit: default_limit(),
            timeout_secs: default_timeout(),
            fixture_path: default_fixture_path(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level: "trace", "debug", "info", "warn", "error".
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log output format: "text" or "json".
    #[serde(default)]
    pub format: LogFormat,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::default(),
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl ExporterConfig {
    /// Load configuration from a JSON5 file.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Parse configuration from a JSON5 string.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let config: ExporterConfig = json5::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Apply the `TEST_MODE` environment override.
    ///
    /// Only the exact value `"1"` enables fixture mode; anything else keeps
    /// the configured mode.
    pub fn apply_test_mode(&mut self, value: Option<&str>) {
        if value == Some("1") {
            self.source.mode = SourceMode::Fixture;
        }
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.http.listen.parse::<std::net::SocketAddr>().is_err() {
            return Err(ConfigError::Validation(format!(
                "Invalid listen address: {}",
                self.http.listen
            )));
        }

        if !self.http.path.starts_with('/') {
            return Err(ConfigError::Validation(
                "Metrics path must start with /".to_string(),
            ));
        }

        // "/" serves the index page
        if self.http.path == "/" {
            return Err(ConfigError::Validation(
                "Metrics path must not be /".to_string(),
            ));
        }

        if self.source.url.is_empty() {
            return Err(ConfigError::Validation(
                "source url must not be empty".to_string(),
            ));
        }

        if self.source.limit == 0 {
            return Err(ConfigError::Validation("limit must be > 0".to_string()));
        }

        if self.source.timeout_secs == 0 {
            return Err(ConfigError::Validation(
                "timeout_secs must be > 0".to_string(),
            ));
        }

        Ok(())
    }
}
