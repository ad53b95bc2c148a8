//! Application configuration settings
//!
//! Defines all configuration structures and loading logic

use crate::utils::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default header CoinGecko's demo plan reads the key from
pub const DEFAULT_API_KEY_HEADER: &str = "x-cg-demo-api-key";

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Server configuration
    pub server: ServerConfig,
    /// CoinGecko API configuration
    pub coingecko: CoinGeckoConfig,
    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Listen host
    pub host: String,
    /// Listen port
    pub port: u16,
}

/// CoinGecko API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoinGeckoConfig {
    /// API base URL, without trailing slash
    pub base_url: String,
    /// API key
    pub api_key: String,
    /// Header the API key is sent in
    pub api_key_header: String,
    /// Request timeout in seconds
    pub timeout: u64,
    /// Cache hint applied when a caller does not pass one, in seconds
    pub default_revalidate: u64,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level
    pub level: String,
    /// Log format (text/json)
    pub format: String,
}

impl CoinGeckoConfig {
    /// Upstream request timeout
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.timeout)
    }

    /// Revalidate window used when a caller passes none
    pub fn revalidate_window(&self) -> Duration {
        Duration::from_secs(self.default_revalidate)
    }
}

impl Settings {
    /// Create a new configuration instance from the process environment
    pub fn new() -> Result<Self, ConfigError> {
        // Load .env file if it exists
        dotenv::dotenv().ok();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build settings from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get_or = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let settings = Self {
            server: ServerConfig {
                host: get_or("SERVER_HOST", "0.0.0.0"),
                port: parse_number("SERVER_PORT", &get_or("SERVER_PORT", "3000"))?,
            },
            coingecko: CoinGeckoConfig {
                base_url: require(&lookup, "COINGECKO_BASE_URL")?
                    .trim_end_matches('/')
                    .to_string(),
                api_key: require(&lookup, "COINGECKO_API_KEY")?,
                api_key_header: get_or("COINGECKO_API_KEY_HEADER", DEFAULT_API_KEY_HEADER),
                timeout: parse_number("REQUEST_TIMEOUT", &get_or("REQUEST_TIMEOUT", "30"))?,
                default_revalidate: parse_number(
                    "DEFAULT_REVALIDATE",
                    &get_or("DEFAULT_REVALIDATE", "60"),
                )?,
            },
            logging: LoggingConfig {
                level: get_or("RUST_LOG", "info"),
                format: get_or("LOG_FORMAT", "text"),
            },
        };

        // Validate configuration
        settings.validate()?;

        Ok(settings)
    }

    /// Validate configuration validity
    fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(invalid("SERVER_PORT", "Port number cannot be 0"));
        }

        if self.coingecko.api_key.contains(char::is_whitespace) {
            return Err(invalid(
                "COINGECKO_API_KEY",
                "API key cannot contain whitespace characters",
            ));
        }

        if !self.coingecko.base_url.starts_with("http") {
            return Err(invalid(
                "COINGECKO_BASE_URL",
                "Invalid base URL format, should start with 'http'",
            ));
        }

        if self.coingecko.api_key_header.is_empty()
            || reqwest::header::HeaderName::from_bytes(self.coingecko.api_key_header.as_bytes())
                .is_err()
        {
            return Err(invalid(
                "COINGECKO_API_KEY_HEADER",
                "Not a valid HTTP header name",
            ));
        }

        if self.coingecko.timeout == 0 {
            return Err(invalid("REQUEST_TIMEOUT", "Timeout values cannot be 0"));
        }

        let valid_formats = ["text", "json"];
        if !valid_formats.contains(&self.logging.format.as_str()) {
            return Err(invalid(
                "LOG_FORMAT",
                format!("Invalid log format: {}", self.logging.format),
            ));
        }

        Ok(())
    }

    /// Listen address in `host:port` form
    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

/// Fetch a required, non-blank setting
fn require<F>(lookup: &F, key: &'static str) -> Result<String, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(value) if !value.trim().is_empty() => Ok(value.trim().to_string()),
        _ => Err(ConfigError::Missing(key)),
    }
}

fn parse_number<T: std::str::FromStr>(key: &'static str, raw: &str) -> Result<T, ConfigError> {
    raw.trim()
        .parse()
        .map_err(|_| invalid(key, format!("'{}' is not a valid number", raw)))
}

fn invalid(key: &'static str, message: impl Into<String>) -> ConfigError {
    ConfigError::Invalid {
        key,
        message: message.into(),
    }
}
