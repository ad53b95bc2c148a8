//! HTTP client service
//!
//! Encapsulates HTTP communication with the CoinGecko API

use crate::config::{CoinGeckoConfig, Settings};
use crate::services::query::QueryParams;
use crate::utils::cache::ResponseCache;
use crate::utils::error::{AppError, AppResult, ConfigError};
use crate::utils::logging::truncate_content;
use reqwest::header::{HeaderName, HeaderValue, CONTENT_TYPE};
use reqwest::{Client, Response, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, error, info};

/// Error payload CoinGecko may attach to a non-success response
///
/// Two shapes are seen in practice: `{"error": "coin not found"}` and
/// `{"status": {"error_code": 429, "error_message": "..."}}`.
#[derive(Debug, Default, Deserialize)]
pub struct ApiErrorBody {
    #[serde(default)]
    pub error: Option<serde_json::Value>,
    #[serde(default)]
    pub status: Option<ApiErrorStatus>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ApiErrorStatus {
    #[serde(default)]
    pub error_code: Option<i64>,
    #[serde(default)]
    pub error_message: Option<String>,
}

impl ApiErrorBody {
    /// Parse an error body, treating anything unparseable as an empty object
    pub fn parse(bytes: &[u8]) -> Self {
        serde_json::from_slice(bytes).unwrap_or_default()
    }

    /// API-provided detail, if it carries a usable one
    pub fn detail(&self) -> Option<String> {
        let from_error = match &self.error {
            None | Some(serde_json::Value::Null) | Some(serde_json::Value::Bool(false)) => None,
            Some(serde_json::Value::String(s)) if s.is_empty() => None,
            Some(serde_json::Value::String(s)) => Some(s.clone()),
            Some(serde_json::Value::Number(n)) if n.as_f64() == Some(0.0) => None,
            Some(other) => Some(other.to_string()),
        };

        from_error.or_else(|| {
            self.status
                .as_ref()
                .and_then(|s| s.error_message.clone())
                .filter(|m| !m.is_empty())
        })
    }
}

/// CoinGecko API client
#[derive(Debug, Clone)]
pub struct CoinGeckoClient {
    client: Client,
    base_url: String,
    api_key_header: HeaderName,
    api_key: HeaderValue,
    default_revalidate: Duration,
    cache: ResponseCache,
}

impl CoinGeckoClient {
    /// Create a new client instance
    pub fn new(settings: &Settings) -> AppResult<Self> {
        Self::from_config(&settings.coingecko)
    }

    /// Create a client from the CoinGecko section alone
    pub fn from_config(config: &CoinGeckoConfig) -> AppResult<Self> {
        if config.base_url.trim().is_empty() {
            return Err(ConfigError::Missing("COINGECKO_BASE_URL").into());
        }
        if config.api_key.trim().is_empty() {
            return Err(ConfigError::Missing("COINGECKO_API_KEY").into());
        }

        let api_key_header = HeaderName::from_bytes(config.api_key_header.as_bytes())
            .map_err(|e| ConfigError::Invalid {
                key: "COINGECKO_API_KEY_HEADER",
                message: e.to_string(),
            })?;

        let mut api_key = HeaderValue::from_str(&config.api_key).map_err(|e| {
            ConfigError::Invalid {
                key: "COINGECKO_API_KEY",
                message: e.to_string(),
            }
        })?;
        api_key.set_sensitive(true);

        let client = Client::builder()
            .timeout(config.request_timeout())
            .user_agent(concat!("coinpulse/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key_header,
            api_key,
            default_revalidate: config.revalidate_window(),
            cache: ResponseCache::new(),
        })
    }

    /// Base URL requests are resolved against
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Shared response cache
    pub fn cache(&self) -> &ResponseCache {
        &self.cache
    }

    /// Build `{base_url}/{endpoint}?{query}`
    pub fn build_url(&self, endpoint: &str, params: Option<&QueryParams>) -> AppResult<Url> {
        let raw = format!("{}/{}", self.base_url, endpoint.trim_start_matches('/'));
        let mut url = Url::parse(&raw).map_err(|e| AppError::InvalidUrl(format!("{}: {}", raw, e)))?;

        if let Some(params) = params {
            params.apply_to(&mut url);
        }

        Ok(url)
    }

    /// GET `endpoint` with the default cache hint
    pub async fn fetch<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        params: Option<&QueryParams>,
    ) -> AppResult<T> {
        self.fetch_with_revalidate(endpoint, params, self.default_revalidate)
            .await
    }

    /// GET `endpoint`, reusing a cached body younger than `revalidate`
    pub async fn fetch_with_revalidate<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        params: Option<&QueryParams>,
        revalidate: Duration,
    ) -> AppResult<T> {
        let url = self.build_url(endpoint, params)?;
        info!("Fetching {} from {}", url, endpoint);

        if let Some(body) = self.cache.get(url.as_str(), revalidate) {
            return Ok(serde_json::from_slice(&body)?);
        }

        let response = self
            .client
            .get(url.clone())
            .header(self.api_key_header.clone(), self.api_key.clone())
            .header(CONTENT_TYPE, "application/json")
            .send()
            .await?;

        let body = self.handle_response(response).await?;
        let parsed = serde_json::from_slice(&body)?;
        if !revalidate.is_zero() {
            self.cache.insert(url.as_str(), &body);
        }

        Ok(parsed)
    }

    /// Handle HTTP response, returning the raw body of a success
    async fn handle_response(&self, response: Response) -> AppResult<Vec<u8>> {
        let status = response.status();

        if status.is_success() {
            let body = response.bytes().await?;
            debug!("CoinGecko request completed successfully ({} bytes)", body.len());
            return Ok(body.to_vec());
        }

        let body = response.bytes().await.unwrap_or_default();
        let error_body = ApiErrorBody::parse(&body);
        let message = error_body
            .detail()
            .unwrap_or_else(|| status_text(status).to_string());

        error!(
            "CoinGecko API request failed: {} - {}",
            status,
            truncate_content(&String::from_utf8_lossy(&body), 200)
        );

        Err(AppError::Api {
            status: status.as_u16(),
            message,
        })
    }
}

fn status_text(status: StatusCode) -> &'static str {
    status.canonical_reason().unwrap_or("Unknown Status")
}
