//! Error handling module
//!
//! Defines error types and handling logic used in the project

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Startup configuration errors
///
/// Raised once while building [`crate::config::Settings`]; never per request.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// A required setting is absent or empty
    #[error("{0} environment variable not set")]
    Missing(&'static str),

    /// A setting is present but unusable
    #[error("Invalid value for {key}: {message}")]
    Invalid {
        key: &'static str,
        message: String,
    },
}

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// HTTP client error
    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    /// Non-success response from the market-data API
    #[error("API Error: {status}: {message}")]
    Api {
        status: u16,
        message: String,
    },

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Endpoint or base URL could not be turned into a request URL
    #[error("Invalid request URL: {0}")]
    InvalidUrl(String),

    /// Caller input rejected before any upstream call
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

/// Error response structure
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error type
    #[serde(rename = "type")]
    pub error_type: String,
    /// Error message
    pub message: String,
    /// Upstream status code (optional)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub upstream_status: Option<u16>,
}

impl AppError {
    /// Get HTTP status code
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Api { status, .. } if *status == 404 => StatusCode::NOT_FOUND,
            AppError::Api { status, .. } if *status == 429 => StatusCode::TOO_MANY_REQUESTS,
            AppError::Api { .. } => StatusCode::BAD_GATEWAY,
            AppError::HttpClient(e) if e.is_timeout() => StatusCode::GATEWAY_TIMEOUT,
            AppError::HttpClient(_) | AppError::Serialization(_) => StatusCode::BAD_GATEWAY,
            AppError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Config(_) | AppError::InvalidUrl(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get error type string
    pub fn error_type(&self) -> &'static str {
        match self {
            AppError::Config(_) => "config_error",
            AppError::HttpClient(_) => "transport_error",
            AppError::Api { .. } => "api_error",
            AppError::Serialization(_) => "decode_error",
            AppError::InvalidUrl(_) => "url_error",
            AppError::InvalidRequest(_) => "invalid_request_error",
        }
    }

    /// Upstream HTTP status, when the error came from a non-success response
    pub fn upstream_status(&self) -> Option<u16> {
        match self {
            AppError::Api { status, .. } => Some(*status),
            AppError::HttpClient(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Convert to the JSON error body
    pub fn to_error_response(&self) -> ErrorResponse {
        ErrorResponse {
            error_type: self.error_type().to_string(),
            message: self.to_string(),
            upstream_status: self.upstream_status(),
        }
    }
}

/// Implement IntoResponse trait to allow errors to be returned directly as HTTP responses
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        tracing::error!("Application error: {} - Status code: {}", self, status);

        (status, Json(self.to_error_response())).into_response()
    }
}

/// Result type alias
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_message_embeds_status() {
        let err = AppError::Api {
            status: 429,
            message: "Too Many Requests".to_string(),
        };
        assert_eq!(err.to_string(), "API Error: 429: Too Many Requests");
        assert_eq!(err.upstream_status(), Some(429));
    }

    #[test]
    fn test_error_status_codes() {
        let not_found = AppError::Api { status: 404, message: "coin not found".to_string() };
        assert_eq!(not_found.status_code(), StatusCode::NOT_FOUND);

        let server = AppError::Api { status: 500, message: "boom".to_string() };
        assert_eq!(server.status_code(), StatusCode::BAD_GATEWAY);

        let config = AppError::Config(ConfigError::Missing("COINGECKO_API_KEY"));
        assert_eq!(config.status_code(), StatusCode::INTERNAL_SERVER_ERROR);

        let bad_id = AppError::InvalidRequest("invalid coin id 'bit coin'".to_string());
        assert_eq!(bad_id.status_code(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_config_error_messages() {
        assert_eq!(
            ConfigError::Missing("COINGECKO_BASE_URL").to_string(),
            "COINGECKO_BASE_URL environment variable not set"
        );
        let invalid = ConfigError::Invalid {
            key: "SERVER_PORT",
            message: "Port number cannot be 0".to_string(),
        };
        assert!(invalid.to_string().contains("SERVER_PORT"));
    }
}
