//! Health check handlers
//!
//! Provides application health status check endpoints

use crate::handlers::AppState;
use axum::{extract::State, response::Json};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;
use tracing::debug;

static START_TIME: Lazy<Instant> = Lazy::new(Instant::now);

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Service status
    pub status: String,
    /// Service name
    pub service: String,
    /// Version information
    pub version: String,
    /// Timestamp
    pub timestamp: String,
    /// Details (optional)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<HealthDetails>,
}

/// Check result
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthDetails {
    /// Market data API base URL
    pub upstream: String,
    /// Configuration status
    pub config: String,
    /// Uptime in seconds
    pub uptime_seconds: u64,
    /// Responses currently held in the cache
    pub cached_responses: usize,
}

/// Pin the uptime origin; called when the router is built
pub fn mark_started() {
    Lazy::force(&START_TIME);
}

/// Basic health check
///
/// GET /health
pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    debug!("Executing health check");

    Json(build_response("healthy", &state))
}

/// Liveness check
///
/// GET /health/live
/// Does not touch the upstream API
pub async fn liveness_check(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    debug!("Executing liveness check");

    Json(build_response("alive", &state))
}

fn build_response(status: &str, state: &AppState) -> HealthResponse {
    HealthResponse {
        status: status.to_string(),
        service: crate::NAME.to_string(),
        version: crate::VERSION.to_string(),
        timestamp: chrono::Utc::now().to_rfc3339(),
        details: Some(HealthDetails {
            upstream: state.settings.coingecko.base_url.clone(),
            config: "valid".to_string(),
            uptime_seconds: get_uptime_seconds(),
            cached_responses: state.market.client().cache().len(),
        }),
    }
}

/// Get service uptime in seconds
fn get_uptime_seconds() -> u64 {
    START_TIME.elapsed().as_secs()
}
