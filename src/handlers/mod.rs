//! HTTP handlers module
//!
//! Contains all HTTP endpoint handling logic

pub mod health;
pub mod market;

use crate::config::Settings;
use crate::middleware::logging::request_logging_middleware;
use crate::services::{CoinGeckoClient, MarketService};
use crate::utils::error::AppResult;
use axum::{middleware, routing::get, Router};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::info;

/// Application state
#[derive(Debug, Clone)]
pub struct AppState {
    pub settings: Settings,
    pub market: MarketService,
}

/// Create application router
pub async fn create_router(settings: Settings) -> AppResult<Router> {
    let client = CoinGeckoClient::new(&settings)?;
    let market = MarketService::new(client);

    health::mark_started();
    info!("Market data source: {}", settings.coingecko.base_url);

    let app_state = Arc::new(AppState { settings, market });

    // Create middleware stack
    let middleware_stack = ServiceBuilder::new()
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(middleware::from_fn(request_logging_middleware));

    // Create routes
    let router = Router::new()
        .route("/health", get(health::health_check))
        .route("/health/live", get(health::liveness_check))
        .route("/api/trending", get(market::trending_coins))
        .route("/api/coins/:id", get(market::coin_details))
        .route("/api/coins/:id/ohlc", get(market::coin_ohlc))
        .route("/api/coins/:id/overview", get(market::coin_overview))
        .with_state(app_state)
        .layer(middleware_stack);

    Ok(router)
}
