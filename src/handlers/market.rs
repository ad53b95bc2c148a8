//! Market data handlers
//!
//! `overview` and `trending` serve view models and degrade to their
//! `unavailable` state on upstream failure. The raw `coins` routes pass the
//! upstream error through instead.

use crate::handlers::AppState;
use crate::models::coingecko::{CoinDetails, OhlcCandle};
use crate::models::view::{CoinOverviewView, TrendingCoinsView};
use crate::utils::error::AppResult;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
};
use serde::Deserialize;
use std::sync::Arc;
use tracing::debug;

/// Query string of `GET /api/coins/:id/ohlc`
#[derive(Debug, Deserialize)]
pub struct OhlcQuery {
    #[serde(default = "default_vs_currency")]
    pub vs_currency: String,
    #[serde(default = "default_days")]
    pub days: u32,
}

fn default_vs_currency() -> String {
    "usd".to_string()
}

fn default_days() -> u32 {
    1
}

/// GET /api/coins/:id/overview
pub async fn coin_overview(
    State(state): State<Arc<AppState>>,
    Path(coin_id): Path<String>,
) -> (StatusCode, Json<CoinOverviewView>) {
    debug!("Overview requested for {}", coin_id);
    let view = state.market.coin_overview_view(&coin_id).await;
    let status = match view {
        CoinOverviewView::Ready(_) => StatusCode::OK,
        CoinOverviewView::Unavailable => StatusCode::SERVICE_UNAVAILABLE,
    };
    (status, Json(view))
}

/// GET /api/trending
pub async fn trending_coins(
    State(state): State<Arc<AppState>>,
) -> (StatusCode, Json<TrendingCoinsView>) {
    debug!("Trending coins requested");
    let view = state.market.trending_view().await;
    let status = match view {
        TrendingCoinsView::Ready { .. } => StatusCode::OK,
        TrendingCoinsView::Unavailable => StatusCode::SERVICE_UNAVAILABLE,
    };
    (status, Json(view))
}

/// GET /api/coins/:id
pub async fn coin_details(
    State(state): State<Arc<AppState>>,
    Path(coin_id): Path<String>,
) -> AppResult<Json<CoinDetails>> {
    Ok(Json(state.market.coin_details(&coin_id).await?))
}

/// GET /api/coins/:id/ohlc
pub async fn coin_ohlc(
    State(state): State<Arc<AppState>>,
    Path(coin_id): Path<String>,
    Query(query): Query<OhlcQuery>,
) -> AppResult<Json<Vec<OhlcCandle>>> {
    let candles = state
        .market
        .coin_ohlc(&coin_id, &query.vs_currency, query.days)
        .await?;
    Ok(Json(candles))
}
