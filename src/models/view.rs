//! View models handed to the presentation layer
//!
//! Each view is either `ready` with display-ready fields or `unavailable`,
//! which the front-end renders as its loading skeleton.

use crate::models::coingecko::{CoinDetails, OhlcCandle, TrendingResponse};
use crate::utils::format::{format_usd, Amount};
use serde::{Deserialize, Serialize};

/// Price overview for a single coin
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum CoinOverviewView {
    Ready(CoinOverview),
    Unavailable,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoinOverview {
    pub id: String,
    pub name: String,
    /// Uppercased ticker
    pub symbol: String,
    pub image: Option<String>,
    /// Formatted USD price
    pub price: String,
    pub candles: Vec<OhlcCandle>,
}

impl CoinOverview {
    pub fn from_payloads(coin: CoinDetails, candles: Vec<OhlcCandle>) -> Self {
        let price = format_usd(coin.market_data.price_in("usd"));

        Self {
            id: coin.id,
            name: coin.name,
            symbol: coin.symbol.to_uppercase(),
            image: coin.image.large.or(coin.image.small).or(coin.image.thumb),
            price,
            candles,
        }
    }
}

/// Trending coins table
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum TrendingCoinsView {
    Ready { rows: Vec<TrendingRow> },
    Unavailable,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrendingRow {
    pub id: String,
    pub name: String,
    pub symbol: String,
    pub thumb: Option<String>,
    pub price: String,
    pub change_24h: Option<f64>,
    pub is_trending_up: bool,
}

impl TrendingCoinsView {
    pub fn from_payload(trending: TrendingResponse) -> Self {
        let rows = trending
            .coins
            .into_iter()
            .map(|coin| {
                let item = coin.item;
                let price = item
                    .data
                    .as_ref()
                    .and_then(|d| d.price.as_ref())
                    .map(Amount::from)
                    .unwrap_or(Amount::Missing);
                let change_24h = item
                    .data
                    .as_ref()
                    .and_then(|d| d.price_change_percentage_24h.get("usd").copied());

                TrendingRow {
                    price: format_usd(price),
                    is_trending_up: change_24h.is_some_and(|c| c > 0.0),
                    change_24h,
                    symbol: item.symbol.to_uppercase(),
                    thumb: item.thumb.or(item.large),
                    id: item.id,
                    name: item.name,
                }
            })
            .collect();

        TrendingCoinsView::Ready { rows }
    }
}
