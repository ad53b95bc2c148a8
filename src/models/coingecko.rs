//! CoinGecko payload shapes
//!
//! Only the fields the dashboard reads are declared; everything else in the
//! upstream JSON is ignored. No further validation is performed.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Price-like value that CoinGecko sends either as a number or a string
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NumberOrString {
    Number(f64),
    Text(String),
}

/// `GET /coins/{id}`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoinDetails {
    pub id: String,
    pub name: String,
    pub symbol: String,
    #[serde(default)]
    pub image: CoinImage,
    #[serde(default)]
    pub market_data: MarketData,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CoinImage {
    #[serde(default)]
    pub thumb: Option<String>,
    #[serde(default)]
    pub small: Option<String>,
    #[serde(default)]
    pub large: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MarketData {
    /// Keyed by lowercase currency code (`usd`, `eur`, ...)
    #[serde(default)]
    pub current_price: HashMap<String, Option<f64>>,
    #[serde(default)]
    pub price_change_percentage_24h: Option<f64>,
    #[serde(default)]
    pub market_cap: HashMap<String, Option<f64>>,
    #[serde(default)]
    pub total_volume: HashMap<String, Option<f64>>,
}

impl MarketData {
    /// Current price in `currency`, if CoinGecko reported one
    pub fn price_in(&self, currency: &str) -> Option<f64> {
        self.current_price
            .get(&currency.to_ascii_lowercase())
            .copied()
            .flatten()
    }
}

/// One `[timestamp_ms, open, high, low, close]` row of `GET /coins/{id}/ohlc`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OhlcCandle(pub i64, pub f64, pub f64, pub f64, pub f64);

impl OhlcCandle {
    pub fn timestamp_ms(&self) -> i64 {
        self.0
    }

    pub fn open(&self) -> f64 {
        self.1
    }

    pub fn high(&self) -> f64 {
        self.2
    }

    pub fn low(&self) -> f64 {
        self.3
    }

    pub fn close(&self) -> f64 {
        self.4
    }
}

/// `GET /search/trending`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TrendingResponse {
    #[serde(default)]
    pub coins: Vec<TrendingCoin>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrendingCoin {
    pub item: TrendingCoinItem,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrendingCoinItem {
    pub id: String,
    pub name: String,
    pub symbol: String,
    #[serde(default)]
    pub market_cap_rank: Option<u32>,
    #[serde(default)]
    pub thumb: Option<String>,
    #[serde(default)]
    pub large: Option<String>,
    #[serde(default)]
    pub data: Option<TrendingCoinData>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TrendingCoinData {
    #[serde(default)]
    pub price: Option<NumberOrString>,
    #[serde(default)]
    pub price_change_percentage_24h: HashMap<String, f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coin_details_ignores_unknown_fields() {
        let json = r#"{
            "id": "bitcoin",
            "name": "Bitcoin",
            "symbol": "btc",
            "hashing_algorithm": "SHA-256",
            "image": {"large": "https://assets.test/btc.png"},
            "market_data": {"current_price": {"usd": 67250.5, "eur": null}}
        }"#;

        let coin: CoinDetails = serde_json::from_str(json).unwrap();
        assert_eq!(coin.name, "Bitcoin");
        assert_eq!(coin.market_data.price_in("USD"), Some(67250.5));
        assert_eq!(coin.market_data.price_in("eur"), None);
        assert_eq!(coin.image.large.as_deref(), Some("https://assets.test/btc.png"));
    }

    #[test]
    fn test_ohlc_rows() {
        let rows: Vec<OhlcCandle> =
            serde_json::from_str("[[1709395200000, 61942.0, 62211.0, 61721.0, 61845.0]]").unwrap();
        assert_eq!(rows[0].timestamp_ms(), 1709395200000);
        assert_eq!(rows[0].high(), 62211.0);
        assert_eq!(rows[0].close(), 61845.0);
    }

    #[test]
    fn test_trending_price_as_string_or_number() {
        let json = r#"{"coins": [
            {"item": {"id": "a", "name": "A", "symbol": "a", "data": {"price": 1.25}}},
            {"item": {"id": "b", "name": "B", "symbol": "b", "data": {"price": "0.0042", "price_change_percentage_24h": {"usd": -3.1}}}}
        ]}"#;

        let trending: TrendingResponse = serde_json::from_str(json).unwrap();
        assert_eq!(trending.coins.len(), 2);
        assert_eq!(
            trending.coins[0].item.data.as_ref().unwrap().price,
            Some(NumberOrString::Number(1.25))
        );
        assert_eq!(
            trending.coins[1].item.data.as_ref().unwrap().price,
            Some(NumberOrString::Text("0.0042".to_string()))
        );
    }
}
