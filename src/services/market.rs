//! Market data service
//!
//! The page-level data loads of the dashboard, built on [`CoinGeckoClient`]

use crate::models::coingecko::{CoinDetails, OhlcCandle, TrendingResponse};
use crate::models::view::{CoinOverview, CoinOverviewView, TrendingCoinsView};
use crate::services::client::CoinGeckoClient;
use crate::services::query::QueryParams;
use crate::utils::error::{AppError, AppResult};
use tracing::{debug, error};

/// Market data service
#[derive(Debug, Clone)]
pub struct MarketService {
    client: CoinGeckoClient,
}

impl MarketService {
    pub fn new(client: CoinGeckoClient) -> Self {
        Self { client }
    }

    /// Inner client reference
    pub fn client(&self) -> &CoinGeckoClient {
        &self.client
    }

    /// `coins/{id}`
    pub async fn coin_details(&self, coin_id: &str) -> AppResult<CoinDetails> {
        let coin_id = validate_coin_id(coin_id)?;
        let params = QueryParams::new().with("dex_pair_format", "symbol");
        self.client
            .fetch(&format!("coins/{}", coin_id), Some(&params))
            .await
    }

    /// `coins/{id}/ohlc`
    pub async fn coin_ohlc(
        &self,
        coin_id: &str,
        vs_currency: &str,
        days: u32,
    ) -> AppResult<Vec<OhlcCandle>> {
        let coin_id = validate_coin_id(coin_id)?;
        let params = QueryParams::new()
            .with("vs_currency", vs_currency)
            .with("days", days)
            .with("precision", "full");
        self.client
            .fetch(&format!("coins/{}/ohlc", coin_id), Some(&params))
            .await
    }

    /// Details and one day of USD candles, fetched concurrently.
    /// Fails if either request fails.
    pub async fn coin_overview(&self, coin_id: &str) -> AppResult<CoinOverview> {
        debug!("Loading overview for {}", coin_id);
        let (coin, candles) = tokio::try_join!(
            self.coin_details(coin_id),
            self.coin_ohlc(coin_id, "usd", 1)
        )?;
        Ok(CoinOverview::from_payloads(coin, candles))
    }

    /// `search/trending`
    pub async fn trending(&self) -> AppResult<TrendingResponse> {
        self.client.fetch("search/trending", None).await
    }

    /// Overview view, degrading to `Unavailable` when any fetch fails
    pub async fn coin_overview_view(&self, coin_id: &str) -> CoinOverviewView {
        match self.coin_overview(coin_id).await {
            Ok(overview) => CoinOverviewView::Ready(overview),
            Err(e) => {
                error!("Error fetching coin {}: {}", coin_id, e);
                CoinOverviewView::Unavailable
            }
        }
    }

    /// Trending view, degrading to `Unavailable` when the fetch fails
    pub async fn trending_view(&self) -> TrendingCoinsView {
        match self.trending().await {
            Ok(trending) => TrendingCoinsView::from_payload(trending),
            Err(e) => {
                error!("Error fetching trending coins: {}", e);
                TrendingCoinsView::Unavailable
            }
        }
    }
}

/// Coin ids are lowercase slugs (`bitcoin`, `usd-coin`); anything else would
/// change the endpoint path.
fn validate_coin_id(coin_id: &str) -> AppResult<&str> {
    let valid = !coin_id.is_empty()
        && coin_id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '.');
    if valid && coin_id != "." && coin_id != ".." {
        Ok(coin_id)
    } else {
        Err(AppError::InvalidRequest(format!(
            "invalid coin id '{}'",
            coin_id
        )))
    }
}
