//! Data models module
//!
//! Defines CoinGecko payload shapes and the view models served to the front-end

pub mod coingecko;
pub mod view;

pub use coingecko::{CoinDetails, NumberOrString, OhlcCandle, TrendingResponse};
pub use view::{CoinOverview, CoinOverviewView, TrendingCoinsView, TrendingRow};
