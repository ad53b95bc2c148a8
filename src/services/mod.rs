//! Service layer module
//!
//! Contains the CoinGecko HTTP client, query parameter handling and the market data service

pub mod client;
pub mod market;
pub mod query;

pub use client::*;
pub use market::MarketService;
pub use query::{QueryParams, QueryValue};
