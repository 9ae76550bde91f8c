//! Market data provider contract.
//!
//! A provider wraps an external market data source and exposes a single
//! capability: given a symbol, return up to N trailing days of daily bars
//! plus basic issuer metadata, or fail.

use async_trait::async_trait;
use chrono::NaiveDate;
use thiserror::Error;

use crate::stocks::Exchange;

/// Errors from the upstream market data source.
///
/// These are isolated per symbol by the ingestion engine and never abort a
/// run. "No data for this symbol" is not an error: providers return an empty
/// bar sequence for that case.
#[derive(Error, Debug)]
pub enum ProviderError {
    /// The underlying call itself failed (network, rate limit, HTTP error).
    #[error("Provider request failed: {provider} - {message}")]
    RequestFailed { provider: String, message: String },

    /// The provider answered, but the payload could not be interpreted.
    #[error("Malformed provider response: {0}")]
    MalformedResponse(String),
}

/// A single daily price observation as returned by the provider.
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderBar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: i64,
}

/// Issuer metadata resolved during a fetch.
///
/// `symbol` is the caller's symbol, without any provider suffix. The exchange
/// tag is derived from the suffix the provider query used (`.NS` -> NSE,
/// `.BO` -> BSE).
#[derive(Debug, Clone, PartialEq)]
pub struct StockMeta {
    pub symbol: String,
    pub name: Option<String>,
    pub exchange: Exchange,
}

/// Result of a recent-bars fetch: issuer metadata plus the trailing window of
/// daily bars. An empty `bars` means the provider has no data for the symbol
/// (delisted or invalid ticker), which is a valid outcome.
#[derive(Debug, Clone)]
pub struct RecentBars {
    pub meta: StockMeta,
    pub bars: Vec<ProviderBar>,
}

/// Trait for market data providers.
///
/// `window_days` controls how many trailing calendar days of bars are
/// requested; it is sized to tolerate weekends and holidays while still
/// covering the latest closed trading day.
#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    /// Unique identifier for this provider, used in logs and error messages.
    fn id(&self) -> &'static str;

    /// Fetch the trailing window of daily bars and issuer metadata for a
    /// symbol.
    async fn fetch_recent_bars(
        &self,
        symbol: &str,
        window_days: u32,
    ) -> std::result::Result<RecentBars, ProviderError>;
}
