//! Stock and daily bar domain models.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Exchange identifiers
pub const EXCHANGE_NSE: &str = "NSE";
pub const EXCHANGE_BSE: &str = "BSE";

/// The exchange a stock trades on.
///
/// The universe is a binary NSE/BSE split; anything unrecognized coming back
/// from storage defaults to NSE.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum Exchange {
    /// National Stock Exchange of India
    #[default]
    Nse,
    /// Bombay Stock Exchange
    Bse,
}

impl Exchange {
    /// Returns the string identifier for this exchange.
    pub fn as_str(&self) -> &'static str {
        match self {
            Exchange::Nse => EXCHANGE_NSE,
            Exchange::Bse => EXCHANGE_BSE,
        }
    }
}

impl From<&str> for Exchange {
    fn from(s: &str) -> Self {
        match s.to_uppercase().as_str() {
            EXCHANGE_BSE => Exchange::Bse,
            _ => Exchange::Nse,
        }
    }
}

impl std::fmt::Display for Exchange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A tradable issuer, keyed by its exchange ticker symbol.
///
/// Created lazily by the ingestion engine the first time a symbol is
/// successfully fetched; never deleted and never mutated by ingestion after
/// creation (first write wins).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stock {
    pub symbol: String,
    pub name: Option<String>,
    pub exchange: Exchange,
    pub sector: Option<String>,
}

/// Payload for lazily creating a stock record.
///
/// Sector is not known at auto-creation time and stays unset.
#[derive(Debug, Clone, PartialEq)]
pub struct NewStock {
    pub symbol: String,
    pub name: Option<String>,
    pub exchange: Exchange,
}

/// One day's OHLCV observation for a stock.
///
/// At most one bar exists per `(symbol, date)` pair; the storage layer
/// enforces this with a uniqueness constraint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyBar {
    pub symbol: String,
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: i64,
}
