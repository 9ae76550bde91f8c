//! Yahoo Finance market data provider.
//!
//! Yahoo requires a market suffix on Indian tickers: `.NS` for NSE listings,
//! `.BO` for BSE. Callers pass plain exchange symbols (e.g. `RELIANCE`); the
//! default NSE suffix is appended before querying and mapped back to an
//! exchange tag in the returned metadata.

use async_trait::async_trait;
use chrono::{NaiveDate, TimeZone, Utc};
use tracing::{debug, warn};
use yahoo_finance_api as yahoo;

use sharemarket_core::providers::{
    MarketDataProvider, ProviderBar, ProviderError, RecentBars, StockMeta,
};
use sharemarket_core::stocks::Exchange;

const PROVIDER_ID: &str = "YAHOO";

/// Yahoo Finance provider for daily OHLCV bars and issuer metadata.
pub struct YahooProvider {
    connector: yahoo::YahooConnector,
}

impl YahooProvider {
    /// Create a new Yahoo Finance provider.
    pub fn new() -> Result<Self, ProviderError> {
        let connector = yahoo::YahooConnector::new().map_err(|e| ProviderError::RequestFailed {
            provider: PROVIDER_ID.to_string(),
            message: format!("Failed to initialize Yahoo connector: {}", e),
        })?;
        Ok(Self { connector })
    }

    /// Best-effort issuer display name via ticker search. A failed lookup
    /// degrades to `None` rather than failing the whole fetch.
    async fn fetch_name(&self, yahoo_symbol: &str) -> Option<String> {
        let result = match self.connector.search_ticker(yahoo_symbol).await {
            Ok(result) => result,
            Err(e) => {
                debug!("Name lookup failed for {}: {}", yahoo_symbol, e);
                return None;
            }
        };

        result
            .quotes
            .iter()
            .find(|q| q.symbol == yahoo_symbol)
            .map(|item| format_name(&item.long_name, &item.short_name))
            .filter(|name| !name.is_empty())
    }

    /// Convert a Yahoo quote into a daily bar, dropping entries with
    /// unrepresentable timestamps.
    fn quote_to_bar(quote: &yahoo::Quote) -> Option<ProviderBar> {
        let date = bar_date(quote.timestamp)?;
        Some(ProviderBar {
            date,
            open: quote.open,
            high: quote.high,
            low: quote.low,
            close: quote.close,
            volume: quote.volume as i64,
        })
    }
}

#[async_trait]
impl MarketDataProvider for YahooProvider {
    fn id(&self) -> &'static str {
        PROVIDER_ID
    }

    async fn fetch_recent_bars(
        &self,
        symbol: &str,
        window_days: u32,
    ) -> Result<RecentBars, ProviderError> {
        let (yahoo_symbol, exchange) = normalize_symbol(symbol);
        let range = format!("{}d", window_days.max(1));

        debug!(
            "Fetching {} of daily bars for {} from Yahoo",
            range, yahoo_symbol
        );

        let response = match self
            .connector
            .get_quote_range(&yahoo_symbol, "1d", &range)
            .await
        {
            Ok(response) => response,
            // Unknown or delisted ticker: a valid empty result, not a fault.
            Err(yahoo::YahooError::NoQuotes) | Err(yahoo::YahooError::NoResult) => {
                return Ok(RecentBars {
                    meta: StockMeta {
                        symbol: symbol.to_string(),
                        name: None,
                        exchange,
                    },
                    bars: Vec::new(),
                });
            }
            Err(e) => {
                return Err(ProviderError::RequestFailed {
                    provider: PROVIDER_ID.to_string(),
                    message: e.to_string(),
                })
            }
        };

        let yahoo_quotes = match response.quotes() {
            Ok(quotes) => quotes,
            Err(yahoo::YahooError::NoQuotes) | Err(yahoo::YahooError::NoResult) => Vec::new(),
            Err(e) => return Err(ProviderError::MalformedResponse(e.to_string())),
        };

        let bars: Vec<ProviderBar> = yahoo_quotes
            .iter()
            .filter_map(|q| {
                let bar = Self::quote_to_bar(q);
                if bar.is_none() {
                    warn!(
                        "Skipping bar for {} with invalid timestamp {}",
                        yahoo_symbol, q.timestamp
                    );
                }
                bar
            })
            .collect();

        // The name lookup is a second network call; only pay for it when the
        // symbol actually has data worth persisting.
        let name = if bars.is_empty() {
            None
        } else {
            self.fetch_name(&yahoo_symbol).await
        };

        Ok(RecentBars {
            meta: StockMeta {
                symbol: symbol.to_string(),
                name,
                exchange,
            },
            bars,
        })
    }
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Append the default NSE suffix when the symbol carries no recognized market
/// suffix, and derive the exchange tag from the suffix in use.
fn normalize_symbol(symbol: &str) -> (String, Exchange) {
    if symbol.ends_with(".NS") {
        (symbol.to_string(), Exchange::Nse)
    } else if symbol.ends_with(".BO") {
        (symbol.to_string(), Exchange::Bse)
    } else {
        (format!("{}.NS", symbol), Exchange::Nse)
    }
}

/// Prefer the long name, fall back to the short name, and undo the HTML
/// ampersand escaping Yahoo ships.
fn format_name(long_name: &str, short_name: &str) -> String {
    let name = if long_name.is_empty() {
        short_name
    } else {
        long_name
    };
    name.replace("&amp;", "&")
}

/// Convert a bar timestamp (unix seconds) to its trading date.
fn bar_date(timestamp: u64) -> Option<NaiveDate> {
    Utc.timestamp_opt(timestamp as i64, 0)
        .single()
        .map(|dt| dt.date_naive())
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_symbol_gets_nse_suffix() {
        assert_eq!(
            normalize_symbol("RELIANCE"),
            ("RELIANCE.NS".to_string(), Exchange::Nse)
        );
    }

    #[test]
    fn nse_suffix_is_kept() {
        assert_eq!(
            normalize_symbol("TCS.NS"),
            ("TCS.NS".to_string(), Exchange::Nse)
        );
    }

    #[test]
    fn bse_suffix_maps_to_bse() {
        assert_eq!(
            normalize_symbol("SENSEXSTOCK.BO"),
            ("SENSEXSTOCK.BO".to_string(), Exchange::Bse)
        );
    }

    #[test]
    fn name_formatting_prefers_long_name_and_unescapes() {
        assert_eq!(
            format_name("Larsen &amp; Toubro Limited", "L&T"),
            "Larsen & Toubro Limited"
        );
        assert_eq!(format_name("", "Reliance Industries"), "Reliance Industries");
    }

    #[test]
    fn bar_date_converts_unix_seconds() {
        // 2023-11-14 22:13:20 UTC
        let date = bar_date(1_700_000_000).unwrap();
        assert_eq!(date, "2023-11-14".parse::<NaiveDate>().unwrap());
    }
}
