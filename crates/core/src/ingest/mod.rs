//! Ingestion engine: fetch -> normalize -> upsert, one symbol at a time.
//!
//! Each run is self-contained and stateless; the only state it consults is
//! what it reads back from storage. Symbols are processed independently so
//! that one symbol's provider or storage fault never aborts the run for the
//! rest of the universe.

use std::sync::Arc;

use log::{error, info, warn};

use crate::providers::MarketDataProvider;
use crate::stocks::{DailyBar, NewStock, StockStore};

// =============================================================================
// Report Types
// =============================================================================

/// Outcome of an ingestion attempt for a single symbol.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SymbolOutcome {
    /// Bars were fetched and upserted; carries the number of bars written.
    Updated(usize),
    /// The provider had no data for this symbol. Existing bars are untouched.
    NoData,
    /// A provider or storage fault stopped ingestion for this symbol.
    Failed(String),
}

/// Per-run, per-symbol outcome record produced by the ingestion engine.
#[derive(Debug, Clone, Default)]
pub struct SyncReport {
    outcomes: Vec<(String, SymbolOutcome)>,
    /// Number of symbols that reached `Updated`.
    pub updated: usize,
    /// Number of symbols with a valid empty provider response.
    pub no_data: usize,
    /// Number of symbols that failed.
    pub failed: usize,
    /// Total bars written across all symbols.
    pub bars_written: usize,
}

impl SyncReport {
    fn record(&mut self, symbol: String, outcome: SymbolOutcome) {
        match &outcome {
            SymbolOutcome::Updated(n) => {
                self.updated += 1;
                self.bars_written += n;
            }
            SymbolOutcome::NoData => self.no_data += 1,
            SymbolOutcome::Failed(_) => self.failed += 1,
        }
        self.outcomes.push((symbol, outcome));
    }

    /// Per-symbol outcomes in universe order.
    pub fn outcomes(&self) -> &[(String, SymbolOutcome)] {
        &self.outcomes
    }

    /// Outcome for one symbol, if it was part of the run.
    pub fn outcome(&self, symbol: &str) -> Option<&SymbolOutcome> {
        self.outcomes
            .iter()
            .find(|(s, _)| s == symbol)
            .map(|(_, o)| o)
    }

    /// True when no symbol failed.
    pub fn is_success(&self) -> bool {
        self.failed == 0
    }

    /// One-line summary for logs.
    pub fn summary(&self) -> String {
        format!(
            "{} bars written for {} symbols ({} no-data, {} failed)",
            self.bars_written, self.updated, self.no_data, self.failed
        )
    }
}

// =============================================================================
// Ingestion Service
// =============================================================================

/// Orchestrates per-symbol fetch, stock-record ensure, and bar upsert.
pub struct IngestService {
    provider: Arc<dyn MarketDataProvider>,
    store: Arc<dyn StockStore>,
    tickers: Vec<String>,
    window_days: u32,
}

impl IngestService {
    pub fn new(
        provider: Arc<dyn MarketDataProvider>,
        store: Arc<dyn StockStore>,
        tickers: Vec<String>,
        window_days: u32,
    ) -> Self {
        Self {
            provider,
            store,
            tickers,
            window_days,
        }
    }

    /// Runs one sync over the configured static universe. This is the sole
    /// operation the trigger surface and the scheduler call.
    pub async fn sync_tickers(&self) -> SyncReport {
        self.run_sync(&self.tickers).await
    }

    /// Runs one sync over an explicit universe, sequentially, committing one
    /// symbol before the next begins.
    ///
    /// Running this twice in succession with no new upstream data leaves
    /// storage content-identical to running it once, because every write is
    /// an upsert keyed on `(symbol, date)`.
    pub async fn run_sync(&self, universe: &[String]) -> SyncReport {
        let mut report = SyncReport::default();
        for symbol in universe {
            let outcome = self.sync_symbol(symbol).await;
            match &outcome {
                SymbolOutcome::Updated(n) => info!("Updated {} bars for {}", n, symbol),
                SymbolOutcome::NoData => warn!("No data found for {}", symbol),
                SymbolOutcome::Failed(reason) => error!("Sync failed for {}: {}", symbol, reason),
            }
            report.record(symbol.clone(), outcome);
        }
        info!("Sync run finished: {}", report.summary());
        report
    }

    async fn sync_symbol(&self, symbol: &str) -> SymbolOutcome {
        let fetched = match self
            .provider
            .fetch_recent_bars(symbol, self.window_days)
            .await
        {
            Ok(fetched) => fetched,
            Err(e) => return SymbolOutcome::Failed(e.to_string()),
        };

        if fetched.bars.is_empty() {
            return SymbolOutcome::NoData;
        }

        let new_stock = NewStock {
            symbol: symbol.to_string(),
            name: fetched.meta.name.clone(),
            exchange: fetched.meta.exchange,
        };
        if let Err(e) = self.store.ensure_stock(&new_stock).await {
            return SymbolOutcome::Failed(e.to_string());
        }

        let mut written = 0;
        for bar in &fetched.bars {
            // Bars are stored under the caller's symbol, not the suffixed
            // form the provider was queried with.
            let daily_bar = DailyBar {
                symbol: symbol.to_string(),
                date: bar.date,
                open: bar.open,
                high: bar.high,
                low: bar.low,
                close: bar.close,
                volume: bar.volume,
            };
            if let Err(e) = self.store.upsert_daily_bar(&daily_bar).await {
                // Abort remaining bars for this symbol only.
                return SymbolOutcome::Failed(e.to_string());
            }
            written += 1;
        }

        SymbolOutcome::Updated(written)
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::Result;
    use crate::providers::{ProviderBar, ProviderError, RecentBars, StockMeta};
    use crate::stocks::{Exchange, Stock};
    use async_trait::async_trait;
    use chrono::NaiveDate;
    use std::collections::BTreeMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    struct ScriptedProvider {
        bars: BTreeMap<String, Vec<ProviderBar>>,
        faulty: Vec<String>,
        calls: AtomicUsize,
    }

    impl ScriptedProvider {
        fn new() -> Self {
            Self {
                bars: BTreeMap::new(),
                faulty: Vec::new(),
                calls: AtomicUsize::new(0),
            }
        }

        fn with_bars(mut self, symbol: &str, bars: Vec<ProviderBar>) -> Self {
            self.bars.insert(symbol.to_string(), bars);
            self
        }

        fn with_fault(mut self, symbol: &str) -> Self {
            self.faulty.push(symbol.to_string());
            self
        }
    }

    #[async_trait]
    impl MarketDataProvider for ScriptedProvider {
        fn id(&self) -> &'static str {
            "SCRIPTED"
        }

        async fn fetch_recent_bars(
            &self,
            symbol: &str,
            _window_days: u32,
        ) -> std::result::Result<RecentBars, ProviderError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.faulty.iter().any(|s| s == symbol) {
                return Err(ProviderError::RequestFailed {
                    provider: "SCRIPTED".to_string(),
                    message: "injected fault".to_string(),
                });
            }
            Ok(RecentBars {
                meta: StockMeta {
                    symbol: symbol.to_string(),
                    name: Some(format!("{} Ltd", symbol)),
                    exchange: Exchange::Nse,
                },
                bars: self.bars.get(symbol).cloned().unwrap_or_default(),
            })
        }
    }

    #[derive(Default)]
    struct MemoryStore {
        stocks: Mutex<BTreeMap<String, Stock>>,
        bars: Mutex<BTreeMap<(String, NaiveDate), DailyBar>>,
    }

    impl MemoryStore {
        fn bar_count(&self, symbol: &str) -> usize {
            self.bars
                .lock()
                .unwrap()
                .keys()
                .filter(|(s, _)| s == symbol)
                .count()
        }

        fn close_for(&self, symbol: &str, date: NaiveDate) -> Option<f64> {
            self.bars
                .lock()
                .unwrap()
                .get(&(symbol.to_string(), date))
                .map(|b| b.close)
        }
    }

    #[async_trait]
    impl StockStore for MemoryStore {
        async fn ensure_stock(&self, new_stock: &NewStock) -> Result<Stock> {
            let mut stocks = self.stocks.lock().unwrap();
            let stock = stocks
                .entry(new_stock.symbol.clone())
                .or_insert_with(|| Stock {
                    symbol: new_stock.symbol.clone(),
                    name: new_stock.name.clone(),
                    exchange: new_stock.exchange,
                    sector: None,
                });
            Ok(stock.clone())
        }

        async fn upsert_daily_bar(&self, bar: &DailyBar) -> Result<()> {
            self.bars
                .lock()
                .unwrap()
                .insert((bar.symbol.clone(), bar.date), bar.clone());
            Ok(())
        }

        fn get_stock(&self, symbol: &str) -> Result<Option<Stock>> {
            Ok(self.stocks.lock().unwrap().get(symbol).cloned())
        }

        fn list_stocks(&self) -> Result<Vec<Stock>> {
            Ok(self.stocks.lock().unwrap().values().cloned().collect())
        }

        fn list_bars(&self, symbol: &str) -> Result<Vec<DailyBar>> {
            let mut bars: Vec<DailyBar> = self
                .bars
                .lock()
                .unwrap()
                .values()
                .filter(|b| b.symbol == symbol)
                .cloned()
                .collect();
            bars.sort_by(|a, b| b.date.cmp(&a.date));
            Ok(bars)
        }

        fn healthcheck(&self) -> Result<()> {
            Ok(())
        }
    }

    fn bar(date: &str, close: f64) -> ProviderBar {
        ProviderBar {
            date: date.parse().unwrap(),
            open: close - 1.0,
            high: close + 1.0,
            low: close - 2.0,
            close,
            volume: 1_000,
        }
    }

    fn service(
        provider: ScriptedProvider,
        store: Arc<MemoryStore>,
        tickers: &[&str],
    ) -> IngestService {
        IngestService::new(
            Arc::new(provider),
            store,
            tickers.iter().map(|s| s.to_string()).collect(),
            5,
        )
    }

    #[tokio::test]
    async fn one_faulty_symbol_does_not_abort_the_run() {
        let provider = ScriptedProvider::new()
            .with_bars("RELIANCE", vec![bar("2026-08-21", 2900.0)])
            .with_fault("TCS")
            .with_bars("INFY", vec![bar("2026-08-21", 1500.0)]);
        let store = Arc::new(MemoryStore::default());
        let svc = service(provider, store.clone(), &["RELIANCE", "TCS", "INFY"]);

        let report = svc.sync_tickers().await;

        assert_eq!(report.outcome("RELIANCE"), Some(&SymbolOutcome::Updated(1)));
        assert!(matches!(
            report.outcome("TCS"),
            Some(SymbolOutcome::Failed(_))
        ));
        assert_eq!(report.outcome("INFY"), Some(&SymbolOutcome::Updated(1)));
        assert_eq!(report.updated, 2);
        assert_eq!(report.failed, 1);
        assert!(!report.is_success());
        assert_eq!(store.bar_count("RELIANCE"), 1);
        assert_eq!(store.bar_count("INFY"), 1);
    }

    #[tokio::test]
    async fn empty_provider_response_yields_no_data_and_leaves_bars_untouched() {
        let date: NaiveDate = "2026-08-20".parse().unwrap();
        let store = Arc::new(MemoryStore::default());
        store
            .upsert_daily_bar(&DailyBar {
                symbol: "HDFCBANK".to_string(),
                date,
                open: 1.0,
                high: 2.0,
                low: 0.5,
                close: 1.5,
                volume: 10,
            })
            .await
            .unwrap();

        let provider = ScriptedProvider::new().with_bars("HDFCBANK", vec![]);
        let svc = service(provider, store.clone(), &["HDFCBANK"]);

        let report = svc.sync_tickers().await;

        assert_eq!(report.outcome("HDFCBANK"), Some(&SymbolOutcome::NoData));
        assert_eq!(store.bar_count("HDFCBANK"), 1);
        assert_eq!(store.close_for("HDFCBANK", date), Some(1.5));
    }

    #[tokio::test]
    async fn repeated_runs_are_idempotent() {
        let provider = ScriptedProvider::new().with_bars(
            "RELIANCE",
            vec![bar("2026-08-20", 2890.0), bar("2026-08-21", 2900.0)],
        );
        let store = Arc::new(MemoryStore::default());
        let svc = service(provider, store.clone(), &["RELIANCE"]);

        let first = svc.sync_tickers().await;
        let after_first: Vec<DailyBar> = store.list_bars("RELIANCE").unwrap();
        let second = svc.sync_tickers().await;
        let after_second: Vec<DailyBar> = store.list_bars("RELIANCE").unwrap();

        assert_eq!(first.outcome("RELIANCE"), Some(&SymbolOutcome::Updated(2)));
        assert_eq!(second.outcome("RELIANCE"), Some(&SymbolOutcome::Updated(2)));
        assert_eq!(after_first, after_second);
        assert_eq!(store.bar_count("RELIANCE"), 2);
    }

    #[tokio::test]
    async fn stock_record_is_created_once_with_provider_metadata() {
        let provider = ScriptedProvider::new().with_bars("TCS", vec![bar("2026-08-21", 4100.0)]);
        let store = Arc::new(MemoryStore::default());
        let svc = service(provider, store.clone(), &["TCS"]);

        svc.sync_tickers().await;

        let stock = store.get_stock("TCS").unwrap().unwrap();
        assert_eq!(stock.name.as_deref(), Some("TCS Ltd"));
        assert_eq!(stock.exchange, Exchange::Nse);
    }
}
