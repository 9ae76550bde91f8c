//! Storage contract for stocks and daily bars.
//!
//! Writes are async (they funnel through the storage layer's single writer),
//! reads are sync and go straight to the connection pool.

use async_trait::async_trait;

use super::model::{DailyBar, NewStock, Stock};
use crate::errors::Result;

/// Store for stock records and their daily price bars.
#[async_trait]
pub trait StockStore: Send + Sync {
    /// Returns the existing stock if the symbol is already present; otherwise
    /// creates it with the given attributes and returns it.
    ///
    /// Never overwrites an existing record's fields. Concurrent calls for the
    /// same symbol must resolve the race internally rather than surfacing a
    /// uniqueness violation.
    async fn ensure_stock(&self, new_stock: &NewStock) -> Result<Stock>;

    /// Inserts a bar row, or overwrites all five numeric fields if a row for
    /// `(symbol, date)` already exists. Atomic per row: the last writer's
    /// values win entirely.
    async fn upsert_daily_bar(&self, bar: &DailyBar) -> Result<()>;

    /// Look up a single stock by symbol.
    fn get_stock(&self, symbol: &str) -> Result<Option<Stock>>;

    /// All known stocks, symbol ascending.
    fn list_stocks(&self) -> Result<Vec<Stock>>;

    /// All bars for a symbol, newest first. Empty Vec (not an error) when the
    /// symbol has no bars.
    fn list_bars(&self, symbol: &str) -> Result<Vec<DailyBar>>;

    /// Verifies the underlying store is reachable with a trivial round trip.
    fn healthcheck(&self) -> Result<()>;
}
