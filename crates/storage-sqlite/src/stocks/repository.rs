//! Diesel-backed implementation of [`StockStore`].
//!
//! Writes go through the single-writer actor so that each call is one
//! immediate transaction on the dedicated writer connection; reads take an
//! ordinary pooled connection.

use std::sync::Arc;

use async_trait::async_trait;
use diesel::prelude::*;
use diesel::upsert::excluded;

use sharemarket_core::errors::Result;
use sharemarket_core::stocks::model::{DailyBar, NewStock, Stock};
use sharemarket_core::stocks::store::StockStore;

use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::IntoCore;
use crate::schema::{market_data, stocks};
use crate::stocks::model::{DailyBarDb, NewDailyBarDb, StockDb};

pub struct StockRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl StockRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        Self { pool, writer }
    }
}

#[async_trait]
impl StockStore for StockRepository {
    async fn ensure_stock(&self, new_stock: &NewStock) -> Result<Stock> {
        let row = StockDb::from(new_stock);
        let symbol = new_stock.symbol.clone();

        self.writer
            .exec(move |conn| {
                // Insert-or-ignore then read back. If another run created the
                // record first, the ignore makes this a no-op and the read
                // returns the established row (first write wins).
                diesel::insert_or_ignore_into(stocks::table)
                    .values(&row)
                    .execute(conn)
                    .into_core()?;

                let stock: StockDb = stocks::table.find(&symbol).first(conn).into_core()?;
                Ok(stock.into())
            })
            .await
    }

    async fn upsert_daily_bar(&self, bar: &DailyBar) -> Result<()> {
        let row = NewDailyBarDb::from(bar);

        self.writer
            .exec(move |conn| {
                diesel::insert_into(market_data::table)
                    .values(&row)
                    .on_conflict((market_data::symbol, market_data::date))
                    .do_update()
                    .set((
                        market_data::open.eq(excluded(market_data::open)),
                        market_data::high.eq(excluded(market_data::high)),
                        market_data::low.eq(excluded(market_data::low)),
                        market_data::close.eq(excluded(market_data::close)),
                        market_data::volume.eq(excluded(market_data::volume)),
                    ))
                    .execute(conn)
                    .into_core()?;
                Ok(())
            })
            .await
    }

    fn get_stock(&self, symbol: &str) -> Result<Option<Stock>> {
        let mut conn = get_connection(&self.pool)?;
        let row: Option<StockDb> = stocks::table
            .find(symbol)
            .first(&mut conn)
            .optional()
            .into_core()?;
        Ok(row.map(Stock::from))
    }

    fn list_stocks(&self) -> Result<Vec<Stock>> {
        let mut conn = get_connection(&self.pool)?;
        let rows: Vec<StockDb> = stocks::table
            .order(stocks::symbol.asc())
            .load(&mut conn)
            .into_core()?;
        Ok(rows.into_iter().map(Stock::from).collect())
    }

    fn list_bars(&self, symbol: &str) -> Result<Vec<DailyBar>> {
        let mut conn = get_connection(&self.pool)?;
        let rows: Vec<DailyBarDb> = market_data::table
            .filter(market_data::symbol.eq(symbol))
            .order(market_data::date.desc())
            .load(&mut conn)
            .into_core()?;
        rows.into_iter().map(DailyBar::try_from).collect()
    }

    fn healthcheck(&self) -> Result<()> {
        let mut conn = get_connection(&self.pool)?;
        diesel::sql_query("SELECT 1").execute(&mut conn).into_core()?;
        Ok(())
    }
}
