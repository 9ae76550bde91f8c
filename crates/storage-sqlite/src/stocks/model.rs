//! Diesel row types for the `stocks` and `market_data` tables, plus
//! conversions to and from the domain models.

use chrono::NaiveDate;
use diesel::prelude::*;

use sharemarket_core::errors::{DatabaseError, Error};
use sharemarket_core::stocks::model::{DailyBar, Exchange, NewStock, Stock};

use crate::schema::{market_data, stocks};

/// Dates are persisted as ISO-8601 text, which sorts correctly in SQLite.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Queryable, Identifiable, Insertable, Selectable, Debug, Clone)]
#[diesel(table_name = stocks)]
#[diesel(primary_key(symbol))]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct StockDb {
    pub symbol: String,
    pub name: Option<String>,
    pub exchange: String,
    pub sector: Option<String>,
}

impl From<StockDb> for Stock {
    fn from(row: StockDb) -> Self {
        Stock {
            symbol: row.symbol,
            name: row.name,
            exchange: Exchange::from(row.exchange.as_str()),
            sector: row.sector,
        }
    }
}

impl From<&NewStock> for StockDb {
    fn from(new_stock: &NewStock) -> Self {
        StockDb {
            symbol: new_stock.symbol.clone(),
            name: new_stock.name.clone(),
            exchange: new_stock.exchange.as_str().to_string(),
            sector: None,
        }
    }
}

#[derive(Queryable, Identifiable, Selectable, Debug, Clone)]
#[diesel(table_name = market_data)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct DailyBarDb {
    pub id: i32,
    pub symbol: String,
    pub date: String,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: i64,
}

impl TryFrom<DailyBarDb> for DailyBar {
    type Error = Error;

    /// Fails when the stored date text does not parse; a corrupt row is a
    /// storage fault, not a bar on 1970-01-01.
    fn try_from(row: DailyBarDb) -> Result<Self, Error> {
        let date = NaiveDate::parse_from_str(&row.date, DATE_FORMAT).map_err(|e| {
            Error::Database(DatabaseError::Internal(format!(
                "Invalid stored date {:?} for {}: {}",
                row.date, row.symbol, e
            )))
        })?;
        Ok(DailyBar {
            symbol: row.symbol,
            date,
            open: row.open,
            high: row.high,
            low: row.low,
            close: row.close,
            volume: row.volume,
        })
    }
}

/// Insert payload for `market_data`; the id column is auto-assigned.
#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = market_data)]
pub struct NewDailyBarDb {
    pub symbol: String,
    pub date: String,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: i64,
}

impl From<&DailyBar> for NewDailyBarDb {
    fn from(bar: &DailyBar) -> Self {
        NewDailyBarDb {
            symbol: bar.symbol.clone(),
            date: bar.date.format(DATE_FORMAT).to_string(),
            open: bar.open,
            high: bar.high,
            low: bar.low,
            close: bar.close,
            volume: bar.volume,
        }
    }
}
