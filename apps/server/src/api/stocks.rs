use std::sync::Arc;

use axum::extract::{Path, State};
use axum::routing::get;
use axum::{Json, Router};
use chrono::NaiveDate;
use serde::Serialize;

use sharemarket_core::stocks::{DailyBar, Stock};

use crate::error::{ApiError, ApiResult};
use crate::main_lib::AppState;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct StockResponse {
    symbol: String,
    name: Option<String>,
    exchange: String,
    sector: Option<String>,
}

impl From<Stock> for StockResponse {
    fn from(stock: Stock) -> Self {
        StockResponse {
            symbol: stock.symbol,
            name: stock.name,
            exchange: stock.exchange.to_string(),
            sector: stock.sector,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct BarResponse {
    date: NaiveDate,
    open: f64,
    high: f64,
    low: f64,
    close: f64,
    volume: i64,
}

impl From<DailyBar> for BarResponse {
    fn from(bar: DailyBar) -> Self {
        BarResponse {
            date: bar.date,
            open: bar.open,
            high: bar.high,
            low: bar.low,
            close: bar.close,
            volume: bar.volume,
        }
    }
}

/// List every known stock, symbol ascending.
async fn list_stocks(State(state): State<Arc<AppState>>) -> ApiResult<Json<Vec<StockResponse>>> {
    let stocks = state.store.list_stocks()?;
    Ok(Json(stocks.into_iter().map(StockResponse::from).collect()))
}

/// Daily bars for one stock, newest first. 404 when the symbol is unknown;
/// a known symbol with no bars yet returns an empty list.
async fn stock_history(
    State(state): State<Arc<AppState>>,
    Path(symbol): Path<String>,
) -> ApiResult<Json<Vec<BarResponse>>> {
    if state.store.get_stock(&symbol)?.is_none() {
        return Err(ApiError::NotFound("Stock not found".to_string()));
    }
    let bars = state.store.list_bars(&symbol)?;
    Ok(Json(bars.into_iter().map(BarResponse::from).collect()))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/stocks", get(list_stocks))
        .route("/stocks/{symbol}/history", get(stock_history))
}
