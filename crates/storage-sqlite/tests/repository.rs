use std::sync::Arc;

use chrono::NaiveDate;
use diesel::prelude::*;
use tempfile::TempDir;

use sharemarket_core::stocks::model::{DailyBar, Exchange, NewStock};
use sharemarket_core::stocks::store::StockStore;
use sharemarket_storage_sqlite::db::{create_pool, get_connection, run_migrations, spawn_writer};
use sharemarket_storage_sqlite::schema::market_data;
use sharemarket_storage_sqlite::stocks::StockRepository;

fn setup() -> (TempDir, StockRepository) {
    let tmp = TempDir::new().expect("create temp dir");
    let db_path = tmp.path().join("market.db");
    let pool = create_pool(db_path.to_str().unwrap()).expect("create pool");
    run_migrations(&pool).expect("run migrations");
    let writer = spawn_writer(Arc::clone(&pool));
    (tmp, StockRepository::new(pool, writer))
}

fn bar(symbol: &str, date: &str, close: f64) -> DailyBar {
    DailyBar {
        symbol: symbol.to_string(),
        date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
        open: close - 2.0,
        high: close + 1.0,
        low: close - 3.0,
        close,
        volume: 1_000,
    }
}

#[tokio::test]
async fn ensure_stock_is_first_write_wins() {
    let (_tmp, repo) = setup();

    let created = repo
        .ensure_stock(&NewStock {
            symbol: "TCS".to_string(),
            name: Some("Tata Consultancy Services".to_string()),
            exchange: Exchange::Nse,
        })
        .await
        .unwrap();
    assert_eq!(created.symbol, "TCS");
    assert_eq!(created.name.as_deref(), Some("Tata Consultancy Services"));

    // A later call with different attributes must not touch the record.
    let again = repo
        .ensure_stock(&NewStock {
            symbol: "TCS".to_string(),
            name: Some("Some Other Name".to_string()),
            exchange: Exchange::Bse,
        })
        .await
        .unwrap();
    assert_eq!(again.name.as_deref(), Some("Tata Consultancy Services"));
    assert_eq!(again.exchange, Exchange::Nse);

    let stocks = repo.list_stocks().unwrap();
    assert_eq!(stocks.len(), 1);
}

#[tokio::test]
async fn upsert_overwrites_existing_row_instead_of_duplicating() {
    let (_tmp, repo) = setup();

    repo.ensure_stock(&NewStock {
        symbol: "INFY".to_string(),
        name: None,
        exchange: Exchange::Nse,
    })
    .await
    .unwrap();

    repo.upsert_daily_bar(&bar("INFY", "2026-08-20", 100.0))
        .await
        .unwrap();
    repo.upsert_daily_bar(&bar("INFY", "2026-08-20", 105.0))
        .await
        .unwrap();

    let bars = repo.list_bars("INFY").unwrap();
    assert_eq!(bars.len(), 1);
    assert_eq!(bars[0].close, 105.0);
    assert_eq!(bars[0].open, 103.0);
}

#[tokio::test]
async fn list_bars_returns_newest_first() {
    let (_tmp, repo) = setup();

    repo.ensure_stock(&NewStock {
        symbol: "RELIANCE".to_string(),
        name: None,
        exchange: Exchange::Nse,
    })
    .await
    .unwrap();

    for date in ["2026-08-18", "2026-08-20", "2026-08-19"] {
        repo.upsert_daily_bar(&bar("RELIANCE", date, 50.0)).await.unwrap();
    }

    let bars = repo.list_bars("RELIANCE").unwrap();
    let dates: Vec<String> = bars.iter().map(|b| b.date.to_string()).collect();
    assert_eq!(dates, vec!["2026-08-20", "2026-08-19", "2026-08-18"]);
}

#[tokio::test]
async fn list_bars_for_unknown_symbol_is_empty() {
    let (_tmp, repo) = setup();
    assert!(repo.list_bars("NOSUCH").unwrap().is_empty());
}

#[tokio::test]
async fn get_stock_returns_none_for_unknown_symbol() {
    let (_tmp, repo) = setup();
    assert!(repo.get_stock("NOSUCH").unwrap().is_none());
}

#[tokio::test]
async fn healthcheck_succeeds_on_fresh_database() {
    let (_tmp, repo) = setup();
    repo.healthcheck().unwrap();
}

#[tokio::test]
async fn corrupt_stored_date_surfaces_as_an_error() {
    let tmp = TempDir::new().unwrap();
    let db_path = tmp.path().join("market.db");
    let pool = create_pool(db_path.to_str().unwrap()).unwrap();
    run_migrations(&pool).unwrap();
    let writer = spawn_writer(Arc::clone(&pool));
    let repo = StockRepository::new(Arc::clone(&pool), writer);

    repo.ensure_stock(&NewStock {
        symbol: "WIPRO".to_string(),
        name: None,
        exchange: Exchange::Nse,
    })
    .await
    .unwrap();

    // Plant a row with an unparseable date behind the repository's back.
    let mut conn = get_connection(&pool).unwrap();
    diesel::insert_into(market_data::table)
        .values((
            market_data::symbol.eq("WIPRO"),
            market_data::date.eq("yesterday"),
            market_data::open.eq(1.0),
            market_data::high.eq(2.0),
            market_data::low.eq(0.5),
            market_data::close.eq(1.5),
            market_data::volume.eq(10_i64),
        ))
        .execute(&mut conn)
        .unwrap();

    let err = repo.list_bars("WIPRO").unwrap_err();
    assert!(err.to_string().contains("Invalid stored date"));
}
