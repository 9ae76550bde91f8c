use std::sync::Arc;

use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

use sharemarket_core::ingest::IngestService;
use sharemarket_core::providers::MarketDataProvider;
use sharemarket_core::stocks::StockStore;
use sharemarket_market_data::YahooProvider;
use sharemarket_storage_sqlite::db;
use sharemarket_storage_sqlite::stocks::StockRepository;

use crate::config::Config;

pub struct AppState {
    pub store: Arc<dyn StockStore>,
    pub ingest: Arc<IngestService>,
    pub cron_secret: Option<String>,
}

pub fn init_tracing() {
    let log_format = std::env::var("SMD_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    if log_format.eq_ignore_ascii_case("json") {
        registry
            .with(fmt::layer().json().with_current_span(false))
            .init();
    } else {
        registry
            .with(fmt::layer().with_target(true).with_line_number(true))
            .init();
    }
}

/// Wires the production provider into the shared state.
pub async fn build_state(config: &Config) -> anyhow::Result<Arc<AppState>> {
    let provider = YahooProvider::new().map_err(|e| anyhow::anyhow!(e.to_string()))?;
    build_state_with_provider(config, Arc::new(provider)).await
}

/// Builds the shared state around an arbitrary provider. Production uses
/// [`build_state`]; tests inject scripted providers here.
pub async fn build_state_with_provider(
    config: &Config,
    provider: Arc<dyn MarketDataProvider>,
) -> anyhow::Result<Arc<AppState>> {
    let db_path = db::init(&config.db_path)?;
    tracing::info!("Database path in use: {}", db_path);

    let pool = db::create_pool(&db_path)?;
    db::run_migrations(&pool)?;
    let writer = db::spawn_writer(Arc::clone(&pool));

    let store: Arc<dyn StockStore> = Arc::new(StockRepository::new(pool, writer));
    let ingest = Arc::new(IngestService::new(
        provider,
        store.clone(),
        config.tickers.clone(),
        config.window_days,
    ));

    Ok(Arc::new(AppState {
        store,
        ingest,
        cron_secret: config.cron_secret.clone(),
    }))
}
