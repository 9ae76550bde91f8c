//! Environment-driven server configuration.
//!
//! Every knob has a working default so `cargo run` against an empty
//! environment brings up a functional instance with a local database file.

const DEFAULT_DB_PATH: &str = "data/sharemarket.db";
const DEFAULT_LISTEN_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_TICKERS: &str = "RELIANCE,TCS,INFY,HDFCBANK";
const DEFAULT_WINDOW_DAYS: u32 = 5;

#[derive(Debug, Clone)]
pub struct Config {
    /// Path of the SQLite database file.
    pub db_path: String,
    /// Address the HTTP server binds to.
    pub listen_addr: String,
    /// Shared secret for the sync trigger endpoint. When unset, the trigger
    /// runs unauthenticated.
    pub cron_secret: Option<String>,
    /// The static symbol universe ingestion runs over.
    pub tickers: Vec<String>,
    /// Trailing window of daily bars to request per symbol.
    pub window_days: u32,
    /// Background sync interval in seconds. Zero disables the scheduler; the
    /// trigger endpoint still works.
    pub sync_interval_secs: u64,
}

impl Config {
    pub fn from_env() -> Self {
        let db_path =
            std::env::var("SMD_DB_PATH").unwrap_or_else(|_| DEFAULT_DB_PATH.to_string());
        let listen_addr =
            std::env::var("SMD_LISTEN_ADDR").unwrap_or_else(|_| DEFAULT_LISTEN_ADDR.to_string());
        let cron_secret = std::env::var("SMD_CRON_SECRET")
            .ok()
            .filter(|s| !s.trim().is_empty());
        let tickers = parse_tickers(
            &std::env::var("SMD_TICKERS").unwrap_or_else(|_| DEFAULT_TICKERS.to_string()),
        );
        let window_days = std::env::var("SMD_WINDOW_DAYS")
            .ok()
            .and_then(|v| v.parse().ok())
            .filter(|&d| d > 0)
            .unwrap_or(DEFAULT_WINDOW_DAYS);
        let sync_interval_secs = std::env::var("SMD_SYNC_INTERVAL_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(0);

        Self {
            db_path,
            listen_addr,
            cron_secret,
            tickers,
            window_days,
            sync_interval_secs,
        }
    }
}

fn parse_tickers(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_uppercase())
        .filter(|s| !s.is_empty())
        .collect()
}
