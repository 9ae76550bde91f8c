//! Background scheduler for periodic ingestion runs.

use std::sync::Arc;
use tokio::time::{interval, Duration};
use tracing::{info, warn};

use crate::main_lib::AppState;

/// Initial delay before the first run, so startup traffic settles first.
const INITIAL_DELAY_SECS: u64 = 60;

/// Starts the periodic sync loop. A zero interval disables scheduling; the
/// trigger endpoint remains the only way to start a run.
pub fn start_sync_scheduler(state: Arc<AppState>, interval_secs: u64) {
    if interval_secs == 0 {
        info!("Background sync scheduler disabled");
        return;
    }

    tokio::spawn(async move {
        info!("Sync scheduler started ({}s interval)", interval_secs);
        tokio::time::sleep(Duration::from_secs(INITIAL_DELAY_SECS)).await;

        let mut sync_interval = interval(Duration::from_secs(interval_secs));
        loop {
            sync_interval.tick().await;
            let report = state.ingest.sync_tickers().await;
            if report.is_success() {
                info!("Scheduled sync completed: {}", report.summary());
            } else {
                warn!("Scheduled sync had failures: {}", report.summary());
            }
        }
    });
}
