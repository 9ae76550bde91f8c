//! Domain layer for the share market data service.
//!
//! This crate is database- and transport-agnostic. It defines:
//! - The domain model (stocks, daily OHLCV bars)
//! - The storage contract ([`stocks::store::StockStore`]) implemented by
//!   `sharemarket-storage-sqlite`
//! - The provider contract ([`providers::MarketDataProvider`]) implemented by
//!   `sharemarket-market-data`
//! - The ingestion engine ([`ingest::IngestService`]) that ties the two
//!   together
//!
//! ```text
//!   providers (fetch)          stocks::store (persist)
//!         │                           │
//!         └────────┬──────────────────┘
//!                  │
//!                  ▼
//!          ingest (this crate)
//! ```

pub mod errors;
pub mod ingest;
pub mod providers;
pub mod stocks;

pub use errors::{DatabaseError, Error, Result};
