//! SQLite storage implementation for the share market data service.
//!
//! This crate is the only place in the workspace where Diesel dependencies
//! exist. It owns:
//! - Database connection pooling and pragma setup
//! - Embedded Diesel migrations (the `stocks` and `market_data` tables)
//! - The single-writer actor that serializes all writes
//! - The [`stocks::StockRepository`] implementing the store trait defined in
//!   `sharemarket-core`

pub mod db;
pub mod errors;
pub mod schema;
pub mod stocks;

pub use db::{
    create_pool, get_connection, init, run_migrations, spawn_writer, DbConnection, DbPool,
    WriteHandle,
};
pub use errors::{IntoCore, StorageError};

// Re-export from sharemarket-core for convenience
pub use sharemarket_core::errors::{DatabaseError, Error, Result};
