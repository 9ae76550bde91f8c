//! Market data provider implementations.
//!
//! Currently a single provider: Yahoo Finance, which covers both NSE (`.NS`)
//! and BSE (`.BO`) listed symbols.

pub mod provider;

pub use provider::yahoo::YahooProvider;
