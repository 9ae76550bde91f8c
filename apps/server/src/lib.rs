//! HTTP server exposing the stock metadata and price history read API, the
//! health probe, and the shared-secret sync trigger.

pub mod api;
pub mod config;
pub mod error;
pub mod main_lib;
pub mod scheduler;

pub use config::Config;
pub use main_lib::{build_state, build_state_with_provider, init_tracing, AppState};
