mod cron;
mod health;
mod stocks;

use std::sync::Arc;

use axum::routing::get;
use axum::{Json, Router};
use serde_json::json;
use tower_http::trace::TraceLayer;

use crate::main_lib::AppState;

async fn root() -> Json<serde_json::Value> {
    Json(json!({ "message": "Share Market Data API" }))
}

pub fn app_router(state: Arc<AppState>) -> Router {
    let v1 = Router::new()
        .merge(stocks::router())
        .merge(health::router())
        .merge(cron::router());

    Router::new()
        .route("/", get(root))
        .nest("/api/v1", v1)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
