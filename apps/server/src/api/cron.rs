use std::sync::Arc;

use axum::extract::State;
use axum::http::{header, HeaderMap};
use axum::routing::get;
use axum::{Json, Router};
use serde_json::json;

use crate::error::{ApiError, ApiResult};
use crate::main_lib::AppState;

/// Shared-secret trigger for an immediate sync run.
///
/// Authorization happens before any work starts. The configured secret never
/// appears in the response or the logs. The run itself executes inline;
/// per-symbol failures are reported in the summary rather than as an HTTP
/// error, so a partially failed run still acknowledges with 200.
async fn trigger_sync(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> ApiResult<Json<serde_json::Value>> {
    if !is_authorized(&headers, state.cron_secret.as_deref()) {
        return Err(ApiError::Unauthorized);
    }

    tracing::info!("Sync triggered via cron endpoint");
    let report = state.ingest.sync_tickers().await;

    Ok(Json(json!({
        "status": "Sync initiated",
        "updated": report.updated,
        "noData": report.no_data,
        "failed": report.failed,
        "barsWritten": report.bars_written,
    })))
}

/// When a secret is configured the bearer token must match it exactly. With
/// no secret configured the endpoint is deliberately open; deployments are
/// expected to set one.
fn is_authorized(headers: &HeaderMap, secret: Option<&str>) -> bool {
    let Some(secret) = secret else {
        return true;
    };
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .is_some_and(|token| token == secret)
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/cron/sync", get(trigger_sync))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers_with(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn matching_bearer_token_is_authorized() {
        assert!(is_authorized(&headers_with("Bearer s3cret"), Some("s3cret")));
    }

    #[test]
    fn wrong_token_or_missing_header_is_rejected() {
        assert!(!is_authorized(&headers_with("Bearer nope"), Some("s3cret")));
        assert!(!is_authorized(&HeaderMap::new(), Some("s3cret")));
        // Scheme must be Bearer
        assert!(!is_authorized(&headers_with("Basic s3cret"), Some("s3cret")));
    }

    #[test]
    fn unset_secret_leaves_the_endpoint_open() {
        assert!(is_authorized(&HeaderMap::new(), None));
        assert!(is_authorized(&headers_with("Bearer anything"), None));
    }
}
