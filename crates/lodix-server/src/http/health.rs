use super::support::{propagated_request_id, with_request_id};
use crate::AppState;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use std::time::Duration;

pub(crate) async fn health(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let request_id = propagated_request_id(&headers, &state);
    let database = match state.store.ping().await {
        Ok(()) => "connected",
        Err(err) => {
            tracing::error!("health check ping failed: {err}");
            "error"
        }
    };
    let documents = state.store.document_counts().await.ok();
    let healthy = database == "connected";
    let body = json!({
        "status": if healthy { "healthy" } else { "degraded" },
        "timestamp": chrono::Utc::now(),
        "uptime": format_uptime(state.started.elapsed()),
        "database": database,
        "memory": resident_memory_bytes(),
        "documents": documents,
    });
    let status = if healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    with_request_id((status, Json(body)).into_response(), &request_id)
}

fn format_uptime(elapsed: Duration) -> String {
    let secs = elapsed.as_secs();
    format!("{}m{}s", secs / 60, secs % 60)
}

/// Resident set size on Linux, `None` elsewhere.
fn resident_memory_bytes() -> Option<u64> {
    let statm = std::fs::read_to_string("/proc/self/statm").ok()?;
    let pages: u64 = statm.split_whitespace().nth(1)?.parse().ok()?;
    Some(pages * 4096)
}
