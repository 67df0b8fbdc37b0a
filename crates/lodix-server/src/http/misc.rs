use super::support::{api_error_response, propagated_request_id, with_request_id};
use crate::AppState;
use axum::extract::State;
use axum::http::{HeaderMap, Uri};
use axum::response::{IntoResponse, Response};
use axum::Json;
use lodix_api::{ApiError, ApiErrorCode};
use serde_json::json;

pub(crate) async fn root_banner(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let request_id = propagated_request_id(&headers, &state);
    let body = json!({
        "message": "Lodix logistics API",
        "version": env!("CARGO_PKG_VERSION"),
        "status": "running",
        "timestamp": chrono::Utc::now(),
    });
    with_request_id(Json(body).into_response(), &request_id)
}

/// Fallback for everything outside the route table; echoes the attempted
/// path so clients can spot typos.
pub(crate) async fn unknown_route(
    State(state): State<AppState>,
    headers: HeaderMap,
    uri: Uri,
) -> Response {
    let request_id = propagated_request_id(&headers, &state);
    let err = ApiError::new(
        ApiErrorCode::NotFound,
        "Route not found",
        json!({ "path": uri.path() }),
    );
    with_request_id(api_error_response(&err), &request_id)
}
