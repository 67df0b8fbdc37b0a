use crate::AppState;
use axum::extract::rejection::JsonRejection;
use axum::http::{HeaderMap, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use lodix_api::{map_error, ApiError};
use lodix_model::TransitionError;
use lodix_store::StoreError;
use serde_json::{json, Value};
use std::sync::atomic::Ordering;

pub(crate) fn api_error_response(err: &ApiError) -> Response {
    let status =
        StatusCode::from_u16(map_error(err)).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, Json(json!({ "error": err }))).into_response()
}

/// Tail call of every handler: unwrap or render the envelope, then stamp
/// the request id.
pub(crate) fn finish(result: Result<Response, ApiError>, request_id: &str) -> Response {
    let response = match result {
        Ok(response) => response,
        Err(err) => api_error_response(&err),
    };
    with_request_id(response, request_id)
}

/// The one place store failures become wire errors. Anything that is not an
/// operational outcome is logged here and degraded to a generic 500.
pub(crate) fn store_error(err: StoreError) -> ApiError {
    match err {
        StoreError::NotFound(what) => ApiError::not_found(what),
        StoreError::Conflict(message) => ApiError::conflict(message, json!({})),
        StoreError::Validation(inner) => inner.into(),
        StoreError::IllegalTransition { from, to } => TransitionError { from, to }.into(),
        other => {
            tracing::error!("storage failure: {other}");
            ApiError::internal()
        }
    }
}

pub(crate) fn make_request_id(state: &AppState) -> String {
    let id = state.request_id_seed.fetch_add(1, Ordering::Relaxed);
    format!("req-{id:016x}")
}

pub(crate) fn propagated_request_id(headers: &HeaderMap, state: &AppState) -> String {
    if let Some(raw) = headers.get("x-request-id").and_then(|v| v.to_str().ok()) {
        let trimmed = raw.trim();
        if !trimmed.is_empty() {
            return trimmed.to_string();
        }
    }
    if let Some(raw) = headers.get("traceparent").and_then(|v| v.to_str().ok()) {
        let trimmed = raw.trim();
        if !trimmed.is_empty() {
            return format!("trace-{trimmed}");
        }
    }
    make_request_id(state)
}

pub(crate) fn with_request_id(mut response: Response, request_id: &str) -> Response {
    if let Ok(value) = HeaderValue::from_str(request_id) {
        response.headers_mut().insert("x-request-id", value);
    }
    response
}

/// Body extraction failures (malformed JSON, wrong content type, over the
/// size limit) become validation errors in the shared envelope.
pub(crate) fn read_body(body: Result<Json<Value>, JsonRejection>) -> Result<Value, ApiError> {
    let Json(value) = body.map_err(|err| ApiError::validation_failed(err.body_text()))?;
    Ok(value)
}
