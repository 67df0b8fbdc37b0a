use super::support::{finish, propagated_request_id, read_body, store_error};
use crate::AppState;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use lodix_api::{
    parse_create_shipment, parse_page_params, parse_shipment_filter, parse_shipment_status_patch,
    parse_shipment_update, parse_tracking_request, ApiError, Pagination,
};
use serde_json::{json, Value};
use std::collections::HashMap;

pub(crate) async fn list_shipments(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    let request_id = propagated_request_id(&headers, &state);
    finish(list_inner(&state, &params).await, &request_id)
}

async fn list_inner(
    state: &AppState,
    params: &HashMap<String, String>,
) -> Result<Response, ApiError> {
    let page = parse_page_params(params, state.api.default_page_size, state.api.max_page_size)?;
    let filter = parse_shipment_filter(params)?;
    let (shipments, total) = state
        .store
        .list_shipments(&filter, page)
        .await
        .map_err(store_error)?;
    Ok(Json(json!({
        "shipments": shipments,
        "pagination": Pagination::new(page.page, page.limit, total),
    }))
    .into_response())
}

pub(crate) async fn create_shipment(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Result<Json<Value>, JsonRejection>,
) -> Response {
    let request_id = propagated_request_id(&headers, &state);
    finish(create_inner(&state, body).await, &request_id)
}

async fn create_inner(
    state: &AppState,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Response, ApiError> {
    let new_shipment = parse_create_shipment(read_body(body)?)?;
    let record = state
        .store
        .create_shipment(new_shipment)
        .await
        .map_err(store_error)?;
    let shipment = &record.shipment;
    tracing::info!(
        shipment_id = %shipment.id,
        shipment_number = %shipment.shipment_number,
        order_id = %shipment.order_id,
        "shipment created"
    );
    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Shipment created successfully",
            "shipment": {
                "id": shipment.id,
                "shipmentNumber": shipment.shipment_number,
                "status": shipment.status,
                "estimatedDelivery": shipment.estimated_delivery,
                "createdAt": shipment.created_at,
            }
        })),
    )
        .into_response())
}

pub(crate) async fn get_shipment(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Response {
    let request_id = propagated_request_id(&headers, &state);
    let result = async {
        let record = state.store.get_shipment(&id).await.map_err(store_error)?;
        Ok(Json(json!({ "shipment": record })).into_response())
    }
    .await;
    finish(result, &request_id)
}

pub(crate) async fn update_shipment(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
    body: Result<Json<Value>, JsonRejection>,
) -> Response {
    let request_id = propagated_request_id(&headers, &state);
    let result = async {
        let patch = parse_shipment_update(read_body(body)?)?;
        let record = state
            .store
            .update_shipment(&id, patch)
            .await
            .map_err(store_error)?;
        Ok(Json(json!({
            "message": "Shipment updated successfully",
            "shipment": record,
        }))
        .into_response())
    }
    .await;
    finish(result, &request_id)
}

pub(crate) async fn delete_shipment(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Response {
    let request_id = propagated_request_id(&headers, &state);
    let result = async {
        state
            .store
            .delete_shipment(&id)
            .await
            .map_err(store_error)?;
        Ok(Json(json!({
            "message": "Shipment deleted successfully",
            "shipmentId": id,
        }))
        .into_response())
    }
    .await;
    finish(result, &request_id)
}

/// Read-only slice of the tracking log, cheaper than the full document for
/// polling clients.
pub(crate) async fn get_tracking(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Response {
    let request_id = propagated_request_id(&headers, &state);
    let result = async {
        let record = state.store.get_shipment(&id).await.map_err(store_error)?;
        let shipment = &record.shipment;
        Ok(Json(json!({
            "shipmentNumber": shipment.shipment_number,
            "status": shipment.status,
            "trackingEvents": shipment.tracking_events,
            "estimatedDelivery": shipment.estimated_delivery,
            "actualDelivery": shipment.actual_delivery,
        }))
        .into_response())
    }
    .await;
    finish(result, &request_id)
}

pub(crate) async fn add_tracking_event(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
    body: Result<Json<Value>, JsonRejection>,
) -> Response {
    let request_id = propagated_request_id(&headers, &state);
    let result = async {
        let request = parse_tracking_request(read_body(body)?)?;
        let (shipment, event) = state
            .store
            .append_tracking(&id, request)
            .await
            .map_err(store_error)?;
        tracing::info!(
            shipment_id = %shipment.id,
            status = %shipment.status,
            "tracking event appended"
        );
        Ok((
            StatusCode::CREATED,
            Json(json!({
                "message": "Tracking event added",
                "trackingEvent": event,
                "newStatus": shipment.status,
            })),
        )
            .into_response())
    }
    .await;
    finish(result, &request_id)
}

pub(crate) async fn patch_shipment_status(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
    body: Result<Json<Value>, JsonRejection>,
) -> Response {
    let request_id = propagated_request_id(&headers, &state);
    let result = async {
        let status = parse_shipment_status_patch(read_body(body)?)?;
        let shipment = state
            .store
            .advance_shipment_status(&id, status)
            .await
            .map_err(store_error)?;
        tracing::info!(
            shipment_id = %shipment.id,
            status = %shipment.status,
            "shipment status changed"
        );
        Ok(Json(json!({
            "message": "Shipment status updated",
            "shipment": {
                "id": shipment.id,
                "shipmentNumber": shipment.shipment_number,
                "status": shipment.status,
                "updatedAt": shipment.updated_at,
            }
        }))
        .into_response())
    }
    .await;
    finish(result, &request_id)
}
