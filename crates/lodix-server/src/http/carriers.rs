use super::support::{finish, propagated_request_id, read_body, store_error};
use crate::AppState;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use lodix_api::{
    parse_active_patch, parse_carrier_filter, parse_carrier_update, parse_create_carrier,
    parse_page_params, parse_performance_update, ApiError, Pagination,
};
use lodix_model::Carrier;
use serde_json::{json, Value};
use std::collections::HashMap;

pub(crate) async fn list_carriers(
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
    let filter = parse_carrier_filter(params)?;
    let (carriers, total) = state
        .store
        .list_carriers(&filter, page)
        .await
        .map_err(store_error)?;
    Ok(Json(json!({
        "carriers": carriers,
        "pagination": Pagination::new(page.page, page.limit, total),
    }))
    .into_response())
}

pub(crate) async fn create_carrier(
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
    let new_carrier = parse_create_carrier(read_body(body)?)?;
    let carrier = Carrier::create(new_carrier)?;
    state
        .store
        .insert_carrier(&carrier)
        .await
        .map_err(store_error)?;
    tracing::info!(carrier_id = %carrier.id, carrier_ref = %carrier.carrier_id, "carrier created");
    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Carrier created successfully",
            "carrier": {
                "id": carrier.id,
                "carrierId": carrier.carrier_id,
                "name": carrier.name,
                "companyType": carrier.company_type,
                "isActive": carrier.availability.is_active,
            }
        })),
    )
        .into_response())
}

pub(crate) async fn get_carrier(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Response {
    let request_id = propagated_request_id(&headers, &state);
    let result = async {
        let carrier = state.store.get_carrier(&id).await.map_err(store_error)?;
        Ok(Json(json!({ "carrier": carrier })).into_response())
    }
    .await;
    finish(result, &request_id)
}

pub(crate) async fn update_carrier(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
    body: Result<Json<Value>, JsonRejection>,
) -> Response {
    let request_id = propagated_request_id(&headers, &state);
    let result = async {
        let patch = parse_carrier_update(read_body(body)?)?;
        let carrier = state
            .store
            .update_carrier(&id, patch)
            .await
            .map_err(store_error)?;
        Ok(Json(json!({
            "message": "Carrier updated successfully",
            "carrier": carrier,
        }))
        .into_response())
    }
    .await;
    finish(result, &request_id)
}

pub(crate) async fn delete_carrier(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Response {
    let request_id = propagated_request_id(&headers, &state);
    let result = async {
        state.store.delete_carrier(&id).await.map_err(store_error)?;
        Ok(Json(json!({
            "message": "Carrier deleted successfully",
            "carrierId": id,
        }))
        .into_response())
    }
    .await;
    finish(result, &request_id)
}

pub(crate) async fn patch_carrier_status(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
    body: Result<Json<Value>, JsonRejection>,
) -> Response {
    let request_id = propagated_request_id(&headers, &state);
    let result = async {
        let active = parse_active_patch(read_body(body)?)?;
        let carrier = state
            .store
            .set_carrier_active(&id, active)
            .await
            .map_err(store_error)?;
        tracing::info!(carrier_id = %carrier.id, active, "carrier activation changed");
        Ok(Json(json!({
            "message": "Carrier status updated",
            "carrier": {
                "id": carrier.id,
                "carrierId": carrier.carrier_id,
                "name": carrier.name,
                "isActive": carrier.availability.is_active,
            }
        }))
        .into_response())
    }
    .await;
    finish(result, &request_id)
}

pub(crate) async fn get_carrier_performance(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Response {
    let request_id = propagated_request_id(&headers, &state);
    let result = async {
        let carrier = state.store.get_carrier(&id).await.map_err(store_error)?;
        Ok(Json(json!({
            "carrierId": carrier.carrier_id,
            "name": carrier.name,
            "performance": carrier.performance,
        }))
        .into_response())
    }
    .await;
    finish(result, &request_id)
}

pub(crate) async fn update_carrier_performance(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
    body: Result<Json<Value>, JsonRejection>,
) -> Response {
    let request_id = propagated_request_id(&headers, &state);
    let result = async {
        let update = parse_performance_update(read_body(body)?)?;
        let carrier = state
            .store
            .update_carrier_performance(&id, update)
            .await
            .map_err(store_error)?;
        Ok(Json(json!({
            "message": "Carrier performance updated",
            "performance": carrier.performance,
        }))
        .into_response())
    }
    .await;
    finish(result, &request_id)
}
