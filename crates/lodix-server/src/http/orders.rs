use super::support::{finish, propagated_request_id, read_body, store_error};
use crate::AppState;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use lodix_api::{
    parse_create_order, parse_order_filter, parse_order_status_patch, parse_order_update,
    parse_page_params, ApiError, Pagination,
};
use lodix_model::Order;
use serde_json::{json, Value};
use std::collections::HashMap;

pub(crate) async fn list_orders(
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
    let filter = parse_order_filter(params)?;
    let (orders, total) = state
        .store
        .list_orders(&filter, page)
        .await
        .map_err(store_error)?;
    Ok(Json(json!({
        "orders": orders,
        "pagination": Pagination::new(page.page, page.limit, total),
    }))
    .into_response())
}

pub(crate) async fn create_order(
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
    let new_order = parse_create_order(read_body(body)?)?;
    let order = Order::create(new_order)?;
    state
        .store
        .insert_order(&order)
        .await
        .map_err(store_error)?;
    tracing::info!(order_id = %order.id, order_number = %order.order_number, "order created");
    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Order created successfully",
            "order": {
                "id": order.id,
                "orderNumber": order.order_number,
                "status": order.status,
                "createdAt": order.created_at,
            }
        })),
    )
        .into_response())
}

pub(crate) async fn get_order(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Response {
    let request_id = propagated_request_id(&headers, &state);
    let result = async {
        let order = state.store.get_order(&id).await.map_err(store_error)?;
        Ok(Json(json!({ "order": order })).into_response())
    }
    .await;
    finish(result, &request_id)
}

pub(crate) async fn update_order(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
    body: Result<Json<Value>, JsonRejection>,
) -> Response {
    let request_id = propagated_request_id(&headers, &state);
    let result = async {
        let patch = parse_order_update(read_body(body)?)?;
        let order = state
            .store
            .update_order(&id, patch)
            .await
            .map_err(store_error)?;
        Ok(Json(json!({
            "message": "Order updated successfully",
            "order": order,
        }))
        .into_response())
    }
    .await;
    finish(result, &request_id)
}

pub(crate) async fn delete_order(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Response {
    let request_id = propagated_request_id(&headers, &state);
    let result = async {
        state.store.delete_order(&id).await.map_err(store_error)?;
        Ok(Json(json!({
            "message": "Order deleted successfully",
            "orderId": id,
        }))
        .into_response())
    }
    .await;
    finish(result, &request_id)
}

pub(crate) async fn patch_order_status(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
    body: Result<Json<Value>, JsonRejection>,
) -> Response {
    let request_id = propagated_request_id(&headers, &state);
    let result = async {
        let next = parse_order_status_patch(read_body(body)?)?;
        let order = state
            .store
            .set_order_status(&id, next)
            .await
            .map_err(store_error)?;
        tracing::info!(order_id = %order.id, status = %order.status, "order status changed");
        Ok(Json(json!({
            "message": "Order status updated",
            "order": {
                "id": order.id,
                "orderNumber": order.order_number,
                "status": order.status,
                "updatedAt": order.updated_at,
            }
        }))
        .into_response())
    }
    .await;
    finish(result, &request_id)
}
