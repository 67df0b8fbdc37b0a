#![forbid(unsafe_code)]
//! HTTP layer: routing, per-resource handlers, and the shared state they
//! work against. All domain logic lives below in `lodix-store` and
//! `lodix-model`; handlers translate between the wire and those crates.

mod config;
mod http;

pub use config::{validate_startup_config, ApiConfig};

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, patch};
use axum::Router;
use lodix_store::Store;
use std::sync::atomic::AtomicU64;
use std::sync::Arc;
use std::time::Instant;

pub const CRATE_NAME: &str = "lodix-server";

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<Store>,
    pub api: ApiConfig,
    pub started: Instant,
    pub request_id_seed: Arc<AtomicU64>,
}

impl AppState {
    #[must_use]
    pub fn new(store: Arc<Store>, api: ApiConfig) -> Self {
        Self {
            store,
            api,
            started: Instant::now(),
            request_id_seed: Arc::new(AtomicU64::new(1)),
        }
    }
}

pub fn build_router(state: AppState) -> Router {
    let max_body = state.api.max_body_bytes;
    Router::new()
        .route("/", get(http::root_banner))
        .route("/api/health", get(http::health))
        .route(
            "/api/orders",
            get(http::list_orders).post(http::create_order),
        )
        .route(
            "/api/orders/:id",
            get(http::get_order)
                .put(http::update_order)
                .delete(http::delete_order),
        )
        .route("/api/orders/:id/status", patch(http::patch_order_status))
        .route(
            "/api/shipments",
            get(http::list_shipments).post(http::create_shipment),
        )
        .route(
            "/api/shipments/:id",
            get(http::get_shipment)
                .put(http::update_shipment)
                .delete(http::delete_shipment),
        )
        .route(
            "/api/shipments/:id/tracking",
            get(http::get_tracking).post(http::add_tracking_event),
        )
        .route(
            "/api/shipments/:id/status",
            patch(http::patch_shipment_status),
        )
        .route(
            "/api/carriers",
            get(http::list_carriers).post(http::create_carrier),
        )
        .route(
            "/api/carriers/:id",
            get(http::get_carrier)
                .put(http::update_carrier)
                .delete(http::delete_carrier),
        )
        .route(
            "/api/carriers/:id/status",
            patch(http::patch_carrier_status),
        )
        .route(
            "/api/carriers/:id/performance",
            get(http::get_carrier_performance).post(http::update_carrier_performance),
        )
        .fallback(http::unknown_route)
        .layer(DefaultBodyLimit::max(max_body))
        .with_state(state)
}
