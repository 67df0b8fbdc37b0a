// SPDX-License-Identifier: Apache-2.0

#![forbid(unsafe_code)]
//! Wire contract shared by every Lodix resource service: the error
//! envelope, its HTTP status mapping, and query/body parameter parsing.
//! No I/O happens here.

mod error_mapping;
mod errors;
mod params;
mod requests;
mod responses;

pub use error_mapping::map_error;
pub use errors::{ApiError, ApiErrorCode};
pub use params::{
    parse_carrier_filter, parse_order_filter, parse_page_params, parse_shipment_filter,
    CarrierFilter, OrderFilter, PageParams, ShipmentFilter, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE,
};
pub use requests::{
    parse_active_patch, parse_carrier_update, parse_create_carrier, parse_create_order,
    parse_create_shipment, parse_order_status_patch, parse_order_update,
    parse_performance_update, parse_shipment_status_patch, parse_shipment_update,
    parse_tracking_request, PerformanceUpdate, TrackingRequest,
};
pub use responses::Pagination;

pub const CRATE_NAME: &str = "lodix-api";
