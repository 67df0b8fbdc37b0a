// SPDX-License-Identifier: Apache-2.0

use crate::errors::ApiError;
use lodix_model::{OrderStatus, Priority, ShipmentStatus, SERVICE_FLAG_NAMES};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::collections::HashMap;

pub const DEFAULT_PAGE_SIZE: u64 = 10;
pub const MAX_PAGE_SIZE: u64 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageParams {
    pub page: u64,
    pub limit: u64,
}

impl PageParams {
    #[must_use]
    pub fn offset(&self) -> u64 {
        self.page.saturating_sub(1).saturating_mul(self.limit)
    }
}

/// `page` defaults to 1, `limit` to `default_limit`; zero or out-of-range
/// values are rejected rather than clamped.
pub fn parse_page_params(
    query: &HashMap<String, String>,
    default_limit: u64,
    max_limit: u64,
) -> Result<PageParams, ApiError> {
    let page = match query.get("page") {
        Some(raw) => {
            let value = raw
                .parse::<u64>()
                .map_err(|_| ApiError::invalid_param("page", raw))?;
            if value == 0 {
                return Err(ApiError::invalid_param("page", raw));
            }
            value
        }
        None => 1,
    };
    let limit = match query.get("limit") {
        Some(raw) => {
            let value = raw
                .parse::<u64>()
                .map_err(|_| ApiError::invalid_param("limit", raw))?;
            if value == 0 || value > max_limit {
                return Err(ApiError::invalid_param("limit", raw));
            }
            value
        }
        None => default_limit,
    };
    // SQLite binds OFFSET as i64; a page whose offset cannot fit is as
    // unservable as a non-numeric one.
    match (page - 1).checked_mul(limit) {
        Some(offset) if offset <= i64::MAX as u64 => {}
        _ => return Err(ApiError::invalid_param("page", &page.to_string())),
    }
    Ok(PageParams { page, limit })
}

fn parse_enum_param<T: DeserializeOwned>(name: &str, raw: &str) -> Result<T, ApiError> {
    serde_json::from_value(Value::String(raw.to_string()))
        .map_err(|_| ApiError::invalid_param(name, raw))
}

#[derive(Debug, Clone, Default)]
pub struct OrderFilter {
    pub status: Option<OrderStatus>,
    pub priority: Option<Priority>,
    /// Matches shipper OR consignee country.
    pub country: Option<String>,
}

pub fn parse_order_filter(query: &HashMap<String, String>) -> Result<OrderFilter, ApiError> {
    let status = query
        .get("status")
        .map(|raw| parse_enum_param("status", raw))
        .transpose()?;
    let priority = query
        .get("priority")
        .map(|raw| parse_enum_param("priority", raw))
        .transpose()?;
    Ok(OrderFilter {
        status,
        priority,
        country: query.get("country").cloned(),
    })
}

#[derive(Debug, Clone, Default)]
pub struct ShipmentFilter {
    pub status: Option<ShipmentStatus>,
    /// Matches the denormalized carrier snapshot id.
    pub carrier_id: Option<String>,
    /// Matches origin OR destination country.
    pub country: Option<String>,
}

pub fn parse_shipment_filter(query: &HashMap<String, String>) -> Result<ShipmentFilter, ApiError> {
    let status = query
        .get("status")
        .map(|raw| parse_enum_param("status", raw))
        .transpose()?;
    Ok(ShipmentFilter {
        status,
        carrier_id: query.get("carrierId").cloned(),
        country: query.get("country").cloned(),
    })
}

#[derive(Debug, Clone, Default)]
pub struct CarrierFilter {
    pub country: Option<String>,
    /// One of the closed service-flag names; whitelisted because the store
    /// splices it into a JSON path.
    pub service: Option<String>,
    pub is_active: Option<bool>,
}

pub fn parse_carrier_filter(query: &HashMap<String, String>) -> Result<CarrierFilter, ApiError> {
    let service = match query.get("service") {
        Some(raw) if SERVICE_FLAG_NAMES.contains(&raw.as_str()) => Some(raw.clone()),
        Some(raw) => return Err(ApiError::invalid_param("service", raw)),
        None => None,
    };
    let is_active = match query.get("isActive") {
        Some(raw) => match raw.as_str() {
            "true" => Some(true),
            "false" => Some(false),
            _ => return Err(ApiError::invalid_param("isActive", raw)),
        },
        None => None,
    };
    Ok(CarrierFilter {
        country: query.get("country").cloned(),
        service,
        is_active,
    })
}
