// SPDX-License-Identifier: Apache-2.0

use crate::errors::ApiError;
use chrono::{DateTime, Utc};
use lodix_model::{
    Cargo, CarrierSnapshot, Certification, CompanyType, Compliance, ContactInfo, Incoterms,
    Location, NewCarrier, NewOrder, NewShipment, OrderStatus, Party, Pricing, Priority,
    RoutePlan, ServiceArea, ServiceFlags, ShipmentStatus, Vehicle,
};
use serde::Deserialize;
use serde_json::{Map, Value};

/// Fields a PUT can never overwrite. Status and the tracking log are listed
/// for shipments because status only moves through the event append path.
const ORDER_PROTECTED: [&str; 5] = ["id", "orderNumber", "status", "createdAt", "updatedAt"];
const SHIPMENT_PROTECTED: [&str; 9] = [
    "id",
    "shipmentNumber",
    "orderId",
    "status",
    "trackingEvents",
    "actualPickup",
    "actualDelivery",
    "createdAt",
    "updatedAt",
];
const CARRIER_PROTECTED: [&str; 4] = ["id", "carrierId", "createdAt", "updatedAt"];

fn require_object<'a>(body: &'a Value) -> Result<&'a Map<String, Value>, ApiError> {
    body.as_object()
        .ok_or_else(|| ApiError::validation_failed("request body must be a JSON object"))
}

/// Presence check mirrors the envelope contract: absent and `null` both
/// count as missing, reported together in one response.
fn require_fields(body: &Value, required: &[&str]) -> Result<(), ApiError> {
    let obj = require_object(body)?;
    let missing: Vec<&str> = required
        .iter()
        .filter(|name| obj.get(**name).map_or(true, Value::is_null))
        .copied()
        .collect();
    if missing.is_empty() {
        Ok(())
    } else {
        Err(ApiError::missing_fields(&missing))
    }
}

fn deserialize_body<T: serde::de::DeserializeOwned>(body: Value) -> Result<T, ApiError> {
    serde_json::from_value(body).map_err(|err| ApiError::validation_failed(err.to_string()))
}

fn sanitized_update(body: Value, protected: &[&str]) -> Result<Map<String, Value>, ApiError> {
    let mut obj = require_object(&body)?.clone();
    for name in protected {
        obj.remove(*name);
    }
    Ok(obj)
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateOrderBody {
    shipper: Party,
    consignee: Party,
    cargo: Cargo,
    incoterms: Incoterms,
    total_value: f64,
    #[serde(default)]
    currency: Option<String>,
    #[serde(default)]
    priority: Option<Priority>,
}

pub fn parse_create_order(body: Value) -> Result<NewOrder, ApiError> {
    require_fields(
        &body,
        &["shipper", "consignee", "cargo", "incoterms", "totalValue"],
    )?;
    let parsed: CreateOrderBody = deserialize_body(body)?;
    Ok(NewOrder {
        shipper: parsed.shipper,
        consignee: parsed.consignee,
        cargo: parsed.cargo,
        incoterms: parsed.incoterms,
        total_value: parsed.total_value,
        currency: parsed.currency,
        priority: parsed.priority,
    })
}

pub fn parse_order_update(body: Value) -> Result<Map<String, Value>, ApiError> {
    sanitized_update(body, &ORDER_PROTECTED)
}

pub fn parse_order_status_patch(body: Value) -> Result<OrderStatus, ApiError> {
    parse_status_patch(body)
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateShipmentBody {
    order_id: String,
    carrier: CarrierSnapshot,
    origin: Location,
    destination: Location,
    #[serde(default)]
    waypoints: Vec<Location>,
    #[serde(default)]
    route: Option<RoutePlan>,
    estimated_pickup: DateTime<Utc>,
    estimated_delivery: DateTime<Utc>,
}

pub fn parse_create_shipment(body: Value) -> Result<NewShipment, ApiError> {
    require_fields(
        &body,
        &[
            "orderId",
            "carrier",
            "origin",
            "destination",
            "estimatedPickup",
            "estimatedDelivery",
        ],
    )?;
    let parsed: CreateShipmentBody = deserialize_body(body)?;
    Ok(NewShipment {
        order_id: parsed.order_id,
        carrier: parsed.carrier,
        origin: parsed.origin,
        destination: parsed.destination,
        waypoints: parsed.waypoints,
        route: parsed.route,
        estimated_pickup: parsed.estimated_pickup,
        estimated_delivery: parsed.estimated_delivery,
    })
}

pub fn parse_shipment_update(body: Value) -> Result<Map<String, Value>, ApiError> {
    sanitized_update(body, &SHIPMENT_PROTECTED)
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackingRequest {
    pub status: ShipmentStatus,
    pub location: Location,
    #[serde(default)]
    pub notes: Option<String>,
    pub updated_by: String,
}

pub fn parse_tracking_request(body: Value) -> Result<TrackingRequest, ApiError> {
    require_fields(&body, &["status", "location", "updatedBy"])?;
    deserialize_body(body)
}

pub fn parse_shipment_status_patch(body: Value) -> Result<ShipmentStatus, ApiError> {
    parse_status_patch(body)
}

fn parse_status_patch<T: serde::de::DeserializeOwned>(body: Value) -> Result<T, ApiError> {
    let obj = require_object(&body)?;
    let status = obj
        .get("status")
        .filter(|value| !value.is_null())
        .ok_or_else(|| ApiError::validation_failed("Status is required"))?;
    serde_json::from_value(status.clone())
        .map_err(|_| ApiError::validation_failed(format!("unknown status: {status}")))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateCarrierBody {
    name: String,
    company_type: CompanyType,
    contact_info: ContactInfo,
    #[serde(default)]
    services: Option<ServiceFlags>,
    #[serde(default)]
    vehicles: Vec<Vehicle>,
    #[serde(default)]
    service_areas: Vec<ServiceArea>,
    #[serde(default)]
    certifications: Vec<Certification>,
    pricing: Pricing,
    compliance: Compliance,
}

pub fn parse_create_carrier(body: Value) -> Result<NewCarrier, ApiError> {
    require_fields(
        &body,
        &["name", "companyType", "contactInfo", "pricing", "compliance"],
    )?;
    let parsed: CreateCarrierBody = deserialize_body(body)?;
    Ok(NewCarrier {
        name: parsed.name,
        company_type: parsed.company_type,
        contact_info: parsed.contact_info,
        services: parsed.services,
        vehicles: parsed.vehicles,
        service_areas: parsed.service_areas,
        certifications: parsed.certifications,
        pricing: parsed.pricing,
        compliance: parsed.compliance,
    })
}

pub fn parse_carrier_update(body: Value) -> Result<Map<String, Value>, ApiError> {
    sanitized_update(body, &CARRIER_PROTECTED)
}

pub fn parse_active_patch(body: Value) -> Result<bool, ApiError> {
    let obj = require_object(&body)?;
    match obj.get("isActive") {
        Some(Value::Bool(value)) => Ok(*value),
        _ => Err(ApiError::validation_failed("isActive must be a boolean")),
    }
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceUpdate {
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default)]
    pub on_time_delivery: Option<f64>,
    #[serde(default)]
    pub damage_rate: Option<f64>,
}

pub fn parse_performance_update(body: Value) -> Result<PerformanceUpdate, ApiError> {
    require_object(&body)?;
    deserialize_body(body)
}
