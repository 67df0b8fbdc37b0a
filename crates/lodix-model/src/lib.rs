#![forbid(unsafe_code)]
//! Lodix domain model SSOT.
//!
//! Every record the API serves round-trips through the types in this crate;
//! the store persists their serialized form verbatim, so wire names
//! (camelCase) are fixed here and nowhere else.

mod carrier;
mod order;
mod reference;
mod shipment;
mod status;

pub use carrier::{
    Availability, Carrier, Certification, CompanyType, Compliance, ContactInfo, Insurance,
    NewCarrier, OperatingHours, Performance, Pricing, ServiceArea, ServiceFlags, Vehicle,
    VehicleCapacity, VehicleType, SERVICE_FLAG_NAMES,
};
pub use order::{Cargo, Incoterms, NewOrder, Order, OrderSummary, Party, Priority};
pub use reference::{carrier_reference, document_id, order_number, shipment_number};
pub use shipment::{
    CarrierSnapshot, Location, NewShipment, PolylinePoint, RoutePlan, Shipment,
    ShipmentDocument, ShipmentException, TrackingEvent,
};
pub use status::{OrderStatus, ShipmentStatus, TransitionError};

pub const CRATE_NAME: &str = "lodix-model";

/// Display-only validation failure; the message is safe to surface to clients.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError(pub String);

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for ValidationError {}
