use crate::status::{ShipmentStatus, TransitionError};
use crate::{reference, ValidationError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
    pub address: String,
    pub city: String,
    pub country: String,
    pub postal_code: String,
    #[serde(default = "Utc::now")]
    pub timestamp: DateTime<Utc>,
}

/// Denormalized copy of carrier contact data taken at assignment time.
/// Deliberately not a live reference: later carrier edits never propagate
/// to existing shipments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CarrierSnapshot {
    pub id: String,
    pub name: String,
    pub contact_person: String,
    pub email: String,
    pub phone: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PolylinePoint {
    pub lat: f64,
    pub lng: f64,
}

/// Client-supplied route estimate; no route computation happens server-side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoutePlan {
    pub total_distance: f64,
    pub estimated_duration: f64,
    pub estimated_cost: f64,
    pub co2_footprint: f64,
    #[serde(default)]
    pub route_polyline: Vec<PolylinePoint>,
}

impl Default for RoutePlan {
    fn default() -> Self {
        Self {
            total_distance: 0.0,
            estimated_duration: 0.0,
            estimated_cost: 0.0,
            co2_footprint: 0.0,
            route_polyline: Vec::new(),
        }
    }
}

impl RoutePlan {
    pub fn validate(&self) -> Result<(), ValidationError> {
        for (name, value) in [
            ("totalDistance", self.total_distance),
            ("estimatedDuration", self.estimated_duration),
            ("estimatedCost", self.estimated_cost),
            ("co2Footprint", self.co2_footprint),
        ] {
            if value < 0.0 {
                return Err(ValidationError(format!("route {name} must be >= 0")));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackingEvent {
    pub status: ShipmentStatus,
    pub location: Location,
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub updated_by: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShipmentException {
    #[serde(rename = "type")]
    pub kind: String,
    pub description: String,
    #[serde(default = "Utc::now")]
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub resolved: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShipmentDocument {
    #[serde(rename = "type")]
    pub kind: String,
    pub filename: String,
    pub url: String,
    #[serde(default = "Utc::now")]
    pub uploaded_at: DateTime<Utc>,
}

/// Validated input for shipment creation.
#[derive(Debug, Clone)]
pub struct NewShipment {
    pub order_id: String,
    pub carrier: CarrierSnapshot,
    pub origin: Location,
    pub destination: Location,
    pub waypoints: Vec<Location>,
    pub route: Option<RoutePlan>,
    pub estimated_pickup: DateTime<Utc>,
    pub estimated_delivery: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Shipment {
    pub id: String,
    pub shipment_number: String,
    pub order_id: String,
    pub carrier: CarrierSnapshot,
    pub origin: Location,
    pub destination: Location,
    #[serde(default)]
    pub waypoints: Vec<Location>,
    pub route: RoutePlan,
    pub status: ShipmentStatus,
    #[serde(default)]
    pub tracking_events: Vec<TrackingEvent>,
    pub estimated_pickup: DateTime<Utc>,
    pub estimated_delivery: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actual_pickup: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actual_delivery: Option<DateTime<Utc>>,
    #[serde(default)]
    pub exceptions: Vec<ShipmentException>,
    #[serde(default)]
    pub documents: Vec<ShipmentDocument>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Shipment {
    /// Builds a fresh `pending` shipment with an empty tracking log.
    pub fn create(new: NewShipment) -> Result<Self, ValidationError> {
        let now = Utc::now();
        let shipment = Self {
            id: reference::document_id(),
            shipment_number: reference::shipment_number(),
            order_id: new.order_id,
            carrier: new.carrier,
            origin: new.origin,
            destination: new.destination,
            waypoints: new.waypoints,
            route: new.route.unwrap_or_default(),
            status: ShipmentStatus::Pending,
            tracking_events: Vec::new(),
            estimated_pickup: new.estimated_pickup,
            estimated_delivery: new.estimated_delivery,
            actual_pickup: None,
            actual_delivery: None,
            exceptions: Vec::new(),
            documents: Vec::new(),
            created_at: now,
            updated_at: now,
        };
        shipment.validate()?;
        Ok(shipment)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        self.route.validate()
    }

    /// Appends a tracking event and moves the top-level status with it.
    ///
    /// This is the only path that changes `status`, which keeps the field
    /// equal to the status of the most recent event. The supplied location
    /// is re-stamped at append time; events therefore sort in submission
    /// order regardless of any client-claimed timestamp.
    pub fn append_tracking_event(
        &mut self,
        status: ShipmentStatus,
        mut location: Location,
        notes: Option<String>,
        updated_by: String,
    ) -> Result<TrackingEvent, TransitionError> {
        self.status = self.status.transition_to(status)?;
        let now = Utc::now();
        location.timestamp = now;
        let event = TrackingEvent {
            status,
            location,
            timestamp: now,
            notes,
            updated_by,
        };
        self.tracking_events.push(event.clone());
        match status {
            ShipmentStatus::PickedUp if self.actual_pickup.is_none() => {
                self.actual_pickup = Some(now);
            }
            ShipmentStatus::Delivered if self.actual_delivery.is_none() => {
                self.actual_delivery = Some(now);
            }
            _ => {}
        }
        self.updated_at = now;
        Ok(event)
    }

    /// Best location to attribute to a status change that arrives without
    /// one: the latest scan, else the origin.
    #[must_use]
    pub fn last_known_location(&self) -> Location {
        self.tracking_events
            .last()
            .map(|event| event.location.clone())
            .unwrap_or_else(|| self.origin.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn location(city: &str) -> Location {
        Location {
            latitude: 51.26,
            longitude: 4.40,
            address: "Kaai 12".to_string(),
            city: city.to_string(),
            country: "BE".to_string(),
            postal_code: "2030".to_string(),
            timestamp: Utc::now(),
        }
    }

    fn new_shipment() -> NewShipment {
        NewShipment {
            order_id: "order-1".to_string(),
            carrier: CarrierSnapshot {
                id: "carrier-1".to_string(),
                name: "TransEuro".to_string(),
                contact_person: "M. Dubois".to_string(),
                email: "dispatch@transeuro.example".to_string(),
                phone: "+32 2 555 0199".to_string(),
            },
            origin: location("Antwerp"),
            destination: location("Hamburg"),
            waypoints: Vec::new(),
            route: None,
            estimated_pickup: Utc::now(),
            estimated_delivery: Utc::now(),
        }
    }

    #[test]
    fn create_starts_pending_with_empty_log() {
        let shipment = Shipment::create(new_shipment()).expect("create shipment");
        assert_eq!(shipment.status, ShipmentStatus::Pending);
        assert!(shipment.tracking_events.is_empty());
        assert!(shipment.shipment_number.starts_with("SHP-"));
        assert_eq!(shipment.route, RoutePlan::default());
    }

    #[test]
    fn create_rejects_negative_route_estimates() {
        let mut input = new_shipment();
        input.route = Some(RoutePlan {
            estimated_cost: -5.0,
            ..RoutePlan::default()
        });
        assert!(Shipment::create(input).is_err());
    }

    #[test]
    fn tracking_event_moves_status_in_lockstep() {
        let mut shipment = Shipment::create(new_shipment()).expect("create shipment");
        let event = shipment
            .append_tracking_event(
                ShipmentStatus::InTransit,
                location("Breda"),
                Some("crossed the border".to_string()),
                "dispatcher".to_string(),
            )
            .expect("append event");
        assert_eq!(shipment.status, ShipmentStatus::InTransit);
        assert_eq!(shipment.tracking_events.len(), 1);
        assert_eq!(shipment.tracking_events[0], event);
        assert_eq!(event.location.timestamp, event.timestamp);
    }

    #[test]
    fn backward_event_is_rejected_and_log_untouched() {
        let mut shipment = Shipment::create(new_shipment()).expect("create shipment");
        shipment
            .append_tracking_event(
                ShipmentStatus::OutForDelivery,
                location("Hamburg"),
                None,
                "driver".to_string(),
            )
            .expect("forward event");
        let err = shipment.append_tracking_event(
            ShipmentStatus::PickedUp,
            location("Hamburg"),
            None,
            "driver".to_string(),
        );
        assert!(err.is_err());
        assert_eq!(shipment.tracking_events.len(), 1);
        assert_eq!(shipment.status, ShipmentStatus::OutForDelivery);
    }

    #[test]
    fn delivery_event_stamps_actual_delivery() {
        let mut shipment = Shipment::create(new_shipment()).expect("create shipment");
        shipment
            .append_tracking_event(
                ShipmentStatus::PickedUp,
                location("Antwerp"),
                None,
                "driver".to_string(),
            )
            .expect("pickup");
        assert!(shipment.actual_pickup.is_some());
        assert!(shipment.actual_delivery.is_none());
        shipment
            .append_tracking_event(
                ShipmentStatus::Delivered,
                location("Hamburg"),
                None,
                "driver".to_string(),
            )
            .expect("delivery");
        assert!(shipment.actual_delivery.is_some());
    }

    #[test]
    fn last_known_location_prefers_latest_event() {
        let mut shipment = Shipment::create(new_shipment()).expect("create shipment");
        assert_eq!(shipment.last_known_location().city, "Antwerp");
        shipment
            .append_tracking_event(
                ShipmentStatus::InTransit,
                location("Breda"),
                None,
                "driver".to_string(),
            )
            .expect("event");
        assert_eq!(shipment.last_known_location().city, "Breda");
    }
}
