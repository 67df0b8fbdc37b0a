use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Rejected status change. Both ends are wire-format status names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransitionError {
    pub from: &'static str,
    pub to: &'static str,
}

impl Display for TransitionError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "illegal status transition from {} to {}", self.from, self.to)
    }
}

impl std::error::Error for TransitionError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Draft,
    Confirmed,
    Processing,
    Shipped,
    Delivered,
    Cancelled,
}

impl Default for OrderStatus {
    fn default() -> Self {
        Self::Draft
    }
}

impl OrderStatus {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Confirmed => "confirmed",
            Self::Processing => "processing",
            Self::Shipped => "shipped",
            Self::Delivered => "delivered",
            Self::Cancelled => "cancelled",
        }
    }

    /// Allowed successor states. `draft -> processing` is legal because
    /// creating a shipment against a draft order flips it directly.
    #[must_use]
    pub fn can_transition_to(self, next: Self) -> bool {
        use OrderStatus::{Cancelled, Confirmed, Delivered, Draft, Processing, Shipped};
        matches!(
            (self, next),
            (Draft, Confirmed | Processing | Cancelled)
                | (Confirmed, Processing | Cancelled)
                | (Processing, Shipped | Cancelled)
                | (Shipped, Delivered)
        )
    }

    pub fn transition_to(self, next: Self) -> Result<Self, TransitionError> {
        if self.can_transition_to(next) {
            Ok(next)
        } else {
            Err(TransitionError {
                from: self.as_str(),
                to: next.as_str(),
            })
        }
    }
}

impl Display for OrderStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShipmentStatus {
    Pending,
    Assigned,
    PickedUp,
    InTransit,
    OutForDelivery,
    Delivered,
    Exception,
}

impl Default for ShipmentStatus {
    fn default() -> Self {
        Self::Pending
    }
}

impl ShipmentStatus {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Assigned => "assigned",
            Self::PickedUp => "picked_up",
            Self::InTransit => "in_transit",
            Self::OutForDelivery => "out_for_delivery",
            Self::Delivered => "delivered",
            Self::Exception => "exception",
        }
    }

    /// Position in the normal delivery progression; `exception` sits outside it.
    fn rank(self) -> Option<u8> {
        match self {
            Self::Pending => Some(0),
            Self::Assigned => Some(1),
            Self::PickedUp => Some(2),
            Self::InTransit => Some(3),
            Self::OutForDelivery => Some(4),
            Self::Delivered => Some(5),
            Self::Exception => None,
        }
    }

    /// Forward moves may skip stages (carriers miss scans), backward moves
    /// are rejected. Repeating the current status is a legal observation.
    /// `exception` is reachable from anything not yet delivered and resolves
    /// to any in-progress stage.
    #[must_use]
    pub fn can_transition_to(self, next: Self) -> bool {
        if self == next {
            return true;
        }
        match (self.rank(), next.rank()) {
            (Some(_), None) => self != Self::Delivered,
            (None, Some(rank)) => rank > 0,
            (Some(from), Some(to)) => to > from,
            (None, None) => false,
        }
    }

    pub fn transition_to(self, next: Self) -> Result<Self, TransitionError> {
        if self.can_transition_to(next) {
            Ok(next)
        } else {
            Err(TransitionError {
                from: self.as_str(),
                to: next.as_str(),
            })
        }
    }
}

impl Display for ShipmentStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn order_lifecycle_moves_forward_only() {
        assert!(OrderStatus::Draft.can_transition_to(OrderStatus::Confirmed));
        assert!(OrderStatus::Draft.can_transition_to(OrderStatus::Processing));
        assert!(OrderStatus::Confirmed.can_transition_to(OrderStatus::Processing));
        assert!(OrderStatus::Processing.can_transition_to(OrderStatus::Shipped));
        assert!(OrderStatus::Shipped.can_transition_to(OrderStatus::Delivered));

        assert!(!OrderStatus::Delivered.can_transition_to(OrderStatus::Draft));
        assert!(!OrderStatus::Cancelled.can_transition_to(OrderStatus::Confirmed));
        assert!(!OrderStatus::Shipped.can_transition_to(OrderStatus::Processing));
        assert!(!OrderStatus::Draft.can_transition_to(OrderStatus::Delivered));
    }

    #[test]
    fn cancellation_is_blocked_once_shipped() {
        assert!(OrderStatus::Draft.can_transition_to(OrderStatus::Cancelled));
        assert!(OrderStatus::Processing.can_transition_to(OrderStatus::Cancelled));
        assert!(!OrderStatus::Shipped.can_transition_to(OrderStatus::Cancelled));
        assert!(!OrderStatus::Delivered.can_transition_to(OrderStatus::Cancelled));
    }

    #[test]
    fn shipment_progression_allows_skipped_scans() {
        assert!(ShipmentStatus::Pending.can_transition_to(ShipmentStatus::InTransit));
        assert!(ShipmentStatus::Assigned.can_transition_to(ShipmentStatus::Delivered));
        assert!(!ShipmentStatus::InTransit.can_transition_to(ShipmentStatus::Assigned));
        assert!(!ShipmentStatus::Delivered.can_transition_to(ShipmentStatus::Pending));
    }

    #[test]
    fn exception_path_excludes_delivered_shipments() {
        assert!(ShipmentStatus::Pending.can_transition_to(ShipmentStatus::Exception));
        assert!(ShipmentStatus::OutForDelivery.can_transition_to(ShipmentStatus::Exception));
        assert!(!ShipmentStatus::Delivered.can_transition_to(ShipmentStatus::Exception));
        assert!(ShipmentStatus::Exception.can_transition_to(ShipmentStatus::InTransit));
        assert!(!ShipmentStatus::Exception.can_transition_to(ShipmentStatus::Pending));
    }

    #[test]
    fn repeated_observations_are_legal() {
        assert!(ShipmentStatus::InTransit.can_transition_to(ShipmentStatus::InTransit));
        assert!(ShipmentStatus::Exception.can_transition_to(ShipmentStatus::Exception));
    }

    #[test]
    fn transition_error_names_wire_statuses() {
        let err = ShipmentStatus::Delivered
            .transition_to(ShipmentStatus::Pending)
            .expect_err("backward move");
        assert_eq!(err.from, "delivered");
        assert_eq!(err.to, "pending");
    }

    #[test]
    fn statuses_serialize_to_wire_names() {
        let json = serde_json::to_string(&ShipmentStatus::OutForDelivery).expect("serialize");
        assert_eq!(json, "\"out_for_delivery\"");
        let back: ShipmentStatus = serde_json::from_str("\"picked_up\"").expect("deserialize");
        assert_eq!(back, ShipmentStatus::PickedUp);
    }
}
