use crate::status::{OrderStatus, TransitionError};
use crate::{reference, ValidationError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Postal and contact facts for one side of an order. Free text, format
/// unvalidated by design.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Party {
    pub name: String,
    pub address: String,
    pub city: String,
    pub country: String,
    pub postal_code: String,
    pub contact_person: String,
    pub email: String,
    pub phone: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cargo {
    pub description: String,
    pub weight: f64,
    pub volume: f64,
    pub pieces: u32,
    #[serde(default)]
    pub hazardous: bool,
    #[serde(default)]
    pub temperature_controlled: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub special_instructions: Option<String>,
}

impl Cargo {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.weight < 0.0 {
            return Err(ValidationError("cargo weight must be >= 0".to_string()));
        }
        if self.volume < 0.0 {
            return Err(ValidationError("cargo volume must be >= 0".to_string()));
        }
        if self.pieces < 1 {
            return Err(ValidationError("cargo pieces must be >= 1".to_string()));
        }
        Ok(())
    }
}

/// The eleven Incoterms 2020 rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Incoterms {
    Exw,
    Fca,
    Cpt,
    Cip,
    Dap,
    Dpu,
    Ddp,
    Fas,
    Fob,
    Cfr,
    Cif,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    Medium,
    High,
    Urgent,
}

impl Default for Priority {
    fn default() -> Self {
        Self::Medium
    }
}

impl Priority {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Urgent => "urgent",
        }
    }
}

/// Validated input for order creation; field presence is the API layer's job.
#[derive(Debug, Clone)]
pub struct NewOrder {
    pub shipper: Party,
    pub consignee: Party,
    pub cargo: Cargo,
    pub incoterms: Incoterms,
    pub total_value: f64,
    pub currency: Option<String>,
    pub priority: Option<Priority>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: String,
    pub order_number: String,
    pub shipper: Party,
    pub consignee: Party,
    pub cargo: Cargo,
    pub incoterms: Incoterms,
    pub total_value: f64,
    pub currency: String,
    pub priority: Priority,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Order {
    /// Builds a fresh `draft` order with generated identifiers.
    pub fn create(new: NewOrder) -> Result<Self, ValidationError> {
        let now = Utc::now();
        let order = Self {
            id: reference::document_id(),
            order_number: reference::order_number(),
            shipper: new.shipper,
            consignee: new.consignee,
            cargo: new.cargo,
            incoterms: new.incoterms,
            total_value: new.total_value,
            currency: new.currency.unwrap_or_else(|| "EUR".to_string()),
            priority: new.priority.unwrap_or_default(),
            status: OrderStatus::Draft,
            created_at: now,
            updated_at: now,
        };
        order.validate()?;
        Ok(order)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        self.cargo.validate()?;
        if self.total_value < 0.0 {
            return Err(ValidationError("totalValue must be >= 0".to_string()));
        }
        Ok(())
    }

    pub fn transition_to(&mut self, next: OrderStatus) -> Result<(), TransitionError> {
        self.status = self.status.transition_to(next)?;
        self.updated_at = Utc::now();
        Ok(())
    }
}

/// The slice of an order joined onto shipment reads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderSummary {
    pub id: String,
    pub order_number: String,
    pub shipper: Party,
    pub consignee: Party,
    pub cargo: Cargo,
}

impl From<&Order> for OrderSummary {
    fn from(order: &Order) -> Self {
        Self {
            id: order.id.clone(),
            order_number: order.order_number.clone(),
            shipper: order.shipper.clone(),
            consignee: order.consignee.clone(),
            cargo: order.cargo.clone(),
        }
    }
}
