use crate::{reference, ValidationError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompanyType {
    Individual,
    SmallCompany,
    LargeCompany,
    Enterprise,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactInfo {
    pub primary_contact: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub city: String,
    pub country: String,
    pub postal_code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
}

/// Boolean capability flags. `SERVICE_FLAG_NAMES` is the closed set of wire
/// names the list filter accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceFlags {
    pub domestic: bool,
    pub international: bool,
    pub express: bool,
    pub standard: bool,
    pub temperature_controlled: bool,
    pub hazardous: bool,
    pub oversized: bool,
}

impl Default for ServiceFlags {
    fn default() -> Self {
        Self {
            domestic: true,
            international: false,
            express: false,
            standard: true,
            temperature_controlled: false,
            hazardous: false,
            oversized: false,
        }
    }
}

pub const SERVICE_FLAG_NAMES: [&str; 7] = [
    "domestic",
    "international",
    "express",
    "standard",
    "temperatureControlled",
    "hazardous",
    "oversized",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VehicleType {
    Truck,
    Van,
    Trailer,
    Container,
    AirFreight,
    SeaFreight,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VehicleCapacity {
    pub weight: f64,
    pub volume: f64,
    pub pieces: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Vehicle {
    #[serde(rename = "type")]
    pub kind: VehicleType,
    pub capacity: VehicleCapacity,
    #[serde(default)]
    pub specializations: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub license_plate: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tracking_device: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceArea {
    pub countries: Vec<String>,
    #[serde(default)]
    pub cities: Vec<String>,
    pub radius_km: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub restrictions: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Certification {
    #[serde(rename = "type")]
    pub kind: String,
    pub issuer: String,
    pub valid_until: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub document_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pricing {
    pub base_rate: f64,
    pub per_km_rate: f64,
    #[serde(default = "default_currency")]
    pub currency: String,
    pub minimum_charge: f64,
    pub fuel_surcharge: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub special_handling_fee: Option<f64>,
}

fn default_currency() -> String {
    "EUR".to_string()
}

impl Pricing {
    pub fn validate(&self) -> Result<(), ValidationError> {
        for (name, value) in [
            ("baseRate", self.base_rate),
            ("perKmRate", self.per_km_rate),
            ("minimumCharge", self.minimum_charge),
            ("fuelSurcharge", self.fuel_surcharge),
        ] {
            if value < 0.0 {
                return Err(ValidationError(format!("pricing {name} must be >= 0")));
            }
        }
        if self.special_handling_fee.is_some_and(|fee| fee < 0.0) {
            return Err(ValidationError(
                "pricing specialHandlingFee must be >= 0".to_string(),
            ));
        }
        Ok(())
    }
}

/// Client-overwritten metrics; nothing derives these from shipment history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Performance {
    pub rating: f64,
    pub total_shipments: u64,
    pub on_time_delivery: f64,
    pub damage_rate: f64,
    pub last_updated: DateTime<Utc>,
}

impl Performance {
    /// Starting point for a new carrier: spotless until proven otherwise.
    #[must_use]
    pub fn initial() -> Self {
        Self {
            rating: 5.0,
            total_shipments: 0,
            on_time_delivery: 100.0,
            damage_rate: 0.0,
            last_updated: Utc::now(),
        }
    }

    /// Partial overwrite; each field independently optional. `lastUpdated`
    /// is refreshed even when no field changes.
    pub fn apply_update(
        &mut self,
        rating: Option<f64>,
        on_time_delivery: Option<f64>,
        damage_rate: Option<f64>,
    ) -> Result<(), ValidationError> {
        if let Some(value) = rating {
            if !(0.0..=5.0).contains(&value) {
                return Err(ValidationError("rating must be between 0 and 5".to_string()));
            }
            self.rating = value;
        }
        if let Some(value) = on_time_delivery {
            if !(0.0..=100.0).contains(&value) {
                return Err(ValidationError(
                    "onTimeDelivery must be between 0 and 100".to_string(),
                ));
            }
            self.on_time_delivery = value;
        }
        if let Some(value) = damage_rate {
            if !(0.0..=100.0).contains(&value) {
                return Err(ValidationError(
                    "damageRate must be between 0 and 100".to_string(),
                ));
            }
            self.damage_rate = value;
        }
        self.last_updated = Utc::now();
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OperatingHours {
    pub start: String,
    pub end: String,
    pub timezone: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Availability {
    pub is_active: bool,
    pub operating_hours: OperatingHours,
    #[serde(default)]
    pub holidays: Vec<DateTime<Utc>>,
    pub max_lead_time: u32,
}

impl Default for Availability {
    fn default() -> Self {
        Self {
            is_active: true,
            operating_hours: OperatingHours {
                start: "08:00".to_string(),
                end: "18:00".to_string(),
                timezone: "Europe/Brussels".to_string(),
            },
            holidays: Vec::new(),
            max_lead_time: 24,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Insurance {
    #[serde(rename = "type")]
    pub kind: String,
    pub amount: f64,
    pub valid_until: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Compliance {
    #[serde(default = "default_true")]
    pub eu_compliant: bool,
    #[serde(default)]
    pub customs_certified: bool,
    pub insurance: Insurance,
    pub tax_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vat_number: Option<String>,
}

fn default_true() -> bool {
    true
}

/// Validated input for carrier creation.
#[derive(Debug, Clone)]
pub struct NewCarrier {
    pub name: String,
    pub company_type: CompanyType,
    pub contact_info: ContactInfo,
    pub services: Option<ServiceFlags>,
    pub vehicles: Vec<Vehicle>,
    pub service_areas: Vec<ServiceArea>,
    pub certifications: Vec<Certification>,
    pub pricing: Pricing,
    pub compliance: Compliance,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Carrier {
    pub id: String,
    pub carrier_id: String,
    pub name: String,
    pub company_type: CompanyType,
    pub contact_info: ContactInfo,
    pub services: ServiceFlags,
    #[serde(default)]
    pub vehicles: Vec<Vehicle>,
    #[serde(default)]
    pub service_areas: Vec<ServiceArea>,
    #[serde(default)]
    pub certifications: Vec<Certification>,
    pub pricing: Pricing,
    pub performance: Performance,
    pub availability: Availability,
    pub compliance: Compliance,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Carrier {
    /// Builds a fresh active carrier with pristine performance metrics.
    pub fn create(new: NewCarrier) -> Result<Self, ValidationError> {
        new.pricing.validate()?;
        let now = Utc::now();
        Ok(Self {
            id: reference::document_id(),
            carrier_id: reference::carrier_reference(),
            name: new.name,
            company_type: new.company_type,
            contact_info: new.contact_info,
            services: new.services.unwrap_or_default(),
            vehicles: new.vehicles,
            service_areas: new.service_areas,
            certifications: new.certifications,
            pricing: new.pricing,
            performance: Performance::initial(),
            availability: Availability::default(),
            compliance: new.compliance,
            created_at: now,
            updated_at: now,
        })
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        self.pricing.validate()
    }
}
