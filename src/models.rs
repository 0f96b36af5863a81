//! Record types for the backend collections.
//!
//! Everything here serializes camelCase to match the document layout already
//! present in hosted deployments. Optional fields are skipped when absent so
//! records written before a field existed stay readable, and partial updates
//! never have to invent placeholder values.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::console::roles::Role;

/// A document in the `users` collection.
///
/// Self-registered accounts are stored under the identity provider's uid;
/// driver stubs created from the admin dashboard get a generated id and the
/// `temp_password` / `needs_password_change` / `created_by` trio.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub role: Role,
    pub is_active: bool,
    /// Absent on admin-created driver stubs; treated as unverified.
    #[serde(default)]
    pub is_verified: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub license_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temp_password: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub needs_password_change: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secondary_phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emergency_contact: Option<String>,
}

impl UserRecord {
    /// "First Last", as used for the provider display name and card headers.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// A document in the `buses` collection. Departure and arrival are kept as
/// the raw time-of-day strings the form collects.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BusRecord {
    pub bus_number: String,
    pub route: String,
    pub source: String,
    pub destination: String,
    pub departure_time: String,
    pub arrival_time: String,
    pub fare: f64,
    pub capacity: u32,
    pub driver_id: String,
    pub driver_name: String,
    pub driver_email: String,
    pub is_active: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// A document in the `busTypes` collection: the vehicle profile a driver
/// files separately from route details.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BusTypeRecord {
    pub bus_type: BusClass,
    pub amenities: String,
    pub fuel_type: FuelType,
    pub manufacturing_year: u32,
    pub driver_id: String,
    pub driver_email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

/// A document in the `contactMessages` collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactMessage {
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
}

/// Seating class of a bus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BusClass {
    Ac,
    NonAc,
    Sleeper,
    SemiSleeper,
    Luxury,
}

impl BusClass {
    pub fn parse(input: &str) -> Option<Self> {
        match input.trim().to_lowercase().replace(['-', '_', ' '], "").as_str() {
            "ac" => Some(Self::Ac),
            "nonac" => Some(Self::NonAc),
            "sleeper" => Some(Self::Sleeper),
            "semisleeper" => Some(Self::SemiSleeper),
            "luxury" => Some(Self::Luxury),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Ac => "AC",
            Self::NonAc => "Non-AC",
            Self::Sleeper => "Sleeper",
            Self::SemiSleeper => "Semi-Sleeper",
            Self::Luxury => "Luxury",
        }
    }
}

/// Fuel used by a bus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FuelType {
    Diesel,
    Petrol,
    Cng,
    Electric,
    Hybrid,
}

impl FuelType {
    pub fn parse(input: &str) -> Option<Self> {
        match input.trim().to_lowercase().as_str() {
            "diesel" => Some(Self::Diesel),
            "petrol" => Some(Self::Petrol),
            "cng" => Some(Self::Cng),
            "electric" => Some(Self::Electric),
            "hybrid" => Some(Self::Hybrid),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Diesel => "Diesel",
            Self::Petrol => "Petrol",
            Self::Cng => "CNG",
            Self::Electric => "Electric",
            Self::Hybrid => "Hybrid",
        }
    }
}
