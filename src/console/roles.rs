//! Account roles.
//!
//! Three roles cover the console: administrators manage the fleet, drivers
//! file vehicle details, riders search and book. A role is fixed when the
//! account record is created; nothing in the console rewrites it.

use serde::{Deserialize, Serialize};

/// Stored account role. Serializes to the lowercase wire value; riders also
/// deserialize from the legacy `"user"` value found in older documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Driver,
    #[serde(alias = "user")]
    Rider,
}

impl Role {
    /// Parse a role as typed at the login and register prompts.
    pub fn parse(input: &str) -> Option<Self> {
        match input.trim().to_lowercase().as_str() {
            "admin" => Some(Self::Admin),
            "driver" => Some(Self::Driver),
            "rider" | "user" => Some(Self::Rider),
            _ => None,
        }
    }

    /// Human-readable name for panels and log lines.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Admin => "Admin",
            Self::Driver => "Driver",
            Self::Rider => "Rider",
        }
    }

    /// The canonical stored value.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Driver => "driver",
            Self::Rider => "rider",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
