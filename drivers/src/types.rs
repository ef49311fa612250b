//! Common type definitions.
//!
//! - [`DriverId`]: driver record identifier, assigned by the store on insert
//! - [`DriverRole`]: role carried on the record and embedded in session tokens
//! - [`abbrev_uuid`]: abbreviate UUIDs to first 8 chars for logging

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

pub type DriverId = Uuid;

/// Abbreviate a UUID to its first 8 characters for more readable logs and traces
/// Example: "550e8400-e29b-41d4-a716-446655440000" -> "550e8400"
pub fn abbrev_uuid(uuid: &Uuid) -> String {
    uuid.to_string().chars().take(8).collect()
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "driver_role", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum DriverRole {
    #[default]
    Driver,
    Admin,
}

impl fmt::Display for DriverRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DriverRole::Driver => write!(f, "driver"),
            DriverRole::Admin => write!(f, "admin"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_abbrev_uuid() {
        let id = Uuid::parse_str("550e8400-e29b-41d4-a716-446655440000").unwrap();
        assert_eq!(abbrev_uuid(&id), "550e8400");
    }

    #[test]
    fn test_role_serialization_matches_display() {
        for role in [DriverRole::Driver, DriverRole::Admin] {
            let json = serde_json::to_string(&role).unwrap();
            assert_eq!(json, format!("\"{role}\""));
        }
        assert_eq!(DriverRole::default(), DriverRole::Driver);
    }
}
