//! Request/response models for the driver service.

use crate::db::models::drivers::DriverDBResponse;
use crate::types::{DriverId, DriverRole};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_with::rust::double_option;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthenticateRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DriverCreate {
    pub username: String,
    pub email: String,
    #[serde(default)]
    pub role: DriverRole,
    #[serde(default)]
    pub route: Option<String>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    /// Plaintext; hashed before it reaches the store
    #[serde(default)]
    pub password: Option<String>,
}

/// The mutable fields of a driver. The identifier is not among them.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DriverUpdate {
    pub username: Option<String>,
    pub email: Option<String>,
    pub role: Option<DriverRole>,
    /// Assigned route (None = no change, Some(None) = unassign, Some(route) = set)
    #[serde(skip_serializing_if = "Option::is_none", with = "double_option")]
    pub route: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none", with = "double_option")]
    pub first_name: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none", with = "double_option")]
    pub last_name: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none", with = "double_option")]
    pub phone: Option<Option<String>>,
    /// Plaintext; hashed before it reaches the store
    pub password: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DriverResponse {
    pub id: DriverId,
    pub username: String,
    pub email: String,
    pub role: DriverRole,
    pub route: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Result of a successful `authenticate`: the driver's fields with the token alongside.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthenticatedDriver {
    #[serde(flatten)]
    pub driver: DriverResponse,
    pub token: String,
}

impl From<DriverDBResponse> for DriverResponse {
    fn from(db: DriverDBResponse) -> Self {
        Self {
            id: db.id,
            username: db.username,
            email: db.email,
            role: db.role,
            route: db.route,
            first_name: db.first_name,
            last_name: db.last_name,
            phone: db.phone,
            created_at: db.created_at,
            updated_at: db.updated_at,
        }
    }
}
