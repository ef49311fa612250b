//! Database models for drivers.

use crate::service::models::{DriverCreate, DriverUpdate};
use crate::types::{DriverId, DriverRole};
use chrono::{DateTime, Utc};

/// Database request for creating a new driver
#[derive(Debug, Clone)]
pub struct DriverCreateDBRequest {
    pub username: String,
    pub email: String,
    pub role: DriverRole,
    pub route: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone: Option<String>,
    pub password_hash: Option<String>,
}

impl DriverCreateDBRequest {
    /// The plaintext password never reaches this type; callers pass the digest.
    pub fn new(create: DriverCreate, password_hash: Option<String>) -> Self {
        Self {
            username: create.username,
            email: create.email,
            role: create.role,
            route: create.route,
            first_name: create.first_name,
            last_name: create.last_name,
            phone: create.phone,
            password_hash,
        }
    }
}

/// Database request for updating a driver. `None` leaves the stored value untouched; for the
/// nullable columns `Some(None)` clears it.
#[derive(Debug, Clone, Default)]
pub struct DriverUpdateDBRequest {
    pub username: Option<String>,
    pub email: Option<String>,
    pub role: Option<DriverRole>,
    pub route: Option<Option<String>>,
    pub first_name: Option<Option<String>>,
    pub last_name: Option<Option<String>>,
    pub phone: Option<Option<String>>,
    pub password_hash: Option<String>,
}

impl DriverUpdateDBRequest {
    pub fn new(update: DriverUpdate, password_hash: Option<String>) -> Self {
        Self {
            username: update.username,
            email: update.email,
            role: update.role,
            route: update.route,
            first_name: update.first_name,
            last_name: update.last_name,
            phone: update.phone,
            password_hash,
        }
    }
}

/// Database response for a driver. Deliberately has no hash field.
#[derive(Debug, Clone, PartialEq)]
pub struct DriverDBResponse {
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

/// A driver loaded through the credentials scope, the only read that includes the digest.
#[derive(Debug, Clone)]
pub struct DriverCredentials {
    pub driver: DriverDBResponse,
    pub password_hash: Option<String>,
}
