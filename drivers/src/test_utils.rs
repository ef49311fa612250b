//! Shared fixtures for unit tests.

use chrono::Utc;
use uuid::Uuid;

use crate::config::{AuthConfig, Config, PasswordConfig, SecurityConfig};
use crate::db::handlers::InMemoryDrivers;
use crate::service::DriverService;
use crate::service::models::{DriverCreate, DriverResponse};
use crate::types::DriverRole;

pub fn create_test_config() -> Config {
    Config {
        secret_key: Some("test-secret-key-for-testing-only".to_string()),
        auth: AuthConfig {
            security: SecurityConfig::default(),
            // Minimal Argon2 cost so hashing doesn't dominate test time
            password: PasswordConfig {
                argon2_memory_kib: 1024,
                argon2_iterations: 1,
                argon2_parallelism: 1,
            },
        },
        ..Default::default()
    }
}

pub fn create_test_service() -> DriverService<InMemoryDrivers> {
    DriverService::new(InMemoryDrivers::new(), create_test_config())
}

pub fn driver_create(username: &str, password: Option<&str>) -> DriverCreate {
    DriverCreate {
        username: username.to_string(),
        email: format!("{username}@example.com"),
        role: DriverRole::Driver,
        route: None,
        first_name: None,
        last_name: None,
        phone: None,
        password: password.map(str::to_string),
    }
}

pub fn sample_driver() -> DriverResponse {
    let now = Utc::now();
    DriverResponse {
        id: Uuid::new_v4(),
        username: "testdriver".to_string(),
        email: "test@example.com".to_string(),
        role: DriverRole::Driver,
        route: Some("R1".to_string()),
        first_name: Some("Test".to_string()),
        last_name: Some("Driver".to_string()),
        phone: None,
        created_at: now,
        updated_at: now,
    }
}
