//! # drivers: driver account service
//!
//! Authentication and CRUD for "driver" accounts: username/password checks against stored
//! Argon2 digests, JWT session tokens, and create/read/update/delete against PostgreSQL.
//!
//! ## Architecture
//!
//! [`service::DriverService`] holds the business rules (username uniqueness, password
//! hashing, token issuance) and talks to storage only through the
//! [`db::handlers::DriverRepository`] trait. Two repositories are provided:
//! [`db::handlers::Drivers`] for PostgreSQL and [`db::handlers::InMemoryDrivers`] for tests
//! and single-process use. Configuration ([`config::Config`]) is passed in explicitly, so
//! each service instance can carry its own signing secret.
//!
//! The HTTP layer is not part of this crate; callers embed the service in their own handlers.
//!
//! ## Example
//!
//! ```no_run
//! use clap::Parser;
//! use drivers::{
//!     config::{Args, Config},
//!     db::{self, handlers::Drivers},
//!     service::{DriverService, models::AuthenticateRequest},
//! };
//!
//! # async fn run() -> anyhow::Result<()> {
//! drivers::telemetry::init_telemetry()?;
//! let config = Config::load(&Args::parse())?;
//!
//! let pool = db::connect(&config.database).await?;
//! drivers::migrator().run(&pool).await?;
//!
//! let service = DriverService::new(Drivers::new(pool), config);
//! let session = service
//!     .authenticate(&AuthenticateRequest {
//!         username: "alice".to_string(),
//!         password: "pw1".to_string(),
//!     })
//!     .await?;
//! println!("token for {}: {}", session.driver.username, session.token);
//! # Ok(())
//! # }
//! ```
//!
//! ## Username uniqueness
//!
//! Create and update check for an existing username before writing. The check and the write
//! are separate store calls, so the `drivers_username_key` unique constraint (and the same
//! check inside the in-memory repository) is what ultimately rejects a racing duplicate. Both
//! paths surface as [`errors::Error::DuplicateUsername`].

pub mod auth;
pub mod config;
pub mod db;
pub mod errors;
pub mod service;
pub mod telemetry;
pub mod types;

#[cfg(test)]
mod test_utils;

pub use errors::{Error, Result};
pub use service::DriverService;

/// Embedded schema migrations for the `drivers` table.
pub fn migrator() -> sqlx::migrate::Migrator {
    sqlx::migrate!("./migrations")
}
