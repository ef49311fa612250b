//! The driver account service.
//!
//! [`DriverService`] validates requests, hashes passwords, issues session tokens and
//! delegates persistence to a [`crate::db::handlers::DriverRepository`].

pub mod drivers;
pub mod models;

pub use drivers::DriverService;
