//! Repository implementations for driver storage.
//!
//! - [`Drivers`]: PostgreSQL-backed repository (production)
//! - [`InMemoryDrivers`]: process-local repository, suitable for tests and single-process
//!   deployments; data is lost on restart
//!
//! Both implement [`Repository`] and [`DriverRepository`], so [`crate::service::DriverService`]
//! can run on either.
//!
//! ```ignore
//! use drivers::db::handlers::{DriverFilter, Drivers, Repository};
//!
//! async fn example(pool: sqlx::PgPool) -> Result<(), Box<dyn std::error::Error>> {
//!     let repo = Drivers::new(pool);
//!     let on_route = repo.list(&DriverFilter::by_route("R12")).await?;
//!     println!("{} drivers on R12", on_route.len());
//!     Ok(())
//! }
//! ```

pub mod drivers;
pub mod in_memory;
pub mod repository;

pub use drivers::{DriverFilter, Drivers};
pub use in_memory::InMemoryDrivers;
pub use repository::{DriverRepository, Repository};
