//! Base repository traits for store operations.

use crate::db::errors::Result;
use crate::db::handlers::drivers::DriverFilter;
use crate::db::models::drivers::{DriverCreateDBRequest, DriverCredentials, DriverDBResponse, DriverUpdateDBRequest};
use crate::types::DriverId;

/// Base repository trait providing common CRUD operations.
///
/// A repository is the data access layer for one table. It has separate associated types for
/// create requests, update requests, and responses.
#[async_trait::async_trait]
pub trait Repository: Send + Sync {
    /// The request type for creating entities
    type CreateRequest: Send + Sync;

    /// The request type for updating entities
    type UpdateRequest: Send + Sync;

    /// The response/DTO type returned by operations
    type Response;

    /// The identifier type for lookups
    type Id: Send + Sync;

    /// The filter type for list operations
    type Filter: Send + Sync;

    /// Create a new entity. The store assigns its identifier.
    async fn create(&self, request: &Self::CreateRequest) -> Result<Self::Response>;

    /// Get an entity by ID
    async fn get_by_id(&self, id: Self::Id) -> Result<Option<Self::Response>>;

    /// List entities matching the filter
    async fn list(&self, filter: &Self::Filter) -> Result<Vec<Self::Response>>;

    /// Delete an entity by ID, returning whether a row was removed
    async fn delete(&self, id: Self::Id) -> Result<bool>;

    /// Merge the provided fields onto an entity and persist it
    async fn update(&self, id: Self::Id, request: &Self::UpdateRequest) -> Result<Self::Response>;
}

/// Driver-specific lookups on top of [`Repository`].
#[async_trait::async_trait]
pub trait DriverRepository:
    Repository<
        CreateRequest = DriverCreateDBRequest,
        UpdateRequest = DriverUpdateDBRequest,
        Response = DriverDBResponse,
        Id = DriverId,
        Filter = DriverFilter,
    >
{
    /// Find a driver by username. The password hash is not loaded.
    async fn get_by_username(&self, username: &str) -> Result<Option<DriverDBResponse>>;

    /// Find a driver by username including the stored password hash.
    ///
    /// Only credential verification should use this scope.
    async fn get_credentials_by_username(&self, username: &str) -> Result<Option<DriverCredentials>>;
}
