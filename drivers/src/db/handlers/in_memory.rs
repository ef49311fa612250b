//! In-memory repository for drivers.
//!
//! Stores drivers in process memory behind an async lock. Suitable for testing and
//! single-process deployments. Drivers are lost on restart.

use std::sync::Arc;

use chrono::Utc;
use tokio::sync::RwLock;
use tracing::instrument;
use uuid::Uuid;

use crate::db::{
    errors::{DbError, Result, USERNAME_UNIQUE_CONSTRAINT},
    handlers::{
        drivers::DriverFilter,
        repository::{DriverRepository, Repository},
    },
    models::drivers::{DriverCreateDBRequest, DriverCredentials, DriverDBResponse, DriverUpdateDBRequest},
};
use crate::types::{DriverId, abbrev_uuid};

#[derive(Debug, Clone)]
struct StoredDriver {
    driver: DriverDBResponse,
    password_hash: Option<String>,
}

/// In-memory implementation of [`DriverRepository`].
///
/// Enforces username uniqueness under its write lock, mirroring the unique constraint on the
/// PostgreSQL table. Listing returns drivers in insertion order.
#[derive(Clone, Default)]
pub struct InMemoryDrivers {
    drivers: Arc<RwLock<Vec<StoredDriver>>>,
}

impl InMemoryDrivers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stored digest for a driver, for tests that need to inspect what was persisted.
    #[cfg(test)]
    pub(crate) async fn password_hash(&self, id: DriverId) -> Option<String> {
        let drivers = self.drivers.read().await;
        drivers
            .iter()
            .find(|stored| stored.driver.id == id)
            .and_then(|stored| stored.password_hash.clone())
    }
}

fn username_conflict(username: &str) -> DbError {
    DbError::UniqueViolation {
        constraint: Some(USERNAME_UNIQUE_CONSTRAINT.to_string()),
        table: Some("drivers".to_string()),
        message: format!("duplicate key value violates unique constraint \"{USERNAME_UNIQUE_CONSTRAINT}\""),
        conflicting_value: Some(username.to_string()),
    }
}

#[async_trait::async_trait]
impl Repository for InMemoryDrivers {
    type CreateRequest = DriverCreateDBRequest;
    type UpdateRequest = DriverUpdateDBRequest;
    type Response = DriverDBResponse;
    type Id = DriverId;
    type Filter = DriverFilter;

    #[instrument(skip(self, request), fields(username = %request.username), err)]
    async fn create(&self, request: &Self::CreateRequest) -> Result<Self::Response> {
        let mut drivers = self.drivers.write().await;

        if drivers.iter().any(|stored| stored.driver.username == request.username) {
            return Err(username_conflict(&request.username));
        }

        let now = Utc::now();
        let driver = DriverDBResponse {
            id: Uuid::new_v4(),
            username: request.username.clone(),
            email: request.email.clone(),
            role: request.role,
            route: request.route.clone(),
            first_name: request.first_name.clone(),
            last_name: request.last_name.clone(),
            phone: request.phone.clone(),
            created_at: now,
            updated_at: now,
        };

        drivers.push(StoredDriver {
            driver: driver.clone(),
            password_hash: request.password_hash.clone(),
        });

        Ok(driver)
    }

    #[instrument(skip(self), fields(driver_id = %abbrev_uuid(&id)), err)]
    async fn get_by_id(&self, id: Self::Id) -> Result<Option<Self::Response>> {
        let drivers = self.drivers.read().await;
        Ok(drivers.iter().find(|stored| stored.driver.id == id).map(|stored| stored.driver.clone()))
    }

    #[instrument(skip(self, filter), fields(route = ?filter.route), err)]
    async fn list(&self, filter: &Self::Filter) -> Result<Vec<Self::Response>> {
        let drivers = self.drivers.read().await;
        Ok(drivers
            .iter()
            .filter(|stored| filter.route.is_none() || stored.driver.route == filter.route)
            .map(|stored| stored.driver.clone())
            .collect())
    }

    #[instrument(skip(self), fields(driver_id = %abbrev_uuid(&id)), err)]
    async fn delete(&self, id: Self::Id) -> Result<bool> {
        let mut drivers = self.drivers.write().await;
        let before = drivers.len();
        drivers.retain(|stored| stored.driver.id != id);
        Ok(drivers.len() < before)
    }

    #[instrument(skip(self, request), fields(driver_id = %abbrev_uuid(&id)), err)]
    async fn update(&self, id: Self::Id, request: &Self::UpdateRequest) -> Result<Self::Response> {
        let mut drivers = self.drivers.write().await;

        if let Some(username) = &request.username
            && drivers
                .iter()
                .any(|stored| stored.driver.id != id && &stored.driver.username == username)
        {
            return Err(username_conflict(username));
        }

        let stored = drivers
            .iter_mut()
            .find(|stored| stored.driver.id == id)
            .ok_or(DbError::NotFound)?;

        let driver = &mut stored.driver;
        if let Some(username) = &request.username {
            driver.username = username.clone();
        }
        if let Some(email) = &request.email {
            driver.email = email.clone();
        }
        if let Some(role) = request.role {
            driver.role = role;
        }
        if let Some(route) = &request.route {
            driver.route = route.clone();
        }
        if let Some(first_name) = &request.first_name {
            driver.first_name = first_name.clone();
        }
        if let Some(last_name) = &request.last_name {
            driver.last_name = last_name.clone();
        }
        if let Some(phone) = &request.phone {
            driver.phone = phone.clone();
        }
        if let Some(hash) = &request.password_hash {
            stored.password_hash = Some(hash.clone());
        }
        stored.driver.updated_at = Utc::now();

        Ok(stored.driver.clone())
    }
}

#[async_trait::async_trait]
impl DriverRepository for InMemoryDrivers {
    #[instrument(skip(self), err)]
    async fn get_by_username(&self, username: &str) -> Result<Option<DriverDBResponse>> {
        let drivers = self.drivers.read().await;
        Ok(drivers
            .iter()
            .find(|stored| stored.driver.username == username)
            .map(|stored| stored.driver.clone()))
    }

    #[instrument(skip(self), err)]
    async fn get_credentials_by_username(&self, username: &str) -> Result<Option<DriverCredentials>> {
        let drivers = self.drivers.read().await;
        Ok(drivers
            .iter()
            .find(|stored| stored.driver.username == username)
            .map(|stored| DriverCredentials {
                driver: stored.driver.clone(),
                password_hash: stored.password_hash.clone(),
            }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::DriverRole;

    fn create_request(username: &str, route: Option<&str>) -> DriverCreateDBRequest {
        DriverCreateDBRequest {
            username: username.to_string(),
            email: format!("{username}@example.com"),
            role: DriverRole::Driver,
            route: route.map(str::to_string),
            first_name: None,
            last_name: None,
            phone: None,
            password_hash: Some("digest".to_string()),
        }
    }

    #[test_log::test(tokio::test)]
    async fn test_create_assigns_distinct_ids() {
        let repo = InMemoryDrivers::new();

        let a = repo.create(&create_request("a", None)).await.unwrap();
        let b = repo.create(&create_request("b", None)).await.unwrap();

        assert_ne!(a.id, b.id);
        assert_eq!(repo.get_by_id(a.id).await.unwrap(), Some(a));
    }

    #[test_log::test(tokio::test)]
    async fn test_create_rejects_duplicate_username() {
        let repo = InMemoryDrivers::new();
        repo.create(&create_request("alice", None)).await.unwrap();

        let err = repo.create(&create_request("alice", None)).await.unwrap_err();
        assert!(err.is_username_conflict());
        assert_eq!(repo.list(&DriverFilter::new()).await.unwrap().len(), 1);
    }

    #[test_log::test(tokio::test)]
    async fn test_credentials_scope_is_the_only_read_with_hash() {
        let repo = InMemoryDrivers::new();
        let created = repo.create(&create_request("alice", None)).await.unwrap();

        let credentials = repo.get_credentials_by_username("alice").await.unwrap().unwrap();
        assert_eq!(credentials.driver, created);
        assert_eq!(credentials.password_hash.as_deref(), Some("digest"));
        assert_eq!(repo.password_hash(created.id).await.as_deref(), Some("digest"));

        assert!(repo.get_credentials_by_username("bob").await.unwrap().is_none());
    }

    #[test_log::test(tokio::test)]
    async fn test_list_preserves_insertion_order_and_filters_route() {
        let repo = InMemoryDrivers::new();
        for (name, route) in [("a", "R1"), ("b", "R2"), ("c", "R1")] {
            repo.create(&create_request(name, Some(route))).await.unwrap();
        }
        repo.create(&create_request("d", None)).await.unwrap();

        let all: Vec<_> = repo
            .list(&DriverFilter::new())
            .await
            .unwrap()
            .into_iter()
            .map(|d| d.username)
            .collect();
        assert_eq!(all, vec!["a", "b", "c", "d"]);

        let r1: Vec<_> = repo
            .list(&DriverFilter::by_route("R1"))
            .await
            .unwrap()
            .into_iter()
            .map(|d| d.username)
            .collect();
        assert_eq!(r1, vec!["a", "c"]);

        assert!(repo.list(&DriverFilter::by_route("nowhere")).await.unwrap().is_empty());
    }

    #[test_log::test(tokio::test)]
    async fn test_update_merges_only_provided_fields() {
        let repo = InMemoryDrivers::new();
        let created = repo.create(&create_request("alice", Some("R1"))).await.unwrap();

        let updated = repo
            .update(
                created.id,
                &DriverUpdateDBRequest {
                    email: Some("new@example.com".to_string()),
                    password_hash: Some("new-digest".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.id, created.id);
        assert_eq!(updated.email, "new@example.com");
        assert_eq!(updated.username, "alice");
        assert_eq!(updated.route.as_deref(), Some("R1"));
        assert!(updated.updated_at >= created.updated_at);
        assert_eq!(repo.password_hash(created.id).await.as_deref(), Some("new-digest"));
    }

    #[test_log::test(tokio::test)]
    async fn test_update_clears_nullable_fields() {
        let repo = InMemoryDrivers::new();
        let mut request = create_request("alice", Some("R1"));
        request.last_name = Some("Smith".to_string());
        let created = repo.create(&request).await.unwrap();

        let updated = repo
            .update(
                created.id,
                &DriverUpdateDBRequest {
                    route: Some(None),
                    phone: Some(Some("555-0100".to_string())),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.route, None);
        assert_eq!(updated.phone.as_deref(), Some("555-0100"));
        assert_eq!(updated.last_name.as_deref(), Some("Smith"));
        assert!(repo.list(&DriverFilter::by_route("R1")).await.unwrap().is_empty());
    }

    #[test_log::test(tokio::test)]
    async fn test_update_enforces_username_uniqueness() {
        let repo = InMemoryDrivers::new();
        let alice = repo.create(&create_request("alice", None)).await.unwrap();
        repo.create(&create_request("bob", None)).await.unwrap();

        let err = repo
            .update(
                alice.id,
                &DriverUpdateDBRequest {
                    username: Some("bob".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert!(err.is_username_conflict());

        // Renaming to the current username is not a conflict
        let same = repo
            .update(
                alice.id,
                &DriverUpdateDBRequest {
                    username: Some("alice".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(same.username, "alice");
    }

    #[test_log::test(tokio::test)]
    async fn test_update_and_delete_missing_driver() {
        let repo = InMemoryDrivers::new();
        let missing = Uuid::new_v4();

        let result = repo.update(missing, &DriverUpdateDBRequest::default()).await;
        assert!(matches!(result, Err(DbError::NotFound)));
        assert!(!repo.delete(missing).await.unwrap());
    }

    #[test_log::test(tokio::test)]
    async fn test_delete_removes_driver() {
        let repo = InMemoryDrivers::new();
        let created = repo.create(&create_request("alice", None)).await.unwrap();

        assert!(repo.delete(created.id).await.unwrap());
        assert!(repo.get_by_id(created.id).await.unwrap().is_none());
        assert!(repo.get_by_username("alice").await.unwrap().is_none());
    }
}
