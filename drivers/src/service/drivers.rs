//! Driver account operations: credential checks, token issuance and CRUD.

use std::sync::Arc;

use tracing::{debug, info, instrument};

use crate::{
    auth::{password, session},
    config::Config,
    db::{
        errors::DbError,
        handlers::{DriverFilter, DriverRepository, Repository},
        models::drivers::{DriverCreateDBRequest, DriverDBResponse, DriverUpdateDBRequest},
    },
    errors::{Error, Result},
    service::models::{AuthenticateRequest, AuthenticatedDriver, DriverCreate, DriverResponse, DriverUpdate},
    types::{DriverId, abbrev_uuid},
};

/// Driver account service over any [`DriverRepository`].
///
/// Holds no state between calls besides the repository handle and configuration, so it is
/// cheap to clone into request handlers.
#[derive(Clone)]
pub struct DriverService<R> {
    repository: R,
    config: Arc<Config>,
}

impl<R: DriverRepository> DriverService<R> {
    pub fn new(repository: R, config: impl Into<Arc<Config>>) -> Self {
        Self {
            repository,
            config: config.into(),
        }
    }

    pub fn repository(&self) -> &R {
        &self.repository
    }

    /// Check a username/password pair and issue a session token.
    ///
    /// An unknown username, a driver without a stored password and a wrong password all fail
    /// with the same [`Error::InvalidCredentials`].
    #[instrument(skip_all, fields(username = %request.username), err)]
    pub async fn authenticate(&self, request: &AuthenticateRequest) -> Result<AuthenticatedDriver> {
        let credentials = self
            .repository
            .get_credentials_by_username(&request.username)
            .await?
            .ok_or(Error::InvalidCredentials)?;

        let hash = credentials.password_hash.ok_or(Error::InvalidCredentials)?;

        if !password::verify_blocking(request.password.clone(), hash).await? {
            debug!("Password mismatch");
            return Err(Error::InvalidCredentials);
        }

        let driver = DriverResponse::from(credentials.driver);
        let token = session::create_session_token(&driver, &self.config)?;

        info!(driver_id = %abbrev_uuid(&driver.id), "Driver authenticated");
        Ok(AuthenticatedDriver { driver, token })
    }

    #[instrument(skip_all, err)]
    pub async fn get_all(&self) -> Result<Vec<DriverResponse>> {
        let drivers = self.repository.list(&DriverFilter::new()).await?;
        Ok(drivers.into_iter().map(DriverResponse::from).collect())
    }

    #[instrument(skip(self), fields(driver_id = %abbrev_uuid(&id)), err)]
    pub async fn get_by_id(&self, id: DriverId) -> Result<DriverResponse> {
        Ok(self.get_driver(id).await?.into())
    }

    /// Insert a new driver after checking the username is free.
    ///
    /// The check and the insert are separate store calls. Two concurrent creates with the same
    /// username can both pass the check; the loser then fails on the store's unique constraint,
    /// which surfaces as the same [`Error::DuplicateUsername`].
    #[instrument(skip_all, fields(username = %request.username), err)]
    pub async fn create(&self, request: DriverCreate) -> Result<DriverResponse> {
        self.ensure_username_available(&request.username).await?;

        let password_hash = self.hash_password(request.password.clone()).await?;
        let driver = self
            .repository
            .create(&DriverCreateDBRequest::new(request, password_hash))
            .await?;

        info!(driver_id = %abbrev_uuid(&driver.id), "Driver created");
        Ok(driver.into())
    }

    /// Merge the provided fields onto an existing driver.
    ///
    /// The duplicate check only runs when the username actually changes.
    #[instrument(skip(self, request), fields(driver_id = %abbrev_uuid(&id)), err)]
    pub async fn update(&self, id: DriverId, request: DriverUpdate) -> Result<DriverResponse> {
        let existing = self.get_driver(id).await?;

        if let Some(username) = &request.username
            && *username != existing.username
        {
            self.ensure_username_available(username).await?;
        }

        let password_hash = self.hash_password(request.password.clone()).await?;
        let driver = self
            .repository
            .update(id, &DriverUpdateDBRequest::new(request, password_hash))
            .await
            .map_err(|e| not_found_for(e, id))?;

        info!("Driver updated");
        Ok(driver.into())
    }

    #[instrument(skip(self), fields(driver_id = %abbrev_uuid(&id)), err)]
    pub async fn delete(&self, id: DriverId) -> Result<()> {
        self.get_driver(id).await?;

        if !self.repository.delete(id).await? {
            // Removed by someone else between the lookup and the delete
            return Err(driver_not_found(id));
        }

        info!("Driver deleted");
        Ok(())
    }

    /// Every driver assigned to `route`; empty when none are.
    #[instrument(skip(self), err)]
    pub async fn get_by_route(&self, route: &str) -> Result<Vec<DriverResponse>> {
        let drivers = self.repository.list(&DriverFilter::by_route(route)).await?;
        Ok(drivers.into_iter().map(DriverResponse::from).collect())
    }

    async fn get_driver(&self, id: DriverId) -> Result<DriverDBResponse> {
        self.repository.get_by_id(id).await?.ok_or_else(|| driver_not_found(id))
    }

    async fn ensure_username_available(&self, username: &str) -> Result<()> {
        if self.repository.get_by_username(username).await?.is_some() {
            return Err(Error::DuplicateUsername {
                username: username.to_string(),
            });
        }
        Ok(())
    }

    async fn hash_password(&self, password: Option<String>) -> Result<Option<String>> {
        match password {
            Some(password) => {
                let params = self.config.auth.password.argon2_params();
                Ok(Some(password::hash_blocking(password, params).await?))
            }
            None => Ok(None),
        }
    }
}

fn driver_not_found(id: DriverId) -> Error {
    Error::NotFound {
        resource: "Driver".to_string(),
        id: id.to_string(),
    }
}

fn not_found_for(err: DbError, id: DriverId) -> Error {
    match err {
        DbError::NotFound => driver_not_found(id),
        other => other.into(),
    }
}
