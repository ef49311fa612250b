//! PostgreSQL repository for drivers.

use crate::types::{DriverId, DriverRole, abbrev_uuid};
use crate::db::{
    errors::{DbError, Result},
    handlers::repository::{DriverRepository, Repository},
    models::drivers::{DriverCreateDBRequest, DriverCredentials, DriverDBResponse, DriverUpdateDBRequest},
};
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use tracing::instrument;
use uuid::Uuid;

/// Filter for listing drivers
#[derive(Debug, Clone, Default)]
pub struct DriverFilter {
    /// Only drivers whose route equals this value
    pub route: Option<String>,
}

impl DriverFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn by_route(route: impl Into<String>) -> Self {
        Self {
            route: Some(route.into()),
        }
    }
}

// Database entity model
#[derive(Debug, Clone, FromRow)]
struct Driver {
    pub id: DriverId,
    pub username: String,
    pub email: String,
    pub role: DriverRole,
    pub route: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone: Option<String>,
    pub password_hash: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Driver> for DriverDBResponse {
    fn from(driver: Driver) -> Self {
        Self {
            id: driver.id,
            username: driver.username,
            email: driver.email,
            role: driver.role,
            route: driver.route,
            first_name: driver.first_name,
            last_name: driver.last_name,
            phone: driver.phone,
            created_at: driver.created_at,
            updated_at: driver.updated_at,
        }
    }
}

impl From<Driver> for DriverCredentials {
    fn from(mut driver: Driver) -> Self {
        let password_hash = driver.password_hash.take();
        Self {
            driver: driver.into(),
            password_hash,
        }
    }
}

#[derive(Clone)]
pub struct Drivers {
    db: PgPool,
}

impl Drivers {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait::async_trait]
impl Repository for Drivers {
    type CreateRequest = DriverCreateDBRequest;
    type UpdateRequest = DriverUpdateDBRequest;
    type Response = DriverDBResponse;
    type Id = DriverId;
    type Filter = DriverFilter;

    #[instrument(skip(self, request), fields(username = %request.username), err)]
    async fn create(&self, request: &Self::CreateRequest) -> Result<Self::Response> {
        let driver_id = Uuid::new_v4();

        let driver = sqlx::query_as::<_, Driver>(
            r#"
            INSERT INTO drivers (id, username, email, role, route, first_name, last_name, phone, password_hash)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING *
            "#,
        )
        .bind(driver_id)
        .bind(&request.username)
        .bind(&request.email)
        .bind(request.role)
        .bind(&request.route)
        .bind(&request.first_name)
        .bind(&request.last_name)
        .bind(&request.phone)
        .bind(&request.password_hash)
        .fetch_one(&self.db)
        .await?;

        Ok(driver.into())
    }

    #[instrument(skip(self), fields(driver_id = %abbrev_uuid(&id)), err)]
    async fn get_by_id(&self, id: Self::Id) -> Result<Option<Self::Response>> {
        let driver = sqlx::query_as::<_, Driver>("SELECT * FROM drivers WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.db)
            .await?;

        Ok(driver.map(Into::into))
    }

    #[instrument(skip(self, filter), fields(route = ?filter.route), err)]
    async fn list(&self, filter: &Self::Filter) -> Result<Vec<Self::Response>> {
        let drivers = sqlx::query_as::<_, Driver>(
            "SELECT * FROM drivers WHERE ($1::TEXT IS NULL OR route = $1) ORDER BY created_at, id",
        )
        .bind(&filter.route)
        .fetch_all(&self.db)
        .await?;

        Ok(drivers.into_iter().map(Into::into).collect())
    }

    #[instrument(skip(self), fields(driver_id = %abbrev_uuid(&id)), err)]
    async fn delete(&self, id: Self::Id) -> Result<bool> {
        let result = sqlx::query("DELETE FROM drivers WHERE id = $1")
            .bind(id)
            .execute(&self.db)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    #[instrument(skip(self, request), fields(driver_id = %abbrev_uuid(&id)), err)]
    async fn update(&self, id: Self::Id, request: &Self::UpdateRequest) -> Result<Self::Response> {
        let driver = sqlx::query_as::<_, Driver>(
            r#"
            UPDATE drivers SET
                username = COALESCE($2, username),
                email = COALESCE($3, email),
                role = COALESCE($4, role),
                route = CASE
                    WHEN $5 THEN $6::TEXT
                    ELSE route
                END,
                first_name = CASE
                    WHEN $7 THEN $8::TEXT
                    ELSE first_name
                END,
                last_name = CASE
                    WHEN $9 THEN $10::TEXT
                    ELSE last_name
                END,
                phone = CASE
                    WHEN $11 THEN $12::TEXT
                    ELSE phone
                END,
                password_hash = COALESCE($13, password_hash),
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&request.username)
        .bind(&request.email)
        .bind(request.role)
        // Nullable columns: (was the field provided, new value which may be NULL)
        .bind(request.route.is_some())
        .bind(request.route.as_ref().and_then(|inner| inner.as_ref()))
        .bind(request.first_name.is_some())
        .bind(request.first_name.as_ref().and_then(|inner| inner.as_ref()))
        .bind(request.last_name.is_some())
        .bind(request.last_name.as_ref().and_then(|inner| inner.as_ref()))
        .bind(request.phone.is_some())
        .bind(request.phone.as_ref().and_then(|inner| inner.as_ref()))
        .bind(&request.password_hash)
        .fetch_optional(&self.db)
        .await?
        .ok_or(DbError::NotFound)?;

        Ok(driver.into())
    }
}

#[async_trait::async_trait]
impl DriverRepository for Drivers {
    #[instrument(skip(self), err)]
    async fn get_by_username(&self, username: &str) -> Result<Option<DriverDBResponse>> {
        let driver = sqlx::query_as::<_, Driver>("SELECT * FROM drivers WHERE username = $1")
            .bind(username)
            .fetch_optional(&self.db)
            .await?;

        Ok(driver.map(Into::into))
    }

    #[instrument(skip(self), err)]
    async fn get_credentials_by_username(&self, username: &str) -> Result<Option<DriverCredentials>> {
        let driver = sqlx::query_as::<_, Driver>("SELECT * FROM drivers WHERE username = $1")
            .bind(username)
            .fetch_optional(&self.db)
            .await?;

        Ok(driver.map(Into::into))
    }
}
