use crate::db::errors::DbError;
use thiserror::Error as ThisError;

#[derive(ThisError, Debug)]
pub enum Error {
    /// Unknown username or wrong password; the two are deliberately not distinguished
    #[error("Username or password is incorrect")]
    InvalidCredentials,

    /// Session token missing, malformed, expired or signed with another key
    #[error("Not authenticated")]
    Unauthenticated { message: Option<String> },

    /// Requested resource not found
    #[error("{resource} with ID {id} not found")]
    NotFound { resource: String, id: String },

    /// Username already belongs to another driver
    #[error("Username \"{username}\" is already taken")]
    DuplicateUsername { username: String },

    /// Generic internal service error
    #[error("Failed to {operation}")]
    Internal { operation: String },

    /// Database operation error
    #[error(transparent)]
    Database(DbError),

    /// Unexpected error with full context chain
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl Error {
    /// Returns a user-safe error message, without leaking internal implementation details
    pub fn user_message(&self) -> String {
        match self {
            Error::InvalidCredentials => "Username or password is incorrect".to_string(),
            Error::Unauthenticated { message } => message.clone().unwrap_or_else(|| "Authentication required".to_string()),
            Error::NotFound { resource, id } => format!("{resource} with ID {id} not found"),
            Error::DuplicateUsername { username } => format!("Username \"{username}\" is already taken"),
            Error::Internal { .. } => "Internal server error".to_string(),
            Error::Database(db_err) => match db_err {
                DbError::NotFound => "Resource not found".to_string(),
                DbError::UniqueViolation { .. } => "Resource already exists".to_string(),
                DbError::ForeignKeyViolation { .. } => "Invalid reference to related resource".to_string(),
                DbError::CheckViolation { .. } => "Invalid data provided".to_string(),
                DbError::Other(_) => "Database error occurred".to_string(),
            },
            Error::Other(_) => "Internal server error".to_string(),
        }
    }
}

/// Username constraint violations become `DuplicateUsername` so a create that loses the
/// check-then-insert race reports the same error as one caught by the pre-check.
impl From<DbError> for Error {
    fn from(err: DbError) -> Self {
        if err.is_username_conflict() {
            let username = match &err {
                DbError::UniqueViolation {
                    conflicting_value: Some(value),
                    ..
                } => value.clone(),
                _ => String::new(),
            };
            return Error::DuplicateUsername { username };
        }
        Error::Database(err)
    }
}

/// Type alias for service operation results
pub type Result<T> = std::result::Result<T, Error>;
