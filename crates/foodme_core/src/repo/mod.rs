//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define use-case oriented data access contracts for the four stores.
//! - Isolate SQLite query details from service/business orchestration.
//!
//! # Invariants
//! - Repository writes enforce model validation before SQL mutations.
//! - Multi-entity mutations run inside one immediate transaction.
//! - Repository APIs return semantic errors (`NotFound`, `Conflict`,
//!   `Authorization`, ...) in addition to DB transport errors.

use crate::db::DbError;
use crate::model::ValidationError;
use crate::security::password::PasswordError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod affinity_repo;
pub mod preference_repo;
mod readiness;
pub mod restaurant_repo;
pub mod user_repo;

pub type RepoResult<T> = Result<T, RepoError>;

/// Store-level error taxonomy shared by all four repositories.
///
/// `EmptyListing` is the not-found class for listing operations that treat
/// an empty result set as an error (the preference store and the account
/// roster do; affinity listings deliberately do not).
#[derive(Debug)]
pub enum RepoError {
    /// Malformed or out-of-policy input; caller can correct and retry.
    Validation(ValidationError),
    /// A referenced entity does not exist.
    NotFound {
        entity: &'static str,
        key: String,
    },
    /// A listing operation found no rows at all.
    EmptyListing(&'static str),
    /// Uniqueness violation on create.
    Conflict {
        entity: &'static str,
        key: String,
    },
    /// Credential verification failed.
    Authentication(String),
    /// The entity exists but is owned by a different user.
    Authorization {
        entity: &'static str,
        key: String,
        username: String,
    },
    Db(DbError),
    /// Persisted state that violates the data contract.
    InvalidData(String),
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    MissingRequiredTable(&'static str),
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::NotFound { entity, key } => write!(f, "{entity} `{key}` does not exist"),
            Self::EmptyListing(entity) => write!(f, "no {entity} exist"),
            Self::Conflict { entity, key } => write!(f, "{entity} `{key}` already exists"),
            Self::Authentication(message) => write!(f, "{message}"),
            Self::Authorization {
                entity,
                key,
                username,
            } => write!(f, "{entity} `{key}` is not related to user `{username}`"),
            Self::Db(err) => write!(f, "{err}"),
            Self::InvalidData(message) => write!(f, "invalid persisted data: {message}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "connection schema version {actual_version} does not match expected {expected_version}"
            ),
            Self::MissingRequiredTable(table) => {
                write!(f, "required table `{table}` is missing")
            }
            Self::MissingRequiredColumn { table, column } => {
                write!(f, "required column `{column}` is missing on table `{table}`")
            }
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ValidationError> for RepoError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

impl From<PasswordError> for RepoError {
    fn from(value: PasswordError) -> Self {
        match value {
            PasswordError::Mismatch => Self::Authentication("invalid old password".to_string()),
            PasswordError::MalformedHash => {
                Self::InvalidData("stored password hash is malformed".to_string())
            }
        }
    }
}
