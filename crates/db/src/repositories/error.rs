//! Storage error type shared by every repository.

use std::time::Duration;

use sea_orm::{DbErr, SqlErr};
use uuid::Uuid;
use zakat_core::references::Reference;
use zakat_shared::AppError;

/// Error types for repository operations.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    /// The addressed row does not exist.
    #[error("{entity} not found: {id}")]
    NotFound {
        /// Entity name.
        entity: &'static str,
        /// Requested id.
        id: Uuid,
    },

    /// A foreign row the write depends on does not exist.
    #[error("{0}")]
    ReferenceNotFound(Reference),

    /// A foreign key failed on write after the reference checks passed.
    #[error("a row referenced by this {0} no longer exists")]
    StaleReference(&'static str),

    /// A unique column already holds the submitted value.
    #[error("{entity} with this {field} already exists")]
    Duplicate {
        /// Entity name.
        entity: &'static str,
        /// Offending column.
        field: &'static str,
    },

    /// Delete refused because other rows still point at this one.
    #[error("{entity} {id} is still in use")]
    InUse {
        /// Entity name.
        entity: &'static str,
        /// Row id.
        id: Uuid,
    },

    /// The operation did not finish within its deadline.
    #[error("storage operation timed out after {0:?}")]
    Timeout(Duration),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl RepositoryError {
    /// Translates a failed insert or update.
    pub(crate) fn on_write(err: DbErr, entity: &'static str, unique_field: &'static str) -> Self {
        match err.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(_)) => Self::Duplicate {
                entity,
                field: unique_field,
            },
            Some(SqlErr::ForeignKeyConstraintViolation(_)) => Self::StaleReference(entity),
            _ => Self::Database(err),
        }
    }

    /// Translates a failed update of the row `id`.
    pub(crate) fn on_update(
        err: DbErr,
        entity: &'static str,
        id: Uuid,
        unique_field: &'static str,
    ) -> Self {
        match err {
            DbErr::RecordNotUpdated => Self::NotFound { entity, id },
            err => Self::on_write(err, entity, unique_field),
        }
    }

    /// Translates a failed delete.
    pub(crate) fn on_delete(err: DbErr, entity: &'static str, id: Uuid) -> Self {
        match err.sql_err() {
            Some(SqlErr::ForeignKeyConstraintViolation(_)) => Self::InUse { entity, id },
            _ => Self::Database(err),
        }
    }

    /// True when the database could not be reached at all.
    #[must_use]
    pub const fn is_unavailable(&self) -> bool {
        matches!(
            self,
            Self::Database(DbErr::Conn(_) | DbErr::ConnectionAcquire(_))
        )
    }

    /// True for failures worth retrying unchanged.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::Timeout(_)) || self.is_unavailable()
    }
}

impl From<RepositoryError> for AppError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound { .. } => Self::NotFound(err.to_string()),
            RepositoryError::ReferenceNotFound(reference) => reference.not_found(),
            RepositoryError::StaleReference(_) => Self::ReferenceNotFound(err.to_string()),
            RepositoryError::Duplicate { .. } | RepositoryError::InUse { .. } => {
                Self::Conflict(err.to_string())
            }
            RepositoryError::Timeout(_) => Self::Timeout(err.to_string()),
            RepositoryError::Database(_) if err.is_unavailable() => {
                Self::Unavailable("database is unavailable".to_string())
            }
            RepositoryError::Database(_) => Self::Internal("database error".to_string()),
        }
    }
}
