//! Application-wide error types.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A single field-level validation failure.
///
/// `field` is a path into the submitted document (`items[1].amount`),
/// `rule` is a stable token a client can switch on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldViolation {
    /// Path of the offending field.
    pub field: String,
    /// Rule that failed (`required`, `positive`, `one_of`, ...).
    pub rule: String,
    /// Human-readable message.
    pub message: String,
}

impl FieldViolation {
    /// Creates a new violation.
    #[must_use]
    pub fn new(field: impl Into<String>, rule: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            rule: rule.into(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for FieldViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

fn join_violations(violations: &[FieldViolation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Application error types.
#[derive(Debug, Error)]
pub enum AppError {
    /// Input failed validation; never reaches storage.
    #[error("Validation error: {}", join_violations(.0))]
    Validation(Vec<FieldViolation>),

    /// Authentication failed.
    #[error("Authentication failed: {0}")]
    Unauthorized(String),

    /// Access denied.
    #[error("Access denied: {0}")]
    Forbidden(String),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Conflict (duplicate entry, row still referenced).
    #[error("Conflict: {0}")]
    Conflict(String),

    /// A referenced entity does not exist.
    #[error("Reference not found: {0}")]
    ReferenceNotFound(String),

    /// Storage did not answer within the operation deadline.
    #[error("Storage timeout: {0}")]
    Timeout(String),

    /// Storage could not be reached.
    #[error("Storage unavailable: {0}")]
    Unavailable(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Builds a validation error carrying a single violation.
    #[must_use]
    pub fn invalid_field(
        field: impl Into<String>,
        rule: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::Validation(vec![FieldViolation::new(field, rule, message)])
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::Validation(_) => 400,
            Self::Unauthorized(_) => 401,
            Self::Forbidden(_) => 403,
            Self::NotFound(_) => 404,
            Self::Conflict(_) => 409,
            Self::ReferenceNotFound(_) => 422,
            Self::Timeout(_) | Self::Unavailable(_) => 503,
            Self::Internal(_) => 500,
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::Unauthorized(_) => "UNAUTHORIZED",
            Self::Forbidden(_) => "FORBIDDEN",
            Self::NotFound(_) => "NOT_FOUND",
            Self::Conflict(_) => "CONFLICT",
            Self::ReferenceNotFound(_) => "REFERENCE_NOT_FOUND",
            Self::Timeout(_) => "STORAGE_TIMEOUT",
            Self::Unavailable(_) => "STORAGE_UNAVAILABLE",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Returns true if resubmitting the same request may succeed.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::Timeout(_) | Self::Unavailable(_))
    }

    /// Returns the field violations for validation errors.
    #[must_use]
    pub fn violations(&self) -> &[FieldViolation] {
        match self {
            Self::Validation(v) => v,
            _ => &[],
        }
    }
}
