//! Domain error model.

use thiserror::Error;

use crate::entity::Entity;
use crate::validation::ValidationErrors;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Result type returned by repository ports.
pub type StoreResult<T> = Result<T, StoreError>;

/// Failure reported by a persistence backend.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The backend could not serve the request (e.g. a poisoned lock).
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// A unique index rejected the write.
    #[error("unique constraint violated on `{field}`")]
    UniqueViolation { field: &'static str },

    /// A referenced row does not exist.
    #[error("foreign key violated: `{field}` = {value}")]
    ForeignKey { field: &'static str, value: String },
}

impl StoreError {
    pub fn unavailable(msg: impl Into<String>) -> Self {
        Self::Unavailable(msg.into())
    }

    pub fn foreign_key(field: &'static str, value: impl ToString) -> Self {
        Self::ForeignKey {
            field,
            value: value.to_string(),
        }
    }
}

/// Domain-level error.
///
/// Expected business failures (validation, the deletion guard) surface as
/// `Validation` with the collected field errors attached. Backend failures are
/// carried through unchanged as `Store`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// One or more validation rules failed.
    #[error("validation failed: {0}")]
    Validation(ValidationErrors),

    /// An identifier was invalid (e.g. parse failure).
    #[error("invalid identifier: {0}")]
    InvalidId(String),

    /// A requested record was not found.
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: String },

    /// The persistence backend failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl DomainError {
    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }

    pub fn not_found<E: Entity>(id: E::Id) -> Self {
        Self::NotFound {
            entity: E::NAME,
            id: id.to_string(),
        }
    }

    /// Collected validation errors, if this is a validation failure.
    pub fn errors(&self) -> Option<&ValidationErrors> {
        match self {
            Self::Validation(errors) => Some(errors),
            _ => None,
        }
    }
}

impl From<ValidationErrors> for DomainError {
    fn from(errors: ValidationErrors) -> Self {
        Self::Validation(errors)
    }
}
