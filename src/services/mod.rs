//! Use-case layer between the HTTP handlers and the record store.
//!
//! Every function is generic over the repository traits it needs, so the same
//! code runs against [`crate::repository::DieselRepository`] and the mockall
//! mock used in tests.

use thiserror::Error;

use crate::domain::types::TypeConstraintError;
use crate::repository::errors::RepositoryError;
use crate::validation::ValidationErrors;

pub mod clients;
pub mod communications;
pub mod contracts;
pub mod dashboard;
pub mod delinquency;
#[cfg(test)]
mod fixtures;
pub mod interactions;
pub mod invoices;
pub mod lots;
pub mod price_adjustments;
pub mod triggers;
pub mod users;

/// Failure of a service call.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Payload rejected by its schema.
    #[error("{0}")]
    Validation(ValidationErrors),

    /// Payload passed its schema but a value object refused it.
    #[error("type constraint violated: {0}")]
    TypeConstraint(String),

    #[error("not found")]
    NotFound,

    #[error("conflict: {0}")]
    Conflict(String),

    /// A derived record broke one of its invariants.
    #[error("computation error: {0}")]
    Computation(String),

    #[error("dashboard data unavailable")]
    Unavailable,

    #[error("data access error: {0}")]
    DataAccess(RepositoryError),
}

pub type ServiceResult<T> = Result<T, ServiceError>;

impl From<RepositoryError> for ServiceError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound => ServiceError::NotFound,
            RepositoryError::ConstraintViolation(message) => ServiceError::Conflict(message),
            other => ServiceError::DataAccess(other),
        }
    }
}

impl From<ValidationErrors> for ServiceError {
    fn from(err: ValidationErrors) -> Self {
        ServiceError::Validation(err)
    }
}

impl From<TypeConstraintError> for ServiceError {
    fn from(err: TypeConstraintError) -> Self {
        ServiceError::TypeConstraint(err.to_string())
    }
}

/// Page number and size requested by a list endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: usize,
    pub per_page: usize,
}

impl PageRequest {
    pub fn new(page: Option<usize>, per_page: Option<usize>) -> Self {
        Self {
            page: page.unwrap_or(1).max(1),
            per_page: per_page
                .unwrap_or(crate::pagination::DEFAULT_ITEMS_PER_PAGE)
                .clamp(1, crate::pagination::MAX_ITEMS_PER_PAGE),
        }
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(None, None)
    }
}
