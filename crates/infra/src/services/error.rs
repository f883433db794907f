use thiserror::Error;

use forgeledger_core::{Cancelled, DomainError};

use crate::store::StoreError;

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Error returned by every ledger service operation.
///
/// `CompanyContextMissing`, `NotFound`, `Validation`, `InvariantViolation` and `Conflict`
/// are deterministic and non-fatal. `Store` wraps infrastructure failures; this layer does
/// not retry them.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("company context missing")]
    CompanyContextMissing,

    #[error("not found: {0}")]
    NotFound(String),

    #[error("validation failed: {0}")]
    Validation(String),

    #[error("invariant violated: {0}")]
    InvariantViolation(String),

    #[error("conflict: {0}")]
    Conflict(String),

    #[error("operation cancelled")]
    Cancelled,

    #[error("store error: {0}")]
    Store(StoreError),
}

impl From<DomainError> for ServiceError {
    fn from(value: DomainError) -> Self {
        match value {
            DomainError::CompanyContextMissing => ServiceError::CompanyContextMissing,
            DomainError::Validation(msg) => ServiceError::Validation(msg),
            DomainError::InvalidId(msg) => ServiceError::Validation(msg),
            DomainError::InvariantViolation(msg) => ServiceError::InvariantViolation(msg),
            DomainError::NotFound(what) => ServiceError::NotFound(what),
        }
    }
}

impl From<StoreError> for ServiceError {
    fn from(value: StoreError) -> Self {
        match value {
            StoreError::Conflict(msg) => ServiceError::Conflict(msg),
            StoreError::NotFound(what) => ServiceError::NotFound(what),
            other => ServiceError::Store(other),
        }
    }
}

impl From<Cancelled> for ServiceError {
    fn from(_: Cancelled) -> Self {
        tracing::warn!("operation cancelled");
        ServiceError::Cancelled
    }
}

impl ServiceError {
    /// Infrastructure failures are fatal to the request; everything else is a typed outcome.
    pub fn is_fatal(&self) -> bool {
        matches!(self, ServiceError::Store(_))
    }
}
