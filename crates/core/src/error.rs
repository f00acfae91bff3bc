//! Domain and storage error models.

use thiserror::Error;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level error.
///
/// Keep this focused on deterministic, business/domain failures (validation,
/// malformed identifiers). Infrastructure concerns belong in
/// [`RepositoryError`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A value failed validation (e.g. malformed input).
    #[error("validation failed: {0}")]
    Validation(String),

    /// An identifier was invalid (e.g. parse failure).
    #[error("invalid identifier: {0}")]
    InvalidId(String),
}

impl DomainError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }
}

/// Storage operation error.
///
/// This enum represents errors surfaced by a repository implementation. These
/// are **infrastructure errors** (connectivity, constraints, backend faults)
/// as opposed to domain errors (validation, invariants). Workflows propagate
/// them unmodified; they are never translated into business failure kinds.
///
/// ## Error Categories
///
/// - **Unavailable**: the store cannot be reached or is shut down
/// - **ConstraintViolation**: the store rejected a write (uniqueness, checks,
///   refused stock underflow)
/// - **Backend**: any other storage-side failure
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("store unavailable: {0}")]
    Unavailable(String),

    #[error("constraint violation: {0}")]
    ConstraintViolation(String),

    #[error("storage backend error: {0}")]
    Backend(String),
}
