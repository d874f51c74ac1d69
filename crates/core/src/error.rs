//! Domain error model.

use thiserror::Error;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level error taxonomy.
///
/// Every fallible operation in the domain and store layers resolves to one of
/// these variants; the API boundary maps each variant to a fixed HTTP status.
/// Storage engine errors never cross this boundary raw — store adapters
/// translate constraint violations into `Conflict` with a domain message and
/// everything else into `Store`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Malformed or missing input (400).
    #[error("{0}")]
    Validation(String),

    /// Missing or invalid credential token (401).
    #[error("{0}")]
    Authentication(String),

    /// Authenticated but lacking a required role (403).
    #[error("{0}")]
    Authorization(String),

    /// A referenced entity is absent (404).
    #[error("{0} not found")]
    NotFound(String),

    /// Duplicate unique key, insufficient stock, in-use reference (409).
    #[error("{0}")]
    Conflict(String),

    /// Underlying storage failure; surfaced as transient, not retried here (500).
    #[error("storage failure: {0}")]
    Store(String),
}

impl DomainError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn authentication(msg: impl Into<String>) -> Self {
        Self::Authentication(msg.into())
    }

    pub fn authorization(msg: impl Into<String>) -> Self {
        Self::Authorization(msg.into())
    }

    pub fn not_found(entity: impl Into<String>) -> Self {
        Self::NotFound(entity.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }

    pub fn store(msg: impl Into<String>) -> Self {
        Self::Store(msg.into())
    }
}
