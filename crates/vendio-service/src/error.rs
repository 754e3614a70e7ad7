//! # Service Error Taxonomy
//!
//! The error surface the presentation boundary maps to transport status
//! codes.
//!
//! ## Propagation Policy
//! ```text
//! sqlx::Error ──► DbError ──► ServiceError ──► transport status (external)
//!                  typed        taxonomy
//! ```
//!
//! Lower layers never leak raw store errors upward; `Internal` carries a
//! message for the log, and the boundary is expected to surface it
//! generically rather than verbatim.

use thiserror::Error;
use vendio_core::ValidationError;
use vendio_db::DbError;

/// Errors surfaced by the identity and purchase services.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Malformed or missing input. Client error.
    #[error("Invalid input: {0}")]
    Validation(#[from] ValidationError),

    /// Bad email/password pair.
    ///
    /// Deliberately identical for "unknown email" and "wrong password":
    /// callers get no account-enumeration signal.
    #[error("email or password is invalid")]
    InvalidCredentials,

    /// Unknown, expired or revoked refresh session.
    #[error("invalid or expired session")]
    InvalidSession,

    /// An account with this email already exists. Conflict.
    #[error("account already exists: {0}")]
    DuplicateAccount(String),

    /// A purchase asked for more than is available. Conflict.
    #[error("insufficient stock for {product_id}: available {available}, requested {requested}")]
    InsufficientStock {
        product_id: String,
        available: i64,
        requested: i64,
    },

    /// Referenced entity does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// Store or cryptographic failure. Logged with detail, surfaced
    /// generically.
    #[error("internal error: {0}")]
    Internal(String),
}

/// Maps classified database errors onto the taxonomy, 1:1.
impl From<DbError> for ServiceError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { entity, id } => {
                ServiceError::NotFound(format!("{entity} {id}"))
            }
            // The only unique column reachable through the services is the
            // account email
            DbError::UniqueViolation { value, .. } => ServiceError::DuplicateAccount(value),
            other => ServiceError::Internal(other.to_string()),
        }
    }
}

/// Result type for service operations.
pub type ServiceResult<T> = Result<T, ServiceError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn db_errors_map_onto_taxonomy() {
        let err: ServiceError = DbError::not_found("Product", "p-1").into();
        assert!(matches!(err, ServiceError::NotFound(_)));

        let err: ServiceError = DbError::UniqueViolation {
            field: "accounts.email".to_string(),
            value: "jo@example.com".to_string(),
        }
        .into();
        match err {
            ServiceError::DuplicateAccount(value) => assert_eq!(value, "jo@example.com"),
            other => panic!("expected DuplicateAccount, got {other:?}"),
        }

        let err: ServiceError = DbError::PoolExhausted.into();
        assert!(matches!(err, ServiceError::Internal(_)));
    }

    #[test]
    fn credential_errors_share_one_message() {
        // The message must not vary by cause
        assert_eq!(
            ServiceError::InvalidCredentials.to_string(),
            "email or password is invalid"
        );
    }
}
