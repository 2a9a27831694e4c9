//! Mapping of SQLx errors onto domain errors

use mk_core::errors::DomainError;

/// Convert a SQLx error into the domain error the core understands
///
/// Connectivity failures become `StoreUnavailable`, row decoding problems
/// become `Internal` and unique-key violations become `Conflict`.
pub fn map_sqlx_error(error: sqlx::Error) -> DomainError {
    match &error {
        sqlx::Error::PoolTimedOut
        | sqlx::Error::PoolClosed
        | sqlx::Error::WorkerCrashed
        | sqlx::Error::Io(_)
        | sqlx::Error::Tls(_) => {
            tracing::error!("Database unavailable: {}", error);
            DomainError::StoreUnavailable {
                message: error.to_string(),
            }
        }
        sqlx::Error::Database(db) if db.is_unique_violation() => DomainError::Conflict {
            message: db.message().to_string(),
        },
        sqlx::Error::RowNotFound => DomainError::NotFound {
            resource: "row".to_string(),
        },
        _ => {
            tracing::error!("Database error: {}", error);
            DomainError::Internal {
                message: error.to_string(),
            }
        }
    }
}
