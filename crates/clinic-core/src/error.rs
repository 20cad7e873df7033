//! Service-level errors.

use thiserror::Error;

use crate::db::DbError;
use crate::storage::StorageError;
use crate::validation::ValidationError;

/// Errors raised by the patient, agenda and document services.
#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Database error: {0}")]
    Database(DbError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Patient onboarding rolled back; the cause is boxed inside.
    #[error("Patient onboarding failed: {0}")]
    Onboarding(#[source] Box<ServiceError>),

    /// Follow-up batch rolled back; the cause is boxed inside.
    #[error("Follow-up upload failed: {0}")]
    BatchUpload(#[source] Box<ServiceError>),
}

impl From<DbError> for ServiceError {
    fn from(e: DbError) -> Self {
        match e {
            DbError::NotFound(what) => ServiceError::NotFound(what),
            other => ServiceError::Database(other),
        }
    }
}

impl ServiceError {
    /// The innermost cause, looking through aggregated failures.
    pub fn root_cause(&self) -> &ServiceError {
        match self {
            ServiceError::Onboarding(inner) | ServiceError::BatchUpload(inner) => inner.root_cause(),
            other => other,
        }
    }
}

pub type ServiceResult<T> = Result<T, ServiceError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_db_not_found_maps_to_not_found() {
        let err: ServiceError = DbError::NotFound("patient 1".into()).into();
        assert!(matches!(err, ServiceError::NotFound(ref what) if what == "patient 1"));

        let err: ServiceError = DbError::Constraint("UNIQUE".into()).into();
        assert!(matches!(err, ServiceError::Database(DbError::Constraint(_))));
    }

    #[test]
    fn test_root_cause_unwraps_aggregates() {
        let err = ServiceError::Onboarding(Box::new(ServiceError::NotFound("psychologist x".into())));
        assert!(matches!(err.root_cause(), ServiceError::NotFound(_)));
        assert!(err.to_string().contains("psychologist x"));
    }
}
