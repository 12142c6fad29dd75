//! Domain-level error types.

use thiserror::Error;
use uuid::Uuid;

/// Domain errors - business logic failures.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Entity not found: {entity_type} with id {id}")]
    NotFound { entity_type: &'static str, id: Uuid },

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Storage unavailable: {0}")]
    StorageUnavailable(String),

    #[error("Unauthorized access")]
    Unauthorized,

    #[error("Authentication token expired")]
    TokenExpired,

    #[error("Internal error: {0}")]
    Internal(String),
}

impl DomainError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn not_found(entity_type: &'static str, id: Uuid) -> Self {
        Self::NotFound { entity_type, id }
    }

    /// Convert a repository error raised while working on `entity_type`/`id`.
    pub fn from_repo(err: RepoError, entity_type: &'static str, id: Uuid) -> Self {
        match err {
            RepoError::NotFound => Self::NotFound { entity_type, id },
            other => other.into(),
        }
    }
}

/// Repository-level errors.
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Database connection failed: {0}")]
    Connection(String),

    #[error("Query execution failed: {0}")]
    Query(String),

    #[error("Entity not found")]
    NotFound,

    #[error("Constraint violation: {0}")]
    Constraint(String),
}

impl From<RepoError> for DomainError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::Connection(msg) => DomainError::StorageUnavailable(msg),
            RepoError::Query(msg) => DomainError::Internal(msg),
            RepoError::NotFound => DomainError::Internal("Entity vanished mid-operation".to_string()),
            RepoError::Constraint(msg) => DomainError::Conflict(msg),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repo_error_mapping() {
        assert!(matches!(
            DomainError::from(RepoError::Connection("refused".into())),
            DomainError::StorageUnavailable(_)
        ));
        assert!(matches!(
            DomainError::from(RepoError::Constraint("users_email_key".into())),
            DomainError::Conflict(_)
        ));
        assert!(matches!(
            DomainError::from(RepoError::Query("syntax".into())),
            DomainError::Internal(_)
        ));
    }

    #[test]
    fn test_from_repo_keeps_entity_context() {
        let id = Uuid::new_v4();
        let err = DomainError::from_repo(RepoError::NotFound, "BlogPost", id);

        match err {
            DomainError::NotFound { entity_type, id: got } => {
                assert_eq!(entity_type, "BlogPost");
                assert_eq!(got, id);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
