use thiserror::Error;
use uuid::Uuid;

use crate::core::error::AppError;
use crate::features::categories::store::{StoreError, UniqueConstraint};

/// Failure kinds of the category path resolver
#[derive(Debug, Error)]
pub enum CategoryError {
    #[error("{0}")]
    InvalidPathFormat(String),

    #[error("Slug already exists")]
    PathAlreadyExists,

    #[error("Parent slug does not exist")]
    ParentNotFound,

    #[error("Name already exists")]
    NameAlreadyExists,

    #[error("Category '{0}' not found")]
    NotFound(String),

    #[error("A category cannot have more than {max} direct subcategories")]
    SiblingLimitReached { max: usize },

    /// The path index points at a category that does not exist
    #[error("Category index references missing category {0}")]
    Integrity(Uuid),

    #[error(transparent)]
    Store(StoreError),
}

impl From<StoreError> for CategoryError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::UniqueViolation(UniqueConstraint::ParentSlug)
            | StoreError::UniqueViolation(UniqueConstraint::FullPath) => {
                CategoryError::PathAlreadyExists
            }
            StoreError::UniqueViolation(UniqueConstraint::ParentName) => {
                CategoryError::NameAlreadyExists
            }
            StoreError::SiblingLimit { max } => CategoryError::SiblingLimitReached { max },
            // Parent vanished between resolution and insert
            StoreError::UnknownParent(_) => CategoryError::ParentNotFound,
            other => CategoryError::Store(other),
        }
    }
}

impl From<CategoryError> for AppError {
    fn from(e: CategoryError) -> Self {
        match e {
            CategoryError::InvalidPathFormat(_)
            | CategoryError::PathAlreadyExists
            | CategoryError::ParentNotFound
            | CategoryError::NameAlreadyExists
            | CategoryError::SiblingLimitReached { .. } => AppError::Validation(e.to_string()),
            CategoryError::NotFound(_) => AppError::NotFound(e.to_string()),
            CategoryError::Integrity(_) => AppError::Internal(e.to_string()),
            CategoryError::Store(StoreError::Database(db)) => AppError::Database(db),
            CategoryError::Store(other) => AppError::Internal(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constraint_violations_match_pre_check_errors() {
        assert!(matches!(
            CategoryError::from(StoreError::UniqueViolation(UniqueConstraint::ParentSlug)),
            CategoryError::PathAlreadyExists
        ));
        assert!(matches!(
            CategoryError::from(StoreError::UniqueViolation(UniqueConstraint::FullPath)),
            CategoryError::PathAlreadyExists
        ));
        assert!(matches!(
            CategoryError::from(StoreError::UniqueViolation(UniqueConstraint::ParentName)),
            CategoryError::NameAlreadyExists
        ));
    }

    #[test]
    fn test_app_error_mapping() {
        assert!(matches!(
            AppError::from(CategoryError::ParentNotFound),
            AppError::Validation(msg) if msg == "Parent slug does not exist"
        ));
        assert!(matches!(
            AppError::from(CategoryError::NotFound("a/b".to_string())),
            AppError::NotFound(_)
        ));
        assert!(matches!(
            AppError::from(CategoryError::Integrity(Uuid::nil())),
            AppError::Internal(_)
        ));
        assert!(matches!(
            AppError::from(CategoryError::Store(StoreError::Database(
                sqlx::Error::PoolTimedOut
            ))),
            AppError::Database(_)
        ));
    }
}
