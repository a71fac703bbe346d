//! Persistence seam for the category tree and its path index.
//!
//! A store exposes committed reads directly and scopes every write to a
//! unit of work. Uniqueness of `(parent, slug)`, `(parent, name)` and the
//! full path is enforced by the store itself; the service-level checks only
//! produce earlier, friendlier errors.

mod memory;
mod postgres;

use async_trait::async_trait;
use futures::stream::BoxStream;
use thiserror::Error;
use uuid::Uuid;

use crate::core::error::unique_violation;
use crate::features::categories::models::{Category, NewCategory, PathEntry};

pub use memory::MemoryCategoryStore;
pub use postgres::PgCategoryStore;

/// Storage-level uniqueness rules
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UniqueConstraint {
    ParentSlug,
    ParentName,
    FullPath,
}

impl UniqueConstraint {
    pub const PARENT_SLUG: &'static str = "uq_categories_parent_slug";
    pub const PARENT_NAME: &'static str = "uq_categories_parent_name";
    pub const FULL_PATH: &'static str = "uq_category_paths_full_slug_path";

    pub fn from_constraint_name(name: &str) -> Option<Self> {
        match name {
            Self::PARENT_SLUG => Some(Self::ParentSlug),
            Self::PARENT_NAME => Some(Self::ParentName),
            Self::FULL_PATH => Some(Self::FullPath),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ParentSlug => Self::PARENT_SLUG,
            Self::ParentName => Self::PARENT_NAME,
            Self::FullPath => Self::FULL_PATH,
        }
    }
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Unique constraint violated: {}", .0.as_str())]
    UniqueViolation(UniqueConstraint),

    #[error("Sibling group is full (max {max})")]
    SiblingLimit { max: usize },

    #[error("Parent category {0} is not indexed")]
    UnknownParent(Uuid),

    #[error("Database error: {0}")]
    Database(sqlx::Error),
}

impl From<sqlx::Error> for StoreError {
    fn from(e: sqlx::Error) -> Self {
        match unique_violation(&e).and_then(UniqueConstraint::from_constraint_name) {
            Some(constraint) => StoreError::UniqueViolation(constraint),
            None => StoreError::Database(e),
        }
    }
}

/// Committed-state reads plus a factory for units of work
#[async_trait]
pub trait CategoryStore: Send + Sync {
    /// Start a unit of work; dropping it without `commit` discards its writes.
    async fn begin(&self) -> Result<Box<dyn CategoryUnitOfWork>, StoreError>;

    async fn resolve_by_path(&self, full_path: &str) -> Result<Option<PathEntry>, StoreError>;

    async fn resolve_by_id(&self, id: Uuid) -> Result<Option<PathEntry>, StoreError>;

    /// Load the authoritative node
    async fn find_node(&self, id: Uuid) -> Result<Option<Category>, StoreError>;

    /// All path entries by ascending sort key. Each call starts a fresh pass.
    fn list_ordered(&self) -> BoxStream<'_, Result<PathEntry, StoreError>>;
}

/// One atomic category write
#[async_trait]
pub trait CategoryUnitOfWork: Send {
    async fn resolve_by_path(&mut self, full_path: &str) -> Result<Option<PathEntry>, StoreError>;

    async fn resolve_sibling_by_name(
        &mut self,
        parent_id: Option<Uuid>,
        name: &str,
    ) -> Result<Option<PathEntry>, StoreError>;

    /// Insert the node and its path entry under `parent`, re-ranking siblings.
    async fn insert(
        &mut self,
        parent: Option<&PathEntry>,
        full_path: &str,
        category: NewCategory,
    ) -> Result<Category, StoreError>;

    async fn commit(self: Box<Self>) -> Result<(), StoreError>;
}
