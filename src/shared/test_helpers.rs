#[cfg(test)]
use std::sync::Arc;

#[cfg(test)]
use crate::features::categories::dtos::CreateCategoryDto;
#[cfg(test)]
use crate::features::categories::store::MemoryCategoryStore;
#[cfg(test)]
use crate::features::categories::CategoryService;
#[cfg(test)]
use crate::features::categories::models::{Category, PathEntry};
#[cfg(test)]
use crate::features::categories::store::{CategoryStore, CategoryUnitOfWork, StoreError};
#[cfg(test)]
use async_trait::async_trait;
#[cfg(test)]
use futures::stream::BoxStream;
#[cfg(test)]
use uuid::Uuid;

/// Seven-node tree used across category tests, in pre-order
#[cfg(test)]
pub const FIXTURE_PATHS: [&str; 7] = [
    "category-1",
    "category-1/category-1-1",
    "category-1/category-1-2",
    "category-2",
    "category-2/category-2-1",
    "category-2/category-2-1/category-2-1-1",
    "category-2/category-2-1/category-2-1-2",
];

/// Sibling rank of each fixture node, passed as its sort order
#[cfg(test)]
pub const FIXTURE_RANKS: [i32; 7] = [1, 1, 2, 2, 1, 1, 2];

#[cfg(test)]
pub fn create_category_dto(slug: &str, name: &str) -> CreateCategoryDto {
    CreateCategoryDto {
        slug: slug.to_string(),
        name: name.to_string(),
        description: None,
        sort_order: None,
    }
}

#[cfg(test)]
pub fn memory_category_service() -> Arc<CategoryService> {
    Arc::new(CategoryService::new(Arc::new(MemoryCategoryStore::new())))
}

/// Memory store whose path index outlives the categories it points at
#[cfg(test)]
pub struct DanglingNodeStore {
    pub inner: MemoryCategoryStore,
}

#[cfg(test)]
#[async_trait]
impl CategoryStore for DanglingNodeStore {
    async fn begin(&self) -> Result<Box<dyn CategoryUnitOfWork>, StoreError> {
        self.inner.begin().await
    }

    async fn resolve_by_path(&self, full_path: &str) -> Result<Option<PathEntry>, StoreError> {
        self.inner.resolve_by_path(full_path).await
    }

    async fn resolve_by_id(&self, id: Uuid) -> Result<Option<PathEntry>, StoreError> {
        self.inner.resolve_by_id(id).await
    }

    async fn find_node(&self, _id: Uuid) -> Result<Option<Category>, StoreError> {
        Ok(None)
    }

    fn list_ordered(&self) -> BoxStream<'_, Result<PathEntry, StoreError>> {
        self.inner.list_ordered()
    }
}

/// Service over a seeded fixture tree whose categories cannot be loaded
#[cfg(test)]
pub async fn dangling_category_service() -> Arc<CategoryService> {
    let inner = MemoryCategoryStore::new();
    seed_fixture_tree(&CategoryService::new(Arc::new(inner.clone()))).await;
    Arc::new(CategoryService::new(Arc::new(DanglingNodeStore { inner })))
}

/// Insert the fixture tree; names are unique per parent by construction.
#[cfg(test)]
pub async fn seed_fixture_tree(service: &CategoryService) {
    for (path, rank) in FIXTURE_PATHS.into_iter().zip(FIXTURE_RANKS) {
        let own_slug = path.rsplit('/').next().unwrap_or(path);
        let mut dto = create_category_dto(path, &own_slug.replace('-', " "));
        dto.sort_order = Some(rank);
        service.create(dto).await.unwrap();
    }
}

/// PostgreSQL-shaped driver error carrying a SQLSTATE and constraint name
#[cfg(test)]
#[derive(Debug)]
pub struct PgErrorStub {
    pub code: &'static str,
    pub constraint: Option<&'static str>,
}

#[cfg(test)]
impl std::fmt::Display for PgErrorStub {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SQLSTATE {}", self.code)
    }
}

#[cfg(test)]
impl std::error::Error for PgErrorStub {}

#[cfg(test)]
impl sqlx::error::DatabaseError for PgErrorStub {
    fn message(&self) -> &str {
        "constraint violated"
    }

    fn code(&self) -> Option<std::borrow::Cow<'_, str>> {
        Some(std::borrow::Cow::Borrowed(self.code))
    }

    fn as_error(&self) -> &(dyn std::error::Error + Send + Sync + 'static) {
        self
    }

    fn as_error_mut(&mut self) -> &mut (dyn std::error::Error + Send + Sync + 'static) {
        self
    }

    fn into_error(self: Box<Self>) -> Box<dyn std::error::Error + Send + Sync + 'static> {
        self
    }

    fn constraint(&self) -> Option<&str> {
        self.constraint
    }

    fn kind(&self) -> sqlx::error::ErrorKind {
        match self.code {
            "23505" => sqlx::error::ErrorKind::UniqueViolation,
            "23503" => sqlx::error::ErrorKind::ForeignKeyViolation,
            _ => sqlx::error::ErrorKind::Other,
        }
    }
}

/// `sqlx::Error` for a unique violation (23505) on `constraint`
#[cfg(test)]
pub fn unique_violation_error(constraint: &'static str) -> sqlx::Error {
    sqlx::Error::Database(Box::new(PgErrorStub {
        code: "23505",
        constraint: Some(constraint),
    }))
}

/// `sqlx::Error` for a foreign key violation (23503) on `constraint`
#[cfg(test)]
pub fn foreign_key_violation_error(constraint: &'static str) -> sqlx::Error {
    sqlx::Error::Database(Box::new(PgErrorStub {
        code: "23503",
        constraint: Some(constraint),
    }))
}
