use std::sync::Arc;

use futures::TryStreamExt;
use sqlx::PgPool;
use uuid::Uuid;

use crate::features::categories::dtos::{
    CategoryPathDto, CategoryResponseDto, CategoryTreeDto, CreateCategoryDto,
};
use crate::features::categories::error::CategoryError;
use crate::features::categories::models::{NewCategory, PathEntry};
use crate::features::categories::path::CategoryPath;
use crate::features::categories::store::{CategoryStore, PgCategoryStore};

/// Service for category operations
///
/// Categories are addressed by their full slug path. Every create runs as a
/// single unit of work on the store.
#[derive(Clone)]
pub struct CategoryService {
    store: Arc<dyn CategoryStore>,
}

impl CategoryService {
    pub fn new(store: Arc<dyn CategoryStore>) -> Self {
        Self { store }
    }

    pub fn with_pool(pool: PgPool) -> Self {
        Self::new(Arc::new(PgCategoryStore::new(pool)))
    }

    /// Create a category at the full path given as `dto.slug`
    pub async fn create(
        &self,
        dto: CreateCategoryDto,
    ) -> Result<CategoryResponseDto, CategoryError> {
        let path = CategoryPath::parse(&dto.slug)?;

        let mut uow = self.store.begin().await.map_err(|e| {
            tracing::error!("Failed to start category creation: {}", e);
            CategoryError::from(e)
        })?;

        if uow.resolve_by_path(path.as_str()).await?.is_some() {
            tracing::warn!("Category path '{}' already exists", path);
            return Err(CategoryError::PathAlreadyExists);
        }

        let parent = match path.parent() {
            Some(parent_path) => match uow.resolve_by_path(parent_path).await? {
                Some(parent) => Some(parent),
                None => {
                    tracing::warn!("Parent path '{}' of '{}' does not exist", parent_path, path);
                    return Err(CategoryError::ParentNotFound);
                }
            },
            None => None,
        };

        if uow
            .resolve_sibling_by_name(parent.as_ref().map(|p| p.id), &dto.name)
            .await?
            .is_some()
        {
            tracing::warn!("Category name '{}' already used next to '{}'", dto.name, path);
            return Err(CategoryError::NameAlreadyExists);
        }

        let node = uow
            .insert(
                parent.as_ref(),
                path.as_str(),
                NewCategory {
                    slug: path.own_slug().to_string(),
                    name: dto.name,
                    description: dto.description,
                    sort_order: dto.sort_order.unwrap_or(0),
                },
            )
            .await?;

        uow.commit().await.map_err(|e| {
            let err = CategoryError::from(e);
            match &err {
                CategoryError::Store(store_err) => {
                    tracing::error!("Failed to commit category '{}': {}", path, store_err)
                }
                other => tracing::warn!("Category '{}' rejected at commit: {}", path, other),
            }
            err
        })?;

        tracing::info!("Category created: id={}, path={}", node.id, path);

        Ok(CategoryResponseDto::from_node(node, path.into_string()))
    }

    /// Find category by its full slug path
    pub async fn find_by_full_path(
        &self,
        full_path: &str,
    ) -> Result<CategoryResponseDto, CategoryError> {
        let entry = self
            .store
            .resolve_by_path(full_path)
            .await?
            .ok_or_else(|| CategoryError::NotFound(full_path.to_string()))?;

        let node = self.store.find_node(entry.id).await?.ok_or_else(|| {
            tracing::error!(
                "Category path '{}' points at missing category {}",
                entry.full_slug_path,
                entry.id
            );
            CategoryError::Integrity(entry.id)
        })?;

        Ok(CategoryResponseDto::from_node(node, entry.full_slug_path))
    }

    /// Full slug path of the category with the given id
    pub async fn full_path_of(&self, id: Uuid) -> Result<String, CategoryError> {
        self.store
            .resolve_by_id(id)
            .await?
            .map(|entry| entry.full_slug_path)
            .ok_or_else(|| {
                tracing::error!("Category {} has no path entry", id);
                CategoryError::Integrity(id)
            })
    }

    /// All path entries in pre-order
    pub async fn list_ordered(&self) -> Result<Vec<PathEntry>, CategoryError> {
        let entries: Vec<PathEntry> = self.store.list_ordered().try_collect().await?;
        Ok(entries)
    }

    /// List all categories (flat list, pre-order)
    pub async fn list(&self) -> Result<Vec<CategoryPathDto>, CategoryError> {
        Ok(self
            .list_ordered()
            .await?
            .into_iter()
            .map(CategoryPathDto::from)
            .collect())
    }

    /// List all categories as tree structure
    pub async fn list_tree(&self) -> Result<Vec<CategoryTreeDto>, CategoryError> {
        Ok(CategoryTreeDto::build_tree(self.list_ordered().await?))
    }
}
