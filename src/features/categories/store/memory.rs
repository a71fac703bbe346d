use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use futures::stream::{self, BoxStream, StreamExt};
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{CategoryStore, CategoryUnitOfWork, StoreError, UniqueConstraint};
use crate::features::categories::models::{Category, NewCategory, PathEntry};
use crate::features::categories::path_index::PathIndex;
use crate::features::categories::sort_key::MAX_SIBLINGS;

#[derive(Debug, Default)]
struct MemoryState {
    nodes: HashMap<Uuid, Category>,
    index: PathIndex,
    next_seq: i64,
}

#[derive(Debug, Clone)]
struct StagedInsert {
    node: Category,
    full_path: String,
}

impl MemoryState {
    /// Check `staged` against the committed state and against itself.
    fn validate(&self, staged: &[StagedInsert]) -> Result<(), StoreError> {
        for (i, candidate) in staged.iter().enumerate() {
            let earlier = &staged[..i];
            let parent_id = candidate.node.parent_id;

            if let Some(parent_id) = parent_id {
                let known = self.index.resolve_by_id(parent_id).is_some()
                    || earlier.iter().any(|s| s.node.id == parent_id);
                if !known {
                    return Err(StoreError::UnknownParent(parent_id));
                }
            }

            if self.index.resolve_by_path(&candidate.full_path).is_some()
                || earlier.iter().any(|s| s.full_path == candidate.full_path)
            {
                return Err(StoreError::UniqueViolation(UniqueConstraint::FullPath));
            }

            if self
                .index
                .resolve_sibling_by_name(parent_id, &candidate.node.name)
                .is_some()
                || earlier
                    .iter()
                    .any(|s| s.node.parent_id == parent_id && s.node.name == candidate.node.name)
            {
                return Err(StoreError::UniqueViolation(UniqueConstraint::ParentName));
            }

            let group_size = self.index.child_count(parent_id)
                + staged[..=i]
                    .iter()
                    .filter(|s| s.node.parent_id == parent_id)
                    .count();
            if group_size > MAX_SIBLINGS {
                return Err(StoreError::SiblingLimit { max: MAX_SIBLINGS });
            }
        }
        Ok(())
    }

    fn apply(&mut self, staged: StagedInsert) -> Result<(), StoreError> {
        self.next_seq += 1;
        self.index
            .insert(&staged.node, self.next_seq, staged.full_path)?;
        self.nodes.insert(staged.node.id, staged.node);
        Ok(())
    }
}

/// Category store kept entirely in process memory.
///
/// Units of work are optimistic: writes are staged and re-validated under
/// the write lock at commit, so two writers that both passed their checks
/// cannot both land the same path or sibling name.
#[derive(Debug, Clone, Default)]
pub struct MemoryCategoryStore {
    state: Arc<RwLock<MemoryState>>,
}

impl MemoryCategoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.state.read().await.nodes.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl CategoryStore for MemoryCategoryStore {
    async fn begin(&self) -> Result<Box<dyn CategoryUnitOfWork>, StoreError> {
        Ok(Box::new(MemoryUnitOfWork {
            state: Arc::clone(&self.state),
            staged: Vec::new(),
        }))
    }

    async fn resolve_by_path(&self, full_path: &str) -> Result<Option<PathEntry>, StoreError> {
        Ok(self.state.read().await.index.resolve_by_path(full_path).cloned())
    }

    async fn resolve_by_id(&self, id: Uuid) -> Result<Option<PathEntry>, StoreError> {
        Ok(self.state.read().await.index.resolve_by_id(id).cloned())
    }

    async fn find_node(&self, id: Uuid) -> Result<Option<Category>, StoreError> {
        Ok(self.state.read().await.nodes.get(&id).cloned())
    }

    fn list_ordered(&self) -> BoxStream<'_, Result<PathEntry, StoreError>> {
        let state = Arc::clone(&self.state);
        stream::once(async move {
            let state = state.read().await;
            state.index.iter_ordered().cloned().collect::<Vec<_>>()
        })
        .flat_map(|entries| stream::iter(entries.into_iter().map(Ok)))
        .boxed()
    }
}

/// Reads see committed state; inserts become visible on commit.
struct MemoryUnitOfWork {
    state: Arc<RwLock<MemoryState>>,
    staged: Vec<StagedInsert>,
}

#[async_trait]
impl CategoryUnitOfWork for MemoryUnitOfWork {
    async fn resolve_by_path(&mut self, full_path: &str) -> Result<Option<PathEntry>, StoreError> {
        Ok(self.state.read().await.index.resolve_by_path(full_path).cloned())
    }

    async fn resolve_sibling_by_name(
        &mut self,
        parent_id: Option<Uuid>,
        name: &str,
    ) -> Result<Option<PathEntry>, StoreError> {
        Ok(self
            .state
            .read()
            .await
            .index
            .resolve_sibling_by_name(parent_id, name)
            .cloned())
    }

    async fn insert(
        &mut self,
        parent: Option<&PathEntry>,
        full_path: &str,
        category: NewCategory,
    ) -> Result<Category, StoreError> {
        let now = Utc::now();
        let node = Category {
            id: Uuid::now_v7(),
            parent_id: parent.map(|p| p.id),
            slug: category.slug,
            name: category.name,
            description: category.description,
            sort_order: category.sort_order,
            created_at: now,
            updated_at: now,
        };

        let mut candidate = self.staged.clone();
        candidate.push(StagedInsert {
            node: node.clone(),
            full_path: full_path.to_string(),
        });
        self.state.read().await.validate(&candidate)?;

        self.staged = candidate;
        Ok(node)
    }

    async fn commit(self: Box<Self>) -> Result<(), StoreError> {
        let MemoryUnitOfWork { state, staged } = *self;
        let mut state = state.write().await;
        state.validate(&staged)?;
        for insert in staged {
            state.apply(insert)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::TryStreamExt;

    fn new_category(slug: &str, name: &str) -> NewCategory {
        NewCategory {
            slug: slug.to_string(),
            name: name.to_string(),
            description: None,
            sort_order: 0,
        }
    }

    #[tokio::test]
    async fn test_insert_is_invisible_until_commit() {
        let store = MemoryCategoryStore::new();

        let mut uow = store.begin().await.unwrap();
        let node = uow
            .insert(None, "audio", new_category("audio", "Audio"))
            .await
            .unwrap();
        assert!(store.resolve_by_path("audio").await.unwrap().is_none());

        uow.commit().await.unwrap();
        let entry = store.resolve_by_path("audio").await.unwrap().unwrap();
        assert_eq!(entry.id, node.id);
        assert_eq!(store.find_node(node.id).await.unwrap(), Some(node));
    }

    #[tokio::test]
    async fn test_dropped_unit_of_work_discards_writes() {
        let store = MemoryCategoryStore::new();
        {
            let mut uow = store.begin().await.unwrap();
            uow.insert(None, "audio", new_category("audio", "Audio"))
                .await
                .unwrap();
        }
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_second_commit_of_same_path_is_a_unique_violation() {
        let store = MemoryCategoryStore::new();
        let mut first = store.begin().await.unwrap();
        let mut second = store.begin().await.unwrap();

        first
            .insert(None, "audio", new_category("audio", "Audio"))
            .await
            .unwrap();
        second
            .insert(None, "audio", new_category("audio", "Sound"))
            .await
            .unwrap();

        first.commit().await.unwrap();
        assert!(matches!(
            second.commit().await,
            Err(StoreError::UniqueViolation(UniqueConstraint::FullPath))
        ));
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_insert_checks_committed_names() {
        let store = MemoryCategoryStore::new();
        let mut uow = store.begin().await.unwrap();
        uow.insert(None, "audio", new_category("audio", "Audio"))
            .await
            .unwrap();
        uow.commit().await.unwrap();

        let mut uow = store.begin().await.unwrap();
        assert!(matches!(
            uow.insert(None, "sound", new_category("sound", "Audio")).await,
            Err(StoreError::UniqueViolation(UniqueConstraint::ParentName))
        ));
    }

    #[tokio::test]
    async fn test_created_and_updated_timestamps_match_on_insert() {
        let store = MemoryCategoryStore::new();
        let mut uow = store.begin().await.unwrap();
        let node = uow
            .insert(None, "audio", new_category("audio", "Audio"))
            .await
            .unwrap();
        assert_eq!(node.created_at, node.updated_at);
    }

    #[tokio::test]
    async fn test_list_ordered_is_restartable() {
        let store = MemoryCategoryStore::new();
        for (path, name) in [("b", "B"), ("a", "A")] {
            let mut uow = store.begin().await.unwrap();
            uow.insert(None, path, new_category(path, name)).await.unwrap();
            uow.commit().await.unwrap();
        }

        let first: Vec<PathEntry> = store.list_ordered().try_collect().await.unwrap();
        let second: Vec<PathEntry> = store.list_ordered().try_collect().await.unwrap();
        assert_eq!(first, second);
        let paths: Vec<&str> = first.iter().map(|e| e.full_slug_path.as_str()).collect();
        assert_eq!(paths, vec!["b", "a"]);
    }
}
