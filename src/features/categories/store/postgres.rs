use async_trait::async_trait;
use futures::stream::{BoxStream, StreamExt};
use sqlx::{FromRow, PgPool, Postgres, Transaction};
use uuid::Uuid;

use super::{CategoryStore, CategoryUnitOfWork, StoreError};
use crate::features::categories::models::{Category, NewCategory, PathEntry};
use crate::features::categories::sort_key::{self, Sibling};

const SELECT_PATH_ENTRY: &str = r#"
    SELECT id, parent_id, name, full_slug_path, sort_key, depth
    FROM category_paths
"#;

const SELECT_CATEGORY: &str = r#"
    SELECT id, parent_id, slug, name, description, sort_order, created_at, updated_at
    FROM categories
"#;

/// Category store backed by the `categories` and `category_paths` tables
#[derive(Debug, Clone)]
pub struct PgCategoryStore {
    pool: PgPool,
}

impl PgCategoryStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CategoryStore for PgCategoryStore {
    async fn begin(&self) -> Result<Box<dyn CategoryUnitOfWork>, StoreError> {
        let tx = self.pool.begin().await.map_err(|e| {
            tracing::error!("Failed to begin category transaction: {:?}", e);
            StoreError::from(e)
        })?;
        Ok(Box::new(PgUnitOfWork { tx }))
    }

    async fn resolve_by_path(&self, full_path: &str) -> Result<Option<PathEntry>, StoreError> {
        let entry = sqlx::query_as::<_, PathEntry>(&format!(
            "{} WHERE full_slug_path = $1",
            SELECT_PATH_ENTRY
        ))
        .bind(full_path)
        .fetch_optional(&self.pool)
        .await?;
        Ok(entry)
    }

    async fn resolve_by_id(&self, id: Uuid) -> Result<Option<PathEntry>, StoreError> {
        let entry = sqlx::query_as::<_, PathEntry>(&format!("{} WHERE id = $1", SELECT_PATH_ENTRY))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(entry)
    }

    async fn find_node(&self, id: Uuid) -> Result<Option<Category>, StoreError> {
        let category = sqlx::query_as::<_, Category>(&format!("{} WHERE id = $1", SELECT_CATEGORY))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(category)
    }

    fn list_ordered(&self) -> BoxStream<'_, Result<PathEntry, StoreError>> {
        sqlx::query_as::<_, PathEntry>(
            r#"
            SELECT id, parent_id, name, full_slug_path, sort_key, depth
            FROM category_paths
            ORDER BY sort_key COLLATE "C"
            "#,
        )
        .fetch(&self.pool)
        .map(|row| row.map_err(StoreError::from))
        .boxed()
    }
}

#[derive(Debug, FromRow)]
struct SiblingRow {
    id: Uuid,
    sort_order: i32,
    insertion_seq: i64,
    full_slug_path: String,
    sort_key: String,
}

/// A single database transaction
struct PgUnitOfWork {
    tx: Transaction<'static, Postgres>,
}

impl PgUnitOfWork {
    /// Serialize structural writes until this transaction ends.
    ///
    /// Re-ranking rewrites keys across whole subtrees, so two writers must
    /// never rank against each other's uncommitted rows.
    async fn lock_tree(&mut self) -> Result<(), StoreError> {
        sqlx::query("SELECT pg_advisory_xact_lock(hashtextextended('category_paths', 0))")
            .execute(&mut *self.tx)
            .await?;
        Ok(())
    }

    /// Recompute the sort keys of every child of `parent_id`.
    async fn rerank_children(&mut self, parent_id: Option<Uuid>) -> Result<(), StoreError> {
        let parent_key = match parent_id {
            Some(id) => {
                sqlx::query_scalar::<_, String>(
                    "SELECT sort_key FROM category_paths WHERE id = $1",
                )
                .bind(id)
                .fetch_optional(&mut *self.tx)
                .await?
                .ok_or(StoreError::UnknownParent(id))?
            }
            None => String::new(),
        };

        let siblings = sqlx::query_as::<_, SiblingRow>(
            r#"
            SELECT c.id, c.sort_order, c.insertion_seq, p.full_slug_path, p.sort_key
            FROM categories c
            JOIN category_paths p ON p.id = c.id
            WHERE c.parent_id IS NOT DISTINCT FROM $1
            "#,
        )
        .bind(parent_id)
        .fetch_all(&mut *self.tx)
        .await?;

        let changes = sort_key::rerank(
            &parent_key,
            siblings
                .into_iter()
                .map(|row| Sibling {
                    id: row.id,
                    sort_order: row.sort_order,
                    seq: row.insertion_seq,
                    full_slug_path: row.full_slug_path,
                    sort_key: row.sort_key,
                })
                .collect(),
        )?;

        for change in changes {
            // The sibling and its whole subtree share the old key as prefix
            let old_len = i32::try_from(change.old_key.len()).unwrap_or(i32::MAX);
            sqlx::query(
                r#"
                UPDATE category_paths
                SET sort_key = $2 || substr(sort_key, $3 + 1)
                WHERE full_slug_path = $1 OR full_slug_path LIKE $1 || '/%'
                "#,
            )
            .bind(&change.full_slug_path)
            .bind(&change.new_key)
            .bind(old_len)
            .execute(&mut *self.tx)
            .await?;
        }

        Ok(())
    }
}

#[async_trait]
impl CategoryUnitOfWork for PgUnitOfWork {
    async fn resolve_by_path(&mut self, full_path: &str) -> Result<Option<PathEntry>, StoreError> {
        let entry = sqlx::query_as::<_, PathEntry>(&format!(
            "{} WHERE full_slug_path = $1",
            SELECT_PATH_ENTRY
        ))
        .bind(full_path)
        .fetch_optional(&mut *self.tx)
        .await?;
        Ok(entry)
    }

    async fn resolve_sibling_by_name(
        &mut self,
        parent_id: Option<Uuid>,
        name: &str,
    ) -> Result<Option<PathEntry>, StoreError> {
        // Separate predicates so both cases can use the (parent_id, name) index
        let entry = match parent_id {
            Some(parent_id) => {
                sqlx::query_as::<_, PathEntry>(&format!(
                    "{} WHERE parent_id = $1 AND name = $2",
                    SELECT_PATH_ENTRY
                ))
                .bind(parent_id)
                .bind(name)
                .fetch_optional(&mut *self.tx)
                .await?
            }
            None => {
                sqlx::query_as::<_, PathEntry>(&format!(
                    "{} WHERE parent_id IS NULL AND name = $1",
                    SELECT_PATH_ENTRY
                ))
                .bind(name)
                .fetch_optional(&mut *self.tx)
                .await?
            }
        };
        Ok(entry)
    }

    async fn insert(
        &mut self,
        parent: Option<&PathEntry>,
        full_path: &str,
        category: NewCategory,
    ) -> Result<Category, StoreError> {
        self.lock_tree().await?;

        let node = sqlx::query_as::<_, Category>(
            r#"
            INSERT INTO categories (id, parent_id, slug, name, description, sort_order)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, parent_id, slug, name, description, sort_order, created_at, updated_at
            "#,
        )
        .bind(Uuid::now_v7())
        .bind(parent.map(|p| p.id))
        .bind(&category.slug)
        .bind(&category.name)
        .bind(&category.description)
        .bind(category.sort_order)
        .fetch_one(&mut *self.tx)
        .await?;

        // Ranked right below
        sqlx::query(
            r#"
            INSERT INTO category_paths (id, parent_id, name, full_slug_path, sort_key, depth)
            VALUES ($1, $2, $3, $4, '', $5)
            "#,
        )
        .bind(node.id)
        .bind(node.parent_id)
        .bind(&node.name)
        .bind(full_path)
        .bind(parent.map_or(0, |p| p.depth + 1))
        .execute(&mut *self.tx)
        .await?;

        self.rerank_children(node.parent_id).await?;

        Ok(node)
    }

    async fn commit(self: Box<Self>) -> Result<(), StoreError> {
        self.tx.commit().await.map_err(|e| {
            tracing::error!("Failed to commit category transaction: {:?}", e);
            StoreError::from(e)
        })
    }
}
