use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::features::categories::models::{Category, PathEntry};

/// Request DTO for creating a category
///
/// `slug` is the full path; everything before the last `/` must already exist.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateCategoryDto {
    /// Full category path, e.g. `electronics/audio/headphones`
    #[validate(
        length(min = 1, max = 255, message = "Slug must be 1-255 characters"),
        regex(
            path = "*crate::shared::validation::CATEGORY_PATH_REGEX",
            message = "Slug must be lowercase words joined by hyphens, segments separated by '/'"
        )
    )]
    pub slug: String,

    #[validate(length(min = 1, max = 50, message = "Name must be 1-50 characters"))]
    pub name: String,

    #[validate(length(max = 2000, message = "Description must not exceed 2000 characters"))]
    pub description: Option<String>,

    /// Position among siblings, defaults to 0
    pub sort_order: Option<i32>,
}

/// Response DTO for category
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CategoryResponseDto {
    pub id: Uuid,
    pub parent_id: Option<Uuid>,
    /// Full category path
    pub slug: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub sort_order: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl CategoryResponseDto {
    /// The stored own slug is replaced by the resolved full path
    pub fn from_node(c: Category, full_path: String) -> Self {
        Self {
            id: c.id,
            parent_id: c.parent_id,
            slug: full_path,
            name: c.name,
            description: c.description,
            sort_order: c.sort_order,
            created_at: c.created_at,
            updated_at: c.updated_at,
        }
    }
}

/// Flat list item, in pre-order
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CategoryPathDto {
    pub id: Uuid,
    pub parent_id: Option<Uuid>,
    pub name: String,
    pub slug: String,
    pub sort_key: String,
    pub depth: i32,
}

impl From<PathEntry> for CategoryPathDto {
    fn from(e: PathEntry) -> Self {
        Self {
            id: e.id,
            parent_id: e.parent_id,
            name: e.name,
            slug: e.full_slug_path,
            sort_key: e.sort_key,
            depth: e.depth,
        }
    }
}

/// Response DTO for category tree (hierarchical structure)
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
#[schema(no_recursion)]
pub struct CategoryTreeDto {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub depth: i32,
    pub children: Vec<CategoryTreeDto>,
}

impl From<PathEntry> for CategoryTreeDto {
    fn from(e: PathEntry) -> Self {
        Self {
            id: e.id,
            name: e.name,
            slug: e.full_slug_path,
            depth: e.depth,
            children: Vec::new(),
        }
    }
}

impl CategoryTreeDto {
    /// Build tree from entries already in pre-order (ascending sort key)
    pub fn build_tree(entries: Vec<PathEntry>) -> Vec<CategoryTreeDto> {
        let mut roots = Vec::new();
        let mut open: Vec<CategoryTreeDto> = Vec::new();

        for entry in entries {
            let depth = usize::try_from(entry.depth).unwrap_or(0);
            while open.len() > depth {
                Self::close_last(&mut open, &mut roots);
            }
            open.push(entry.into());
        }
        while !open.is_empty() {
            Self::close_last(&mut open, &mut roots);
        }

        roots
    }

    fn close_last(open: &mut Vec<CategoryTreeDto>, roots: &mut Vec<CategoryTreeDto>) {
        if let Some(done) = open.pop() {
            match open.last_mut() {
                Some(parent) => parent.children.push(done),
                None => roots.push(done),
            }
        }
    }
}
