use sqlx::FromRow;
use uuid::Uuid;

/// Read-model row of the category path index
///
/// One entry per category. `full_slug_path` is the `/`-joined slug chain from
/// the root, `sort_key` concatenates the zero-padded sibling rank of every
/// ancestor and of the node itself, so ordering by it yields a pre-order walk.
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct PathEntry {
    pub id: Uuid,
    pub parent_id: Option<Uuid>,
    pub name: String,
    pub full_slug_path: String,
    pub sort_key: String,
    pub depth: i32,
}
