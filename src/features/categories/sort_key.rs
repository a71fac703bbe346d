//! Fixed-width sibling ranks concatenated into pre-order sort keys.

use uuid::Uuid;

use crate::features::categories::store::StoreError;

/// Digits per rank segment
pub const SEGMENT_WIDTH: usize = 3;

/// Largest rank a single segment can hold
pub const MAX_SIBLINGS: usize = 999;

/// Zero-padded rank segment, 1-based: `1` -> `"001"`
pub fn segment(rank: usize) -> String {
    format!("{:0width$}", rank, width = SEGMENT_WIDTH)
}

/// A member of one sibling group as seen while re-ranking
#[derive(Debug, Clone)]
pub struct Sibling {
    pub id: Uuid,
    pub sort_order: i32,
    /// Insertion sequence, breaks `sort_order` ties
    pub seq: i64,
    pub full_slug_path: String,
    /// Current key, empty for a node that has not been ranked yet
    pub sort_key: String,
}

/// A sibling whose key moved; its descendants move with it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyChange {
    pub id: Uuid,
    pub full_slug_path: String,
    pub old_key: String,
    pub new_key: String,
}

/// Rank `siblings` by `(sort_order, seq)` under `parent_key` and return the
/// members whose key differs from the one they hold.
pub fn rerank(parent_key: &str, mut siblings: Vec<Sibling>) -> Result<Vec<KeyChange>, StoreError> {
    if siblings.len() > MAX_SIBLINGS {
        return Err(StoreError::SiblingLimit { max: MAX_SIBLINGS });
    }

    siblings.sort_by_key(|s| (s.sort_order, s.seq));

    Ok(siblings
        .into_iter()
        .enumerate()
        .filter_map(|(index, sibling)| {
            let new_key = format!("{}{}", parent_key, segment(index + 1));
            (new_key != sibling.sort_key).then(|| KeyChange {
                id: sibling.id,
                full_slug_path: sibling.full_slug_path,
                old_key: sibling.sort_key,
                new_key,
            })
        })
        .collect())
}

/// Rewrite `key` so the `old_prefix` part becomes `new_prefix`.
pub fn replace_prefix(key: &str, old_prefix: &str, new_prefix: &str) -> String {
    let suffix = key.get(old_prefix.len()..).unwrap_or_default();
    format!("{}{}", new_prefix, suffix)
}
