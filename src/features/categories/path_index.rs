//! In-process materialized path index.
//!
//! Entries live in an arena keyed by id; sorted maps from full path and from
//! sort key to id answer point lookups, descendant prefix scans and ordered
//! enumeration without walking parent links.

use std::collections::{BTreeMap, HashMap};

use uuid::Uuid;

use crate::features::categories::models::{Category, PathEntry};
use crate::features::categories::sort_key::{self, KeyChange, Sibling};
use crate::features::categories::store::{StoreError, UniqueConstraint};
use crate::shared::constants::CATEGORY_PATH_SEPARATOR;

#[derive(Debug, Clone)]
struct IndexedEntry {
    entry: PathEntry,
    sort_order: i32,
    seq: i64,
}

#[derive(Debug, Default)]
pub struct PathIndex {
    entries: HashMap<Uuid, IndexedEntry>,
    by_path: BTreeMap<String, Uuid>,
    by_sort_key: BTreeMap<String, Uuid>,
    by_sibling_name: HashMap<(Option<Uuid>, String), Uuid>,
    children: HashMap<Option<Uuid>, Vec<Uuid>>,
}

impl PathIndex {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Exact, case-sensitive match on the full slug path
    pub fn resolve_by_path(&self, full_path: &str) -> Option<&PathEntry> {
        self.by_path
            .get(full_path)
            .and_then(|id| self.resolve_by_id(*id))
    }

    /// Sibling with `name` under `parent_id` (`None` = root level)
    pub fn resolve_sibling_by_name(&self, parent_id: Option<Uuid>, name: &str) -> Option<&PathEntry> {
        self.by_sibling_name
            .get(&(parent_id, name.to_string()))
            .and_then(|id| self.resolve_by_id(*id))
    }

    pub fn resolve_by_id(&self, id: Uuid) -> Option<&PathEntry> {
        self.entries.get(&id).map(|indexed| &indexed.entry)
    }

    pub fn child_count(&self, parent_id: Option<Uuid>) -> usize {
        self.children.get(&parent_id).map_or(0, Vec::len)
    }

    /// Pre-order walk of the whole tree
    pub fn iter_ordered(&self) -> impl Iterator<Item = &PathEntry> + '_ {
        self.by_sort_key
            .values()
            .filter_map(|id| self.resolve_by_id(*id))
    }

    /// Entries strictly below `full_path`
    pub fn descendants<'a>(&'a self, full_path: &str) -> impl Iterator<Item = &'a PathEntry> + 'a {
        let prefix = format!("{}{}", full_path, CATEGORY_PATH_SEPARATOR);
        self.by_path
            .range(prefix.clone()..)
            .take_while(move |(path, _)| path.starts_with(&prefix))
            .filter_map(|(_, id)| self.resolve_by_id(*id))
    }

    /// Project a freshly stored node into the index.
    ///
    /// Nothing is modified when an error is returned.
    pub fn insert(
        &mut self,
        node: &Category,
        seq: i64,
        full_slug_path: String,
    ) -> Result<(), StoreError> {
        if self.by_path.contains_key(&full_slug_path) {
            return Err(StoreError::UniqueViolation(UniqueConstraint::FullPath));
        }
        let name_key = (node.parent_id, node.name.clone());
        if self.by_sibling_name.contains_key(&name_key) {
            return Err(StoreError::UniqueViolation(UniqueConstraint::ParentName));
        }

        let (depth, parent_key) = match node.parent_id {
            Some(parent_id) => {
                let parent = self
                    .resolve_by_id(parent_id)
                    .ok_or(StoreError::UnknownParent(parent_id))?;
                (parent.depth + 1, parent.sort_key.clone())
            }
            None => (0, String::new()),
        };

        let mut siblings: Vec<Sibling> = self
            .children
            .get(&node.parent_id)
            .into_iter()
            .flatten()
            .filter_map(|id| self.entries.get(id))
            .map(|indexed| Sibling {
                id: indexed.entry.id,
                sort_order: indexed.sort_order,
                seq: indexed.seq,
                full_slug_path: indexed.entry.full_slug_path.clone(),
                sort_key: indexed.entry.sort_key.clone(),
            })
            .collect();
        siblings.push(Sibling {
            id: node.id,
            sort_order: node.sort_order,
            seq,
            full_slug_path: full_slug_path.clone(),
            sort_key: String::new(),
        });
        let changes = sort_key::rerank(&parent_key, siblings)?;

        self.entries.insert(
            node.id,
            IndexedEntry {
                entry: PathEntry {
                    id: node.id,
                    parent_id: node.parent_id,
                    name: node.name.clone(),
                    full_slug_path: full_slug_path.clone(),
                    sort_key: String::new(),
                    depth,
                },
                sort_order: node.sort_order,
                seq,
            },
        );
        self.by_path.insert(full_slug_path, node.id);
        self.by_sibling_name.insert(name_key, node.id);
        self.children.entry(node.parent_id).or_default().push(node.id);

        for change in &changes {
            self.rekey_subtree(change);
        }

        Ok(())
    }

    /// Move a sibling and everything below it to its new sort key prefix.
    fn rekey_subtree(&mut self, change: &KeyChange) {
        let ids: Vec<Uuid> = std::iter::once(change.id)
            .chain(self.descendants(&change.full_slug_path).map(|e| e.id))
            .collect();

        for id in ids {
            let Some(indexed) = self.entries.get_mut(&id) else {
                continue;
            };
            let old_key = std::mem::take(&mut indexed.entry.sort_key);
            let new_key = sort_key::replace_prefix(&old_key, &change.old_key, &change.new_key);
            indexed.entry.sort_key = new_key.clone();

            // Another sibling may already have claimed the old key in this pass
            if self.by_sort_key.get(&old_key) == Some(&id) {
                self.by_sort_key.remove(&old_key);
            }
            self.by_sort_key.insert(new_key, id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    struct Builder {
        index: PathIndex,
        seq: i64,
    }

    impl Builder {
        fn new() -> Self {
            Self {
                index: PathIndex::new(),
                seq: 0,
            }
        }

        fn add(&mut self, full_path: &str, name: &str, sort_order: i32) -> Uuid {
            let parent_id = full_path
                .rsplit_once('/')
                .map(|(parent, _)| self.index.resolve_by_path(parent).unwrap().id);
            let now = Utc::now();
            let node = Category {
                id: Uuid::now_v7(),
                parent_id,
                slug: full_path.rsplit('/').next().unwrap().to_string(),
                name: name.to_string(),
                description: None,
                sort_order,
                created_at: now,
                updated_at: now,
            };
            self.seq += 1;
            self.index
                .insert(&node, self.seq, full_path.to_string())
                .unwrap();
            node.id
        }

        fn ordered(&self) -> Vec<(String, String, i32)> {
            self.index
                .iter_ordered()
                .map(|e| (e.full_slug_path.clone(), e.sort_key.clone(), e.depth))
                .collect()
        }
    }

    #[test]
    fn test_fixture_tree_is_listed_in_pre_order() {
        let mut tree = Builder::new();
        let root_1 = tree.add("category-1", "Category 1", 1);
        tree.add("category-1/category-1-1", "Category 1.1", 1);
        tree.add("category-1/category-1-2", "Category 1.2", 2);
        tree.add("category-2", "Category 2", 2);
        let node_2_1 = tree.add("category-2/category-2-1", "Category 2.1", 1);
        tree.add("category-2/category-2-1/category-2-1-1", "Category 2.1.1", 1);
        tree.add("category-2/category-2-1/category-2-1-2", "Category 2.1.2", 2);

        let expected = vec![
            ("category-1", "001", 0),
            ("category-1/category-1-1", "001001", 1),
            ("category-1/category-1-2", "001002", 1),
            ("category-2", "002", 0),
            ("category-2/category-2-1", "002001", 1),
            ("category-2/category-2-1/category-2-1-1", "002001001", 2),
            ("category-2/category-2-1/category-2-1-2", "002001002", 2),
        ];
        let expected: Vec<(String, String, i32)> = expected
            .into_iter()
            .map(|(p, k, d)| (p.to_string(), k.to_string(), d))
            .collect();
        assert_eq!(tree.ordered(), expected);

        let entry = tree.index.resolve_by_path("category-1/category-1-2").unwrap();
        assert_eq!(entry.parent_id, Some(root_1));
        let entry = tree
            .index
            .resolve_by_path("category-2/category-2-1/category-2-1-2")
            .unwrap();
        assert_eq!(entry.parent_id, Some(node_2_1));
        assert_eq!(tree.index.len(), 7);
        assert!(!tree.index.is_empty());
        assert!(PathIndex::new().is_empty());
    }

    #[test]
    fn test_earlier_sibling_rekeys_later_subtrees() {
        let mut tree = Builder::new();
        tree.add("garden", "Garden", 10);
        tree.add("garden/tools", "Tools", 0);
        tree.add("garden/tools/shovels", "Shovels", 0);
        tree.add("audio", "Audio", 1);

        assert_eq!(
            tree.ordered(),
            vec![
                ("audio".to_string(), "001".to_string(), 0),
                ("garden".to_string(), "002".to_string(), 0),
                ("garden/tools".to_string(), "002001".to_string(), 1),
                ("garden/tools/shovels".to_string(), "002001001".to_string(), 2),
            ]
        );
    }

    #[test]
    fn test_sort_order_ties_keep_insertion_order() {
        let mut tree = Builder::new();
        tree.add("b", "B", 0);
        tree.add("a", "A", 0);
        tree.add("c", "C", 0);

        let paths: Vec<String> = tree.ordered().into_iter().map(|(p, _, _)| p).collect();
        assert_eq!(paths, vec!["b", "a", "c"]);
    }

    #[test]
    fn test_sibling_name_is_parent_scoped() {
        let mut tree = Builder::new();
        let a = tree.add("a", "A", 0);
        let x = tree.add("x", "X", 0);
        tree.add("a/c", "Shared", 0);

        assert!(tree.index.resolve_sibling_by_name(Some(a), "Shared").is_some());
        assert!(tree.index.resolve_sibling_by_name(Some(x), "Shared").is_none());
        assert!(tree.index.resolve_sibling_by_name(None, "A").is_some());
        assert!(tree.index.resolve_sibling_by_name(None, "Shared").is_none());
    }

    #[test]
    fn test_duplicates_are_rejected_without_side_effects() {
        let mut tree = Builder::new();
        let a = tree.add("a", "A", 0);
        let now = Utc::now();
        let mut node = Category {
            id: Uuid::now_v7(),
            parent_id: None,
            slug: "a".to_string(),
            name: "Other".to_string(),
            description: None,
            sort_order: 0,
            created_at: now,
            updated_at: now,
        };

        assert!(matches!(
            tree.index.insert(&node, 99, "a".to_string()),
            Err(StoreError::UniqueViolation(UniqueConstraint::FullPath))
        ));

        node.slug = "b".to_string();
        node.name = "A".to_string();
        assert!(matches!(
            tree.index.insert(&node, 99, "b".to_string()),
            Err(StoreError::UniqueViolation(UniqueConstraint::ParentName))
        ));

        node.parent_id = Some(Uuid::now_v7());
        node.name = "Orphan".to_string();
        assert!(matches!(
            tree.index.insert(&node, 99, "zzz/b".to_string()),
            Err(StoreError::UnknownParent(_))
        ));

        assert_eq!(tree.index.len(), 1);
        assert_eq!(tree.index.child_count(None), 1);
        assert_eq!(tree.index.resolve_by_path("a").unwrap().id, a);
    }

    #[test]
    fn test_descendants_use_path_prefix() {
        let mut tree = Builder::new();
        tree.add("audio", "Audio", 0);
        tree.add("audio/headphones", "Headphones", 0);
        tree.add("audio/headphones/in-ear", "In-Ear", 0);
        tree.add("audio-video", "Audio Video", 0);

        let mut paths: Vec<&str> = tree
            .index
            .descendants("audio")
            .map(|e| e.full_slug_path.as_str())
            .collect();
        paths.sort_unstable();
        assert_eq!(paths, vec!["audio/headphones", "audio/headphones/in-ear"]);
    }

    #[test]
    fn test_lookup_is_exact_and_case_sensitive() {
        let mut tree = Builder::new();
        tree.add("audio", "Audio", 0);

        assert!(tree.index.resolve_by_path("audio").is_some());
        assert!(tree.index.resolve_by_path("Audio").is_none());
        assert!(tree.index.resolve_by_path("audio/").is_none());
        assert!(tree.index.resolve_by_path("").is_none());
    }
}
