//! Activity path index with radix tree
//!
//! Provides [`PathIndex`] for prefix lookups over materialized activity
//! paths using radix_trie.

use crate::error::{Constraint, StoreError};
use orgdir_taxonomy::{ActivityId, ActivityPath};
use radix_trie::{Trie, TrieCommon};

/// Path → activity index
///
/// Keys are [`ActivityPath::index_key`] strings, which end with the
/// separator. A prefix scan for `retail.` therefore reaches `retail.x` but
/// never `retailer`.
#[derive(Debug, Clone, Default)]
pub struct PathIndex {
    trie: Trie<String, ActivityId>,
}

impl PathIndex {
    /// Create empty index
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self { trie: Trie::new() }
    }

    /// Insert a path
    ///
    /// # Errors
    /// Returns [`StoreError::UniqueViolation`] if the path is already indexed
    pub fn insert(&mut self, path: &ActivityPath, id: ActivityId) -> Result<(), StoreError> {
        let key = path.index_key();
        if self.trie.get(&key).is_some() {
            return Err(StoreError::unique(Constraint::ActivityPath, path));
        }
        self.trie.insert(key, id);
        Ok(())
    }

    /// Lookup exact path
    #[must_use]
    pub fn get(&self, path: &ActivityPath) -> Option<ActivityId> {
        self.trie.get(&path.index_key()).copied()
    }

    /// Check if path is indexed
    #[inline]
    #[must_use]
    pub fn contains(&self, path: &ActivityPath) -> bool {
        self.get(path).is_some()
    }

    /// Identifiers of `path` and all its descendants
    #[must_use]
    pub fn subtree(&self, path: &ActivityPath) -> Vec<ActivityId> {
        self.subtree_entries(path)
            .into_iter()
            .map(|(_, id)| id)
            .collect()
    }

    fn subtree_entries(&self, path: &ActivityPath) -> Vec<(String, ActivityId)> {
        let prefix = path.index_key();
        // The raw descendant node can sit above the prefix; filter on the key.
        self.trie
            .get_raw_descendant(&prefix)
            .map(|subtrie| {
                subtrie
                    .iter()
                    .filter(|(key, _)| key.starts_with(&prefix))
                    .map(|(key, id)| (key.clone(), *id))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Remove `path` and all its descendants
    ///
    /// Returns removed identifiers.
    pub fn remove_subtree(&mut self, path: &ActivityPath) -> Vec<ActivityId> {
        let entries = self.subtree_entries(path);
        for (key, _) in &entries {
            self.trie.remove(key);
        }
        entries.into_iter().map(|(_, id)| id).collect()
    }

    /// Get total path count
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.trie.len()
    }

    /// Check if index is empty
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.trie.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn path(s: &str) -> ActivityPath {
        s.parse().unwrap()
    }

    fn sample() -> PathIndex {
        let mut index = PathIndex::new();
        for (id, p) in [
            (1, "retail"),
            (2, "retail.food"),
            (3, "retail.food.bakery"),
            (4, "retailer"),
            (5, "retailer.online"),
        ] {
            index.insert(&path(p), ActivityId(id)).unwrap();
        }
        index
    }

    #[test]
    fn index_insert_and_lookup() {
        let index = sample();
        assert_eq!(index.get(&path("retail.food")), Some(ActivityId(2)));
        assert!(index.contains(&path("retailer")));
        assert!(!index.contains(&path("retail.toys")));
        assert_eq!(index.len(), 5);
    }

    #[test]
    fn index_rejects_duplicate() {
        let mut index = sample();
        let result = index.insert(&path("retail.food"), ActivityId(9));
        assert!(matches!(
            result,
            Err(StoreError::UniqueViolation {
                constraint: Constraint::ActivityPath,
                ..
            })
        ));
        assert_eq!(index.get(&path("retail.food")), Some(ActivityId(2)));
    }

    #[test]
    fn subtree_respects_segment_boundaries() {
        let index = sample();
        let mut ids = index.subtree(&path("retail"));
        ids.sort();
        assert_eq!(ids, vec![ActivityId(1), ActivityId(2), ActivityId(3)]);

        let mut ids = index.subtree(&path("retailer"));
        ids.sort();
        assert_eq!(ids, vec![ActivityId(4), ActivityId(5)]);
    }

    #[test]
    fn subtree_of_leaf_and_missing() {
        let index = sample();
        assert_eq!(index.subtree(&path("retail.food.bakery")), vec![ActivityId(3)]);
        assert!(index.subtree(&path("toys")).is_empty());
        assert!(index.subtree(&path("retail.f")).is_empty());
    }

    #[test]
    fn remove_subtree_leaves_siblings() {
        let mut index = sample();
        let mut removed = index.remove_subtree(&path("retail"));
        removed.sort();
        assert_eq!(removed, vec![ActivityId(1), ActivityId(2), ActivityId(3)]);
        assert_eq!(index.len(), 2);
        assert!(index.contains(&path("retailer.online")));
        assert!(index.remove_subtree(&path("retail")).is_empty());
    }
}
