//! Descendant expansion over the path index

use crate::error::DirectoryError;
use orgdir_store::Store;
use orgdir_taxonomy::{ActivityId, ActivityNode};
use std::collections::BTreeSet;

/// Resolves an activity to itself plus every descendant
#[derive(Clone, Copy)]
pub struct DescendantResolver<'a> {
    store: &'a dyn Store,
}

impl<'a> DescendantResolver<'a> {
    /// Create resolver over a store
    #[inline]
    #[must_use]
    pub fn new(store: &'a dyn Store) -> Self {
        Self { store }
    }

    /// Nodes at or under `node`, ordered by id
    ///
    /// # Errors
    /// Returns [`DirectoryError::Storage`] if the prefix scan fails
    pub async fn subtree(&self, node: &ActivityNode) -> Result<Vec<ActivityNode>, DirectoryError> {
        let mut nodes = self.store.activity_subtree(&node.path).await?;
        // Segment-wise check in case a backend's prefix scan is purely textual
        nodes.retain(|candidate| node.covers(candidate));
        Ok(nodes)
    }

    /// Identifier set of `node` and all of its descendants
    ///
    /// Never empty: always contains `node.id`.
    ///
    /// # Errors
    /// Returns [`DirectoryError::Storage`] if the prefix scan fails
    pub async fn expand(&self, node: &ActivityNode) -> Result<BTreeSet<ActivityId>, DirectoryError> {
        let mut ids: BTreeSet<_> = self
            .subtree(node)
            .await?
            .into_iter()
            .map(|n| n.id)
            .collect();
        ids.insert(node.id);
        tracing::debug!(path = %node.path, size = ids.len(), "expanded activity");
        Ok(ids)
    }
}

impl std::fmt::Debug for DescendantResolver<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DescendantResolver").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use orgdir_store::{MemoryStore, Mutation, WriteBatch};

    async fn store() -> MemoryStore {
        let store = MemoryStore::new();
        let mut batch = WriteBatch::new();
        for p in ["retail", "retail.food", "retail.food.bakery", "retailer", "retailer.web"] {
            batch.push(Mutation::InsertActivity {
                name: p.to_string(),
                path: p.parse().unwrap(),
            });
        }
        store.commit(batch).await.unwrap();
        store
    }

    #[tokio::test]
    async fn expand_includes_self_and_descendants_only() {
        let store = store().await;
        let retail = store.activity(ActivityId(1)).await.unwrap().unwrap();
        let ids = DescendantResolver::new(&store).expand(&retail).await.unwrap();
        assert_eq!(ids, BTreeSet::from([ActivityId(1), ActivityId(2), ActivityId(3)]));
    }

    #[tokio::test]
    async fn expand_of_leaf_is_singleton() {
        let store = store().await;
        let leaf = store.activity(ActivityId(3)).await.unwrap().unwrap();
        let ids = DescendantResolver::new(&store).expand(&leaf).await.unwrap();
        assert_eq!(ids, BTreeSet::from([ActivityId(3)]));
    }

    #[tokio::test]
    async fn subtree_is_ordered_by_id() {
        let store = store().await;
        let node = store.activity(ActivityId(4)).await.unwrap().unwrap();
        let nodes = DescendantResolver::new(&store).subtree(&node).await.unwrap();
        let ids: Vec<_> = nodes.iter().map(|n| n.id).collect();
        assert_eq!(ids, vec![ActivityId(4), ActivityId(5)]);
    }
}
