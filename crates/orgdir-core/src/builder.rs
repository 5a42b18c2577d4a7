//! Path construction for new activities

use crate::error::{DirectoryError, Entity};
use orgdir_store::Store;
use orgdir_taxonomy::{codec, ActivityId, ActivityPath, MAX_DEPTH};

/// Computes the materialized path of a new activity
///
/// Only reads from storage. The duplicate check here gives a friendly early
/// error; the store's unique constraint on insert is authoritative.
#[derive(Clone, Copy)]
pub struct PathBuilder<'a> {
    store: &'a dyn Store,
}

impl<'a> PathBuilder<'a> {
    /// Create builder over a store
    #[inline]
    #[must_use]
    pub fn new(store: &'a dyn Store) -> Self {
        Self { store }
    }

    /// Build the path for `name` under `parent_id`
    ///
    /// # Errors
    /// - [`DirectoryError::NotFound`] if the parent does not exist
    /// - [`DirectoryError::DepthExceeded`] if the parent is already at [`MAX_DEPTH`]
    /// - [`DirectoryError::InvalidInput`] if `name` encodes to nothing
    /// - [`DirectoryError::DuplicatePath`] if the candidate path is taken
    pub async fn build(
        &self,
        name: &str,
        parent_id: Option<ActivityId>,
    ) -> Result<ActivityPath, DirectoryError> {
        let parent = match parent_id {
            Some(id) => Some(
                self.store
                    .activity(id)
                    .await?
                    .ok_or_else(|| DirectoryError::not_found(Entity::Activity, id))?,
            ),
            None => None,
        };

        if let Some(parent) = &parent {
            if parent.depth() >= MAX_DEPTH {
                return Err(DirectoryError::DepthExceeded {
                    path: format!("{}.{}", parent.path, codec::slugify(name)),
                    max: MAX_DEPTH,
                });
            }
        }

        let segment = codec::encode(name)?;
        let candidate = match &parent {
            Some(parent) => parent.path.child(segment)?,
            None => ActivityPath::root(segment)?,
        };

        if self.store.activity_by_path(&candidate).await?.is_some() {
            return Err(DirectoryError::DuplicatePath(candidate.to_string()));
        }

        tracing::debug!(path = %candidate, "built activity path");
        Ok(candidate)
    }
}

impl std::fmt::Debug for PathBuilder<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PathBuilder").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use orgdir_store::{MemoryStore, Mutation, WriteBatch};

    async fn store_with(paths: &[&str]) -> MemoryStore {
        let store = MemoryStore::new();
        let mut batch = WriteBatch::new();
        for p in paths {
            batch.push(Mutation::InsertActivity {
                name: (*p).to_string(),
                path: p.parse().unwrap(),
            });
        }
        store.commit(batch).await.unwrap();
        store
    }

    #[tokio::test]
    async fn builds_root_and_child_paths() {
        let store = store_with(&["perevozki"]).await;
        let builder = PathBuilder::new(&store);

        let root = builder.build("Еда", None).await.unwrap();
        assert_eq!(root.to_string(), "eda");

        let child = builder.build("Грузовые", Some(ActivityId(1))).await.unwrap();
        assert_eq!(child.to_string(), "perevozki.gruzovye");
    }

    #[tokio::test]
    async fn missing_parent_is_not_found() {
        let store = MemoryStore::new();
        let err = PathBuilder::new(&store)
            .build("x", Some(ActivityId(7)))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn parent_at_max_depth_is_rejected() {
        let store = store_with(&["a", "a.b", "a.b.c"]).await;
        let err = PathBuilder::new(&store)
            .build("d", Some(ActivityId(3)))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            DirectoryError::DepthExceeded { ref path, max: 3 } if path == "a.b.c.d"
        ));
    }

    #[tokio::test]
    async fn taken_path_is_duplicate() {
        let store = store_with(&["retail_trade"]).await;
        let err = PathBuilder::new(&store)
            .build("Retail   Trade", None)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DuplicatePath);
    }

    #[tokio::test]
    async fn degenerate_name_is_invalid() {
        let store = MemoryStore::new();
        let err = PathBuilder::new(&store).build("  !!  ", None).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
    }
}
