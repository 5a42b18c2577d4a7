//! Directory facade
//!
//! The entry point transports talk to. Owns the storage handle, the
//! configuration and the tree cache, and wires the taxonomy components
//! together:
//! - name → [`PathBuilder`] → one atomic insert
//! - id → [`DescendantResolver`] → association filter in [`ActivityOrgLinkage`]
//! - id → subtree scan → tree assembly (optionally cached)

use crate::builder::PathBuilder;
use crate::cache::TreeCache;
use crate::config::DirectoryConfig;
use crate::error::{DirectoryError, Entity};
use crate::geo::BoundingBox;
use crate::linkage::ActivityOrgLinkage;
use crate::resolver::DescendantResolver;
use orgdir_store::{
    ActivityLink, BuildingId, MemoryStore, Mutation, Organization, OrganizationId, Store,
    StoreError, WriteBatch,
};
use orgdir_taxonomy::{assemble, assemble_forest, ActivityId, ActivityNode, ActivityTree};
use std::collections::BTreeSet;
use std::sync::Arc;

/// Organization directory service
pub struct Directory {
    /// Configuration
    config: DirectoryConfig,
    /// Storage collaborator
    store: Arc<dyn Store>,
    /// Assembled-tree cache
    cache: TreeCache,
}

impl Directory {
    /// Create directory over a store
    #[must_use]
    pub fn new(store: Arc<dyn Store>, config: DirectoryConfig) -> Self {
        let cache = TreeCache::from_config(&config.tree_cache);
        Self {
            config,
            store,
            cache,
        }
    }

    /// Create directory over an empty [`MemoryStore`]
    #[must_use]
    pub fn in_memory(config: DirectoryConfig) -> Self {
        Self::new(Arc::new(MemoryStore::new()), config)
    }

    /// Get configuration
    #[inline]
    #[must_use]
    pub fn config(&self) -> &DirectoryConfig {
        &self.config
    }

    /// Get storage handle
    #[inline]
    #[must_use]
    pub fn store(&self) -> &dyn Store {
        &*self.store
    }

    /// Get tree cache
    #[inline]
    #[must_use]
    pub fn cache(&self) -> &TreeCache {
        &self.cache
    }

    /// Path builder over this directory's store
    #[inline]
    #[must_use]
    pub fn path_builder(&self) -> PathBuilder<'_> {
        PathBuilder::new(self.store())
    }

    /// Descendant resolver over this directory's store
    #[inline]
    #[must_use]
    pub fn resolver(&self) -> DescendantResolver<'_> {
        DescendantResolver::new(self.store())
    }

    /// Association manager over this directory's store
    #[inline]
    #[must_use]
    pub fn linkage(&self) -> ActivityOrgLinkage<'_> {
        ActivityOrgLinkage::new(self.store())
    }

    /// Check a presented API key
    ///
    /// Transports call this before dispatching; no operation calls it
    /// implicitly.
    ///
    /// # Errors
    /// Returns [`DirectoryError::Unauthorized`] when a key is configured and
    /// `presented` is absent or different
    pub fn authorize(&self, presented: Option<&str>) -> Result<(), DirectoryError> {
        match (&self.config.api_key, presented) {
            (None, _) => Ok(()),
            (Some(expected), Some(presented)) if expected == presented => Ok(()),
            (Some(_), _) => {
                tracing::warn!("rejected request with invalid api key");
                Err(DirectoryError::Unauthorized)
            }
        }
    }

    // ===== Activities =====

    /// Create an activity under an optional parent
    ///
    /// # Errors
    /// - [`DirectoryError::InvalidInput`] for a blank or unencodable name
    /// - [`DirectoryError::NotFound`] if the parent does not exist, including
    ///   when it is deleted concurrently
    /// - [`DirectoryError::DepthExceeded`] if the parent is at maximum depth
    /// - [`DirectoryError::DuplicatePath`] if the path is taken, including
    ///   when a concurrent create wins the insert
    pub async fn create_activity(
        &self,
        name: &str,
        parent_id: Option<ActivityId>,
    ) -> Result<ActivityNode, DirectoryError> {
        let name = crate::entities::require_name(name)?;
        let path = self
            .path_builder()
            .build(name, parent_id)
            .await
            .inspect_err(|err| tracing::warn!(name, error = %err, "activity rejected"))?;

        let receipt = self
            .store
            .commit(
                Mutation::InsertActivity {
                    name: name.to_string(),
                    path: path.clone(),
                }
                .into(),
            )
            .await
            .map_err(DirectoryError::from)
            .inspect_err(|err| tracing::warn!(path = %path, error = %err, "activity insert lost"))?;
        self.cache.invalidate();

        let id = receipt.activity().ok_or_else(|| {
            DirectoryError::Storage(StoreError::Unavailable(
                "commit returned no activity id".to_string(),
            ))
        })?;
        tracing::info!(id = %id, path = %path, "created activity");
        Ok(ActivityNode::new(id, name, path))
    }

    /// Activity by id
    ///
    /// # Errors
    /// Returns [`DirectoryError::NotFound`] if absent
    pub async fn activity(&self, id: ActivityId) -> Result<ActivityNode, DirectoryError> {
        self.store
            .activity(id)
            .await?
            .ok_or_else(|| DirectoryError::not_found(Entity::Activity, id))
    }

    /// Every activity, ordered by id
    ///
    /// # Errors
    /// Returns [`DirectoryError::Storage`] on backend failure
    pub async fn activities(&self) -> Result<Vec<ActivityNode>, DirectoryError> {
        Ok(self.store.activities().await?)
    }

    /// Tree rooted at an activity
    ///
    /// # Errors
    /// Returns [`DirectoryError::NotFound`] if the activity is absent
    pub async fn activity_tree(&self, id: ActivityId) -> Result<ActivityTree, DirectoryError> {
        let node = self.activity(id).await?;
        self.cache
            .try_get_or_insert_with(&node.path, || async {
                let nodes = self.resolver().subtree(&node).await?;
                Ok::<_, DirectoryError>(assemble(&nodes, &node.path)?)
            })
            .await
    }

    /// One tree per root activity, ordered by root id
    ///
    /// # Errors
    /// Returns [`DirectoryError::Storage`] on backend failure
    pub async fn activity_trees(&self) -> Result<Vec<ActivityTree>, DirectoryError> {
        let nodes = self.store.activities().await?;
        let trees = assemble_forest(&nodes)?;
        tracing::debug!(roots = trees.len(), nodes = nodes.len(), "assembled forest");
        Ok(trees)
    }

    /// Delete an activity with all of its descendants
    ///
    /// Their associations go in the same batch. Returns the removed ids.
    ///
    /// # Errors
    /// Returns [`DirectoryError::NotFound`] if the activity is absent
    pub async fn delete_activity(
        &self,
        id: ActivityId,
    ) -> Result<BTreeSet<ActivityId>, DirectoryError> {
        let node = self.activity(id).await?;
        let batch = WriteBatch::new()
            .with(Mutation::UnlinkActivitySubtree {
                path: node.path.clone(),
            })
            .with(Mutation::DeleteActivitySubtree {
                path: node.path.clone(),
            });

        let receipt = self.store.commit(batch).await?;
        self.cache.invalidate();
        tracing::info!(
            path = %node.path,
            removed = receipt.removed_activities.len(),
            "deleted activity subtree"
        );
        Ok(receipt.removed_activities)
    }

    // ===== Associations =====

    /// See [`ActivityOrgLinkage::link`]
    ///
    /// # Errors
    /// `NotFound` or `Conflict`
    pub async fn link(
        &self,
        organization_id: OrganizationId,
        activity_id: ActivityId,
    ) -> Result<ActivityLink, DirectoryError> {
        self.linkage().link(organization_id, activity_id).await
    }

    /// See [`ActivityOrgLinkage::unlink`]
    ///
    /// # Errors
    /// `NotFound` if the pair does not exist
    pub async fn unlink(
        &self,
        organization_id: OrganizationId,
        activity_id: ActivityId,
    ) -> Result<(), DirectoryError> {
        self.linkage().unlink(organization_id, activity_id).await
    }

    /// See [`ActivityOrgLinkage::organizations_for_activity`]
    ///
    /// # Errors
    /// `NotFound` or `EmptyResult`
    pub async fn organizations_for_activity(
        &self,
        activity_id: ActivityId,
    ) -> Result<BTreeSet<OrganizationId>, DirectoryError> {
        self.linkage().organizations_for_activity(activity_id).await
    }

    /// See [`ActivityOrgLinkage::activities_for_organization`]
    ///
    /// # Errors
    /// `NotFound` or `EmptyResult`
    pub async fn activities_for_organization(
        &self,
        organization_id: OrganizationId,
    ) -> Result<Vec<ActivityNode>, DirectoryError> {
        self.linkage()
            .activities_for_organization(organization_id)
            .await
    }

    /// Organizations practicing an activity or any descendant, as records
    ///
    /// # Errors
    /// `NotFound` or `EmptyResult`; `NotFound` also when a linked
    /// organization disappears between the two reads
    pub async fn organizations_practicing(
        &self,
        activity_id: ActivityId,
    ) -> Result<Vec<Organization>, DirectoryError> {
        let ids = self.organizations_for_activity(activity_id).await?;
        futures::future::try_join_all(ids.iter().map(|&id| async move {
            self.store
                .organization(id)
                .await?
                .ok_or_else(|| DirectoryError::not_found(Entity::Organization, id))
        }))
        .await
    }

    // ===== Queries =====

    /// Organizations located in a building
    ///
    /// # Errors
    /// - [`DirectoryError::NotFound`] if the building does not exist
    /// - [`DirectoryError::EmptyResult`] if it houses no organization
    pub async fn organizations_in_building(
        &self,
        building_id: BuildingId,
    ) -> Result<Vec<Organization>, DirectoryError> {
        if self.store.building(building_id).await?.is_none() {
            return Err(DirectoryError::not_found(Entity::Building, building_id));
        }
        let organizations = self.store.organizations_in_building(building_id).await?;
        if organizations.is_empty() {
            return Err(DirectoryError::empty(format!(
                "no organizations in building {building_id}"
            )));
        }
        Ok(organizations)
    }

    /// Organizations whose building lies inside `area`
    ///
    /// Buildings without coordinates never match.
    ///
    /// # Errors
    /// Returns [`DirectoryError::EmptyResult`] if nothing matches
    pub async fn organizations_in_area(
        &self,
        area: &BoundingBox,
    ) -> Result<Vec<Organization>, DirectoryError> {
        let inside: BTreeSet<BuildingId> = self
            .store
            .buildings()
            .await?
            .into_iter()
            .filter(|b| {
                b.coordinates()
                    .is_some_and(|(lat, lon)| area.contains(lat, lon))
            })
            .map(|b| b.id)
            .collect();

        let organizations: Vec<_> = self
            .store
            .organizations()
            .await?
            .into_iter()
            .filter(|org| org.building_id.is_some_and(|id| inside.contains(&id)))
            .collect();

        tracing::debug!(
            buildings = inside.len(),
            organizations = organizations.len(),
            "area query"
        );
        if organizations.is_empty() {
            return Err(DirectoryError::empty("no organizations in area"));
        }
        Ok(organizations)
    }
}

impl std::fmt::Debug for Directory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Directory")
            .field("config", &self.config)
            .field("cache", &self.cache)
            .finish_non_exhaustive()
    }
}
