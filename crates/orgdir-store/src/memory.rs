//! In-memory store
//!
//! All tables live behind one [`parking_lot::RwLock`]. Reads take the shared
//! lock; a commit takes the exclusive lock, applies the batch to a clone and
//! swaps the clone in only if every mutation succeeded.

use crate::batch::{CommitReceipt, WriteBatch};
use crate::error::StoreError;
use crate::records::{
    ActivityLink, Building, BuildingId, Organization, OrganizationId, Phone, PhoneId,
};
use crate::snapshot::Snapshot;
use crate::store::Store;
use crate::tables::Tables;
use async_trait::async_trait;
use orgdir_taxonomy::{ActivityId, ActivityNode, ActivityPath};
use parking_lot::RwLock;
use std::collections::BTreeSet;

/// Reference [`Store`] backend
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    /// Create empty store
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create store from a snapshot
    ///
    /// Rows are replayed through the same constraints as commits; identifier
    /// sequences resume after the largest restored id.
    ///
    /// # Errors
    /// Returns the first constraint the snapshot violates
    pub fn from_snapshot(snapshot: Snapshot) -> Result<Self, StoreError> {
        let rows = snapshot.rows();
        let tables = Tables::restore(snapshot)?;
        tracing::debug!(rows, "restored store from snapshot");
        Ok(Self {
            tables: RwLock::new(tables),
        })
    }

    /// Dump every committed row
    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        self.tables.read().snapshot()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn activity(&self, id: ActivityId) -> Result<Option<ActivityNode>, StoreError> {
        Ok(self.tables.read().activity(id).cloned())
    }

    async fn activity_by_path(
        &self,
        path: &ActivityPath,
    ) -> Result<Option<ActivityNode>, StoreError> {
        Ok(self.tables.read().activity_by_path(path).cloned())
    }

    async fn activity_subtree(
        &self,
        path: &ActivityPath,
    ) -> Result<Vec<ActivityNode>, StoreError> {
        Ok(self.tables.read().activity_subtree(path))
    }

    async fn activities(&self) -> Result<Vec<ActivityNode>, StoreError> {
        Ok(self.tables.read().activities().cloned().collect())
    }

    async fn organization(&self, id: OrganizationId) -> Result<Option<Organization>, StoreError> {
        Ok(self.tables.read().organization(id).cloned())
    }

    async fn organizations(&self) -> Result<Vec<Organization>, StoreError> {
        Ok(self.tables.read().organizations().cloned().collect())
    }

    async fn organizations_in_building(
        &self,
        id: BuildingId,
    ) -> Result<Vec<Organization>, StoreError> {
        Ok(self
            .tables
            .read()
            .organizations()
            .filter(|org| org.building_id == Some(id))
            .cloned()
            .collect())
    }

    async fn building(&self, id: BuildingId) -> Result<Option<Building>, StoreError> {
        Ok(self.tables.read().building(id).cloned())
    }

    async fn buildings(&self) -> Result<Vec<Building>, StoreError> {
        Ok(self.tables.read().buildings().cloned().collect())
    }

    async fn phone(&self, id: PhoneId) -> Result<Option<Phone>, StoreError> {
        Ok(self.tables.read().phone(id).cloned())
    }

    async fn phones(&self) -> Result<Vec<Phone>, StoreError> {
        Ok(self.tables.read().phones().cloned().collect())
    }

    async fn phones_of(&self, organization: OrganizationId) -> Result<Vec<Phone>, StoreError> {
        Ok(self
            .tables
            .read()
            .phones()
            .filter(|phone| phone.organization_id == Some(organization))
            .cloned()
            .collect())
    }

    async fn links_for_activities(
        &self,
        ids: &BTreeSet<ActivityId>,
    ) -> Result<Vec<ActivityLink>, StoreError> {
        let tables = self.tables.read();
        let mut links: Vec<_> = ids
            .iter()
            .flat_map(|&id| tables.links_for_activity(id))
            .collect();
        links.sort_unstable();
        Ok(links)
    }

    async fn links_for_organization(
        &self,
        id: OrganizationId,
    ) -> Result<Vec<ActivityLink>, StoreError> {
        Ok(self.tables.read().links_for_organization(id).collect())
    }

    async fn commit(&self, batch: WriteBatch) -> Result<CommitReceipt, StoreError> {
        let mutations = batch.len();
        let mut tables = self.tables.write();
        let mut staged = tables.clone();
        let mut receipt = CommitReceipt::default();

        for mutation in batch.into_mutations() {
            if let Err(err) = staged.apply(mutation, &mut receipt) {
                tracing::debug!(error = %err, mutations, "batch rolled back");
                return Err(err);
            }
        }

        *tables = staged;
        tracing::trace!(
            mutations,
            inserted = receipt.inserted.len(),
            affected = receipt.affected,
            "batch committed"
        );
        Ok(receipt)
    }
}
