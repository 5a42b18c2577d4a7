//! Storage collaborator contract

use crate::batch::{CommitReceipt, WriteBatch};
use crate::error::StoreError;
use crate::records::{
    ActivityLink, Building, BuildingId, Organization, OrganizationId, Phone, PhoneId,
};
use async_trait::async_trait;
use orgdir_taxonomy::{ActivityId, ActivityNode, ActivityPath};
use std::collections::BTreeSet;

/// Storage backend for the directory
///
/// Reads observe only committed state. Listing reads return rows ordered by
/// identifier. Writes go through [`Store::commit`] and are atomic per batch.
#[async_trait]
pub trait Store: Send + Sync {
    /// Activity by identifier
    async fn activity(&self, id: ActivityId) -> Result<Option<ActivityNode>, StoreError>;

    /// Activity by exact path
    async fn activity_by_path(
        &self,
        path: &ActivityPath,
    ) -> Result<Option<ActivityNode>, StoreError>;

    /// Activity at `path` and every descendant, respecting segment boundaries
    async fn activity_subtree(&self, path: &ActivityPath)
        -> Result<Vec<ActivityNode>, StoreError>;

    /// Every activity
    async fn activities(&self) -> Result<Vec<ActivityNode>, StoreError>;

    /// Organization by identifier
    async fn organization(&self, id: OrganizationId) -> Result<Option<Organization>, StoreError>;

    /// Every organization
    async fn organizations(&self) -> Result<Vec<Organization>, StoreError>;

    /// Organizations located in a building
    async fn organizations_in_building(
        &self,
        id: BuildingId,
    ) -> Result<Vec<Organization>, StoreError>;

    /// Building by identifier
    async fn building(&self, id: BuildingId) -> Result<Option<Building>, StoreError>;

    /// Every building
    async fn buildings(&self) -> Result<Vec<Building>, StoreError>;

    /// Phone by identifier
    async fn phone(&self, id: PhoneId) -> Result<Option<Phone>, StoreError>;

    /// Every phone
    async fn phones(&self) -> Result<Vec<Phone>, StoreError>;

    /// Phones owned by an organization
    async fn phones_of(&self, organization: OrganizationId) -> Result<Vec<Phone>, StoreError>;

    /// Associations touching any of `ids`
    async fn links_for_activities(
        &self,
        ids: &BTreeSet<ActivityId>,
    ) -> Result<Vec<ActivityLink>, StoreError>;

    /// Associations of one organization
    async fn links_for_organization(
        &self,
        id: OrganizationId,
    ) -> Result<Vec<ActivityLink>, StoreError>;

    /// Apply a batch atomically
    ///
    /// # Errors
    /// Any constraint violation aborts the whole batch
    async fn commit(&self, batch: WriteBatch) -> Result<CommitReceipt, StoreError>;
}
