//! Organization ↔ activity association

use crate::error::{DirectoryError, Entity};
use crate::resolver::DescendantResolver;
use orgdir_store::{ActivityLink, Mutation, OrganizationId, Store};
use orgdir_taxonomy::{ActivityId, ActivityNode};
use std::collections::BTreeSet;

/// Manages the many-to-many association and its transitive queries
#[derive(Clone, Copy)]
pub struct ActivityOrgLinkage<'a> {
    store: &'a dyn Store,
}

impl<'a> ActivityOrgLinkage<'a> {
    /// Create linkage over a store
    #[inline]
    #[must_use]
    pub fn new(store: &'a dyn Store) -> Self {
        Self { store }
    }

    async fn require_activity(&self, id: ActivityId) -> Result<ActivityNode, DirectoryError> {
        self.store
            .activity(id)
            .await?
            .ok_or_else(|| DirectoryError::not_found(Entity::Activity, id))
    }

    async fn require_organization(&self, id: OrganizationId) -> Result<(), DirectoryError> {
        match self.store.organization(id).await? {
            Some(_) => Ok(()),
            None => Err(DirectoryError::not_found(Entity::Organization, id)),
        }
    }

    /// Associate an organization with an activity
    ///
    /// # Errors
    /// - [`DirectoryError::NotFound`] if either side does not exist
    /// - [`DirectoryError::Conflict`] if the pair already exists
    pub async fn link(
        &self,
        organization_id: OrganizationId,
        activity_id: ActivityId,
    ) -> Result<ActivityLink, DirectoryError> {
        self.require_organization(organization_id).await?;
        self.require_activity(activity_id).await?;

        let link = ActivityLink::new(organization_id, activity_id);
        self.store.commit(Mutation::InsertLink(link).into()).await?;
        tracing::info!(organization = %organization_id, activity = %activity_id, "linked");
        Ok(link)
    }

    /// Remove an association
    ///
    /// # Errors
    /// Returns [`DirectoryError::NotFound`] if the pair does not exist
    pub async fn unlink(
        &self,
        organization_id: OrganizationId,
        activity_id: ActivityId,
    ) -> Result<(), DirectoryError> {
        let link = ActivityLink::new(organization_id, activity_id);
        self.store.commit(Mutation::DeleteLink(link).into()).await?;
        tracing::info!(organization = %organization_id, activity = %activity_id, "unlinked");
        Ok(())
    }

    /// Organizations linked to the activity or any of its descendants
    ///
    /// # Errors
    /// - [`DirectoryError::NotFound`] if the activity does not exist
    /// - [`DirectoryError::EmptyResult`] if no organization matches
    pub async fn organizations_for_activity(
        &self,
        activity_id: ActivityId,
    ) -> Result<BTreeSet<OrganizationId>, DirectoryError> {
        let activity = self.require_activity(activity_id).await?;
        let ids = DescendantResolver::new(self.store).expand(&activity).await?;

        let organizations: BTreeSet<_> = self
            .store
            .links_for_activities(&ids)
            .await?
            .into_iter()
            .map(|link| link.organization_id)
            .collect();

        if organizations.is_empty() {
            return Err(DirectoryError::empty(format!(
                "no organizations practice '{}'",
                activity.path
            )));
        }
        tracing::debug!(
            activity = %activity.path,
            expanded = ids.len(),
            organizations = organizations.len(),
            "resolved organizations"
        );
        Ok(organizations)
    }

    /// Activities directly linked to an organization, ordered by id
    ///
    /// # Errors
    /// - [`DirectoryError::NotFound`] if the organization does not exist
    /// - [`DirectoryError::EmptyResult`] if it has no linked activities
    pub async fn activities_for_organization(
        &self,
        organization_id: OrganizationId,
    ) -> Result<Vec<ActivityNode>, DirectoryError> {
        self.require_organization(organization_id).await?;
        let activities = self.linked_activities(organization_id).await?;
        if activities.is_empty() {
            return Err(DirectoryError::empty(format!(
                "organization {organization_id} has no activities"
            )));
        }
        Ok(activities)
    }

    /// Directly linked activities without existence or emptiness checks
    pub(crate) async fn linked_activities(
        &self,
        organization_id: OrganizationId,
    ) -> Result<Vec<ActivityNode>, DirectoryError> {
        let links = self.store.links_for_organization(organization_id).await?;
        let mut activities = Vec::with_capacity(links.len());
        for link in links {
            if let Some(node) = self.store.activity(link.activity_id).await? {
                activities.push(node);
            }
        }
        activities.sort_by_key(|node| node.id);
        Ok(activities)
    }
}

impl std::fmt::Debug for ActivityOrgLinkage<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ActivityOrgLinkage").finish_non_exhaustive()
    }
}
