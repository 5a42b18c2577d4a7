//! Atomic write batches
//!
//! A [`WriteBatch`] is an ordered list of [`Mutation`]s committed as one unit:
//! either every mutation applies or none does.

use crate::records::{
    ActivityLink, BuildingId, BuildingPatch, NewBuilding, NewOrganization, NewPhone,
    OrganizationId, OrganizationPatch, PhoneId, PhonePatch,
};
use orgdir_taxonomy::{ActivityId, ActivityPath};
use std::collections::BTreeSet;

/// One write against the directory schema
#[derive(Debug, Clone, PartialEq)]
pub enum Mutation {
    /// Insert an activity; the parent path must exist unless the path is a root
    InsertActivity {
        /// Display name
        name: String,
        /// Materialized path
        path: ActivityPath,
    },
    /// Remove associations of every activity at or under `path`
    UnlinkActivitySubtree {
        /// Subtree root
        path: ActivityPath,
    },
    /// Remove every activity at or under `path`
    DeleteActivitySubtree {
        /// Subtree root
        path: ActivityPath,
    },
    /// Insert an association
    InsertLink(ActivityLink),
    /// Remove an association
    DeleteLink(ActivityLink),
    /// Insert a building
    InsertBuilding(NewBuilding),
    /// Update a building
    UpdateBuilding {
        /// Target row
        id: BuildingId,
        /// Fields to change
        patch: BuildingPatch,
    },
    /// Clear the building of every organization located in it
    DetachBuilding {
        /// Building being vacated
        id: BuildingId,
    },
    /// Remove a building
    DeleteBuilding {
        /// Target row
        id: BuildingId,
    },
    /// Insert an organization
    InsertOrganization(NewOrganization),
    /// Update an organization
    UpdateOrganization {
        /// Target row
        id: OrganizationId,
        /// Fields to change
        patch: OrganizationPatch,
    },
    /// Remove every association of an organization
    UnlinkOrganization {
        /// Organization
        id: OrganizationId,
    },
    /// Remove every phone of an organization
    DeletePhonesOf {
        /// Organization
        organization: OrganizationId,
    },
    /// Remove an organization
    DeleteOrganization {
        /// Target row
        id: OrganizationId,
    },
    /// Insert a phone
    InsertPhone(NewPhone),
    /// Update a phone
    UpdatePhone {
        /// Target row
        id: PhoneId,
        /// Fields to change
        patch: PhonePatch,
    },
    /// Remove a phone
    DeletePhone {
        /// Target row
        id: PhoneId,
    },
}

/// Ordered mutations committed atomically
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WriteBatch {
    mutations: Vec<Mutation>,
}

impl WriteBatch {
    /// Create empty batch
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a mutation
    #[must_use]
    pub fn with(mut self, mutation: Mutation) -> Self {
        self.mutations.push(mutation);
        self
    }

    /// Append a mutation in place
    pub fn push(&mut self, mutation: Mutation) {
        self.mutations.push(mutation);
    }

    /// Mutations in commit order
    #[inline]
    #[must_use]
    pub fn mutations(&self) -> &[Mutation] {
        &self.mutations
    }

    /// Consume into mutations
    #[inline]
    #[must_use]
    pub fn into_mutations(self) -> Vec<Mutation> {
        self.mutations
    }

    /// Number of mutations
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.mutations.len()
    }

    /// Check if batch is empty
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.mutations.is_empty()
    }
}

impl From<Mutation> for WriteBatch {
    fn from(mutation: Mutation) -> Self {
        Self::new().with(mutation)
    }
}

/// Identifier assigned to an inserted row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowId {
    /// Activity row
    Activity(ActivityId),
    /// Organization row
    Organization(OrganizationId),
    /// Building row
    Building(BuildingId),
    /// Phone row
    Phone(PhoneId),
}

/// Outcome of a committed batch
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommitReceipt {
    /// Identifiers of inserted rows in mutation order
    pub inserted: Vec<RowId>,
    /// Activities removed by subtree deletes
    pub removed_activities: BTreeSet<ActivityId>,
    /// Rows changed by updates, deletes and detaches
    pub affected: usize,
}

impl CommitReceipt {
    /// First inserted activity
    #[must_use]
    pub fn activity(&self) -> Option<ActivityId> {
        self.inserted.iter().find_map(|row| match row {
            RowId::Activity(id) => Some(*id),
            _ => None,
        })
    }

    /// First inserted organization
    #[must_use]
    pub fn organization(&self) -> Option<OrganizationId> {
        self.inserted.iter().find_map(|row| match row {
            RowId::Organization(id) => Some(*id),
            _ => None,
        })
    }

    /// First inserted building
    #[must_use]
    pub fn building(&self) -> Option<BuildingId> {
        self.inserted.iter().find_map(|row| match row {
            RowId::Building(id) => Some(*id),
            _ => None,
        })
    }

    /// First inserted phone
    #[must_use]
    pub fn phone(&self) -> Option<PhoneId> {
        self.inserted.iter().find_map(|row| match row {
            RowId::Phone(id) => Some(*id),
            _ => None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn batch_keeps_order() {
        let path: ActivityPath = "a".parse().unwrap();
        let batch = WriteBatch::new()
            .with(Mutation::UnlinkActivitySubtree { path: path.clone() })
            .with(Mutation::DeleteActivitySubtree { path });
        assert_eq!(batch.len(), 2);
        assert!(matches!(
            batch.mutations()[0],
            Mutation::UnlinkActivitySubtree { .. }
        ));
    }

    #[test]
    fn receipt_finds_inserted_kinds() {
        let receipt = CommitReceipt {
            inserted: vec![RowId::Building(BuildingId(3)), RowId::Organization(OrganizationId(7))],
            ..CommitReceipt::default()
        };
        assert_eq!(receipt.building(), Some(BuildingId(3)));
        assert_eq!(receipt.organization(), Some(OrganizationId(7)));
        assert_eq!(receipt.activity(), None);
    }
}
