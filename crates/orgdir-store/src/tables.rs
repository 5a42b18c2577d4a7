//! Table state and constraint enforcement for the in-memory backend

use crate::batch::{CommitReceipt, Mutation, RowId};
use crate::error::{Constraint, StoreError, Table};
use crate::index::PathIndex;
use crate::records::{
    ActivityLink, Building, BuildingId, Organization, OrganizationId, Phone, PhoneId,
};
use crate::snapshot::Snapshot;
use orgdir_taxonomy::{ActivityId, ActivityNode, ActivityPath};
use std::collections::{BTreeMap, BTreeSet};

/// Last identifier handed out per table
#[derive(Debug, Clone, Copy, Default)]
struct Sequences {
    activity: u64,
    organization: u64,
    building: u64,
    phone: u64,
}

/// All rows plus secondary indexes
///
/// Cloned wholesale at the start of a commit; the clone is swapped in only
/// when every mutation applied.
#[derive(Debug, Clone, Default)]
pub(crate) struct Tables {
    activities: BTreeMap<ActivityId, ActivityNode>,
    paths: PathIndex,
    organizations: BTreeMap<OrganizationId, Organization>,
    buildings: BTreeMap<BuildingId, Building>,
    phones: BTreeMap<PhoneId, Phone>,
    links: BTreeSet<ActivityLink>,
    links_by_activity: BTreeSet<(ActivityId, OrganizationId)>,
    sequences: Sequences,
}

impl Tables {
    // ----- reads -----

    pub(crate) fn activity(&self, id: ActivityId) -> Option<&ActivityNode> {
        self.activities.get(&id)
    }

    pub(crate) fn activity_by_path(&self, path: &ActivityPath) -> Option<&ActivityNode> {
        self.paths.get(path).and_then(|id| self.activities.get(&id))
    }

    pub(crate) fn activity_subtree(&self, path: &ActivityPath) -> Vec<ActivityNode> {
        let ids: BTreeSet<_> = self.paths.subtree(path).into_iter().collect();
        ids.iter()
            .filter_map(|id| self.activities.get(id))
            .cloned()
            .collect()
    }

    pub(crate) fn activities(&self) -> impl Iterator<Item = &ActivityNode> {
        self.activities.values()
    }

    pub(crate) fn organization(&self, id: OrganizationId) -> Option<&Organization> {
        self.organizations.get(&id)
    }

    pub(crate) fn organizations(&self) -> impl Iterator<Item = &Organization> {
        self.organizations.values()
    }

    pub(crate) fn building(&self, id: BuildingId) -> Option<&Building> {
        self.buildings.get(&id)
    }

    pub(crate) fn buildings(&self) -> impl Iterator<Item = &Building> {
        self.buildings.values()
    }

    pub(crate) fn phone(&self, id: PhoneId) -> Option<&Phone> {
        self.phones.get(&id)
    }

    pub(crate) fn phones(&self) -> impl Iterator<Item = &Phone> {
        self.phones.values()
    }

    pub(crate) fn links_for_activity(
        &self,
        id: ActivityId,
    ) -> impl Iterator<Item = ActivityLink> + '_ {
        self.links_by_activity
            .range((id, OrganizationId(0))..=(id, OrganizationId(u64::MAX)))
            .map(|&(activity_id, organization_id)| ActivityLink::new(organization_id, activity_id))
    }

    pub(crate) fn links_for_organization(
        &self,
        id: OrganizationId,
    ) -> impl Iterator<Item = ActivityLink> + '_ {
        self.links
            .range(ActivityLink::new(id, ActivityId(0))..=ActivityLink::new(id, ActivityId(u64::MAX)))
            .copied()
    }

    // ----- writes -----

    pub(crate) fn apply(
        &mut self,
        mutation: Mutation,
        receipt: &mut CommitReceipt,
    ) -> Result<(), StoreError> {
        match mutation {
            Mutation::InsertActivity { name, path } => {
                self.sequences.activity += 1;
                let id = ActivityId(self.sequences.activity);
                self.put_activity(ActivityNode::new(id, name, path))?;
                receipt.inserted.push(RowId::Activity(id));
            }
            Mutation::UnlinkActivitySubtree { path } => {
                for id in self.paths.subtree(&path) {
                    let links: Vec<_> = self.links_for_activity(id).collect();
                    for link in links {
                        self.remove_link(link);
                        receipt.affected += 1;
                    }
                }
            }
            Mutation::DeleteActivitySubtree { path } => {
                let ids = self.paths.subtree(&path);
                if ids.is_empty() {
                    return Err(StoreError::row_not_found(Table::Activities, &path));
                }
                for &id in &ids {
                    if let Some(link) = self.links_for_activity(id).next() {
                        return Err(StoreError::foreign_key(Constraint::LinkActivity, link));
                    }
                }
                for id in self.paths.remove_subtree(&path) {
                    self.activities.remove(&id);
                    receipt.removed_activities.insert(id);
                    receipt.affected += 1;
                }
            }
            Mutation::InsertLink(link) => self.put_link(link)?,
            Mutation::DeleteLink(link) => {
                if !self.remove_link(link) {
                    return Err(StoreError::row_not_found(Table::Links, link));
                }
                receipt.affected += 1;
            }
            Mutation::InsertBuilding(new) => {
                self.sequences.building += 1;
                let id = BuildingId(self.sequences.building);
                self.buildings.insert(
                    id,
                    Building {
                        id,
                        country: new.country,
                        city: new.city,
                        street: new.street,
                        house_number: new.house_number,
                        latitude: new.latitude,
                        longitude: new.longitude,
                    },
                );
                receipt.inserted.push(RowId::Building(id));
            }
            Mutation::UpdateBuilding { id, patch } => {
                let building = self
                    .buildings
                    .get_mut(&id)
                    .ok_or_else(|| StoreError::row_not_found(Table::Buildings, id))?;
                patch.apply_to(building);
                receipt.affected += 1;
            }
            Mutation::DetachBuilding { id } => {
                if !self.buildings.contains_key(&id) {
                    return Err(StoreError::row_not_found(Table::Buildings, id));
                }
                for organization in self.organizations.values_mut() {
                    if organization.building_id == Some(id) {
                        organization.building_id = None;
                        receipt.affected += 1;
                    }
                }
            }
            Mutation::DeleteBuilding { id } => {
                if let Some(org) = self
                    .organizations
                    .values()
                    .find(|org| org.building_id == Some(id))
                {
                    return Err(StoreError::foreign_key(
                        Constraint::OrganizationBuilding,
                        org.id,
                    ));
                }
                self.buildings
                    .remove(&id)
                    .ok_or_else(|| StoreError::row_not_found(Table::Buildings, id))?;
                receipt.affected += 1;
            }
            Mutation::InsertOrganization(new) => {
                self.check_building(new.building_id)?;
                self.sequences.organization += 1;
                let id = OrganizationId(self.sequences.organization);
                self.organizations.insert(
                    id,
                    Organization {
                        id,
                        name: new.name,
                        building_id: new.building_id,
                    },
                );
                receipt.inserted.push(RowId::Organization(id));
            }
            Mutation::UpdateOrganization { id, patch } => {
                if let Some(building_id) = patch.building_id {
                    self.check_building(building_id)?;
                }
                let organization = self
                    .organizations
                    .get_mut(&id)
                    .ok_or_else(|| StoreError::row_not_found(Table::Organizations, id))?;
                patch.apply_to(organization);
                receipt.affected += 1;
            }
            Mutation::UnlinkOrganization { id } => {
                let links: Vec<_> = self.links_for_organization(id).collect();
                for link in links {
                    self.remove_link(link);
                    receipt.affected += 1;
                }
            }
            Mutation::DeletePhonesOf { organization } => {
                let before = self.phones.len();
                self.phones
                    .retain(|_, phone| phone.organization_id != Some(organization));
                receipt.affected += before - self.phones.len();
            }
            Mutation::DeleteOrganization { id } => {
                if !self.organizations.contains_key(&id) {
                    return Err(StoreError::row_not_found(Table::Organizations, id));
                }
                if let Some(phone) = self
                    .phones
                    .values()
                    .find(|phone| phone.organization_id == Some(id))
                {
                    return Err(StoreError::foreign_key(Constraint::PhoneOrganization, phone.id));
                }
                if let Some(link) = self.links_for_organization(id).next() {
                    return Err(StoreError::foreign_key(Constraint::LinkOrganization, link));
                }
                self.organizations.remove(&id);
                receipt.affected += 1;
            }
            Mutation::InsertPhone(new) => {
                self.check_organization(new.organization_id)?;
                self.sequences.phone += 1;
                let id = PhoneId(self.sequences.phone);
                self.phones.insert(
                    id,
                    Phone {
                        id,
                        number: new.number,
                        organization_id: new.organization_id,
                    },
                );
                receipt.inserted.push(RowId::Phone(id));
            }
            Mutation::UpdatePhone { id, patch } => {
                if let Some(organization_id) = patch.organization_id {
                    self.check_organization(organization_id)?;
                }
                let phone = self
                    .phones
                    .get_mut(&id)
                    .ok_or_else(|| StoreError::row_not_found(Table::Phones, id))?;
                patch.apply_to(phone);
                receipt.affected += 1;
            }
            Mutation::DeletePhone { id } => {
                self.phones
                    .remove(&id)
                    .ok_or_else(|| StoreError::row_not_found(Table::Phones, id))?;
                receipt.affected += 1;
            }
        }
        Ok(())
    }

    fn check_building(&self, id: Option<BuildingId>) -> Result<(), StoreError> {
        match id {
            Some(id) if !self.buildings.contains_key(&id) => Err(StoreError::foreign_key(
                Constraint::OrganizationBuilding,
                id,
            )),
            _ => Ok(()),
        }
    }

    fn check_organization(&self, id: Option<OrganizationId>) -> Result<(), StoreError> {
        match id {
            Some(id) if !self.organizations.contains_key(&id) => Err(StoreError::foreign_key(
                Constraint::PhoneOrganization,
                id,
            )),
            _ => Ok(()),
        }
    }

    fn put_activity(&mut self, node: ActivityNode) -> Result<(), StoreError> {
        if self.activities.contains_key(&node.id) {
            return Err(StoreError::unique(
                Constraint::PrimaryKey(Table::Activities),
                node.id,
            ));
        }
        if !node.path.within_max_depth() {
            return Err(StoreError::check(Constraint::ActivityDepth, &node.path));
        }
        if let Some(parent) = node.path.parent() {
            if !self.paths.contains(&parent) {
                return Err(StoreError::foreign_key(Constraint::ActivityParent, &node.path));
            }
        }
        self.paths.insert(&node.path, node.id)?;
        self.activities.insert(node.id, node);
        Ok(())
    }

    fn put_link(&mut self, link: ActivityLink) -> Result<(), StoreError> {
        if !self.organizations.contains_key(&link.organization_id) {
            return Err(StoreError::foreign_key(Constraint::LinkOrganization, link));
        }
        if !self.activities.contains_key(&link.activity_id) {
            return Err(StoreError::foreign_key(Constraint::LinkActivity, link));
        }
        if !self.links.insert(link) {
            return Err(StoreError::unique(Constraint::LinkPair, link));
        }
        self.links_by_activity
            .insert((link.activity_id, link.organization_id));
        Ok(())
    }

    fn remove_link(&mut self, link: ActivityLink) -> bool {
        self.links_by_activity
            .remove(&(link.activity_id, link.organization_id));
        self.links.remove(&link)
    }

    // ----- snapshots -----

    /// Rebuild tables from a snapshot, enforcing every constraint
    pub(crate) fn restore(snapshot: Snapshot) -> Result<Self, StoreError> {
        let mut tables = Self::default();

        for building in snapshot.buildings {
            if tables.buildings.contains_key(&building.id) {
                return Err(StoreError::unique(
                    Constraint::PrimaryKey(Table::Buildings),
                    building.id,
                ));
            }
            tables.sequences.building = tables.sequences.building.max(building.id.0);
            tables.buildings.insert(building.id, building);
        }

        for organization in snapshot.organizations {
            if tables.organizations.contains_key(&organization.id) {
                return Err(StoreError::unique(
                    Constraint::PrimaryKey(Table::Organizations),
                    organization.id,
                ));
            }
            tables.check_building(organization.building_id)?;
            tables.sequences.organization =
                tables.sequences.organization.max(organization.id.0);
            tables.organizations.insert(organization.id, organization);
        }

        for phone in snapshot.phones {
            if tables.phones.contains_key(&phone.id) {
                return Err(StoreError::unique(
                    Constraint::PrimaryKey(Table::Phones),
                    phone.id,
                ));
            }
            tables.check_organization(phone.organization_id)?;
            tables.sequences.phone = tables.sequences.phone.max(phone.id.0);
            tables.phones.insert(phone.id, phone);
        }

        // Parents before children
        let mut activities = snapshot.activities;
        activities.sort_by_key(|node| (node.depth(), node.id));
        for node in activities {
            tables.sequences.activity = tables.sequences.activity.max(node.id.0);
            tables.put_activity(node)?;
        }

        for link in snapshot.links {
            tables.put_link(link)?;
        }

        Ok(tables)
    }

    /// Export every row ordered by identifier
    pub(crate) fn snapshot(&self) -> Snapshot {
        Snapshot {
            buildings: self.buildings.values().cloned().collect(),
            organizations: self.organizations.values().cloned().collect(),
            phones: self.phones.values().cloned().collect(),
            activities: self.activities.values().cloned().collect(),
            links: self.links.iter().copied().collect(),
        }
    }
}
