//! Organization, building and phone CRUD
//!
//! Thin wrappers over the store: input validation, existence checks with
//! friendly errors, then one batch per operation.

use crate::directory::Directory;
use crate::error::{DirectoryError, Entity};
use crate::geo::{validate_latitude, validate_longitude};
use orgdir_store::{
    Building, BuildingId, BuildingPatch, Mutation, NewBuilding, NewOrganization, NewPhone,
    Organization, OrganizationId, OrganizationPatch, Phone, PhoneId, PhonePatch, StoreError,
    WriteBatch,
};
use orgdir_taxonomy::ActivityNode;
use serde::Serialize;

/// Allowed digit count of a phone number
pub const PHONE_DIGITS: std::ops::RangeInclusive<usize> = 5..=15;

/// Organization with everything it references
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrganizationDetails {
    /// Organization row
    #[serde(flatten)]
    pub organization: Organization,
    /// Building, if any
    pub building: Option<Building>,
    /// Phones ordered by id
    pub phones: Vec<Phone>,
    /// Directly linked activities ordered by id
    pub activities: Vec<ActivityNode>,
}

/// Trim a display name, rejecting blanks
pub(crate) fn require_name(name: &str) -> Result<&str, DirectoryError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(DirectoryError::invalid("name must not be blank"));
    }
    Ok(trimmed)
}

/// Check a phone number's alphabet and digit count
///
/// # Errors
/// Returns [`DirectoryError::InvalidInput`] for characters other than digits,
/// spaces, `+`, `-`, `(`, `)` or a digit count outside [`PHONE_DIGITS`]
pub fn validate_phone_number(number: &str) -> Result<(), DirectoryError> {
    if let Some(bad) = number
        .chars()
        .find(|c| !(c.is_ascii_digit() || matches!(c, ' ' | '+' | '-' | '(' | ')')))
    {
        return Err(DirectoryError::invalid(format!(
            "phone number '{number}' contains '{bad}'"
        )));
    }
    let digits = number.chars().filter(char::is_ascii_digit).count();
    if !PHONE_DIGITS.contains(&digits) {
        return Err(DirectoryError::invalid(format!(
            "phone number '{number}' has {digits} digits, expected {}..={}",
            PHONE_DIGITS.start(),
            PHONE_DIGITS.end()
        )));
    }
    Ok(())
}

fn validate_coordinates(latitude: Option<f64>, longitude: Option<f64>) -> Result<(), DirectoryError> {
    if let Some(latitude) = latitude {
        validate_latitude(latitude)?;
    }
    if let Some(longitude) = longitude {
        validate_longitude(longitude)?;
    }
    Ok(())
}

fn missing_id(what: &str) -> DirectoryError {
    DirectoryError::Storage(StoreError::Unavailable(format!(
        "commit returned no {what} id"
    )))
}

impl Directory {
    async fn require_building(&self, id: BuildingId) -> Result<Building, DirectoryError> {
        self.store()
            .building(id)
            .await?
            .ok_or_else(|| DirectoryError::not_found(Entity::Building, id))
    }

    async fn require_organization(&self, id: OrganizationId) -> Result<Organization, DirectoryError> {
        self.store()
            .organization(id)
            .await?
            .ok_or_else(|| DirectoryError::not_found(Entity::Organization, id))
    }

    // ===== Buildings =====

    /// Create a building
    ///
    /// # Errors
    /// Returns [`DirectoryError::InvalidInput`] for out-of-range coordinates
    pub async fn create_building(&self, new: NewBuilding) -> Result<Building, DirectoryError> {
        validate_coordinates(new.latitude, new.longitude)?;
        let receipt = self
            .store()
            .commit(Mutation::InsertBuilding(new).into())
            .await?;
        let id = receipt.building().ok_or_else(|| missing_id("building"))?;
        tracing::info!(id = %id, "created building");
        self.require_building(id).await
    }

    /// Building by id
    ///
    /// # Errors
    /// Returns [`DirectoryError::NotFound`] if absent
    pub async fn building(&self, id: BuildingId) -> Result<Building, DirectoryError> {
        self.require_building(id).await
    }

    /// Every building, ordered by id
    ///
    /// # Errors
    /// Returns [`DirectoryError::Storage`] on backend failure
    pub async fn buildings(&self) -> Result<Vec<Building>, DirectoryError> {
        Ok(self.store().buildings().await?)
    }

    /// Update supplied building fields
    ///
    /// # Errors
    /// `NotFound` or `InvalidInput`
    pub async fn update_building(
        &self,
        id: BuildingId,
        patch: BuildingPatch,
    ) -> Result<Building, DirectoryError> {
        validate_coordinates(patch.latitude.flatten(), patch.longitude.flatten())?;
        self.store()
            .commit(Mutation::UpdateBuilding { id, patch }.into())
            .await?;
        tracing::info!(id = %id, "updated building");
        self.require_building(id).await
    }

    /// Delete a building, detaching its organizations in the same batch
    ///
    /// # Errors
    /// Returns [`DirectoryError::NotFound`] if absent
    pub async fn delete_building(&self, id: BuildingId) -> Result<(), DirectoryError> {
        let receipt = self
            .store()
            .commit(
                WriteBatch::new()
                    .with(Mutation::DetachBuilding { id })
                    .with(Mutation::DeleteBuilding { id }),
            )
            .await?;
        tracing::info!(id = %id, affected = receipt.affected, "deleted building");
        Ok(())
    }

    // ===== Organizations =====

    /// Create an organization
    ///
    /// # Errors
    /// - [`DirectoryError::InvalidInput`] for a blank name
    /// - [`DirectoryError::NotFound`] if the building does not exist
    pub async fn create_organization(
        &self,
        new: NewOrganization,
    ) -> Result<Organization, DirectoryError> {
        let name = require_name(&new.name)?.to_string();
        if let Some(building_id) = new.building_id {
            self.require_building(building_id).await?;
        }
        let receipt = self
            .store()
            .commit(
                Mutation::InsertOrganization(NewOrganization {
                    name,
                    building_id: new.building_id,
                })
                .into(),
            )
            .await?;
        let id = receipt.organization().ok_or_else(|| missing_id("organization"))?;
        tracing::info!(id = %id, "created organization");
        self.require_organization(id).await
    }

    /// Organization with its building, phones and linked activities
    ///
    /// # Errors
    /// Returns [`DirectoryError::NotFound`] if absent
    pub async fn organization(
        &self,
        id: OrganizationId,
    ) -> Result<OrganizationDetails, DirectoryError> {
        let organization = self.require_organization(id).await?;
        let building_id = organization.building_id;
        let linkage = self.linkage();

        let (building, phones, activities) = tokio::try_join!(
            async {
                let building = match building_id {
                    Some(building_id) => self.store().building(building_id).await?,
                    None => None,
                };
                Ok::<_, DirectoryError>(building)
            },
            async { Ok::<_, DirectoryError>(self.store().phones_of(id).await?) },
            linkage.linked_activities(id),
        )?;

        Ok(OrganizationDetails {
            organization,
            building,
            phones,
            activities,
        })
    }

    /// Every organization, ordered by id
    ///
    /// # Errors
    /// Returns [`DirectoryError::Storage`] on backend failure
    pub async fn organizations(&self) -> Result<Vec<Organization>, DirectoryError> {
        Ok(self.store().organizations().await?)
    }

    /// Organizations whose name equals `name`, ignoring case
    ///
    /// # Errors
    /// Returns [`DirectoryError::EmptyResult`] if none match
    pub async fn find_organizations(&self, name: &str) -> Result<Vec<Organization>, DirectoryError> {
        let wanted = require_name(name)?.to_lowercase();
        let found: Vec<_> = self
            .store()
            .organizations()
            .await?
            .into_iter()
            .filter(|org| org.name.trim().to_lowercase() == wanted)
            .collect();
        if found.is_empty() {
            return Err(DirectoryError::empty(format!(
                "no organization named '{}'",
                name.trim()
            )));
        }
        Ok(found)
    }

    /// Update supplied organization fields
    ///
    /// # Errors
    /// `NotFound` for the organization or a new building, `InvalidInput`
    /// for a blank name
    pub async fn update_organization(
        &self,
        id: OrganizationId,
        mut patch: OrganizationPatch,
    ) -> Result<Organization, DirectoryError> {
        if let Some(name) = &patch.name {
            patch.name = Some(require_name(name)?.to_string());
        }
        if let Some(Some(building_id)) = patch.building_id {
            self.require_building(building_id).await?;
        }
        self.store()
            .commit(Mutation::UpdateOrganization { id, patch }.into())
            .await?;
        tracing::info!(id = %id, "updated organization");
        self.require_organization(id).await
    }

    /// Delete an organization with its phones and associations
    ///
    /// # Errors
    /// Returns [`DirectoryError::NotFound`] if absent
    pub async fn delete_organization(&self, id: OrganizationId) -> Result<(), DirectoryError> {
        self.store()
            .commit(
                WriteBatch::new()
                    .with(Mutation::DeletePhonesOf { organization: id })
                    .with(Mutation::UnlinkOrganization { id })
                    .with(Mutation::DeleteOrganization { id }),
            )
            .await?;
        tracing::info!(id = %id, "deleted organization");
        Ok(())
    }

    // ===== Phones =====

    /// Create a phone
    ///
    /// # Errors
    /// `InvalidInput` for a malformed number, `NotFound` for a missing
    /// organization
    pub async fn create_phone(&self, new: NewPhone) -> Result<Phone, DirectoryError> {
        let number = new.number.trim().to_string();
        validate_phone_number(&number)?;
        if let Some(organization_id) = new.organization_id {
            self.require_organization(organization_id).await?;
        }
        let receipt = self
            .store()
            .commit(
                Mutation::InsertPhone(NewPhone {
                    number,
                    organization_id: new.organization_id,
                })
                .into(),
            )
            .await?;
        let id = receipt.phone().ok_or_else(|| missing_id("phone"))?;
        tracing::info!(id = %id, "created phone");
        self.phone(id).await
    }

    /// Phone by id
    ///
    /// # Errors
    /// Returns [`DirectoryError::NotFound`] if absent
    pub async fn phone(&self, id: PhoneId) -> Result<Phone, DirectoryError> {
        self.store()
            .phone(id)
            .await?
            .ok_or_else(|| DirectoryError::not_found(Entity::Phone, id))
    }

    /// Every phone, ordered by id
    ///
    /// # Errors
    /// Returns [`DirectoryError::Storage`] on backend failure
    pub async fn phones(&self) -> Result<Vec<Phone>, DirectoryError> {
        Ok(self.store().phones().await?)
    }

    /// Update supplied phone fields
    ///
    /// # Errors
    /// `NotFound` or `InvalidInput`
    pub async fn update_phone(
        &self,
        id: PhoneId,
        mut patch: PhonePatch,
    ) -> Result<Phone, DirectoryError> {
        if let Some(number) = &patch.number {
            let number = number.trim().to_string();
            validate_phone_number(&number)?;
            patch.number = Some(number);
        }
        if let Some(Some(organization_id)) = patch.organization_id {
            self.require_organization(organization_id).await?;
        }
        self.store()
            .commit(Mutation::UpdatePhone { id, patch }.into())
            .await?;
        tracing::info!(id = %id, "updated phone");
        self.phone(id).await
    }

    /// Delete a phone
    ///
    /// # Errors
    /// Returns [`DirectoryError::NotFound`] if absent
    pub async fn delete_phone(&self, id: PhoneId) -> Result<(), DirectoryError> {
        self.store()
            .commit(Mutation::DeletePhone { id }.into())
            .await?;
        tracing::info!(id = %id, "deleted phone");
        Ok(())
    }
}
