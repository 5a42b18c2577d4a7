//! Rows of the directory schema and their insert/patch payloads

use orgdir_taxonomy::ActivityId;
use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! row_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub u64);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

row_id!(
    /// Unique organization identifier
    OrganizationId
);
row_id!(
    /// Unique building identifier
    BuildingId
);
row_id!(
    /// Unique phone identifier
    PhoneId
);

/// Organization row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Organization {
    /// Identifier
    pub id: OrganizationId,
    /// Display name
    pub name: String,
    /// Building the organization occupies
    pub building_id: Option<BuildingId>,
}

/// Building row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Building {
    /// Identifier
    pub id: BuildingId,
    /// Country
    pub country: Option<String>,
    /// City
    pub city: String,
    /// Street
    pub street: String,
    /// House number
    pub house_number: String,
    /// Latitude in degrees
    pub latitude: Option<f64>,
    /// Longitude in degrees
    pub longitude: Option<f64>,
}

impl Building {
    /// Coordinates if both are known
    #[inline]
    #[must_use]
    pub fn coordinates(&self) -> Option<(f64, f64)> {
        self.latitude.zip(self.longitude)
    }
}

/// Phone row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Phone {
    /// Identifier
    pub id: PhoneId,
    /// Number as entered
    pub number: String,
    /// Owning organization
    pub organization_id: Option<OrganizationId>,
}

/// Organization ↔ activity association row
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ActivityLink {
    /// Organization side
    pub organization_id: OrganizationId,
    /// Activity side
    pub activity_id: ActivityId,
}

impl ActivityLink {
    /// Create link
    #[inline]
    #[must_use]
    pub fn new(organization_id: OrganizationId, activity_id: ActivityId) -> Self {
        Self {
            organization_id,
            activity_id,
        }
    }
}

impl fmt::Display for ActivityLink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.organization_id, self.activity_id)
    }
}

/// Building insert payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewBuilding {
    /// Country
    #[serde(default)]
    pub country: Option<String>,
    /// City
    pub city: String,
    /// Street
    pub street: String,
    /// House number
    pub house_number: String,
    /// Latitude in degrees
    #[serde(default)]
    pub latitude: Option<f64>,
    /// Longitude in degrees
    #[serde(default)]
    pub longitude: Option<f64>,
}

/// Building update; `None` leaves a field unchanged
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BuildingPatch {
    /// New country (`Some(None)` clears it)
    pub country: Option<Option<String>>,
    /// New city
    pub city: Option<String>,
    /// New street
    pub street: Option<String>,
    /// New house number
    pub house_number: Option<String>,
    /// New latitude (`Some(None)` clears it)
    pub latitude: Option<Option<f64>>,
    /// New longitude (`Some(None)` clears it)
    pub longitude: Option<Option<f64>>,
}

impl BuildingPatch {
    /// Apply supplied fields to a row
    pub fn apply_to(&self, building: &mut Building) {
        if let Some(country) = &self.country {
            building.country.clone_from(country);
        }
        if let Some(city) = &self.city {
            building.city.clone_from(city);
        }
        if let Some(street) = &self.street {
            building.street.clone_from(street);
        }
        if let Some(house_number) = &self.house_number {
            building.house_number.clone_from(house_number);
        }
        if let Some(latitude) = self.latitude {
            building.latitude = latitude;
        }
        if let Some(longitude) = self.longitude {
            building.longitude = longitude;
        }
    }
}

/// Organization insert payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewOrganization {
    /// Display name
    pub name: String,
    /// Building the organization occupies
    #[serde(default)]
    pub building_id: Option<BuildingId>,
}

/// Organization update; `None` leaves a field unchanged
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrganizationPatch {
    /// New name
    pub name: Option<String>,
    /// New building (`Some(None)` detaches it)
    pub building_id: Option<Option<BuildingId>>,
}

impl OrganizationPatch {
    /// Apply supplied fields to a row
    pub fn apply_to(&self, organization: &mut Organization) {
        if let Some(name) = &self.name {
            organization.name.clone_from(name);
        }
        if let Some(building_id) = self.building_id {
            organization.building_id = building_id;
        }
    }
}

/// Phone insert payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewPhone {
    /// Number as entered
    pub number: String,
    /// Owning organization
    #[serde(default)]
    pub organization_id: Option<OrganizationId>,
}

/// Phone update; `None` leaves a field unchanged
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PhonePatch {
    /// New number
    pub number: Option<String>,
    /// New owner (`Some(None)` detaches it)
    pub organization_id: Option<Option<OrganizationId>>,
}

impl PhonePatch {
    /// Apply supplied fields to a row
    pub fn apply_to(&self, phone: &mut Phone) {
        if let Some(number) = &self.number {
            phone.number.clone_from(number);
        }
        if let Some(organization_id) = self.organization_id {
            phone.organization_id = organization_id;
        }
    }
}
