//! Testing utilities for the orgdir workspace
//!
//! Shared fixtures: directories, buildings and a seeded taxonomy.

#![allow(missing_docs)]

use orgdir_core::{Directory, DirectoryConfig};
use orgdir_store::{Building, NewBuilding, NewOrganization, Organization};
use orgdir_taxonomy::ActivityNode;

/// Tomsk city centre
pub const TOMSK: (f64, f64) = (56.4847, 84.9482);

pub fn setup_test_directory() -> Directory {
    Directory::in_memory(DirectoryConfig::new())
}

pub fn setup_uncached_directory() -> Directory {
    let mut config = DirectoryConfig::new();
    config.tree_cache.enabled = false;
    Directory::in_memory(config)
}

pub fn building_at(house_number: &str, latitude: f64, longitude: f64) -> NewBuilding {
    NewBuilding {
        country: Some("Russia".to_string()),
        city: "Tomsk".to_string(),
        street: "Lenina".to_string(),
        house_number: house_number.to_string(),
        latitude: Some(latitude),
        longitude: Some(longitude),
    }
}

pub fn building_without_coordinates(house_number: &str) -> NewBuilding {
    NewBuilding {
        latitude: None,
        longitude: None,
        ..building_at(house_number, 0.0, 0.0)
    }
}

pub fn organization_in(name: &str, building: &Building) -> NewOrganization {
    NewOrganization {
        name: name.to_string(),
        building_id: Some(building.id),
    }
}

/// Directory with a small taxonomy, two buildings and three organizations
///
/// ```text
/// Еда (food)                 Перевозки (transport)
/// ├── Мясная продукция       └── Грузовые
/// └── Молочная продукция         └── Тяжёлые
/// ```
///
/// `butcher` practises meat, `dairy` practises dairy, `hauler` practises
/// heavy freight. `centre` has coordinates near [`TOMSK`], `outskirts` has
/// none.
#[derive(Debug)]
pub struct Seeded {
    pub directory: Directory,
    pub food: ActivityNode,
    pub meat: ActivityNode,
    pub dairy: ActivityNode,
    pub transport: ActivityNode,
    pub freight: ActivityNode,
    pub heavy: ActivityNode,
    pub centre: Building,
    pub outskirts: Building,
    pub butcher: Organization,
    pub dairy_shop: Organization,
    pub hauler: Organization,
}

pub async fn seeded_directory() -> Seeded {
    seed(setup_test_directory()).await
}

pub async fn seed(directory: Directory) -> Seeded {
    let food = directory.create_activity("Еда", None).await.unwrap();
    let meat = directory
        .create_activity("Мясная продукция", Some(food.id))
        .await
        .unwrap();
    let dairy = directory
        .create_activity("Молочная продукция", Some(food.id))
        .await
        .unwrap();
    let transport = directory.create_activity("Перевозки", None).await.unwrap();
    let freight = directory
        .create_activity("Грузовые", Some(transport.id))
        .await
        .unwrap();
    let heavy = directory
        .create_activity("Тяжёлые", Some(freight.id))
        .await
        .unwrap();

    let centre = directory
        .create_building(building_at("36", TOMSK.0, TOMSK.1))
        .await
        .unwrap();
    let outskirts = directory
        .create_building(building_without_coordinates("1"))
        .await
        .unwrap();

    let butcher = directory
        .create_organization(organization_in("Butcher & Sons", &centre))
        .await
        .unwrap();
    let dairy_shop = directory
        .create_organization(organization_in("Молочник", &centre))
        .await
        .unwrap();
    let hauler = directory
        .create_organization(organization_in("Heavy Haul", &outskirts))
        .await
        .unwrap();

    directory.link(butcher.id, meat.id).await.unwrap();
    directory.link(dairy_shop.id, dairy.id).await.unwrap();
    directory.link(hauler.id, heavy.id).await.unwrap();

    Seeded {
        directory,
        food,
        meat,
        dairy,
        transport,
        freight,
        heavy,
        centre,
        outskirts,
        butcher,
        dairy_shop,
        hauler,
    }
}
