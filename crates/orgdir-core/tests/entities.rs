//! Organization, building and phone lifecycle plus directory queries

use orgdir_core::prelude::*;
use orgdir_core::Entity;
use orgdir_store::{BuildingPatch, OrganizationPatch, PhonePatch};
use orgdir_test_utils::{building_at, seeded_directory, setup_test_directory, TOMSK};

#[tokio::test]
async fn organization_details_include_references() {
    let seeded = seeded_directory().await;
    let directory = &seeded.directory;

    directory
        .create_phone(NewPhone {
            number: " +7 (3822) 55-12-34 ".into(),
            organization_id: Some(seeded.butcher.id),
        })
        .await
        .unwrap();

    let details = directory.organization(seeded.butcher.id).await.unwrap();
    assert_eq!(details.organization.name, "Butcher & Sons");
    assert_eq!(details.building.as_ref().map(|b| b.id), Some(seeded.centre.id));
    assert_eq!(details.phones.len(), 1);
    assert_eq!(details.phones[0].number, "+7 (3822) 55-12-34");
    assert_eq!(
        details.activities.iter().map(|a| a.id).collect::<Vec<_>>(),
        vec![seeded.meat.id]
    );

    let json = serde_json::to_value(&details).unwrap();
    assert_eq!(json["name"], "Butcher & Sons");
    assert!(json["phones"].is_array());
}

#[tokio::test]
async fn organization_requires_existing_building_and_name() {
    let directory = setup_test_directory();
    let err = directory
        .create_organization(NewOrganization {
            name: "Nowhere".into(),
            building_id: Some(BuildingId(5)),
        })
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        DirectoryError::NotFound {
            entity: Entity::Building,
            ..
        }
    ));

    let err = directory
        .create_organization(NewOrganization {
            name: "   ".into(),
            building_id: None,
        })
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidInput);
}

#[tokio::test]
async fn find_organization_ignores_case() {
    let seeded = seeded_directory().await;
    let found = seeded
        .directory
        .find_organizations("МОЛОЧНИК")
        .await
        .unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].id, seeded.dairy_shop.id);

    let err = seeded
        .directory
        .find_organizations("Nobody")
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::EmptyResult);
}

#[tokio::test]
async fn update_changes_only_supplied_fields() {
    let seeded = seeded_directory().await;
    let directory = &seeded.directory;

    let moved = directory
        .update_organization(
            seeded.hauler.id,
            OrganizationPatch {
                building_id: Some(Some(seeded.centre.id)),
                ..OrganizationPatch::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(moved.name, "Heavy Haul");
    assert_eq!(moved.building_id, Some(seeded.centre.id));

    let building = directory
        .update_building(
            seeded.outskirts.id,
            BuildingPatch {
                street: Some("Kirova".into()),
                ..BuildingPatch::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(building.street, "Kirova");
    assert_eq!(building.city, "Tomsk");

    let err = directory
        .update_building(
            seeded.outskirts.id,
            BuildingPatch {
                latitude: Some(Some(123.0)),
                ..BuildingPatch::default()
            },
        )
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidInput);

    let err = directory
        .update_organization(OrganizationId(77), OrganizationPatch::default())
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[tokio::test]
async fn deleting_organization_removes_phones_and_links() {
    let seeded = seeded_directory().await;
    let directory = &seeded.directory;
    let phone = directory
        .create_phone(NewPhone {
            number: "8-800-555-35-35".into(),
            organization_id: Some(seeded.hauler.id),
        })
        .await
        .unwrap();

    directory.delete_organization(seeded.hauler.id).await.unwrap();

    assert_eq!(
        directory.phone(phone.id).await.unwrap_err().kind(),
        ErrorKind::NotFound
    );
    let err = directory
        .organizations_for_activity(seeded.transport.id)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::EmptyResult);
    assert_eq!(
        directory.delete_organization(seeded.hauler.id).await.unwrap_err().kind(),
        ErrorKind::NotFound
    );
}

#[tokio::test]
async fn deleting_building_detaches_organizations() {
    let seeded = seeded_directory().await;
    let directory = &seeded.directory;

    directory.delete_building(seeded.centre.id).await.unwrap();

    let butcher = directory.organization(seeded.butcher.id).await.unwrap();
    assert_eq!(butcher.organization.building_id, None);
    assert!(butcher.building.is_none());
    assert_eq!(
        directory.building(seeded.centre.id).await.unwrap_err().kind(),
        ErrorKind::NotFound
    );
}

#[tokio::test]
async fn phone_validation_and_lifecycle() {
    let seeded = seeded_directory().await;
    let directory = &seeded.directory;

    let err = directory
        .create_phone(NewPhone {
            number: "call me".into(),
            organization_id: None,
        })
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidInput);

    let err = directory
        .create_phone(NewPhone {
            number: "12345".into(),
            organization_id: Some(OrganizationId(99)),
        })
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);

    let phone = directory
        .create_phone(NewPhone {
            number: "12345".into(),
            organization_id: None,
        })
        .await
        .unwrap();
    let phone = directory
        .update_phone(
            phone.id,
            PhonePatch {
                organization_id: Some(Some(seeded.butcher.id)),
                ..PhonePatch::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(phone.number, "12345");
    assert_eq!(phone.organization_id, Some(seeded.butcher.id));
    assert_eq!(directory.phones().await.unwrap().len(), 1);

    directory.delete_phone(phone.id).await.unwrap();
    assert!(directory.phones().await.unwrap().is_empty());
}

#[tokio::test]
async fn building_coordinates_are_validated() {
    let directory = setup_test_directory();
    let err = directory
        .create_building(building_at("1", 91.0, 0.0))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidInput);
    assert!(directory.buildings().await.unwrap().is_empty());
}

#[tokio::test]
async fn organizations_in_building() {
    let seeded = seeded_directory().await;
    let directory = &seeded.directory;

    let orgs = directory
        .organizations_in_building(seeded.centre.id)
        .await
        .unwrap();
    let ids: Vec<_> = orgs.iter().map(|o| o.id).collect();
    assert_eq!(ids, vec![seeded.butcher.id, seeded.dairy_shop.id]);

    let empty = directory
        .create_building(building_at("2", 10.0, 10.0))
        .await
        .unwrap();
    assert_eq!(
        directory
            .organizations_in_building(empty.id)
            .await
            .unwrap_err()
            .kind(),
        ErrorKind::EmptyResult
    );
    assert_eq!(
        directory
            .organizations_in_building(BuildingId(404))
            .await
            .unwrap_err()
            .kind(),
        ErrorKind::NotFound
    );
}

#[tokio::test]
async fn organizations_in_area() {
    let seeded = seeded_directory().await;
    let directory = &seeded.directory;

    let around_tomsk =
        BoundingBox::from_corners(TOMSK.0 - 0.1, TOMSK.1 - 0.1, TOMSK.0 + 0.1, TOMSK.1 + 0.1)
            .unwrap();
    let orgs = directory.organizations_in_area(&around_tomsk).await.unwrap();
    let ids: Vec<_> = orgs.iter().map(|o| o.id).collect();
    // hauler's building has no coordinates
    assert_eq!(ids, vec![seeded.butcher.id, seeded.dairy_shop.id]);

    let edge = BoundingBox::from_corners(TOMSK.0, TOMSK.1, TOMSK.0 + 1.0, TOMSK.1 + 1.0).unwrap();
    assert_eq!(directory.organizations_in_area(&edge).await.unwrap().len(), 2);

    let elsewhere = BoundingBox::from_corners(0.0, 0.0, 1.0, 1.0).unwrap();
    assert_eq!(
        directory
            .organizations_in_area(&elsewhere)
            .await
            .unwrap_err()
            .kind(),
        ErrorKind::EmptyResult
    );
}
