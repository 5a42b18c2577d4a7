//! End-to-end taxonomy behaviour through the directory facade

use orgdir_core::prelude::*;
use orgdir_core::Entity;
use orgdir_test_utils::{seeded_directory, setup_test_directory, setup_uncached_directory};
use pretty_assertions::assert_eq;
use std::collections::BTreeSet;

#[tokio::test]
async fn depth_is_bounded_at_three_levels() {
    let directory = setup_test_directory();

    let root = directory.create_activity("Перевозки", None).await.unwrap();
    assert_eq!(root.path.to_string(), "perevozki");

    let child = directory
        .create_activity("Грузовые", Some(root.id))
        .await
        .unwrap();
    assert_eq!(child.path.to_string(), "perevozki.gruzovye");

    let grandchild = directory
        .create_activity("Тяжёлые", Some(child.id))
        .await
        .unwrap();
    assert_eq!(grandchild.path.depth(), 3);
    assert!(child.path.is_ancestor_of(&grandchild.path));

    let err = directory
        .create_activity("Негабаритные", Some(grandchild.id))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::DepthExceeded);
    assert_eq!(directory.activities().await.unwrap().len(), 3);
}

#[tokio::test]
async fn organizations_resolve_through_descendants() {
    let seeded = seeded_directory().await;
    let directory = &seeded.directory;

    let orgs = directory
        .organizations_for_activity(seeded.transport.id)
        .await
        .unwrap();
    assert_eq!(orgs, BTreeSet::from([seeded.hauler.id]));

    let orgs = directory
        .organizations_for_activity(seeded.food.id)
        .await
        .unwrap();
    assert_eq!(orgs, BTreeSet::from([seeded.butcher.id, seeded.dairy_shop.id]));

    let practicing = directory
        .organizations_practicing(seeded.food.id)
        .await
        .unwrap();
    let names: Vec<_> = practicing.iter().map(|o| o.name.as_str()).collect();
    assert_eq!(names, vec!["Butcher & Sons", "Молочник"]);
}

#[tokio::test]
async fn unrelated_root_is_empty_result() {
    let directory = setup_test_directory();
    let transport = directory.create_activity("Перевозки", None).await.unwrap();
    let freight = directory
        .create_activity("Грузовые", Some(transport.id))
        .await
        .unwrap();
    let heavy = directory
        .create_activity("Тяжёлые", Some(freight.id))
        .await
        .unwrap();
    let food = directory.create_activity("Еда", None).await.unwrap();

    let org = directory
        .create_organization(NewOrganization {
            name: "O1".into(),
            building_id: None,
        })
        .await
        .unwrap();
    directory.link(org.id, heavy.id).await.unwrap();

    let orgs = directory
        .organizations_for_activity(transport.id)
        .await
        .unwrap();
    assert!(orgs.contains(&org.id));

    let err = directory
        .organizations_for_activity(food.id)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::EmptyResult);
}

#[tokio::test]
async fn prefix_match_respects_segment_boundaries() {
    let directory = setup_test_directory();
    let retail = directory.create_activity("Retail", None).await.unwrap();
    let retailer = directory.create_activity("Retailer", None).await.unwrap();
    let online = directory
        .create_activity("Online", Some(retailer.id))
        .await
        .unwrap();

    let org = directory
        .create_organization(NewOrganization {
            name: "Web Shop".into(),
            building_id: None,
        })
        .await
        .unwrap();
    directory.link(org.id, online.id).await.unwrap();

    let expanded = directory.resolver().expand(&retail).await.unwrap();
    assert_eq!(expanded, BTreeSet::from([retail.id]));

    let err = directory
        .organizations_for_activity(retail.id)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::EmptyResult);

    let removed = directory.delete_activity(retail.id).await.unwrap();
    assert_eq!(removed, BTreeSet::from([retail.id]));
    assert!(directory.activity(online.id).await.is_ok());
}

#[tokio::test]
async fn delete_removes_exactly_the_expanded_set() {
    let seeded = seeded_directory().await;
    let directory = &seeded.directory;

    let expected = directory.resolver().expand(&seeded.food).await.unwrap();
    assert_eq!(
        expected,
        BTreeSet::from([seeded.food.id, seeded.meat.id, seeded.dairy.id])
    );
    let before = directory.activities().await.unwrap().len();

    let removed = directory.delete_activity(seeded.food.id).await.unwrap();
    assert_eq!(removed, expected);
    assert_eq!(directory.activities().await.unwrap().len(), before - expected.len());

    for id in &expected {
        let err = directory.activity(*id).await.unwrap_err();
        assert!(matches!(
            err,
            DirectoryError::NotFound {
                entity: Entity::Activity,
                ..
            }
        ));
    }

    // Associations of removed nodes went with them
    let err = directory
        .activities_for_organization(seeded.butcher.id)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::EmptyResult);
    assert!(directory
        .activities_for_organization(seeded.hauler.id)
        .await
        .is_ok());
}

#[tokio::test]
async fn delete_of_missing_activity_is_not_found() {
    let directory = setup_test_directory();
    let err = directory.delete_activity(ActivityId(42)).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[tokio::test]
async fn trees_are_assembled_per_root() {
    let seeded = seeded_directory().await;
    let directory = &seeded.directory;

    let trees = directory.activity_trees().await.unwrap();
    let roots: Vec<_> = trees.iter().map(|t| t.id).collect();
    assert_eq!(roots, vec![seeded.food.id, seeded.transport.id]);

    let food = &trees[0];
    let children: Vec<_> = food.children.iter().map(|c| c.id).collect();
    assert_eq!(children, vec![seeded.meat.id, seeded.dairy.id]);

    let freight = directory.activity_tree(seeded.freight.id).await.unwrap();
    assert_eq!(freight.ids(), vec![seeded.freight.id, seeded.heavy.id]);
    assert_eq!(trees[1].find(&seeded.freight.path), Some(&freight));
}

#[tokio::test]
async fn cached_and_uncached_trees_agree() {
    let cached = seeded_directory().await;
    let uncached = orgdir_test_utils::seed(setup_uncached_directory()).await;

    for id in [cached.food.id, cached.transport.id, cached.heavy.id] {
        let a = cached.directory.activity_tree(id).await.unwrap();
        let b = uncached.directory.activity_tree(id).await.unwrap();
        assert_eq!(a, b);
        // second read may come from cache
        assert_eq!(cached.directory.activity_tree(id).await.unwrap(), a);
    }
}

#[tokio::test]
async fn duplicate_sibling_name_is_duplicate_path() {
    let seeded = seeded_directory().await;
    let err = seeded
        .directory
        .create_activity("  мясная   ПРОДУКЦИЯ ", Some(seeded.food.id))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::DuplicatePath);

    // Same name under a different parent is fine
    seeded
        .directory
        .create_activity("Мясная продукция", Some(seeded.transport.id))
        .await
        .unwrap();
}

#[tokio::test]
async fn linkage_errors() {
    let seeded = seeded_directory().await;
    let directory = &seeded.directory;

    let err = directory
        .link(seeded.butcher.id, seeded.meat.id)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Conflict);

    let err = directory
        .organizations_for_activity(ActivityId(99))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);

    let err = directory
        .activities_for_organization(OrganizationId(99))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);

    directory
        .unlink(seeded.butcher.id, seeded.meat.id)
        .await
        .unwrap();
    let err = directory
        .unlink(seeded.butcher.id, seeded.meat.id)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
}
