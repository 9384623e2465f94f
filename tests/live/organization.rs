//! Organization endpoints against the live gateway.
//!
//! Deletion runs on a throwaway organization so the cached fixture graph
//! stays usable for later runs.

use tdei_harness::faker;
use tdei_harness::geo::BoundingBox;
use tdei_harness::organization::*;

use crate::common;

// ── create ─────────────────────────────────────────────────────────────

#[tokio::test]
#[ignore = "requires a TDEI gateway configured in test-harness.json"]
async fn create_without_token_is_401() {
    common::init_tracing();
    let err = create_organization(&common::anonymous(), &faker::organization())
        .await
        .unwrap_err();
    assert_eq!(common::status(&err), Some(401));
}

#[tokio::test]
#[ignore = "requires a TDEI gateway configured in test-harness.json"]
async fn create_returns_new_id() {
    common::init_tracing();
    let id = create_organization(&common::admin(), &faker::organization())
        .await
        .unwrap();
    assert!(!id.is_empty());
}

#[tokio::test]
#[ignore = "requires a TDEI gateway configured in test-harness.json"]
async fn create_with_duplicate_name_is_400() {
    let seed = common::seed().await;
    let mut org = faker::organization();
    org.org_name = seed.organization.org_name.clone();
    let err = create_organization(&common::admin(), &org)
        .await
        .unwrap_err();
    assert_eq!(common::status(&err), Some(400));
}

#[tokio::test]
#[ignore = "requires a TDEI gateway configured in test-harness.json"]
async fn create_with_missing_fields_is_400() {
    common::init_tracing();
    let admin = common::admin();

    let mut empty_name = faker::organization();
    empty_name.org_name = String::new();
    let mut empty_phone = faker::organization();
    empty_phone.phone = String::new();
    let mut empty_address = faker::organization();
    empty_address.address = String::new();
    let mut bad_polygon = faker::organization();
    bad_polygon.polygon = Some(faker::invalid_polygon());

    for (case, org) in [
        ("empty name", empty_name),
        ("empty phone", empty_phone),
        ("empty address", empty_address),
        ("invalid polygon", bad_polygon),
    ] {
        let err = create_organization(&admin, &org).await.unwrap_err();
        assert_eq!(common::status(&err), Some(400), "{case}");
    }
}

// ── update ─────────────────────────────────────────────────────────────

#[tokio::test]
#[ignore = "requires a TDEI gateway configured in test-harness.json"]
async fn update_without_token_is_401() {
    let seed = common::seed().await;
    let err = update_organization(&common::anonymous(), &seed.update_organization())
        .await
        .unwrap_err();
    assert_eq!(common::status(&err), Some(401));
}

#[tokio::test]
#[ignore = "requires a TDEI gateway configured in test-harness.json"]
async fn update_seeded_organization_succeeds() {
    let seed = common::seed().await;
    update_organization(&common::admin(), &seed.update_organization())
        .await
        .unwrap();
}

#[tokio::test]
#[ignore = "requires a TDEI gateway configured in test-harness.json"]
async fn update_with_missing_fields_is_400() {
    let seed = common::seed().await;
    let admin = common::admin();

    let mut empty_name = seed.update_organization();
    empty_name.org_name = String::new();
    let mut empty_phone = seed.update_organization();
    empty_phone.phone = String::new();
    let mut empty_address = seed.update_organization();
    empty_address.address = String::new();
    let mut bad_polygon = seed.update_organization();
    bad_polygon.polygon = Some(faker::invalid_polygon());

    for (case, org) in [
        ("empty name", empty_name),
        ("empty phone", empty_phone),
        ("empty address", empty_address),
        ("invalid polygon", bad_polygon),
    ] {
        let err = update_organization(&admin, &org).await.unwrap_err();
        assert_eq!(common::status(&err), Some(400), "{case}");
    }
}

// ── get ────────────────────────────────────────────────────────────────

#[tokio::test]
#[ignore = "requires a TDEI gateway configured in test-harness.json"]
async fn get_without_token_is_401() {
    common::init_tracing();
    let err = get_organizations(&common::anonymous(), &OrganizationQuery::default())
        .await
        .unwrap_err();
    assert_eq!(common::status(&err), Some(401));
}

#[tokio::test]
#[ignore = "requires a TDEI gateway configured in test-harness.json"]
async fn get_without_filters_returns_listing_rows() {
    common::init_tracing();
    let rows = get_organizations(&common::admin(), &OrganizationQuery::default())
        .await
        .unwrap();
    for row in rows {
        assert!(!row.tdei_org_id.is_empty());
        assert!(!row.name.is_empty());
        if let Some(polygon) = row.polygon {
            assert!(!polygon.features.is_empty());
        }
    }
}

#[tokio::test]
#[ignore = "requires a TDEI gateway configured in test-harness.json"]
async fn get_by_id_returns_seeded_organization() {
    let seed = common::seed().await;
    let rows = get_organizations(&common::admin(), &OrganizationQuery::by_id(seed.org_id()))
        .await
        .unwrap();
    assert!(rows.iter().all(|r| r.tdei_org_id == seed.org_id()));
}

#[tokio::test]
#[ignore = "requires a TDEI gateway configured in test-harness.json"]
async fn get_by_name_matches_filter() {
    let seed = common::seed().await;
    let query = OrganizationQuery {
        org_name: Some(seed.organization.org_name.clone()),
        ..Default::default()
    };
    let rows = get_organizations(&common::admin(), &query).await.unwrap();
    assert!(rows.iter().all(|r| r.name == seed.organization.org_name));
}

#[tokio::test]
#[ignore = "requires a TDEI gateway configured in test-harness.json"]
async fn get_by_bbox_returns_list() {
    common::init_tracing();
    let query = OrganizationQuery {
        bbox: Some(BoundingBox([121.0, 122.0, 124.0, 145.0])),
        ..Default::default()
    };
    get_organizations(&common::admin(), &query).await.unwrap();
}

// ── delete ─────────────────────────────────────────────────────────────

#[tokio::test]
#[ignore = "requires a TDEI gateway configured in test-harness.json"]
async fn delete_without_token_is_401() {
    let seed = common::seed().await;
    let err = delete_organization(&common::anonymous(), seed.org_id(), true)
        .await
        .unwrap_err();
    assert_eq!(common::status(&err), Some(401));
}

#[tokio::test]
#[ignore = "requires a TDEI gateway configured in test-harness.json"]
async fn delete_throwaway_organization_succeeds() {
    common::init_tracing();
    let admin = common::admin();
    let id = create_organization(&admin, &faker::organization())
        .await
        .unwrap();
    delete_organization(&admin, &id, true).await.unwrap();
}
