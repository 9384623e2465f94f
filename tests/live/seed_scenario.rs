//! End-to-end seeding against the live gateway.

use std::sync::Arc;

use tdei_harness::organization::{OrganizationQuery, get_organizations};
use tdei_harness::seed::{MemorySeedStore, SeedManager, SeedOptions};

use crate::common;

/// Provisions a fresh graph with its own manager (independent of the shared
/// cache) and checks the organization is visible through the listing.
#[tokio::test]
#[ignore = "requires a TDEI gateway configured in test-harness.json"]
async fn fresh_seed_creates_a_queryable_graph() {
    common::init_tracing();
    let store = Arc::new(MemorySeedStore::new());
    let manager = SeedManager::new(common::config(), store.clone()).with_options(SeedOptions {
        with_poc_user: true,
        with_project_group: true,
    });

    let seed = manager.generate(true).await.unwrap();

    assert!(!seed.org_id().is_empty());
    assert!(seed.service.tdei_service_id.as_deref().is_some_and(|id| !id.is_empty()));
    assert!(seed.station.tdei_station_id.as_deref().is_some_and(|id| !id.is_empty()));
    assert!(!seed.producer_user.email.is_empty());
    assert!(seed.poc_user.is_some());
    assert_eq!(store.save_count(), 1);

    let rows = get_organizations(&common::admin(), &OrganizationQuery::by_id(seed.org_id()))
        .await
        .unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].name, seed.organization.org_name);
}

#[tokio::test]
#[ignore = "requires a TDEI gateway configured in test-harness.json"]
async fn shared_seed_is_stable_within_a_run() {
    let first = common::seed().await;
    let second = common::seed().await;
    assert!(Arc::ptr_eq(&first, &second));
}
