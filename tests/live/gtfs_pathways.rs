//! GTFS-Pathways station endpoints against the live gateway (admin caller).

use tdei_harness::faker;
use tdei_harness::geo::BoundingBox;
use tdei_harness::gtfs_pathways::*;

use crate::common;

#[tokio::test]
#[ignore = "requires a TDEI gateway configured in test-harness.json"]
async fn create_without_token_is_401() {
    let seed = common::seed().await;
    let err = create_station(&common::anonymous(), &faker::station(seed.org_id()))
        .await
        .unwrap_err();
    assert_eq!(common::status(&err), Some(401));
}

#[tokio::test]
#[ignore = "requires a TDEI gateway configured in test-harness.json"]
async fn create_returns_new_id() {
    let seed = common::seed().await;
    let id = create_station(&common::admin(), &faker::station(seed.org_id()))
        .await
        .unwrap();
    assert!(!id.is_empty());
}

#[tokio::test]
#[ignore = "requires a TDEI gateway configured in test-harness.json"]
async fn create_with_invalid_payload_is_400() {
    let seed = common::seed().await;
    let admin = common::admin();

    let mut duplicate = faker::station(seed.org_id());
    duplicate.station_name = seed.station.station_name.clone();
    let mut empty_name = faker::station(seed.org_id());
    empty_name.station_name = String::new();
    let empty_owner = faker::station("");
    let mut bad_polygon = faker::station(seed.org_id());
    bad_polygon.polygon = Some(faker::invalid_polygon());

    for (case, station) in [
        ("duplicate station_name", duplicate),
        ("empty station_name", empty_name),
        ("empty tdei_org_id", empty_owner),
        ("invalid polygon", bad_polygon),
    ] {
        let err = create_station(&admin, &station).await.unwrap_err();
        assert_eq!(common::status(&err), Some(400), "{case}");
    }
}

#[tokio::test]
#[ignore = "requires a TDEI gateway configured in test-harness.json"]
async fn update_without_token_is_401() {
    let seed = common::seed().await;
    let err = update_station(&common::anonymous(), &seed.update_station(), seed.org_id())
        .await
        .unwrap_err();
    assert_eq!(common::status(&err), Some(401));
}

#[tokio::test]
#[ignore = "requires a TDEI gateway configured in test-harness.json"]
async fn update_seeded_station_succeeds() {
    let seed = common::seed().await;
    update_station(&common::admin(), &seed.update_station(), seed.org_id())
        .await
        .unwrap();
}

#[tokio::test]
#[ignore = "requires a TDEI gateway configured in test-harness.json"]
async fn update_with_invalid_payload_fails() {
    let seed = common::seed().await;
    let admin = common::admin();

    let mut empty_name = seed.update_station();
    empty_name.station_name = String::new();
    let err = update_station(&admin, &empty_name, seed.org_id())
        .await
        .unwrap_err();
    assert_eq!(common::status(&err), Some(400), "empty station_name");

    let err = update_station(&admin, &seed.update_station(), "")
        .await
        .unwrap_err();
    assert_eq!(common::status(&err), Some(404), "empty owner id");

    let mut empty_id = seed.update_station();
    empty_id.tdei_station_id = String::new();
    let err = update_station(&admin, &empty_id, seed.org_id())
        .await
        .unwrap_err();
    assert_eq!(common::status(&err), Some(400), "empty tdei_station_id");

    let mut bad_polygon = seed.update_station();
    bad_polygon.polygon = Some(faker::invalid_polygon());
    let err = update_station(&admin, &bad_polygon, seed.org_id())
        .await
        .unwrap_err();
    assert_eq!(common::status(&err), Some(400), "invalid polygon");
}

#[tokio::test]
#[ignore = "requires a TDEI gateway configured in test-harness.json"]
async fn get_without_token_is_401() {
    common::init_tracing();
    let err = get_stations(&common::anonymous(), &StationQuery::default())
        .await
        .unwrap_err();
    assert_eq!(common::status(&err), Some(401));
}

#[tokio::test]
#[ignore = "requires a TDEI gateway configured in test-harness.json"]
async fn get_filters_match_seeded_station() {
    let seed = common::seed().await;
    let admin = common::admin();

    let by_owner = StationQuery {
        tdei_org_id: Some(seed.org_id().to_string()),
        ..Default::default()
    };
    let rows = get_stations(&admin, &by_owner).await.unwrap();
    assert!(rows.iter().all(|s| s.tdei_org_id == seed.org_id()));

    let by_name = StationQuery {
        station_name: Some(seed.station.station_name.clone()),
        ..Default::default()
    };
    let rows = get_stations(&admin, &by_name).await.unwrap();
    assert!(rows.iter().all(|s| s.station_name == seed.station.station_name));

    let by_id = StationQuery {
        tdei_station_id: seed.station.tdei_station_id.clone(),
        ..Default::default()
    };
    let rows = get_stations(&admin, &by_id).await.unwrap();
    assert!(rows.iter().all(|s| s.tdei_station_id == seed.station.tdei_station_id));

    let by_bbox = StationQuery {
        bbox: Some(BoundingBox([121.0, 154.0, 134.0, 198.0])),
        ..Default::default()
    };
    get_stations(&admin, &by_bbox).await.unwrap();
}

#[tokio::test]
#[ignore = "requires a TDEI gateway configured in test-harness.json"]
async fn delete_without_token_is_401() {
    let seed = common::seed().await;
    let err = delete_station(
        &common::anonymous(),
        seed.org_id(),
        seed.station.tdei_station_id.as_deref().unwrap_or_default(),
        true,
    )
    .await
    .unwrap_err();
    assert_eq!(common::status(&err), Some(401));
}

#[tokio::test]
#[ignore = "requires a TDEI gateway configured in test-harness.json"]
async fn deactivate_and_delete_throwaway_station() {
    let seed = common::seed().await;
    let admin = common::admin();
    let id = create_station(&admin, &faker::station(seed.org_id()))
        .await
        .unwrap();
    set_station_status(&admin, seed.org_id(), &id, false)
        .await
        .unwrap();
    delete_station(&admin, seed.org_id(), &id, true).await.unwrap();
}
