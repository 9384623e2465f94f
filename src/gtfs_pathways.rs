//! GTFS-Pathways station endpoints.
//!
//! Same shape as the service family, under `api/v1/station`. Creating a
//! station requires the pathways data generator role in the owning scope.

use serde::{Deserialize, Serialize};

use crate::client::{ApiData, QueryPairs, TdeiClient};
use crate::geo::{BoundingBox, Polygon};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Station {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tdei_station_id: Option<String>,
    pub tdei_org_id: String,
    pub station_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub polygon: Option<Polygon>,
}

/// Fields accepted by the update call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StationUpdate {
    pub tdei_station_id: String,
    pub station_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub polygon: Option<Polygon>,
}

#[derive(Debug, Clone, Default)]
pub struct StationQuery {
    pub tdei_station_id: Option<String>,
    pub station_name: Option<String>,
    pub tdei_org_id: Option<String>,
    pub bbox: Option<BoundingBox>,
    pub page_no: Option<u32>,
    pub page_size: Option<u32>,
}

impl StationQuery {
    pub fn to_query(&self) -> QueryPairs {
        let mut pairs = QueryPairs::new();
        if let Some(id) = &self.tdei_station_id {
            pairs.push(("tdei_station_id", id.clone()));
        }
        if let Some(name) = &self.station_name {
            pairs.push(("station_name", name.clone()));
        }
        if let Some(owner) = &self.tdei_org_id {
            pairs.push(("tdei_org_id", owner.clone()));
        }
        if let Some(bbox) = &self.bbox {
            pairs.extend(bbox.to_query());
        }
        if let Some(page_no) = self.page_no {
            pairs.push(("page_no", page_no.to_string()));
        }
        if let Some(page_size) = self.page_size {
            pairs.push(("page_size", page_size.to_string()));
        }
        pairs
    }
}

/// Creates a station and returns its id.
///
/// # Errors
///
/// - 400 — empty `station_name` or `tdei_org_id`, duplicate name, invalid polygon.
/// - 401 — anonymous client.
/// - 403 — caller lacks the pathways data generator role for the scope.
pub async fn create_station(client: &TdeiClient, station: &Station) -> crate::error::Result<String> {
    let created: ApiData<String> = client.post("api/v1/station", station).await?;
    Ok(created.data)
}

pub async fn update_station(
    client: &TdeiClient,
    update: &StationUpdate,
    owner_id: &str,
) -> crate::error::Result<()> {
    let path = format!("api/v1/station/{}", urlencoding::encode(owner_id));
    client.put_unit(&path, update).await
}

pub async fn get_stations(
    client: &TdeiClient,
    query: &StationQuery,
) -> crate::error::Result<Vec<Station>> {
    client.get_with_query("api/v1/station", &query.to_query()).await
}

pub async fn delete_station(
    client: &TdeiClient,
    owner_id: &str,
    station_id: &str,
    hard_delete: bool,
) -> crate::error::Result<()> {
    let path = format!(
        "api/v1/station/{}/{}",
        urlencoding::encode(owner_id),
        urlencoding::encode(station_id)
    );
    client
        .delete(&path, &[("hard_delete", hard_delete.to_string())])
        .await
}

pub async fn set_station_status(
    client: &TdeiClient,
    owner_id: &str,
    station_id: &str,
    active: bool,
) -> crate::error::Result<()> {
    let path = format!(
        "api/v1/station/{}/{}/active/{active}",
        urlencoding::encode(owner_id),
        urlencoding::encode(station_id)
    );
    client.put_empty(&path).await
}
