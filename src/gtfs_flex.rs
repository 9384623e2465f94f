//! GTFS-Flex service endpoints.
//!
//! Services belong to an owning scope (`tdei_org_id`). Creating one requires
//! the caller to hold the flex data generator role (or admin) in that scope;
//! otherwise the API answers 403.
//!
//! | Function | API Path |
//! |----------|----------|
//! | [`create_service`] | POST `api/v1/service` |
//! | [`update_service`] | PUT `api/v1/service/{owner_id}` |
//! | [`get_services`] | GET `api/v1/service` |
//! | [`delete_service`] | DELETE `api/v1/service/{owner_id}/{service_id}` |
//! | [`set_service_status`] | PUT `api/v1/service/{owner_id}/{service_id}/active/{status}` |

use serde::{Deserialize, Serialize};

use crate::client::{ApiData, QueryPairs, TdeiClient};
use crate::geo::{BoundingBox, Polygon};

/// A GTFS-Flex service. Used for create payloads and listing rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Service {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tdei_service_id: Option<String>,
    pub tdei_org_id: String,
    pub service_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub polygon: Option<Polygon>,
}

/// Fields accepted by the update call. The owner id travels in the path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceUpdate {
    pub tdei_service_id: String,
    pub service_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub polygon: Option<Polygon>,
}

#[derive(Debug, Clone, Default)]
pub struct ServiceQuery {
    pub tdei_service_id: Option<String>,
    pub service_name: Option<String>,
    pub tdei_org_id: Option<String>,
    pub bbox: Option<BoundingBox>,
    pub page_no: Option<u32>,
    pub page_size: Option<u32>,
}

impl ServiceQuery {
    pub fn to_query(&self) -> QueryPairs {
        let mut pairs = QueryPairs::new();
        if let Some(id) = &self.tdei_service_id {
            pairs.push(("tdei_service_id", id.clone()));
        }
        if let Some(name) = &self.service_name {
            pairs.push(("service_name", name.clone()));
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

/// Creates a service and returns its id.
///
/// # Errors
///
/// - 400 — empty `service_name` or `tdei_org_id`, duplicate name, invalid polygon.
/// - 401 — anonymous client.
/// - 403 — caller lacks the flex data generator role for the scope.
pub async fn create_service(client: &TdeiClient, service: &Service) -> crate::error::Result<String> {
    let created: ApiData<String> = client.post("api/v1/service", service).await?;
    Ok(created.data)
}

/// Updates a service owned by `owner_id`. An empty or unknown owner id
/// yields 404.
pub async fn update_service(
    client: &TdeiClient,
    update: &ServiceUpdate,
    owner_id: &str,
) -> crate::error::Result<()> {
    let path = format!("api/v1/service/{}", urlencoding::encode(owner_id));
    client.put_unit(&path, update).await
}

pub async fn get_services(
    client: &TdeiClient,
    query: &ServiceQuery,
) -> crate::error::Result<Vec<Service>> {
    client.get_with_query("api/v1/service", &query.to_query()).await
}

pub async fn delete_service(
    client: &TdeiClient,
    owner_id: &str,
    service_id: &str,
    hard_delete: bool,
) -> crate::error::Result<()> {
    let path = format!(
        "api/v1/service/{}/{}",
        urlencoding::encode(owner_id),
        urlencoding::encode(service_id)
    );
    client
        .delete(&path, &[("hard_delete", hard_delete.to_string())])
        .await
}

/// Activates or deactivates a service without deleting it.
pub async fn set_service_status(
    client: &TdeiClient,
    owner_id: &str,
    service_id: &str,
    active: bool,
) -> crate::error::Result<()> {
    let path = format!(
        "api/v1/service/{}/{}/active/{active}",
        urlencoding::encode(owner_id),
        urlencoding::encode(service_id)
    );
    client.put_empty(&path).await
}
