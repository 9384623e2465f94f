//! Organization endpoints.
//!
//! - [`create_organization`] — POST `api/v1/organization`, returns the new id.
//! - [`update_organization`] — PUT `api/v1/organization`.
//! - [`get_organizations`] — GET `api/v1/organization` with optional filters.
//! - [`delete_organization`] — DELETE `api/v1/organization/{id}`.
//!
//! The server enforces a unique, non-empty `org_name`, non-empty `phone` and
//! `address`, and a valid polygon; violations come back as 400.

use serde::{Deserialize, Serialize};

use crate::client::{ApiData, QueryPairs, TdeiClient};
use crate::geo::{BoundingBox, Polygon};

/// Organization payload used for create and update.
///
/// `tdei_org_id` is assigned by the server; it is omitted on create and
/// required on update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Organization {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tdei_org_id: Option<String>,
    pub org_name: String,
    pub phone: String,
    pub url: String,
    pub address: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub polygon: Option<Polygon>,
}

/// Point-of-contact user attached to an organization or project group.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Poc {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
}

/// Row returned by the organization listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrganizationList {
    pub tdei_org_id: String,
    pub name: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub polygon: Option<Polygon>,
    #[serde(default)]
    pub poc: Vec<Poc>,
}

/// Filters for [`get_organizations`]. All are optional.
#[derive(Debug, Clone, Default)]
pub struct OrganizationQuery {
    pub tdei_org_id: Option<String>,
    pub org_name: Option<String>,
    pub bbox: Option<BoundingBox>,
    pub page_no: Option<u32>,
    pub page_size: Option<u32>,
}

impl OrganizationQuery {
    /// Exact-id filter.
    pub fn by_id(id: &str) -> Self {
        OrganizationQuery {
            tdei_org_id: Some(id.to_string()),
            ..Default::default()
        }
    }

    pub fn to_query(&self) -> QueryPairs {
        let mut pairs = QueryPairs::new();
        if let Some(id) = &self.tdei_org_id {
            pairs.push(("tdei_org_id", id.clone()));
        }
        if let Some(name) = &self.org_name {
            pairs.push(("org_name", name.clone()));
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

/// Creates an organization and returns its server-assigned id.
///
/// # Errors
///
/// - `HarnessError::Api` 400 — empty name/phone/address, duplicate name,
///   invalid polygon.
/// - `HarnessError::Api` 401 — anonymous client.
pub async fn create_organization(
    client: &TdeiClient,
    organization: &Organization,
) -> crate::error::Result<String> {
    let created: ApiData<String> = client.post("api/v1/organization", organization).await?;
    Ok(created.data)
}

/// Updates an existing organization identified by `tdei_org_id`.
pub async fn update_organization(
    client: &TdeiClient,
    organization: &Organization,
) -> crate::error::Result<()> {
    client.put_unit("api/v1/organization", organization).await
}

/// Lists organizations matching `query`.
pub async fn get_organizations(
    client: &TdeiClient,
    query: &OrganizationQuery,
) -> crate::error::Result<Vec<OrganizationList>> {
    client
        .get_with_query("api/v1/organization", &query.to_query())
        .await
}

/// Deletes (deactivates, or removes when `hard_delete`) an organization.
pub async fn delete_organization(
    client: &TdeiClient,
    tdei_org_id: &str,
    hard_delete: bool,
) -> crate::error::Result<()> {
    let path = format!("api/v1/organization/{}", urlencoding::encode(tdei_org_id));
    client
        .delete(&path, &[("hard_delete", hard_delete.to_string())])
        .await
}
