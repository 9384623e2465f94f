//! Project group endpoints.
//!
//! Project groups are the newer name for organizations in TDEI; the API
//! mirrors the organization family under `api/v1/project-group`, with
//! `project_group_name` in payloads and `name` as the listing filter.

use serde::{Deserialize, Serialize};

use crate::client::{ApiData, QueryPairs, TdeiClient};
use crate::geo::{BoundingBox, Polygon};
use crate::organization::Poc;

/// Project group payload used for create and update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectGroup {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tdei_project_group_id: Option<String>,
    pub project_group_name: String,
    pub phone: String,
    pub url: String,
    pub address: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub polygon: Option<Polygon>,
}

/// Row returned by the project group listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectGroupList {
    pub tdei_project_group_id: String,
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

#[derive(Debug, Clone, Default)]
pub struct ProjectGroupQuery {
    pub tdei_project_group_id: Option<String>,
    pub name: Option<String>,
    pub bbox: Option<BoundingBox>,
    pub page_no: Option<u32>,
    pub page_size: Option<u32>,
}

impl ProjectGroupQuery {
    pub fn by_id(id: &str) -> Self {
        ProjectGroupQuery {
            tdei_project_group_id: Some(id.to_string()),
            ..Default::default()
        }
    }

    pub fn to_query(&self) -> QueryPairs {
        let mut pairs = QueryPairs::new();
        if let Some(id) = &self.tdei_project_group_id {
            pairs.push(("tdei_project_group_id", id.clone()));
        }
        if let Some(name) = &self.name {
            pairs.push(("name", name.clone()));
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

/// Creates a project group and returns its id.
pub async fn create_project_group(
    client: &TdeiClient,
    project_group: &ProjectGroup,
) -> crate::error::Result<String> {
    let created: ApiData<String> = client.post("api/v1/project-group", project_group).await?;
    Ok(created.data)
}

pub async fn update_project_group(
    client: &TdeiClient,
    project_group: &ProjectGroup,
) -> crate::error::Result<()> {
    client.put_unit("api/v1/project-group", project_group).await
}

pub async fn get_project_groups(
    client: &TdeiClient,
    query: &ProjectGroupQuery,
) -> crate::error::Result<Vec<ProjectGroupList>> {
    client
        .get_with_query("api/v1/project-group", &query.to_query())
        .await
}

pub async fn delete_project_group(
    client: &TdeiClient,
    tdei_project_group_id: &str,
    hard_delete: bool,
) -> crate::error::Result<()> {
    let path = format!(
        "api/v1/project-group/{}",
        urlencoding::encode(tdei_project_group_id)
    );
    client
        .delete(&path, &[("hard_delete", hard_delete.to_string())])
        .await
}
