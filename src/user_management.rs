//! User registration and role management endpoints.
//!
//! | Function | API Path | Auth |
//! |----------|----------|------|
//! | [`register_user`] | POST `api/v1/register` | none |
//! | [`permission`] | POST `api/v1/permission` | admin or POC of the scope |
//! | [`revoke_permission`] | POST `api/v1/permission/revoke` | admin or POC of the scope |
//! | [`roles`] | GET `api/v1/roles` | admin |
//! | [`org_roles`] | GET `api/v1/org-roles/{user_id}` | any signed-in user |
//! | [`project_group_roles`] | GET `api/v1/project-group-roles/{user_id}` | any signed-in user |
//!
//! Role assignment is write-only: the API answers `{ "data": "Successful!" }`
//! and there is no per-assignment id. Managing one's own account is refused
//! with 400, an unknown `user_name` with 404.

use serde::{Deserialize, Serialize};

use crate::client::{ApiData, TdeiClient};

/// Role names understood by the TDEI gateway.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TdeiRole {
    TdeiAdmin,
    Poc,
    FlexDataGenerator,
    PathwaysDataGenerator,
    OswDataGenerator,
}

impl TdeiRole {
    /// Roles granted to the seeded producer user.
    pub const DATA_GENERATORS: [TdeiRole; 3] = [
        TdeiRole::FlexDataGenerator,
        TdeiRole::OswDataGenerator,
        TdeiRole::PathwaysDataGenerator,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TdeiRole::TdeiAdmin => "tdei_admin",
            TdeiRole::Poc => "poc",
            TdeiRole::FlexDataGenerator => "flex_data_generator",
            TdeiRole::PathwaysDataGenerator => "pathways_data_generator",
            TdeiRole::OswDataGenerator => "osw_data_generator",
        }
    }
}

impl std::fmt::Display for TdeiRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Registration payload. Every field is optional so validation suites can
/// send deliberately incomplete bodies; `None` fields are omitted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Register {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

/// Registered user as returned by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub email: String,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
}

/// Role assignment command, scoped to an organization or a project group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleDetails {
    pub roles: Vec<TdeiRole>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tdei_org_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tdei_project_group_id: Option<String>,
    pub user_name: String,
}

impl RoleDetails {
    pub fn for_org(roles: &[TdeiRole], tdei_org_id: &str, user_name: &str) -> Self {
        RoleDetails {
            roles: roles.to_vec(),
            tdei_org_id: Some(tdei_org_id.to_string()),
            tdei_project_group_id: None,
            user_name: user_name.to_string(),
        }
    }

    pub fn for_project_group(roles: &[TdeiRole], tdei_project_group_id: &str, user_name: &str) -> Self {
        RoleDetails {
            roles: roles.to_vec(),
            tdei_org_id: None,
            tdei_project_group_id: Some(tdei_project_group_id.to_string()),
            user_name: user_name.to_string(),
        }
    }
}

/// System role description from [`roles`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    pub name: String,
    #[serde(default)]
    pub description: String,
}

/// Roles a user holds in one organization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrgRoles {
    pub tdei_org_id: String,
    #[serde(default)]
    pub org_name: String,
    #[serde(default)]
    pub roles: Vec<String>,
}

/// Roles a user holds in one project group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectGroupRoles {
    pub tdei_project_group_id: String,
    #[serde(default)]
    pub project_group_name: String,
    #[serde(default)]
    pub roles: Vec<String>,
}

/// Registers a user. Works on anonymous clients.
///
/// # Errors
///
/// 400 on missing or malformed email, or a password that fails the policy.
pub async fn register_user(client: &TdeiClient, register: &Register) -> crate::error::Result<User> {
    let created: ApiData<User> = client.post("api/v1/register", register).await?;
    Ok(created.data)
}

/// Grants `details.roles` to `details.user_name` in the given scope.
/// Returns the server's confirmation string (`"Successful!"`).
pub async fn permission(client: &TdeiClient, details: &RoleDetails) -> crate::error::Result<String> {
    let resp: ApiData<String> = client.post("api/v1/permission", details).await?;
    Ok(resp.data)
}

/// Revokes `details.roles` from `details.user_name` in the given scope.
pub async fn revoke_permission(
    client: &TdeiClient,
    details: &RoleDetails,
) -> crate::error::Result<String> {
    let resp: ApiData<String> = client.post("api/v1/permission/revoke", details).await?;
    Ok(resp.data)
}

/// Lists the system roles.
pub async fn roles(client: &TdeiClient) -> crate::error::Result<Vec<Role>> {
    let resp: ApiData<Vec<Role>> = client.get("api/v1/roles").await?;
    Ok(resp.data)
}

/// Lists the organizations a user belongs to, with the roles held in each.
pub async fn org_roles(client: &TdeiClient, user_id: &str) -> crate::error::Result<Vec<OrgRoles>> {
    let path = format!("api/v1/org-roles/{}", urlencoding::encode(user_id));
    client.get(&path).await
}

/// Lists the project groups a user belongs to, with the roles held in each.
pub async fn project_group_roles(
    client: &TdeiClient,
    user_id: &str,
) -> crate::error::Result<Vec<ProjectGroupRoles>> {
    let path = format!("api/v1/project-group-roles/{}", urlencoding::encode(user_id));
    client.get(&path).await
}
