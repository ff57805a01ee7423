use eleads_domain::RolePermissionMap;
use serde::Serialize;
use ts_rs::TS;

/// Default permissions of one role.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/role-permissions-entry.ts"
)]
pub struct RolePermissionsEntry {
    pub role: String,
    pub permissions: Vec<String>,
}

/// The active role permission map.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/role-permissions-response.ts"
)]
pub struct RolePermissionsResponse {
    pub roles: Vec<RolePermissionsEntry>,
}

impl From<&RolePermissionMap> for RolePermissionsResponse {
    fn from(map: &RolePermissionMap) -> Self {
        Self {
            roles: map
                .entries()
                .map(|(role, permissions)| RolePermissionsEntry {
                    role: role.as_str().to_owned(),
                    permissions: permissions
                        .iter()
                        .map(|permission| permission.as_str().to_owned())
                        .collect(),
                })
                .collect(),
        }
    }
}
