use eleads_application::{RegisteredAccount, RegistrationRequest, UserRecord};
use eleads_core::{AppError, AppResult};
use eleads_domain::{Permission, Role, Workspace, WorkspaceChoice, WorkspaceMode};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Incoming payload for account registration.
#[derive(Debug, Default, Deserialize, TS)]
#[serde(default)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/register-request.ts"
)]
pub struct RegisterRequest {
    pub user: RegisterUserRequest,
    pub workspace: RegisterWorkspaceRequest,
}

/// Registrant details inside a registration payload.
#[derive(Debug, Default, Deserialize, TS)]
#[serde(default)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/register-user-request.ts"
)]
pub struct RegisterUserRequest {
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
}

/// Workspace choice inside a registration payload: a name to create or an
/// id to join.
#[derive(Debug, Default, Deserialize, TS)]
#[serde(default)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/register-workspace-request.ts"
)]
pub struct RegisterWorkspaceRequest {
    /// `"new"` or `"existing"`; inferred when absent.
    pub mode: Option<String>,
    pub name: Option<String>,
    pub id: Option<String>,
}

impl TryFrom<RegisterRequest> for RegistrationRequest {
    type Error = AppError;

    fn try_from(value: RegisterRequest) -> AppResult<Self> {
        let mode = value
            .workspace
            .mode
            .as_deref()
            .map(str::trim)
            .filter(|mode| !mode.is_empty())
            .map(parse_workspace_mode)
            .transpose()?;

        Ok(Self {
            email: value.user.email,
            password: value.user.password,
            first_name: value.user.first_name,
            last_name: value.user.last_name,
            workspace: WorkspaceChoice {
                mode,
                name: value.workspace.name,
                id: value.workspace.id,
            },
        })
    }
}

fn parse_workspace_mode(value: &str) -> AppResult<WorkspaceMode> {
    match value.to_ascii_lowercase().as_str() {
        "new" => Ok(WorkspaceMode::New),
        "existing" => Ok(WorkspaceMode::Existing),
        _ => Err(AppError::Validation(format!(
            "workspace mode must be 'new' or 'existing', got '{value}'"
        ))),
    }
}

/// Incoming payload for password login.
#[derive(Debug, Default, Deserialize, TS)]
#[serde(default)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/login-request.ts"
)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Incoming payload replacing a member's access.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/update-user-access-request.ts"
)]
pub struct UpdateUserAccessRequest {
    pub role: String,
    #[serde(default)]
    pub permissions: Vec<String>,
}

impl UpdateUserAccessRequest {
    pub fn parse(&self) -> AppResult<(Role, Vec<Permission>)> {
        let role = self.role.trim().parse::<Role>()?;
        let permissions = self
            .permissions
            .iter()
            .map(|value| Permission::from_transport(value.trim()))
            .collect::<AppResult<Vec<_>>>()?;

        Ok((role, permissions))
    }
}

/// API representation of a workspace member.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/user-response.ts"
)]
pub struct UserResponse {
    pub id: String,
    pub workspace_id: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub role: String,
    pub permissions: Vec<String>,
    pub created_at: String,
}

impl From<UserRecord> for UserResponse {
    fn from(user: UserRecord) -> Self {
        Self {
            id: user.id.to_string(),
            workspace_id: user.workspace_id.to_string(),
            email: user.email,
            first_name: user.first_name,
            last_name: user.last_name,
            role: user.role.as_str().to_owned(),
            permissions: user
                .permissions
                .iter()
                .map(|permission| permission.as_str().to_owned())
                .collect(),
            created_at: user.created_at.to_rfc3339(),
        }
    }
}

/// API representation of a workspace.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/workspace-response.ts"
)]
pub struct WorkspaceResponse {
    pub id: String,
    pub name: String,
    pub created_at: String,
}

impl From<Workspace> for WorkspaceResponse {
    fn from(workspace: Workspace) -> Self {
        Self {
            id: workspace.id().to_string(),
            name: workspace.name().as_str().to_owned(),
            created_at: workspace.created_at().to_rfc3339(),
        }
    }
}

/// Payload returned after a successful registration.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/register-response.ts"
)]
pub struct RegisterResponse {
    pub user: UserResponse,
    pub workspace: WorkspaceResponse,
}

impl From<RegisteredAccount> for RegisterResponse {
    fn from(account: RegisteredAccount) -> Self {
        Self {
            user: account.user.into(),
            workspace: account.workspace.into(),
        }
    }
}

/// Payload returned after a successful login.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/login-response.ts"
)]
pub struct LoginResponse {
    pub token: String,
    pub token_type: &'static str,
    pub expires_at: String,
    pub user: UserResponse,
}

/// The authenticated member with their resolved permissions.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/current-user-response.ts"
)]
pub struct CurrentUserResponse {
    pub user: UserResponse,
    pub effective_permissions: Vec<String>,
}
