//! Authorization decision rules.
//!
//! Every check in the system funnels through [`is_action_allowed`]: route
//! middleware, application services and the UI (which receives the same
//! [`Role`]/[`Permission`] types as generated TypeScript and the active
//! [`RolePermissionMap`] from the API).

use std::collections::{BTreeMap, BTreeSet};
use std::str::FromStr;

use eleads_core::{AppError, AppResult, WorkspaceId};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::UserId;

/// Coarse-grained classification of a workspace member.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, TS,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[ts(export, export_to = "../../../packages/api-types/src/generated/role.ts")]
pub enum Role {
    /// Workspace administrator. Bypasses every role check.
    Admin,
    /// Team manager.
    Manager,
    /// Regular member.
    User,
}

impl Role {
    /// Returns a stable storage value for this role.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "ADMIN",
            Self::Manager => "MANAGER",
            Self::User => "USER",
        }
    }

    /// Returns all known roles.
    #[must_use]
    pub fn all() -> &'static [Self] {
        const ALL: &[Role] = &[Role::Admin, Role::Manager, Role::User];

        ALL
    }
}

impl FromStr for Role {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "ADMIN" => Ok(Self::Admin),
            "MANAGER" => Ok(Self::Manager),
            "USER" => Ok(Self::User),
            _ => Err(AppError::Validation(format!("unknown role value '{value}'"))),
        }
    }
}

/// Fine-grained capabilities enforced by authorization checks.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, TS,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[ts(export, export_to = "../../../packages/api-types/src/generated/permission.ts")]
pub enum Permission {
    /// Allows creating leads and clients owned by the caller.
    ManageOwnLeads,
    /// Allows editing any lead or client in the workspace.
    EditWorkspaceLeads,
    /// Allows deleting any lead or client in the workspace.
    DeleteWorkspaceLeads,
    /// Allows reassigning leads to other members.
    AssignLeads,
    /// Allows listing members and changing their access.
    ManageUsers,
    /// Allows reading invoices.
    ViewBilling,
    /// Allows creating invoices.
    CreateBilling,
    /// Allows editing invoices.
    EditBilling,
    /// Allows deleting invoices.
    DeleteBilling,
    /// Allows moving invoices through their status lifecycle.
    ManageBilling,
}

impl Permission {
    /// Returns a stable storage value for this permission.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ManageOwnLeads => "MANAGE_OWN_LEADS",
            Self::EditWorkspaceLeads => "EDIT_WORKSPACE_LEADS",
            Self::DeleteWorkspaceLeads => "DELETE_WORKSPACE_LEADS",
            Self::AssignLeads => "ASSIGN_LEADS",
            Self::ManageUsers => "MANAGE_USERS",
            Self::ViewBilling => "VIEW_BILLING",
            Self::CreateBilling => "CREATE_BILLING",
            Self::EditBilling => "EDIT_BILLING",
            Self::DeleteBilling => "DELETE_BILLING",
            Self::ManageBilling => "MANAGE_BILLING",
        }
    }

    /// Returns all known permissions.
    #[must_use]
    pub fn all() -> &'static [Self] {
        const ALL: &[Permission] = &[
            Permission::ManageOwnLeads,
            Permission::EditWorkspaceLeads,
            Permission::DeleteWorkspaceLeads,
            Permission::AssignLeads,
            Permission::ManageUsers,
            Permission::ViewBilling,
            Permission::CreateBilling,
            Permission::EditBilling,
            Permission::DeleteBilling,
            Permission::ManageBilling,
        ];

        ALL
    }

    /// Parses a transport value into a permission.
    pub fn from_transport(value: &str) -> Result<Self, AppError> {
        Self::from_str(value)
    }
}

impl FromStr for Permission {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::all()
            .iter()
            .copied()
            .find(|permission| permission.as_str() == value)
            .ok_or_else(|| AppError::Validation(format!("unknown permission value '{value}'")))
    }
}

static NO_PERMISSIONS: BTreeSet<Permission> = BTreeSet::new();

/// Default permission set granted to each role.
///
/// Built once at startup and shared read-only; ADMIN's set must cover every
/// other role's set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct RolePermissionMap {
    grants: BTreeMap<Role, BTreeSet<Permission>>,
}

impl RolePermissionMap {
    /// Creates a validated map. Roles missing from `grants` get no defaults.
    pub fn new(grants: BTreeMap<Role, BTreeSet<Permission>>) -> AppResult<Self> {
        let mut grants = grants;
        for role in Role::all() {
            grants.entry(*role).or_default();
        }

        let admin = grants.get(&Role::Admin).unwrap_or(&NO_PERMISSIONS);
        for (role, permissions) in &grants {
            if let Some(missing) = permissions
                .iter()
                .find(|permission| !admin.contains(permission))
            {
                return Err(AppError::Validation(format!(
                    "role '{}' grants '{}' which ADMIN does not hold",
                    role.as_str(),
                    missing.as_str()
                )));
            }
        }

        Ok(Self { grants })
    }

    /// Parses a JSON object of role names to permission lists.
    pub fn from_json(value: &str) -> AppResult<Self> {
        let grants =
            serde_json::from_str::<BTreeMap<Role, BTreeSet<Permission>>>(value).map_err(
                |error| AppError::Validation(format!("invalid role permission map: {error}")),
            )?;

        Self::new(grants)
    }

    /// Returns the default permissions of a role.
    #[must_use]
    pub fn permissions_for(&self, role: Role) -> &BTreeSet<Permission> {
        self.grants.get(&role).unwrap_or(&NO_PERMISSIONS)
    }

    /// Iterates roles with their default permissions in role order.
    pub fn entries(&self) -> impl Iterator<Item = (Role, &BTreeSet<Permission>)> {
        self.grants
            .iter()
            .map(|(role, permissions)| (*role, permissions))
    }
}

impl Default for RolePermissionMap {
    fn default() -> Self {
        let grants = BTreeMap::from([
            (Role::Admin, Permission::all().iter().copied().collect()),
            (
                Role::Manager,
                BTreeSet::from([
                    Permission::ManageOwnLeads,
                    Permission::EditWorkspaceLeads,
                    Permission::AssignLeads,
                    Permission::ViewBilling,
                    Permission::CreateBilling,
                    Permission::EditBilling,
                ]),
            ),
            (
                Role::User,
                BTreeSet::from([Permission::ManageOwnLeads, Permission::ViewBilling]),
            ),
        ]);

        Self { grants }
    }
}

/// The authenticated actor evaluated by authorization checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    id: UserId,
    workspace_id: WorkspaceId,
    role: Role,
    explicit_permissions: BTreeSet<Permission>,
}

impl Principal {
    /// Creates a principal from verified token claims.
    #[must_use]
    pub fn new(
        id: UserId,
        workspace_id: WorkspaceId,
        role: Role,
        explicit_permissions: impl IntoIterator<Item = Permission>,
    ) -> Self {
        Self {
            id,
            workspace_id,
            role,
            explicit_permissions: explicit_permissions.into_iter().collect(),
        }
    }

    /// Returns the user id behind this principal.
    #[must_use]
    pub fn id(&self) -> UserId {
        self.id
    }

    /// Returns the workspace the principal acts in.
    #[must_use]
    pub fn workspace_id(&self) -> WorkspaceId {
        self.workspace_id
    }

    /// Returns the principal role.
    #[must_use]
    pub fn role(&self) -> Role {
        self.role
    }

    /// Returns permissions granted on top of the role defaults.
    #[must_use]
    pub fn explicit_permissions(&self) -> &BTreeSet<Permission> {
        &self.explicit_permissions
    }
}

/// Permission and role constraints attached to one action.
///
/// An empty set means the constraint is not specified.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AccessRequirement {
    permissions: BTreeSet<Permission>,
    roles: BTreeSet<Role>,
}

impl AccessRequirement {
    /// Requirement that every principal satisfies.
    #[must_use]
    pub fn none() -> Self {
        Self::default()
    }

    /// Requires one permission.
    #[must_use]
    pub fn permission(permission: Permission) -> Self {
        Self::any_permission([permission])
    }

    /// Requires at least one of the given permissions.
    #[must_use]
    pub fn any_permission(permissions: impl IntoIterator<Item = Permission>) -> Self {
        Self {
            permissions: permissions.into_iter().collect(),
            roles: BTreeSet::new(),
        }
    }

    /// Requires one of the given roles. ADMIN always qualifies.
    #[must_use]
    pub fn roles(roles: impl IntoIterator<Item = Role>) -> Self {
        Self::none().with_roles(roles)
    }

    /// Adds allowed roles to the requirement.
    #[must_use]
    pub fn with_roles(mut self, roles: impl IntoIterator<Item = Role>) -> Self {
        self.roles.extend(roles);
        self
    }

    /// Returns the required permissions (any one suffices).
    #[must_use]
    pub fn required_permissions(&self) -> &BTreeSet<Permission> {
        &self.permissions
    }

    /// Returns the allowed roles.
    #[must_use]
    pub fn allowed_roles(&self) -> &BTreeSet<Role> {
        &self.roles
    }
}

/// Returns whether the principal holds a permission explicitly or through its role.
#[must_use]
pub fn has_permission(
    map: &RolePermissionMap,
    principal: &Principal,
    permission: Permission,
) -> bool {
    principal.explicit_permissions.contains(&permission)
        || map.permissions_for(principal.role).contains(&permission)
}

/// Returns whether the principal's role is allowed. ADMIN passes any set.
#[must_use]
pub fn has_role(principal: &Principal, allowed_roles: &BTreeSet<Role>) -> bool {
    principal.role == Role::Admin || allowed_roles.contains(&principal.role)
}

/// Decides whether the principal may perform an action.
///
/// Permissions are checked first; a principal lacking all of them is still
/// allowed when it owns the resource. Roles are checked second.
#[must_use]
pub fn is_action_allowed(
    map: &RolePermissionMap,
    principal: &Principal,
    requirement: &AccessRequirement,
    resource_owner_id: Option<UserId>,
) -> bool {
    if !requirement.permissions.is_empty()
        && !requirement
            .permissions
            .iter()
            .any(|permission| has_permission(map, principal, *permission))
    {
        return resource_owner_id == Some(principal.id);
    }

    if !requirement.roles.is_empty() && !has_role(principal, &requirement.roles) {
        return false;
    }

    true
}

/// Returns role defaults merged with explicit grants.
#[must_use]
pub fn effective_permissions(
    map: &RolePermissionMap,
    principal: &Principal,
) -> BTreeSet<Permission> {
    map.permissions_for(principal.role)
        .union(&principal.explicit_permissions)
        .copied()
        .collect()
}
