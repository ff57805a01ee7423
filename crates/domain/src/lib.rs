//! Domain entities and invariants.

#![forbid(unsafe_code)]

mod billing;
mod crm;
mod ids;
mod security;
mod user;
mod workspace;

pub use billing::{InvoiceDetails, InvoiceStatus};
pub use crm::{ContactDetails, LeadDetails, LeadStatus};
pub use ids::{ClientId, InvoiceId, LeadId, UserId};
pub use security::{
    AccessRequirement, Permission, Principal, Role, RolePermissionMap, effective_permissions,
    has_permission, has_role, is_action_allowed,
};
pub use user::{
    EMAIL_MAX_LENGTH, EmailAddress, PASSWORD_MAX_LENGTH, PASSWORD_MIN_LENGTH, PersonName,
    validate_password,
};
pub use workspace::{
    NormalizedWorkspaceChoice, WORKSPACE_NAME_MAX_LENGTH, Workspace, WorkspaceChoice,
    WorkspaceMode, WorkspaceName, validate_workspace_choice,
};
