//! Access requirements for every protected action.
//!
//! Route middleware and services both read from here so that a rule is
//! written once.

use eleads_domain::{AccessRequirement, Permission, Role};

/// Creating a lead owned by the caller.
#[must_use]
pub fn lead_create() -> AccessRequirement {
    AccessRequirement::permission(Permission::ManageOwnLeads)
}

/// Editing a lead. Owners may edit their own leads.
#[must_use]
pub fn lead_update() -> AccessRequirement {
    AccessRequirement::permission(Permission::EditWorkspaceLeads)
}

/// Deleting a lead. Owners may delete their own leads.
#[must_use]
pub fn lead_delete() -> AccessRequirement {
    AccessRequirement::permission(Permission::DeleteWorkspaceLeads)
}

/// Reassigning a lead to another member.
#[must_use]
pub fn lead_assign() -> AccessRequirement {
    AccessRequirement::permission(Permission::AssignLeads).with_roles([Role::Manager])
}

/// Creating a client owned by the caller.
#[must_use]
pub fn client_create() -> AccessRequirement {
    AccessRequirement::permission(Permission::ManageOwnLeads)
}

/// Editing a client. Owners may edit their own clients.
#[must_use]
pub fn client_update() -> AccessRequirement {
    AccessRequirement::permission(Permission::EditWorkspaceLeads)
}

/// Deleting a client. Owners may delete their own clients.
#[must_use]
pub fn client_delete() -> AccessRequirement {
    AccessRequirement::permission(Permission::DeleteWorkspaceLeads).with_roles([Role::Manager])
}

/// Reading invoices.
#[must_use]
pub fn invoice_read() -> AccessRequirement {
    AccessRequirement::permission(Permission::ViewBilling)
}

/// Creating invoices.
#[must_use]
pub fn invoice_create() -> AccessRequirement {
    AccessRequirement::permission(Permission::CreateBilling)
}

/// Editing invoices. Authors may edit their own invoices.
#[must_use]
pub fn invoice_update() -> AccessRequirement {
    AccessRequirement::permission(Permission::EditBilling)
}

/// Moving invoices through their status lifecycle.
#[must_use]
pub fn invoice_status_change() -> AccessRequirement {
    AccessRequirement::permission(Permission::ManageBilling)
}

/// Deleting invoices.
#[must_use]
pub fn invoice_delete() -> AccessRequirement {
    AccessRequirement::permission(Permission::DeleteBilling)
}

/// Listing workspace members.
#[must_use]
pub fn user_list() -> AccessRequirement {
    AccessRequirement::permission(Permission::ManageUsers)
}

/// Changing a member's role or grants, or removing the member.
#[must_use]
pub fn user_admin() -> AccessRequirement {
    AccessRequirement::permission(Permission::ManageUsers).with_roles([Role::Admin])
}

#[cfg(test)]
mod tests {
    use eleads_core::WorkspaceId;
    use eleads_domain::{Permission, Principal, Role, RolePermissionMap, UserId, is_action_allowed};

    use super::*;

    fn allowed(role: Role, requirement: &AccessRequirement) -> bool {
        let principal = Principal::new(UserId::new(), WorkspaceId::new(), role, []);
        is_action_allowed(&RolePermissionMap::default(), &principal, requirement, None)
    }

    #[test]
    fn default_roles_match_the_policy_table() {
        assert!(allowed(Role::User, &lead_create()));
        assert!(!allowed(Role::User, &lead_update()));
        assert!(allowed(Role::Manager, &lead_update()));
        assert!(!allowed(Role::Manager, &lead_delete()));
        assert!(allowed(Role::Manager, &lead_assign()));
        assert!(allowed(Role::User, &invoice_read()));
        assert!(!allowed(Role::User, &invoice_create()));
        assert!(!allowed(Role::Manager, &invoice_status_change()));
        assert!(!allowed(Role::Manager, &user_list()));
        assert!(allowed(Role::Admin, &user_admin()));
    }

    #[test]
    fn explicit_manage_users_grant_still_needs_admin_role_for_admin_actions() {
        let principal = Principal::new(
            UserId::new(),
            WorkspaceId::new(),
            Role::Manager,
            [Permission::ManageUsers],
        );
        let map = RolePermissionMap::default();

        assert!(is_action_allowed(&map, &principal, &user_list(), None));
        assert!(!is_action_allowed(&map, &principal, &user_admin(), None));
    }
}
