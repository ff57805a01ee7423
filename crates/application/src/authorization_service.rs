use std::collections::BTreeSet;
use std::sync::Arc;

use eleads_core::{AppError, AppResult};
use eleads_domain::{
    AccessRequirement, Permission, Principal, RolePermissionMap, UserId, effective_permissions,
    is_action_allowed,
};

/// Application service for workspace-scoped authorization checks.
///
/// Holds the role permission map loaded at startup; cloning shares it.
#[derive(Clone)]
pub struct AuthorizationService {
    role_permissions: Arc<RolePermissionMap>,
}

impl AuthorizationService {
    /// Creates a new authorization service over a role permission map.
    #[must_use]
    pub fn new(role_permissions: Arc<RolePermissionMap>) -> Self {
        Self { role_permissions }
    }

    /// Returns whether the principal may perform the action.
    #[must_use]
    pub fn is_allowed(
        &self,
        principal: &Principal,
        requirement: &AccessRequirement,
        resource_owner_id: Option<UserId>,
    ) -> bool {
        is_action_allowed(
            &self.role_permissions,
            principal,
            requirement,
            resource_owner_id,
        )
    }

    /// Ensures the principal may perform the action described by `action`.
    pub fn require(
        &self,
        principal: &Principal,
        action: &str,
        requirement: &AccessRequirement,
        resource_owner_id: Option<UserId>,
    ) -> AppResult<()> {
        if self.is_allowed(principal, requirement, resource_owner_id) {
            return Ok(());
        }

        Err(AppError::Forbidden(format!(
            "user '{}' is not allowed to {action}",
            principal.id()
        )))
    }

    /// Returns role defaults merged with the principal's explicit grants.
    #[must_use]
    pub fn effective_permissions(&self, principal: &Principal) -> BTreeSet<Permission> {
        effective_permissions(&self.role_permissions, principal)
    }

    /// Returns the active role permission map.
    #[must_use]
    pub fn role_permissions(&self) -> &RolePermissionMap {
        &self.role_permissions
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use eleads_core::{AppError, WorkspaceId};
    use eleads_domain::{
        AccessRequirement, Permission, Principal, Role, RolePermissionMap, UserId,
    };

    use super::AuthorizationService;

    fn service() -> AuthorizationService {
        AuthorizationService::new(Arc::new(RolePermissionMap::default()))
    }

    #[test]
    fn require_allows_granted_principal() {
        let manager = Principal::new(UserId::new(), WorkspaceId::new(), Role::Manager, []);
        let result = service().require(
            &manager,
            "assign leads",
            &AccessRequirement::permission(Permission::AssignLeads),
            None,
        );
        assert!(result.is_ok());
    }

    #[test]
    fn require_denies_with_forbidden() {
        let user = Principal::new(UserId::new(), WorkspaceId::new(), Role::User, []);
        let result = service().require(
            &user,
            "manage users",
            &AccessRequirement::permission(Permission::ManageUsers),
            None,
        );
        assert!(matches!(
            result,
            Err(AppError::Forbidden(message)) if message.ends_with("manage users")
        ));
    }

    #[test]
    fn require_honours_ownership_fallback() {
        let user = Principal::new(UserId::new(), WorkspaceId::new(), Role::User, []);
        let requirement = AccessRequirement::permission(Permission::EditWorkspaceLeads);

        assert!(
            service()
                .require(&user, "edit lead", &requirement, Some(user.id()))
                .is_ok()
        );
        assert!(
            service()
                .require(&user, "edit lead", &requirement, Some(UserId::new()))
                .is_err()
        );
    }

    #[test]
    fn effective_permissions_follow_injected_map() {
        let map = RolePermissionMap::from_json(r#"{"ADMIN": ["VIEW_BILLING"], "USER": []}"#);
        let Ok(map) = map else {
            panic!("map should parse");
        };
        let service = AuthorizationService::new(Arc::new(map));
        let user = Principal::new(
            UserId::new(),
            WorkspaceId::new(),
            Role::User,
            [Permission::AssignLeads],
        );

        let effective = service.effective_permissions(&user);
        assert_eq!(
            effective.into_iter().collect::<Vec<_>>(),
            vec![Permission::AssignLeads]
        );
    }
}
