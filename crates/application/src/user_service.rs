//! Authentication and workspace member management.
//!
//! Login failures are generic: an unknown email and a wrong password return
//! the same outcome, and a hash is still computed for unknown emails.

use std::sync::Arc;

use eleads_core::{AppError, AppResult};
use eleads_domain::{Permission, Principal, Role, UserId, Workspace};

use crate::{
    AuthorizationService, PasswordHasher, UserRecord, UserRepository, WorkspaceRepository,
    access_policy,
};


// ---------------------------------------------------------------------------
// Authentication outcome
// ---------------------------------------------------------------------------

/// Result of a login attempt.
#[derive(Debug)]
pub enum AuthOutcome {
    /// Credentials matched. A token can be issued.
    Authenticated(UserRecord),
    /// Authentication failed. Generic message prevents enumeration.
    Failed,
}

// ---------------------------------------------------------------------------
// Service
// ---------------------------------------------------------------------------

/// Application service for login and member administration.
#[derive(Clone)]
pub struct UserService {
    user_repository: Arc<dyn UserRepository>,
    workspace_repository: Arc<dyn WorkspaceRepository>,
    password_hasher: Arc<dyn PasswordHasher>,
    authorization_service: AuthorizationService,
}

impl UserService {
    /// Creates a new user service.
    #[must_use]
    pub fn new(
        user_repository: Arc<dyn UserRepository>,
        workspace_repository: Arc<dyn WorkspaceRepository>,
        password_hasher: Arc<dyn PasswordHasher>,
        authorization_service: AuthorizationService,
    ) -> Self {
        Self {
            user_repository,
            workspace_repository,
            password_hasher,
            authorization_service,
        }
    }

    /// Authenticates a user with email and password.
    pub async fn login(&self, email: &str, password: &str) -> AppResult<AuthOutcome> {
        let email = email.trim().to_lowercase();
        let Some(user) = self.user_repository.find_by_email(&email).await? else {
            let _ = self.password_hasher.hash_password(password);
            return Ok(AuthOutcome::Failed);
        };

        if !self
            .password_hasher
            .verify_password(password, &user.password_hash)?
        {
            return Ok(AuthOutcome::Failed);
        }

        Ok(AuthOutcome::Authenticated(user))
    }

    /// Returns the record behind an authenticated principal.
    ///
    /// A token outliving its user is treated as unauthenticated.
    pub async fn current_user(&self, principal: &Principal) -> AppResult<UserRecord> {
        self.user_repository
            .find_by_id(principal.workspace_id(), principal.id())
            .await?
            .ok_or_else(|| AppError::Unauthorized("user no longer exists".to_owned()))
    }

    /// Returns the principal's workspace.
    pub async fn current_workspace(&self, principal: &Principal) -> AppResult<Workspace> {
        self.workspace_repository
            .find_by_id(principal.workspace_id())
            .await?
            .ok_or_else(|| AppError::NotFound("workspace not found".to_owned()))
    }

    /// Lists members of the principal's workspace.
    pub async fn list_users(&self, principal: &Principal) -> AppResult<Vec<UserRecord>> {
        self.authorization_service.require(
            principal,
            "list workspace users",
            &access_policy::user_list(),
            None,
        )?;

        self.user_repository
            .list_for_workspace(principal.workspace_id())
            .await
    }

    /// Replaces a member's role and explicit permissions.
    pub async fn update_user_access(
        &self,
        principal: &Principal,
        user_id: UserId,
        role: Role,
        permissions: Vec<Permission>,
    ) -> AppResult<UserRecord> {
        self.authorization_service.require(
            principal,
            "change user access",
            &access_policy::user_admin(),
            None,
        )?;
        if user_id == principal.id() {
            return Err(AppError::Validation(
                "you cannot change your own access".to_owned(),
            ));
        }

        let mut permissions = permissions;
        permissions.sort();
        permissions.dedup();

        self.user_repository
            .update_access(principal.workspace_id(), user_id, role, &permissions)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("user '{user_id}' not found")))
    }

    /// Removes a member from the principal's workspace.
    pub async fn delete_user(&self, principal: &Principal, user_id: UserId) -> AppResult<()> {
        self.authorization_service.require(
            principal,
            "delete users",
            &access_policy::user_admin(),
            None,
        )?;
        if user_id == principal.id() {
            return Err(AppError::Validation("you cannot delete yourself".to_owned()));
        }

        if !self
            .user_repository
            .delete(principal.workspace_id(), user_id)
            .await?
        {
            return Err(AppError::NotFound(format!("user '{user_id}' not found")));
        }

        Ok(())
    }
}
