//! Account persistence ports shared by registration and user management.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use eleads_core::{AppResult, WorkspaceId};
use eleads_domain::{
    EmailAddress, Permission, PersonName, Principal, Role, UserId, Workspace, WorkspaceName,
};

/// Message returned when an email is already registered.
pub const USER_EXISTS_MESSAGE: &str = "User already exists.";

/// Message returned when a workspace name is already taken.
pub const WORKSPACE_EXISTS_MESSAGE: &str = "Workspace already exists.";

/// Message returned when a workspace id does not resolve.
pub const WORKSPACE_NOT_FOUND_MESSAGE: &str = "Workspace not found.";

/// User record returned by repository queries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRecord {
    /// Unique user identifier.
    pub id: UserId,
    /// Workspace the user belongs to.
    pub workspace_id: WorkspaceId,
    /// Canonical (lower-cased) email address.
    pub email: String,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Argon2id password hash.
    pub password_hash: String,
    /// Workspace role.
    pub role: Role,
    /// Permissions granted on top of the role defaults.
    pub permissions: Vec<Permission>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl UserRecord {
    /// Builds the authorization principal for this user.
    #[must_use]
    pub fn principal(&self) -> Principal {
        Principal::new(
            self.id,
            self.workspace_id,
            self.role,
            self.permissions.iter().copied(),
        )
    }
}

/// Validated user data for a new account.
#[derive(Debug, Clone)]
pub struct NewUser {
    /// Login email.
    pub email: EmailAddress,
    /// Display name.
    pub name: PersonName,
    /// Argon2id password hash.
    pub password_hash: String,
}

/// What registration does with the workspace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkspacePlan {
    /// Create a workspace with this name.
    Create(WorkspaceName),
    /// Attach the user to this existing workspace.
    Join(WorkspaceId),
}

/// Everything persisted by one registration.
#[derive(Debug, Clone)]
pub struct NewAccount {
    /// The user to insert.
    pub user: NewUser,
    /// The workspace to create or join.
    pub workspace: WorkspacePlan,
    /// Role assigned inside the workspace.
    pub role: Role,
}

/// Result of a committed registration.
#[derive(Debug, Clone)]
pub struct RegisteredAccount {
    /// The inserted user.
    pub user: UserRecord,
    /// The created or joined workspace.
    pub workspace: Workspace,
}

/// Repository port for workspace lookups.
#[async_trait]
pub trait WorkspaceRepository: Send + Sync {
    /// Finds a workspace by name, ignoring case.
    async fn find_by_name(&self, name: &WorkspaceName) -> AppResult<Option<Workspace>>;

    /// Finds a workspace by id.
    async fn find_by_id(&self, workspace_id: WorkspaceId) -> AppResult<Option<Workspace>>;
}

/// Repository port for user persistence.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Finds a user by email (case-insensitive) across all workspaces.
    async fn find_by_email(&self, email: &str) -> AppResult<Option<UserRecord>>;

    /// Finds a user inside one workspace.
    async fn find_by_id(
        &self,
        workspace_id: WorkspaceId,
        user_id: UserId,
    ) -> AppResult<Option<UserRecord>>;

    /// Lists the members of a workspace ordered by email.
    async fn list_for_workspace(&self, workspace_id: WorkspaceId) -> AppResult<Vec<UserRecord>>;

    /// Replaces a member's role and explicit permissions.
    async fn update_access(
        &self,
        workspace_id: WorkspaceId,
        user_id: UserId,
        role: Role,
        permissions: &[Permission],
    ) -> AppResult<Option<UserRecord>>;

    /// Removes a member. Returns whether a row was deleted.
    async fn delete(&self, workspace_id: WorkspaceId, user_id: UserId) -> AppResult<bool>;
}

/// Repository port for the registration write path.
#[async_trait]
pub trait RegistrationRepository: Send + Sync {
    /// Creates or joins the workspace and inserts the user atomically.
    ///
    /// Unique violations map to [`USER_EXISTS_MESSAGE`] or
    /// [`WORKSPACE_EXISTS_MESSAGE`] conflicts; a vanished workspace maps to
    /// [`WORKSPACE_NOT_FOUND_MESSAGE`].
    async fn create_account(&self, account: NewAccount) -> AppResult<RegisteredAccount>;
}

/// Port for password hashing operations.
pub trait PasswordHasher: Send + Sync {
    /// Hashes a plaintext password using Argon2id.
    fn hash_password(&self, password: &str) -> AppResult<String>;

    /// Verifies a plaintext password against a stored hash.
    fn verify_password(&self, password: &str, hash: &str) -> AppResult<bool>;
}
