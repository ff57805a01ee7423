//! In-memory implementation of the account ports.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use eleads_application::{
    NewAccount, RegisteredAccount, RegistrationRepository, USER_EXISTS_MESSAGE, UserRecord,
    UserRepository, WORKSPACE_EXISTS_MESSAGE, WORKSPACE_NOT_FOUND_MESSAGE, WorkspacePlan,
    WorkspaceRepository,
};
use eleads_core::{AppError, AppResult, WorkspaceId};
use eleads_domain::{Permission, Role, UserId, Workspace, WorkspaceName};

/// In-memory workspace and user store.
///
/// Registration holds both write locks for its whole duration, so it is as
/// atomic as the PostgreSQL transaction.
#[derive(Debug, Default)]
pub struct InMemoryAccountRepository {
    workspaces: RwLock<HashMap<WorkspaceId, Workspace>>,
    users: RwLock<HashMap<UserId, UserRecord>>,
}

impl InMemoryAccountRepository {
    /// Creates an empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl WorkspaceRepository for InMemoryAccountRepository {
    async fn find_by_name(&self, name: &WorkspaceName) -> AppResult<Option<Workspace>> {
        let key = name.lookup_key();
        Ok(self
            .workspaces
            .read()
            .await
            .values()
            .find(|workspace| workspace.name().lookup_key() == key)
            .cloned())
    }

    async fn find_by_id(&self, workspace_id: WorkspaceId) -> AppResult<Option<Workspace>> {
        Ok(self.workspaces.read().await.get(&workspace_id).cloned())
    }
}

#[async_trait]
impl UserRepository for InMemoryAccountRepository {
    async fn find_by_email(&self, email: &str) -> AppResult<Option<UserRecord>> {
        let email = email.to_lowercase();
        Ok(self
            .users
            .read()
            .await
            .values()
            .find(|user| user.email == email)
            .cloned())
    }

    async fn find_by_id(
        &self,
        workspace_id: WorkspaceId,
        user_id: UserId,
    ) -> AppResult<Option<UserRecord>> {
        Ok(self
            .users
            .read()
            .await
            .get(&user_id)
            .filter(|user| user.workspace_id == workspace_id)
            .cloned())
    }

    async fn list_for_workspace(&self, workspace_id: WorkspaceId) -> AppResult<Vec<UserRecord>> {
        let mut users: Vec<UserRecord> = self
            .users
            .read()
            .await
            .values()
            .filter(|user| user.workspace_id == workspace_id)
            .cloned()
            .collect();
        users.sort_by(|left, right| left.email.cmp(&right.email));
        Ok(users)
    }

    async fn update_access(
        &self,
        workspace_id: WorkspaceId,
        user_id: UserId,
        role: Role,
        permissions: &[Permission],
    ) -> AppResult<Option<UserRecord>> {
        let mut users = self.users.write().await;
        let Some(user) = users
            .get_mut(&user_id)
            .filter(|user| user.workspace_id == workspace_id)
        else {
            return Ok(None);
        };

        user.role = role;
        user.permissions = permissions.to_vec();
        Ok(Some(user.clone()))
    }

    async fn delete(&self, workspace_id: WorkspaceId, user_id: UserId) -> AppResult<bool> {
        let mut users = self.users.write().await;
        if users
            .get(&user_id)
            .is_some_and(|user| user.workspace_id == workspace_id)
        {
            users.remove(&user_id);
            return Ok(true);
        }

        Ok(false)
    }
}

#[async_trait]
impl RegistrationRepository for InMemoryAccountRepository {
    async fn create_account(&self, account: NewAccount) -> AppResult<RegisteredAccount> {
        let mut workspaces = self.workspaces.write().await;
        let mut users = self.users.write().await;

        if users
            .values()
            .any(|user| user.email == account.user.email.as_str())
        {
            return Err(AppError::Conflict(USER_EXISTS_MESSAGE.to_owned()));
        }

        let workspace = match account.workspace {
            WorkspacePlan::Create(name) => {
                let key = name.lookup_key();
                if workspaces
                    .values()
                    .any(|workspace| workspace.name().lookup_key() == key)
                {
                    return Err(AppError::Conflict(WORKSPACE_EXISTS_MESSAGE.to_owned()));
                }

                let workspace = Workspace::new(WorkspaceId::new(), name, Utc::now());
                workspaces.insert(workspace.id(), workspace.clone());
                workspace
            }
            WorkspacePlan::Join(workspace_id) => workspaces
                .get(&workspace_id)
                .cloned()
                .ok_or_else(|| AppError::NotFound(WORKSPACE_NOT_FOUND_MESSAGE.to_owned()))?,
        };

        let user = UserRecord {
            id: UserId::new(),
            workspace_id: workspace.id(),
            email: account.user.email.as_str().to_owned(),
            first_name: account.user.name.first_name().to_owned(),
            last_name: account.user.name.last_name().to_owned(),
            password_hash: account.user.password_hash,
            role: account.role,
            permissions: Vec::new(),
            created_at: Utc::now(),
        };
        users.insert(user.id, user.clone());

        Ok(RegisteredAccount { user, workspace })
    }
}
