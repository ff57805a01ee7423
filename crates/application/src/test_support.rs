use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::Mutex;

use eleads_core::{AppError, AppResult, WorkspaceId};
use eleads_domain::{Permission, Role, UserId, Workspace, WorkspaceName};

use crate::{
    NewAccount, PasswordHasher, RegisteredAccount, RegistrationRepository, USER_EXISTS_MESSAGE,
    UserRecord, UserRepository, WORKSPACE_EXISTS_MESSAGE, WORKSPACE_NOT_FOUND_MESSAGE,
    WorkspacePlan, WorkspaceRepository,
};

#[derive(Default)]
struct AccountState {
    workspaces: Vec<Workspace>,
    users: Vec<UserRecord>,
}

#[derive(Default)]
pub(crate) struct FakeAccountStore {
    state: Mutex<AccountState>,
}

impl FakeAccountStore {
    pub(crate) async fn seed_workspace(&self, name: &str) -> WorkspaceId {
        let Ok(name) = WorkspaceName::new(name) else {
            panic!("seed workspace name should be valid");
        };
        let workspace = Workspace::new(WorkspaceId::new(), name, Utc::now());
        let workspace_id = workspace.id();
        self.state.lock().await.workspaces.push(workspace);
        workspace_id
    }

    pub(crate) async fn seed_user(
        &self,
        workspace_id: WorkspaceId,
        email: &str,
        role: Role,
    ) -> UserRecord {
        let user = UserRecord {
            id: UserId::new(),
            workspace_id,
            email: email.to_owned(),
            first_name: "Test".to_owned(),
            last_name: "User".to_owned(),
            password_hash: "hashed:correct horse battery".to_owned(),
            role,
            permissions: Vec::new(),
            created_at: Utc::now(),
        };
        self.state.lock().await.users.push(user.clone());
        user
    }

    pub(crate) async fn workspace_count(&self) -> usize {
        self.state.lock().await.workspaces.len()
    }

    pub(crate) async fn user_count(&self) -> usize {
        self.state.lock().await.users.len()
    }
}

#[async_trait]
impl WorkspaceRepository for FakeAccountStore {
    async fn find_by_name(&self, name: &WorkspaceName) -> AppResult<Option<Workspace>> {
        let key = name.lookup_key();
        Ok(self
            .state
            .lock()
            .await
            .workspaces
            .iter()
            .find(|workspace| workspace.name().lookup_key() == key)
            .cloned())
    }

    async fn find_by_id(&self, workspace_id: WorkspaceId) -> AppResult<Option<Workspace>> {
        Ok(self
            .state
            .lock()
            .await
            .workspaces
            .iter()
            .find(|workspace| workspace.id() == workspace_id)
            .cloned())
    }
}

#[async_trait]
impl UserRepository for FakeAccountStore {
    async fn find_by_email(&self, email: &str) -> AppResult<Option<UserRecord>> {
        let email = email.to_lowercase();
        Ok(self
            .state
            .lock()
            .await
            .users
            .iter()
            .find(|user| user.email == email)
            .cloned())
    }

    async fn find_by_id(
        &self,
        workspace_id: WorkspaceId,
        user_id: UserId,
    ) -> AppResult<Option<UserRecord>> {
        Ok(self
            .state
            .lock()
            .await
            .users
            .iter()
            .find(|user| user.workspace_id == workspace_id && user.id == user_id)
            .cloned())
    }

    async fn list_for_workspace(&self, workspace_id: WorkspaceId) -> AppResult<Vec<UserRecord>> {
        let mut users: Vec<UserRecord> = self
            .state
            .lock()
            .await
            .users
            .iter()
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
        let mut state = self.state.lock().await;
        let Some(user) = state
            .users
            .iter_mut()
            .find(|user| user.workspace_id == workspace_id && user.id == user_id)
        else {
            return Ok(None);
        };

        user.role = role;
        user.permissions = permissions.to_vec();
        Ok(Some(user.clone()))
    }

    async fn delete(&self, workspace_id: WorkspaceId, user_id: UserId) -> AppResult<bool> {
        let mut state = self.state.lock().await;
        let before = state.users.len();
        state
            .users
            .retain(|user| !(user.workspace_id == workspace_id && user.id == user_id));
        Ok(state.users.len() != before)
    }
}

#[async_trait]
impl RegistrationRepository for FakeAccountStore {
    async fn create_account(&self, account: NewAccount) -> AppResult<RegisteredAccount> {
        let mut state = self.state.lock().await;
        if state
            .users
            .iter()
            .any(|user| user.email == account.user.email.as_str())
        {
            return Err(AppError::Conflict(USER_EXISTS_MESSAGE.to_owned()));
        }

        let workspace = match account.workspace {
            WorkspacePlan::Create(name) => {
                let key = name.lookup_key();
                if state
                    .workspaces
                    .iter()
                    .any(|workspace| workspace.name().lookup_key() == key)
                {
                    return Err(AppError::Conflict(WORKSPACE_EXISTS_MESSAGE.to_owned()));
                }
                let workspace = Workspace::new(WorkspaceId::new(), name, Utc::now());
                state.workspaces.push(workspace.clone());
                workspace
            }
            WorkspacePlan::Join(workspace_id) => state
                .workspaces
                .iter()
                .find(|workspace| workspace.id() == workspace_id)
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
        state.users.push(user.clone());

        Ok(RegisteredAccount { user, workspace })
    }
}

pub(crate) struct PrefixPasswordHasher;

impl PasswordHasher for PrefixPasswordHasher {
    fn hash_password(&self, password: &str) -> AppResult<String> {
        Ok(format!("hashed:{password}"))
    }

    fn verify_password(&self, password: &str, hash: &str) -> AppResult<bool> {
        Ok(hash == format!("hashed:{password}"))
    }
}
