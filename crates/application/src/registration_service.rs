//! Signup flow: validates the registrant and provisions their workspace.

use std::sync::Arc;

use eleads_core::{AppError, AppResult, WorkspaceId};
use eleads_domain::{
    EmailAddress, NormalizedWorkspaceChoice, PersonName, Role, WorkspaceChoice,
    validate_password, validate_workspace_choice,
};

use crate::{
    NewAccount, NewUser, PasswordHasher, RegisteredAccount, RegistrationRepository,
    USER_EXISTS_MESSAGE, UserRepository, WORKSPACE_EXISTS_MESSAGE, WORKSPACE_NOT_FOUND_MESSAGE,
    WorkspacePlan, WorkspaceRepository,
};


/// Parameters for a registration submission.
#[derive(Debug, Clone, Default)]
pub struct RegistrationRequest {
    /// Login email.
    pub email: String,
    /// Plaintext password.
    pub password: String,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Raw workspace choice.
    pub workspace: WorkspaceChoice,
}

/// Application service for account registration.
#[derive(Clone)]
pub struct RegistrationService {
    workspace_repository: Arc<dyn WorkspaceRepository>,
    user_repository: Arc<dyn UserRepository>,
    registration_repository: Arc<dyn RegistrationRepository>,
    password_hasher: Arc<dyn PasswordHasher>,
}

impl RegistrationService {
    /// Creates a new registration service.
    #[must_use]
    pub fn new(
        workspace_repository: Arc<dyn WorkspaceRepository>,
        user_repository: Arc<dyn UserRepository>,
        registration_repository: Arc<dyn RegistrationRepository>,
        password_hasher: Arc<dyn PasswordHasher>,
    ) -> Self {
        Self {
            workspace_repository,
            user_repository,
            registration_repository,
            password_hasher,
        }
    }

    /// Registers a user and creates or joins their workspace.
    ///
    /// The founder of a new workspace becomes ADMIN; a user joining an
    /// existing workspace becomes USER. Workspace and user rows are written
    /// in one transaction.
    pub async fn register(&self, request: RegistrationRequest) -> AppResult<RegisteredAccount> {
        let email = EmailAddress::new(request.email)?;
        let name = PersonName::new(request.first_name, request.last_name)?;
        validate_password(&request.password)?;

        if self
            .user_repository
            .find_by_email(email.as_str())
            .await?
            .is_some()
        {
            return Err(AppError::Conflict(USER_EXISTS_MESSAGE.to_owned()));
        }

        let (workspace, role) = self.provision_workspace(&request.workspace).await?;
        let password_hash = self.password_hasher.hash_password(&request.password)?;

        self.registration_repository
            .create_account(NewAccount {
                user: NewUser {
                    email,
                    name,
                    password_hash,
                },
                workspace,
                role,
            })
            .await
    }

    /// Resolves a workspace choice into a write plan and the registrant role.
    pub async fn provision_workspace(
        &self,
        choice: &WorkspaceChoice,
    ) -> AppResult<(WorkspacePlan, Role)> {
        match validate_workspace_choice(choice)? {
            NormalizedWorkspaceChoice::New { name } => {
                if self.workspace_repository.find_by_name(&name).await?.is_some() {
                    return Err(AppError::Conflict(WORKSPACE_EXISTS_MESSAGE.to_owned()));
                }

                Ok((WorkspacePlan::Create(name), Role::Admin))
            }
            NormalizedWorkspaceChoice::Existing { id } => {
                let not_found = || AppError::NotFound(WORKSPACE_NOT_FOUND_MESSAGE.to_owned());
                let workspace_id = WorkspaceId::parse(&id).ok_or_else(not_found)?;
                let workspace = self
                    .workspace_repository
                    .find_by_id(workspace_id)
                    .await?
                    .ok_or_else(not_found)?;

                Ok((WorkspacePlan::Join(workspace.id()), Role::User))
            }
        }
    }
}
