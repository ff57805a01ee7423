//! Client ports and application service.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use eleads_core::{AppError, AppResult, WorkspaceId};
use eleads_domain::{ClientId, ContactDetails, Principal, UserId};

use crate::{AuthorizationService, access_policy};

/// Persisted client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientRecord {
    /// Unique client identifier.
    pub id: ClientId,
    /// Owning workspace.
    pub workspace_id: WorkspaceId,
    /// Member responsible for the client.
    pub owner_id: UserId,
    /// Contact name.
    pub name: String,
    /// Contact email.
    pub email: Option<String>,
    /// Contact phone.
    pub phone: Option<String>,
    /// Company name.
    pub company: Option<String>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last modification timestamp.
    pub updated_at: DateTime<Utc>,
}

impl ClientRecord {
    fn apply(&mut self, contact: &ContactDetails, now: DateTime<Utc>) {
        self.name = contact.name().to_owned();
        self.email = contact.email().map(str::to_owned);
        self.phone = contact.phone().map(str::to_owned);
        self.company = contact.company().map(str::to_owned);
        self.updated_at = now;
    }
}

/// Raw client input from a create or update request.
#[derive(Debug, Clone, Default)]
pub struct ClientInput {
    /// Contact name.
    pub name: String,
    /// Contact email.
    pub email: Option<String>,
    /// Contact phone.
    pub phone: Option<String>,
    /// Company name.
    pub company: Option<String>,
}

/// Repository port for client persistence.
#[async_trait]
pub trait ClientRepository: Send + Sync {
    /// Lists clients of a workspace ordered by name.
    async fn list(&self, workspace_id: WorkspaceId) -> AppResult<Vec<ClientRecord>>;

    /// Finds a client inside one workspace.
    async fn find(
        &self,
        workspace_id: WorkspaceId,
        client_id: ClientId,
    ) -> AppResult<Option<ClientRecord>>;

    /// Inserts a new client.
    async fn insert(&self, client: &ClientRecord) -> AppResult<()>;

    /// Overwrites an existing client.
    async fn update(&self, client: &ClientRecord) -> AppResult<()>;

    /// Deletes a client. Returns whether a row was removed.
    async fn delete(&self, workspace_id: WorkspaceId, client_id: ClientId) -> AppResult<bool>;
}

/// Application service for clients.
#[derive(Clone)]
pub struct ClientService {
    client_repository: Arc<dyn ClientRepository>,
    authorization_service: AuthorizationService,
}

impl ClientService {
    /// Creates a new client service.
    #[must_use]
    pub fn new(
        client_repository: Arc<dyn ClientRepository>,
        authorization_service: AuthorizationService,
    ) -> Self {
        Self {
            client_repository,
            authorization_service,
        }
    }

    /// Lists clients in the principal's workspace.
    pub async fn list_clients(&self, principal: &Principal) -> AppResult<Vec<ClientRecord>> {
        self.client_repository.list(principal.workspace_id()).await
    }

    /// Returns one client from the principal's workspace.
    pub async fn get_client(
        &self,
        principal: &Principal,
        client_id: ClientId,
    ) -> AppResult<ClientRecord> {
        self.client_repository
            .find(principal.workspace_id(), client_id)
            .await?
            .ok_or_else(|| client_not_found(client_id))
    }

    /// Creates a client owned by the principal.
    pub async fn create_client(
        &self,
        principal: &Principal,
        input: ClientInput,
    ) -> AppResult<ClientRecord> {
        self.authorization_service.require(
            principal,
            "create clients",
            &access_policy::client_create(),
            None,
        )?;

        let contact = ContactDetails::new(input.name, input.email, input.phone, input.company)?;
        let now = Utc::now();
        let mut client = ClientRecord {
            id: ClientId::new(),
            workspace_id: principal.workspace_id(),
            owner_id: principal.id(),
            name: String::new(),
            email: None,
            phone: None,
            company: None,
            created_at: now,
            updated_at: now,
        };
        client.apply(&contact, now);

        self.client_repository.insert(&client).await?;
        Ok(client)
    }

    /// Replaces a client's contact data.
    pub async fn update_client(
        &self,
        principal: &Principal,
        client_id: ClientId,
        input: ClientInput,
    ) -> AppResult<ClientRecord> {
        let mut client = self.get_client(principal, client_id).await?;
        self.authorization_service.require(
            principal,
            "edit this client",
            &access_policy::client_update(),
            Some(client.owner_id),
        )?;

        let contact = ContactDetails::new(input.name, input.email, input.phone, input.company)?;
        client.apply(&contact, Utc::now());
        self.client_repository.update(&client).await?;
        Ok(client)
    }

    /// Deletes a client.
    pub async fn delete_client(&self, principal: &Principal, client_id: ClientId) -> AppResult<()> {
        let client = self.get_client(principal, client_id).await?;
        self.authorization_service.require(
            principal,
            "delete this client",
            &access_policy::client_delete(),
            Some(client.owner_id),
        )?;

        if !self
            .client_repository
            .delete(client.workspace_id, client.id)
            .await?
        {
            return Err(client_not_found(client_id));
        }

        Ok(())
    }
}

fn client_not_found(client_id: ClientId) -> AppError {
    AppError::NotFound(format!("client '{client_id}' not found"))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;
    use tokio::sync::Mutex;

    use eleads_core::{AppError, AppResult, WorkspaceId};
    use eleads_domain::{ClientId, Permission, Principal, Role, RolePermissionMap, UserId};

    use super::{ClientInput, ClientRecord, ClientRepository, ClientService};
    use crate::AuthorizationService;

    #[derive(Default)]
    struct FakeClientRepository {
        clients: Mutex<Vec<ClientRecord>>,
    }

    #[async_trait]
    impl ClientRepository for FakeClientRepository {
        async fn list(&self, workspace_id: WorkspaceId) -> AppResult<Vec<ClientRecord>> {
            Ok(self
                .clients
                .lock()
                .await
                .iter()
                .filter(|client| client.workspace_id == workspace_id)
                .cloned()
                .collect())
        }

        async fn find(
            &self,
            workspace_id: WorkspaceId,
            client_id: ClientId,
        ) -> AppResult<Option<ClientRecord>> {
            Ok(self
                .clients
                .lock()
                .await
                .iter()
                .find(|client| client.workspace_id == workspace_id && client.id == client_id)
                .cloned())
        }

        async fn insert(&self, client: &ClientRecord) -> AppResult<()> {
            self.clients.lock().await.push(client.clone());
            Ok(())
        }

        async fn update(&self, client: &ClientRecord) -> AppResult<()> {
            let mut clients = self.clients.lock().await;
            if let Some(existing) = clients.iter_mut().find(|existing| existing.id == client.id) {
                *existing = client.clone();
            }
            Ok(())
        }

        async fn delete(&self, workspace_id: WorkspaceId, client_id: ClientId) -> AppResult<bool> {
            let mut clients = self.clients.lock().await;
            let before = clients.len();
            clients
                .retain(|client| !(client.workspace_id == workspace_id && client.id == client_id));
            Ok(clients.len() != before)
        }
    }

    fn service() -> ClientService {
        ClientService::new(
            Arc::new(FakeClientRepository::default()),
            AuthorizationService::new(Arc::new(RolePermissionMap::default())),
        )
    }

    fn input(name: &str) -> ClientInput {
        ClientInput {
            name: name.to_owned(),
            company: Some("Initech".to_owned()),
            ..ClientInput::default()
        }
    }

    async fn create(service: &ClientService, principal: &Principal) -> ClientRecord {
        let Ok(client) = service.create_client(principal, input("Peter")).await else {
            panic!("client creation should succeed");
        };
        client
    }

    #[tokio::test]
    async fn owner_may_delete_own_client() {
        let service = service();
        let owner = Principal::new(UserId::new(), WorkspaceId::new(), Role::User, []);
        let client = create(&service, &owner).await;

        assert!(service.delete_client(&owner, client.id).await.is_ok());
        assert!(matches!(
            service.get_client(&owner, client.id).await,
            Err(AppError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn delete_needs_manager_role_even_with_explicit_grant() {
        let service = service();
        let workspace_id = WorkspaceId::new();
        let owner = Principal::new(UserId::new(), workspace_id, Role::User, []);
        let granted_user = Principal::new(
            UserId::new(),
            workspace_id,
            Role::User,
            [Permission::DeleteWorkspaceLeads],
        );
        let granted_manager = Principal::new(
            UserId::new(),
            workspace_id,
            Role::Manager,
            [Permission::DeleteWorkspaceLeads],
        );
        let client = create(&service, &owner).await;

        let by_user = service.delete_client(&granted_user, client.id).await;
        assert!(matches!(by_user, Err(AppError::Forbidden(_))));

        let by_manager = service.delete_client(&granted_manager, client.id).await;
        assert!(by_manager.is_ok());
    }

    #[tokio::test]
    async fn manager_edits_clients_of_others() {
        let service = service();
        let workspace_id = WorkspaceId::new();
        let owner = Principal::new(UserId::new(), workspace_id, Role::User, []);
        let manager = Principal::new(UserId::new(), workspace_id, Role::Manager, []);
        let client = create(&service, &owner).await;

        let updated = service
            .update_client(&manager, client.id, input("Peter Gibbons"))
            .await;

        assert_eq!(
            updated.map(|client| client.name).ok().as_deref(),
            Some("Peter Gibbons")
        );
    }

    #[tokio::test]
    async fn blank_name_is_rejected() {
        let service = service();
        let owner = Principal::new(UserId::new(), WorkspaceId::new(), Role::User, []);

        let result = service.create_client(&owner, input("  ")).await;

        assert!(matches!(
            result,
            Err(AppError::Validation(message)) if message == "name is required"
        ));
    }
}
