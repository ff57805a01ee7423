use std::sync::Arc;

use eleads_application::{
    AuthorizationService, ClientRepository, ClientService, InvoiceRepository, InvoiceService,
    LeadRepository, LeadService, PasswordHasher, RegistrationRepository, RegistrationService,
    UserRepository, UserService, WorkspaceRepository,
};
use eleads_domain::RolePermissionMap;
use eleads_infrastructure::{
    Argon2PasswordHasher, PostgresClientRepository, PostgresInvoiceRepository,
    PostgresLeadRepository, PostgresUserRepository, PostgresWorkspaceRepository,
};
use sqlx::PgPool;

use crate::auth::TokenCodec;
use crate::state::AppState;

/// Port implementations backing the application services.
pub struct RepositorySet {
    pub workspace_repository: Arc<dyn WorkspaceRepository>,
    pub user_repository: Arc<dyn UserRepository>,
    pub registration_repository: Arc<dyn RegistrationRepository>,
    pub lead_repository: Arc<dyn LeadRepository>,
    pub client_repository: Arc<dyn ClientRepository>,
    pub invoice_repository: Arc<dyn InvoiceRepository>,
    pub password_hasher: Arc<dyn PasswordHasher>,
}

impl RepositorySet {
    pub fn postgres(pool: &PgPool) -> Self {
        let workspace_repository = Arc::new(PostgresWorkspaceRepository::new(pool.clone()));

        Self {
            workspace_repository: workspace_repository.clone(),
            user_repository: Arc::new(PostgresUserRepository::new(pool.clone())),
            registration_repository: workspace_repository,
            lead_repository: Arc::new(PostgresLeadRepository::new(pool.clone())),
            client_repository: Arc::new(PostgresClientRepository::new(pool.clone())),
            invoice_repository: Arc::new(PostgresInvoiceRepository::new(pool.clone())),
            password_hasher: Arc::new(Argon2PasswordHasher::new()),
        }
    }
}

pub fn build_app_state(
    repositories: RepositorySet,
    role_permissions: RolePermissionMap,
    token_codec: TokenCodec,
) -> AppState {
    let authorization_service = AuthorizationService::new(Arc::new(role_permissions));

    AppState {
        registration_service: RegistrationService::new(
            repositories.workspace_repository.clone(),
            repositories.user_repository.clone(),
            repositories.registration_repository,
            repositories.password_hasher.clone(),
        ),
        user_service: UserService::new(
            repositories.user_repository.clone(),
            repositories.workspace_repository,
            repositories.password_hasher,
            authorization_service.clone(),
        ),
        lead_service: LeadService::new(
            repositories.lead_repository,
            repositories.user_repository,
            authorization_service.clone(),
        ),
        client_service: ClientService::new(
            repositories.client_repository.clone(),
            authorization_service.clone(),
        ),
        invoice_service: InvoiceService::new(
            repositories.invoice_repository,
            repositories.client_repository,
            authorization_service.clone(),
        ),
        authorization_service,
        token_codec: Arc::new(token_codec),
    }
}
