use std::sync::Arc;

use axum::response::Response;
use eleads_application::{PasswordHasher, RegisteredAccount, RegistrationRequest};
use eleads_core::AppResult;
use eleads_domain::{RolePermissionMap, WorkspaceChoice};
use eleads_infrastructure::{InMemoryAccountRepository, InMemoryCrmRepository};

use crate::api_services::{RepositorySet, build_app_state};
use crate::auth::TokenCodec;
use crate::state::AppState;

pub const TEST_PASSWORD: &str = "correct horse battery";

const TEST_SECRET: &str = "test-secret-test-secret-test-secret";

/// Reversible hasher keeping handler tests fast.
pub struct PlainPasswordHasher;

impl PasswordHasher for PlainPasswordHasher {
    fn hash_password(&self, password: &str) -> AppResult<String> {
        Ok(format!("plain:{password}"))
    }

    fn verify_password(&self, password: &str, hash: &str) -> AppResult<bool> {
        Ok(hash == format!("plain:{password}"))
    }
}

pub fn in_memory_state() -> AppState {
    let accounts = Arc::new(InMemoryAccountRepository::new());
    let crm = Arc::new(InMemoryCrmRepository::new());

    build_app_state(
        RepositorySet {
            workspace_repository: accounts.clone(),
            user_repository: accounts.clone(),
            registration_repository: accounts,
            lead_repository: crm.clone(),
            client_repository: crm.clone(),
            invoice_repository: crm,
            password_hasher: Arc::new(PlainPasswordHasher),
        },
        RolePermissionMap::default(),
        TokenCodec::new(TEST_SECRET, 60),
    )
}

/// Registers an account through the service, bypassing HTTP.
pub async fn seed_account(
    state: &AppState,
    email: &str,
    workspace: WorkspaceChoice,
) -> RegisteredAccount {
    let result = state
        .registration_service
        .register(RegistrationRequest {
            email: email.to_owned(),
            password: TEST_PASSWORD.to_owned(),
            first_name: "Ada".to_owned(),
            last_name: "Lovelace".to_owned(),
            workspace,
        })
        .await;
    let Ok(account) = result else {
        panic!("seed registration should succeed");
    };
    account
}

pub fn new_workspace(name: &str) -> WorkspaceChoice {
    WorkspaceChoice {
        name: Some(name.to_owned()),
        ..WorkspaceChoice::default()
    }
}

pub fn existing_workspace(id: &str) -> WorkspaceChoice {
    WorkspaceChoice {
        id: Some(id.to_owned()),
        ..WorkspaceChoice::default()
    }
}

pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap_or_default();
    serde_json::from_slice(&bytes).unwrap_or_default()
}
