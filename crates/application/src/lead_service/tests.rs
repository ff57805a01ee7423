use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use eleads_core::{AppError, AppResult, WorkspaceId};
use eleads_domain::{LeadId, LeadStatus, Role, RolePermissionMap, UserId};

use super::{LeadInput, LeadRecord, LeadRepository, LeadService};
use crate::test_support::FakeAccountStore;
use crate::{AuthorizationService, UserRecord};

#[derive(Default)]
struct FakeLeadRepository {
    leads: Mutex<Vec<LeadRecord>>,
}

#[async_trait]
impl LeadRepository for FakeLeadRepository {
    async fn list(&self, workspace_id: WorkspaceId) -> AppResult<Vec<LeadRecord>> {
        Ok(self
            .leads
            .lock()
            .await
            .iter()
            .filter(|lead| lead.workspace_id == workspace_id)
            .cloned()
            .collect())
    }

    async fn find(
        &self,
        workspace_id: WorkspaceId,
        lead_id: LeadId,
    ) -> AppResult<Option<LeadRecord>> {
        Ok(self
            .leads
            .lock()
            .await
            .iter()
            .find(|lead| lead.workspace_id == workspace_id && lead.id == lead_id)
            .cloned())
    }

    async fn insert(&self, lead: &LeadRecord) -> AppResult<()> {
        self.leads.lock().await.push(lead.clone());
        Ok(())
    }

    async fn update(&self, lead: &LeadRecord) -> AppResult<()> {
        let mut leads = self.leads.lock().await;
        if let Some(existing) = leads.iter_mut().find(|existing| existing.id == lead.id) {
            *existing = lead.clone();
        }
        Ok(())
    }

    async fn delete(&self, workspace_id: WorkspaceId, lead_id: LeadId) -> AppResult<bool> {
        let mut leads = self.leads.lock().await;
        let before = leads.len();
        leads.retain(|lead| !(lead.workspace_id == workspace_id && lead.id == lead_id));
        Ok(leads.len() != before)
    }
}

struct Fixture {
    service: LeadService,
    leads: Arc<FakeLeadRepository>,
    accounts: Arc<FakeAccountStore>,
    workspace_id: WorkspaceId,
}

async fn fixture() -> Fixture {
    let leads = Arc::new(FakeLeadRepository::default());
    let accounts = Arc::new(FakeAccountStore::default());
    let workspace_id = accounts.seed_workspace("Acme Inc").await;
    let service = LeadService::new(
        leads.clone(),
        accounts.clone(),
        AuthorizationService::new(Arc::new(RolePermissionMap::default())),
    );

    Fixture {
        service,
        leads,
        accounts,
        workspace_id,
    }
}

impl Fixture {
    async fn member(&self, email: &str, role: Role) -> UserRecord {
        self.accounts.seed_user(self.workspace_id, email, role).await
    }

    async fn lead_owned_by(&self, owner: &UserRecord) -> LeadRecord {
        let result = self
            .service
            .create_lead(&owner.principal(), input("Globex"))
            .await;
        let Ok(lead) = result else {
            panic!("lead creation should succeed");
        };
        lead
    }
}

fn input(name: &str) -> LeadInput {
    LeadInput {
        name: name.to_owned(),
        email: Some("contact@globex.test".to_owned()),
        ..LeadInput::default()
    }
}

#[tokio::test]
async fn created_lead_is_owned_by_caller_and_starts_new() {
    let fixture = fixture().await;
    let user = fixture.member("bob@example.com", Role::User).await;

    let lead = fixture.lead_owned_by(&user).await;

    assert_eq!(lead.owner_id, user.id);
    assert_eq!(lead.workspace_id, fixture.workspace_id);
    assert_eq!(lead.status, LeadStatus::New);
    assert_eq!(fixture.leads.leads.lock().await.len(), 1);
}

#[tokio::test]
async fn owner_can_edit_own_lead_without_workspace_permission() {
    let fixture = fixture().await;
    let user = fixture.member("bob@example.com", Role::User).await;
    let lead = fixture.lead_owned_by(&user).await;

    let mut update = input("Globex Corp");
    update.status = Some("QUALIFIED".to_owned());
    let result = fixture
        .service
        .update_lead(&user.principal(), lead.id, update)
        .await;

    let Ok(updated) = result else {
        panic!("owner update should succeed");
    };
    assert_eq!(updated.name, "Globex Corp");
    assert_eq!(updated.status, LeadStatus::Qualified);
}

#[tokio::test]
async fn non_owner_without_permission_cannot_edit_or_delete() {
    let fixture = fixture().await;
    let owner = fixture.member("bob@example.com", Role::User).await;
    let other = fixture.member("carol@example.com", Role::User).await;
    let lead = fixture.lead_owned_by(&owner).await;

    let update = fixture
        .service
        .update_lead(&other.principal(), lead.id, input("Hijacked"))
        .await;
    let delete = fixture.service.delete_lead(&other.principal(), lead.id).await;

    assert!(matches!(update, Err(AppError::Forbidden(_))));
    assert!(matches!(delete, Err(AppError::Forbidden(_))));
}

#[tokio::test]
async fn manager_edits_any_lead_but_cannot_delete_others() {
    let fixture = fixture().await;
    let owner = fixture.member("bob@example.com", Role::User).await;
    let manager = fixture.member("mia@example.com", Role::Manager).await;
    let lead = fixture.lead_owned_by(&owner).await;

    let update = fixture
        .service
        .update_lead(&manager.principal(), lead.id, input("Globex Corp"))
        .await;
    let delete = fixture
        .service
        .delete_lead(&manager.principal(), lead.id)
        .await;

    assert!(update.is_ok());
    assert!(matches!(delete, Err(AppError::Forbidden(_))));
}

#[tokio::test]
async fn manager_assigns_lead_to_workspace_member() {
    let fixture = fixture().await;
    let owner = fixture.member("bob@example.com", Role::User).await;
    let assignee = fixture.member("carol@example.com", Role::User).await;
    let manager = fixture.member("mia@example.com", Role::Manager).await;
    let lead = fixture.lead_owned_by(&owner).await;

    let result = fixture
        .service
        .assign_lead(&manager.principal(), lead.id, assignee.id)
        .await;

    assert_eq!(result.map(|lead| lead.owner_id).ok(), Some(assignee.id));
}

#[tokio::test]
async fn assignment_rejects_outsiders_and_plain_users() {
    let fixture = fixture().await;
    let owner = fixture.member("bob@example.com", Role::User).await;
    let manager = fixture.member("mia@example.com", Role::Manager).await;
    let lead = fixture.lead_owned_by(&owner).await;

    let outsider = fixture
        .service
        .assign_lead(&manager.principal(), lead.id, UserId::new())
        .await;
    let by_user = fixture
        .service
        .assign_lead(&owner.principal(), lead.id, manager.id)
        .await;

    assert!(matches!(outsider, Err(AppError::Validation(_))));
    assert!(matches!(by_user, Err(AppError::Forbidden(_))));
}

#[tokio::test]
async fn leads_in_other_workspaces_are_not_found() {
    let fixture = fixture().await;
    let owner = fixture.member("bob@example.com", Role::User).await;
    let lead = fixture.lead_owned_by(&owner).await;

    let other_workspace = fixture.accounts.seed_workspace("Other").await;
    let outsider = fixture
        .accounts
        .seed_user(other_workspace, "eve@example.com", Role::Admin)
        .await;

    let get = fixture.service.get_lead(&outsider.principal(), lead.id).await;
    let delete = fixture
        .service
        .delete_lead(&outsider.principal(), lead.id)
        .await;
    let listed = fixture.service.list_leads(&outsider.principal()).await;

    assert!(matches!(get, Err(AppError::NotFound(_))));
    assert!(matches!(delete, Err(AppError::NotFound(_))));
    assert_eq!(listed.map(|leads| leads.len()).ok(), Some(0));
}

#[tokio::test]
async fn unknown_status_is_a_validation_error() {
    let fixture = fixture().await;
    let user = fixture.member("bob@example.com", Role::User).await;
    let mut bad = input("Globex");
    bad.status = Some("MAYBE".to_owned());

    let result = fixture.service.create_lead(&user.principal(), bad).await;

    assert!(matches!(result, Err(AppError::Validation(_))));
}
