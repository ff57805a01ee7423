//! Lead pipeline ports and application service.

use std::str::FromStr;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use eleads_core::{AppError, AppResult, WorkspaceId};
use eleads_domain::{ContactDetails, LeadDetails, LeadId, LeadStatus, Principal, UserId};

use crate::{AuthorizationService, UserRepository, access_policy};

#[cfg(test)]
mod tests;

/// Persisted lead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeadRecord {
    /// Unique lead identifier.
    pub id: LeadId,
    /// Owning workspace.
    pub workspace_id: WorkspaceId,
    /// Member responsible for the lead.
    pub owner_id: UserId,
    /// Contact name.
    pub name: String,
    /// Contact email.
    pub email: Option<String>,
    /// Contact phone.
    pub phone: Option<String>,
    /// Contact company.
    pub company: Option<String>,
    /// Pipeline stage.
    pub status: LeadStatus,
    /// Free-form notes.
    pub notes: Option<String>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last modification timestamp.
    pub updated_at: DateTime<Utc>,
}

impl LeadRecord {
    fn apply(&mut self, details: LeadDetails, now: DateTime<Utc>) {
        let contact = details.contact();
        self.name = contact.name().to_owned();
        self.email = contact.email().map(str::to_owned);
        self.phone = contact.phone().map(str::to_owned);
        self.company = contact.company().map(str::to_owned);
        self.status = details.status();
        self.notes = details.notes().map(str::to_owned);
        self.updated_at = now;
    }
}

/// Raw lead input from a create or update request.
#[derive(Debug, Clone, Default)]
pub struct LeadInput {
    /// Contact name.
    pub name: String,
    /// Contact email.
    pub email: Option<String>,
    /// Contact phone.
    pub phone: Option<String>,
    /// Contact company.
    pub company: Option<String>,
    /// Pipeline stage; `NEW` when absent.
    pub status: Option<String>,
    /// Free-form notes.
    pub notes: Option<String>,
}

impl LeadInput {
    fn into_details(self) -> AppResult<LeadDetails> {
        let contact = ContactDetails::new(self.name, self.email, self.phone, self.company)?;
        let status = self
            .status
            .as_deref()
            .map(LeadStatus::from_str)
            .transpose()?
            .unwrap_or_default();

        Ok(LeadDetails::new(contact, status, self.notes))
    }
}

/// Repository port for lead persistence.
#[async_trait]
pub trait LeadRepository: Send + Sync {
    /// Lists leads of a workspace, newest first.
    async fn list(&self, workspace_id: WorkspaceId) -> AppResult<Vec<LeadRecord>>;

    /// Finds a lead inside one workspace.
    async fn find(
        &self,
        workspace_id: WorkspaceId,
        lead_id: LeadId,
    ) -> AppResult<Option<LeadRecord>>;

    /// Inserts a new lead.
    async fn insert(&self, lead: &LeadRecord) -> AppResult<()>;

    /// Overwrites an existing lead.
    async fn update(&self, lead: &LeadRecord) -> AppResult<()>;

    /// Deletes a lead. Returns whether a row was removed.
    async fn delete(&self, workspace_id: WorkspaceId, lead_id: LeadId) -> AppResult<bool>;
}

/// Application service for leads.
#[derive(Clone)]
pub struct LeadService {
    lead_repository: Arc<dyn LeadRepository>,
    user_repository: Arc<dyn UserRepository>,
    authorization_service: AuthorizationService,
}

impl LeadService {
    /// Creates a new lead service.
    #[must_use]
    pub fn new(
        lead_repository: Arc<dyn LeadRepository>,
        user_repository: Arc<dyn UserRepository>,
        authorization_service: AuthorizationService,
    ) -> Self {
        Self {
            lead_repository,
            user_repository,
            authorization_service,
        }
    }

    /// Lists leads in the principal's workspace.
    pub async fn list_leads(&self, principal: &Principal) -> AppResult<Vec<LeadRecord>> {
        self.lead_repository.list(principal.workspace_id()).await
    }

    /// Returns one lead from the principal's workspace.
    pub async fn get_lead(&self, principal: &Principal, lead_id: LeadId) -> AppResult<LeadRecord> {
        self.find_in_workspace(principal, lead_id).await
    }

    /// Creates a lead owned by the principal.
    pub async fn create_lead(
        &self,
        principal: &Principal,
        input: LeadInput,
    ) -> AppResult<LeadRecord> {
        self.authorization_service
            .require(principal, "create leads", &access_policy::lead_create(), None)?;

        let details = input.into_details()?;
        let now = Utc::now();
        let mut lead = LeadRecord {
            id: LeadId::new(),
            workspace_id: principal.workspace_id(),
            owner_id: principal.id(),
            name: String::new(),
            email: None,
            phone: None,
            company: None,
            status: LeadStatus::default(),
            notes: None,
            created_at: now,
            updated_at: now,
        };
        lead.apply(details, now);

        self.lead_repository.insert(&lead).await?;
        Ok(lead)
    }

    /// Replaces a lead's editable content.
    pub async fn update_lead(
        &self,
        principal: &Principal,
        lead_id: LeadId,
        input: LeadInput,
    ) -> AppResult<LeadRecord> {
        let mut lead = self.find_in_workspace(principal, lead_id).await?;
        self.authorization_service.require(
            principal,
            "edit this lead",
            &access_policy::lead_update(),
            Some(lead.owner_id),
        )?;

        lead.apply(input.into_details()?, Utc::now());
        self.lead_repository.update(&lead).await?;
        Ok(lead)
    }

    /// Deletes a lead.
    pub async fn delete_lead(&self, principal: &Principal, lead_id: LeadId) -> AppResult<()> {
        let lead = self.find_in_workspace(principal, lead_id).await?;
        self.authorization_service.require(
            principal,
            "delete this lead",
            &access_policy::lead_delete(),
            Some(lead.owner_id),
        )?;

        if !self
            .lead_repository
            .delete(lead.workspace_id, lead.id)
            .await?
        {
            return Err(lead_not_found(lead_id));
        }

        Ok(())
    }

    /// Transfers a lead to another member of the same workspace.
    pub async fn assign_lead(
        &self,
        principal: &Principal,
        lead_id: LeadId,
        assignee_id: UserId,
    ) -> AppResult<LeadRecord> {
        self.authorization_service
            .require(principal, "assign leads", &access_policy::lead_assign(), None)?;

        let mut lead = self.find_in_workspace(principal, lead_id).await?;
        if self
            .user_repository
            .find_by_id(principal.workspace_id(), assignee_id)
            .await?
            .is_none()
        {
            return Err(AppError::Validation(format!(
                "user '{assignee_id}' is not a member of this workspace"
            )));
        }

        lead.owner_id = assignee_id;
        lead.updated_at = Utc::now();
        self.lead_repository.update(&lead).await?;
        Ok(lead)
    }

    async fn find_in_workspace(
        &self,
        principal: &Principal,
        lead_id: LeadId,
    ) -> AppResult<LeadRecord> {
        self.lead_repository
            .find(principal.workspace_id(), lead_id)
            .await?
            .ok_or_else(|| lead_not_found(lead_id))
    }
}

fn lead_not_found(lead_id: LeadId) -> AppError {
    AppError::NotFound(format!("lead '{lead_id}' not found"))
}
