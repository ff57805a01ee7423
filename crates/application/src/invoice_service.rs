//! Billing ports and application service.

use std::str::FromStr;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};

use eleads_core::{AppError, AppResult, WorkspaceId};
use eleads_domain::{ClientId, InvoiceDetails, InvoiceId, InvoiceStatus, Principal, UserId};

use crate::{AuthorizationService, ClientRepository, access_policy};

/// Persisted invoice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvoiceRecord {
    /// Unique invoice identifier.
    pub id: InvoiceId,
    /// Owning workspace.
    pub workspace_id: WorkspaceId,
    /// Billed client.
    pub client_id: ClientId,
    /// Member who issued the invoice.
    pub created_by: UserId,
    /// Invoice number, unique per workspace.
    pub number: String,
    /// Amount in minor currency units.
    pub amount_cents: i64,
    /// ISO currency code.
    pub currency: String,
    /// Lifecycle status.
    pub status: InvoiceStatus,
    /// Payment due date.
    pub due_date: Option<NaiveDate>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last modification timestamp.
    pub updated_at: DateTime<Utc>,
}

impl InvoiceRecord {
    fn apply(&mut self, details: &InvoiceDetails, now: DateTime<Utc>) {
        self.number = details.number().to_owned();
        self.amount_cents = details.amount_cents();
        self.currency = details.currency().to_owned();
        self.due_date = details.due_date();
        self.updated_at = now;
    }
}

/// Raw invoice input from a create or update request.
#[derive(Debug, Clone, Default)]
pub struct InvoiceInput {
    /// Billed client id as supplied.
    pub client_id: String,
    /// Invoice number.
    pub number: String,
    /// Amount in minor currency units.
    pub amount_cents: i64,
    /// ISO currency code.
    pub currency: String,
    /// Payment due date.
    pub due_date: Option<NaiveDate>,
}

/// Repository port for invoice persistence.
#[async_trait]
pub trait InvoiceRepository: Send + Sync {
    /// Lists invoices of a workspace, newest first.
    async fn list(&self, workspace_id: WorkspaceId) -> AppResult<Vec<InvoiceRecord>>;

    /// Finds an invoice inside one workspace.
    async fn find(
        &self,
        workspace_id: WorkspaceId,
        invoice_id: InvoiceId,
    ) -> AppResult<Option<InvoiceRecord>>;

    /// Inserts a new invoice. A duplicate number is a conflict.
    async fn insert(&self, invoice: &InvoiceRecord) -> AppResult<()>;

    /// Overwrites an existing invoice. A duplicate number is a conflict.
    async fn update(&self, invoice: &InvoiceRecord) -> AppResult<()>;

    /// Deletes an invoice. Returns whether a row was removed.
    async fn delete(&self, workspace_id: WorkspaceId, invoice_id: InvoiceId) -> AppResult<bool>;
}

/// Application service for invoices.
#[derive(Clone)]
pub struct InvoiceService {
    invoice_repository: Arc<dyn InvoiceRepository>,
    client_repository: Arc<dyn ClientRepository>,
    authorization_service: AuthorizationService,
}

impl InvoiceService {
    /// Creates a new invoice service.
    #[must_use]
    pub fn new(
        invoice_repository: Arc<dyn InvoiceRepository>,
        client_repository: Arc<dyn ClientRepository>,
        authorization_service: AuthorizationService,
    ) -> Self {
        Self {
            invoice_repository,
            client_repository,
            authorization_service,
        }
    }

    /// Lists invoices in the principal's workspace.
    pub async fn list_invoices(&self, principal: &Principal) -> AppResult<Vec<InvoiceRecord>> {
        self.authorization_service.require(
            principal,
            "view invoices",
            &access_policy::invoice_read(),
            None,
        )?;

        self.invoice_repository.list(principal.workspace_id()).await
    }

    /// Returns one invoice from the principal's workspace.
    pub async fn get_invoice(
        &self,
        principal: &Principal,
        invoice_id: InvoiceId,
    ) -> AppResult<InvoiceRecord> {
        self.authorization_service.require(
            principal,
            "view invoices",
            &access_policy::invoice_read(),
            None,
        )?;

        self.find_in_workspace(principal, invoice_id).await
    }

    /// Issues a draft invoice for a client of the workspace.
    pub async fn create_invoice(
        &self,
        principal: &Principal,
        input: InvoiceInput,
    ) -> AppResult<InvoiceRecord> {
        self.authorization_service.require(
            principal,
            "create invoices",
            &access_policy::invoice_create(),
            None,
        )?;

        let client_id = self.resolve_client(principal, &input.client_id).await?;
        let details = InvoiceDetails::new(
            input.number,
            input.amount_cents,
            &input.currency,
            input.due_date,
        )?;
        let now = Utc::now();
        let mut invoice = InvoiceRecord {
            id: InvoiceId::new(),
            workspace_id: principal.workspace_id(),
            client_id,
            created_by: principal.id(),
            number: String::new(),
            amount_cents: 0,
            currency: String::new(),
            status: InvoiceStatus::Draft,
            due_date: None,
            created_at: now,
            updated_at: now,
        };
        invoice.apply(&details, now);

        self.invoice_repository.insert(&invoice).await?;
        Ok(invoice)
    }

    /// Replaces an invoice's content. Paid and cancelled invoices are frozen.
    pub async fn update_invoice(
        &self,
        principal: &Principal,
        invoice_id: InvoiceId,
        input: InvoiceInput,
    ) -> AppResult<InvoiceRecord> {
        let mut invoice = self.find_in_workspace(principal, invoice_id).await?;
        self.authorization_service.require(
            principal,
            "edit this invoice",
            &access_policy::invoice_update(),
            Some(invoice.created_by),
        )?;

        if invoice.status.is_final() {
            return Err(AppError::Validation(format!(
                "invoice in status '{}' can no longer be edited",
                invoice.status.as_str()
            )));
        }

        invoice.client_id = self.resolve_client(principal, &input.client_id).await?;
        let details = InvoiceDetails::new(
            input.number,
            input.amount_cents,
            &input.currency,
            input.due_date,
        )?;
        invoice.apply(&details, Utc::now());

        self.invoice_repository.update(&invoice).await?;
        Ok(invoice)
    }

    /// Moves an invoice to another lifecycle status.
    pub async fn set_invoice_status(
        &self,
        principal: &Principal,
        invoice_id: InvoiceId,
        status: &str,
    ) -> AppResult<InvoiceRecord> {
        self.authorization_service.require(
            principal,
            "change invoice status",
            &access_policy::invoice_status_change(),
            None,
        )?;

        let next = InvoiceStatus::from_str(status)?;
        let mut invoice = self.find_in_workspace(principal, invoice_id).await?;
        if !invoice.status.can_transition_to(next) {
            return Err(AppError::Validation(format!(
                "invoice cannot move from '{}' to '{}'",
                invoice.status.as_str(),
                next.as_str()
            )));
        }

        invoice.status = next;
        invoice.updated_at = Utc::now();
        self.invoice_repository.update(&invoice).await?;
        Ok(invoice)
    }

    /// Deletes an invoice.
    pub async fn delete_invoice(
        &self,
        principal: &Principal,
        invoice_id: InvoiceId,
    ) -> AppResult<()> {
        self.authorization_service.require(
            principal,
            "delete invoices",
            &access_policy::invoice_delete(),
            None,
        )?;

        if !self
            .invoice_repository
            .delete(principal.workspace_id(), invoice_id)
            .await?
        {
            return Err(invoice_not_found(invoice_id));
        }

        Ok(())
    }

    async fn find_in_workspace(
        &self,
        principal: &Principal,
        invoice_id: InvoiceId,
    ) -> AppResult<InvoiceRecord> {
        self.invoice_repository
            .find(principal.workspace_id(), invoice_id)
            .await?
            .ok_or_else(|| invoice_not_found(invoice_id))
    }

    async fn resolve_client(&self, principal: &Principal, client_id: &str) -> AppResult<ClientId> {
        let client_id = ClientId::parse(client_id)?;
        self.client_repository
            .find(principal.workspace_id(), client_id)
            .await?
            .map(|client| client.id)
            .ok_or_else(|| AppError::NotFound(format!("client '{client_id}' not found")))
    }
}

fn invoice_not_found(invoice_id: InvoiceId) -> AppError {
    AppError::NotFound(format!("invoice '{invoice_id}' not found"))
}
