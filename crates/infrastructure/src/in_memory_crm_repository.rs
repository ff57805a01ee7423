//! In-memory implementation of the lead, client and invoice ports.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use eleads_application::{
    ClientRecord, ClientRepository, InvoiceRecord, InvoiceRepository, LeadRecord, LeadRepository,
};
use eleads_core::{AppError, AppResult, WorkspaceId};
use eleads_domain::{ClientId, InvoiceId, LeadId};

/// In-memory CRM store keyed by record id.
#[derive(Debug, Default)]
pub struct InMemoryCrmRepository {
    leads: RwLock<HashMap<LeadId, LeadRecord>>,
    clients: RwLock<HashMap<ClientId, ClientRecord>>,
    invoices: RwLock<HashMap<InvoiceId, InvoiceRecord>>,
}

impl InMemoryCrmRepository {
    /// Creates an empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl LeadRepository for InMemoryCrmRepository {
    async fn list(&self, workspace_id: WorkspaceId) -> AppResult<Vec<LeadRecord>> {
        let mut leads: Vec<LeadRecord> = self
            .leads
            .read()
            .await
            .values()
            .filter(|lead| lead.workspace_id == workspace_id)
            .cloned()
            .collect();
        leads.sort_by(|left, right| right.created_at.cmp(&left.created_at));
        Ok(leads)
    }

    async fn find(
        &self,
        workspace_id: WorkspaceId,
        lead_id: LeadId,
    ) -> AppResult<Option<LeadRecord>> {
        Ok(self
            .leads
            .read()
            .await
            .get(&lead_id)
            .filter(|lead| lead.workspace_id == workspace_id)
            .cloned())
    }

    async fn insert(&self, lead: &LeadRecord) -> AppResult<()> {
        self.leads.write().await.insert(lead.id, lead.clone());
        Ok(())
    }

    async fn update(&self, lead: &LeadRecord) -> AppResult<()> {
        let mut leads = self.leads.write().await;
        match leads.get_mut(&lead.id) {
            Some(existing) if existing.workspace_id == lead.workspace_id => {
                *existing = lead.clone();
                Ok(())
            }
            _ => Err(AppError::NotFound(format!("lead '{}' not found", lead.id))),
        }
    }

    async fn delete(&self, workspace_id: WorkspaceId, lead_id: LeadId) -> AppResult<bool> {
        let mut leads = self.leads.write().await;
        if leads
            .get(&lead_id)
            .is_some_and(|lead| lead.workspace_id == workspace_id)
        {
            leads.remove(&lead_id);
            return Ok(true);
        }

        Ok(false)
    }
}

#[async_trait]
impl ClientRepository for InMemoryCrmRepository {
    async fn list(&self, workspace_id: WorkspaceId) -> AppResult<Vec<ClientRecord>> {
        let mut clients: Vec<ClientRecord> = self
            .clients
            .read()
            .await
            .values()
            .filter(|client| client.workspace_id == workspace_id)
            .cloned()
            .collect();
        clients.sort_by(|left, right| left.name.cmp(&right.name));
        Ok(clients)
    }

    async fn find(
        &self,
        workspace_id: WorkspaceId,
        client_id: ClientId,
    ) -> AppResult<Option<ClientRecord>> {
        Ok(self
            .clients
            .read()
            .await
            .get(&client_id)
            .filter(|client| client.workspace_id == workspace_id)
            .cloned())
    }

    async fn insert(&self, client: &ClientRecord) -> AppResult<()> {
        self.clients.write().await.insert(client.id, client.clone());
        Ok(())
    }

    async fn update(&self, client: &ClientRecord) -> AppResult<()> {
        let mut clients = self.clients.write().await;
        match clients.get_mut(&client.id) {
            Some(existing) if existing.workspace_id == client.workspace_id => {
                *existing = client.clone();
                Ok(())
            }
            _ => Err(AppError::NotFound(format!(
                "client '{}' not found",
                client.id
            ))),
        }
    }

    async fn delete(&self, workspace_id: WorkspaceId, client_id: ClientId) -> AppResult<bool> {
        let invoices = self.invoices.read().await;
        let mut clients = self.clients.write().await;
        if !clients
            .get(&client_id)
            .is_some_and(|client| client.workspace_id == workspace_id)
        {
            return Ok(false);
        }

        if invoices
            .values()
            .any(|invoice| invoice.client_id == client_id)
        {
            return Err(AppError::Conflict(format!(
                "client '{client_id}' still has invoices"
            )));
        }

        clients.remove(&client_id);
        Ok(true)
    }
}

#[async_trait]
impl InvoiceRepository for InMemoryCrmRepository {
    async fn list(&self, workspace_id: WorkspaceId) -> AppResult<Vec<InvoiceRecord>> {
        let mut invoices: Vec<InvoiceRecord> = self
            .invoices
            .read()
            .await
            .values()
            .filter(|invoice| invoice.workspace_id == workspace_id)
            .cloned()
            .collect();
        invoices.sort_by(|left, right| right.created_at.cmp(&left.created_at));
        Ok(invoices)
    }

    async fn find(
        &self,
        workspace_id: WorkspaceId,
        invoice_id: InvoiceId,
    ) -> AppResult<Option<InvoiceRecord>> {
        Ok(self
            .invoices
            .read()
            .await
            .get(&invoice_id)
            .filter(|invoice| invoice.workspace_id == workspace_id)
            .cloned())
    }

    async fn insert(&self, invoice: &InvoiceRecord) -> AppResult<()> {
        let mut invoices = self.invoices.write().await;
        ensure_unique_number(&invoices, invoice)?;
        invoices.insert(invoice.id, invoice.clone());
        Ok(())
    }

    async fn update(&self, invoice: &InvoiceRecord) -> AppResult<()> {
        let mut invoices = self.invoices.write().await;
        ensure_unique_number(&invoices, invoice)?;
        match invoices.get_mut(&invoice.id) {
            Some(existing) if existing.workspace_id == invoice.workspace_id => {
                *existing = invoice.clone();
                Ok(())
            }
            _ => Err(AppError::NotFound(format!(
                "invoice '{}' not found",
                invoice.id
            ))),
        }
    }

    async fn delete(&self, workspace_id: WorkspaceId, invoice_id: InvoiceId) -> AppResult<bool> {
        let mut invoices = self.invoices.write().await;
        if invoices
            .get(&invoice_id)
            .is_some_and(|invoice| invoice.workspace_id == workspace_id)
        {
            invoices.remove(&invoice_id);
            return Ok(true);
        }

        Ok(false)
    }
}

fn ensure_unique_number(
    invoices: &HashMap<InvoiceId, InvoiceRecord>,
    invoice: &InvoiceRecord,
) -> AppResult<()> {
    let taken = invoices.values().any(|existing| {
        existing.id != invoice.id
            && existing.workspace_id == invoice.workspace_id
            && existing.number == invoice.number
    });
    if taken {
        return Err(AppError::Conflict(format!(
            "invoice number '{}' already exists",
            invoice.number
        )));
    }

    Ok(())
}
