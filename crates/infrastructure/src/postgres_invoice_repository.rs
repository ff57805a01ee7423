//! PostgreSQL-backed invoice repository.

use std::str::FromStr;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::{FromRow, PgPool};

use eleads_application::{InvoiceRecord, InvoiceRepository};
use eleads_core::{AppError, AppResult, WorkspaceId};
use eleads_domain::{ClientId, InvoiceId, InvoiceStatus, UserId};

use crate::postgres_errors::{internal, unique_violation};

/// PostgreSQL implementation of the invoice repository port.
#[derive(Clone)]
pub struct PostgresInvoiceRepository {
    pool: PgPool,
}

impl PostgresInvoiceRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct InvoiceRow {
    id: uuid::Uuid,
    workspace_id: uuid::Uuid,
    client_id: uuid::Uuid,
    created_by: uuid::Uuid,
    number: String,
    amount_cents: i64,
    currency: String,
    status: String,
    due_date: Option<NaiveDate>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<InvoiceRow> for InvoiceRecord {
    type Error = AppError;

    fn try_from(row: InvoiceRow) -> AppResult<Self> {
        let status = InvoiceStatus::from_str(&row.status).map_err(|error| {
            AppError::Internal(format!("invoice '{}' has a corrupt status: {error}", row.id))
        })?;

        Ok(Self {
            id: InvoiceId::from_uuid(row.id),
            workspace_id: WorkspaceId::from_uuid(row.workspace_id),
            client_id: ClientId::from_uuid(row.client_id),
            created_by: UserId::from_uuid(row.created_by),
            number: row.number,
            amount_cents: row.amount_cents,
            currency: row.currency,
            status,
            due_date: row.due_date,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

fn number_conflict_or_internal(error: sqlx::Error, number: &str, operation: &str) -> AppError {
    if unique_violation(&error).is_some() {
        return AppError::Conflict(format!("invoice number '{number}' already exists"));
    }

    internal(operation, error)
}

#[async_trait]
impl InvoiceRepository for PostgresInvoiceRepository {
    async fn list(&self, workspace_id: WorkspaceId) -> AppResult<Vec<InvoiceRecord>> {
        sqlx::query_as::<_, InvoiceRow>(
            r#"
            SELECT id, workspace_id, client_id, created_by, number, amount_cents, currency,
                   status, due_date, created_at, updated_at
            FROM invoices
            WHERE workspace_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(workspace_id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(|error| internal("list invoices", error))?
        .into_iter()
        .map(InvoiceRecord::try_from)
        .collect()
    }

    async fn find(
        &self,
        workspace_id: WorkspaceId,
        invoice_id: InvoiceId,
    ) -> AppResult<Option<InvoiceRecord>> {
        sqlx::query_as::<_, InvoiceRow>(
            r#"
            SELECT id, workspace_id, client_id, created_by, number, amount_cents, currency,
                   status, due_date, created_at, updated_at
            FROM invoices
            WHERE workspace_id = $1 AND id = $2
            "#,
        )
        .bind(workspace_id.as_uuid())
        .bind(invoice_id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| internal("find invoice", error))?
        .map(InvoiceRecord::try_from)
        .transpose()
    }

    async fn insert(&self, invoice: &InvoiceRecord) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO invoices (
                id, workspace_id, client_id, created_by, number, amount_cents, currency,
                status, due_date, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            "#,
        )
        .bind(invoice.id.as_uuid())
        .bind(invoice.workspace_id.as_uuid())
        .bind(invoice.client_id.as_uuid())
        .bind(invoice.created_by.as_uuid())
        .bind(invoice.number.as_str())
        .bind(invoice.amount_cents)
        .bind(invoice.currency.as_str())
        .bind(invoice.status.as_str())
        .bind(invoice.due_date)
        .bind(invoice.created_at)
        .bind(invoice.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|error| number_conflict_or_internal(error, &invoice.number, "create invoice"))?;

        Ok(())
    }

    async fn update(&self, invoice: &InvoiceRecord) -> AppResult<()> {
        sqlx::query(
            r#"
            UPDATE invoices
            SET client_id = $3, number = $4, amount_cents = $5, currency = $6,
                status = $7, due_date = $8, updated_at = $9
            WHERE workspace_id = $1 AND id = $2
            "#,
        )
        .bind(invoice.workspace_id.as_uuid())
        .bind(invoice.id.as_uuid())
        .bind(invoice.client_id.as_uuid())
        .bind(invoice.number.as_str())
        .bind(invoice.amount_cents)
        .bind(invoice.currency.as_str())
        .bind(invoice.status.as_str())
        .bind(invoice.due_date)
        .bind(invoice.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|error| number_conflict_or_internal(error, &invoice.number, "update invoice"))?;

        Ok(())
    }

    async fn delete(&self, workspace_id: WorkspaceId, invoice_id: InvoiceId) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM invoices WHERE workspace_id = $1 AND id = $2")
            .bind(workspace_id.as_uuid())
            .bind(invoice_id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(|error| internal("delete invoice", error))?;

        Ok(result.rows_affected() > 0)
    }
}
