//! PostgreSQL-backed lead repository.

use std::str::FromStr;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};

use eleads_application::{LeadRecord, LeadRepository};
use eleads_core::{AppError, AppResult, WorkspaceId};
use eleads_domain::{LeadId, LeadStatus, UserId};

use crate::postgres_errors::internal;

/// PostgreSQL implementation of the lead repository port.
#[derive(Clone)]
pub struct PostgresLeadRepository {
    pool: PgPool,
}

impl PostgresLeadRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct LeadRow {
    id: uuid::Uuid,
    workspace_id: uuid::Uuid,
    owner_id: uuid::Uuid,
    name: String,
    email: Option<String>,
    phone: Option<String>,
    company: Option<String>,
    status: String,
    notes: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<LeadRow> for LeadRecord {
    type Error = AppError;

    fn try_from(row: LeadRow) -> AppResult<Self> {
        let status = LeadStatus::from_str(&row.status).map_err(|error| {
            AppError::Internal(format!("lead '{}' has a corrupt status: {error}", row.id))
        })?;

        Ok(Self {
            id: LeadId::from_uuid(row.id),
            workspace_id: WorkspaceId::from_uuid(row.workspace_id),
            owner_id: UserId::from_uuid(row.owner_id),
            name: row.name,
            email: row.email,
            phone: row.phone,
            company: row.company,
            status,
            notes: row.notes,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[async_trait]
impl LeadRepository for PostgresLeadRepository {
    async fn list(&self, workspace_id: WorkspaceId) -> AppResult<Vec<LeadRecord>> {
        sqlx::query_as::<_, LeadRow>(
            r#"
            SELECT id, workspace_id, owner_id, name, email, phone, company, status, notes,
                   created_at, updated_at
            FROM leads
            WHERE workspace_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(workspace_id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(|error| internal("list leads", error))?
        .into_iter()
        .map(LeadRecord::try_from)
        .collect()
    }

    async fn find(
        &self,
        workspace_id: WorkspaceId,
        lead_id: LeadId,
    ) -> AppResult<Option<LeadRecord>> {
        sqlx::query_as::<_, LeadRow>(
            r#"
            SELECT id, workspace_id, owner_id, name, email, phone, company, status, notes,
                   created_at, updated_at
            FROM leads
            WHERE workspace_id = $1 AND id = $2
            "#,
        )
        .bind(workspace_id.as_uuid())
        .bind(lead_id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| internal("find lead", error))?
        .map(LeadRecord::try_from)
        .transpose()
    }

    async fn insert(&self, lead: &LeadRecord) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO leads (
                id, workspace_id, owner_id, name, email, phone, company, status, notes,
                created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            "#,
        )
        .bind(lead.id.as_uuid())
        .bind(lead.workspace_id.as_uuid())
        .bind(lead.owner_id.as_uuid())
        .bind(lead.name.as_str())
        .bind(lead.email.as_deref())
        .bind(lead.phone.as_deref())
        .bind(lead.company.as_deref())
        .bind(lead.status.as_str())
        .bind(lead.notes.as_deref())
        .bind(lead.created_at)
        .bind(lead.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|error| internal("create lead", error))?;

        Ok(())
    }

    async fn update(&self, lead: &LeadRecord) -> AppResult<()> {
        sqlx::query(
            r#"
            UPDATE leads
            SET owner_id = $3, name = $4, email = $5, phone = $6, company = $7,
                status = $8, notes = $9, updated_at = $10
            WHERE workspace_id = $1 AND id = $2
            "#,
        )
        .bind(lead.workspace_id.as_uuid())
        .bind(lead.id.as_uuid())
        .bind(lead.owner_id.as_uuid())
        .bind(lead.name.as_str())
        .bind(lead.email.as_deref())
        .bind(lead.phone.as_deref())
        .bind(lead.company.as_deref())
        .bind(lead.status.as_str())
        .bind(lead.notes.as_deref())
        .bind(lead.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|error| internal("update lead", error))?;

        Ok(())
    }

    async fn delete(&self, workspace_id: WorkspaceId, lead_id: LeadId) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM leads WHERE workspace_id = $1 AND id = $2")
            .bind(workspace_id.as_uuid())
            .bind(lead_id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(|error| internal("delete lead", error))?;

        Ok(result.rows_affected() > 0)
    }
}
