//! PostgreSQL-backed client repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};

use eleads_application::{ClientRecord, ClientRepository};
use eleads_core::{AppError, AppResult, WorkspaceId};
use eleads_domain::{ClientId, UserId};

use crate::postgres_errors::{foreign_key_violation, internal};

/// PostgreSQL implementation of the client repository port.
#[derive(Clone)]
pub struct PostgresClientRepository {
    pool: PgPool,
}

impl PostgresClientRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct ClientRow {
    id: uuid::Uuid,
    workspace_id: uuid::Uuid,
    owner_id: uuid::Uuid,
    name: String,
    email: Option<String>,
    phone: Option<String>,
    company: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<ClientRow> for ClientRecord {
    fn from(row: ClientRow) -> Self {
        Self {
            id: ClientId::from_uuid(row.id),
            workspace_id: WorkspaceId::from_uuid(row.workspace_id),
            owner_id: UserId::from_uuid(row.owner_id),
            name: row.name,
            email: row.email,
            phone: row.phone,
            company: row.company,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[async_trait]
impl ClientRepository for PostgresClientRepository {
    async fn list(&self, workspace_id: WorkspaceId) -> AppResult<Vec<ClientRecord>> {
        let rows = sqlx::query_as::<_, ClientRow>(
            r#"
            SELECT id, workspace_id, owner_id, name, email, phone, company, created_at, updated_at
            FROM clients
            WHERE workspace_id = $1
            ORDER BY name
            "#,
        )
        .bind(workspace_id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(|error| internal("list clients", error))?;

        Ok(rows.into_iter().map(ClientRecord::from).collect())
    }

    async fn find(
        &self,
        workspace_id: WorkspaceId,
        client_id: ClientId,
    ) -> AppResult<Option<ClientRecord>> {
        let row = sqlx::query_as::<_, ClientRow>(
            r#"
            SELECT id, workspace_id, owner_id, name, email, phone, company, created_at, updated_at
            FROM clients
            WHERE workspace_id = $1 AND id = $2
            "#,
        )
        .bind(workspace_id.as_uuid())
        .bind(client_id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| internal("find client", error))?;

        Ok(row.map(ClientRecord::from))
    }

    async fn insert(&self, client: &ClientRecord) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO clients (
                id, workspace_id, owner_id, name, email, phone, company, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(client.id.as_uuid())
        .bind(client.workspace_id.as_uuid())
        .bind(client.owner_id.as_uuid())
        .bind(client.name.as_str())
        .bind(client.email.as_deref())
        .bind(client.phone.as_deref())
        .bind(client.company.as_deref())
        .bind(client.created_at)
        .bind(client.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|error| internal("create client", error))?;

        Ok(())
    }

    async fn update(&self, client: &ClientRecord) -> AppResult<()> {
        sqlx::query(
            r#"
            UPDATE clients
            SET name = $3, email = $4, phone = $5, company = $6, updated_at = $7
            WHERE workspace_id = $1 AND id = $2
            "#,
        )
        .bind(client.workspace_id.as_uuid())
        .bind(client.id.as_uuid())
        .bind(client.name.as_str())
        .bind(client.email.as_deref())
        .bind(client.phone.as_deref())
        .bind(client.company.as_deref())
        .bind(client.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|error| internal("update client", error))?;

        Ok(())
    }

    async fn delete(&self, workspace_id: WorkspaceId, client_id: ClientId) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM clients WHERE workspace_id = $1 AND id = $2")
            .bind(workspace_id.as_uuid())
            .bind(client_id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(|error| {
                if foreign_key_violation(&error).is_some() {
                    return AppError::Conflict(format!(
                        "client '{client_id}' still has invoices"
                    ));
                }
                internal("delete client", error)
            })?;

        Ok(result.rows_affected() > 0)
    }
}
