//! PostgreSQL-backed workspace lookups and registration writes.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};

use eleads_application::WorkspaceRepository;
use eleads_core::{AppError, AppResult, WorkspaceId};
use eleads_domain::{Workspace, WorkspaceName};

use crate::postgres_errors::internal;

mod registration;

/// PostgreSQL implementation of the workspace and registration ports.
#[derive(Clone)]
pub struct PostgresWorkspaceRepository {
    pool: PgPool,
}

impl PostgresWorkspaceRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct WorkspaceRow {
    id: uuid::Uuid,
    name: String,
    created_at: DateTime<Utc>,
}

impl TryFrom<WorkspaceRow> for Workspace {
    type Error = AppError;

    fn try_from(row: WorkspaceRow) -> AppResult<Self> {
        let name = WorkspaceName::new(row.name).map_err(|error| {
            AppError::Internal(format!("workspace '{}' has a corrupt name: {error}", row.id))
        })?;

        Ok(Workspace::new(
            WorkspaceId::from_uuid(row.id),
            name,
            row.created_at,
        ))
    }
}

#[async_trait]
impl WorkspaceRepository for PostgresWorkspaceRepository {
    async fn find_by_name(&self, name: &WorkspaceName) -> AppResult<Option<Workspace>> {
        sqlx::query_as::<_, WorkspaceRow>(
            r#"
            SELECT id, name, created_at
            FROM workspaces
            WHERE lower(name) = lower($1)
            "#,
        )
        .bind(name.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| internal("find workspace by name", error))?
        .map(Workspace::try_from)
        .transpose()
    }

    async fn find_by_id(&self, workspace_id: WorkspaceId) -> AppResult<Option<Workspace>> {
        sqlx::query_as::<_, WorkspaceRow>(
            r#"
            SELECT id, name, created_at
            FROM workspaces
            WHERE id = $1
            "#,
        )
        .bind(workspace_id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| internal("find workspace", error))?
        .map(Workspace::try_from)
        .transpose()
    }
}
