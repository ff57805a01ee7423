//! PostgreSQL-backed user repository.

use std::str::FromStr;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};

use eleads_application::{UserRecord, UserRepository};
use eleads_core::{AppError, AppResult, WorkspaceId};
use eleads_domain::{Permission, Role, UserId};

use crate::postgres_errors::{foreign_key_violation, internal};

pub(crate) const USER_COLUMNS: &str =
    "id, workspace_id, email, first_name, last_name, password_hash, role, permissions, created_at";

/// PostgreSQL implementation of the user repository port.
#[derive(Clone)]
pub struct PostgresUserRepository {
    pool: PgPool,
}

impl PostgresUserRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
pub(crate) struct UserRow {
    id: uuid::Uuid,
    workspace_id: uuid::Uuid,
    email: String,
    first_name: String,
    last_name: String,
    password_hash: String,
    role: String,
    permissions: Vec<String>,
    created_at: DateTime<Utc>,
}

impl TryFrom<UserRow> for UserRecord {
    type Error = AppError;

    fn try_from(row: UserRow) -> AppResult<Self> {
        let role = Role::from_str(&row.role).map_err(|error| {
            AppError::Internal(format!("user '{}' has a corrupt role: {error}", row.id))
        })?;
        let permissions = row
            .permissions
            .iter()
            .map(|value| value.parse::<Permission>())
            .collect::<AppResult<Vec<_>>>()
            .map_err(|error| {
                AppError::Internal(format!("user '{}' has corrupt permissions: {error}", row.id))
            })?;

        Ok(Self {
            id: UserId::from_uuid(row.id),
            workspace_id: WorkspaceId::from_uuid(row.workspace_id),
            email: row.email,
            first_name: row.first_name,
            last_name: row.last_name,
            password_hash: row.password_hash,
            role,
            permissions,
            created_at: row.created_at,
        })
    }
}

pub(crate) fn permission_values(permissions: &[Permission]) -> Vec<String> {
    permissions
        .iter()
        .map(|permission| permission.as_str().to_owned())
        .collect()
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn find_by_email(&self, email: &str) -> AppResult<Option<UserRecord>> {
        sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE lower(email) = lower($1)"
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| internal("find user by email", error))?
        .map(UserRecord::try_from)
        .transpose()
    }

    async fn find_by_id(
        &self,
        workspace_id: WorkspaceId,
        user_id: UserId,
    ) -> AppResult<Option<UserRecord>> {
        sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE workspace_id = $1 AND id = $2"
        ))
        .bind(workspace_id.as_uuid())
        .bind(user_id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| internal("find user", error))?
        .map(UserRecord::try_from)
        .transpose()
    }

    async fn list_for_workspace(&self, workspace_id: WorkspaceId) -> AppResult<Vec<UserRecord>> {
        sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE workspace_id = $1 ORDER BY email"
        ))
        .bind(workspace_id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(|error| internal("list workspace users", error))?
        .into_iter()
        .map(UserRecord::try_from)
        .collect()
    }

    async fn update_access(
        &self,
        workspace_id: WorkspaceId,
        user_id: UserId,
        role: Role,
        permissions: &[Permission],
    ) -> AppResult<Option<UserRecord>> {
        sqlx::query_as::<_, UserRow>(&format!(
            r#"
            UPDATE users
            SET role = $3, permissions = $4, updated_at = now()
            WHERE workspace_id = $1 AND id = $2
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(workspace_id.as_uuid())
        .bind(user_id.as_uuid())
        .bind(role.as_str())
        .bind(permission_values(permissions))
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| internal("update user access", error))?
        .map(UserRecord::try_from)
        .transpose()
    }

    async fn delete(&self, workspace_id: WorkspaceId, user_id: UserId) -> AppResult<bool> {
        let result = sqlx::query(
            r#"
            DELETE FROM users
            WHERE workspace_id = $1 AND id = $2
            "#,
        )
        .bind(workspace_id.as_uuid())
        .bind(user_id.as_uuid())
        .execute(&self.pool)
        .await
        .map_err(|error| {
            if foreign_key_violation(&error).is_some() {
                return AppError::Conflict(
                    "user still owns workspace records; reassign them first".to_owned(),
                );
            }
            internal("delete user", error)
        })?;

        Ok(result.rows_affected() > 0)
    }
}
