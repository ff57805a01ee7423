use eleads_application::{
    NewAccount, RegisteredAccount, RegistrationRepository, USER_EXISTS_MESSAGE, UserRecord,
    WORKSPACE_EXISTS_MESSAGE, WORKSPACE_NOT_FOUND_MESSAGE, WorkspacePlan,
};
use eleads_domain::UserId;
use sqlx::{Postgres, Transaction};

use crate::postgres_errors::{foreign_key_violation, unique_violation};
use crate::postgres_user_repository::{USER_COLUMNS, UserRow};

use super::*;

#[async_trait]
impl RegistrationRepository for PostgresWorkspaceRepository {
    async fn create_account(&self, account: NewAccount) -> AppResult<RegisteredAccount> {
        let mut transaction = self
            .pool
            .begin()
            .await
            .map_err(|error| internal("begin registration transaction", error))?;

        let workspace = match &account.workspace {
            WorkspacePlan::Create(name) => insert_workspace(&mut transaction, name).await?,
            WorkspacePlan::Join(workspace_id) => {
                lock_workspace(&mut transaction, *workspace_id).await?
            }
        };

        let user = sqlx::query_as::<_, UserRow>(&format!(
            r#"
            INSERT INTO users (
                id, workspace_id, email, first_name, last_name, password_hash, role
            )
            VALUES ($1, $2, lower($3), $4, $5, $6, $7)
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(UserId::new().as_uuid())
        .bind(workspace.id().as_uuid())
        .bind(account.user.email.as_str())
        .bind(account.user.name.first_name())
        .bind(account.user.name.last_name())
        .bind(account.user.password_hash.as_str())
        .bind(account.role.as_str())
        .fetch_one(&mut *transaction)
        .await
        .map_err(|error| {
            if unique_violation(&error).is_some() {
                return AppError::Conflict(USER_EXISTS_MESSAGE.to_owned());
            }
            if foreign_key_violation(&error).is_some() {
                return AppError::NotFound(WORKSPACE_NOT_FOUND_MESSAGE.to_owned());
            }
            internal("create user", error)
        })?;
        let user = UserRecord::try_from(user)?;

        transaction
            .commit()
            .await
            .map_err(|error| internal("commit registration", error))?;

        tracing::info!(
            user_id = %user.id,
            workspace_id = %workspace.id(),
            role = user.role.as_str(),
            "registered account"
        );

        Ok(RegisteredAccount { user, workspace })
    }
}

async fn insert_workspace(
    transaction: &mut Transaction<'_, Postgres>,
    name: &WorkspaceName,
) -> AppResult<Workspace> {
    let row = sqlx::query_as::<_, WorkspaceRow>(
        r#"
        INSERT INTO workspaces (id, name)
        VALUES ($1, $2)
        RETURNING id, name, created_at
        "#,
    )
    .bind(WorkspaceId::new().as_uuid())
    .bind(name.as_str())
    .fetch_one(&mut **transaction)
    .await
    .map_err(|error| {
        if unique_violation(&error).is_some() {
            return AppError::Conflict(WORKSPACE_EXISTS_MESSAGE.to_owned());
        }
        internal("create workspace", error)
    })?;

    Workspace::try_from(row)
}

async fn lock_workspace(
    transaction: &mut Transaction<'_, Postgres>,
    workspace_id: WorkspaceId,
) -> AppResult<Workspace> {
    let row = sqlx::query_as::<_, WorkspaceRow>(
        r#"
        SELECT id, name, created_at
        FROM workspaces
        WHERE id = $1
        FOR SHARE
        "#,
    )
    .bind(workspace_id.as_uuid())
    .fetch_optional(&mut **transaction)
    .await
    .map_err(|error| internal("lock workspace", error))?
    .ok_or_else(|| AppError::NotFound(WORKSPACE_NOT_FOUND_MESSAGE.to_owned()))?;

    Workspace::try_from(row)
}
