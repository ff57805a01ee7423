use axum::Json;
use axum::extract::{Extension, Path, State};
use eleads_domain::{Principal, UserId};
use tracing::info;

use crate::dto::{ApiEnvelope, UpdateUserAccessRequest, UserResponse};
use crate::error::{ApiJson, ApiResult};
use crate::state::AppState;

/// GET /users - Members of the caller's workspace.
pub async fn list_users_handler(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
) -> ApiResult<Json<ApiEnvelope<Vec<UserResponse>>>> {
    let users = state
        .user_service
        .list_users(&principal)
        .await?
        .into_iter()
        .map(UserResponse::from)
        .collect();

    Ok(Json(ApiEnvelope::ok("Users retrieved.", users)))
}

/// PUT /users/{user_id}/access - Replace a member's role and explicit grants.
pub async fn update_user_access_handler(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(user_id): Path<String>,
    ApiJson(payload): ApiJson<UpdateUserAccessRequest>,
) -> ApiResult<Json<ApiEnvelope<UserResponse>>> {
    let user_id = UserId::parse(&user_id)?;
    let (role, permissions) = payload.parse()?;
    let user = state
        .user_service
        .update_user_access(&principal, user_id, role, permissions)
        .await?;

    info!(
        actor_id = %principal.id(),
        user_id = %user.id,
        role = user.role.as_str(),
        "user access updated"
    );

    Ok(Json(ApiEnvelope::ok(
        "User access updated.",
        UserResponse::from(user),
    )))
}

/// DELETE /users/{user_id} - Remove a member from the workspace.
pub async fn delete_user_handler(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(user_id): Path<String>,
) -> ApiResult<Json<ApiEnvelope<()>>> {
    let user_id = UserId::parse(&user_id)?;
    state.user_service.delete_user(&principal, user_id).await?;
    info!(actor_id = %principal.id(), %user_id, "user deleted");

    Ok(Json(ApiEnvelope::message_only("User deleted.")))
}
