use axum::Json;
use axum::extract::{Extension, State};
use eleads_domain::Principal;

use crate::dto::{ApiEnvelope, WorkspaceResponse};
use crate::error::ApiResult;
use crate::state::AppState;

/// GET /workspace - The caller's workspace.
pub async fn workspace_handler(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
) -> ApiResult<Json<ApiEnvelope<WorkspaceResponse>>> {
    let workspace = state.user_service.current_workspace(&principal).await?;

    Ok(Json(ApiEnvelope::ok(
        "Workspace retrieved.",
        WorkspaceResponse::from(workspace),
    )))
}
