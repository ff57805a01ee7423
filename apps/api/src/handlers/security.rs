use axum::Json;
use axum::extract::State;

use crate::dto::{ApiEnvelope, RolePermissionsResponse};
use crate::state::AppState;

/// GET /api/security/role-permissions - The active role default permissions.
pub async fn role_permissions_handler(
    State(state): State<AppState>,
) -> Json<ApiEnvelope<RolePermissionsResponse>> {
    Json(ApiEnvelope::ok(
        "Role permissions retrieved.",
        RolePermissionsResponse::from(state.authorization_service.role_permissions()),
    ))
}
