//! Registration, login and the authenticated-user endpoint.

mod token;

use axum::Json;
use axum::extract::{Extension, State};
use axum::http::StatusCode;
use eleads_application::{AuthOutcome, RegistrationRequest};
use eleads_core::AppError;
use eleads_domain::Principal;
use tracing::{info, warn};

use crate::dto::{
    ApiEnvelope, CurrentUserResponse, LoginRequest, LoginResponse, RegisterRequest,
    RegisterResponse, UserResponse,
};
use crate::error::{ApiJson, ApiResult, RegistrationError};
use crate::state::AppState;

pub use token::TokenCodec;


const INVALID_CREDENTIALS_MESSAGE: &str = "Invalid email or password.";

/// POST /users/register - Create an account and found or join a workspace.
pub async fn register_handler(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<RegisterRequest>,
) -> Result<(StatusCode, Json<ApiEnvelope<RegisterResponse>>), RegistrationError> {
    let request = RegistrationRequest::try_from(payload)?;
    let account = state.registration_service.register(request).await?;

    info!(
        user_id = %account.user.id,
        workspace_id = %account.workspace.id(),
        role = account.user.role.as_str(),
        "user registered"
    );

    Ok((
        StatusCode::CREATED,
        Json(ApiEnvelope::ok(
            "User registered successfully.",
            RegisterResponse::from(account),
        )),
    ))
}

/// POST /users/login - Exchange credentials for a bearer token.
pub async fn login_handler(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<LoginRequest>,
) -> ApiResult<Json<ApiEnvelope<LoginResponse>>> {
    let user = match state
        .user_service
        .login(&payload.email, &payload.password)
        .await?
    {
        AuthOutcome::Authenticated(user) => user,
        AuthOutcome::Failed => {
            warn!("login failed");
            return Err(AppError::Unauthorized(INVALID_CREDENTIALS_MESSAGE.to_owned()).into());
        }
    };

    let issued = state.token_codec.issue(&user)?;
    info!(user_id = %user.id, workspace_id = %user.workspace_id, "user logged in");

    Ok(Json(ApiEnvelope::ok(
        "Login successful.",
        LoginResponse {
            token: issued.token,
            token_type: "Bearer",
            expires_at: issued.expires_at.to_rfc3339(),
            user: user.into(),
        },
    )))
}

/// GET /users/me - The caller's record and effective permissions.
pub async fn me_handler(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
) -> ApiResult<Json<ApiEnvelope<CurrentUserResponse>>> {
    let user = state.user_service.current_user(&principal).await?;
    let effective_permissions = state
        .authorization_service
        .effective_permissions(&principal)
        .into_iter()
        .map(|permission| permission.as_str().to_owned())
        .collect();

    Ok(Json(ApiEnvelope::ok(
        "Current user retrieved.",
        CurrentUserResponse {
            user: UserResponse::from(user),
            effective_permissions,
        },
    )))
}
