use axum::extract::{Extension, Request, State};
use axum::http::{HeaderMap, header};
use axum::middleware::Next;
use axum::response::Response;
use eleads_core::AppError;
use eleads_domain::{AccessRequirement, Principal};

use crate::error::ApiResult;
use crate::state::AppState;

/// Verifies the bearer token and exposes the caller as a [`Principal`]
/// request extension.
///
/// The principal is rebuilt from the stored user, so deleted users are
/// rejected and access changes apply on the next request.
pub async fn require_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> ApiResult<Response> {
    let token = bearer_token(request.headers())
        .ok_or_else(|| AppError::Unauthorized("authentication required".to_owned()))?;
    let claimed = state.token_codec.verify(token)?;
    let user = state.user_service.current_user(&claimed).await?;

    request.extensions_mut().insert(user.principal());
    Ok(next.run(request).await)
}

/// Evaluates the route's [`AccessRequirement`] against the caller.
///
/// Route gates carry no resource, so ownership never applies here.
pub async fn require_access(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Extension(requirement): Extension<AccessRequirement>,
    request: Request,
    next: Next,
) -> ApiResult<Response> {
    state.authorization_service.require(
        &principal,
        &format!("{} {}", request.method(), request.uri().path()),
        &requirement,
        None,
    )?;

    Ok(next.run(request).await)
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;
    let token = token.trim();

    (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then_some(token)
}
