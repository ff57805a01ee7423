use axum::Json;
use axum::extract::{Extension, Path, State};
use axum::http::StatusCode;
use eleads_domain::{ClientId, Principal};
use tracing::info;

use crate::dto::{ApiEnvelope, ClientRequest, ClientResponse};
use crate::error::{ApiJson, ApiResult};
use crate::state::AppState;

pub async fn list_clients_handler(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
) -> ApiResult<Json<ApiEnvelope<Vec<ClientResponse>>>> {
    let clients = state
        .client_service
        .list_clients(&principal)
        .await?
        .into_iter()
        .map(ClientResponse::from)
        .collect();

    Ok(Json(ApiEnvelope::ok("Clients retrieved.", clients)))
}

pub async fn get_client_handler(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(client_id): Path<String>,
) -> ApiResult<Json<ApiEnvelope<ClientResponse>>> {
    let client_id = ClientId::parse(&client_id)?;
    let client = state.client_service.get_client(&principal, client_id).await?;

    Ok(Json(ApiEnvelope::ok("Client retrieved.", client.into())))
}

pub async fn create_client_handler(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    ApiJson(payload): ApiJson<ClientRequest>,
) -> ApiResult<(StatusCode, Json<ApiEnvelope<ClientResponse>>)> {
    let client = state
        .client_service
        .create_client(&principal, payload.into())
        .await?;
    info!(client_id = %client.id, owner_id = %client.owner_id, "client created");

    Ok((
        StatusCode::CREATED,
        Json(ApiEnvelope::ok("Client created.", client.into())),
    ))
}

pub async fn update_client_handler(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(client_id): Path<String>,
    ApiJson(payload): ApiJson<ClientRequest>,
) -> ApiResult<Json<ApiEnvelope<ClientResponse>>> {
    let client_id = ClientId::parse(&client_id)?;
    let client = state
        .client_service
        .update_client(&principal, client_id, payload.into())
        .await?;

    Ok(Json(ApiEnvelope::ok("Client updated.", client.into())))
}

pub async fn delete_client_handler(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(client_id): Path<String>,
) -> ApiResult<Json<ApiEnvelope<()>>> {
    let client_id = ClientId::parse(&client_id)?;
    state
        .client_service
        .delete_client(&principal, client_id)
        .await?;
    info!(%client_id, actor_id = %principal.id(), "client deleted");

    Ok(Json(ApiEnvelope::message_only("Client deleted.")))
}
