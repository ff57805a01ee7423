use axum::Json;
use axum::extract::{Extension, Path, State};
use axum::http::StatusCode;
use eleads_domain::{LeadId, Principal, UserId};
use tracing::info;

use crate::dto::{ApiEnvelope, AssignLeadRequest, LeadRequest, LeadResponse};
use crate::error::{ApiJson, ApiResult};
use crate::state::AppState;


pub async fn list_leads_handler(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
) -> ApiResult<Json<ApiEnvelope<Vec<LeadResponse>>>> {
    let leads = state
        .lead_service
        .list_leads(&principal)
        .await?
        .into_iter()
        .map(LeadResponse::from)
        .collect();

    Ok(Json(ApiEnvelope::ok("Leads retrieved.", leads)))
}

pub async fn get_lead_handler(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(lead_id): Path<String>,
) -> ApiResult<Json<ApiEnvelope<LeadResponse>>> {
    let lead_id = LeadId::parse(&lead_id)?;
    let lead = state.lead_service.get_lead(&principal, lead_id).await?;

    Ok(Json(ApiEnvelope::ok("Lead retrieved.", lead.into())))
}

pub async fn create_lead_handler(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    ApiJson(payload): ApiJson<LeadRequest>,
) -> ApiResult<(StatusCode, Json<ApiEnvelope<LeadResponse>>)> {
    let lead = state
        .lead_service
        .create_lead(&principal, payload.into())
        .await?;
    info!(lead_id = %lead.id, owner_id = %lead.owner_id, "lead created");

    Ok((
        StatusCode::CREATED,
        Json(ApiEnvelope::ok("Lead created.", lead.into())),
    ))
}

pub async fn update_lead_handler(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(lead_id): Path<String>,
    ApiJson(payload): ApiJson<LeadRequest>,
) -> ApiResult<Json<ApiEnvelope<LeadResponse>>> {
    let lead_id = LeadId::parse(&lead_id)?;
    let lead = state
        .lead_service
        .update_lead(&principal, lead_id, payload.into())
        .await?;

    Ok(Json(ApiEnvelope::ok("Lead updated.", lead.into())))
}

pub async fn delete_lead_handler(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(lead_id): Path<String>,
) -> ApiResult<Json<ApiEnvelope<()>>> {
    let lead_id = LeadId::parse(&lead_id)?;
    state.lead_service.delete_lead(&principal, lead_id).await?;
    info!(%lead_id, actor_id = %principal.id(), "lead deleted");

    Ok(Json(ApiEnvelope::message_only("Lead deleted.")))
}

/// PUT /leads/{lead_id}/assign - Hand a lead to another member.
pub async fn assign_lead_handler(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(lead_id): Path<String>,
    ApiJson(payload): ApiJson<AssignLeadRequest>,
) -> ApiResult<Json<ApiEnvelope<LeadResponse>>> {
    let lead_id = LeadId::parse(&lead_id)?;
    let assignee_id = UserId::parse(&payload.user_id)?;
    let lead = state
        .lead_service
        .assign_lead(&principal, lead_id, assignee_id)
        .await?;
    info!(%lead_id, %assignee_id, actor_id = %principal.id(), "lead assigned");

    Ok(Json(ApiEnvelope::ok("Lead assigned.", lead.into())))
}
