use axum::Json;
use axum::extract::{Extension, Path, State};
use axum::http::StatusCode;
use eleads_application::InvoiceInput;
use eleads_domain::{InvoiceId, Principal};
use tracing::info;

use crate::dto::{ApiEnvelope, InvoiceRequest, InvoiceResponse, InvoiceStatusRequest};
use crate::error::{ApiJson, ApiResult};
use crate::state::AppState;

#[cfg(test)]
mod tests;

pub async fn list_invoices_handler(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
) -> ApiResult<Json<ApiEnvelope<Vec<InvoiceResponse>>>> {
    let invoices = state
        .invoice_service
        .list_invoices(&principal)
        .await?
        .into_iter()
        .map(InvoiceResponse::from)
        .collect();

    Ok(Json(ApiEnvelope::ok("Invoices retrieved.", invoices)))
}

pub async fn get_invoice_handler(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(invoice_id): Path<String>,
) -> ApiResult<Json<ApiEnvelope<InvoiceResponse>>> {
    let invoice_id = InvoiceId::parse(&invoice_id)?;
    let invoice = state
        .invoice_service
        .get_invoice(&principal, invoice_id)
        .await?;

    Ok(Json(ApiEnvelope::ok("Invoice retrieved.", invoice.into())))
}

pub async fn create_invoice_handler(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    ApiJson(payload): ApiJson<InvoiceRequest>,
) -> ApiResult<(StatusCode, Json<ApiEnvelope<InvoiceResponse>>)> {
    let input = InvoiceInput::try_from(payload)?;
    let invoice = state
        .invoice_service
        .create_invoice(&principal, input)
        .await?;
    info!(
        invoice_id = %invoice.id,
        client_id = %invoice.client_id,
        number = %invoice.number,
        "invoice created"
    );

    Ok((
        StatusCode::CREATED,
        Json(ApiEnvelope::ok("Invoice created.", invoice.into())),
    ))
}

pub async fn update_invoice_handler(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(invoice_id): Path<String>,
    ApiJson(payload): ApiJson<InvoiceRequest>,
) -> ApiResult<Json<ApiEnvelope<InvoiceResponse>>> {
    let invoice_id = InvoiceId::parse(&invoice_id)?;
    let input = InvoiceInput::try_from(payload)?;
    let invoice = state
        .invoice_service
        .update_invoice(&principal, invoice_id, input)
        .await?;

    Ok(Json(ApiEnvelope::ok("Invoice updated.", invoice.into())))
}

/// PUT /invoices/{invoice_id}/status - Move an invoice through its lifecycle.
pub async fn set_invoice_status_handler(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(invoice_id): Path<String>,
    ApiJson(payload): ApiJson<InvoiceStatusRequest>,
) -> ApiResult<Json<ApiEnvelope<InvoiceResponse>>> {
    let invoice_id = InvoiceId::parse(&invoice_id)?;
    let invoice = state
        .invoice_service
        .set_invoice_status(&principal, invoice_id, payload.status.trim())
        .await?;
    info!(%invoice_id, status = invoice.status.as_str(), "invoice status changed");

    Ok(Json(ApiEnvelope::ok(
        "Invoice status updated.",
        invoice.into(),
    )))
}

pub async fn delete_invoice_handler(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(invoice_id): Path<String>,
) -> ApiResult<Json<ApiEnvelope<()>>> {
    let invoice_id = InvoiceId::parse(&invoice_id)?;
    state
        .invoice_service
        .delete_invoice(&principal, invoice_id)
        .await?;
    info!(%invoice_id, actor_id = %principal.id(), "invoice deleted");

    Ok(Json(ApiEnvelope::message_only("Invoice deleted.")))
}
