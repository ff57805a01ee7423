use chrono::NaiveDate;
use eleads_application::{InvoiceInput, InvoiceRecord};
use eleads_core::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Incoming payload for invoice creation and replacement.
#[derive(Debug, Default, Deserialize, TS)]
#[serde(default)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/invoice-request.ts"
)]
pub struct InvoiceRequest {
    pub client_id: String,
    pub number: String,
    #[ts(type = "number")]
    pub amount_cents: i64,
    pub currency: String,
    /// `YYYY-MM-DD`.
    pub due_date: Option<String>,
}

impl TryFrom<InvoiceRequest> for InvoiceInput {
    type Error = AppError;

    fn try_from(value: InvoiceRequest) -> AppResult<Self> {
        let due_date = value
            .due_date
            .as_deref()
            .map(str::trim)
            .filter(|date| !date.is_empty())
            .map(|date| {
                NaiveDate::parse_from_str(date, "%Y-%m-%d").map_err(|_| {
                    AppError::Validation(format!("due_date '{date}' is not a YYYY-MM-DD date"))
                })
            })
            .transpose()?;

        Ok(Self {
            client_id: value.client_id,
            number: value.number,
            amount_cents: value.amount_cents,
            currency: value.currency,
            due_date,
        })
    }
}

/// Incoming payload moving an invoice through its lifecycle.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/invoice-status-request.ts"
)]
pub struct InvoiceStatusRequest {
    pub status: String,
}

/// API representation of an invoice.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/invoice-response.ts"
)]
pub struct InvoiceResponse {
    pub id: String,
    pub client_id: String,
    pub created_by: String,
    pub number: String,
    #[ts(type = "number")]
    pub amount_cents: i64,
    pub currency: String,
    pub status: String,
    pub due_date: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<InvoiceRecord> for InvoiceResponse {
    fn from(invoice: InvoiceRecord) -> Self {
        Self {
            id: invoice.id.to_string(),
            client_id: invoice.client_id.to_string(),
            created_by: invoice.created_by.to_string(),
            number: invoice.number,
            amount_cents: invoice.amount_cents,
            currency: invoice.currency,
            status: invoice.status.as_str().to_owned(),
            due_date: invoice
                .due_date
                .map(|date| date.format("%Y-%m-%d").to_string()),
            created_at: invoice.created_at.to_rfc3339(),
            updated_at: invoice.updated_at.to_rfc3339(),
        }
    }
}
