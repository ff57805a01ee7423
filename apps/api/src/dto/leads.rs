use eleads_application::{ClientInput, ClientRecord, LeadInput, LeadRecord};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Incoming payload for lead creation and replacement.
#[derive(Debug, Default, Deserialize, TS)]
#[serde(default)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/lead-request.ts"
)]
pub struct LeadRequest {
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub company: Option<String>,
    /// Pipeline stage such as `NEW` or `QUALIFIED`; `NEW` when absent.
    pub status: Option<String>,
    pub notes: Option<String>,
}

impl From<LeadRequest> for LeadInput {
    fn from(value: LeadRequest) -> Self {
        Self {
            name: value.name,
            email: value.email,
            phone: value.phone,
            company: value.company,
            status: value.status,
            notes: value.notes,
        }
    }
}

/// Incoming payload transferring a lead to another member.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/assign-lead-request.ts"
)]
pub struct AssignLeadRequest {
    pub user_id: String,
}

/// API representation of a lead.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/lead-response.ts"
)]
pub struct LeadResponse {
    pub id: String,
    pub owner_id: String,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub company: Option<String>,
    pub status: String,
    pub notes: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<LeadRecord> for LeadResponse {
    fn from(lead: LeadRecord) -> Self {
        Self {
            id: lead.id.to_string(),
            owner_id: lead.owner_id.to_string(),
            name: lead.name,
            email: lead.email,
            phone: lead.phone,
            company: lead.company,
            status: lead.status.as_str().to_owned(),
            notes: lead.notes,
            created_at: lead.created_at.to_rfc3339(),
            updated_at: lead.updated_at.to_rfc3339(),
        }
    }
}

/// Incoming payload for client creation and replacement.
#[derive(Debug, Default, Deserialize, TS)]
#[serde(default)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/client-request.ts"
)]
pub struct ClientRequest {
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub company: Option<String>,
}

impl From<ClientRequest> for ClientInput {
    fn from(value: ClientRequest) -> Self {
        Self {
            name: value.name,
            email: value.email,
            phone: value.phone,
            company: value.company,
        }
    }
}

/// API representation of a client.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/client-response.ts"
)]
pub struct ClientResponse {
    pub id: String,
    pub owner_id: String,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub company: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<ClientRecord> for ClientResponse {
    fn from(client: ClientRecord) -> Self {
        Self {
            id: client.id.to_string(),
            owner_id: client.owner_id.to_string(),
            name: client.name,
            email: client.email,
            phone: client.phone,
            company: client.company,
            created_at: client.created_at.to_rfc3339(),
            updated_at: client.updated_at.to_rfc3339(),
        }
    }
}
