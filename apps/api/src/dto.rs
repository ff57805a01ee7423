//! Transport types shared with the web client.

mod billing;
mod common;
mod leads;
mod security;
mod users;

pub use billing::{InvoiceRequest, InvoiceResponse, InvoiceStatusRequest};
pub use common::{ApiEnvelope, HealthResponse};
pub use leads::{AssignLeadRequest, ClientRequest, ClientResponse, LeadRequest, LeadResponse};
pub use security::RolePermissionsResponse;
pub use users::{
    CurrentUserResponse, LoginRequest, LoginResponse, RegisterRequest, RegisterResponse,
    UpdateUserAccessRequest, UserResponse, WorkspaceResponse,
};
