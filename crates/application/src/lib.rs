//! Application services and ports.

#![forbid(unsafe_code)]

pub mod access_policy;

mod account_ports;
mod authorization_service;
mod client_service;
mod invoice_service;
mod lead_service;
mod registration_service;
mod user_service;

#[cfg(test)]
mod test_support;

pub use account_ports::{
    NewAccount, NewUser, PasswordHasher, RegisteredAccount, RegistrationRepository,
    USER_EXISTS_MESSAGE, UserRecord, UserRepository, WORKSPACE_EXISTS_MESSAGE,
    WORKSPACE_NOT_FOUND_MESSAGE, WorkspacePlan, WorkspaceRepository,
};
pub use authorization_service::AuthorizationService;
pub use client_service::{ClientInput, ClientRecord, ClientRepository, ClientService};
pub use invoice_service::{InvoiceInput, InvoiceRecord, InvoiceRepository, InvoiceService};
pub use lead_service::{LeadInput, LeadRecord, LeadRepository, LeadService};
pub use registration_service::{RegistrationRequest, RegistrationService};
pub use user_service::{AuthOutcome, UserService};
