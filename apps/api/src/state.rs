use std::sync::Arc;

use eleads_application::{
    AuthorizationService, ClientService, InvoiceService, LeadService, RegistrationService,
    UserService,
};

use crate::auth::TokenCodec;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub registration_service: RegistrationService,
    pub user_service: UserService,
    pub lead_service: LeadService,
    pub client_service: ClientService,
    pub invoice_service: InvoiceService,
    pub authorization_service: AuthorizationService,
    pub token_codec: Arc<TokenCodec>,
}
