use axum::Router;
use axum::middleware::from_fn_with_state;
use axum::routing::{get, post, put};
use eleads_core::AppError;
use tower_http::trace::TraceLayer;

use crate::state::AppState;
use crate::{auth, handlers, middleware};

mod access_gates;
mod cors;

#[cfg(test)]
mod tests;

pub fn build_router(app_state: AppState, frontend_url: &str) -> Result<Router, AppError> {
    let protected_routes = Router::new()
        .route("/users/me", get(auth::me_handler))
        .route("/workspace", get(handlers::workspace::workspace_handler))
        .route(
            "/api/security/role-permissions",
            get(handlers::security::role_permissions_handler),
        )
        .route(
            "/leads",
            get(handlers::leads::list_leads_handler).post(handlers::leads::create_lead_handler),
        )
        .route(
            "/leads/{lead_id}",
            get(handlers::leads::get_lead_handler)
                .put(handlers::leads::update_lead_handler)
                .delete(handlers::leads::delete_lead_handler),
        )
        .route(
            "/leads/{lead_id}/assign",
            put(handlers::leads::assign_lead_handler),
        )
        .route(
            "/clients",
            get(handlers::clients::list_clients_handler)
                .post(handlers::clients::create_client_handler),
        )
        .route(
            "/clients/{client_id}",
            get(handlers::clients::get_client_handler)
                .put(handlers::clients::update_client_handler)
                .delete(handlers::clients::delete_client_handler),
        )
        .route("/invoices", post(handlers::billing::create_invoice_handler))
        .route(
            "/invoices/{invoice_id}",
            put(handlers::billing::update_invoice_handler)
                .delete(handlers::billing::delete_invoice_handler),
        )
        .route(
            "/invoices/{invoice_id}/status",
            put(handlers::billing::set_invoice_status_handler),
        )
        .merge(access_gates::build_user_list_routes(app_state.clone()))
        .merge(access_gates::build_user_admin_routes(app_state.clone()))
        .merge(access_gates::build_billing_read_routes(app_state.clone()))
        .route_layer(from_fn_with_state(
            app_state.clone(),
            middleware::require_auth,
        ));

    Ok(Router::new()
        .route("/health", get(handlers::health::health_handler))
        .route("/users/register", post(auth::register_handler))
        .route("/users/login", post(auth::login_handler))
        .merge(protected_routes)
        .layer(TraceLayer::new_for_http())
        .layer(cors::build_cors_layer(frontend_url)?)
        .with_state(app_state))
}
