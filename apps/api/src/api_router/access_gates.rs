//! Route groups guarded by an [`AccessRequirement`] carried as a request
//! extension and evaluated by [`middleware::require_access`].

use axum::Router;
use axum::middleware::from_fn_with_state;
use axum::routing::{delete, get, put};
use eleads_application::access_policy;
use eleads_domain::AccessRequirement;

use crate::state::AppState;
use crate::{handlers, middleware};

pub(super) fn build_user_list_routes(app_state: AppState) -> Router<AppState> {
    gate(
        Router::new().route("/users", get(handlers::users::list_users_handler)),
        app_state,
        access_policy::user_list(),
    )
}

pub(super) fn build_user_admin_routes(app_state: AppState) -> Router<AppState> {
    gate(
        Router::new()
            .route(
                "/users/{user_id}/access",
                put(handlers::users::update_user_access_handler),
            )
            .route(
                "/users/{user_id}",
                delete(handlers::users::delete_user_handler),
            ),
        app_state,
        access_policy::user_admin(),
    )
}

pub(super) fn build_billing_read_routes(app_state: AppState) -> Router<AppState> {
    gate(
        Router::new()
            .route("/invoices", get(handlers::billing::list_invoices_handler))
            .route(
                "/invoices/{invoice_id}",
                get(handlers::billing::get_invoice_handler),
            ),
        app_state,
        access_policy::invoice_read(),
    )
}

fn gate(
    routes: Router<AppState>,
    app_state: AppState,
    requirement: AccessRequirement,
) -> Router<AppState> {
    routes
        .route_layer(from_fn_with_state(app_state, middleware::require_access))
        .layer(axum::Extension(requirement))
}
