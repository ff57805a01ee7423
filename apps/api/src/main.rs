//! ELeads API composition root.

#![forbid(unsafe_code)]

mod api_config;
mod api_router;
mod api_services;
mod auth;
mod dto;
mod error;
mod handlers;
mod middleware;
mod state;

#[cfg(test)]
mod test_support;

use eleads_core::AppError;
use tracing::info;

use crate::api_config::{ApiConfig, init_tracing};
use crate::api_services::RepositorySet;
use crate::auth::TokenCodec;

#[tokio::main]
async fn main() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = ApiConfig::load()?;
    let pool = api_services::connect(&config.database_url).await?;
    api_services::run_migrations(&pool).await?;

    if config.migrate_only {
        return Ok(());
    }

    let role_permissions = config.role_permissions()?;
    let app_state = api_services::build_app_state(
        RepositorySet::postgres(&pool),
        role_permissions,
        TokenCodec::new(&config.jwt_secret, config.jwt_ttl_minutes),
    );
    let app = api_router::build_router(app_state, &config.frontend_url)?;

    let address = config.socket_address()?;
    let listener = tokio::net::TcpListener::bind(address)
        .await
        .map_err(|error| AppError::Internal(format!("failed to bind {address}: {error}")))?;

    info!(%address, "eleads api listening");
    axum::serve(listener, app)
        .await
        .map_err(|error| AppError::Internal(format!("server error: {error}")))
}
