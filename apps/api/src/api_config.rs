use std::env;
use std::fs;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;

use eleads_core::AppError;
use eleads_domain::RolePermissionMap;
use tracing::info;
use tracing_subscriber::EnvFilter;

const JWT_SECRET_MIN_LENGTH: usize = 32;
const DEFAULT_JWT_TTL_MINUTES: i64 = 24 * 60;

#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub migrate_only: bool,
    pub database_url: String,
    pub frontend_url: String,
    pub jwt_secret: String,
    pub jwt_ttl_minutes: i64,
    pub api_host: String,
    pub api_port: u16,
    pub role_permissions_path: Option<String>,
}

impl ApiConfig {
    pub fn load() -> Result<Self, AppError> {
        let migrate_only = env::args().nth(1).as_deref() == Some("migrate");

        let database_url = required_env("DATABASE_URL")?;
        let frontend_url =
            env::var("FRONTEND_URL").unwrap_or_else(|_| "http://localhost:3000".to_owned());
        let jwt_secret = required_non_empty_env("JWT_SECRET")?;
        if jwt_secret.len() < JWT_SECRET_MIN_LENGTH {
            return Err(AppError::Validation(format!(
                "JWT_SECRET must be at least {JWT_SECRET_MIN_LENGTH} characters"
            )));
        }

        let jwt_ttl_minutes = match env::var("JWT_TTL_MINUTES") {
            Ok(value) => value
                .trim()
                .parse::<i64>()
                .ok()
                .filter(|minutes| *minutes > 0)
                .ok_or_else(|| {
                    AppError::Validation(format!(
                        "JWT_TTL_MINUTES must be a positive integer, got '{value}'"
                    ))
                })?,
            Err(_) => DEFAULT_JWT_TTL_MINUTES,
        };

        let api_host = env::var("API_HOST").unwrap_or_else(|_| "127.0.0.1".to_owned());
        let api_port = env::var("API_PORT")
            .ok()
            .and_then(|value| value.parse::<u16>().ok())
            .unwrap_or(3001);

        let role_permissions_path = env::var("ROLE_PERMISSIONS_PATH")
            .ok()
            .filter(|value| !value.trim().is_empty());

        Ok(Self {
            migrate_only,
            database_url,
            frontend_url,
            jwt_secret,
            jwt_ttl_minutes,
            api_host,
            api_port,
            role_permissions_path,
        })
    }

    pub fn socket_address(&self) -> Result<SocketAddr, AppError> {
        let ip = IpAddr::from_str(&self.api_host)
            .map_err(|error| AppError::Validation(format!("invalid API_HOST: {error}")))?;

        Ok(SocketAddr::from((ip, self.api_port)))
    }

    /// Loads the role default permissions, falling back to the built-in map.
    pub fn role_permissions(&self) -> Result<RolePermissionMap, AppError> {
        let Some(path) = self.role_permissions_path.as_deref() else {
            return Ok(RolePermissionMap::default());
        };

        let contents = fs::read_to_string(path).map_err(|error| {
            AppError::Internal(format!(
                "failed to read ROLE_PERMISSIONS_PATH '{path}': {error}"
            ))
        })?;
        let map = RolePermissionMap::from_json(&contents)?;
        info!(%path, "loaded role permission overrides");

        Ok(map)
    }
}

pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .compact()
        .init();
}

fn required_env(name: &str) -> Result<String, AppError> {
    env::var(name).map_err(|_| AppError::Validation(format!("{name} is required")))
}

fn required_non_empty_env(name: &str) -> Result<String, AppError> {
    let value = required_env(name)?;
    if value.trim().is_empty() {
        return Err(AppError::Validation(format!("{name} must not be empty")));
    }

    Ok(value)
}
