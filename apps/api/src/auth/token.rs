use chrono::{DateTime, Duration, Utc};
use eleads_application::UserRecord;
use eleads_core::{AppError, AppResult, WorkspaceId};
use eleads_domain::{Permission, Principal, Role, UserId};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

const INVALID_TOKEN_MESSAGE: &str = "invalid or expired token";

/// Claims carried by an access token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
    pub sub: String,
    pub workspace_id: String,
    pub role: Role,
    pub permissions: Vec<Permission>,
    pub iat: i64,
    pub exp: i64,
}

/// A signed access token and its expiry.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

/// HS256 signer and verifier for access tokens.
#[derive(Clone)]
pub struct TokenCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    ttl: Duration,
}

impl TokenCodec {
    pub fn new(secret: &str, ttl_minutes: i64) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_required_spec_claims(&["exp", "sub"]);

        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            ttl: Duration::minutes(ttl_minutes),
        }
    }

    pub fn issue(&self, user: &UserRecord) -> AppResult<IssuedToken> {
        let issued_at = Utc::now();
        let expires_at = issued_at + self.ttl;
        let claims = TokenClaims {
            sub: user.id.to_string(),
            workspace_id: user.workspace_id.to_string(),
            role: user.role,
            permissions: user.permissions.clone(),
            iat: issued_at.timestamp(),
            exp: expires_at.timestamp(),
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|error| AppError::Internal(format!("failed to sign token: {error}")))?;

        Ok(IssuedToken { token, expires_at })
    }

    /// Verifies a token and rebuilds the principal it was issued for.
    pub fn verify(&self, token: &str) -> AppResult<Principal> {
        let claims = decode::<TokenClaims>(token, &self.decoding_key, &self.validation)
            .map_err(|_| AppError::Unauthorized(INVALID_TOKEN_MESSAGE.to_owned()))?
            .claims;

        let user_id = UserId::parse(&claims.sub)
            .map_err(|_| AppError::Unauthorized(INVALID_TOKEN_MESSAGE.to_owned()))?;
        let workspace_id = WorkspaceId::parse(&claims.workspace_id)
            .ok_or_else(|| AppError::Unauthorized(INVALID_TOKEN_MESSAGE.to_owned()))?;

        Ok(Principal::new(
            user_id,
            workspace_id,
            claims.role,
            claims.permissions,
        ))
    }
}
