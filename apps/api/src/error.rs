use axum::Json;
use axum::extract::FromRequest;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use eleads_core::AppError;
use serde::Serialize;
use tracing::{error, warn};
use ts_rs::TS;

const INTERNAL_ERROR_MESSAGE: &str = "Internal server error.";

/// API error payload.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/error-response.ts"
)]
pub struct ErrorResponse {
    success: bool,
    message: String,
}

impl ErrorResponse {
    fn from_error(error: &AppError) -> Self {
        let message = match error {
            AppError::Internal(_) => INTERNAL_ERROR_MESSAGE.to_owned(),
            other => other.message().to_owned(),
        };

        Self {
            success: false,
            message,
        }
    }
}

/// HTTP API error wrapper around core application errors.
#[derive(Debug)]
pub struct ApiError(pub AppError);

impl From<AppError> for ApiError {
    fn from(value: AppError) -> Self {
        Self(value)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self(AppError::Validation(rejection.body_text()))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(message) => {
                warn!(%message, "request denied by authorization policy");
                StatusCode::FORBIDDEN
            }
            AppError::Internal(message) => {
                error!(%message, "request failed");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        (status, Json(ErrorResponse::from_error(&self.0))).into_response()
    }
}

/// Registration failure.
///
/// Signup reports validation, conflict and not-found failures uniformly as
/// `400 Bad Request`; everything else maps like [`ApiError`].
#[derive(Debug)]
pub struct RegistrationError(pub AppError);

impl From<AppError> for RegistrationError {
    fn from(value: AppError) -> Self {
        Self(value)
    }
}

impl IntoResponse for RegistrationError {
    fn into_response(self) -> Response {
        match self.0 {
            error @ (AppError::Validation(_) | AppError::NotFound(_) | AppError::Conflict(_)) => (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse::from_error(&error)),
            )
                .into_response(),
            other => ApiError(other).into_response(),
        }
    }
}

/// JSON body extractor whose rejections use the error envelope.
#[derive(Debug, FromRequest)]
#[from_request(via(Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);

/// Standard API result type.
pub type ApiResult<T> = Result<T, ApiError>;
