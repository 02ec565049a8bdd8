use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

use crate::store::StoreError;
use crate::validate::ValidationError;

/// Failures a handler can surface to the client. Everything a handler can
/// hit is folded into one of these before it reaches the wire, so no raw
/// driver or hashing error ever leaks into a response body.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Bad or missing input fields, 422 with an `errors` array.
    #[error("validation failed")]
    Validation(Vec<String>),
    /// Uniqueness or referential-integrity breach, same 422 shape.
    #[error("{0}")]
    Constraint(String),
    /// Missing, invalid, or stale session.
    #[error("unauthorized")]
    Unauthorized,
    /// Login failed; the body never says whether the username or the
    /// password was wrong.
    #[error("invalid username or password")]
    InvalidCredentials,
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::Validation(vec![err.to_string()])
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Constraint(reason) => ApiError::Constraint(reason),
            StoreError::Backend(err) => ApiError::Internal(err),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Validation(errors) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(json!({ "errors": errors })),
            )
                .into_response(),
            ApiError::Constraint(reason) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(json!({ "errors": [reason] })),
            )
                .into_response(),
            ApiError::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                Json(json!({ "error": "Unauthorized" })),
            )
                .into_response(),
            ApiError::InvalidCredentials => (
                StatusCode::UNAUTHORIZED,
                Json(json!({ "error": "Invalid username or password" })),
            )
                .into_response(),
            ApiError::Internal(err) => {
                error!(error = %err, "internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "error": "Internal server error" })),
                )
                    .into_response()
            }
        }
    }
}
