//! Custom error types for the API service

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use common::error::StoreError;
use serde::Serialize;
use thiserror::Error;
use tracing::error;
use utoipa::ToSchema;

use crate::listing::ListingError;

/// JSON body of every error response
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    #[schema(example = "Unauthorized")]
    pub error: String,
}

/// Custom error type for the API service
#[derive(Error, Debug)]
pub enum ApiError {
    /// Malformed or out-of-range input
    #[error("Validation error: {0}")]
    Validation(String),

    /// Missing, invalid or expired token
    #[error("Unauthorized")]
    Unauthorized,

    /// Unknown handle or wrong password, deliberately indistinguishable
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// The resource already exists
    #[error("Conflict: {0}")]
    Conflict(String),

    /// The resource does not exist
    #[error("Not found")]
    NotFound,

    /// Store failure; details are logged, never returned
    #[error("Storage error: {0}")]
    Storage(#[from] StoreError),

    /// Internal server error
    #[error("Internal server error")]
    InternalServerError,
}

impl From<ListingError> for ApiError {
    fn from(err: ListingError) -> Self {
        ApiError::Validation(err.to_string())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::Validation(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            ApiError::Validation(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Unauthorized => (StatusCode::UNAUTHORIZED, "Unauthorized".to_string()),
            ApiError::InvalidCredentials => {
                (StatusCode::UNAUTHORIZED, "Invalid credentials".to_string())
            }
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, msg),
            ApiError::NotFound => (StatusCode::NOT_FOUND, "Not found".to_string()),
            ApiError::Storage(StoreError::NotFound) => {
                (StatusCode::NOT_FOUND, "Not found".to_string())
            }
            ApiError::Storage(err) => {
                error!("Store failure: {}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
            ApiError::InternalServerError => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
            ),
        };

        let body = Json(ErrorResponse {
            error: error_message,
        });

        (status, body).into_response()
    }
}

/// Type alias for API results
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    async fn render(err: ApiError) -> (StatusCode, serde_json::Value) {
        let response = err.into_response();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn maps_taxonomy_to_status_codes() {
        assert_eq!(
            render(ApiError::Validation("bad".into())).await.0,
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            render(ApiError::Unauthorized).await.0,
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            render(ApiError::Conflict("taken".into())).await.0,
            StatusCode::CONFLICT
        );
        assert_eq!(render(ApiError::NotFound).await.0, StatusCode::NOT_FOUND);
        assert_eq!(
            render(ApiError::Storage(StoreError::NotFound)).await.0,
            StatusCode::NOT_FOUND
        );
    }

    #[tokio::test]
    async fn store_errors_do_not_leak() {
        let err = ApiError::Storage(StoreError::Database(sqlx::Error::Protocol(
            "relation \"ads\" does not exist".into(),
        )));
        let (status, body) = render(err).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "Internal server error");
    }

    #[tokio::test]
    async fn credential_failures_are_uniform() {
        let (status, body) = render(ApiError::InvalidCredentials).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"], "Invalid credentials");
    }
}
