//! Error handling module
//!
//! Provides the application error type and the single error envelope every
//! failed request is answered with.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use std::fmt::Display;
use thiserror::Error;
use tracing::error;

/// Message returned for any request body that cannot be decoded
pub const INVALID_PAYLOAD_MESSAGE: &str = "Invalid request payload";

/// Application-wide error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] tokio_postgres::Error),

    #[error("Pool error: {0}")]
    Pool(#[from] deadpool_postgres::PoolError),

    #[error("Invalid request payload: {0}")]
    InvalidPayload(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid customer id: {0}")]
    InvalidId(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Error response structure
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: &'static str,
}

impl AppError {
    /// HTTP status and stable code for this error
    pub fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            AppError::Database(_) => (StatusCode::INTERNAL_SERVER_ERROR, "DATABASE_ERROR"),
            AppError::Pool(_) => (StatusCode::INTERNAL_SERVER_ERROR, "POOL_ERROR"),
            AppError::InvalidPayload(_) => (StatusCode::BAD_REQUEST, "INVALID_PAYLOAD"),
            AppError::Validation(_) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
            AppError::InvalidId(_) => (StatusCode::BAD_REQUEST, "INVALID_ID"),
            AppError::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            AppError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();

        let message = match self {
            AppError::Database(e) => {
                error!("Database error: {:?}", e);
                driver_message(&e)
            }
            AppError::Pool(deadpool_postgres::PoolError::Backend(e)) => {
                error!("Pool error: {:?}", e);
                driver_message(&e)
            }
            AppError::Pool(e) => {
                error!("Pool error: {:?}", e);
                e.to_string()
            }
            AppError::Internal(msg) => {
                error!("Internal error: {}", msg);
                msg
            }
            // The decoder's detail stays in the logs; clients get a fixed message
            AppError::InvalidPayload(_) => INVALID_PAYLOAD_MESSAGE.to_string(),
            AppError::InvalidId(raw) => format!("Invalid customer id: {}", raw),
            AppError::Validation(msg) | AppError::NotFound(msg) => msg,
        };

        let body = Json(ErrorResponse {
            error: message,
            code,
        });

        (status, body).into_response()
    }
}

/// Text reported for a driver error.
///
/// `tokio_postgres::Error` displays server-side failures as a bare "db error";
/// the server's own message lives on the attached `DbError`.
fn driver_message(e: &tokio_postgres::Error) -> String {
    prefer_server_message(e.as_db_error(), e)
}

fn prefer_server_message<S: Display + ?Sized, F: Display + ?Sized>(
    server: Option<&S>,
    fallback: &F,
) -> String {
    server
        .map(ToString::to_string)
        .unwrap_or_else(|| fallback.to_string())
}

/// Result type alias for API handlers
pub type ApiResult<T> = Result<T, AppError>;

/// Helper function to create a validation error
pub fn validation_error(msg: impl Into<String>) -> AppError {
    AppError::Validation(msg.into())
}

/// Helper function to create a not found error
pub fn not_found_error(msg: impl Into<String>) -> AppError {
    AppError::NotFound(msg.into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;
    use serde_json::Value;

    async fn envelope(err: AppError) -> (StatusCode, Value) {
        let response = err.into_response();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_invalid_payload_hides_decoder_detail() {
        let (status, body) =
            envelope(AppError::InvalidPayload("expected `,` at line 1".to_string())).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Invalid request payload");
        assert_eq!(body["code"], "INVALID_PAYLOAD");
    }

    #[tokio::test]
    async fn test_not_found_maps_to_404() {
        let (status, body) = envelope(not_found_error("Customer 7 not found")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "Customer 7 not found");
        assert_eq!(body["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn test_validation_and_invalid_id_are_client_errors() {
        let (status, body) = envelope(validation_error("customername must not be empty")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "VALIDATION_ERROR");

        let (status, body) = envelope(AppError::InvalidId("abc".to_string())).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Invalid customer id: abc");
        assert_eq!(body["code"], "INVALID_ID");
    }

    #[tokio::test]
    async fn test_pool_failure_is_server_error() {
        let (status, body) = envelope(AppError::Pool(deadpool_postgres::PoolError::Closed)).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], deadpool_postgres::PoolError::Closed.to_string());
        assert_eq!(body["code"], "POOL_ERROR");
    }

    #[test]
    fn test_server_message_wins_over_generic_driver_text() {
        let server = "ERROR: relation \"customer\" does not exist";
        assert_eq!(prefer_server_message(Some(server), "db error"), server);
        assert_eq!(
            prefer_server_message(None::<&str>, "error connecting to server"),
            "error connecting to server"
        );
    }

    #[tokio::test]
    async fn test_internal_error_keeps_message() {
        let (status, body) = envelope(AppError::Internal("connection reset".to_string())).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "connection reset");
        assert_eq!(body["code"], "INTERNAL_ERROR");
    }
}
