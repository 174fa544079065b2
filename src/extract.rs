//! Request extractors
//!
//! Wrap axum's own extractors so their rejections come back in the
//! application's error envelope instead of axum's plain-text bodies.

use crate::error::{validation_error, AppError};
use axum::extract::rejection::JsonRejection;
use axum::extract::{FromRequest, FromRequestParts, Path, Request};
use axum::http::request::Parts;
use serde::de::DeserializeOwned;
use tracing::debug;
use validator::Validate;

/// JSON body that must decode into `T` and pass its `Validate` rules.
///
/// Any decode failure (bad syntax, wrong content type, missing or mistyped
/// fields) becomes `AppError::InvalidPayload`; rule failures become
/// `AppError::Validation`.
pub struct ValidJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidJson<T>
where
    T: DeserializeOwned + Validate + 'static,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let axum::Json(value) = axum::Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection: JsonRejection| {
                debug!("Rejected request body: {}", rejection.body_text());
                AppError::InvalidPayload(rejection.body_text())
            })?;

        value
            .validate()
            .map_err(|e| validation_error(e.to_string()))?;

        Ok(ValidJson(value))
    }
}

/// Customer id taken from the `{id}` path segment
#[derive(Debug, Clone, Copy)]
pub struct CustomerId(pub i32);

impl<S> FromRequestParts<S> for CustomerId
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|e| AppError::Internal(format!("Missing id path parameter: {}", e)))?;

        raw.trim()
            .parse::<i32>()
            .map(CustomerId)
            .map_err(|_| AppError::InvalidId(raw))
    }
}
