//! Body and query extractors whose rejections use the API error envelope.

use axum::extract::FromRequest;
use axum::extract::FromRequestParts;

use super::handlers::ApiError;

/// `Json<T>` that rejects malformed or incomplete bodies with a 422
/// `VALIDATION_ERROR` envelope.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct ValidatedJson<T>(pub T);

/// `Query<T>` counterpart of [`ValidatedJson`].
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(ApiError))]
pub struct ValidatedQuery<T>(pub T);
