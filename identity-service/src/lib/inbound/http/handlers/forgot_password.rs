use axum::extract::State;
use axum::http::StatusCode;
use serde::Deserialize;

use super::ApiError;
use super::ApiSuccess;
use crate::domain::user::models::EmailAddress;
use crate::inbound::http::extract::ValidatedJson;
use crate::inbound::http::router::AppState;

/// Same response whether or not the email is registered.
pub async fn forgot_password(
    State(state): State<AppState>,
    ValidatedJson(body): ValidatedJson<ForgotPasswordRequest>,
) -> Result<ApiSuccess<()>, ApiError> {
    let email = EmailAddress::new(body.email)?;

    state.auth_service.forgot_password(&email).await?;

    Ok(ApiSuccess::message(
        StatusCode::OK,
        "If the email exists, a password reset link has been sent",
    ))
}

#[derive(Clone, PartialEq, Eq, Deserialize)]
pub struct ForgotPasswordRequest {
    email: String,
}
