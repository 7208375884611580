use axum::extract::State;
use axum::http::StatusCode;
use serde::Deserialize;

use super::ApiError;
use super::ApiSuccess;
use crate::domain::auth::models::ResetPasswordCommand;
use crate::domain::user::models::Password;
use crate::inbound::http::extract::ValidatedJson;
use crate::inbound::http::router::AppState;

pub async fn reset_password(
    State(state): State<AppState>,
    ValidatedJson(body): ValidatedJson<ResetPasswordRequest>,
) -> Result<ApiSuccess<()>, ApiError> {
    let command = ResetPasswordCommand {
        token: body.token,
        new_password: Password::new(body.new_password)?,
    };

    state.auth_service.reset_password(command).await?;

    Ok(ApiSuccess::message(
        StatusCode::OK,
        "Password reset successfully",
    ))
}

#[derive(Clone, PartialEq, Eq, Deserialize)]
pub struct ResetPasswordRequest {
    token: String,
    new_password: String,
}
