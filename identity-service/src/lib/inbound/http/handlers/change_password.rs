use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;
use serde::Deserialize;

use super::ApiError;
use super::ApiSuccess;
use crate::domain::user::models::ChangePasswordCommand;
use crate::domain::user::models::Password;
use crate::inbound::http::extract::ValidatedJson;
use crate::inbound::http::middleware::AuthenticatedUser;
use crate::inbound::http::router::AppState;

pub async fn change_password(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthenticatedUser>,
    ValidatedJson(body): ValidatedJson<ChangePasswordRequest>,
) -> Result<ApiSuccess<()>, ApiError> {
    let command = ChangePasswordCommand {
        old_password: body.old_password,
        new_password: Password::new(body.new_password)?,
    };

    state
        .user_service
        .change_password(&caller.user_id, command)
        .await?;

    Ok(ApiSuccess::message(
        StatusCode::OK,
        "Password changed successfully",
    ))
}

#[derive(Clone, PartialEq, Eq, Deserialize)]
pub struct ChangePasswordRequest {
    old_password: String,
    new_password: String,
}
