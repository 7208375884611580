use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;
use serde::Deserialize;

use super::ApiError;
use super::ApiSuccess;
use super::UserData;
use crate::domain::user::models::DisplayName;
use crate::domain::user::models::UpdateProfileCommand;
use crate::inbound::http::extract::ValidatedJson;
use crate::inbound::http::middleware::AuthenticatedUser;
use crate::inbound::http::router::AppState;

pub async fn update_profile(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthenticatedUser>,
    ValidatedJson(body): ValidatedJson<UpdateProfileRequest>,
) -> Result<ApiSuccess<UserData>, ApiError> {
    let command = UpdateProfileCommand {
        display_name: DisplayName::new(body.full_name)?,
    };

    state
        .user_service
        .update_profile(&caller.user_id, command)
        .await
        .map_err(ApiError::from)
        .map(|ref user| {
            ApiSuccess::new(StatusCode::OK, "Profile updated successfully", user.into())
        })
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UpdateProfileRequest {
    full_name: String,
}
