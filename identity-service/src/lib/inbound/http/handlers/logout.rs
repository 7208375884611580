use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;
use serde::Deserialize;

use super::ApiError;
use super::ApiSuccess;
use crate::inbound::http::extract::ValidatedJson;
use crate::inbound::http::middleware::AuthenticatedUser;
use crate::inbound::http::router::AppState;

pub async fn logout(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthenticatedUser>,
    ValidatedJson(body): ValidatedJson<LogoutRequest>,
) -> Result<ApiSuccess<()>, ApiError> {
    state
        .auth_service
        .logout(&caller.user_id, &body.refresh_token)
        .await?;

    Ok(ApiSuccess::message(StatusCode::OK, "Logout successful"))
}

#[derive(Clone, PartialEq, Eq, Deserialize)]
pub struct LogoutRequest {
    refresh_token: String,
}
