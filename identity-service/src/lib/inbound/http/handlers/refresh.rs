use axum::extract::State;
use axum::http::StatusCode;
use serde::Deserialize;

use super::login::TokenPairData;
use super::ApiError;
use super::ApiSuccess;
use crate::inbound::http::extract::ValidatedJson;
use crate::inbound::http::router::AppState;

pub async fn refresh(
    State(state): State<AppState>,
    ValidatedJson(body): ValidatedJson<RefreshRequest>,
) -> Result<ApiSuccess<TokenPairData>, ApiError> {
    state
        .auth_service
        .refresh(&body.refresh_token)
        .await
        .map_err(ApiError::from)
        .map(|ref tokens| {
            ApiSuccess::new(StatusCode::OK, "Token refreshed successfully", tokens.into())
        })
}

#[derive(Clone, PartialEq, Eq, Deserialize)]
pub struct RefreshRequest {
    refresh_token: String,
}
