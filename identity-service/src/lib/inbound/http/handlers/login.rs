use axum::extract::State;
use axum::http::StatusCode;
use chrono::DateTime;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use super::UserData;
use crate::domain::auth::models::LoginCommand;
use crate::domain::auth::models::TokenPair;
use crate::domain::user::models::EmailAddress;
use crate::inbound::http::extract::ValidatedJson;
use crate::inbound::http::router::AppState;

pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(body): ValidatedJson<LoginRequest>,
) -> Result<ApiSuccess<LoginResponseData>, ApiError> {
    // An unparseable email cannot belong to anyone
    let email = EmailAddress::new(body.email)
        .map_err(|_| ApiError::Unauthorized("Invalid email or password".to_string()))?;

    let outcome = state
        .auth_service
        .login(LoginCommand {
            email,
            password: body.password,
        })
        .await?;

    Ok(ApiSuccess::new(
        StatusCode::OK,
        "Login successful",
        LoginResponseData {
            user: (&outcome.user).into(),
            tokens: (&outcome.tokens).into(),
        },
    ))
}

#[derive(Clone, PartialEq, Eq, Deserialize)]
pub struct LoginRequest {
    email: String,
    password: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoginResponseData {
    pub user: UserData,
    #[serde(flatten)]
    pub tokens: TokenPairData,
}

/// Wire form of an access/refresh pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TokenPairData {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,
    pub access_token_expires_at: DateTime<Utc>,
    pub refresh_token_expires_at: DateTime<Utc>,
}

impl From<&TokenPair> for TokenPairData {
    fn from(tokens: &TokenPair) -> Self {
        Self {
            access_token: tokens.access.token.clone(),
            refresh_token: tokens.refresh.token.clone(),
            token_type: "Bearer".to_string(),
            access_token_expires_at: tokens.access.expires_at,
            refresh_token_expires_at: tokens.refresh.expires_at,
        }
    }
}
