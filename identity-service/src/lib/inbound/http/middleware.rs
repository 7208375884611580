use axum::extract::Request;
use axum::extract::State;
use axum::http::{self};
use axum::middleware::Next;
use axum::response::Response;

use crate::domain::user::models::Role;
use crate::domain::user::models::UserId;
use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::router::AppState;

/// Extension type to store the authenticated caller in request extensions
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub user_id: UserId,
    pub role: Role,
}

/// Middleware that validates access tokens and adds the caller to request extensions
pub async fn authenticate(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = extract_token_from_header(&req)?;

    let claims = state.token_codec.verify_access(token).map_err(|e| {
        tracing::warn!(error = %e, "Access token rejected");
        ApiError::Unauthorized("Invalid or expired token".to_string())
    })?;

    let user_id = UserId::from_string(&claims.sub).map_err(|e| {
        tracing::warn!(error = %e, "Access token carries a malformed subject");
        ApiError::Unauthorized("Invalid token format".to_string())
    })?;

    let role = claims.role.parse::<Role>().map_err(|e| {
        tracing::warn!(user_id = %user_id, error = %e, "Access token carries an unknown role");
        ApiError::Unauthorized("Invalid token format".to_string())
    })?;

    req.extensions_mut()
        .insert(AuthenticatedUser { user_id, role });

    Ok(next.run(req).await)
}

/// Middleware that only lets admins through. Must run inside `authenticate`.
pub async fn require_admin(req: Request, next: Next) -> Result<Response, ApiError> {
    let caller = req
        .extensions()
        .get::<AuthenticatedUser>()
        .map(|user| (user.user_id, user.role));

    match caller {
        Some((_, Role::Admin)) => Ok(next.run(req).await),
        Some((user_id, _)) => {
            tracing::warn!(user_id = %user_id, "Admin route denied");
            Err(ApiError::Forbidden("Admin access required".to_string()))
        }
        None => Err(ApiError::Unauthorized(
            "Missing Authorization header".to_string(),
        )),
    }
}

fn extract_token_from_header(req: &Request) -> Result<&str, ApiError> {
    let auth_header = req
        .headers()
        .get(http::header::AUTHORIZATION)
        .ok_or_else(|| ApiError::Unauthorized("Missing Authorization header".to_string()))?;

    let auth_str = auth_header
        .to_str()
        .map_err(|_| ApiError::Unauthorized("Invalid Authorization header".to_string()))?;

    match auth_str.strip_prefix("Bearer ") {
        Some(token) if !token.trim().is_empty() => Ok(token.trim()),
        _ => Err(ApiError::Unauthorized(
            "Invalid Authorization header format. Expected: Bearer <token>".to_string(),
        )),
    }
}
