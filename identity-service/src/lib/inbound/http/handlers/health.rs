use axum::extract::State;
use axum::http::StatusCode;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use crate::inbound::http::router::AppState;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HealthData {
    pub status: String,
    pub service: String,
}

/// Liveness check; never touches the database.
pub async fn health() -> ApiSuccess<HealthData> {
    ApiSuccess::new(
        StatusCode::OK,
        "Service is healthy",
        HealthData {
            status: "ok".to_string(),
            service: env!("CARGO_PKG_NAME").to_string(),
        },
    )
}

pub async fn database_health(
    State(state): State<AppState>,
) -> Result<ApiSuccess<HealthData>, ApiError> {
    state
        .health
        .ping()
        .await
        .map_err(|e| ApiError::ServiceUnavailable(format!("Database ping failed: {}", e)))?;

    Ok(ApiSuccess::new(
        StatusCode::OK,
        "Database is healthy",
        HealthData {
            status: "ok".to_string(),
            service: "database".to_string(),
        },
    ))
}
