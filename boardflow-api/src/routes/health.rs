/// Health check endpoint
///
/// Provides a simple health check endpoint that verifies:
/// - The server is running
/// - Database connectivity
///
/// # Endpoint
///
/// ```text
/// GET /health
/// ```
///
/// # Response
///
/// ```json
/// {
///   "success": true,
///   "data": { "status": "healthy", "version": "0.1.0", "database": "connected" }
/// }
/// ```
use crate::{app::AppState, error::ApiResult};
use axum::{extract::State, Json};
use boardflow_shared::api::ApiEnvelope;
use serde::{Deserialize, Serialize};

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Service status
    pub status: String,

    /// Application version
    pub version: String,

    /// Database status
    pub database: String,
}

/// Health check handler
pub async fn health_check(
    State(state): State<AppState>,
) -> ApiResult<Json<ApiEnvelope<HealthResponse>>> {
    let database_status = match sqlx::query("SELECT 1").fetch_one(&state.db).await {
        Ok(_) => "connected",
        Err(_) => "disconnected",
    };

    let status = if database_status == "connected" {
        "healthy"
    } else {
        "degraded"
    };

    Ok(Json(ApiEnvelope::ok(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        database: database_status.to_string(),
    })))
}
