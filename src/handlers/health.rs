//! `GET /health`: liveness plus a database round trip, for load balancers and
//! container health checks. Needs no tenant and no token.

use axum::{Json, extract::State};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::{error::AppError, state::AppState};

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub database: &'static str,
    pub timestamp: DateTime<Utc>,
}

/// Answers `{"status":"healthy","database":"connected",...}` once Postgres replies
/// to `SELECT 1`. An unreachable database surfaces as the usual 500 error body, so
/// a menu server that cannot read menus reports itself unhealthy.
pub async fn health_check(State(state): State<AppState>) -> Result<Json<HealthResponse>, AppError> {
    sqlx::query("SELECT 1").execute(&state.pool).await?;

    Ok(Json(HealthResponse {
        status: "healthy",
        database: "connected",
        timestamp: Utc::now(),
    }))
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use axum::{Router, http::StatusCode, routing::get};

    use super::*;
    use crate::{
        middleware::testing::{json, send, state},
        services::directory::memory::MemoryDirectory,
    };

    #[test]
    fn reports_status_and_database() {
        let body = serde_json::to_value(HealthResponse {
            status: "healthy",
            database: "connected",
            timestamp: Utc::now(),
        })
        .unwrap();

        assert_eq!(body["status"], "healthy");
        assert_eq!(body["database"], "connected");
        assert!(body["timestamp"].is_string());
    }

    #[tokio::test]
    async fn unreachable_database_is_unhealthy() {
        let mut state = state(MemoryDirectory::default());
        state.pool = sqlx::postgres::PgPoolOptions::new()
            .acquire_timeout(Duration::from_millis(500))
            .connect_lazy("postgres://127.0.0.1:1/menu")
            .unwrap();
        let app = Router::new()
            .route("/health", get(health_check))
            .with_state(state);

        let response = send(app, "nosuch.example.com", None, "/health").await;

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(json(response).await["error"]["code"], "internal_error");
    }
}
