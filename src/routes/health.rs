use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;

use crate::state::AppState;

#[derive(Serialize)]
pub struct HealthData {
    message: &'static str,
    database_status: &'static str,
}

#[derive(Serialize)]
pub struct RootData {
    message: &'static str,
}

pub async fn root() -> Json<RootData> {
    Json(RootData {
        message: "Todo API is running",
    })
}

/// Reports the service as up and probes the database with a trivial query
pub async fn health(State(state): State<AppState>) -> (StatusCode, Json<HealthData>) {
    match state.db.ping().await {
        Ok(()) => (
            StatusCode::OK,
            Json(HealthData {
                message: "Todo API is running",
                database_status: "connected",
            }),
        ),
        Err(e) => {
            tracing::warn!(error = %e, "health check could not reach the database");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(HealthData {
                    message: "Todo API is running",
                    database_status: "disconnected",
                }),
            )
        }
    }
}
