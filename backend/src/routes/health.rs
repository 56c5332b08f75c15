//! Health check endpoints
//!
//! - /health: process is up
//! - /health/ready: database reachable and media root present
//! - /health/live: liveness check

use crate::{db, state::AppState};
use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;

/// Health check response
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub checks: Option<ReadinessChecks>,
}

/// Dependency checks reported by the readiness check
#[derive(Serialize)]
pub struct ReadinessChecks {
    pub database: CheckStatus,
    pub media: CheckStatus,
}

/// Outcome of one dependency check
#[derive(Serialize)]
pub struct CheckStatus {
    pub healthy: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl CheckStatus {
    fn from_result<E: std::fmt::Display>(result: Result<(), E>) -> Self {
        match result {
            Ok(()) => Self {
                healthy: true,
                message: None,
            },
            Err(e) => Self {
                healthy: false,
                message: Some(e.to_string()),
            },
        }
    }
}

fn response(status: &'static str, checks: Option<ReadinessChecks>) -> HealthResponse {
    HealthResponse {
        status,
        version: env!("CARGO_PKG_VERSION"),
        checks,
    }
}

pub async fn health_check() -> Json<HealthResponse> {
    Json(response("healthy", None))
}

/// Readiness check, 503 when a dependency is unavailable
pub async fn readiness_check(
    State(state): State<AppState>,
) -> Result<Json<HealthResponse>, (StatusCode, Json<HealthResponse>)> {
    let database = CheckStatus::from_result(db::health_check(state.db()).await);

    let media_root = state.media().root();
    let media = CheckStatus::from_result(match tokio::fs::metadata(media_root).await {
        Ok(meta) if meta.is_dir() => Ok(()),
        Ok(_) => Err(format!("{} is not a directory", media_root.display())),
        Err(e) => Err(format!("{}: {}", media_root.display(), e)),
    });

    let ready = database.healthy && media.healthy;
    let checks = Some(ReadinessChecks { database, media });

    if ready {
        Ok(Json(response("ready", checks)))
    } else {
        Err((
            StatusCode::SERVICE_UNAVAILABLE,
            Json(response("not_ready", checks)),
        ))
    }
}

pub async fn liveness_check() -> Json<HealthResponse> {
    Json(response("alive", None))
}
