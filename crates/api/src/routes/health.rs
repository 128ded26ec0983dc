use axum::extract::State;
use axum::{routing::get, Json, Router};
use serde::Serialize;

use crate::state::AppState;

/// Health check response payload.
#[derive(Serialize)]
pub struct HealthResponse {
    /// `ok` when every dependency is usable, `degraded` otherwise.
    pub status: &'static str,
    /// Crate version from Cargo.toml.
    pub version: &'static str,
    /// Whether the restaurant store answers queries.
    pub store_healthy: bool,
    /// Whether the photo directory exists or can be created.
    pub uploads_ready: bool,
}

/// GET /health -- store and photo storage health.
async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let store_healthy = state.store.health_check().await.is_ok();

    let uploads_ready = match tokio::fs::create_dir_all(&state.config.upload_dir).await {
        Ok(()) => true,
        Err(err) => {
            tracing::warn!(
                upload_dir = %state.config.upload_dir.display(),
                error = %err,
                "Upload directory unavailable"
            );
            false
        }
    };

    let status = if store_healthy && uploads_ready {
        "ok"
    } else {
        "degraded"
    };

    Json(HealthResponse {
        status,
        version: env!("CARGO_PKG_VERSION"),
        store_healthy,
        uploads_ready,
    })
}

/// Root-level health route; mounted outside `/api/v1`.
pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
