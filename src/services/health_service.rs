//! Health endpoint payload: storage connectivity and gate configuration.

use tracing::warn;

use crate::{dto::health::HealthResponse, state::SharedState};

/// Ping storage and report which auth gates are live.
pub async fn health_status(state: &SharedState) -> HealthResponse {
    let storage = match sqlx::query("SELECT 1").execute(&state.db).await {
        Ok(_) => "ok",
        Err(err) => {
            warn!(error = %err, "storage health check failed");
            "unavailable"
        }
    };
    HealthResponse::new(&state.config, storage)
}
