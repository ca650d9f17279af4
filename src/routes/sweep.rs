use axum::{
    Json, Router,
    extract::State,
    routing::{get, post},
};

use crate::{
    dto::sweep::{RunSweepRequest, SweepRunResponse, SweepStatus},
    error::ServiceError,
    services::sweep_service::{self, SweepOutcome},
    state::SharedState,
};

/// Publicly readable sweep state.
pub fn public_router() -> Router<SharedState> {
    Router::new().route("/api/sweep/status", get(sweep_status))
}

/// Trigger route for the external scheduler.
pub fn cron_router() -> Router<SharedState> {
    Router::new().route("/api/sweep/run", post(run_sweep))
}

#[utoipa::path(
    get,
    path = "/api/sweep/status",
    tag = "sweep",
    responses((status = 200, description = "Sweep schedule and last run", body = SweepStatus))
)]
/// Report the sweep schedule and the last executed run.
pub async fn sweep_status(
    State(state): State<SharedState>,
) -> Result<Json<SweepStatus>, ServiceError> {
    Ok(Json(sweep_service::sweep_status(&state).await?))
}

#[utoipa::path(
    post,
    path = "/api/sweep/run",
    tag = "sweep",
    request_body = RunSweepRequest,
    responses((status = 200, description = "Sweep executed or skipped", body = SweepRunResponse))
)]
/// Run the transfer sweep if today is a scheduled day (or `force` is set).
pub async fn run_sweep(
    State(state): State<SharedState>,
    payload: Option<Json<RunSweepRequest>>,
) -> Result<Json<SweepRunResponse>, ServiceError> {
    let force = payload.map(|Json(body)| body.force).unwrap_or(false);
    let response = match sweep_service::run_sweep(&state, force).await? {
        SweepOutcome::Skipped { reason, utc_day } => SweepRunResponse::Skipped {
            ok: true,
            executed: false,
            reason: reason.to_string(),
            utc_day,
        },
        SweepOutcome::Executed(summary) => SweepRunResponse::Executed(summary),
    };
    Ok(Json(response))
}
