use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};

use crate::{
    dto::seasons::{ResetSyncReport, SeasonStatusResponse, SimulateDayReport},
    error::ServiceError,
    services::season_service,
    state::SharedState,
};

pub fn public_router() -> Router<SharedState> {
    Router::new().route("/api/seasons/status", get(season_status))
}

pub fn cron_router() -> Router<SharedState> {
    Router::new()
        .route("/api/seasons/simulate-day", post(simulate_day))
        .route("/api/seasons/reset-sync", post(reset_sync))
}

#[utoipa::path(
    get,
    path = "/api/seasons/status",
    tag = "seasons",
    responses((status = 200, description = "Active seasons and cursors", body = SeasonStatusResponse))
)]
/// Report the active season and matchday cursor per tier.
pub async fn season_status(
    State(state): State<SharedState>,
) -> Result<Json<SeasonStatusResponse>, ServiceError> {
    let seasons = season_service::season_status(&state).await?;
    Ok(Json(SeasonStatusResponse { ok: true, seasons }))
}

#[utoipa::path(
    post,
    path = "/api/seasons/simulate-day",
    tag = "seasons",
    responses(
        (status = 200, description = "All tiers advanced", body = SimulateDayReport),
        (status = 207, description = "At least one tier aborted or errored", body = SimulateDayReport)
    )
)]
/// Advance the matchday counter across all three tiers.
///
/// Returns 207 when any tier aborts or errors so the scheduler can alert on
/// partial failure without retrying the successful tiers.
pub async fn simulate_day(
    State(state): State<SharedState>,
) -> Result<impl IntoResponse, ServiceError> {
    let report = season_service::simulate_day(&state).await?;
    let status = if report.ok {
        StatusCode::OK
    } else {
        StatusCode::MULTI_STATUS
    };
    Ok((status, Json(report)))
}

#[utoipa::path(
    post,
    path = "/api/seasons/reset-sync",
    tag = "seasons",
    responses((status = 200, description = "Season rows re-aligned to the progress cursors", body = ResetSyncReport))
)]
/// Re-align season rows to the authoritative progress cursors.
pub async fn reset_sync(
    State(state): State<SharedState>,
) -> Result<Json<ResetSyncReport>, ServiceError> {
    Ok(Json(season_service::reset_sync(&state).await?))
}
