use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::get,
};

use crate::{
    dto::leagues::{FixturesResponse, LeaguesResponse, MatchdayQuery, TableResponse},
    error::ServiceError,
    services::league_service,
    state::SharedState,
};

pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/api/leagues", get(list_leagues))
        .route("/api/leagues/{league_id}/table", get(league_table))
        .route("/api/leagues/{league_id}/fixtures", get(league_fixtures))
        .route("/api/leagues/{league_id}/results", get(league_results))
}

#[utoipa::path(
    get,
    path = "/api/leagues",
    tag = "leagues",
    responses((status = 200, description = "The three tiers and their active seasons", body = LeaguesResponse))
)]
/// List the league pyramid.
pub async fn list_leagues(
    State(state): State<SharedState>,
) -> Result<Json<LeaguesResponse>, ServiceError> {
    let leagues = league_service::list_leagues(&state).await?;
    Ok(Json(LeaguesResponse { ok: true, leagues }))
}

#[utoipa::path(
    get,
    path = "/api/leagues/{league_id}/table",
    tag = "leagues",
    params(("league_id" = String, Path, description = "Tier identifier")),
    responses((status = 200, description = "Current standings", body = TableResponse))
)]
/// Current standings for one tier.
pub async fn league_table(
    State(state): State<SharedState>,
    Path(league_id): Path<String>,
) -> Result<Json<TableResponse>, ServiceError> {
    let league = league_service::parse_league_id(&league_id)?;
    Ok(Json(league_service::league_table(&state, league).await?))
}

#[utoipa::path(
    get,
    path = "/api/leagues/{league_id}/fixtures",
    tag = "leagues",
    params(
        ("league_id" = String, Path, description = "Tier identifier"),
        ("matchday" = Option<i32>, Query, description = "Matchday selector, defaults to the current one")
    ),
    responses((status = 200, description = "Fixtures for a matchday", body = FixturesResponse))
)]
/// Fixtures for one matchday of a tier.
pub async fn league_fixtures(
    State(state): State<SharedState>,
    Path(league_id): Path<String>,
    Query(query): Query<MatchdayQuery>,
) -> Result<Json<FixturesResponse>, ServiceError> {
    let league = league_service::parse_league_id(&league_id)?;
    Ok(Json(
        league_service::league_fixtures(&state, league, query.matchday).await?,
    ))
}

#[utoipa::path(
    get,
    path = "/api/leagues/{league_id}/results",
    tag = "leagues",
    params(
        ("league_id" = String, Path, description = "Tier identifier"),
        ("matchday" = Option<i32>, Query, description = "Matchday selector, defaults to the last played one")
    ),
    responses((status = 200, description = "Played fixtures for a matchday", body = FixturesResponse))
)]
/// Results for one matchday of a tier.
pub async fn league_results(
    State(state): State<SharedState>,
    Path(league_id): Path<String>,
    Query(query): Query<MatchdayQuery>,
) -> Result<Json<FixturesResponse>, ServiceError> {
    let league = league_service::parse_league_id(&league_id)?;
    Ok(Json(
        league_service::league_results(&state, league, query.matchday).await?,
    ))
}
