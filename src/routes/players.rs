use axum::{
    Extension, Json, Router,
    extract::{Path, State},
    routing::{get, post},
};

use crate::{
    auth::AuthUser,
    dto::players::{
        CompleteResponse, CreatePlayerRequest, PlayerResponse, ProgressRequest, ProgressResponse,
    },
    dto::validation,
    error::ServiceError,
    services::player_service,
    state::SharedState,
};

/// Routes gated by the user JWT.
pub fn user_router() -> Router<SharedState> {
    Router::new()
        .route("/api/players/create", post(create_player))
        .route("/api/players/{id}", get(get_player))
        .route("/api/players/{id}/complete", post(complete_player))
}

/// Routes gated by the server HMAC signature.
pub fn server_router() -> Router<SharedState> {
    Router::new().route("/api/players/{id}/progress", post(update_progress))
}

#[utoipa::path(
    post,
    path = "/api/players/create",
    tag = "players",
    request_body = CreatePlayerRequest,
    responses((status = 200, description = "Player registered (idempotent)", body = PlayerResponse))
)]
/// Register a player career for the authenticated coach.
pub async fn create_player(
    State(state): State<SharedState>,
    Extension(user): Extension<AuthUser>,
    Json(payload): Json<CreatePlayerRequest>,
) -> Result<Json<PlayerResponse>, ServiceError> {
    validation::check(&payload)?;
    let player = player_service::create_player(&state, &user.user_id, payload).await?;
    Ok(Json(player.into()))
}

#[utoipa::path(
    get,
    path = "/api/players/{id}",
    tag = "players",
    params(("id" = String, Path, description = "Player identifier")),
    responses((status = 200, description = "Player state", body = PlayerResponse))
)]
/// Read one of the caller's players.
pub async fn get_player(
    State(state): State<SharedState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> Result<Json<PlayerResponse>, ServiceError> {
    let player = player_service::get_player(&state, &user.user_id, &id).await?;
    Ok(Json(player.into()))
}

#[utoipa::path(
    post,
    path = "/api/players/{id}/progress",
    tag = "players",
    request_body = ProgressRequest,
    params(("id" = String, Path, description = "Player identifier")),
    responses((status = 200, description = "Progress applied, or no-op for completed careers", body = ProgressResponse))
)]
/// Apply a signed rating/league push from the game backend.
pub async fn update_progress(
    State(state): State<SharedState>,
    Path(id): Path<String>,
    Json(payload): Json<ProgressRequest>,
) -> Result<Json<ProgressResponse>, ServiceError> {
    validation::check(&payload)?;
    let player = player_service::update_player_progress(&state, &id, payload).await?;
    Ok(Json(ProgressResponse {
        ok: true,
        updated: player.is_some(),
        player: player.map(Into::into),
    }))
}

#[utoipa::path(
    post,
    path = "/api/players/{id}/complete",
    tag = "players",
    params(("id" = String, Path, description = "Player identifier")),
    responses((status = 200, description = "Career completed (idempotent)", body = CompleteResponse))
)]
/// Manually complete one of the caller's careers.
pub async fn complete_player(
    State(state): State<SharedState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> Result<Json<CompleteResponse>, ServiceError> {
    let outcome = player_service::complete_own_player(&state, &user.user_id, &id).await?;
    Ok(Json(outcome.into()))
}
