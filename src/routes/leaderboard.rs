use axum::{Extension, Json, Router, extract::State, routing::get};

use crate::{
    auth::AuthUser,
    dto::leaderboard::GlobalLeaderboard,
    error::ServiceError,
    services::leaderboard_service,
    state::SharedState,
};

pub fn router() -> Router<SharedState> {
    Router::new().route("/api/leaderboard/global", get(global_leaderboard))
}

#[utoipa::path(
    get,
    path = "/api/leaderboard/global",
    tag = "leaderboard",
    responses((status = 200, description = "Top 100 plus the caller's row", body = GlobalLeaderboard))
)]
/// Global coach leaderboard.
pub async fn global_leaderboard(
    State(state): State<SharedState>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<GlobalLeaderboard>, ServiceError> {
    Ok(Json(
        leaderboard_service::global_leaderboard(&state, &user.user_id).await?,
    ))
}
