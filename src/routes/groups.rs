use axum::{
    Extension, Json, Router,
    extract::{Path, State},
    routing::{get, post},
};
use uuid::Uuid;

use crate::{
    auth::AuthUser,
    dto::groups::{
        CreateGroupRequest, GroupJoinOutcome, GroupLeaderboardResponse, GroupResponse,
        JoinGroupRequest, LeaveGroupResponse, MyGroupsResponse,
    },
    dto::validation,
    error::ServiceError,
    services::group_service,
    state::SharedState,
};

pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/api/groups/create", post(create_group))
        .route("/api/groups/join", post(join_group))
        .route("/api/groups/mine", get(my_groups))
        .route("/api/groups/{id}/leaderboard", get(group_leaderboard))
        .route("/api/groups/{id}/leave", post(leave_group))
}

#[utoipa::path(
    post,
    path = "/api/groups/create",
    tag = "groups",
    request_body = CreateGroupRequest,
    responses((status = 200, description = "Group created with a fresh invite code", body = GroupResponse))
)]
/// Create a friend group.
pub async fn create_group(
    State(state): State<SharedState>,
    Extension(user): Extension<AuthUser>,
    Json(payload): Json<CreateGroupRequest>,
) -> Result<Json<GroupResponse>, ServiceError> {
    validation::check(&payload)?;
    let group = group_service::create_group(&state, &user.user_id, &payload.name).await?;
    Ok(Json(GroupResponse {
        ok: true,
        group: group.into(),
    }))
}

#[utoipa::path(
    post,
    path = "/api/groups/join",
    tag = "groups",
    request_body = JoinGroupRequest,
    responses((status = 200, description = "Joined (idempotent)", body = GroupJoinOutcome))
)]
/// Join a group by invite code.
pub async fn join_group(
    State(state): State<SharedState>,
    Extension(user): Extension<AuthUser>,
    Json(payload): Json<JoinGroupRequest>,
) -> Result<Json<GroupJoinOutcome>, ServiceError> {
    validation::check(&payload)?;
    Ok(Json(
        group_service::join_group(&state, &user.user_id, &payload.invite_code).await?,
    ))
}

#[utoipa::path(
    get,
    path = "/api/groups/mine",
    tag = "groups",
    responses((status = 200, description = "Groups the caller belongs to", body = MyGroupsResponse))
)]
/// List the caller's groups.
pub async fn my_groups(
    State(state): State<SharedState>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<MyGroupsResponse>, ServiceError> {
    let groups = group_service::my_groups(&state, &user.user_id).await?;
    Ok(Json(MyGroupsResponse { ok: true, groups }))
}

#[utoipa::path(
    get,
    path = "/api/groups/{id}/leaderboard",
    tag = "groups",
    params(("id" = Uuid, Path, description = "Group identifier")),
    responses((status = 200, description = "Members ranked with the global comparator", body = GroupLeaderboardResponse))
)]
/// Ranked view of a group (members only).
pub async fn group_leaderboard(
    State(state): State<SharedState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<GroupLeaderboardResponse>, ServiceError> {
    let leaderboard = group_service::group_leaderboard(&state, &user.user_id, id).await?;
    Ok(Json(GroupLeaderboardResponse {
        ok: true,
        group_id: id,
        leaderboard,
    }))
}

#[utoipa::path(
    post,
    path = "/api/groups/{id}/leave",
    tag = "groups",
    params(("id" = Uuid, Path, description = "Group identifier")),
    responses((status = 200, description = "Left the group", body = LeaveGroupResponse))
)]
/// Leave a group.
pub async fn leave_group(
    State(state): State<SharedState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<LeaveGroupResponse>, ServiceError> {
    group_service::leave_group(&state, &user.user_id, id).await?;
    Ok(Json(LeaveGroupResponse { ok: true, group_id: id }))
}
