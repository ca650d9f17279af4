use axum::{
    Extension, Json, Router,
    extract::{Path, Query, State},
    routing::{get, post},
};
use uuid::Uuid;

use crate::{
    auth::AuthUser,
    dto::squads::{
        CreateSquadRequest, JoinOutcome, LeaveResponse, MySquadResponse, RequestsResponse,
        ResolveOutcome, ResolveRequestBody, SetRoleRequestBody, SetRoleResponse, SquadListQuery,
        SquadLeaderboardResponse, SquadProfile, SquadSearchResponse, UpgradeOutcome,
        UpgradeRequestBody,
    },
    dto::validation,
    error::ServiceError,
    services::squad_service::{self, FacilityType},
    state::SharedState,
};

/// Public squad reads.
pub fn public_router() -> Router<SharedState> {
    Router::new()
        .route("/api/squads/leaderboard", get(squad_leaderboard))
        .route("/api/squads/search", get(search_squads))
        .route("/api/squads/{id}/profile", get(squad_profile))
}

/// Member-facing squad operations, JWT gated.
pub fn user_router() -> Router<SharedState> {
    Router::new()
        .route("/api/squads/create", post(create_squad))
        .route("/api/squads/mine", get(my_squad))
        .route("/api/squads/leave", post(leave_squad))
        .route("/api/squads/{id}/join", post(join_squad))
        .route("/api/squads/{id}/request-join", post(request_join))
        .route("/api/squads/{id}/upgrade", post(upgrade_facility))
        .route("/api/squads/{id}/set-role", post(set_member_role))
        .route("/api/squads/{id}/requests", get(list_requests))
        .route("/api/squads/requests/{id}/resolve", post(resolve_request))
}

#[utoipa::path(
    get,
    path = "/api/squads/leaderboard",
    tag = "squads",
    params(("limit" = Option<i64>, Query, description = "Rows to return, capped at 100")),
    responses((status = 200, description = "Squads ranked by points", body = SquadLeaderboardResponse))
)]
/// Squad rankings by total points.
pub async fn squad_leaderboard(
    State(state): State<SharedState>,
    Query(query): Query<SquadListQuery>,
) -> Result<Json<SquadLeaderboardResponse>, ServiceError> {
    let squads = squad_service::squad_leaderboard(&state, query.limit).await?;
    Ok(Json(SquadLeaderboardResponse { ok: true, squads }))
}

#[utoipa::path(
    get,
    path = "/api/squads/search",
    tag = "squads",
    params(
        ("query" = Option<String>, Query, description = "Name or tag substring"),
        ("limit" = Option<i64>, Query, description = "Rows to return, capped at 100")
    ),
    responses((status = 200, description = "Matching squads", body = SquadSearchResponse))
)]
/// Search squads by name or tag.
pub async fn search_squads(
    State(state): State<SharedState>,
    Query(query): Query<SquadListQuery>,
) -> Result<Json<SquadSearchResponse>, ServiceError> {
    let squads = squad_service::search_squads(&state, query.query.as_deref(), query.limit).await?;
    Ok(Json(SquadSearchResponse {
        ok: true,
        squads: squads.into_iter().map(Into::into).collect(),
    }))
}

#[utoipa::path(
    get,
    path = "/api/squads/{id}/profile",
    tag = "squads",
    params(("id" = Uuid, Path, description = "Squad identifier")),
    responses((status = 200, description = "Squad, members and facilities", body = SquadProfile))
)]
/// Public squad profile.
pub async fn squad_profile(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SquadProfile>, ServiceError> {
    Ok(Json(squad_service::squad_profile(&state, id).await?))
}

#[utoipa::path(
    post,
    path = "/api/squads/create",
    tag = "squads",
    request_body = CreateSquadRequest,
    responses((status = 200, description = "Squad created with the caller as leader", body = SquadProfile))
)]
/// Found a squad.
pub async fn create_squad(
    State(state): State<SharedState>,
    Extension(user): Extension<AuthUser>,
    Json(payload): Json<CreateSquadRequest>,
) -> Result<Json<SquadProfile>, ServiceError> {
    validation::check(&payload)?;
    Ok(Json(
        squad_service::create_squad(&state, &user.user_id, payload).await?,
    ))
}

#[utoipa::path(
    get,
    path = "/api/squads/mine",
    tag = "squads",
    responses((status = 200, description = "The caller's squad, if any", body = MySquadResponse))
)]
/// The caller's active squad.
pub async fn my_squad(
    State(state): State<SharedState>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<MySquadResponse>, ServiceError> {
    let profile = squad_service::my_squad(&state, &user.user_id).await?;
    Ok(Json(profile.into()))
}

#[utoipa::path(
    post,
    path = "/api/squads/{id}/join",
    tag = "squads",
    params(("id" = Uuid, Path, description = "Squad identifier")),
    responses((status = 200, description = "Joined the open squad", body = JoinOutcome))
)]
/// Join an open squad directly.
pub async fn join_squad(
    State(state): State<SharedState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<JoinOutcome>, ServiceError> {
    Ok(Json(
        squad_service::join_open_squad(&state, &user.user_id, id).await?,
    ))
}

#[utoipa::path(
    post,
    path = "/api/squads/{id}/request-join",
    tag = "squads",
    params(("id" = Uuid, Path, description = "Squad identifier")),
    responses((status = 200, description = "Joined directly or request pending", body = ResolveOutcome))
)]
/// Ask to join a squad; open squads admit immediately.
pub async fn request_join(
    State(state): State<SharedState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<ResolveOutcome>, ServiceError> {
    Ok(Json(
        squad_service::request_join_squad(&state, &user.user_id, id).await?,
    ))
}

#[utoipa::path(
    post,
    path = "/api/squads/requests/{id}/resolve",
    tag = "squads",
    request_body = ResolveRequestBody,
    params(("id" = Uuid, Path, description = "Join request identifier")),
    responses((status = 200, description = "Request approved or rejected", body = ResolveOutcome))
)]
/// Resolve a pending join request (leader or co-leader only).
pub async fn resolve_request(
    State(state): State<SharedState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
    Json(payload): Json<ResolveRequestBody>,
) -> Result<Json<ResolveOutcome>, ServiceError> {
    let approve = match payload.action.as_str() {
        "approve" => true,
        "reject" => false,
        _ => {
            return Err(ServiceError::validation(
                "action must be one of approve, reject",
            ));
        }
    };
    Ok(Json(
        squad_service::resolve_join_request(&state, &user.user_id, id, approve).await?,
    ))
}

#[utoipa::path(
    post,
    path = "/api/squads/leave",
    tag = "squads",
    responses((status = 200, description = "Left the squad", body = LeaveResponse))
)]
/// Leave the caller's squad.
pub async fn leave_squad(
    State(state): State<SharedState>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<LeaveResponse>, ServiceError> {
    let squad_id = squad_service::leave_squad(&state, &user.user_id).await?;
    Ok(Json(LeaveResponse { ok: true, squad_id }))
}

#[utoipa::path(
    post,
    path = "/api/squads/{id}/upgrade",
    tag = "squads",
    request_body = UpgradeRequestBody,
    params(("id" = Uuid, Path, description = "Squad identifier")),
    responses((status = 200, description = "Facility upgraded", body = UpgradeOutcome))
)]
/// Spend squad points on a facility upgrade (leader or co-leader only).
pub async fn upgrade_facility(
    State(state): State<SharedState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpgradeRequestBody>,
) -> Result<Json<UpgradeOutcome>, ServiceError> {
    let facility = FacilityType::parse(&payload.facility_type).ok_or_else(|| {
        ServiceError::validation(
            "facility_type must be one of training_equipment, spa, analysis_room, medical_center",
        )
    })?;
    Ok(Json(
        squad_service::upgrade_facility(&state, &user.user_id, id, facility).await?,
    ))
}

#[utoipa::path(
    post,
    path = "/api/squads/{id}/set-role",
    tag = "squads",
    request_body = SetRoleRequestBody,
    params(("id" = Uuid, Path, description = "Squad identifier")),
    responses((status = 200, description = "Member role updated", body = SetRoleResponse))
)]
/// Promote or demote a member (leader only).
pub async fn set_member_role(
    State(state): State<SharedState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
    Json(payload): Json<SetRoleRequestBody>,
) -> Result<Json<SetRoleResponse>, ServiceError> {
    squad_service::set_member_role(&state, &user.user_id, id, &payload.user_id, &payload.role)
        .await?;
    Ok(Json(SetRoleResponse {
        ok: true,
        squad_id: id,
        user_id: payload.user_id,
        role: payload.role,
    }))
}

#[utoipa::path(
    get,
    path = "/api/squads/{id}/requests",
    tag = "squads",
    params(("id" = Uuid, Path, description = "Squad identifier")),
    responses((status = 200, description = "Pending join requests", body = RequestsResponse))
)]
/// Pending join requests for a squad (leader or co-leader only).
pub async fn list_requests(
    State(state): State<SharedState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<RequestsResponse>, ServiceError> {
    let requests = squad_service::pending_requests(&state, &user.user_id, id).await?;
    Ok(Json(RequestsResponse {
        ok: true,
        requests: requests.into_iter().map(Into::into).collect(),
    }))
}
