use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{
    dao::models::{CoachingSquad, SquadJoinRequest, SquadMember},
    dto::validation::validate_tag,
};

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateSquadRequest {
    #[validate(length(min = 3, max = 40, message = "must be 3-40 characters"))]
    pub name: String,
    #[validate(custom(function = validate_tag))]
    pub tag: Option<String>,
    #[validate(length(max = 200, message = "must be at most 200 characters"))]
    pub description: Option<String>,
    pub privacy: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpgradeRequestBody {
    pub facility_type: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct SetRoleRequestBody {
    pub user_id: String,
    pub role: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ResolveRequestBody {
    /// One of `approve`, `reject`.
    pub action: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct SquadListQuery {
    pub limit: Option<i64>,
    pub query: Option<String>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct SquadSummary {
    pub id: Uuid,
    pub name: String,
    pub tag: Option<String>,
    pub description: Option<String>,
    pub leader_user_id: String,
    pub privacy: String,
    pub total_points: i32,
    pub unspent_points: i32,
    pub level: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<CoachingSquad> for SquadSummary {
    fn from(squad: CoachingSquad) -> Self {
        Self {
            id: squad.id,
            name: squad.name,
            tag: squad.tag,
            description: squad.description,
            leader_user_id: squad.leader_user_id,
            privacy: squad.privacy,
            total_points: squad.total_points,
            unspent_points: squad.unspent_points,
            level: squad.level,
            created_at: squad.created_at,
            updated_at: squad.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct MemberView {
    pub user_id: String,
    pub role: String,
    pub points_contributed: i32,
    pub joined_at: DateTime<Utc>,
}

impl From<SquadMember> for MemberView {
    fn from(member: SquadMember) -> Self {
        Self {
            user_id: member.user_id,
            role: member.role,
            points_contributed: member.points_contributed,
            joined_at: member.joined_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct FacilityView {
    pub facility_type: String,
    pub level: i32,
    pub next_upgrade_cost: Option<i32>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SquadProfile {
    pub ok: bool,
    pub squad: SquadSummary,
    pub members: Vec<MemberView>,
    pub facilities: Vec<FacilityView>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MySquadResponse {
    pub ok: bool,
    pub in_squad: bool,
    pub squad: Option<SquadSummary>,
    pub members: Vec<MemberView>,
    pub facilities: Vec<FacilityView>,
}

impl From<Option<SquadProfile>> for MySquadResponse {
    fn from(profile: Option<SquadProfile>) -> Self {
        match profile {
            Some(profile) => Self {
                ok: true,
                in_squad: true,
                squad: Some(profile.squad),
                members: profile.members,
                facilities: profile.facilities,
            },
            None => Self {
                ok: true,
                in_squad: false,
                squad: None,
                members: Vec::new(),
                facilities: Vec::new(),
            },
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct JoinOutcome {
    pub ok: bool,
    pub squad_id: Uuid,
    pub role: String,
    pub already_member: bool,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct JoinRequestView {
    pub id: Uuid,
    pub squad_id: Uuid,
    pub user_id: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub resolved_at: Option<DateTime<Utc>>,
    pub resolved_by: Option<String>,
}

impl From<SquadJoinRequest> for JoinRequestView {
    fn from(request: SquadJoinRequest) -> Self {
        Self {
            id: request.id,
            squad_id: request.squad_id,
            user_id: request.user_id,
            status: request.status,
            created_at: request.created_at,
            resolved_at: request.resolved_at,
            resolved_by: request.resolved_by,
        }
    }
}

/// Outcome of the join protocol: either an immediate membership (open
/// squads) or a request row in whatever state it ended up.
#[derive(Debug, Serialize, ToSchema)]
pub struct ResolveOutcome {
    pub ok: bool,
    pub joined: bool,
    pub squad_id: Option<Uuid>,
    pub request: Option<JoinRequestView>,
}

impl ResolveOutcome {
    pub fn joined(squad_id: Uuid, request: Option<SquadJoinRequest>) -> Self {
        Self {
            ok: true,
            joined: true,
            squad_id: Some(squad_id),
            request: request.map(Into::into),
        }
    }

    pub fn pending(request: SquadJoinRequest) -> Self {
        Self {
            ok: true,
            joined: false,
            squad_id: Some(request.squad_id),
            request: Some(request.into()),
        }
    }

    pub fn resolved(request: SquadJoinRequest) -> Self {
        Self {
            ok: true,
            joined: request.status == "approved",
            squad_id: Some(request.squad_id),
            request: Some(request.into()),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct UpgradeOutcome {
    pub ok: bool,
    pub facility_type: String,
    pub level: i32,
    pub cost: i32,
    pub unspent_points: i32,
    pub squad_level: i32,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LeaveResponse {
    pub ok: bool,
    pub squad_id: Uuid,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SquadLeaderboardEntry {
    pub rank: i64,
    pub id: Uuid,
    pub name: String,
    pub tag: Option<String>,
    pub total_points: i32,
    pub level: i32,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SquadLeaderboardResponse {
    pub ok: bool,
    pub squads: Vec<SquadLeaderboardEntry>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SquadSearchResponse {
    pub ok: bool,
    pub squads: Vec<SquadSummary>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct RequestsResponse {
    pub ok: bool,
    pub requests: Vec<JoinRequestView>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SetRoleResponse {
    pub ok: bool,
    pub squad_id: Uuid,
    pub user_id: String,
    pub role: String,
}
