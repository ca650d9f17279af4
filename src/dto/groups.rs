use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::dao::models::LeaderboardGroup;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateGroupRequest {
    #[validate(length(min = 3, max = 40, message = "must be 3-40 characters"))]
    pub name: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct JoinGroupRequest {
    #[validate(length(min = 1, message = "is required"))]
    pub invite_code: String,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct GroupSummary {
    pub id: Uuid,
    pub name: String,
    pub invite_code: String,
    pub created_by: String,
    pub member_count: Option<i64>,
}

impl From<LeaderboardGroup> for GroupSummary {
    fn from(group: LeaderboardGroup) -> Self {
        Self {
            id: group.id,
            name: group.name,
            invite_code: group.invite_code,
            created_by: group.created_by,
            member_count: None,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct GroupResponse {
    pub ok: bool,
    pub group: GroupSummary,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct GroupJoinOutcome {
    pub ok: bool,
    pub group: GroupSummary,
    pub already_member: bool,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MyGroupsResponse {
    pub ok: bool,
    pub groups: Vec<GroupSummary>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LeaveGroupResponse {
    pub ok: bool,
    pub group_id: Uuid,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct GroupLeaderboardResponse {
    pub ok: bool,
    pub group_id: Uuid,
    pub leaderboard: Vec<crate::dto::leaderboard::LeaderboardEntry>,
}
