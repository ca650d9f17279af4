use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Serialize, ToSchema)]
pub struct LeagueInfo {
    pub efl_tier: String,
    pub display_name: String,
    pub season_id: Option<Uuid>,
    pub current_matchday: Option<i32>,
    pub status: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LeaguesResponse {
    pub ok: bool,
    pub leagues: Vec<LeagueInfo>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct TableRow {
    pub position: i32,
    pub club_id: Uuid,
    pub club_name: String,
    pub played: i32,
    pub won: i32,
    pub drawn: i32,
    pub lost: i32,
    pub goals_for: i32,
    pub goals_against: i32,
    pub goal_difference: i32,
    pub points: i32,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct TableResponse {
    pub ok: bool,
    pub efl_tier: String,
    pub season_id: Uuid,
    pub standings: Vec<TableRow>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct FixtureView {
    pub id: Uuid,
    pub matchday: i32,
    pub home_club_id: Uuid,
    pub home_club: String,
    pub away_club_id: Uuid,
    pub away_club: String,
    pub home_goals: Option<i32>,
    pub away_goals: Option<i32>,
    pub status: String,
    pub played_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct FixturesResponse {
    pub ok: bool,
    pub efl_tier: String,
    pub matchday: i32,
    pub fixtures: Vec<FixtureView>,
}

/// `?matchday=N` selector shared by the fixtures and results routes.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct MatchdayQuery {
    pub matchday: Option<i32>,
}
