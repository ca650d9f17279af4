use serde::Serialize;
use sqlx::FromRow;
use utoipa::ToSchema;

/// One ranked coach. Shared by the global board and group boards; both use
/// the same comparator.
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct LeaderboardEntry {
    pub user_id: String,
    pub display_name: String,
    pub completions_count: i32,
    pub best_days_to_premier: Option<i32>,
    pub avg_days_to_premier: Option<i32>,
    pub rank: i64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct GlobalLeaderboard {
    pub ok: bool,
    pub leaderboard: Vec<LeaderboardEntry>,
    pub my_entry: LeaderboardEntry,
    pub total_coaches: i64,
}
