use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::league::League;

/// Per-tier outcome of one simulate-day invocation.
#[derive(Debug, Serialize, ToSchema)]
pub struct TierReport {
    pub efl_tier: String,
    pub status: String,
    pub matchday: Option<i32>,
    pub detail: Option<String>,
}

impl TierReport {
    pub fn ok(league: League, matchday: i32) -> Self {
        Self::with_status(league, "ok", Some(matchday), None)
    }

    pub fn already_played(league: League, matchday: i32) -> Self {
        Self::with_status(league, "already_played", Some(matchday), None)
    }

    pub fn new_season(league: League, matchday: i32) -> Self {
        Self::with_status(league, "new_season_created", Some(matchday), None)
    }

    pub fn season_completed(league: League, matchday: i32) -> Self {
        Self::with_status(league, "season_completed", Some(matchday), None)
    }

    pub fn aborted(league: League, matchday: i32, detail: String) -> Self {
        Self::with_status(league, "aborted", Some(matchday), Some(detail))
    }

    pub fn error(league: League, detail: String) -> Self {
        Self::with_status(league, "error", None, Some(detail))
    }

    /// Aborts and errors make the whole batch a partial failure (207).
    pub fn is_failure(&self) -> bool {
        matches!(self.status.as_str(), "aborted" | "error")
    }

    fn with_status(
        league: League,
        status: &str,
        matchday: Option<i32>,
        detail: Option<String>,
    ) -> Self {
        Self {
            efl_tier: league.as_str().to_string(),
            status: status.to_string(),
            matchday,
            detail,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SimulateDayReport {
    pub ok: bool,
    pub tiers: Vec<TierReport>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ResetSyncEntry {
    pub efl_tier: String,
    pub season_id: Uuid,
    pub current_matchday: i32,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ResetSyncReport {
    pub ok: bool,
    pub seasons: Vec<ResetSyncEntry>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SeasonStatusEntry {
    pub efl_tier: String,
    pub season_id: Uuid,
    pub status: String,
    pub current_matchday: i32,
    pub progress_matchday: i32,
    pub total_matchdays: i32,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SeasonStatusResponse {
    pub ok: bool,
    pub seasons: Vec<SeasonStatusEntry>,
}
