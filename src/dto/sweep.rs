use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::dto::players::CompletionOutcome;

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct RunSweepRequest {
    /// Override the fourth-day schedule (never the once-per-day stamp).
    #[serde(default)]
    pub force: bool,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PromotionRecord {
    pub player_id: String,
    pub user_id: String,
    pub from_league: String,
    pub to_league: String,
    pub overall_rating: i32,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SkipRecord {
    pub player_id: String,
    pub current_league: String,
    pub overall_rating: i32,
    pub threshold: i32,
}

/// Full report of one executed sweep. Promotion and skip listings are capped
/// server-side; completions and errors are always complete.
#[derive(Debug, Serialize, ToSchema)]
pub struct SweepSummary {
    pub ok: bool,
    pub utc_day: i64,
    pub run_count: i64,
    pub total_active: usize,
    pub promoted: u64,
    pub completed: usize,
    pub skipped: usize,
    pub promotions_truncated: bool,
    pub skips_truncated: bool,
    pub promotions: Vec<PromotionRecord>,
    pub skips: Vec<SkipRecord>,
    pub completions: Vec<CompletionOutcome>,
    pub errors: Vec<String>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(untagged)]
pub enum SweepRunResponse {
    Skipped {
        ok: bool,
        executed: bool,
        reason: String,
        utc_day: i64,
    },
    Executed(Box<SweepSummary>),
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SweepStatus {
    pub ok: bool,
    pub utc_day: i64,
    pub scheduled_today: bool,
    pub already_ran_today: bool,
    pub last_sweep_utc_day: Option<i64>,
    pub last_sweep_at: Option<DateTime<Utc>>,
    pub run_count: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_response_serializes_flat() {
        // Untagged: clients see one object shape per outcome, no enum wrapper.
        let skipped = SweepRunResponse::Skipped {
            ok: true,
            executed: false,
            reason: "already_ran_today".into(),
            utc_day: 20_240,
        };
        let value = serde_json::to_value(&skipped).unwrap();
        assert_eq!(value["executed"], false);
        assert_eq!(value["reason"], "already_ran_today");
        assert!(value.get("Skipped").is_none());
    }

    #[test]
    fn test_force_defaults_off() {
        let parsed: RunSweepRequest = serde_json::from_str("{}").unwrap();
        assert!(!parsed.force);
        let parsed: RunSweepRequest = serde_json::from_str(r#"{"force":true}"#).unwrap();
        assert!(parsed.force);
    }
}
