//! Row types mapped straight off the Postgres schema.
//!
//! Enumerated columns stay `String` here; the services parse them into the
//! domain enums where behavior branches on them.

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, FromRow)]
pub struct Player {
    pub id: String,
    pub user_id: String,
    pub display_name: Option<String>,
    pub overall_rating: i32,
    pub current_league: String,
    pub career_status: String,
    pub career_started_at: DateTime<Utc>,
    pub career_completed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow)]
pub struct CareerCompletion {
    pub id: Uuid,
    pub player_id: String,
    pub user_id: String,
    pub days_to_premier: i32,
    pub completed_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow)]
pub struct CoachStats {
    pub user_id: String,
    pub display_name: Option<String>,
    pub completions_count: i32,
    pub best_days_to_premier: Option<i32>,
    pub avg_days_to_premier: Option<i32>,
    pub total_days_sum: i64,
}

#[derive(Debug, Clone, FromRow)]
pub struct CoachingSquad {
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

#[derive(Debug, Clone, FromRow)]
pub struct SquadMember {
    pub squad_id: Uuid,
    pub user_id: String,
    pub role: String,
    pub points_contributed: i32,
    pub status: String,
    pub joined_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow)]
pub struct SquadJoinRequest {
    pub id: Uuid,
    pub squad_id: Uuid,
    pub user_id: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub resolved_at: Option<DateTime<Utc>>,
    pub resolved_by: Option<String>,
}

#[derive(Debug, Clone, FromRow)]
pub struct SquadFacility {
    pub squad_id: Uuid,
    pub facility_type: String,
    pub level: i32,
}

#[derive(Debug, Clone, FromRow)]
pub struct LeaderboardGroup {
    pub id: Uuid,
    pub name: String,
    pub invite_code: String,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow)]
pub struct SweepState {
    pub id: i32,
    pub last_sweep_utc_day: Option<i64>,
    pub last_sweep_at: Option<DateTime<Utc>>,
    pub run_count: i64,
}

#[derive(Debug, Clone, FromRow)]
pub struct Club {
    pub id: Uuid,
    pub name: String,
    pub efl_tier: String,
}

#[derive(Debug, Clone, FromRow)]
pub struct Season {
    pub id: Uuid,
    pub efl_tier: String,
    pub current_matchday: i32,
    pub total_matchdays: i32,
    pub fixtures_generated: bool,
    pub status: String,
}

#[derive(Debug, Clone, FromRow)]
pub struct Fixture {
    pub id: Uuid,
    pub season_id: Uuid,
    pub efl_tier: String,
    pub matchday: i32,
    pub home_club_id: Uuid,
    pub away_club_id: Uuid,
    pub home_goals: Option<i32>,
    pub away_goals: Option<i32>,
    pub status: String,
    pub played_at: Option<DateTime<Utc>>,
}

impl Fixture {
    /// A fixture counts as played once a result is durably recorded. Stored
    /// status strings vary between writers, so `played_at` is the primary
    /// signal and the status string only a fallback.
    pub fn is_played(&self) -> bool {
        self.played_at.is_some() || self.status.eq_ignore_ascii_case("played")
    }

    /// Strictly untouched: no timestamp and no goals on either side.
    pub fn is_upcoming(&self) -> bool {
        self.played_at.is_none() && self.home_goals.is_none() && self.away_goals.is_none()
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct TeamSeason {
    pub season_id: Uuid,
    pub club_id: Uuid,
    pub played: i32,
    pub won: i32,
    pub drawn: i32,
    pub lost: i32,
    pub goals_for: i32,
    pub goals_against: i32,
    pub goal_difference: i32,
    pub points: i32,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixture(
        status: &str,
        played_at: Option<DateTime<Utc>>,
        goals: Option<(i32, i32)>,
    ) -> Fixture {
        Fixture {
            id: Uuid::new_v4(),
            season_id: Uuid::new_v4(),
            efl_tier: "league_two".into(),
            matchday: 1,
            home_club_id: Uuid::new_v4(),
            away_club_id: Uuid::new_v4(),
            home_goals: goals.map(|g| g.0),
            away_goals: goals.map(|g| g.1),
            status: status.into(),
            played_at,
        }
    }

    #[test]
    fn test_fixture_classification_ignores_status_spelling() {
        // Writers have stored "UPCOMING", "scheduled" and "" for unplayed rows.
        assert!(fixture("UPCOMING", None, None).is_upcoming());
        assert!(fixture("scheduled", None, None).is_upcoming());
        assert!(fixture("", None, None).is_upcoming());

        assert!(fixture("PLAYED", None, None).is_played());
        assert!(fixture("played", None, None).is_played());
        assert!(fixture("whatever", Some(Utc::now()), Some((1, 0))).is_played());
    }

    #[test]
    fn test_fixture_with_goals_is_not_upcoming() {
        let fx = fixture("UPCOMING", None, Some((2, 2)));
        assert!(!fx.is_upcoming());
        assert!(!fx.is_played());
    }
}
