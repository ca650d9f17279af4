use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::dao::models::Player;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreatePlayerRequest {
    #[validate(length(min = 1, max = 64, message = "must be 1-64 characters"))]
    pub player_id: String,
    #[validate(length(max = 64, message = "must be at most 64 characters"))]
    pub display_name: Option<String>,
    pub overall_rating: Option<i32>,
    pub current_league: Option<String>,
}

/// Progress push from the game backend. `user_id` is trusted only because
/// the HMAC gate verified the body signature.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ProgressRequest {
    #[validate(length(min = 1, message = "is required"))]
    pub user_id: String,
    pub overall_rating: Option<i32>,
    pub current_league: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PlayerSummary {
    pub id: String,
    pub user_id: String,
    pub display_name: Option<String>,
    pub overall_rating: i32,
    pub current_league: String,
    pub career_status: String,
    pub career_started_at: DateTime<Utc>,
    pub career_completed_at: Option<DateTime<Utc>>,
}

impl From<Player> for PlayerSummary {
    fn from(player: Player) -> Self {
        Self {
            id: player.id,
            user_id: player.user_id,
            display_name: player.display_name,
            overall_rating: player.overall_rating,
            current_league: player.current_league,
            career_status: player.career_status,
            career_started_at: player.career_started_at,
            career_completed_at: player.career_completed_at,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PlayerResponse {
    pub ok: bool,
    pub player: PlayerSummary,
}

impl From<Player> for PlayerResponse {
    fn from(player: Player) -> Self {
        Self {
            ok: true,
            player: player.into(),
        }
    }
}

/// Progress responses distinguish "applied" from the silent no-op on a
/// completed career.
#[derive(Debug, Serialize, ToSchema)]
pub struct ProgressResponse {
    pub ok: bool,
    pub updated: bool,
    pub player: Option<PlayerSummary>,
}

/// Result of one career completion attempt.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CompletionOutcome {
    pub player_id: String,
    pub user_id: String,
    pub already_completed: bool,
    pub days_to_premier: Option<i32>,
    pub squad_awarded: bool,
}

impl CompletionOutcome {
    pub fn already_completed(player: Player) -> Self {
        Self {
            player_id: player.id,
            user_id: player.user_id,
            already_completed: true,
            days_to_premier: None,
            squad_awarded: false,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CompleteResponse {
    pub ok: bool,
    pub already_completed: bool,
    pub days_to_premier: Option<i32>,
    pub squad_awarded: bool,
}

impl From<CompletionOutcome> for CompleteResponse {
    fn from(outcome: CompletionOutcome) -> Self {
        Self {
            ok: true,
            already_completed: outcome.already_completed,
            days_to_premier: outcome.days_to_premier,
            squad_awarded: outcome.squad_awarded,
        }
    }
}
