//! Player career lifecycle: registration, progress pushes, and the atomic
//! career-completion pipeline.

use chrono::{DateTime, Utc};
use sqlx::{Postgres, Transaction};
use tracing::info;
use uuid::Uuid;

use crate::{
    dao::models::Player,
    dto::players::{CompletionOutcome, CreatePlayerRequest, ProgressRequest},
    error::{ServiceError, is_unique_violation},
    league::League,
    state::SharedState,
};

const MS_PER_DAY: i64 = 86_400_000;
const DEFAULT_RATING: i32 = 60;

/// Idempotent registration. A second create for the same player id keeps the
/// existing row (rating and league untouched) and at most refreshes the
/// display name. Also ensures the owning coach has a stats row.
pub async fn create_player(
    state: &SharedState,
    user_id: &str,
    request: CreatePlayerRequest,
) -> Result<Player, ServiceError> {
    if request.player_id.trim().is_empty() {
        return Err(ServiceError::validation("player_id is required"));
    }
    let rating = match request.overall_rating {
        Some(rating) => validate_rating(rating)?,
        None => DEFAULT_RATING,
    };
    let league = match request.current_league.as_deref() {
        Some(raw) => parse_league(raw)?,
        None => League::LeagueTwo,
    };

    let mut tx = state.db.begin().await?;

    let player: Player = sqlx::query_as(
        r#"
        INSERT INTO players (id, user_id, display_name, overall_rating, current_league)
        VALUES ($1, $2, $3, $4, $5)
        ON CONFLICT (id) DO UPDATE
            SET display_name = COALESCE(EXCLUDED.display_name, players.display_name),
                updated_at = now()
        RETURNING *
        "#,
    )
    .bind(&request.player_id)
    .bind(user_id)
    .bind(&request.display_name)
    .bind(rating)
    .bind(league.as_str())
    .fetch_one(&mut *tx)
    .await?;

    sqlx::query(
        "INSERT INTO coach_stats (user_id, display_name) VALUES ($1, $2)
         ON CONFLICT (user_id) DO NOTHING",
    )
    .bind(user_id)
    .bind(&request.display_name)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;
    Ok(player)
}

/// Owner-scoped read.
pub async fn get_player(
    state: &SharedState,
    user_id: &str,
    player_id: &str,
) -> Result<Player, ServiceError> {
    let player = fetch_player(state, player_id)
        .await?
        .ok_or_else(|| ServiceError::not_found("player not found"))?;
    if player.user_id != user_id {
        return Err(ServiceError::forbidden("player belongs to another coach"));
    }
    Ok(player)
}

/// Apply a rating/league push from the game backend. Completed careers are
/// frozen: the push silently no-ops and returns `None`.
pub async fn update_player_progress(
    state: &SharedState,
    player_id: &str,
    request: ProgressRequest,
) -> Result<Option<Player>, ServiceError> {
    if request.overall_rating.is_none() && request.current_league.is_none() {
        return Err(ServiceError::validation(
            "at least one of overall_rating or current_league is required",
        ));
    }
    let rating = request.overall_rating.map(validate_rating).transpose()?;
    let league = request
        .current_league
        .as_deref()
        .map(parse_league)
        .transpose()?;

    let player = fetch_player(state, player_id)
        .await?
        .ok_or_else(|| ServiceError::not_found("player not found"))?;
    if player.user_id != request.user_id {
        return Err(ServiceError::forbidden("player belongs to another coach"));
    }
    if player.career_status != "active" {
        return Ok(None);
    }

    let updated: Option<Player> = sqlx::query_as(
        r#"
        UPDATE players
        SET overall_rating = COALESCE($2, overall_rating),
            current_league = COALESCE($3, current_league),
            updated_at = now()
        WHERE id = $1 AND career_status = 'active'
        RETURNING *
        "#,
    )
    .bind(player_id)
    .bind(rating)
    .bind(league.map(|l| l.as_str()))
    .fetch_optional(&state.db)
    .await?;

    // A completion racing between the read and the write leaves the row
    // frozen; that is the same silent no-op as reading it completed.
    Ok(updated)
}

/// Owner-gated completion, used by the manual complete endpoint.
pub async fn complete_own_player(
    state: &SharedState,
    user_id: &str,
    player_id: &str,
) -> Result<CompletionOutcome, ServiceError> {
    let player = fetch_player(state, player_id)
        .await?
        .ok_or_else(|| ServiceError::not_found("player not found"))?;
    if player.user_id != user_id {
        return Err(ServiceError::forbidden("player belongs to another coach"));
    }
    complete_player_career(state, player_id).await
}

/// Complete a career in a fresh transaction. See [`complete_career_in_tx`].
pub async fn complete_player_career(
    state: &SharedState,
    player_id: &str,
) -> Result<CompletionOutcome, ServiceError> {
    let mut tx = state.db.begin().await?;
    let outcome = complete_career_in_tx(&mut tx, player_id, Utc::now()).await?;
    tx.commit().await?;
    Ok(outcome)
}

/// The atomic completion pipeline, composable with a caller-owned
/// transaction (the sweep runs one per candidate).
///
/// Serialization: the `FOR UPDATE` on the player row orders concurrent
/// completers; the unique constraint on `career_completions.player_id`
/// catches anything that slips past and turns the losing writer into an
/// idempotent `already_completed` outcome (its transaction is rolled back).
pub async fn complete_career_in_tx(
    tx: &mut Transaction<'_, Postgres>,
    player_id: &str,
    now: DateTime<Utc>,
) -> Result<CompletionOutcome, ServiceError> {
    let player: Player = sqlx::query_as("SELECT * FROM players WHERE id = $1 FOR UPDATE")
        .bind(player_id)
        .fetch_optional(&mut **tx)
        .await?
        .ok_or_else(|| ServiceError::not_found("player not found"))?;

    if player.career_status == "completed" {
        return Ok(CompletionOutcome::already_completed(player));
    }

    let days = days_to_premier(player.career_started_at, now);

    sqlx::query(
        "UPDATE players
         SET career_status = 'completed', career_completed_at = $2, updated_at = $2
         WHERE id = $1",
    )
    .bind(player_id)
    .bind(now)
    .execute(&mut **tx)
    .await?;

    let inserted = sqlx::query(
        "INSERT INTO career_completions (id, player_id, user_id, days_to_premier, completed_at)
         VALUES ($1, $2, $3, $4, $5)",
    )
    .bind(Uuid::new_v4())
    .bind(player_id)
    .bind(&player.user_id)
    .bind(days)
    .bind(now)
    .execute(&mut **tx)
    .await;

    if let Err(err) = inserted {
        if is_unique_violation(&err, "career_completions_player_id_key") {
            return Ok(CompletionOutcome::already_completed(player));
        }
        return Err(err.into());
    }

    sqlx::query(
        r#"
        INSERT INTO coach_stats
            (user_id, display_name, completions_count, best_days_to_premier,
             avg_days_to_premier, total_days_sum)
        VALUES ($1, $2, 1, $3, $3, $3)
        ON CONFLICT (user_id) DO UPDATE SET
            completions_count = coach_stats.completions_count + 1,
            total_days_sum = coach_stats.total_days_sum + EXCLUDED.total_days_sum,
            avg_days_to_premier = ROUND(
                (coach_stats.total_days_sum + EXCLUDED.total_days_sum)::numeric
                    / (coach_stats.completions_count + 1)
            )::int,
            best_days_to_premier = LEAST(
                COALESCE(coach_stats.best_days_to_premier, EXCLUDED.best_days_to_premier),
                EXCLUDED.best_days_to_premier
            ),
            updated_at = now()
        "#,
    )
    .bind(&player.user_id)
    .bind(&player.display_name)
    .bind(days)
    .execute(&mut **tx)
    .await?;

    let squad_awarded = award_squad_point(tx, &player.user_id, now).await?;

    info!(
        player_id,
        user_id = %player.user_id,
        days_to_premier = days,
        squad_awarded,
        "career completed"
    );

    Ok(CompletionOutcome {
        player_id: player.id,
        user_id: player.user_id,
        already_completed: false,
        days_to_premier: Some(days),
        squad_awarded,
    })
}

/// Credit the coach's active squad, if any, with one point.
async fn award_squad_point(
    tx: &mut Transaction<'_, Postgres>,
    user_id: &str,
    now: DateTime<Utc>,
) -> Result<bool, ServiceError> {
    let squad_id: Option<Uuid> = sqlx::query_scalar(
        "SELECT squad_id FROM squad_members WHERE user_id = $1 AND status = 'active'",
    )
    .bind(user_id)
    .fetch_optional(&mut **tx)
    .await?;

    let Some(squad_id) = squad_id else {
        return Ok(false);
    };

    sqlx::query(
        "UPDATE coaching_squads
         SET total_points = total_points + 1,
             unspent_points = unspent_points + 1,
             updated_at = $2
         WHERE id = $1",
    )
    .bind(squad_id)
    .bind(now)
    .execute(&mut **tx)
    .await?;

    sqlx::query(
        "UPDATE squad_members SET points_contributed = points_contributed + 1
         WHERE squad_id = $1 AND user_id = $2",
    )
    .bind(squad_id)
    .bind(user_id)
    .execute(&mut **tx)
    .await?;

    sqlx::query(
        "INSERT INTO squad_point_events (id, squad_id, user_id, points, reason, created_at)
         VALUES ($1, $2, $3, 1, 'premier_completion', $4)",
    )
    .bind(Uuid::new_v4())
    .bind(squad_id)
    .bind(user_id)
    .bind(now)
    .execute(&mut **tx)
    .await?;

    Ok(true)
}

/// Whole days between career start and completion, rounded up, minimum 1.
pub fn days_to_premier(started_at: DateTime<Utc>, completed_at: DateTime<Utc>) -> i32 {
    let elapsed_ms = (completed_at - started_at).num_milliseconds().max(0);
    let days = (elapsed_ms + MS_PER_DAY - 1) / MS_PER_DAY;
    days.max(1) as i32
}

async fn fetch_player(
    state: &SharedState,
    player_id: &str,
) -> Result<Option<Player>, ServiceError> {
    let player = sqlx::query_as("SELECT * FROM players WHERE id = $1")
        .bind(player_id)
        .fetch_optional(&state.db)
        .await?;
    Ok(player)
}

fn validate_rating(rating: i32) -> Result<i32, ServiceError> {
    if (1..=99).contains(&rating) {
        Ok(rating)
    } else {
        Err(ServiceError::validation(
            "overall_rating must be between 1 and 99",
        ))
    }
}

fn parse_league(raw: &str) -> Result<League, ServiceError> {
    League::parse(raw).ok_or_else(|| {
        ServiceError::validation(
            "current_league must be one of league_two, league_one, championship",
        )
    })
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn at(ms: i64) -> DateTime<Utc> {
        Utc.timestamp_millis_opt(ms).unwrap()
    }

    #[test]
    fn test_days_to_premier_rounds_up() {
        assert_eq!(days_to_premier(at(0), at(1)), 1);
        assert_eq!(days_to_premier(at(0), at(MS_PER_DAY)), 1);
        assert_eq!(days_to_premier(at(0), at(MS_PER_DAY + 1)), 2);
        assert_eq!(days_to_premier(at(0), at(MS_PER_DAY * 10)), 10);
    }

    #[test]
    fn test_days_to_premier_minimum_one() {
        // Same-instant and clock-skewed starts still count as one day.
        assert_eq!(days_to_premier(at(5_000), at(5_000)), 1);
        assert_eq!(days_to_premier(at(10_000), at(5_000)), 1);
    }

    #[test]
    fn test_rating_bounds() {
        assert!(validate_rating(0).is_err());
        assert!(validate_rating(1).is_ok());
        assert!(validate_rating(99).is_ok());
        assert!(validate_rating(100).is_err());
    }
}
