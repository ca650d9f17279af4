//! The transfer sweep: every fourth UTC day, promote careers that clear
//! their tier threshold and complete the ones topping out of the
//! championship.
//!
//! Exactly-once under double-fire crons comes from two layers: a
//! transaction-scoped advisory lock totally orders concurrent invocations,
//! and the stamped `last_sweep_utc_day` short-circuits whichever one arrives
//! second.

use std::collections::BTreeMap;

use chrono::Utc;
use sqlx::FromRow;
use tracing::{info, warn};

use crate::{
    dao::{self, models::SweepState},
    dto::players::CompletionOutcome,
    dto::sweep::{PromotionRecord, SkipRecord, SweepStatus, SweepSummary},
    error::ServiceError,
    league::League,
    services::player_service,
    state::SharedState,
};

/// Fixed advisory-lock key for the sweep; any value works as long as every
/// instance agrees on it.
const SWEEP_LOCK_KEY: i64 = 7_270_201;
const MS_PER_DAY: i64 = 86_400_000;
/// Sweeps run on every fourth UTC day.
const SWEEP_CADENCE_DAYS: i64 = 4;
/// Promotion and skip lists in the summary are capped; completions and
/// errors are always reported in full.
const SUMMARY_LIST_CAP: usize = 100;

pub fn utc_day(unix_ms: i64) -> i64 {
    unix_ms.div_euclid(MS_PER_DAY)
}

pub fn is_scheduled_day(day: i64) -> bool {
    day % SWEEP_CADENCE_DAYS == 0
}

/// What the sweep decided for one active player.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SweepAction {
    /// Below the threshold for the current tier.
    Skip,
    /// Move up one tier.
    Promote(League),
    /// Topped out of the championship.
    Complete,
}

pub fn classify(league: League, rating: i32) -> SweepAction {
    if rating < league.promotion_threshold() {
        return SweepAction::Skip;
    }
    match league.next() {
        Some(target) => SweepAction::Promote(target),
        None => SweepAction::Complete,
    }
}

/// Outcome of one sweep invocation.
pub enum SweepOutcome {
    Skipped { reason: &'static str, utc_day: i64 },
    Executed(Box<SweepSummary>),
}

#[derive(Debug, FromRow)]
struct SweepCandidate {
    id: String,
    user_id: String,
    overall_rating: i32,
    current_league: String,
}

/// Run the sweep. `force` overrides the fourth-day schedule but never the
/// once-per-day stamp.
pub async fn run_sweep(state: &SharedState, force: bool) -> Result<SweepOutcome, ServiceError> {
    let now = Utc::now();
    let today = utc_day(now.timestamp_millis());

    // Phase 1: decide-and-stamp under the advisory lock. A concurrent
    // invocation blocks on the lock; by the time it proceeds the stamp
    // already equals today and it short-circuits.
    let mut tx = state.db.begin().await?;
    dao::advisory_xact_lock(&mut tx, SWEEP_LOCK_KEY).await?;

    let sweep_state: SweepState =
        sqlx::query_as("SELECT * FROM sweep_state WHERE id = 1 FOR UPDATE")
            .fetch_one(&mut *tx)
            .await?;

    if !force && !is_scheduled_day(today) {
        tx.rollback().await?;
        return Ok(SweepOutcome::Skipped {
            reason: "not_scheduled_today",
            utc_day: today,
        });
    }
    if sweep_state.last_sweep_utc_day == Some(today) {
        tx.rollback().await?;
        return Ok(SweepOutcome::Skipped {
            reason: "already_ran_today",
            utc_day: today,
        });
    }

    let run_count = sweep_state.run_count + 1;
    sqlx::query(
        "UPDATE sweep_state
         SET last_sweep_utc_day = $1, last_sweep_at = $2, run_count = $3
         WHERE id = 1",
    )
    .bind(today)
    .bind(now)
    .bind(run_count)
    .execute(&mut *tx)
    .await?;
    tx.commit().await?;

    info!(utc_day = today, run_count, force, "sweep executing");

    // Phase 2: load the batch. Order by id so reruns process players in a
    // stable order.
    let candidates: Vec<SweepCandidate> = sqlx::query_as(
        "SELECT id, user_id, overall_rating, current_league
         FROM players WHERE career_status = 'active' ORDER BY id",
    )
    .fetch_all(&state.db)
    .await?;
    let total_active = candidates.len();

    // Phase 3: classify.
    let mut to_complete: Vec<SweepCandidate> = Vec::new();
    let mut to_promote: BTreeMap<&'static str, Vec<String>> = BTreeMap::new();
    let mut skips: Vec<SkipRecord> = Vec::new();
    let mut errors: Vec<String> = Vec::new();
    let mut promotions: Vec<PromotionRecord> = Vec::new();

    for candidate in candidates {
        let Some(league) = League::parse(&candidate.current_league) else {
            errors.push(format!(
                "player {}: unknown league `{}`",
                candidate.id, candidate.current_league
            ));
            continue;
        };
        match classify(league, candidate.overall_rating) {
            SweepAction::Skip => skips.push(SkipRecord {
                player_id: candidate.id,
                current_league: league.as_str().to_string(),
                overall_rating: candidate.overall_rating,
                threshold: league.promotion_threshold(),
            }),
            SweepAction::Promote(target) => {
                promotions.push(PromotionRecord {
                    player_id: candidate.id.clone(),
                    user_id: candidate.user_id.clone(),
                    from_league: league.as_str().to_string(),
                    to_league: target.as_str().to_string(),
                    overall_rating: candidate.overall_rating,
                });
                to_promote.entry(target.as_str()).or_default().push(candidate.id);
            }
            SweepAction::Complete => to_complete.push(candidate),
        }
    }

    // Phase 4: completions, one transaction per player so a failure cannot
    // poison the batch.
    let mut completions: Vec<CompletionOutcome> = Vec::new();
    for candidate in &to_complete {
        match player_service::complete_player_career(state, &candidate.id).await {
            Ok(outcome) => completions.push(outcome),
            Err(err) => {
                warn!(player_id = %candidate.id, error = %err, "sweep completion failed");
                errors.push(format!("player {}: {err}", candidate.id));
            }
        }
    }

    // Phase 5: one batched update per target league. The career_status guard
    // keeps a player completed between classification and here from being
    // resurrected into a higher tier.
    let mut promoted_count: u64 = 0;
    for (target, player_ids) in &to_promote {
        let result = sqlx::query(
            "UPDATE players SET current_league = $1, updated_at = now()
             WHERE id = ANY($2) AND career_status = 'active'",
        )
        .bind(*target)
        .bind(player_ids.as_slice())
        .execute(&state.db)
        .await;
        match result {
            Ok(done) => promoted_count += done.rows_affected(),
            Err(err) => {
                warn!(target, error = %err, "sweep promotion batch failed");
                errors.push(format!("promotion batch to {target}: {err}"));
            }
        }
    }

    let summary = SweepSummary {
        ok: true,
        utc_day: today,
        run_count,
        total_active,
        promoted: promoted_count,
        completed: completions.len(),
        skipped: skips.len(),
        promotions_truncated: promotions.len() > SUMMARY_LIST_CAP,
        skips_truncated: skips.len() > SUMMARY_LIST_CAP,
        promotions: cap(promotions),
        skips: cap(skips),
        completions,
        errors,
    };

    info!(
        utc_day = today,
        promoted = summary.promoted,
        completed = summary.completed,
        skipped = summary.skipped,
        errors = summary.errors.len(),
        "sweep finished"
    );

    Ok(SweepOutcome::Executed(Box::new(summary)))
}

/// Public read of the sweep singleton.
pub async fn sweep_status(state: &SharedState) -> Result<SweepStatus, ServiceError> {
    let row: SweepState = sqlx::query_as("SELECT * FROM sweep_state WHERE id = 1")
        .fetch_one(&state.db)
        .await?;
    let today = utc_day(Utc::now().timestamp_millis());
    Ok(SweepStatus {
        ok: true,
        utc_day: today,
        scheduled_today: is_scheduled_day(today),
        already_ran_today: row.last_sweep_utc_day == Some(today),
        last_sweep_utc_day: row.last_sweep_utc_day,
        last_sweep_at: row.last_sweep_at,
        run_count: row.run_count,
    })
}

fn cap<T>(mut items: Vec<T>) -> Vec<T> {
    items.truncate(SUMMARY_LIST_CAP);
    items
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_utc_day_boundaries() {
        assert_eq!(utc_day(0), 0);
        assert_eq!(utc_day(MS_PER_DAY - 1), 0);
        assert_eq!(utc_day(MS_PER_DAY), 1);
        // Pre-epoch instants floor toward earlier days rather than toward zero.
        assert_eq!(utc_day(-1), -1);
    }

    #[test]
    fn test_every_fourth_day_is_scheduled() {
        assert!(is_scheduled_day(0));
        assert!(!is_scheduled_day(1));
        assert!(!is_scheduled_day(2));
        assert!(!is_scheduled_day(3));
        assert!(is_scheduled_day(4));
        assert!(is_scheduled_day(20_240));
    }

    #[test]
    fn test_classify_below_threshold_skips() {
        assert_eq!(classify(League::LeagueTwo, 69), SweepAction::Skip);
        assert_eq!(classify(League::LeagueOne, 77), SweepAction::Skip);
        assert_eq!(classify(League::Championship, 85), SweepAction::Skip);
    }

    #[test]
    fn test_classify_at_threshold_moves_up() {
        assert_eq!(
            classify(League::LeagueTwo, 70),
            SweepAction::Promote(League::LeagueOne)
        );
        assert_eq!(
            classify(League::LeagueOne, 78),
            SweepAction::Promote(League::Championship)
        );
        assert_eq!(classify(League::Championship, 86), SweepAction::Complete);
        assert_eq!(classify(League::Championship, 99), SweepAction::Complete);
    }
}
