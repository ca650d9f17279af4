//! Matchday simulator: advances the shared matchday counter across the
//! three tiers, generating fixtures on demand and updating standings.
//!
//! There is no database-level lock here. Correctness under re-fire relies on
//! the idempotency short-circuit (twelve played, zero upcoming), the hard
//! gate (exactly twelve upcoming before simulating), and post-write
//! verification before either counter advances. Operators must not schedule
//! the simulator at sub-daily intervals.

use std::collections::BTreeMap;

use chrono::Utc;
use sqlx::PgPool;
use tokio::time::{Duration, sleep};
use tracing::{info, warn};
use uuid::Uuid;

use crate::{
    dao::models::{Fixture, Season},
    dto::seasons::{ResetSyncEntry, ResetSyncReport, SeasonStatusEntry, SimulateDayReport, TierReport},
    error::ServiceError,
    league::{self, FIXTURES_PER_MATCHDAY, League, MATCHDAYS_PER_SEASON},
    state::SharedState,
};

const WRITE_ATTEMPTS: u32 = 3;
const WRITE_BACKOFF_BASE: Duration = Duration::from_millis(500);
/// Pause between consecutive writes to stay under managed-Postgres rate
/// limits.
const WRITE_THROTTLE: Duration = Duration::from_millis(100);

/// Advance all three tiers by one matchday. Per-tier failures land in the
/// report instead of failing the batch.
pub async fn simulate_day(state: &SharedState) -> Result<SimulateDayReport, ServiceError> {
    let mut tiers = Vec::with_capacity(League::ALL.len());
    for league in League::ALL {
        let report = match simulate_tier(state, league).await {
            Ok(report) => report,
            Err(err) => {
                warn!(tier = league.as_str(), error = %err, "tier simulation errored");
                TierReport::error(league, err.to_string())
            }
        };
        tiers.push(report);
    }
    let ok = tiers.iter().all(|tier| !tier.is_failure());
    Ok(SimulateDayReport { ok, tiers })
}

async fn simulate_tier(state: &SharedState, league: League) -> Result<TierReport, ServiceError> {
    let db = &state.db;

    let Some(season) = active_season(db, league).await? else {
        let season = create_season(db, league).await?;
        info!(tier = league.as_str(), season_id = %season.id, "created new season");
        return Ok(TierReport::new_season(league, season.current_matchday));
    };

    let matchday = progress_cursor(db, &season).await?;
    if matchday < 1 {
        return Ok(TierReport::error(
            league,
            format!("invalid matchday cursor {matchday}"),
        ));
    }

    if matchday > season.total_matchdays {
        sqlx::query(
            "UPDATE seasons SET status = 'completed', updated_at = now() WHERE id = $1",
        )
        .bind(season.id)
        .execute(db)
        .await?;
        info!(tier = league.as_str(), season_id = %season.id, "season completed");
        return Ok(TierReport::season_completed(league, matchday));
    }

    let mut fixtures = matchday_fixtures(db, season.id, matchday).await?;
    if fixtures.is_empty() {
        generate_matchday(state, &season, matchday).await?;
        fixtures = matchday_fixtures(db, season.id, matchday).await?;
    }

    let played = fixtures.iter().filter(|fx| fx.is_played()).count();
    let upcoming: Vec<&Fixture> = fixtures.iter().filter(|fx| fx.is_upcoming()).collect();

    // Idempotency short-circuit: a fully played matchday means an earlier
    // invocation simulated it but died before (or after) advancing; just
    // move the counter.
    if played == FIXTURES_PER_MATCHDAY && upcoming.is_empty() {
        advance_counters(db, season.id, matchday + 1).await?;
        return Ok(TierReport::already_played(league, matchday));
    }

    // Hard gate: anything other than a full slate of untouched fixtures
    // means a partial earlier run; never simulate over it.
    if upcoming.len() != FIXTURES_PER_MATCHDAY {
        return Ok(TierReport::aborted(
            league,
            matchday,
            format!(
                "expected {FIXTURES_PER_MATCHDAY} upcoming fixtures, found {} ({played} played)",
                upcoming.len()
            ),
        ));
    }

    // Draw every score before the first await so the thread-local RNG does
    // not ride across suspension points.
    let results: Vec<(Uuid, i32, i32)> = {
        let mut rng = rand::rng();
        upcoming
            .iter()
            .map(|fx| {
                let (home_goals, away_goals) =
                    league::simulate_score(state.config.match_engine, &mut rng);
                (fx.id, home_goals, away_goals)
            })
            .collect()
    };

    let now = Utc::now();
    for (index, (fixture_id, home_goals, away_goals)) in results.iter().enumerate() {
        if index > 0 {
            sleep(WRITE_THROTTLE).await;
        }
        let write = retry_write("fixture result", || {
            let db = db.clone();
            async move {
                sqlx::query(
                    "UPDATE fixtures
                     SET home_goals = $2, away_goals = $3, status = 'PLAYED', played_at = $4
                     WHERE id = $1",
                )
                .bind(*fixture_id)
                .bind(*home_goals)
                .bind(*away_goals)
                .bind(now)
                .execute(&db)
                .await
                .map(|_| ())
            }
        })
        .await;
        if let Err(err) = write {
            return Ok(TierReport::aborted(
                league,
                matchday,
                format!("fixture write failed after retries: {err}"),
            ));
        }
    }

    // Post-write verification: only trust what actually landed.
    let persisted = matchday_fixtures(db, season.id, matchday).await?;
    let persisted_played = persisted.iter().filter(|fx| fx.is_played()).count();
    if persisted_played < FIXTURES_PER_MATCHDAY {
        return Ok(TierReport::aborted(
            league,
            matchday,
            format!("verification found only {persisted_played} played fixtures"),
        ));
    }

    let deltas = standings_deltas(&persisted);
    for (index, (club_id, delta)) in deltas.iter().enumerate() {
        if index > 0 {
            sleep(WRITE_THROTTLE).await;
        }
        let season_id = season.id;
        let write = retry_write("standings row", || {
            let db = db.clone();
            let delta = delta.clone();
            async move {
                sqlx::query(
                    r#"
                    INSERT INTO team_seasons
                        (season_id, club_id, played, won, drawn, lost,
                         goals_for, goals_against, goal_difference, points)
                    VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
                    ON CONFLICT (season_id, club_id) DO UPDATE SET
                        played = team_seasons.played + EXCLUDED.played,
                        won = team_seasons.won + EXCLUDED.won,
                        drawn = team_seasons.drawn + EXCLUDED.drawn,
                        lost = team_seasons.lost + EXCLUDED.lost,
                        goals_for = team_seasons.goals_for + EXCLUDED.goals_for,
                        goals_against = team_seasons.goals_against + EXCLUDED.goals_against,
                        goal_difference = team_seasons.goal_difference + EXCLUDED.goal_difference,
                        points = team_seasons.points + EXCLUDED.points
                    "#,
                )
                .bind(season_id)
                .bind(*club_id)
                .bind(delta.played)
                .bind(delta.won)
                .bind(delta.drawn)
                .bind(delta.lost)
                .bind(delta.goals_for)
                .bind(delta.goals_against)
                .bind(delta.goal_difference)
                .bind(delta.points)
                .execute(&db)
                .await
                .map(|_| ())
            }
        })
        .await;
        if let Err(err) = write {
            return Ok(TierReport::aborted(
                league,
                matchday,
                format!("standings write failed after retries: {err}"),
            ));
        }
    }

    advance_counters(db, season.id, matchday + 1).await?;
    info!(
        tier = league.as_str(),
        matchday,
        fixtures = persisted_played,
        "matchday simulated"
    );
    Ok(TierReport::ok(league, matchday))
}

/// Re-align `seasons.current_matchday` to the authoritative per-season
/// cursor, creating missing cursor rows along the way.
pub async fn reset_sync(state: &SharedState) -> Result<ResetSyncReport, ServiceError> {
    let mut entries = Vec::new();
    for league in League::ALL {
        let Some(season) = active_season(&state.db, league).await? else {
            continue;
        };
        let matchday = progress_cursor(&state.db, &season).await?;
        sqlx::query(
            "UPDATE seasons SET current_matchday = $2, updated_at = now() WHERE id = $1",
        )
        .bind(season.id)
        .bind(matchday)
        .execute(&state.db)
        .await?;
        entries.push(ResetSyncEntry {
            efl_tier: league.as_str().to_string(),
            season_id: season.id,
            current_matchday: matchday,
        });
    }
    info!(seasons = entries.len(), "season cursors re-synced");
    Ok(ResetSyncReport { ok: true, seasons: entries })
}

/// Public status of all three tiers.
pub async fn season_status(state: &SharedState) -> Result<Vec<SeasonStatusEntry>, ServiceError> {
    let mut entries = Vec::new();
    for league in League::ALL {
        let Some(season) = active_season(&state.db, league).await? else {
            continue;
        };
        let progress = progress_cursor(&state.db, &season).await?;
        entries.push(SeasonStatusEntry {
            efl_tier: league.as_str().to_string(),
            season_id: season.id,
            status: season.status,
            current_matchday: season.current_matchday,
            progress_matchday: progress,
            total_matchdays: season.total_matchdays,
        });
    }
    Ok(entries)
}

async fn active_season(db: &PgPool, league: League) -> Result<Option<Season>, sqlx::Error> {
    sqlx::query_as(
        "SELECT id, efl_tier, current_matchday, total_matchdays, fixtures_generated, status
         FROM seasons WHERE efl_tier = $1 AND status = 'active'",
    )
    .bind(league.as_str())
    .fetch_optional(db)
    .await
}

async fn create_season(db: &PgPool, league: League) -> Result<Season, sqlx::Error> {
    let id = Uuid::new_v4();
    let season: Season = sqlx::query_as(
        "INSERT INTO seasons (id, efl_tier, current_matchday, total_matchdays, status)
         VALUES ($1, $2, 1, $3, 'active')
         RETURNING id, efl_tier, current_matchday, total_matchdays, fixtures_generated, status",
    )
    .bind(id)
    .bind(league.as_str())
    .bind(MATCHDAYS_PER_SEASON)
    .fetch_one(db)
    .await?;
    sqlx::query(
        "INSERT INTO season_progress (season_id, current_matchday) VALUES ($1, 1)
         ON CONFLICT (season_id) DO NOTHING",
    )
    .bind(id)
    .execute(db)
    .await?;
    Ok(season)
}

/// Load the authoritative cursor, seeding it from the season row when the
/// cursor is missing.
async fn progress_cursor(db: &PgPool, season: &Season) -> Result<i32, sqlx::Error> {
    let existing: Option<i32> =
        sqlx::query_scalar("SELECT current_matchday FROM season_progress WHERE season_id = $1")
            .bind(season.id)
            .fetch_optional(db)
            .await?;
    match existing {
        Some(matchday) => Ok(matchday),
        None => {
            sqlx::query(
                "INSERT INTO season_progress (season_id, current_matchday) VALUES ($1, $2)
                 ON CONFLICT (season_id) DO NOTHING",
            )
            .bind(season.id)
            .bind(season.current_matchday)
            .execute(db)
            .await?;
            Ok(season.current_matchday)
        }
    }
}

async fn matchday_fixtures(
    db: &PgPool,
    season_id: Uuid,
    matchday: i32,
) -> Result<Vec<Fixture>, sqlx::Error> {
    sqlx::query_as(
        "SELECT id, season_id, efl_tier, matchday, home_club_id, away_club_id,
                home_goals, away_goals, status, played_at
         FROM fixtures WHERE season_id = $1 AND matchday = $2
         ORDER BY id",
    )
    .bind(season_id)
    .bind(matchday)
    .fetch_all(db)
    .await
}

/// Generate the twelve pairings for one matchday from the tier's stably
/// ordered club list.
async fn generate_matchday(
    state: &SharedState,
    season: &Season,
    matchday: i32,
) -> Result<(), ServiceError> {
    let club_ids: Vec<Uuid> =
        sqlx::query_scalar("SELECT id FROM clubs WHERE efl_tier = $1 ORDER BY id")
            .bind(&season.efl_tier)
            .fetch_all(&state.db)
            .await?;
    if club_ids.len() != league::CLUBS_PER_LEAGUE {
        return Err(ServiceError::Infra(format!(
            "tier {} holds {} clubs, expected {}",
            season.efl_tier,
            club_ids.len(),
            league::CLUBS_PER_LEAGUE
        )));
    }

    let pairings = league::round_pairings(&club_ids, matchday);
    for (index, (home, away)) in pairings.iter().enumerate() {
        if index > 0 {
            sleep(WRITE_THROTTLE).await;
        }
        let season_id = season.id;
        let efl_tier = season.efl_tier.clone();
        retry_write("fixture insert", || {
            let db = state.db.clone();
            let efl_tier = efl_tier.clone();
            async move {
                sqlx::query(
                    "INSERT INTO fixtures
                         (id, season_id, efl_tier, matchday, home_club_id, away_club_id, status)
                     VALUES ($1, $2, $3, $4, $5, $6, 'UPCOMING')
                     ON CONFLICT (season_id, matchday, home_club_id) DO NOTHING",
                )
                .bind(Uuid::new_v4())
                .bind(season_id)
                .bind(efl_tier)
                .bind(matchday)
                .bind(*home)
                .bind(*away)
                .execute(&db)
                .await
                .map(|_| ())
            }
        })
        .await?;
    }

    sqlx::query("UPDATE seasons SET fixtures_generated = TRUE, updated_at = now() WHERE id = $1")
        .bind(season.id)
        .execute(&state.db)
        .await?;
    info!(
        tier = %season.efl_tier,
        matchday,
        fixtures = pairings.len(),
        "generated matchday fixtures"
    );
    Ok(())
}

async fn advance_counters(
    db: &PgPool,
    season_id: Uuid,
    next_matchday: i32,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "UPDATE season_progress SET current_matchday = $2, updated_at = now()
         WHERE season_id = $1",
    )
    .bind(season_id)
    .bind(next_matchday)
    .execute(db)
    .await?;
    sqlx::query("UPDATE seasons SET current_matchday = $2, updated_at = now() WHERE id = $1")
        .bind(season_id)
        .bind(next_matchday)
        .execute(db)
        .await?;
    Ok(())
}

#[derive(Debug, Clone, Default)]
struct StandingsDelta {
    played: i32,
    won: i32,
    drawn: i32,
    lost: i32,
    goals_for: i32,
    goals_against: i32,
    goal_difference: i32,
    points: i32,
}

/// Aggregate one matchday's results into per-club standings deltas.
fn standings_deltas(fixtures: &[Fixture]) -> BTreeMap<Uuid, StandingsDelta> {
    let mut deltas: BTreeMap<Uuid, StandingsDelta> = BTreeMap::new();
    for fx in fixtures {
        let (Some(home_goals), Some(away_goals)) = (fx.home_goals, fx.away_goals) else {
            continue;
        };
        {
            let home = deltas.entry(fx.home_club_id).or_default();
            home.played += 1;
            home.goals_for += home_goals;
            home.goals_against += away_goals;
            home.goal_difference += home_goals - away_goals;
            if home_goals > away_goals {
                home.won += 1;
                home.points += 3;
            } else if home_goals == away_goals {
                home.drawn += 1;
                home.points += 1;
            } else {
                home.lost += 1;
            }
        }
        {
            let away = deltas.entry(fx.away_club_id).or_default();
            away.played += 1;
            away.goals_for += away_goals;
            away.goals_against += home_goals;
            away.goal_difference += away_goals - home_goals;
            if away_goals > home_goals {
                away.won += 1;
                away.points += 3;
            } else if away_goals == home_goals {
                away.drawn += 1;
                away.points += 1;
            } else {
                away.lost += 1;
            }
        }
    }
    deltas
}

async fn retry_write<F, Fut>(what: &'static str, mut op: F) -> Result<(), sqlx::Error>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<(), sqlx::Error>>,
{
    let mut attempt = 0;
    loop {
        attempt += 1;
        match op().await {
            Ok(()) => return Ok(()),
            Err(err) if attempt < WRITE_ATTEMPTS => {
                warn!(what, attempt, error = %err, "write failed; backing off");
                sleep(WRITE_BACKOFF_BASE * 2u32.pow(attempt - 1)).await;
            }
            Err(err) => return Err(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn played_fixture(home: Uuid, away: Uuid, home_goals: i32, away_goals: i32) -> Fixture {
        Fixture {
            id: Uuid::new_v4(),
            season_id: Uuid::new_v4(),
            efl_tier: "championship".into(),
            matchday: 3,
            home_club_id: home,
            away_club_id: away,
            home_goals: Some(home_goals),
            away_goals: Some(away_goals),
            status: "PLAYED".into(),
            played_at: Some(Utc::now()),
        }
    }

    #[test]
    fn test_standings_deltas_balance() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let c = Uuid::new_v4();
        let d = Uuid::new_v4();
        let fixtures = vec![
            played_fixture(a, b, 2, 1),
            played_fixture(c, d, 0, 0),
        ];
        let deltas = standings_deltas(&fixtures);

        let win = &deltas[&a];
        assert_eq!((win.played, win.won, win.drawn, win.lost), (1, 1, 0, 0));
        assert_eq!(win.points, 3);
        assert_eq!(win.goal_difference, 1);

        let loss = &deltas[&b];
        assert_eq!((loss.played, loss.won, loss.drawn, loss.lost), (1, 0, 0, 1));
        assert_eq!(loss.points, 0);
        assert_eq!(loss.goal_difference, -1);

        for club in [c, d] {
            let draw = &deltas[&club];
            assert_eq!((draw.won, draw.drawn, draw.lost), (0, 1, 0));
            assert_eq!(draw.points, 1);
        }

        // played = won + drawn + lost and points = 3*won + drawn, per row.
        for delta in deltas.values() {
            assert_eq!(delta.played, delta.won + delta.drawn + delta.lost);
            assert_eq!(delta.points, 3 * delta.won + delta.drawn);
        }
    }

    #[test]
    fn test_standings_deltas_skip_unscored_rows() {
        let mut fx = played_fixture(Uuid::new_v4(), Uuid::new_v4(), 1, 1);
        fx.home_goals = None;
        assert!(standings_deltas(&[fx]).is_empty());
    }
}
