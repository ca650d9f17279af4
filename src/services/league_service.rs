//! Public read surface over the league pyramid: tables, fixtures, results.

use sqlx::FromRow;
use uuid::Uuid;

use crate::{
    dao::models::Season,
    dto::leagues::{FixtureView, FixturesResponse, LeagueInfo, TableResponse, TableRow},
    error::ServiceError,
    league::{self, League, StandingRow},
    state::SharedState,
};

/// Tier overview with the active season, if any.
pub async fn list_leagues(state: &SharedState) -> Result<Vec<LeagueInfo>, ServiceError> {
    let mut leagues = Vec::with_capacity(League::ALL.len());
    for league in League::ALL {
        let season = active_season(state, league).await?;
        leagues.push(LeagueInfo {
            efl_tier: league.as_str().to_string(),
            display_name: league.display_name().to_string(),
            season_id: season.as_ref().map(|s| s.id),
            current_matchday: season.as_ref().map(|s| s.current_matchday),
            status: season.map(|s| s.status),
        });
    }
    Ok(leagues)
}

#[derive(FromRow)]
struct TableSourceRow {
    club_id: Uuid,
    club_name: String,
    played: i32,
    won: i32,
    drawn: i32,
    lost: i32,
    goals_for: i32,
    goals_against: i32,
    goal_difference: i32,
    points: i32,
}

/// Current standings for a tier, all 24 clubs, zeroed rows for clubs that
/// have not played yet.
pub async fn league_table(state: &SharedState, league: League) -> Result<TableResponse, ServiceError> {
    let season = require_season(state, league).await?;

    let rows: Vec<TableSourceRow> = sqlx::query_as(
        r#"
        SELECT c.id AS club_id, c.name AS club_name,
               COALESCE(ts.played, 0) AS played,
               COALESCE(ts.won, 0) AS won,
               COALESCE(ts.drawn, 0) AS drawn,
               COALESCE(ts.lost, 0) AS lost,
               COALESCE(ts.goals_for, 0) AS goals_for,
               COALESCE(ts.goals_against, 0) AS goals_against,
               COALESCE(ts.goal_difference, 0) AS goal_difference,
               COALESCE(ts.points, 0) AS points
        FROM clubs c
        LEFT JOIN team_seasons ts ON ts.club_id = c.id AND ts.season_id = $1
        WHERE c.efl_tier = $2
        "#,
    )
    .bind(season.id)
    .bind(league.as_str())
    .fetch_all(&state.db)
    .await?;

    let mut standings: Vec<StandingRow> = rows
        .into_iter()
        .map(|row| StandingRow {
            club_id: row.club_id,
            club_name: row.club_name,
            played: row.played,
            won: row.won,
            drawn: row.drawn,
            lost: row.lost,
            goals_for: row.goals_for,
            goals_against: row.goals_against,
            goal_difference: row.goal_difference,
            points: row.points,
        })
        .collect();
    league::sort_standings(&mut standings);

    let table = standings
        .into_iter()
        .enumerate()
        .map(|(index, row)| TableRow {
            position: index as i32 + 1,
            club_id: row.club_id,
            club_name: row.club_name,
            played: row.played,
            won: row.won,
            drawn: row.drawn,
            lost: row.lost,
            goals_for: row.goals_for,
            goals_against: row.goals_against,
            goal_difference: row.goal_difference,
            points: row.points,
        })
        .collect();

    Ok(TableResponse {
        ok: true,
        efl_tier: league.as_str().to_string(),
        season_id: season.id,
        standings: table,
    })
}

/// Fixtures for a matchday (defaults to the one about to be simulated).
pub async fn league_fixtures(
    state: &SharedState,
    league: League,
    matchday: Option<i32>,
) -> Result<FixturesResponse, ServiceError> {
    let season = require_season(state, league).await?;
    let matchday = resolve_matchday(&season, matchday)?;
    let fixtures = fixtures_with_clubs(state, &season, matchday).await?;
    Ok(FixturesResponse {
        ok: true,
        efl_tier: league.as_str().to_string(),
        matchday,
        fixtures,
    })
}

/// Played fixtures for a matchday (defaults to the most recently completed
/// one).
pub async fn league_results(
    state: &SharedState,
    league: League,
    matchday: Option<i32>,
) -> Result<FixturesResponse, ServiceError> {
    let season = require_season(state, league).await?;
    let matchday = match matchday {
        Some(day) => resolve_matchday(&season, Some(day))?,
        None => (season.current_matchday - 1).max(1),
    };
    let fixtures = fixtures_with_clubs(state, &season, matchday).await?;
    let played = fixtures.into_iter().filter(|fx| fx.played_at.is_some()).collect();
    Ok(FixturesResponse {
        ok: true,
        efl_tier: league.as_str().to_string(),
        matchday,
        fixtures: played,
    })
}

/// Parse a `:leagueId` path segment.
pub fn parse_league_id(raw: &str) -> Result<League, ServiceError> {
    League::parse(raw).ok_or_else(|| {
        ServiceError::validation(
            "unknown league: expected one of championship, league_one, league_two",
        )
    })
}

fn resolve_matchday(season: &Season, requested: Option<i32>) -> Result<i32, ServiceError> {
    match requested {
        Some(day) if day >= 1 && day <= season.total_matchdays => Ok(day),
        Some(_) => Err(ServiceError::validation(format!(
            "matchday must be between 1 and {}",
            season.total_matchdays
        ))),
        None => Ok(season.current_matchday.min(season.total_matchdays)),
    }
}

#[derive(FromRow)]
struct FixtureSourceRow {
    id: Uuid,
    matchday: i32,
    home_club_id: Uuid,
    home_club: String,
    away_club_id: Uuid,
    away_club: String,
    home_goals: Option<i32>,
    away_goals: Option<i32>,
    status: String,
    played_at: Option<chrono::DateTime<chrono::Utc>>,
}

async fn fixtures_with_clubs(
    state: &SharedState,
    season: &Season,
    matchday: i32,
) -> Result<Vec<FixtureView>, ServiceError> {
    let rows: Vec<FixtureSourceRow> = sqlx::query_as(
        r#"
        SELECT f.id, f.matchday,
               f.home_club_id, hc.name AS home_club,
               f.away_club_id, ac.name AS away_club,
               f.home_goals, f.away_goals, f.status, f.played_at
        FROM fixtures f
        JOIN clubs hc ON hc.id = f.home_club_id
        JOIN clubs ac ON ac.id = f.away_club_id
        WHERE f.season_id = $1 AND f.matchday = $2
        ORDER BY hc.name
        "#,
    )
    .bind(season.id)
    .bind(matchday)
    .fetch_all(&state.db)
    .await?;

    Ok(rows
        .into_iter()
        .map(|row| FixtureView {
            id: row.id,
            matchday: row.matchday,
            home_club_id: row.home_club_id,
            home_club: row.home_club,
            away_club_id: row.away_club_id,
            away_club: row.away_club,
            home_goals: row.home_goals,
            away_goals: row.away_goals,
            status: row.status,
            played_at: row.played_at,
        })
        .collect())
}

async fn active_season(
    state: &SharedState,
    league: League,
) -> Result<Option<Season>, ServiceError> {
    let season = sqlx::query_as(
        "SELECT id, efl_tier, current_matchday, total_matchdays, fixtures_generated, status
         FROM seasons WHERE efl_tier = $1 AND status = 'active'",
    )
    .bind(league.as_str())
    .fetch_optional(&state.db)
    .await?;
    Ok(season)
}

async fn require_season(state: &SharedState, league: League) -> Result<Season, ServiceError> {
    active_season(state, league)
        .await?
        .ok_or_else(|| ServiceError::not_found("no active season for this league"))
}
