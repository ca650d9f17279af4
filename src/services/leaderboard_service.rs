//! Global coach leaderboard: one windowed query ranks everyone, and the
//! caller's row rides along whatever their rank.

use sqlx::FromRow;

use crate::{
    dto::leaderboard::{GlobalLeaderboard, LeaderboardEntry},
    error::ServiceError,
    state::SharedState,
};

const BOARD_SIZE: i64 = 100;

#[derive(FromRow)]
struct RankedRow {
    user_id: String,
    display_name: Option<String>,
    completions_count: i32,
    best_days_to_premier: Option<i32>,
    avg_days_to_premier: Option<i32>,
    rank: i64,
    total: i64,
}

/// Top 100 plus the caller's own row.
///
/// The caller is upserted into `coach_stats` first so their presence on the
/// board is durable; the synthetic fallback only covers the window between
/// that write failing silently and the next request.
pub async fn global_leaderboard(
    state: &SharedState,
    user_id: &str,
) -> Result<GlobalLeaderboard, ServiceError> {
    sqlx::query("INSERT INTO coach_stats (user_id) VALUES ($1) ON CONFLICT (user_id) DO NOTHING")
        .bind(user_id)
        .execute(&state.db)
        .await?;

    let rows: Vec<RankedRow> = sqlx::query_as(
        r#"
        WITH ranked AS (
            SELECT user_id, display_name, completions_count,
                   best_days_to_premier, avg_days_to_premier,
                   RANK() OVER (
                       ORDER BY completions_count DESC,
                                best_days_to_premier ASC NULLS LAST,
                                avg_days_to_premier ASC NULLS LAST
                   ) AS rank,
                   COUNT(*) OVER () AS total
            FROM coach_stats
        )
        SELECT * FROM ranked
        WHERE rank <= $2 OR user_id = $1
        ORDER BY rank, user_id
        "#,
    )
    .bind(user_id)
    .bind(BOARD_SIZE)
    .fetch_all(&state.db)
    .await?;

    let total_coaches = rows.first().map(|row| row.total).unwrap_or(0);
    let my_entry = rows
        .iter()
        .find(|row| row.user_id == user_id)
        .map(to_entry)
        .unwrap_or_else(|| LeaderboardEntry {
            user_id: user_id.to_string(),
            display_name: user_id.to_string(),
            completions_count: 0,
            best_days_to_premier: None,
            avg_days_to_premier: None,
            rank: total_coaches + 1,
        });

    let leaderboard = rows
        .iter()
        .filter(|row| row.rank <= BOARD_SIZE)
        .take(BOARD_SIZE as usize)
        .map(to_entry)
        .collect();

    Ok(GlobalLeaderboard {
        ok: true,
        leaderboard,
        my_entry,
        total_coaches,
    })
}

fn to_entry(row: &RankedRow) -> LeaderboardEntry {
    LeaderboardEntry {
        user_id: row.user_id.clone(),
        display_name: row
            .display_name
            .clone()
            .unwrap_or_else(|| row.user_id.clone()),
        completions_count: row.completions_count,
        best_days_to_premier: row.best_days_to_premier,
        avg_days_to_premier: row.avg_days_to_premier,
        rank: row.rank,
    }
}
