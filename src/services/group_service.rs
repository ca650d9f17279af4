//! Private friend groups: create, join by invite code, ranked group view.

use rand::Rng;
use sqlx::FromRow;
use tracing::info;
use uuid::Uuid;

use crate::{
    dao::models::LeaderboardGroup,
    dto::groups::{GroupJoinOutcome, GroupSummary},
    dto::leaderboard::LeaderboardEntry,
    error::{ServiceError, is_unique_violation},
    state::SharedState,
};

const INVITE_CODE_LENGTH: usize = 6;
const INVITE_CODE_CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";
/// Collisions on a 36^6 space are rare; a handful of retries is plenty.
const INVITE_CODE_ATTEMPTS: u32 = 5;

pub fn generate_invite_code<R: Rng + ?Sized>(rng: &mut R) -> String {
    (0..INVITE_CODE_LENGTH)
        .map(|_| INVITE_CODE_CHARSET[rng.random_range(0..INVITE_CODE_CHARSET.len())] as char)
        .collect()
}

pub async fn create_group(
    state: &SharedState,
    user_id: &str,
    name: &str,
) -> Result<LeaderboardGroup, ServiceError> {
    let name = name.trim();
    if !(3..=40).contains(&name.len()) {
        return Err(ServiceError::validation(
            "group name must be 3-40 characters",
        ));
    }

    // A unique violation aborts the enclosing transaction, so each invite
    // code attempt gets its own.
    for attempt in 1..=INVITE_CODE_ATTEMPTS {
        let code = {
            let mut rng = rand::rng();
            generate_invite_code(&mut rng)
        };

        let mut tx = state.db.begin().await?;
        let insert = sqlx::query_as::<_, LeaderboardGroup>(
            "INSERT INTO leaderboard_groups (id, name, invite_code, created_by)
             VALUES ($1, $2, $3, $4)
             RETURNING *",
        )
        .bind(Uuid::new_v4())
        .bind(name)
        .bind(&code)
        .bind(user_id)
        .fetch_one(&mut *tx)
        .await;

        match insert {
            Ok(group) => {
                sqlx::query(
                    "INSERT INTO leaderboard_group_members (group_id, user_id, role)
                     VALUES ($1, $2, 'admin')",
                )
                .bind(group.id)
                .bind(user_id)
                .execute(&mut *tx)
                .await?;
                tx.commit().await?;
                info!(group_id = %group.id, creator = user_id, "leaderboard group created");
                return Ok(group);
            }
            Err(err)
                if is_unique_violation(&err, "leaderboard_groups_invite_code_key")
                    && attempt < INVITE_CODE_ATTEMPTS =>
            {
                tx.rollback().await?;
                continue;
            }
            Err(err) => return Err(err.into()),
        }
    }
    Err(ServiceError::Infra(
        "could not allocate a unique invite code".to_string(),
    ))
}

pub async fn join_group(
    state: &SharedState,
    user_id: &str,
    invite_code: &str,
) -> Result<GroupJoinOutcome, ServiceError> {
    let code = invite_code.trim();
    if code.is_empty() {
        return Err(ServiceError::validation("invite_code is required"));
    }

    let group: LeaderboardGroup = sqlx::query_as(
        "SELECT * FROM leaderboard_groups WHERE UPPER(invite_code) = UPPER($1)",
    )
    .bind(code)
    .fetch_optional(&state.db)
    .await?
    .ok_or_else(|| ServiceError::not_found("no group with that invite code"))?;

    let inserted = sqlx::query(
        "INSERT INTO leaderboard_group_members (group_id, user_id, role)
         VALUES ($1, $2, 'member')
         ON CONFLICT (group_id, user_id) DO NOTHING",
    )
    .bind(group.id)
    .bind(user_id)
    .execute(&state.db)
    .await?;

    Ok(GroupJoinOutcome {
        ok: true,
        group: group.into(),
        already_member: inserted.rows_affected() == 0,
    })
}

pub async fn my_groups(
    state: &SharedState,
    user_id: &str,
) -> Result<Vec<GroupSummary>, ServiceError> {
    #[derive(FromRow)]
    struct Row {
        id: Uuid,
        name: String,
        invite_code: String,
        created_by: String,
        member_count: i64,
    }

    let rows: Vec<Row> = sqlx::query_as(
        r#"
        SELECT g.id, g.name, g.invite_code, g.created_by,
               (SELECT COUNT(*) FROM leaderboard_group_members c
                 WHERE c.group_id = g.id) AS member_count
        FROM leaderboard_groups g
        JOIN leaderboard_group_members m ON m.group_id = g.id
        WHERE m.user_id = $1
        ORDER BY g.created_at
        "#,
    )
    .bind(user_id)
    .fetch_all(&state.db)
    .await?;

    Ok(rows
        .into_iter()
        .map(|row| GroupSummary {
            id: row.id,
            name: row.name,
            invite_code: row.invite_code,
            created_by: row.created_by,
            member_count: Some(row.member_count),
        })
        .collect())
}

pub async fn leave_group(
    state: &SharedState,
    user_id: &str,
    group_id: Uuid,
) -> Result<(), ServiceError> {
    let deleted = sqlx::query(
        "DELETE FROM leaderboard_group_members WHERE group_id = $1 AND user_id = $2",
    )
    .bind(group_id)
    .bind(user_id)
    .execute(&state.db)
    .await?;
    if deleted.rows_affected() == 0 {
        return Err(ServiceError::not_found("not a member of this group"));
    }
    Ok(())
}

/// Rank the group's members with the global comparator. Members without
/// stats rank at the bottom with zeroed fields.
pub async fn group_leaderboard(
    state: &SharedState,
    user_id: &str,
    group_id: Uuid,
) -> Result<Vec<LeaderboardEntry>, ServiceError> {
    let is_member: Option<i32> = sqlx::query_scalar(
        "SELECT 1 FROM leaderboard_group_members WHERE group_id = $1 AND user_id = $2",
    )
    .bind(group_id)
    .bind(user_id)
    .fetch_optional(&state.db)
    .await?;
    if is_member.is_none() {
        return Err(ServiceError::forbidden("not a member of this group"));
    }

    let entries = sqlx::query_as(
        r#"
        SELECT m.user_id,
               COALESCE(s.display_name, m.user_id) AS display_name,
               COALESCE(s.completions_count, 0) AS completions_count,
               s.best_days_to_premier,
               s.avg_days_to_premier,
               RANK() OVER (
                   ORDER BY COALESCE(s.completions_count, 0) DESC,
                            s.best_days_to_premier ASC NULLS LAST,
                            s.avg_days_to_premier ASC NULLS LAST
               ) AS rank
        FROM leaderboard_group_members m
        LEFT JOIN coach_stats s ON s.user_id = m.user_id
        WHERE m.group_id = $1
        ORDER BY rank, display_name
        "#,
    )
    .bind(group_id)
    .fetch_all(&state.db)
    .await?;
    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invite_code_shape() {
        let mut rng = rand::rng();
        for _ in 0..100 {
            let code = generate_invite_code(&mut rng);
            assert_eq!(code.len(), INVITE_CODE_LENGTH);
            assert!(
                code.chars()
                    .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit())
            );
        }
    }
}
