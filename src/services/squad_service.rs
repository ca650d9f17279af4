//! Coaching squads: lifecycle, join protocol, role management and the
//! point-funded facility upgrades.
//!
//! Every public operation is transactional. Privileged mutations lock the
//! squad row before reading anything they decide on, so concurrent upgrades
//! or role changes serialize per squad.

use sqlx::{Postgres, Transaction};
use tracing::info;
use uuid::Uuid;

use crate::{
    dao::models::{CoachingSquad, SquadFacility, SquadJoinRequest, SquadMember},
    dto::squads::{
        CreateSquadRequest, FacilityView, JoinOutcome, MemberView, ResolveOutcome,
        SquadLeaderboardEntry, SquadProfile, UpgradeOutcome,
    },
    error::{ServiceError, is_unique_violation},
    state::SharedState,
};

/// Upgradable squad perk slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FacilityType {
    TrainingEquipment,
    Spa,
    AnalysisRoom,
    MedicalCenter,
}

impl FacilityType {
    pub const ALL: [FacilityType; 4] = [
        FacilityType::TrainingEquipment,
        FacilityType::Spa,
        FacilityType::AnalysisRoom,
        FacilityType::MedicalCenter,
    ];

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "training_equipment" => Some(FacilityType::TrainingEquipment),
            "spa" => Some(FacilityType::Spa),
            "analysis_room" => Some(FacilityType::AnalysisRoom),
            "medical_center" => Some(FacilityType::MedicalCenter),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FacilityType::TrainingEquipment => "training_equipment",
            FacilityType::Spa => "spa",
            FacilityType::AnalysisRoom => "analysis_room",
            FacilityType::MedicalCenter => "medical_center",
        }
    }

    pub fn base_cost(&self) -> i32 {
        match self {
            FacilityType::TrainingEquipment => 5,
            FacilityType::Spa => 8,
            FacilityType::AnalysisRoom => 6,
            FacilityType::MedicalCenter => 7,
        }
    }
}

/// Points needed to raise a facility from `current_level` to the next one.
pub fn upgrade_cost(facility: FacilityType, current_level: i32) -> i32 {
    facility.base_cost() * (current_level + 1)
}

/// Squad level derived from the sum of all facility levels.
pub fn squad_level(total_facility_levels: i32) -> i32 {
    1 + total_facility_levels / 4
}

/// Normalize a squad tag: uppercase, 2 to 5 alphanumeric characters.
pub fn sanitize_tag(raw: &str) -> Result<String, ServiceError> {
    let tag = raw.trim().to_uppercase();
    if !(2..=5).contains(&tag.len()) || !tag.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(ServiceError::validation(
            "tag must be 2-5 alphanumeric characters",
        ));
    }
    Ok(tag)
}

const DEFAULT_LEADERBOARD_LIMIT: i64 = 50;
const MAX_LEADERBOARD_LIMIT: i64 = 100;

pub async fn create_squad(
    state: &SharedState,
    user_id: &str,
    request: CreateSquadRequest,
) -> Result<SquadProfile, ServiceError> {
    let name = request.name.trim();
    if !(3..=40).contains(&name.len()) {
        return Err(ServiceError::validation(
            "squad name must be 3-40 characters",
        ));
    }
    let tag = request.tag.as_deref().map(sanitize_tag).transpose()?;
    let privacy = match request.privacy.as_deref() {
        None => "open",
        Some(p @ ("open" | "request" | "closed")) => p,
        Some(_) => {
            return Err(ServiceError::validation(
                "privacy must be one of open, request, closed",
            ));
        }
    };

    let mut tx = state.db.begin().await?;

    ensure_not_in_squad(&mut tx, user_id, None).await?;

    let insert = sqlx::query_as::<_, CoachingSquad>(
        "INSERT INTO coaching_squads (id, name, tag, description, leader_user_id, privacy)
         VALUES ($1, $2, $3, $4, $5, $6)
         RETURNING *",
    )
    .bind(Uuid::new_v4())
    .bind(name)
    .bind(&tag)
    .bind(&request.description)
    .bind(user_id)
    .bind(privacy)
    .fetch_one(&mut *tx)
    .await;

    let squad = match insert {
        Ok(squad) => squad,
        Err(err) if is_unique_violation(&err, "coaching_squads_tag_key") => {
            return Err(ServiceError::conflict("squad tag already taken"));
        }
        Err(err) => return Err(err.into()),
    };

    sqlx::query(
        "INSERT INTO squad_members (squad_id, user_id, role, status)
         VALUES ($1, $2, 'leader', 'active')",
    )
    .bind(squad.id)
    .bind(user_id)
    .execute(&mut *tx)
    .await?;

    for facility in FacilityType::ALL {
        sqlx::query(
            "INSERT INTO squad_facilities (squad_id, facility_type, level) VALUES ($1, $2, 0)",
        )
        .bind(squad.id)
        .bind(facility.as_str())
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;
    info!(squad_id = %squad.id, leader = user_id, "squad created");
    load_profile(state, squad.id).await
}

pub async fn join_open_squad(
    state: &SharedState,
    user_id: &str,
    squad_id: Uuid,
) -> Result<JoinOutcome, ServiceError> {
    let mut tx = state.db.begin().await?;
    let squad = lock_squad(&mut tx, squad_id).await?;

    if squad.privacy != "open" {
        return Err(ServiceError::conflict(
            "squad is not open; send a join request instead",
        ));
    }

    if let Some(existing) = active_membership(&mut tx, user_id).await? {
        if existing.squad_id == squad_id {
            tx.rollback().await?;
            return Ok(JoinOutcome {
                ok: true,
                squad_id,
                role: existing.role,
                already_member: true,
            });
        }
        return Err(ServiceError::conflict("already in a squad"));
    }

    let member = upsert_active_member(&mut tx, squad_id, user_id).await?;
    touch_squad(&mut tx, squad_id).await?;
    tx.commit().await?;

    Ok(JoinOutcome {
        ok: true,
        squad_id,
        role: member.role,
        already_member: false,
    })
}

/// Join protocol for non-open squads: open squads short-circuit to a direct
/// join, `request` squads get a deduplicated pending request, closed squads
/// refuse.
pub async fn request_join_squad(
    state: &SharedState,
    user_id: &str,
    squad_id: Uuid,
) -> Result<ResolveOutcome, ServiceError> {
    let mut tx = state.db.begin().await?;
    let squad = lock_squad(&mut tx, squad_id).await?;

    match squad.privacy.as_str() {
        "closed" => Err(ServiceError::conflict("squad is closed to new members")),
        "open" => {
            if let Some(existing) = active_membership(&mut tx, user_id).await? {
                if existing.squad_id == squad_id {
                    tx.rollback().await?;
                    return Ok(ResolveOutcome::joined(squad_id, None));
                }
                return Err(ServiceError::conflict("already in a squad"));
            }
            upsert_active_member(&mut tx, squad_id, user_id).await?;
            touch_squad(&mut tx, squad_id).await?;
            tx.commit().await?;
            Ok(ResolveOutcome::joined(squad_id, None))
        }
        _ => {
            if let Some(existing) = active_membership(&mut tx, user_id).await? {
                if existing.squad_id == squad_id {
                    return Err(ServiceError::conflict("already a member of this squad"));
                }
                return Err(ServiceError::conflict("already in a squad"));
            }

            let pending: Option<SquadJoinRequest> = sqlx::query_as(
                "SELECT * FROM squad_join_requests
                 WHERE squad_id = $1 AND user_id = $2 AND status = 'pending'",
            )
            .bind(squad_id)
            .bind(user_id)
            .fetch_optional(&mut *tx)
            .await?;
            if let Some(request) = pending {
                tx.rollback().await?;
                return Ok(ResolveOutcome::pending(request));
            }

            let request: SquadJoinRequest = sqlx::query_as(
                "INSERT INTO squad_join_requests (id, squad_id, user_id, status)
                 VALUES ($1, $2, $3, 'pending')
                 RETURNING *",
            )
            .bind(Uuid::new_v4())
            .bind(squad_id)
            .bind(user_id)
            .fetch_one(&mut *tx)
            .await?;
            tx.commit().await?;
            Ok(ResolveOutcome::pending(request))
        }
    }
}

pub async fn resolve_join_request(
    state: &SharedState,
    resolver_id: &str,
    request_id: Uuid,
    approve: bool,
) -> Result<ResolveOutcome, ServiceError> {
    let mut tx = state.db.begin().await?;

    let request: SquadJoinRequest =
        sqlx::query_as("SELECT * FROM squad_join_requests WHERE id = $1 FOR UPDATE")
            .bind(request_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| ServiceError::not_found("join request not found"))?;

    require_officer(&mut tx, request.squad_id, resolver_id).await?;

    if request.status != "pending" {
        return Err(ServiceError::conflict("request already resolved"));
    }

    if !approve {
        let resolved = mark_resolved(&mut tx, request_id, resolver_id, "rejected").await?;
        tx.commit().await?;
        return Ok(ResolveOutcome::resolved(resolved));
    }

    // Approval re-checks the single-membership rule: the applicant may have
    // joined elsewhere while the request sat pending. That approval is
    // auto-rejected and reported as a conflict rather than silently dropped.
    if active_membership(&mut tx, &request.user_id).await?.is_some() {
        mark_resolved(&mut tx, request_id, resolver_id, "rejected").await?;
        tx.commit().await?;
        return Err(ServiceError::conflict("applicant is already in a squad"));
    }

    upsert_active_member(&mut tx, request.squad_id, &request.user_id).await?;
    let resolved = mark_resolved(&mut tx, request_id, resolver_id, "approved").await?;
    touch_squad(&mut tx, request.squad_id).await?;
    tx.commit().await?;
    info!(request_id = %request_id, squad_id = %request.squad_id, "join request approved");
    Ok(ResolveOutcome::resolved(resolved))
}

pub async fn leave_squad(state: &SharedState, user_id: &str) -> Result<Uuid, ServiceError> {
    let mut tx = state.db.begin().await?;

    let membership: SquadMember = sqlx::query_as(
        "SELECT * FROM squad_members WHERE user_id = $1 AND status = 'active' FOR UPDATE",
    )
    .bind(user_id)
    .fetch_optional(&mut *tx)
    .await?
    .ok_or_else(|| ServiceError::not_found("not in a squad"))?;

    if membership.role == "leader" {
        let remaining: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM squad_members
             WHERE squad_id = $1 AND status = 'active' AND user_id <> $2",
        )
        .bind(membership.squad_id)
        .bind(user_id)
        .fetch_one(&mut *tx)
        .await?;
        if remaining > 0 {
            let officers: i64 = sqlx::query_scalar(
                "SELECT COUNT(*) FROM squad_members
                 WHERE squad_id = $1 AND status = 'active' AND user_id <> $2
                   AND role IN ('leader', 'co_leader')",
            )
            .bind(membership.squad_id)
            .bind(user_id)
            .fetch_one(&mut *tx)
            .await?;
            if officers == 0 {
                return Err(ServiceError::conflict(
                    "promote a co-leader before leaving the squad",
                ));
            }
        }
    }

    sqlx::query(
        "UPDATE squad_members SET status = 'inactive' WHERE squad_id = $1 AND user_id = $2",
    )
    .bind(membership.squad_id)
    .bind(user_id)
    .execute(&mut *tx)
    .await?;
    touch_squad(&mut tx, membership.squad_id).await?;
    tx.commit().await?;
    Ok(membership.squad_id)
}

pub async fn upgrade_facility(
    state: &SharedState,
    user_id: &str,
    squad_id: Uuid,
    facility: FacilityType,
) -> Result<UpgradeOutcome, ServiceError> {
    let mut tx = state.db.begin().await?;
    let squad = lock_squad(&mut tx, squad_id).await?;
    require_officer(&mut tx, squad_id, user_id).await?;

    // Facility rows exist from creation, but tolerate a missing one rather
    // than stranding the upgrade path.
    sqlx::query(
        "INSERT INTO squad_facilities (squad_id, facility_type, level) VALUES ($1, $2, 0)
         ON CONFLICT (squad_id, facility_type) DO NOTHING",
    )
    .bind(squad_id)
    .bind(facility.as_str())
    .execute(&mut *tx)
    .await?;

    let row: SquadFacility = sqlx::query_as(
        "SELECT squad_id, facility_type, level FROM squad_facilities
         WHERE squad_id = $1 AND facility_type = $2 FOR UPDATE",
    )
    .bind(squad_id)
    .bind(facility.as_str())
    .fetch_one(&mut *tx)
    .await?;

    let cost = upgrade_cost(facility, row.level);
    if squad.unspent_points < cost {
        return Err(ServiceError::conflict(format!(
            "not enough unspent points: upgrade costs {cost}, squad has {}",
            squad.unspent_points
        )));
    }

    let new_facility_level = row.level + 1;
    sqlx::query(
        "UPDATE squad_facilities SET level = $3, updated_at = now()
         WHERE squad_id = $1 AND facility_type = $2",
    )
    .bind(squad_id)
    .bind(facility.as_str())
    .bind(new_facility_level)
    .execute(&mut *tx)
    .await?;

    let total_levels: i32 = sqlx::query_scalar(
        "SELECT COALESCE(SUM(level), 0)::int FROM squad_facilities WHERE squad_id = $1",
    )
    .bind(squad_id)
    .fetch_one(&mut *tx)
    .await?;
    let new_squad_level = squad_level(total_levels);

    sqlx::query(
        "UPDATE coaching_squads
         SET unspent_points = unspent_points - $2, level = $3, updated_at = now()
         WHERE id = $1",
    )
    .bind(squad_id)
    .bind(cost)
    .bind(new_squad_level)
    .execute(&mut *tx)
    .await?;

    sqlx::query(
        "INSERT INTO squad_spend_transactions
             (id, squad_id, user_id, facility_type, from_level, to_level, points_spent)
         VALUES ($1, $2, $3, $4, $5, $6, $7)",
    )
    .bind(Uuid::new_v4())
    .bind(squad_id)
    .bind(user_id)
    .bind(facility.as_str())
    .bind(row.level)
    .bind(new_facility_level)
    .bind(cost)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;
    info!(
        squad_id = %squad_id,
        facility = facility.as_str(),
        level = new_facility_level,
        cost,
        "facility upgraded"
    );

    Ok(UpgradeOutcome {
        ok: true,
        facility_type: facility.as_str().to_string(),
        level: new_facility_level,
        cost,
        unspent_points: squad.unspent_points - cost,
        squad_level: new_squad_level,
    })
}

pub async fn set_member_role(
    state: &SharedState,
    leader_id: &str,
    squad_id: Uuid,
    target_user_id: &str,
    role: &str,
) -> Result<(), ServiceError> {
    if !matches!(role, "co_leader" | "member") {
        return Err(ServiceError::validation(
            "role must be one of co_leader, member",
        ));
    }

    let mut tx = state.db.begin().await?;
    lock_squad(&mut tx, squad_id).await?;

    let caller_role = member_role(&mut tx, squad_id, leader_id).await?;
    if caller_role.as_deref() != Some("leader") {
        return Err(ServiceError::forbidden(
            "only the squad leader can change roles",
        ));
    }
    if target_user_id == leader_id {
        return Err(ServiceError::conflict(
            "the leader cannot change their own role",
        ));
    }

    let updated = sqlx::query(
        "UPDATE squad_members SET role = $3
         WHERE squad_id = $1 AND user_id = $2 AND status = 'active'",
    )
    .bind(squad_id)
    .bind(target_user_id)
    .bind(role)
    .execute(&mut *tx)
    .await?;
    if updated.rows_affected() == 0 {
        return Err(ServiceError::not_found("member not found in this squad"));
    }

    touch_squad(&mut tx, squad_id).await?;
    tx.commit().await?;
    Ok(())
}

/// Squad rankings: points, then level, then earlier activity wins.
pub async fn squad_leaderboard(
    state: &SharedState,
    limit: Option<i64>,
) -> Result<Vec<SquadLeaderboardEntry>, ServiceError> {
    let limit = limit
        .unwrap_or(DEFAULT_LEADERBOARD_LIMIT)
        .clamp(1, MAX_LEADERBOARD_LIMIT);
    let squads: Vec<CoachingSquad> = sqlx::query_as(
        "SELECT * FROM coaching_squads
         ORDER BY total_points DESC, level DESC, updated_at ASC
         LIMIT $1",
    )
    .bind(limit)
    .fetch_all(&state.db)
    .await?;
    Ok(squads
        .into_iter()
        .enumerate()
        .map(|(index, squad)| SquadLeaderboardEntry {
            rank: index as i64 + 1,
            id: squad.id,
            name: squad.name,
            tag: squad.tag,
            total_points: squad.total_points,
            level: squad.level,
        })
        .collect())
}

pub async fn search_squads(
    state: &SharedState,
    query: Option<&str>,
    limit: Option<i64>,
) -> Result<Vec<CoachingSquad>, ServiceError> {
    let limit = limit
        .unwrap_or(DEFAULT_LEADERBOARD_LIMIT)
        .clamp(1, MAX_LEADERBOARD_LIMIT);
    let squads = match query.map(str::trim).filter(|q| !q.is_empty()) {
        Some(q) => {
            let pattern = format!("%{q}%");
            sqlx::query_as(
                "SELECT * FROM coaching_squads
                 WHERE name ILIKE $1 OR tag ILIKE $1
                 ORDER BY total_points DESC LIMIT $2",
            )
            .bind(pattern)
            .bind(limit)
            .fetch_all(&state.db)
            .await?
        }
        None => {
            sqlx::query_as("SELECT * FROM coaching_squads ORDER BY created_at DESC LIMIT $1")
                .bind(limit)
                .fetch_all(&state.db)
                .await?
        }
    };
    Ok(squads)
}

pub async fn my_squad(
    state: &SharedState,
    user_id: &str,
) -> Result<Option<SquadProfile>, ServiceError> {
    let squad_id: Option<Uuid> = sqlx::query_scalar(
        "SELECT squad_id FROM squad_members WHERE user_id = $1 AND status = 'active'",
    )
    .bind(user_id)
    .fetch_optional(&state.db)
    .await?;
    match squad_id {
        Some(id) => load_profile(state, id).await.map(Some),
        None => Ok(None),
    }
}

pub async fn squad_profile(
    state: &SharedState,
    squad_id: Uuid,
) -> Result<SquadProfile, ServiceError> {
    load_profile(state, squad_id).await
}

pub async fn pending_requests(
    state: &SharedState,
    user_id: &str,
    squad_id: Uuid,
) -> Result<Vec<SquadJoinRequest>, ServiceError> {
    let mut tx = state.db.begin().await?;
    require_officer(&mut tx, squad_id, user_id).await?;
    let requests = sqlx::query_as(
        "SELECT * FROM squad_join_requests
         WHERE squad_id = $1 AND status = 'pending'
         ORDER BY created_at",
    )
    .bind(squad_id)
    .fetch_all(&mut *tx)
    .await?;
    tx.commit().await?;
    Ok(requests)
}

async fn load_profile(state: &SharedState, squad_id: Uuid) -> Result<SquadProfile, ServiceError> {
    let squad: CoachingSquad = sqlx::query_as("SELECT * FROM coaching_squads WHERE id = $1")
        .bind(squad_id)
        .fetch_optional(&state.db)
        .await?
        .ok_or_else(|| ServiceError::not_found("squad not found"))?;

    let members: Vec<SquadMember> = sqlx::query_as(
        "SELECT * FROM squad_members
         WHERE squad_id = $1 AND status = 'active'
         ORDER BY points_contributed DESC, joined_at ASC",
    )
    .bind(squad_id)
    .fetch_all(&state.db)
    .await?;

    let facilities: Vec<SquadFacility> = sqlx::query_as(
        "SELECT squad_id, facility_type, level FROM squad_facilities
         WHERE squad_id = $1 ORDER BY facility_type",
    )
    .bind(squad_id)
    .fetch_all(&state.db)
    .await?;

    let facilities = facilities
        .into_iter()
        .map(|facility| {
            let next_upgrade_cost = FacilityType::parse(&facility.facility_type)
                .map(|kind| upgrade_cost(kind, facility.level));
            FacilityView {
                facility_type: facility.facility_type,
                level: facility.level,
                next_upgrade_cost,
            }
        })
        .collect();

    Ok(SquadProfile {
        ok: true,
        squad: squad.into(),
        members: members.into_iter().map(MemberView::from).collect(),
        facilities,
    })
}

async fn lock_squad(
    tx: &mut Transaction<'_, Postgres>,
    squad_id: Uuid,
) -> Result<CoachingSquad, ServiceError> {
    sqlx::query_as("SELECT * FROM coaching_squads WHERE id = $1 FOR UPDATE")
        .bind(squad_id)
        .fetch_optional(&mut **tx)
        .await?
        .ok_or_else(|| ServiceError::not_found("squad not found"))
}

async fn active_membership(
    tx: &mut Transaction<'_, Postgres>,
    user_id: &str,
) -> Result<Option<SquadMember>, ServiceError> {
    let membership = sqlx::query_as(
        "SELECT * FROM squad_members WHERE user_id = $1 AND status = 'active'",
    )
    .bind(user_id)
    .fetch_optional(&mut **tx)
    .await?;
    Ok(membership)
}

async fn ensure_not_in_squad(
    tx: &mut Transaction<'_, Postgres>,
    user_id: &str,
    allow_squad: Option<Uuid>,
) -> Result<(), ServiceError> {
    if let Some(existing) = active_membership(tx, user_id).await? {
        if Some(existing.squad_id) != allow_squad {
            return Err(ServiceError::conflict("already in a squad"));
        }
    }
    Ok(())
}

/// Upsert an active membership. The partial unique index on active
/// memberships is the hard guard; a violation here means the user joined
/// another squad between our check and this write.
async fn upsert_active_member(
    tx: &mut Transaction<'_, Postgres>,
    squad_id: Uuid,
    user_id: &str,
) -> Result<SquadMember, ServiceError> {
    let result = sqlx::query_as::<_, SquadMember>(
        "INSERT INTO squad_members (squad_id, user_id, role, status)
         VALUES ($1, $2, 'member', 'active')
         ON CONFLICT (squad_id, user_id) DO UPDATE SET status = 'active', role = 'member'
         RETURNING *",
    )
    .bind(squad_id)
    .bind(user_id)
    .fetch_one(&mut **tx)
    .await;
    match result {
        Ok(member) => Ok(member),
        Err(err) if is_unique_violation(&err, "squad_members_one_active_idx") => {
            Err(ServiceError::conflict("already in a squad"))
        }
        Err(err) => Err(err.into()),
    }
}

async fn member_role(
    tx: &mut Transaction<'_, Postgres>,
    squad_id: Uuid,
    user_id: &str,
) -> Result<Option<String>, ServiceError> {
    let role = sqlx::query_scalar(
        "SELECT role FROM squad_members
         WHERE squad_id = $1 AND user_id = $2 AND status = 'active'",
    )
    .bind(squad_id)
    .bind(user_id)
    .fetch_optional(&mut **tx)
    .await?;
    Ok(role)
}

async fn require_officer(
    tx: &mut Transaction<'_, Postgres>,
    squad_id: Uuid,
    user_id: &str,
) -> Result<(), ServiceError> {
    match member_role(tx, squad_id, user_id).await?.as_deref() {
        Some("leader") | Some("co_leader") => Ok(()),
        _ => Err(ServiceError::forbidden(
            "requires squad leader or co-leader",
        )),
    }
}

async fn mark_resolved(
    tx: &mut Transaction<'_, Postgres>,
    request_id: Uuid,
    resolver_id: &str,
    status: &str,
) -> Result<SquadJoinRequest, ServiceError> {
    let request = sqlx::query_as(
        "UPDATE squad_join_requests
         SET status = $2, resolved_at = now(), resolved_by = $3
         WHERE id = $1
         RETURNING *",
    )
    .bind(request_id)
    .bind(status)
    .bind(resolver_id)
    .fetch_one(&mut **tx)
    .await?;
    Ok(request)
}

async fn touch_squad(
    tx: &mut Transaction<'_, Postgres>,
    squad_id: Uuid,
) -> Result<(), ServiceError> {
    sqlx::query("UPDATE coaching_squads SET updated_at = now() WHERE id = $1")
        .bind(squad_id)
        .execute(&mut **tx)
        .await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upgrade_cost_scales_with_level() {
        // Base costs: training 5, spa 8, analysis 6, medical 7.
        assert_eq!(upgrade_cost(FacilityType::TrainingEquipment, 0), 5);
        assert_eq!(upgrade_cost(FacilityType::TrainingEquipment, 1), 10);
        assert_eq!(upgrade_cost(FacilityType::Spa, 0), 8);
        assert_eq!(upgrade_cost(FacilityType::Spa, 3), 32);
        assert_eq!(upgrade_cost(FacilityType::AnalysisRoom, 2), 18);
        assert_eq!(upgrade_cost(FacilityType::MedicalCenter, 4), 35);
    }

    #[test]
    fn test_squad_level_formula() {
        assert_eq!(squad_level(0), 1);
        assert_eq!(squad_level(3), 1);
        assert_eq!(squad_level(4), 2);
        assert_eq!(squad_level(11), 3);
    }

    #[test]
    fn test_sanitize_tag() {
        assert_eq!(sanitize_tag("abc").unwrap(), "ABC");
        assert_eq!(sanitize_tag(" gg1 ").unwrap(), "GG1");
        assert!(sanitize_tag("a").is_err());
        assert!(sanitize_tag("toolong").is_err());
        assert!(sanitize_tag("ab-c").is_err());
        assert!(sanitize_tag("").is_err());
    }

    #[test]
    fn test_facility_round_trips_strings() {
        for facility in FacilityType::ALL {
            assert_eq!(FacilityType::parse(facility.as_str()), Some(facility));
        }
        assert_eq!(FacilityType::parse("gym"), None);
    }
}
