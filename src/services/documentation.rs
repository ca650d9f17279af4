use utoipa::OpenApi;

#[derive(OpenApi)]
/// Aggregated OpenAPI specification for the gaffer-brain service.
#[openapi(
    paths(
        crate::routes::health::health,
        crate::routes::players::create_player,
        crate::routes::players::get_player,
        crate::routes::players::update_progress,
        crate::routes::players::complete_player,
        crate::routes::sweep::sweep_status,
        crate::routes::sweep::run_sweep,
        crate::routes::seasons::season_status,
        crate::routes::seasons::simulate_day,
        crate::routes::seasons::reset_sync,
        crate::routes::leagues::list_leagues,
        crate::routes::leagues::league_table,
        crate::routes::leagues::league_fixtures,
        crate::routes::leagues::league_results,
        crate::routes::squads::squad_leaderboard,
        crate::routes::squads::search_squads,
        crate::routes::squads::squad_profile,
        crate::routes::squads::create_squad,
        crate::routes::squads::my_squad,
        crate::routes::squads::join_squad,
        crate::routes::squads::request_join,
        crate::routes::squads::resolve_request,
        crate::routes::squads::leave_squad,
        crate::routes::squads::upgrade_facility,
        crate::routes::squads::set_member_role,
        crate::routes::squads::list_requests,
        crate::routes::groups::create_group,
        crate::routes::groups::join_group,
        crate::routes::groups::my_groups,
        crate::routes::groups::group_leaderboard,
        crate::routes::groups::leave_group,
        crate::routes::leaderboard::global_leaderboard,
    ),
    components(
        schemas(
            crate::dto::health::HealthResponse,
            crate::dto::health::AuthStatus,
            crate::dto::players::CreatePlayerRequest,
            crate::dto::players::ProgressRequest,
            crate::dto::players::PlayerSummary,
            crate::dto::players::PlayerResponse,
            crate::dto::players::ProgressResponse,
            crate::dto::players::CompletionOutcome,
            crate::dto::players::CompleteResponse,
            crate::dto::sweep::RunSweepRequest,
            crate::dto::sweep::PromotionRecord,
            crate::dto::sweep::SkipRecord,
            crate::dto::sweep::SweepSummary,
            crate::dto::sweep::SweepRunResponse,
            crate::dto::sweep::SweepStatus,
            crate::dto::seasons::TierReport,
            crate::dto::seasons::SimulateDayReport,
            crate::dto::seasons::ResetSyncEntry,
            crate::dto::seasons::ResetSyncReport,
            crate::dto::seasons::SeasonStatusEntry,
            crate::dto::seasons::SeasonStatusResponse,
            crate::dto::leagues::LeagueInfo,
            crate::dto::leagues::LeaguesResponse,
            crate::dto::leagues::TableRow,
            crate::dto::leagues::TableResponse,
            crate::dto::leagues::FixtureView,
            crate::dto::leagues::FixturesResponse,
            crate::dto::squads::CreateSquadRequest,
            crate::dto::squads::UpgradeRequestBody,
            crate::dto::squads::SetRoleRequestBody,
            crate::dto::squads::ResolveRequestBody,
            crate::dto::squads::SquadSummary,
            crate::dto::squads::MemberView,
            crate::dto::squads::FacilityView,
            crate::dto::squads::SquadProfile,
            crate::dto::squads::MySquadResponse,
            crate::dto::squads::JoinOutcome,
            crate::dto::squads::JoinRequestView,
            crate::dto::squads::ResolveOutcome,
            crate::dto::squads::UpgradeOutcome,
            crate::dto::squads::LeaveResponse,
            crate::dto::squads::SquadLeaderboardEntry,
            crate::dto::squads::SquadLeaderboardResponse,
            crate::dto::squads::SquadSearchResponse,
            crate::dto::squads::RequestsResponse,
            crate::dto::squads::SetRoleResponse,
            crate::dto::groups::CreateGroupRequest,
            crate::dto::groups::JoinGroupRequest,
            crate::dto::groups::GroupSummary,
            crate::dto::groups::GroupResponse,
            crate::dto::groups::GroupJoinOutcome,
            crate::dto::groups::MyGroupsResponse,
            crate::dto::groups::LeaveGroupResponse,
            crate::dto::groups::GroupLeaderboardResponse,
            crate::dto::leaderboard::LeaderboardEntry,
            crate::dto::leaderboard::GlobalLeaderboard,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "players", description = "Player career lifecycle"),
        (name = "sweep", description = "Transfer sweep batch job"),
        (name = "seasons", description = "Matchday simulator"),
        (name = "leagues", description = "League tables, fixtures and results"),
        (name = "squads", description = "Coaching squads and facilities"),
        (name = "groups", description = "Private friend groups"),
        (name = "leaderboard", description = "Global coach rankings"),
    )
)]
pub struct ApiDoc;
