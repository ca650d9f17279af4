pub mod documentation;
pub mod group_service;
pub mod health_service;
pub mod leaderboard_service;
pub mod league_service;
pub mod player_service;
pub mod season_service;
pub mod squad_service;
pub mod sweep_service;
