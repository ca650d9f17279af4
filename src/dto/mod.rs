//! Request and response shapes for the HTTP surface.

pub mod groups;
pub mod health;
pub mod leaderboard;
pub mod leagues;
pub mod players;
pub mod seasons;
pub mod squads;
pub mod sweep;
pub mod validation;
