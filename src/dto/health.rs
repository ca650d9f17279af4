use serde::Serialize;
use utoipa::ToSchema;

use crate::config::AppConfig;

/// Payload returned by the `/health` route.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    pub ok: bool,
    pub service: &'static str,
    pub version: &'static str,
    pub modules: Vec<&'static str>,
    pub auth: AuthStatus,
    pub storage: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AuthStatus {
    pub jwt: bool,
    pub hmac: bool,
    pub cron: bool,
}

impl HealthResponse {
    pub fn new(config: &AppConfig, storage: &str) -> Self {
        Self {
            ok: storage == "ok",
            service: env!("CARGO_PKG_NAME"),
            version: env!("CARGO_PKG_VERSION"),
            modules: vec![
                "players",
                "sweep",
                "seasons",
                "leagues",
                "squads",
                "groups",
                "leaderboards",
            ],
            auth: AuthStatus {
                jwt: config.jwt_secret.is_some(),
                hmac: config.hmac_secret.is_some(),
                cron: config.cron_secret.is_some(),
            },
            storage: storage.to_string(),
        }
    }
}
