//! Application-level configuration loaded from the environment.

use std::env;

use anyhow::Context;
use tracing::warn;

use crate::league::MatchEngine;

/// Default port the HTTP listener binds when `PORT` is unset.
const DEFAULT_PORT: u16 = 8080;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Production,
}

#[derive(Debug, Clone)]
/// Immutable runtime configuration shared across the application.
pub struct AppConfig {
    pub database_url: String,
    /// HS256 secret for user tokens. Unset means the JWT gate fails closed.
    pub jwt_secret: Option<String>,
    /// Shared secret for server-to-server signatures. Unset fails closed.
    pub hmac_secret: Option<String>,
    /// Bearer secret for the cron caller. Unset fails closed.
    pub cron_secret: Option<String>,
    pub port: u16,
    pub environment: Environment,
    /// Goal model used by the matchday simulator.
    pub match_engine: MatchEngine,
}

impl AppConfig {
    /// Load configuration from environment variables.
    ///
    /// `DATABASE_URL` is the only hard requirement; missing auth secrets are
    /// tolerated at startup (the corresponding gate rejects every request)
    /// so a partially configured instance can still serve public reads.
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = env::var("DATABASE_URL").context("DATABASE_URL is not set")?;

        let jwt_secret = optional_secret("AUTH_JWT_SECRET");
        let hmac_secret = optional_secret("BRAIN_HMAC_SECRET");
        let cron_secret = optional_secret("CRON_SECRET");

        let port = env::var("PORT")
            .ok()
            .and_then(|value| value.parse::<u16>().ok())
            .unwrap_or(DEFAULT_PORT);

        let environment = match env::var("APP_ENV").as_deref() {
            Ok("production") | Ok("prod") => Environment::Production,
            _ => Environment::Development,
        };

        let match_engine = match env::var("MATCH_ENGINE").as_deref() {
            Ok("uniform") => MatchEngine::Uniform,
            Ok("poisson") | Err(_) => MatchEngine::Poisson,
            Ok(other) => {
                warn!(engine = %other, "unknown MATCH_ENGINE; falling back to poisson");
                MatchEngine::Poisson
            }
        };

        Ok(Self {
            database_url,
            jwt_secret,
            hmac_secret,
            cron_secret,
            port,
            environment,
            match_engine,
        })
    }

    pub fn is_production(&self) -> bool {
        self.environment == Environment::Production
    }
}

fn optional_secret(var: &str) -> Option<String> {
    match env::var(var) {
        Ok(value) if !value.is_empty() => Some(value),
        _ => {
            warn!(var, "secret not configured; the corresponding gate will reject all requests");
            None
        }
    }
}
