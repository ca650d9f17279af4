//! Shared application state handed to every handler.
//!
//! All mutable state lives in Postgres; the in-process state is just the pool
//! and the immutable configuration.

use std::sync::Arc;

use sqlx::PgPool;

use crate::config::AppConfig;

pub type SharedState = Arc<AppState>;

pub struct AppState {
    pub db: PgPool,
    pub config: AppConfig,
}

impl AppState {
    /// Construct a new [`AppState`] wrapped in an [`Arc`] so it can be cloned
    /// cheaply into middleware and handlers.
    pub fn new(db: PgPool, config: AppConfig) -> SharedState {
        Arc::new(Self { db, config })
    }
}
