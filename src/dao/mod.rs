//! Postgres bootstrap and the small set of persistence primitives shared by
//! every service: pool construction, migrations, and the advisory-lock helper
//! that serializes the sweep.

pub mod models;

use std::time::Duration;

use anyhow::Context;
use sqlx::{
    PgPool, Postgres, Transaction,
    postgres::PgPoolOptions,
};
use tracing::info;

const MAX_CONNECTIONS: u32 = 10;
const IDLE_TIMEOUT: Duration = Duration::from_secs(30);
const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Open the connection pool. Connectivity is not verified here; call
/// [`bootstrap`] before serving traffic.
pub async fn connect(database_url: &str) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(MAX_CONNECTIONS)
        .idle_timeout(IDLE_TIMEOUT)
        .acquire_timeout(CONNECT_TIMEOUT)
        .connect(database_url)
        .await
}

/// Verify connectivity, run pending migrations, and ensure the sweep-state
/// singleton row exists.
pub async fn bootstrap(pool: &PgPool) -> anyhow::Result<()> {
    sqlx::query("SELECT 1")
        .execute(pool)
        .await
        .context("database connectivity check failed")?;

    sqlx::migrate!("./migrations")
        .run(pool)
        .await
        .context("running migrations")?;

    // The migration seeds the row, but a wiped table must not strand the
    // sweep; insert-if-absent is cheap on startup.
    sqlx::query("INSERT INTO sweep_state (id) VALUES (1) ON CONFLICT (id) DO NOTHING")
        .execute(pool)
        .await
        .context("ensuring sweep_state singleton")?;

    info!("database ready");
    Ok(())
}

/// Take a transaction-scoped advisory lock. Blocks until the lock is granted;
/// Postgres releases it at commit or rollback, so the lock lifetime is the
/// transaction lifetime.
pub async fn advisory_xact_lock(
    tx: &mut Transaction<'_, Postgres>,
    key: i64,
) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT pg_advisory_xact_lock($1)")
        .bind(key)
        .execute(&mut **tx)
        .await?;
    Ok(())
}
