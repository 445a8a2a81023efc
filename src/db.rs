//! Connection pool setup for the SQLite store backing the service.

use std::str::FromStr;

use sqlx::Pool;
use sqlx::Sqlite;
use sqlx::sqlite::SqliteConnectOptions;
use sqlx::sqlite::SqlitePoolOptions;
use tracing::info;

pub type DbPool = Pool<Sqlite>;

/// Schema bootstrap, applied on every pool creation.
const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS users (
    id    INTEGER PRIMARY KEY AUTOINCREMENT,
    email TEXT NOT NULL UNIQUE,
    name  TEXT NOT NULL DEFAULT ''
);
CREATE TABLE IF NOT EXISTS notepads (
    id      INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id INTEGER NOT NULL REFERENCES users (id),
    title   TEXT NOT NULL,
    body    TEXT NOT NULL
);
";

pub async fn connect(database_url: &str, pool_size: u32) -> Result<DbPool, sqlx::Error> {
    let options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .foreign_keys(true);
    let pool = SqlitePoolOptions::new()
        .max_connections(pool_size)
        .min_connections(1)
        .connect_with(options)
        .await?;
    sqlx::raw_sql(SCHEMA).execute(&pool).await?;
    info!(database_url, "connected to the database");
    Ok(pool)
}

pub async fn ping(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}

/// Returns a pool over a fresh in-memory database, isolated from other tests.
///
/// The pool is capped at a single connection: each SQLite `:memory:`
/// connection is its own database, so a second one would see no tables.
#[cfg(test)]
pub fn for_tests() -> DbPool {
    futures::executor::block_on(connect("sqlite::memory:", 1))
        .expect("failed to initialize the test database")
}
