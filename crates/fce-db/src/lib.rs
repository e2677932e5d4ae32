pub mod models;
pub mod repositories;
pub mod snapshot;

pub use models::{AppState, ReviewStats};
pub use snapshot::{STORAGE_KEY, clear_state, load_state, save_state};

use std::str::FromStr;

use anyhow::Context;
use sqlx::{
    SqlitePool,
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
};

/// Create a SQLite connection pool, creating the database file if needed.
///
/// Every connection to `sqlite::memory:` opens its own empty database, so
/// in-memory pools should be created with `max_connections = 1`.
pub async fn create_pool(database_url: &str, max_connections: u32) -> anyhow::Result<SqlitePool> {
    let options = SqliteConnectOptions::from_str(database_url)
        .context("invalid database url")?
        .create_if_missing(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(max_connections)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(options)
        .await
        .context("failed to connect to database")?;

    Ok(pool)
}

/// Run the migrations in this crate's `migrations/` folder.
pub async fn migrate(pool: &SqlitePool) -> anyhow::Result<()> {
    // Bundled at compile time from `migrations/`
    sqlx::migrate!()
        .run(pool)
        .await
        .context("failed to run migrations")?;

    Ok(())
}
