//! Whole-state persistence.
//!
//! The application state is stored as one JSON blob under a fixed key. Loading
//! never fails: an absent, unreadable or corrupted blob yields the default empty
//! state, so the scheduler only ever sees validated in-memory records.

use anyhow::Context;
use chrono::Utc;
use sqlx::{Executor, Sqlite};

use crate::{models::AppState, repositories::kv};

/// Key the application state is stored under
pub const STORAGE_KEY: &str = "flashcard-engine-data";

/// Load the application state, falling back to an empty one.
pub async fn load_state<'e, E>(executor: E) -> AppState
where
    E: Executor<'e, Database = Sqlite>,
{
    let serialized = match kv::get_value(executor, STORAGE_KEY).await {
        Ok(Some(serialized)) => serialized,
        Ok(None) => {
            tracing::debug!("No stored state found, starting empty");
            return AppState::default();
        }
        Err(e) => {
            tracing::error!("Error reading stored state: {e}");
            return AppState::default();
        }
    };

    match serde_json::from_str::<AppState>(&serialized) {
        Ok(state) => {
            tracing::info!(
                decks = state.decks.len(),
                cards = state.cards.len(),
                "Loaded stored state"
            );
            state
        }
        Err(e) => {
            tracing::error!("Invalid state structure in store: {e}");
            AppState::default()
        }
    }
}

/// Serialize and store the whole application state.
pub async fn save_state<'e, E>(executor: E, state: &AppState) -> anyhow::Result<()>
where
    E: Executor<'e, Database = Sqlite>,
{
    let serialized = serde_json::to_string(state).context("failed to serialize state")?;

    kv::put_value(
        executor,
        STORAGE_KEY,
        &serialized,
        Utc::now().timestamp_millis(),
    )
    .await
    .context("failed to write state")?;

    Ok(())
}

/// Remove the stored state entirely.
pub async fn clear_state<'e, E>(executor: E) -> anyhow::Result<()>
where
    E: Executor<'e, Database = Sqlite>,
{
    let removed = kv::delete_value(executor, STORAGE_KEY)
        .await
        .context("failed to clear state")?;

    if removed {
        tracing::info!("Application state cleared");
    }

    Ok(())
}
