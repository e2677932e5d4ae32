//! Export, import and reset of the whole collection.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
};
use fce_db::AppState;
use fce_srs::{Card, DeckId, NewCard};
use serde::Deserialize;

use crate::{
    ApiState,
    collection::{DeckBundle, ImportSummary},
    error::ApiError,
    validation::{validate_bundle, validate_new_card},
};

/// Create the import/export routes
pub fn routes() -> Router<ApiState> {
    Router::new()
        .route("/export", get(export_all))
        .route("/export/{deck_id}", get(export_deck))
        .route("/import", post(import_bundle))
        .route("/import/cards", post(import_cards))
        .route("/reset", post(reset))
}

#[derive(Deserialize)]
struct CardBatch {
    cards: Vec<NewCard>,
}

/// Everything, in the stored format
async fn export_all(State(state): State<ApiState>) -> Json<AppState> {
    Json(state.collection.read().await.state().clone())
}

async fn export_deck(
    State(state): State<ApiState>,
    Path(deck_id): Path<DeckId>,
) -> Result<Json<DeckBundle>, ApiError> {
    let collection = state.collection.read().await;
    Ok(Json(collection.export_deck(&deck_id)?))
}

/// Merge an export back in, keeping review history
async fn import_bundle(
    State(state): State<ApiState>,
    Json(bundle): Json<DeckBundle>,
) -> Result<Json<ImportSummary>, ApiError> {
    let bundle = validate_bundle(bundle)?;
    let summary = state
        .update(|collection| Ok(collection.import(bundle)))
        .await?;

    Ok(Json(summary))
}

/// Add new cards in bulk; each starts with a fresh schedule
async fn import_cards(
    State(state): State<ApiState>,
    Json(batch): Json<CardBatch>,
) -> Result<(StatusCode, Json<Vec<Card>>), ApiError> {
    if batch.cards.is_empty() {
        return Err(ApiError::Validation("No cards to import".to_string()));
    }
    let batch = batch
        .cards
        .into_iter()
        .map(validate_new_card)
        .collect::<Result<Vec<_>, _>>()?;

    let now = state.clock.now();
    let cards = state
        .update(|collection| collection.add_cards(batch, now))
        .await?;

    tracing::info!(count = cards.len(), "Cards imported");
    Ok((StatusCode::CREATED, Json(cards)))
}

/// Wipe the collection and the stored copy
async fn reset(State(state): State<ApiState>) -> Result<StatusCode, ApiError> {
    state.reset().await?;

    tracing::warn!("Collection reset");
    Ok(StatusCode::NO_CONTENT)
}
