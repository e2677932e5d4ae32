use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::get,
};
use chrono::{DateTime, Utc};
use fce_srs::{Card, Deck, DeckId, is_due};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::{ApiState, error::ApiError, validation::validate_deck_name};

/// Create the deck routes
pub fn routes() -> Router<ApiState> {
    Router::new()
        .route("/decks", get(list_decks).post(create_deck))
        .route("/decks/current", get(get_current_deck).put(set_current_deck))
        .route(
            "/decks/{id}",
            get(get_deck).put(rename_deck).delete(delete_deck),
        )
}

#[derive(Deserialize)]
struct DeckName {
    name: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CurrentDeck {
    deck_id: Option<DeckId>,
}

/// A deck with counts over its cards
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeckSummary {
    #[serde(flatten)]
    pub deck: Deck,
    pub card_count: usize,
    pub due_count: usize,
}

impl DeckSummary {
    fn new(deck: &Deck, cards: &[Card], now: DateTime<Utc>) -> Self {
        let (card_count, due_count) = deck
            .cards(cards)
            .fold((0, 0), |(total, due), card| {
                (total + 1, due + usize::from(is_due(card, now)))
            });

        Self {
            deck: deck.clone(),
            card_count,
            due_count,
        }
    }
}

async fn list_decks(State(state): State<ApiState>) -> Json<Vec<DeckSummary>> {
    let now = state.clock.now();
    let collection = state.collection.read().await;

    Json(
        collection
            .decks()
            .iter()
            .map(|deck| DeckSummary::new(deck, collection.cards(), now))
            .collect(),
    )
}

async fn get_deck(
    State(state): State<ApiState>,
    Path(id): Path<DeckId>,
) -> Result<Json<DeckSummary>, ApiError> {
    let now = state.clock.now();
    let collection = state.collection.read().await;
    let deck = collection
        .deck(&id)
        .ok_or_else(|| ApiError::deck_not_found(&id))?;

    Ok(Json(DeckSummary::new(deck, collection.cards(), now)))
}

/// Create a deck; it becomes the current deck
async fn create_deck(
    State(state): State<ApiState>,
    Json(payload): Json<DeckName>,
) -> Result<(StatusCode, Json<Deck>), ApiError> {
    let name = validate_deck_name(&payload.name)?;

    let now = state.clock.now();
    let deck = state
        .update(|collection| Ok(collection.add_deck(name, now)))
        .await?;

    tracing::info!(deck_id = %deck.id, "Deck created");
    Ok((StatusCode::CREATED, Json(deck)))
}

async fn rename_deck(
    State(state): State<ApiState>,
    Path(id): Path<DeckId>,
    Json(payload): Json<DeckName>,
) -> Result<Json<Deck>, ApiError> {
    let name = validate_deck_name(&payload.name)?;

    let deck = state
        .update(|collection| collection.rename_deck(&id, name))
        .await?;

    Ok(Json(deck))
}

/// Delete a deck and every card in it
async fn delete_deck(
    State(state): State<ApiState>,
    Path(id): Path<DeckId>,
) -> Result<Json<Value>, ApiError> {
    let deleted_cards = state
        .update(|collection| collection.delete_deck(&id))
        .await?;

    tracing::info!(deck_id = %id, deleted_cards, "Deck deleted");
    Ok(Json(json!({ "deletedCards": deleted_cards })))
}

async fn get_current_deck(State(state): State<ApiState>) -> Json<Value> {
    let collection = state.collection.read().await;
    Json(json!({ "deckId": collection.current_deck_id() }))
}

async fn set_current_deck(
    State(state): State<ApiState>,
    Json(payload): Json<CurrentDeck>,
) -> Result<Json<Value>, ApiError> {
    let current = state
        .update(|collection| {
            collection.set_current_deck(payload.deck_id)?;
            Ok(collection.current_deck_id().cloned())
        })
        .await?;

    Ok(Json(json!({ "deckId": current })))
}
