use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::{get, post},
};
use fce_srs::{Card, CardId, DeckId, ReviewOutcome, challenge_cards, shuffled};
use rand::{SeedableRng, rngs::StdRng};
use serde::{Deserialize, Serialize};

use crate::{ApiState, collection::ReviewReceipt, error::ApiError, metrics};

/// Create the review routes
pub fn routes() -> Router<ApiState> {
    Router::new()
        .route("/review/due", get(due_queue))
        .route("/review/challenge", get(challenge_round))
        .route("/review/{card_id}", post(submit_review))
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DueQuery {
    /// Restrict the queue to one deck; all decks when absent
    deck_id: Option<DeckId>,
    /// Present the queue in random order instead of collection order
    #[serde(default)]
    shuffle: bool,
}

#[derive(Deserialize)]
struct ReviewSubmission {
    correct: bool,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct DueQueue {
    total: usize,
    cards: Vec<Card>,
}

/// Cards due now, the queue a learning or review session works through
async fn due_queue(
    State(state): State<ApiState>,
    Query(query): Query<DueQuery>,
) -> Result<Json<DueQueue>, ApiError> {
    let now = state.clock.now();
    let collection = state.collection.read().await;

    if let Some(deck_id) = &query.deck_id {
        collection
            .deck(deck_id)
            .ok_or_else(|| ApiError::deck_not_found(deck_id))?;
    }

    let mut queue = collection.due_cards(query.deck_id.as_ref(), now);
    if query.shuffle {
        queue = shuffled(&queue, &mut StdRng::from_entropy());
    }

    Ok(Json(DueQueue {
        total: queue.len(),
        cards: queue.into_iter().cloned().collect(),
    }))
}

/// A random round of short-answer cards, regardless of due dates
async fn challenge_round(State(state): State<ApiState>) -> Json<Vec<Card>> {
    let collection = state.collection.read().await;
    let round = challenge_cards(collection.cards(), &mut StdRng::from_entropy());

    Json(round.into_iter().cloned().collect())
}

async fn submit_review(
    State(state): State<ApiState>,
    Path(card_id): Path<CardId>,
    Json(payload): Json<ReviewSubmission>,
) -> Result<Json<ReviewReceipt>, ApiError> {
    let outcome = ReviewOutcome::from(payload.correct);

    let now = state.clock.now();
    let receipt = state
        .update(|collection| collection.review_card(&card_id, outcome, now))
        .await?;

    metrics::record_review(outcome);
    Ok(Json(receipt))
}
