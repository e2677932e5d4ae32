use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{delete, get, post},
};
use fce_srs::{Card, CardId, DeckId, NewCard};
use serde::Deserialize;

use crate::{
    ApiState,
    collection::CardContent,
    error::ApiError,
    validation::{validate_card_side, validate_new_card, validate_tag, validate_tags},
};

/// Create the card and tag routes
pub fn routes() -> Router<ApiState> {
    Router::new()
        .route("/cards", get(list_cards).post(create_card))
        .route(
            "/cards/{id}",
            get(get_card).put(update_card).delete(delete_card),
        )
        .route("/cards/{id}/tags", post(add_tag))
        .route("/cards/{id}/tags/{tag}", delete(remove_tag))
        .route("/tags", get(list_tags))
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CardFilter {
    deck_id: Option<DeckId>,
    tag: Option<String>,
}

/// Only the content of a card can be edited; scheduling fields are ignored
#[derive(Deserialize)]
struct CardUpdate {
    front: Option<String>,
    back: Option<String>,
    tags: Option<Vec<String>>,
}

#[derive(Deserialize)]
struct TagPayload {
    tag: String,
}

async fn list_cards(
    State(state): State<ApiState>,
    Query(filter): Query<CardFilter>,
) -> Json<Vec<Card>> {
    let collection = state.collection.read().await;

    Json(
        collection
            .cards()
            .iter()
            .filter(|card| filter.deck_id.as_ref().is_none_or(|id| card.deck_id == *id))
            .filter(|card| filter.tag.as_deref().is_none_or(|tag| card.has_tag(tag)))
            .cloned()
            .collect(),
    )
}

async fn get_card(
    State(state): State<ApiState>,
    Path(id): Path<CardId>,
) -> Result<Json<Card>, ApiError> {
    let collection = state.collection.read().await;
    collection
        .card(&id)
        .cloned()
        .map(Json)
        .ok_or_else(|| ApiError::card_not_found(&id))
}

async fn create_card(
    State(state): State<ApiState>,
    Json(payload): Json<NewCard>,
) -> Result<(StatusCode, Json<Card>), ApiError> {
    let new = validate_new_card(payload)?;

    let now = state.clock.now();
    let card = state
        .update(|collection| collection.add_card(new, now))
        .await?;

    tracing::info!(card_id = %card.id, deck_id = %card.deck_id, "Card created");
    Ok((StatusCode::CREATED, Json(card)))
}

async fn update_card(
    State(state): State<ApiState>,
    Path(id): Path<CardId>,
    Json(payload): Json<CardUpdate>,
) -> Result<Json<Card>, ApiError> {
    if let Some(front) = &payload.front {
        validate_card_side("front", front)?;
    }
    if let Some(back) = &payload.back {
        validate_card_side("back", back)?;
    }
    let tags = payload.tags.as_deref().map(validate_tags).transpose()?;

    let content = CardContent {
        front: payload.front,
        back: payload.back,
        tags,
    };
    let card = state
        .update(|collection| collection.update_card_content(&id, content))
        .await?;

    Ok(Json(card))
}

async fn delete_card(
    State(state): State<ApiState>,
    Path(id): Path<CardId>,
) -> Result<StatusCode, ApiError> {
    state
        .update(|collection| collection.delete_card(&id))
        .await?;

    tracing::info!(card_id = %id, "Card deleted");
    Ok(StatusCode::NO_CONTENT)
}

async fn add_tag(
    State(state): State<ApiState>,
    Path(id): Path<CardId>,
    Json(payload): Json<TagPayload>,
) -> Result<Json<Card>, ApiError> {
    let tag = validate_tag(&payload.tag)?;

    let card = state
        .update(|collection| collection.add_tag(&id, tag))
        .await?;

    Ok(Json(card))
}

async fn remove_tag(
    State(state): State<ApiState>,
    Path((id, tag)): Path<(CardId, String)>,
) -> Result<Json<Card>, ApiError> {
    let card = state
        .update(|collection| collection.remove_tag(&id, &tag))
        .await?;

    Ok(Json(card))
}

/// Every tag in use, sorted
async fn list_tags(State(state): State<ApiState>) -> Json<Vec<String>> {
    Json(state.collection.read().await.all_tags())
}
