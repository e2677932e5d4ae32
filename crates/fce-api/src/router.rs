use axum::{Router, http::StatusCode, response::IntoResponse, routing::get};

use crate::{card, deck, review, state::ApiState, stats, transfer};

pub fn router() -> Router<ApiState> {
    Router::new()
        .route("/health", get(health))
        .merge(deck::routes())
        .merge(card::routes())
        .merge(review::routes())
        .merge(stats::routes())
        .merge(transfer::routes())
        .fallback(handler_404)
}

async fn health() -> StatusCode {
    StatusCode::OK
}

async fn handler_404() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        "The requested resource was not found",
    )
}
