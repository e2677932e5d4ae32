use axum::{Json, Router, extract::State, routing::get};
use fce_db::ReviewStats;

use super::service::{self, DailyActivity, StatsSummary};
use crate::ApiState;

/// Create the statistics routes
pub fn routes() -> Router<ApiState> {
    Router::new()
        .route("/stats/summary", get(summary))
        .route("/stats/daily", get(daily))
        .route("/stats/today", get(today))
}

async fn summary(State(state): State<ApiState>) -> Json<StatsSummary> {
    let now = state.clock.now();
    let collection = state.collection.read().await;

    Json(service::summary(
        collection.review_stats(),
        collection.cards(),
        collection.decks(),
        &state.scheduler,
        now,
    ))
}

/// Reviews per day over the last week, oldest first
async fn daily(State(state): State<ApiState>) -> Json<Vec<DailyActivity>> {
    let now = state.clock.now();
    let collection = state.collection.read().await;

    Json(service::daily_series(
        collection.review_stats(),
        &state.scheduler,
        now,
    ))
}

async fn today(State(state): State<ApiState>) -> Json<ReviewStats> {
    let now = state.clock.now();
    let collection = state.collection.read().await;

    Json(service::today(collection.review_stats(), &state.scheduler, now))
}
