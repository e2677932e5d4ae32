//! Prometheus metrics for monitoring API performance and review activity.

use std::{sync::LazyLock, time::Instant};

use axum::{
    extract::{MatchedPath, Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
};
use fce_srs::ReviewOutcome;
use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::{Matcher, PrometheusBuilder, PrometheusHandle};
use regex::Regex;

static UUID_SEGMENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[0-9a-f]{8}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{12}")
        .expect("valid uuid pattern")
});
static NUMERIC_SEGMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/\d+\b").expect("valid numeric pattern"));

/// Initialize Prometheus metrics exporter
pub fn init_metrics() -> anyhow::Result<PrometheusHandle> {
    let builder = PrometheusBuilder::new().set_buckets_for_metric(
        Matcher::Full("http_request_duration_seconds".to_string()),
        &[
            0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0,
        ],
    )?;

    Ok(builder.install_recorder()?)
}

/// Middleware to record HTTP request metrics
pub async fn track_metrics(req: Request, next: Next) -> Response {
    let start = Instant::now();
    let method = req.method().to_string();
    let path = metric_path(&req);

    let in_flight = gauge!("http_requests_in_flight", "method" => method.clone(), "path" => path.clone());
    in_flight.increment(1.0);

    let response = next.run(req).await;

    in_flight.decrement(1.0);

    let duration = start.elapsed().as_secs_f64();
    let status = response.status().as_u16().to_string();

    counter!(
        "http_requests_total",
        "method" => method.clone(),
        "path" => path.clone(),
        "status" => status.clone()
    )
    .increment(1);

    histogram!(
        "http_request_duration_seconds",
        "method" => method,
        "path" => path,
        "status" => status
    )
    .record(duration);

    response
}

/// The route template the request matched, e.g. `/cards/{id}/tags/{tag}`.
/// Requests that hit no route fall back to the normalized raw path.
fn metric_path(req: &Request) -> String {
    match req.extensions().get::<MatchedPath>() {
        Some(matched) => matched.as_str().to_string(),
        None => normalize_path(req.uri().path()),
    }
}

/// Normalize URL paths to reduce cardinality in metrics
/// Replaces UUIDs and numeric IDs with placeholders
fn normalize_path(path: &str) -> String {
    let normalized = UUID_SEGMENT.replace_all(path, ":id");
    NUMERIC_SEGMENT
        .replace_all(&normalized, "/:id")
        .into_owned()
}

/// Handler for the /metrics endpoint
pub async fn metrics_handler(State(handle): State<PrometheusHandle>) -> impl IntoResponse {
    (StatusCode::OK, handle.render())
}

/// Count a review by outcome
pub fn record_review(outcome: ReviewOutcome) {
    counter!("reviews_total", "outcome" => outcome.as_str()).increment(1);
}

/// Count a write of the collection to the store
pub fn record_store_write(success: bool) {
    let status = if success { "success" } else { "error" };
    counter!("store_writes_total", "status" => status).increment(1);
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{Router, body::Body, routing::get};
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    async fn labelled_path(uri: &str) -> String {
        let echo = |req: Request| async move { metric_path(&req) };
        let router = Router::new()
            .route("/cards/{id}", get(echo))
            .route("/cards/{id}/tags/{tag}", get(echo))
            .fallback(echo);

        let response = router
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let body = response.into_body().collect().await.unwrap().to_bytes();
        String::from_utf8(body.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_metric_path_uses_route_template() {
        assert_eq!(labelled_path("/cards/lk3j2h1abc").await, "/cards/{id}");
        assert_eq!(
            labelled_path("/cards/lk3j2h1abc/tags/verbs").await,
            "/cards/{id}/tags/{tag}"
        );
        assert_eq!(
            labelled_path("/nowhere/550e8400-e29b-41d4-a716-446655440000").await,
            "/nowhere/:id"
        );
    }

    #[test]
    fn test_normalize_path() {
        assert_eq!(
            normalize_path("/cards/550e8400-e29b-41d4-a716-446655440000"),
            "/cards/:id"
        );
        assert_eq!(normalize_path("/decks/123"), "/decks/:id");
        assert_eq!(
            normalize_path("/cards/550e8400-e29b-41d4-a716-446655440000/tags/verbs"),
            "/cards/:id/tags/verbs"
        );
        assert_eq!(normalize_path("/review/42/"), "/review/:id/");
        assert_eq!(normalize_path("/stats/summary"), "/stats/summary");
    }
}
