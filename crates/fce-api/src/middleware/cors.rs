use axum::http::{HeaderValue, Method, header};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

/// Creates a CORS layer for the configured origins.
///
/// An empty list allows any origin, which is what local single-user setups want.
/// Credentials are never allowed since the service has no notion of a session.
pub fn create_cors_layer(allowed_origins: Vec<String>) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT]);

    if allowed_origins.is_empty() {
        return layer.allow_origin(Any);
    }

    let origins = allowed_origins
        .into_iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(%origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect::<Vec<_>>();

    layer.allow_origin(AllowOrigin::list(origins))
}
