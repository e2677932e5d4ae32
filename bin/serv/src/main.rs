use axum::{Router, middleware, routing::get};
use fce_api::{ApiConfig, ApiState, metrics, middleware as api_middleware, tracing::init_tracing};
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration from .env and the environment
    dotenvy::dotenv().ok();
    let config = ApiConfig::from_env()?;

    init_tracing(&config.env);

    let metrics_handle = metrics::init_metrics()?;
    tracing::info!("Prometheus metrics exporter initialized");

    let pool = fce_db::create_pool(&config.database_url, config.max_db_connections).await?;
    fce_db::migrate(&pool).await?;

    let state = ApiState::new(&config, pool).await?;

    let cors = api_middleware::create_cors_layer(config.parsed_allowed_origins());

    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
        .on_response(DefaultOnResponse::new().level(Level::INFO));

    let metrics_app = Router::new()
        .route("/metrics", get(metrics::metrics_handler))
        .with_state(metrics_handle);

    let app = fce_api::router::router()
        .merge(metrics_app)
        .with_state(state)
        .layer(cors)
        .layer(trace_layer)
        .layer(middleware::from_fn(metrics::track_metrics))
        .layer(middleware::from_fn(api_middleware::request_id_middleware));

    let address = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&address).await?;
    tracing::info!(%address, environment = ?config.env, "Server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {e}");
    }
}
