pub mod request_id;

pub use request_id::{request_id_middleware, RequestId};

use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::controllers::{
    health::{self, Readiness},
    render::RenderController,
    tts::TtsController,
};
use crate::infrastructure::config::Config;

/// Build the application router with all routes configured
pub fn create_router(
    config: &Config,
    tts_controller: Arc<TtsController>,
    render_controller: Arc<RenderController>,
    readiness: Arc<Readiness>,
) -> Router {
    let tts_routes = Router::new()
        .route("/api/tts", post(TtsController::synthesize))
        .with_state(tts_controller);

    // Inline images and narration easily exceed axum's default body limit
    let render_routes = Router::new()
        .route("/api/render", post(RenderController::render))
        .with_state(render_controller)
        .layer(DefaultBodyLimit::max(config.max_body_bytes));

    let app = Router::new()
        .route("/health", get(health::health))
        .route("/health/ready", get(health::health_ready))
        .with_state(readiness)
        .merge(tts_routes)
        .merge(render_routes)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(middleware::from_fn(request_id_middleware)),
        );

    if config.is_development() {
        // The browser client is served from a different origin during development
        app.layer(CorsLayer::permissive())
    } else {
        app
    }
}

/// Start the HTTP server with all routes configured
pub async fn start_http_server(
    config: Arc<Config>,
    tts_controller: Arc<TtsController>,
    render_controller: Arc<RenderController>,
    readiness: Arc<Readiness>,
) -> Result<(), Box<dyn std::error::Error>> {
    let app = create_router(&config, tts_controller, render_controller, readiness);

    let listener =
        tokio::net::TcpListener::bind(format!("{}:{}", config.host, config.port)).await?;

    tracing::info!("Server listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;

    Ok(())
}
