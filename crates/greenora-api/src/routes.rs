//! Router setup with all API routes and middleware.

use std::future::Future;

use axum::extract::DefaultBodyLimit;
use axum::http::{header, HeaderValue, Method};
use axum::routing::{get, post};
use axum::Router;
use tower_http::compression::CompressionLayer;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

use greenora_core::config::GreenoraConfig;
use greenora_core::error::GreenoraError;

use crate::handlers;
use crate::rate_limit::{rate_limit_middleware, RateLimiter};
use crate::state::AppState;

/// Requests per second on the rate-limited routes.
pub const DEFAULT_RATE_LIMIT: u64 = 100;

const BODY_LIMIT_BYTES: usize = 64 * 1024;

/// Create the axum Router with all routes and middleware.
pub fn create_router(state: AppState) -> Router {
    create_router_with_rate_limit(state, DEFAULT_RATE_LIMIT)
}

/// Same as [`create_router`] with an explicit per-second request limit.
pub fn create_router_with_rate_limit(state: AppState, max_per_sec: u64) -> Router {
    // Browser clients served from the configured port, or the one above it
    // in development.
    let port = state.config.general.port;
    let origins: Vec<HeaderValue> = [port, port.saturating_add(1)]
        .iter()
        .flat_map(|p| [format!("http://127.0.0.1:{}", p), format!("http://localhost:{}", p)])
        .filter_map(|origin| origin.parse().ok())
        .collect();
    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT]);

    let public_routes = Router::new().route("/health", get(handlers::health));

    let rate_limited_routes = Router::new()
        .route("/plants", get(handlers::list_plants))
        .route("/plants/{id}", get(handlers::get_plant))
        .route("/chat/quick-questions", get(handlers::quick_questions))
        .route(
            "/chat/sessions",
            get(handlers::list_sessions).post(handlers::create_session),
        )
        .route(
            "/chat/sessions/{id}",
            get(handlers::get_session).delete(handlers::delete_session),
        )
        .route("/chat/sessions/{id}/messages", post(handlers::post_message))
        .layer(axum::middleware::from_fn(rate_limit_middleware))
        .layer(axum::Extension(RateLimiter::new(max_per_sec)));

    // Long-lived streams are exempt from rate limiting.
    let stream_routes =
        Router::new().route("/chat/sessions/{id}/events", get(handlers::session_events));

    public_routes
        .merge(rate_limited_routes)
        .merge(stream_routes)
        .layer(DefaultBodyLimit::max(BODY_LIMIT_BYTES))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Serve on `127.0.0.1:{general.port}` until `shutdown` resolves.
pub async fn start_server<F>(
    config: &GreenoraConfig,
    state: AppState,
    shutdown: F,
) -> Result<(), GreenoraError>
where
    F: Future<Output = ()> + Send + 'static,
{
    let addr = format!("127.0.0.1:{}", config.general.port);
    let router = create_router(state);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| GreenoraError::Api(format!("Failed to bind {}: {}", addr, e)))?;

    tracing::info!(addr = %addr, "API server listening");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown)
        .await
        .map_err(|e| GreenoraError::Api(format!("Server error: {}", e)))?;

    tracing::info!("API server stopped");
    Ok(())
}
