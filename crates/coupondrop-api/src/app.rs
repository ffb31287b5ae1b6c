//! Application builder — wires router, static assets, and middleware into an Axum app.

use axum::Router;
use axum::middleware as axum_middleware;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::middleware::cors::build_cors_layer;
use crate::middleware::logging::request_logging;
use crate::middleware::session::session_cookie;
use crate::router::build_router;
use crate::state::AppState;

/// Builds the complete Axum application with all routes and middleware.
///
/// The session cookie layer wraps everything, static files included, so a
/// first page load already carries a session for the claim that follows.
pub fn build_app(state: AppState) -> Router {
    let router = build_router(state.clone());

    let router = if state.config.static_files.enabled {
        tracing::info!(
            directory = %state.config.static_files.directory,
            "Serving static files"
        );
        router.fallback_service(ServeDir::new(&state.config.static_files.directory))
    } else {
        router
    };

    router
        .layer(axum_middleware::from_fn_with_state(
            state.clone(),
            session_cookie,
        ))
        .layer(axum_middleware::from_fn(request_logging))
        .layer(TraceLayer::new_for_http())
        .layer(build_cors_layer(&state.config.server.cors))
}
