// src/routes.rs

use axum::{
    Router,
    http::{HeaderValue, Method, header},
    routing::{delete, get, post, put},
};
use tower::ServiceBuilder;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};

use crate::{
    docs,
    handlers::{comments, health, method_not_allowed, movies},
    state::AppState,
};

/// Assembles the main application router.
///
/// * Every endpoint binds a single method; any other verb gets a JSON 405.
/// * Applies global middleware (Trace, CORS) uniformly.
/// * Injects global state (store handle + config).
pub fn create_router(state: AppState) -> Router {
    let cors = cors_layer(&state.config.cors_origins);

    let movie_routes = Router::new()
        .route("/", get(movies::list_movies).fallback(method_not_allowed))
        .route("/details", get(movies::get_movie).fallback(method_not_allowed))
        .route("/search", get(movies::search_movies).fallback(method_not_allowed))
        .route("/add", post(movies::add_movie).fallback(method_not_allowed));

    let comment_routes = Router::new()
        .route("/add", post(comments::add_comment).fallback(method_not_allowed))
        .route("/update", put(comments::update_comment).fallback(method_not_allowed))
        .route("/delete", delete(comments::delete_comment).fallback(method_not_allowed));

    Router::new()
        .route("/api/health", get(health::health).fallback(method_not_allowed))
        .route("/api/openapi.json", get(docs::openapi_json).fallback(method_not_allowed))
        .nest("/api/movies", movie_routes)
        .nest("/api/comments", comment_routes)
        // Global Middleware (applied from outside in)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(state)
}

/// Any origin when none are configured, otherwise exactly the listed ones.
fn cors_layer(origins: &[String]) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE]);

    if origins.is_empty() {
        return cors.allow_origin(Any);
    }

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    cors.allow_origin(AllowOrigin::list(allowed))
}
