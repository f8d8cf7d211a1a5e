use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};

use super::handlers;
use super::AppState;
use crate::middleware::{make_span_with_session_id, session_middleware};

/// Creates the application router with all routes
pub fn create_router(state: AppState) -> Router {
    let posters = ServeDir::new(&state.library.movie_posters_dir);

    Router::new()
        .route("/health", get(handlers::health_check))
        .nest("/api/v1", api_routes())
        .nest_service("/posters", posters)
        .layer(TraceLayer::new_for_http().make_span_with(make_span_with_session_id))
        .layer(middleware::from_fn(session_middleware))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// API routes under /api/v1
fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/locations", get(handlers::get_locations))
        // Weather queries
        .route("/weather", get(handlers::query_weather))
        .route("/weather/music", get(handlers::query_weather_with_music))
        // Random recommendations
        .route("/recommendations/music", post(handlers::random_music))
        .route("/recommendations/movie", post(handlers::random_movie))
}
