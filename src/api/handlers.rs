use axum::{
    extract::{rejection::QueryRejection, Query, State},
    http::StatusCode,
    Extension, Json,
};
use serde_json::{json, Value};

use crate::error::AppResult;
use crate::middleware::SessionId;
use crate::models::{QueryResponse, WeatherQuery};
use crate::services::recommendations::{self, Lookup};

use super::AppState;

/// Health check endpoint
pub async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}

/// Official location names accepted by the weather query
pub async fn get_locations(State(state): State<AppState>) -> Json<Vec<String>> {
    Json(state.provider.location_names().await)
}

/// Weather for a city or keyword
pub async fn query_weather(
    State(state): State<AppState>,
    Extension(session_id): Extension<SessionId>,
    query: Result<Query<WeatherQuery>, QueryRejection>,
) -> AppResult<Json<QueryResponse>> {
    let Query(query) = query?;
    Ok(Json(run_query(state, session_id, &query.q, false).await))
}

/// Weather for a city or keyword, plus a matching song
pub async fn query_weather_with_music(
    State(state): State<AppState>,
    Extension(session_id): Extension<SessionId>,
    query: Result<Query<WeatherQuery>, QueryRejection>,
) -> AppResult<Json<QueryResponse>> {
    let Query(query) = query?;
    Ok(Json(run_query(state, session_id, &query.q, true).await))
}

async fn run_query(
    state: AppState,
    session_id: SessionId,
    input: &str,
    with_music: bool,
) -> QueryResponse {
    tracing::info!(
        session_id = %session_id,
        query = %input,
        with_music,
        "Processing weather query"
    );

    let lookup: Lookup = recommendations::lookup(state.provider.as_ref(), input).await;

    let library = state.library.clone();
    let response = state
        .sessions
        .with_session(session_id, |session| {
            recommendations::compose(lookup, &library, session, with_music, &mut rand::rng())
        })
        .await;

    tracing::info!(
        session_id = %session_id,
        has_forecast = response.forecast.is_some(),
        has_video = response.video.is_some(),
        "Weather query completed"
    );

    response
}

/// Random song the session has not heard yet
pub async fn random_music(
    State(state): State<AppState>,
    Extension(session_id): Extension<SessionId>,
) -> Json<QueryResponse> {
    let library = state.library.clone();
    let response = state
        .sessions
        .with_session(session_id, |session| {
            let pick =
                recommendations::random_music(&library.videos, &mut session.music, &mut rand::rng());
            QueryResponse {
                message: pick.message,
                video: pick.video,
                notices: pick.notices,
                ..Default::default()
            }
        })
        .await;

    tracing::info!(
        session_id = %session_id,
        has_video = response.video.is_some(),
        "Random song recommended"
    );

    Json(response)
}

/// Random movie the session has not seen yet
pub async fn random_movie(
    State(state): State<AppState>,
    Extension(session_id): Extension<SessionId>,
) -> Json<QueryResponse> {
    let library = state.library.clone();
    let response = state
        .sessions
        .with_session(session_id, |session| {
            recommendations::random_movie(&library.movies, &mut session.movies, &mut rand::rng())
        })
        .await;

    tracing::info!(
        session_id = %session_id,
        movie = response.movie.as_ref().map(|m| m.title.as_str()).unwrap_or("-"),
        "Random movie recommended"
    );

    Json(response)
}
