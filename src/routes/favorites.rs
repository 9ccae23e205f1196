use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::{
    error::{AppError, AppResult},
    middleware::request_id::RequestId,
    models::{FavoriteState, FavoritesCollection, MovieId, MovieSummary},
    routes::AppState,
};

#[derive(Debug, Serialize)]
pub struct FavoriteStatus {
    pub id: MovieId,
    pub favorite: bool,
}

/// Query for the toggle endpoint
#[derive(Debug, Default, Deserialize)]
pub struct ToggleQuery {
    /// State the client showed when the user toggled
    pub seen: Option<FavoriteState>,
}

#[derive(Debug, Serialize)]
pub struct ToggleResponse {
    pub id: MovieId,
    /// Stored membership after the request
    pub favorite: bool,
    /// Whether the requested transition reached storage
    pub persisted: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

/// Handler for listing saved movies
pub async fn list(State(state): State<Arc<AppState>>) -> Json<FavoritesCollection> {
    Json(state.favorites.list().await)
}

/// Handler for a single movie's favorite state
pub async fn status(
    State(state): State<Arc<AppState>>,
    Path(raw_id): Path<String>,
) -> Json<FavoriteStatus> {
    let id = MovieId::parse(&raw_id);
    let favorite = state.favorites.is_favorite(&id).await;
    Json(FavoriteStatus { id, favorite })
}

/// Handler for toggling a movie's favorite state
///
/// `?seen=` names the state the client showed; without it the stored state
/// at arrival is used. Either way the request targets the opposite state, so
/// overlapping requests from the same state make one transition.
///
/// The body may carry the movie record to save. Without one, an add waits
/// for the catalog details and saves those. Storage failures are reported in
/// the body, never as an error status, and `favorite` always reflects what is
/// actually stored.
pub async fn toggle(
    State(state): State<Arc<AppState>>,
    Extension(request_id): Extension<RequestId>,
    Path(raw_id): Path<String>,
    Query(query): Query<ToggleQuery>,
    body: Bytes,
) -> AppResult<Json<ToggleResponse>> {
    let id = MovieId::parse(&raw_id);
    let seen = match query.seen {
        Some(seen) => seen,
        None => FavoriteState::from(state.favorites.is_favorite(&id).await),
    };

    let record = match parse_record(&body)? {
        Some(record) => Some(record),
        None if !seen.is_favorite() => {
            match state.details.record_for_save(&id).await {
                Ok(record) => Some(record),
                Err(e) => {
                    tracing::warn!(
                        request_id = %request_id,
                        movie_id = %id,
                        error = %e,
                        "Movie details unavailable, cannot save"
                    );
                    None
                }
            }
        }
        None => None,
    };

    let response = match state.favorites.toggle_favorite(&id, seen, record).await {
        Ok(favorite) => ToggleResponse {
            id,
            favorite,
            persisted: true,
            reason: None,
        },
        Err(e) => {
            let favorite = match e.previous_state() {
                Some(favorite) => favorite,
                None => state.favorites.is_favorite(&id).await,
            };
            tracing::warn!(request_id = %request_id, movie_id = %id, error = %e, "Favorite toggle not applied");
            ToggleResponse {
                id,
                favorite,
                persisted: false,
                reason: Some(e.to_string()),
            }
        }
    };

    Ok(Json(response))
}

fn parse_record(body: &[u8]) -> AppResult<Option<MovieSummary>> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(None);
    }
    serde_json::from_slice(body)
        .map(Some)
        .map_err(|e| AppError::InvalidInput(format!("Invalid movie record: {}", e)))
}
