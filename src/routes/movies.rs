use axum::{
    extract::{Path, State},
    Extension, Json,
};
use std::sync::Arc;

use crate::{
    middleware::request_id::RequestId, models::MovieId, routes::AppState,
    services::MovieDetail,
};

/// Handler for the movie detail endpoint
///
/// Always answers 200; sections the catalog could not provide are empty.
pub async fn detail(
    State(state): State<Arc<AppState>>,
    Extension(request_id): Extension<RequestId>,
    Path(raw_id): Path<String>,
) -> Json<MovieDetail> {
    let id = MovieId::parse(&raw_id);
    tracing::info!(request_id = %request_id, movie_id = %id, "Opening movie detail");

    let detail = state.details.open(&id).await;

    tracing::info!(
        request_id = %request_id,
        movie_id = %id,
        loaded = detail.movie.is_some(),
        cast = detail.cast.len(),
        similar = detail.similar.len(),
        favorite = detail.favorite.is_favorite(),
        "Movie detail assembled"
    );

    Json(detail)
}
