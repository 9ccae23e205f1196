use std::sync::Arc;

use serde::Serialize;

use crate::{
    error::AppResult,
    models::{
        format_popularity, format_runtime, release_year, share_message, trailer_url, CastMember,
        FavoriteFlag, MovieId, MovieSummary,
    },
    services::{favorites::FavoritesStore, providers::CatalogProvider},
};

/// Presentation strings derived from a movie record
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DetailDisplay {
    pub title: Option<String>,
    pub genres: Vec<String>,
    pub popularity: Option<String>,
    pub runtime: Option<String>,
    pub release_year: String,
    pub overview: Option<String>,
    pub poster_url: Option<String>,
    pub trailer_url: Option<String>,
    pub share_message: String,
}

/// Everything the movie detail view shows
#[derive(Debug, Clone, Serialize)]
pub struct MovieDetail {
    pub id: MovieId,
    pub movie: Option<MovieSummary>,
    pub display: Option<DetailDisplay>,
    pub cast: Vec<CastMember>,
    pub similar: Vec<MovieSummary>,
    pub favorite: FavoriteFlag,
}

#[derive(Clone)]
pub struct MovieDetailService {
    catalog: Arc<dyn CatalogProvider>,
    favorites: FavoritesStore,
    image_url: String,
}

impl MovieDetailService {
    pub fn new(
        catalog: Arc<dyn CatalogProvider>,
        favorites: FavoritesStore,
        image_url: String,
    ) -> Self {
        Self {
            catalog,
            favorites,
            image_url: image_url.trim_end_matches('/').to_string(),
        }
    }

    /// Loads the detail view for `id`
    ///
    /// Catalog sections and the stored favorite state are fetched
    /// concurrently. A failed catalog call leaves its section empty; cast and
    /// similar titles are only shown once the details themselves loaded.
    pub async fn open(&self, id: &MovieId) -> MovieDetail {
        let provider = self.catalog.name();
        let (details, credits, similar, favorite) = tokio::join!(
            self.catalog.fetch_movie_details(id),
            self.catalog.fetch_movie_credits(id),
            self.catalog.fetch_similar_movies(id),
            self.favorites.load_initial_favorite_state(id),
        );

        let movie = details
            .map_err(|e| tracing::warn!(movie_id = %id, provider, error = %e, "Movie details unavailable"))
            .ok();
        let cast = credits
            .map_err(|e| tracing::warn!(movie_id = %id, provider, error = %e, "Movie credits unavailable"))
            .unwrap_or_default();
        let similar = similar
            .map_err(|e| tracing::warn!(movie_id = %id, provider, error = %e, "Similar movies unavailable"))
            .unwrap_or_default();

        let mut flag = FavoriteFlag::pending();
        flag.resync(favorite);

        let (display, cast, similar) = match &movie {
            Some(movie) => (Some(self.display_for(movie)), cast, similar),
            None => (None, Vec::new(), Vec::new()),
        };

        MovieDetail {
            id: id.clone(),
            movie,
            display,
            cast,
            similar,
            favorite: flag,
        }
    }

    /// Fetches the full record stored when a movie is favorited
    pub async fn record_for_save(&self, id: &MovieId) -> AppResult<MovieSummary> {
        self.catalog.fetch_movie_details(id).await
    }

    fn display_for(&self, movie: &MovieSummary) -> DetailDisplay {
        DetailDisplay {
            title: movie.title().map(str::to_string),
            genres: movie.genre_names(),
            popularity: movie.popularity().map(format_popularity),
            runtime: movie.runtime().map(format_runtime),
            release_year: release_year(movie.release_date()),
            overview: movie.overview().map(str::to_string),
            poster_url: movie
                .poster_path()
                .map(|path| format!("{}{}", self.image_url, path)),
            trailer_url: movie.first_video_key().map(trailer_url),
            share_message: share_message(movie),
        }
    }
}
