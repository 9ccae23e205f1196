//! Movie catalog abstraction
//!
//! Catalog lookups are read-only and keyed by the catalog's own movie id.
//! Callers treat any error as "section unavailable"; providers do not retry.

use crate::{
    error::AppResult,
    models::{CastMember, MovieId, MovieSummary},
};

pub mod tmdb;

pub use tmdb::TmdbProvider;

/// Trait for movie catalog providers
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait CatalogProvider: Send + Sync {
    /// Full movie record, including attached videos
    async fn fetch_movie_details(&self, id: &MovieId) -> AppResult<MovieSummary>;

    /// Cast of the movie in billing order
    async fn fetch_movie_credits(&self, id: &MovieId) -> AppResult<Vec<CastMember>>;

    /// Movies the catalog considers similar
    async fn fetch_similar_movies(&self, id: &MovieId) -> AppResult<Vec<MovieSummary>>;

    /// Provider name for logging and debugging
    fn name(&self) -> &'static str;
}
