//! TMDB catalog provider
//!
//! API Flow:
//! 1. Details: /movie/{id}?append_to_response=videos
//! 2. Credits: /movie/{id}/credits
//! 3. Similar: /movie/{id}/similar
//!
//! Authentication is the v3 `api_key` query parameter.

use crate::{
    error::{AppError, AppResult},
    models::{CastMember, MovieCredits, MovieId, MovieList, MovieSummary},
    services::providers::CatalogProvider,
};
use reqwest::Client as HttpClient;
use serde::de::DeserializeOwned;

#[derive(Clone)]
pub struct TmdbProvider {
    http_client: HttpClient,
    api_key: String,
    api_url: String,
}

impl TmdbProvider {
    pub fn new(api_key: String, api_url: String) -> Self {
        Self {
            http_client: HttpClient::new(),
            api_key,
            api_url: api_url.trim_end_matches('/').to_string(),
        }
    }

    /// GETs `path` under the API root and decodes the JSON body
    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        extra: &[(&str, &str)],
    ) -> AppResult<T> {
        let url = format!("{}{}", self.api_url, path);

        let response = self
            .http_client
            .get(&url)
            .query(&[("api_key", self.api_key.as_str())])
            .query(extra)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            if status == reqwest::StatusCode::NOT_FOUND {
                return Err(AppError::NotFound(format!("TMDB resource {}", path)));
            }
            return Err(AppError::ExternalApi(format!(
                "TMDB API returned status {}: {}",
                status, body
            )));
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| {
            tracing::error!(error = %e, path = %path, "Failed to deserialize TMDB response");
            AppError::ExternalApi(format!("Failed to parse TMDB response: {}", e))
        })
    }
}

/// TMDB ids are integers; anything else is rejected before a URL is built
fn catalog_id(id: &MovieId) -> AppResult<i64> {
    match id {
        MovieId::Number(id) => Ok(*id),
        MovieId::Text(raw) => Err(AppError::InvalidInput(format!(
            "TMDB movie ids are numeric, got {:?}",
            raw
        ))),
    }
}

#[async_trait::async_trait]
impl CatalogProvider for TmdbProvider {
    async fn fetch_movie_details(&self, id: &MovieId) -> AppResult<MovieSummary> {
        let movie: MovieSummary = self
            .get_json(
                &format!("/movie/{}", catalog_id(id)?),
                &[("append_to_response", "videos")],
            )
            .await?;

        tracing::info!(movie_id = %id, provider = "tmdb", "Movie details fetched");
        Ok(movie)
    }

    async fn fetch_movie_credits(&self, id: &MovieId) -> AppResult<Vec<CastMember>> {
        let credits: MovieCredits = self
            .get_json(&format!("/movie/{}/credits", catalog_id(id)?), &[])
            .await?;

        tracing::debug!(movie_id = %id, cast = credits.cast.len(), "Movie credits fetched");
        Ok(credits.cast)
    }

    async fn fetch_similar_movies(&self, id: &MovieId) -> AppResult<Vec<MovieSummary>> {
        let similar: MovieList = self
            .get_json(&format!("/movie/{}/similar", catalog_id(id)?), &[])
            .await?;

        tracing::debug!(movie_id = %id, results = similar.results.len(), "Similar movies fetched");
        Ok(similar.results)
    }

    fn name(&self) -> &'static str {
        "tmdb"
    }
}
