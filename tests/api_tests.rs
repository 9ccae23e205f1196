use std::future::IntoFuture;
use std::sync::Arc;
use std::time::Duration;

use axum::http::StatusCode;
use axum_test::TestServer;
use serde_json::{json, Value};

use marquee_api::{
    db::{KeyValueStore, MemoryStore},
    error::{AppError, AppResult},
    models::{CastMember, MovieId, MovieSummary},
    routes::{create_router, AppState},
    services::{CatalogProvider, FavoritesStore, MovieDetailService},
};

/// Catalog that knows a single movie
struct StubCatalog;

#[async_trait::async_trait]
impl CatalogProvider for StubCatalog {
    async fn fetch_movie_details(&self, id: &MovieId) -> AppResult<MovieSummary> {
        if *id != MovieId::Number(603) {
            return Err(AppError::NotFound(format!("movie {}", id)));
        }
        Ok(serde_json::from_value(json!({
            "id": 603,
            "title": "The Matrix",
            "runtime": 136,
            "release_date": "1999-03-30",
            "popularity": 100.0,
            "poster_path": "/matrix.jpg"
        }))
        .unwrap())
    }

    async fn fetch_movie_credits(&self, _id: &MovieId) -> AppResult<Vec<CastMember>> {
        Ok(vec![CastMember {
            id: 6384,
            name: "Keanu Reeves".to_string(),
            character: Some("Neo".to_string()),
            profile_path: None,
        }])
    }

    async fn fetch_similar_movies(&self, _id: &MovieId) -> AppResult<Vec<MovieSummary>> {
        Err(AppError::ExternalApi("similar endpoint down".to_string()))
    }

    fn name(&self) -> &'static str {
        "stub"
    }
}

/// Same catalog, but details take a while to arrive
struct SlowCatalog;

#[async_trait::async_trait]
impl CatalogProvider for SlowCatalog {
    async fn fetch_movie_details(&self, id: &MovieId) -> AppResult<MovieSummary> {
        tokio::time::sleep(Duration::from_millis(20)).await;
        StubCatalog.fetch_movie_details(id).await
    }

    async fn fetch_movie_credits(&self, id: &MovieId) -> AppResult<Vec<CastMember>> {
        StubCatalog.fetch_movie_credits(id).await
    }

    async fn fetch_similar_movies(&self, id: &MovieId) -> AppResult<Vec<MovieSummary>> {
        StubCatalog.fetch_similar_movies(id).await
    }

    fn name(&self) -> &'static str {
        "slow-stub"
    }
}

/// Reads from the wrapped store; rejects every write
struct ReadOnlyStore(MemoryStore);

#[async_trait::async_trait]
impl KeyValueStore for ReadOnlyStore {
    async fn get(&self, key: &str) -> AppResult<Option<String>> {
        self.0.get(key).await
    }

    async fn set(&self, _key: &str, _value: String) -> AppResult<()> {
        Err(AppError::StorageUnavailable("quota exceeded".to_string()))
    }

    fn name(&self) -> &'static str {
        "read-only"
    }
}

fn create_test_server_with(storage: Arc<dyn KeyValueStore>) -> TestServer {
    create_test_server_with_catalog(storage, Arc::new(StubCatalog))
}

fn create_test_server_with_catalog(
    storage: Arc<dyn KeyValueStore>,
    catalog: Arc<dyn CatalogProvider>,
) -> TestServer {
    let favorites = FavoritesStore::new(storage);
    let details = MovieDetailService::new(
        catalog,
        favorites.clone(),
        "https://image.tmdb.org/t/p/w500".to_string(),
    );
    let app = create_router(Arc::new(AppState::new(favorites, details)));
    TestServer::new(app).unwrap()
}

fn create_test_server(storage: MemoryStore) -> TestServer {
    create_test_server_with(Arc::new(storage))
}

async fn stored(storage: &MemoryStore) -> Option<Value> {
    storage
        .get("savedMovies")
        .await
        .unwrap()
        .map(|raw| serde_json::from_str(&raw).unwrap())
}

#[tokio::test]
async fn test_health_check() {
    let server = create_test_server(MemoryStore::new());
    let response = server.get("/health").await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn test_request_id_is_echoed() {
    let server = create_test_server(MemoryStore::new());
    let response = server
        .get("/health")
        .add_header(
            "x-request-id".parse::<axum::http::HeaderName>().unwrap(),
            "client-trace-1".parse::<axum::http::HeaderValue>().unwrap(),
        )
        .await;
    assert_eq!(response.header("x-request-id"), "client-trace-1");
}

#[tokio::test]
async fn test_toggle_with_record_adds_then_removes() {
    let storage = MemoryStore::new();
    let server = create_test_server(storage.clone());

    let response = server
        .post("/api/v1/favorites/42/toggle")
        .json(&json!({"id": 42, "title": "X"}))
        .await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body, json!({"id": 42, "favorite": true, "persisted": true}));
    assert_eq!(stored(&storage).await, Some(json!([{"id": 42, "title": "X"}])));

    let status: Value = server.get("/api/v1/favorites/42").await.json();
    assert_eq!(status["favorite"], true);

    let response = server.post("/api/v1/favorites/42/toggle").await;
    let body: Value = response.json();
    assert_eq!(body["favorite"], false);
    assert_eq!(body["persisted"], true);
    assert_eq!(stored(&storage).await, Some(json!([])));
}

#[tokio::test]
async fn test_toggle_without_record_saves_catalog_details() {
    let storage = MemoryStore::new();
    let server = create_test_server(storage.clone());

    let body: Value = server.post("/api/v1/favorites/603/toggle").await.json();
    assert_eq!(body["favorite"], true);
    assert_eq!(body["persisted"], true);

    let saved: Vec<Value> = server.get("/api/v1/favorites").await.json();
    assert_eq!(saved.len(), 1);
    assert_eq!(saved[0]["id"], 603);
    assert_eq!(saved[0]["title"], "The Matrix");
}

#[tokio::test]
async fn test_toggle_unknown_movie_without_record_changes_nothing() {
    let storage = MemoryStore::new();
    let server = create_test_server(storage.clone());

    let response = server.post("/api/v1/favorites/999/toggle").await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["favorite"], false);
    assert_eq!(body["persisted"], false);
    assert!(body["reason"].as_str().unwrap().contains("full record"));
    assert_eq!(stored(&storage).await, None);
}

#[tokio::test]
async fn test_toggle_rejects_malformed_record() {
    let server = create_test_server(MemoryStore::new());
    let response = server
        .post("/api/v1/favorites/42/toggle")
        .json(&json!({"title": "missing id"}))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_failed_write_reports_stored_truth() {
    let storage = MemoryStore::with_entry("savedMovies", r#"[{"id":42,"title":"X"}]"#);
    let server = create_test_server_with(Arc::new(ReadOnlyStore(storage.clone())));

    let response = server.post("/api/v1/favorites/42/toggle").await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["favorite"], true);
    assert_eq!(body["persisted"], false);
    assert_eq!(stored(&storage).await, Some(json!([{"id": 42, "title": "X"}])));
}

#[tokio::test]
async fn test_corrupt_storage_lists_empty() {
    let server = create_test_server(MemoryStore::with_entry("savedMovies", "not json"));

    let saved: Vec<Value> = server.get("/api/v1/favorites").await.json();
    assert!(saved.is_empty());

    let status: Value = server.get("/api/v1/favorites/42").await.json();
    assert_eq!(status, json!({"id": 42, "favorite": false}));
}

#[tokio::test]
async fn test_movie_detail_includes_initial_favorite_state() {
    let storage = MemoryStore::with_entry("savedMovies", r#"[{"id":603,"title":"The Matrix"}]"#);
    let server = create_test_server(storage);

    let response = server.get("/api/v1/movies/603").await;
    response.assert_status_ok();
    let detail: Value = response.json();

    assert_eq!(detail["id"], 603);
    assert_eq!(detail["favorite"]["state"], "favorite");
    assert_eq!(detail["favorite"]["confirmed"], true);
    assert_eq!(detail["display"]["runtime"], "2h 16mins");
    assert_eq!(detail["display"]["release_year"], "1999");
    assert_eq!(
        detail["display"]["poster_url"],
        "https://image.tmdb.org/t/p/w500/matrix.jpg"
    );
    assert_eq!(detail["cast"][0]["name"], "Keanu Reeves");
    assert_eq!(detail["similar"], json!([]));
}

#[tokio::test]
async fn test_movie_detail_for_unknown_movie_is_empty() {
    let server = create_test_server(MemoryStore::new());

    let detail: Value = server.get("/api/v1/movies/999").await.json();
    assert_eq!(detail["movie"], Value::Null);
    assert_eq!(detail["display"], Value::Null);
    assert_eq!(detail["cast"], json!([]));
    assert_eq!(detail["favorite"]["state"], "not_favorite");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_overlapping_toggles_from_same_state_add_once() {
    for _ in 0..50 {
        let storage = MemoryStore::new();
        let server = create_test_server(storage.clone());
        let record = json!({"id": 42, "title": "X"});

        let (first, second) = tokio::join!(
            server
                .post("/api/v1/favorites/42/toggle")
                .add_query_param("seen", "not_favorite")
                .json(&record)
                .into_future(),
            server
                .post("/api/v1/favorites/42/toggle")
                .add_query_param("seen", "not_favorite")
                .json(&record)
                .into_future(),
        );

        for response in [first, second] {
            let body: Value = response.json();
            assert_eq!(body["favorite"], true);
            assert_eq!(body["persisted"], true);
        }
        assert_eq!(stored(&storage).await, Some(json!([{"id": 42, "title": "X"}])));
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_double_tap_waiting_on_catalog_adds_once() {
    let storage = MemoryStore::new();
    let server = create_test_server_with_catalog(Arc::new(storage.clone()), Arc::new(SlowCatalog));

    let (first, second) = tokio::join!(
        server.post("/api/v1/favorites/603/toggle").into_future(),
        server.post("/api/v1/favorites/603/toggle").into_future(),
    );

    for response in [first, second] {
        let body: Value = response.json();
        assert_eq!(body["favorite"], true);
        assert_eq!(body["persisted"], true);
    }

    let saved = stored(&storage).await.unwrap();
    let saved = saved.as_array().unwrap();
    assert_eq!(saved.len(), 1);
    assert_eq!(saved[0]["id"], 603);
}

#[tokio::test]
async fn test_toggle_with_stale_seen_state_reports_stored_truth() {
    let storage = MemoryStore::with_entry("savedMovies", r#"[{"id":42,"title":"X"}]"#);
    let server = create_test_server(storage.clone());

    let body: Value = server
        .post("/api/v1/favorites/42/toggle")
        .add_query_param("seen", "not_favorite")
        .await
        .json();
    assert_eq!(body, json!({"id": 42, "favorite": true, "persisted": true}));
    assert_eq!(stored(&storage).await, Some(json!([{"id": 42, "title": "X"}])));
}
