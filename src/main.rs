use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use marquee_api::{
    config::{Config, StorageBackend},
    db::{create_redis_client, KeyValueStore, MemoryStore, RedisStore},
    routes::{create_router, AppState},
    services::{FavoritesStore, MovieDetailService, TmdbProvider},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env()?;

    let storage: Arc<dyn KeyValueStore> = match config.storage_backend {
        StorageBackend::Redis => {
            Arc::new(RedisStore::new(create_redis_client(&config.redis_url)?))
        }
        StorageBackend::Memory => {
            tracing::warn!("Using in-memory storage, saved movies will not survive a restart");
            Arc::new(MemoryStore::new())
        }
    };
    tracing::info!(backend = storage.name(), "Favorites storage ready");

    let favorites = FavoritesStore::new(storage);
    let catalog = Arc::new(TmdbProvider::new(
        config.tmdb_api_key.clone(),
        config.tmdb_api_url.clone(),
    ));
    let details = MovieDetailService::new(catalog, favorites.clone(), config.tmdb_image_url.clone());

    let app = create_router(Arc::new(AppState::new(favorites, details)));

    let listener = tokio::net::TcpListener::bind(config.bind_addr()).await?;
    tracing::info!(addr = %config.bind_addr(), "Server running");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
