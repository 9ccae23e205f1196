//! Favorites persistence
//!
//! The saved-movies list lives in one key-value slot as a JSON array. Every
//! operation reads the whole array, and a toggle writes the whole array back.
//! The backing store has no compare-and-swap, so all cycles on the slot are
//! serialized through a per-key lock. A toggle names the state it flips
//! away from, so concurrent toggles of the same movie land as one transition.

use std::sync::Arc;

use crate::{
    db::{KeyLocks, KeyValueStore, StorageKey},
    models::{FavoriteState, FavoritesCollection, MovieId, MovieSummary},
    services::single_flight::SingleFlight,
};

/// Failures of the favorites workflow
///
/// None of these reach the HTTP layer as an error status; they describe why a
/// read degraded to an empty list or why a toggle did not happen.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FavoritesError {
    #[error("saved movies could not be read: {0}")]
    StorageRead(String),

    #[error("saved movies could not be written for movie {id}: {reason}")]
    StorageWrite {
        id: MovieId,
        /// Membership before the attempted toggle, which is still the stored truth
        favorite: bool,
        reason: String,
    },

    #[error("movie {0} cannot be saved without its full record")]
    MissingRecord(MovieId),

    #[error("record for movie {found} does not match requested movie {expected}")]
    RecordMismatch { expected: MovieId, found: MovieId },

    #[error("toggle for movie {0} was interrupted")]
    Interrupted(MovieId),
}

impl FavoritesError {
    /// Stored membership when the failure is known to have left it untouched
    pub fn previous_state(&self) -> Option<bool> {
        match self {
            FavoritesError::StorageWrite { favorite, .. } => Some(*favorite),
            // Adds are only attempted when the movie is not saved
            FavoritesError::MissingRecord(_) | FavoritesError::RecordMismatch { .. } => {
                Some(false)
            }
            FavoritesError::StorageRead(_) | FavoritesError::Interrupted(_) => None,
        }
    }
}

/// How the stored collection was obtained
#[derive(Debug, Clone, PartialEq)]
pub enum LoadOutcome {
    /// The slot held a valid collection
    Stored,
    /// The slot was never written (or holds an empty string)
    Absent,
    /// The slot could not be read or parsed; the collection is empty
    Failed(FavoritesError),
}

/// A collection read from storage
#[derive(Debug, Clone)]
pub struct LoadedFavorites {
    pub collection: FavoritesCollection,
    pub outcome: LoadOutcome,
}

impl LoadedFavorites {
    pub fn read_failure(&self) -> Option<&FavoritesError> {
        match &self.outcome {
            LoadOutcome::Failed(e) => Some(e),
            _ => None,
        }
    }
}

#[derive(Clone)]
pub struct FavoritesStore {
    storage: Arc<dyn KeyValueStore>,
    key: StorageKey,
    locks: KeyLocks,
    toggles: SingleFlight<(MovieId, bool), Result<bool, FavoritesError>>,
}

impl FavoritesStore {
    pub fn new(storage: Arc<dyn KeyValueStore>) -> Self {
        Self {
            storage,
            key: StorageKey::SavedMovies,
            locks: KeyLocks::new(),
            toggles: SingleFlight::new(),
        }
    }

    /// Reads the full collection, reporting why it may be empty
    pub async fn load(&self) -> LoadedFavorites {
        let _guard = self.locks.acquire(&self.key.to_string()).await;
        self.read_collection().await
    }

    /// The saved movies in insertion order; empty when unreadable
    pub async fn list(&self) -> FavoritesCollection {
        self.load().await.collection
    }

    pub async fn is_favorite(&self, id: &MovieId) -> bool {
        self.load().await.collection.contains(id)
    }

    /// Membership read used when a detail view for `id` is first shown
    pub async fn load_initial_favorite_state(&self, id: &MovieId) -> bool {
        let favorite = self.is_favorite(id).await;
        tracing::debug!(movie_id = %id, favorite, "Initial favorite state loaded");
        favorite
    }

    /// Flips membership of `id` away from `seen` and returns the persisted state
    ///
    /// `seen` is the state the caller's flag showed when the toggle was
    /// requested, so the target is always its negation. When storage already
    /// holds the target, nothing is written and the target is returned: two
    /// toggles issued from the same state make one transition, however their
    /// execution interleaves. A caller that feeds each result back into its
    /// flag gets a flip per call.
    ///
    /// `record` is only used when the movie is being added and must carry the
    /// same id. The read-modify-write runs on a spawned task: if the caller is
    /// dropped, the write still completes and the result is discarded.
    pub async fn toggle_favorite(
        &self,
        id: &MovieId,
        seen: FavoriteState,
        record: Option<MovieSummary>,
    ) -> Result<bool, FavoritesError> {
        let store = self.clone();
        let target = id.clone();
        let favorite = !seen.is_favorite();

        self.toggles
            .run((id.clone(), favorite), async move {
                store.toggle_serialized(target, favorite, record).await
            })
            .await
            .unwrap_or_else(|_| {
                tracing::error!(movie_id = %id, "Favorite toggle task aborted");
                Err(FavoritesError::Interrupted(id.clone()))
            })
    }

    async fn toggle_serialized(
        &self,
        id: MovieId,
        favorite: bool,
        record: Option<MovieSummary>,
    ) -> Result<bool, FavoritesError> {
        let _guard = self.locks.acquire(&self.key.to_string()).await;

        let mut collection = self.read_collection().await.collection;
        let was_favorite = collection.contains(&id);

        if was_favorite == favorite {
            tracing::debug!(movie_id = %id, favorite, "Favorite already in requested state");
            return Ok(favorite);
        }

        if was_favorite {
            collection.remove(&id);
        } else {
            let record = match record {
                Some(record) if record.id == id => record,
                Some(record) => {
                    return Err(FavoritesError::RecordMismatch {
                        expected: id,
                        found: record.id,
                    })
                }
                None => return Err(FavoritesError::MissingRecord(id)),
            };
            collection.insert(record);
        }

        if let Err(reason) = self.write_collection(&collection).await {
            tracing::error!(
                movie_id = %id,
                error = %reason,
                backend = self.storage.name(),
                "Failed to persist saved movies, favorite state unchanged"
            );
            return Err(FavoritesError::StorageWrite {
                id,
                favorite: was_favorite,
                reason,
            });
        }

        tracing::info!(
            movie_id = %id,
            favorite,
            saved = collection.len(),
            "Favorite toggled"
        );

        Ok(favorite)
    }

    /// Caller must hold the key lock
    async fn read_collection(&self) -> LoadedFavorites {
        let raw = match self.storage.get(&self.key.to_string()).await {
            Ok(raw) => raw,
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    backend = self.storage.name(),
                    "Failed to read saved movies, treating as empty"
                );
                return LoadedFavorites {
                    collection: FavoritesCollection::new(),
                    outcome: LoadOutcome::Failed(FavoritesError::StorageRead(e.to_string())),
                };
            }
        };

        let Some(json) = raw.filter(|json| !json.is_empty()) else {
            return LoadedFavorites {
                collection: FavoritesCollection::new(),
                outcome: LoadOutcome::Absent,
            };
        };

        match serde_json::from_str::<FavoritesCollection>(&json) {
            Ok(collection) => LoadedFavorites {
                collection,
                outcome: LoadOutcome::Stored,
            },
            Err(e) => {
                tracing::warn!(error = %e, "Saved movies are not a valid collection, treating as empty");
                LoadedFavorites {
                    collection: FavoritesCollection::new(),
                    outcome: LoadOutcome::Failed(FavoritesError::StorageRead(format!(
                        "unparseable collection: {}",
                        e
                    ))),
                }
            }
        }
    }

    /// Caller must hold the key lock
    async fn write_collection(&self, collection: &FavoritesCollection) -> Result<(), String> {
        let json = serde_json::to_string(collection).map_err(|e| e.to_string())?;
        self.storage
            .set(&self.key.to_string(), json)
            .await
            .map_err(|e| e.to_string())
    }
}
