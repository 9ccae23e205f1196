use serde::{Deserialize, Serialize};

use super::{MovieId, MovieSummary};

/// The saved-movies list, stored as one JSON array
///
/// Holds at most one record per id and keeps insertion order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FavoritesCollection {
    movies: Vec<MovieSummary>,
}

impl FavoritesCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, id: &MovieId) -> bool {
        self.movies.iter().any(|movie| &movie.id == id)
    }

    /// Appends a record unless one with the same id is already present
    ///
    /// Returns `true` if the record was added.
    pub fn insert(&mut self, movie: MovieSummary) -> bool {
        if self.contains(&movie.id) {
            return false;
        }
        self.movies.push(movie);
        true
    }

    /// Removes every record with the given id, returning how many were dropped
    pub fn remove(&mut self, id: &MovieId) -> usize {
        let before = self.movies.len();
        self.movies.retain(|movie| &movie.id != id);
        before - self.movies.len()
    }

    #[cfg(test)]
    pub fn get(&self, id: &MovieId) -> Option<&MovieSummary> {
        self.movies.iter().find(|movie| &movie.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &MovieSummary> {
        self.movies.iter()
    }

    pub fn len(&self) -> usize {
        self.movies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.movies.is_empty()
    }
}

impl From<Vec<MovieSummary>> for FavoritesCollection {
    fn from(movies: Vec<MovieSummary>) -> Self {
        let mut collection = Self::new();
        for movie in movies {
            collection.insert(movie);
        }
        collection
    }
}

/// Favorite state of one movie as shown to the user
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FavoriteState {
    #[default]
    NotFavorite,
    Favorite,
}

impl FavoriteState {
    pub fn is_favorite(self) -> bool {
        self == FavoriteState::Favorite
    }
}

impl From<bool> for FavoriteState {
    fn from(favorite: bool) -> Self {
        if favorite {
            FavoriteState::Favorite
        } else {
            FavoriteState::NotFavorite
        }
    }
}

/// Caller-side favorite flag for a movie detail view
///
/// Starts as `NotFavorite` and unconfirmed. It only moves when storage
/// reports a value: the initial resync, or a toggle that was persisted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct FavoriteFlag {
    pub state: FavoriteState,
    /// Whether the state has been read back from storage at least once
    pub confirmed: bool,
}

impl FavoriteFlag {
    pub fn pending() -> Self {
        Self::default()
    }

    pub fn is_favorite(&self) -> bool {
        self.state.is_favorite()
    }

    /// Applies the stored membership read when the view is first shown
    pub fn resync(&mut self, persisted: bool) {
        self.state = persisted.into();
        self.confirmed = true;
    }

    /// Applies the outcome of a toggle; failed toggles leave the flag as is
    ///
    /// Returns whether the flag changed.
    pub fn apply_toggle<E>(&mut self, outcome: &Result<bool, E>) -> bool {
        match outcome {
            Ok(now_favorite) => {
                let next = FavoriteState::from(*now_favorite);
                let changed = next != self.state;
                self.state = next;
                self.confirmed = true;
                changed
            }
            Err(_) => false,
        }
    }
}
