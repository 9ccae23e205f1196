pub mod favorites;
pub mod movie_detail;
pub mod providers;
pub mod single_flight;

pub use favorites::{FavoritesError, FavoritesStore, LoadOutcome, LoadedFavorites};
pub use movie_detail::{DetailDisplay, MovieDetail, MovieDetailService};
pub use providers::{CatalogProvider, TmdbProvider};
