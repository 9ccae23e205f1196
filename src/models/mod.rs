mod favorite;
mod movie;

pub use favorite::{FavoriteFlag, FavoriteState, FavoritesCollection};
pub use movie::{
    format_popularity, format_runtime, release_year, share_message, trailer_url, CastMember,
    MovieCredits, MovieId, MovieList, MovieSummary,
};
