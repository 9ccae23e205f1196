use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt::Display;

const YOUTUBE_WATCH_URL: &str = "https://www.youtube.com/watch?v=";

/// Identifier of a catalog movie
///
/// Catalog ids are JSON integers, but stored records may carry strings.
/// Comparison is strict: `42` and `"42"` are different movies.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MovieId {
    Number(i64),
    Text(String),
}

impl MovieId {
    /// Parses an id from a path segment; all-digit segments become numbers
    pub fn parse(raw: &str) -> Self {
        raw.parse::<i64>()
            .map(MovieId::Number)
            .unwrap_or_else(|_| MovieId::Text(raw.to_string()))
    }
}

impl Display for MovieId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MovieId::Number(id) => write!(f, "{}", id),
            MovieId::Text(id) => write!(f, "{}", id),
        }
    }
}

/// A movie record as returned by the catalog
///
/// Only `id` is interpreted. Every other field is kept verbatim so a saved
/// record serializes back exactly as it was fetched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieSummary {
    pub id: MovieId,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl MovieSummary {
    /// Bare record for a numeric catalog id
    pub fn new(id: i64) -> Self {
        Self {
            id: MovieId::Number(id),
            fields: Map::new(),
        }
    }

    /// Builder-style helper for attaching a pass-through field
    pub fn with_field(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.fields.insert(key.to_string(), value.into());
        self
    }

    pub fn title(&self) -> Option<&str> {
        self.fields.get("title").and_then(Value::as_str)
    }

    pub fn overview(&self) -> Option<&str> {
        self.fields.get("overview").and_then(Value::as_str)
    }

    pub fn poster_path(&self) -> Option<&str> {
        self.fields.get("poster_path").and_then(Value::as_str)
    }

    pub fn homepage(&self) -> Option<&str> {
        self.fields.get("homepage").and_then(Value::as_str)
    }

    pub fn runtime(&self) -> Option<u64> {
        self.fields.get("runtime").and_then(Value::as_u64)
    }

    pub fn popularity(&self) -> Option<f64> {
        self.fields.get("popularity").and_then(Value::as_f64)
    }

    pub fn release_date(&self) -> Option<&str> {
        self.fields.get("release_date").and_then(Value::as_str)
    }

    /// Genre names in catalog order
    pub fn genre_names(&self) -> Vec<String> {
        self.fields
            .get("genres")
            .and_then(Value::as_array)
            .map(|genres| {
                genres
                    .iter()
                    .filter_map(|g| g.get("name").and_then(Value::as_str))
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Key of the first attached video, if the record was fetched with videos
    pub fn first_video_key(&self) -> Option<&str> {
        self.fields
            .get("videos")
            .and_then(|v| v.get("results"))
            .and_then(Value::as_array)
            .and_then(|results| results.first())
            .and_then(|video| video.get("key"))
            .and_then(Value::as_str)
    }
}

/// A cast member from the credits endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CastMember {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub character: Option<String>,
    #[serde(default)]
    pub profile_path: Option<String>,
}

/// Credits response for a movie
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MovieCredits {
    #[serde(default)]
    pub cast: Vec<CastMember>,
}

/// Paged list response (similar movies)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MovieList {
    #[serde(default)]
    pub results: Vec<MovieSummary>,
}

// ============================================================================
// Display formatting
// ============================================================================

/// Formats a runtime in minutes as `"45min"`, `"2h"` or `"2h 15mins"`
pub fn format_runtime(runtime: u64) -> String {
    let hours = runtime / 60;
    let minutes = runtime % 60;

    if hours == 0 {
        format!("{}min", minutes)
    } else if minutes == 0 {
        format!("{}h", hours)
    } else {
        format!("{}h {}mins", hours, minutes)
    }
}

/// Scales a catalog popularity score to the percentage shown on the detail view
pub fn format_popularity(popularity: f64) -> String {
    let percentage = (popularity / 1000.0) * 170.0;
    format!("{} %", percentage.round() as i64)
}

/// Year part of a `YYYY-MM-DD` release date, `"N/A"` when unknown
pub fn release_year(release_date: Option<&str>) -> String {
    let Some(date) = release_date.filter(|d| !d.is_empty()) else {
        return "N/A".to_string();
    };

    match NaiveDate::parse_from_str(date, "%Y-%m-%d") {
        Ok(parsed) => parsed.year().to_string(),
        Err(_) => date
            .split('-')
            .next()
            .filter(|year| !year.is_empty())
            .unwrap_or("N/A")
            .to_string(),
    }
}

pub fn trailer_url(video_key: &str) -> String {
    format!("{}{}", YOUTUBE_WATCH_URL, video_key)
}

/// Text handed to the platform share sheet
pub fn share_message(movie: &MovieSummary) -> String {
    format!(
        "{}\n\n{}",
        movie.title().unwrap_or_default(),
        movie.homepage().unwrap_or_default()
    )
}
