// src/models/movie.rs

use mongodb::bson::{self, Bson, Document, oid::ObjectId};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::error::AppError;
use crate::models::comment::CommentSummary;
use crate::utils::coerce::{lenient_f64, lenient_i32, lenient_i64};

pub const DEFAULT_PAGE_SIZE: u64 = 10;
pub const MAX_PAGE_SIZE: u64 = 100;

/// Maximum number of movies a title search returns.
pub const SEARCH_LIMIT: u64 = 20;

/// Keys the server always sets itself on insert.
const SERVER_ASSIGNED: [&str; 2] = ["_id", "lastupdated"];

/// Represents a document in the 'movies' collection.
///
/// Every field except `_id` is optional on read, so projected documents
/// (list and search results) decode into the same type. Fields without a
/// typed counterpart are kept in `extra` and written back unchanged.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Movie {
    #[serde(rename = "_id")]
    pub id: ObjectId,

    #[serde(default)]
    pub title: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plot: Option<String>,

    #[serde(default, deserialize_with = "lenient_i32", skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,

    /// Minutes.
    #[serde(default, deserialize_with = "lenient_i32", skip_serializing_if = "Option::is_none")]
    pub runtime: Option<i32>,

    #[serde(default)]
    pub directors: ListValue,

    #[serde(default)]
    pub cast: ListValue,

    #[serde(default)]
    pub genres: ListValue,

    /// URL to the poster image.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub poster: Option<String>,

    #[serde(default)]
    pub imdb: Imdb,

    /// Native BSON date for movies written here; older datasets store a string.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lastupdated: Option<Bson>,

    #[serde(flatten)]
    pub extra: Document,
}

/// A `directors`, `cast` or `genres` value. Lists of strings are typed;
/// anything else is stored and returned unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ListValue {
    Items(Vec<String>),
    Raw(Bson),
}

impl Default for ListValue {
    fn default() -> Self {
        ListValue::Items(Vec::new())
    }
}

impl From<Vec<String>> for ListValue {
    fn from(items: Vec<String>) -> Self {
        ListValue::Items(items)
    }
}

impl ListValue {
    /// The string items; empty for a non-list value.
    pub fn items(&self) -> &[String] {
        match self {
            ListValue::Items(items) => items,
            ListValue::Raw(_) => &[],
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            ListValue::Items(items) => items.is_empty(),
            ListValue::Raw(Bson::Null) => true,
            ListValue::Raw(_) => false,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Imdb {
    #[serde(default, deserialize_with = "lenient_f64", skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,

    #[serde(default, deserialize_with = "lenient_i64", skip_serializing_if = "Option::is_none")]
    pub votes: Option<i64>,
}

impl Movie {
    /// Builds the document to insert. The identifier and timestamp are
    /// always assigned here; anything the client sent for them is dropped.
    /// Untyped fields are carried over as they were sent.
    pub fn from_request(req: NewMovieRequest) -> Result<Self, AppError> {
        let rating = req.imdb.and_then(|i| i.rating).unwrap_or(0.0);

        let mut extra = bson::to_document(&req.extra)
            .map_err(|e| AppError::BadRequest(format!("Unsupported field value: {}", e)))?;
        for key in SERVER_ASSIGNED {
            extra.remove(key);
        }

        Ok(Self {
            id: ObjectId::new(),
            title: req.title.unwrap_or_default(),
            plot: req.plot,
            year: req.year,
            runtime: req.runtime,
            directors: req.directors,
            cast: req.cast,
            genres: req.genres,
            poster: req.poster,
            imdb: Imdb {
                rating: Some(rating),
                votes: None,
            },
            lastupdated: Some(Bson::DateTime(bson::DateTime::now())),
            extra,
        })
    }

    /// Case-insensitive substring match on the title.
    pub fn title_contains(&self, query: &str) -> bool {
        self.title.to_lowercase().contains(&query.to_lowercase())
    }

    fn lastupdated_text(&self) -> Option<String> {
        match self.lastupdated.as_ref()? {
            Bson::DateTime(dt) => dt.try_to_rfc3339_string().ok(),
            Bson::String(s) => Some(s.clone()),
            _ => None,
        }
    }
}

/// DTO for list and search results: the reduced field set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct MovieSummary {
    #[serde(rename = "_id")]
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plot: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub poster: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
}

impl From<Movie> for MovieSummary {
    fn from(movie: Movie) -> Self {
        Self {
            id: movie.id.to_hex(),
            title: movie.title,
            plot: movie.plot,
            poster: movie.poster,
            year: movie.year,
        }
    }
}

/// DTO for one page of the catalog.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MoviePage {
    pub movies: Vec<MovieSummary>,
    pub total_movies: u64,
    pub total_pages: u64,
    pub current_page: u64,
}

/// DTO for the details view: the full record plus its comments.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MovieDetails {
    #[serde(rename = "_id")]
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plot: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub runtime: Option<i32>,
    #[serde(default)]
    #[schema(value_type = Vec<String>)]
    pub directors: ListValue,
    #[serde(default)]
    #[schema(value_type = Vec<String>)]
    pub cast: ListValue,
    #[serde(default)]
    #[schema(value_type = Vec<String>)]
    pub genres: ListValue,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub poster: Option<String>,
    #[serde(default)]
    pub imdb: Imdb,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lastupdated: Option<String>,
    #[serde(default)]
    pub comments: Vec<CommentSummary>,
    /// Every other stored field, as relaxed extended JSON.
    #[serde(flatten)]
    #[schema(ignore)]
    pub extra: Map<String, Value>,
}

impl MovieDetails {
    pub fn new(movie: Movie, comments: Vec<CommentSummary>) -> Self {
        let lastupdated = movie.lastupdated_text();
        let mut extra = match Bson::Document(movie.extra).into_relaxed_extjson() {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        extra.remove("comments");

        Self {
            id: movie.id.to_hex(),
            title: movie.title,
            plot: movie.plot,
            year: movie.year,
            runtime: movie.runtime,
            directors: movie.directors,
            cast: movie.cast,
            genres: movie.genres,
            poster: movie.poster,
            imdb: movie.imdb,
            lastupdated,
            comments,
            extra,
        }
    }
}

/// DTO for creating a new movie.
///
/// Only the title is required. Numeric fields accept strings and are
/// coerced; unparseable values become absent. Any other field is kept.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct NewMovieRequest {
    #[validate(
        required(message = "Title is required"),
        length(min = 1, message = "Title is required")
    )]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plot: Option<String>,

    #[serde(default, deserialize_with = "lenient_i32", skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,

    #[serde(default, deserialize_with = "lenient_i32", skip_serializing_if = "Option::is_none")]
    pub runtime: Option<i32>,

    #[serde(default)]
    #[schema(value_type = Vec<String>)]
    pub directors: ListValue,

    #[serde(default)]
    #[schema(value_type = Vec<String>)]
    pub cast: ListValue,

    #[serde(default)]
    #[schema(value_type = Vec<String>)]
    pub genres: ListValue,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub poster: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub imdb: Option<ImdbInput>,

    #[serde(flatten)]
    #[schema(ignore)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ImdbInput {
    #[serde(default, deserialize_with = "lenient_f64", skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
}

/// Response for a successful insert.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InsertedMovie {
    pub success: bool,
    pub inserted_id: String,
}

/// Query parameters for listing movies.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListParams {
    /// 1-based page number (default: 1).
    pub page: Option<i64>,

    /// Number of movies per page (default: 10, max: 100).
    pub limit: Option<i64>,
}

/// Resolved offset window for one page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    pub page: u64,
    pub limit: u64,
}

impl ListParams {
    pub fn window(&self) -> PageWindow {
        let page = self.page.unwrap_or(1).max(1) as u64;
        let limit = self
            .limit
            .unwrap_or(DEFAULT_PAGE_SIZE as i64)
            .clamp(1, MAX_PAGE_SIZE as i64) as u64;
        PageWindow { page, limit }
    }
}

impl PageWindow {
    pub fn skip(&self) -> u64 {
        // The driver sends skip as a signed 64-bit value
        (self.page - 1)
            .saturating_mul(self.limit)
            .min(i64::MAX as u64)
    }

    pub fn total_pages(&self, total: u64) -> u64 {
        total.div_ceil(self.limit)
    }
}

/// Query parameters for the details view.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct MovieIdParams {
    /// 24-character hexadecimal movie identifier.
    pub id: Option<String>,
}

/// Query parameters for title search.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SearchParams {
    /// Text to look for in titles, case-insensitive.
    pub query: Option<String>,
}
