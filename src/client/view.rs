//! State behind the catalog screens.
//!
//! Each transition returns a new value built from what the server sent
//! back; nothing is edited in place.

use chrono::Utc;
use mongodb::bson::Bson;

use crate::client::{CatalogClient, Result};
use crate::models::{
    MutationResult,
    comment::{AddCommentRequest, CommentSummary},
    movie::{ListValue, MovieDetails, MoviePage, MovieSummary},
};

/// Image shown when a movie has no usable poster.
pub const PLACEHOLDER_POSTER: &str = "/images/image.png";

pub fn is_valid_image_url(url: Option<&str>) -> bool {
    url.is_some_and(|u| !u.trim().is_empty())
}

/// The poster URL, or `placeholder` when it is missing or blank.
pub fn poster_or<'a>(poster: Option<&'a str>, placeholder: &'a str) -> &'a str {
    match poster {
        Some(url) if is_valid_image_url(Some(url)) => url,
        _ => placeholder,
    }
}

/// Comma-joined list for display, "N/A" when empty.
pub fn join_or_na(items: &[String]) -> String {
    if items.is_empty() {
        "N/A".to_string()
    } else {
        items.join(", ")
    }
}

/// Display text for a directors, cast or genres field. Values that are
/// not a list are shown as stored.
pub fn list_text(value: &ListValue) -> String {
    match value {
        ListValue::Items(items) => join_or_na(items),
        ListValue::Raw(Bson::Null) => "N/A".to_string(),
        ListValue::Raw(Bson::String(s)) => s.clone(),
        ListValue::Raw(other) => other.to_string(),
    }
}

/// The movie grid: either a page of the catalog or search results.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BrowseState {
    pub movies: Vec<MovieSummary>,
    /// Active search text, `None` while browsing pages.
    pub search: Option<String>,
    pub current_page: u64,
    pub total_pages: u64,
}

impl BrowseState {
    pub fn from_page(page: MoviePage) -> Self {
        Self {
            movies: page.movies,
            search: None,
            current_page: page.current_page,
            total_pages: page.total_pages,
        }
    }

    pub fn from_search(query: &str, movies: Vec<MovieSummary>) -> Self {
        Self {
            movies,
            search: Some(query.to_string()),
            current_page: 1,
            total_pages: 1,
        }
    }

    pub fn is_search_active(&self) -> bool {
        self.search.is_some()
    }

    pub async fn load(client: &CatalogClient, page: u64, limit: u64) -> Result<Self> {
        Ok(Self::from_page(client.get_movies(page, limit).await?))
    }

    /// Runs a title search. Blank input leaves the state as it is.
    pub async fn search(&self, client: &CatalogClient, raw_query: &str) -> Result<Self> {
        let query = raw_query.trim();
        if query.is_empty() {
            return Ok(self.clone());
        }
        let movies = client.search_movies(query).await?;
        Ok(Self::from_search(query, movies))
    }

    /// Drops the search and goes back to the first page.
    pub async fn clear_search(&self, client: &CatalogClient, limit: u64) -> Result<Self> {
        Self::load(client, 1, limit).await
    }
}

/// The movie details dialog.
#[derive(Debug, Clone)]
pub struct MovieDetailsView {
    pub movie: MovieDetails,
}

impl MovieDetailsView {
    pub async fn open(client: &CatalogClient, movie_id: &str) -> Result<Self> {
        Ok(Self {
            movie: client.get_movie(movie_id).await?,
        })
    }

    /// Re-reads the movie and its comments from the server.
    pub async fn refresh(&self, client: &CatalogClient) -> Result<Self> {
        Self::open(client, &self.movie.id).await
    }

    pub fn comments(&self) -> &[CommentSummary] {
        &self.movie.comments
    }

    /// Posts a comment and appends the stored version.
    pub async fn post_comment(
        &self,
        client: &CatalogClient,
        name: &str,
        email: &str,
        text: &str,
    ) -> Result<Self> {
        let request = AddCommentRequest {
            movie_id: self.movie.id.clone(),
            name: name.to_string(),
            email: email.to_string(),
            text: text.to_string(),
        };
        let record = client.add_comment(&request).await?;
        Ok(self.with_comment_added(CommentSummary::from(&record)))
    }

    pub async fn edit_comment(&self, client: &CatalogClient, comment_id: &str, text: &str) -> Result<Self> {
        let result = client.update_comment(comment_id, text).await?;
        Ok(self.with_comment_updated(comment_id, text, result))
    }

    pub async fn remove_comment(&self, client: &CatalogClient, comment_id: &str) -> Result<Self> {
        client.delete_comment(comment_id).await?;
        Ok(self.without_comment(comment_id))
    }

    pub fn with_comment_added(&self, comment: CommentSummary) -> Self {
        let comments = self
            .movie
            .comments
            .iter()
            .cloned()
            .chain(std::iter::once(comment))
            .collect();
        self.with_comments(comments)
    }

    /// Applies an update the server accepted. If the server matched no
    /// comment, the stale entry is dropped instead.
    pub fn with_comment_updated(&self, comment_id: &str, text: &str, result: MutationResult) -> Self {
        if !result.matched {
            return self.without_comment(comment_id);
        }

        let today = Utc::now().format("%m/%d/%Y").to_string();
        let comments = self
            .movie
            .comments
            .iter()
            .map(|c| {
                if c.id == comment_id {
                    CommentSummary {
                        id: c.id.clone(),
                        text: text.to_string(),
                        date: today.clone(),
                    }
                } else {
                    c.clone()
                }
            })
            .collect();
        self.with_comments(comments)
    }

    pub fn without_comment(&self, comment_id: &str) -> Self {
        let comments = self
            .movie
            .comments
            .iter()
            .filter(|c| c.id != comment_id)
            .cloned()
            .collect();
        self.with_comments(comments)
    }

    fn with_comments(&self, comments: Vec<CommentSummary>) -> Self {
        Self {
            movie: MovieDetails {
                comments,
                ..self.movie.clone()
            },
        }
    }
}
