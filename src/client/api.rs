//! HTTP gateway to the catalog API.

use std::time::Duration;

use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use tracing::{debug, error};
use url::Url;

use crate::client::error::{ClientError, Result};
use crate::models::{
    ErrorBody, MutationResult,
    comment::{AddCommentRequest, CommentCreated, CommentRecord, DeleteCommentRequest, UpdateCommentRequest},
    movie::{InsertedMovie, MovieDetails, MoviePage, MovieSummary, NewMovieRequest},
};

/// Client for the catalog endpoints.
///
/// Failures are logged with the action that failed and returned as
/// `ClientError`; server-side errors carry the server's own message, which
/// is safe to show to the user as-is.
///
/// # Example
///
/// ```ignore
/// let client = CatalogClient::new("http://localhost:3000")?;
/// let page = client.get_movies(1, 10).await?;
/// println!("{} movies over {} pages", page.total_movies, page.total_pages);
/// ```
#[derive(Debug, Clone)]
pub struct CatalogClient {
    http: Client,
    base_url: String,
}

impl CatalogClient {
    /// Create a client for the API served at `base_url`.
    pub fn new(base_url: &str) -> Result<Self> {
        // Parse and normalize URL
        let trimmed = base_url.trim().trim_end_matches('/');
        if trimmed.is_empty() {
            return Err(ClientError::InvalidUrl("URL cannot be empty".into()));
        }

        let parsed = Url::parse(trimmed).map_err(|e| ClientError::InvalidUrl(e.to_string()))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ClientError::InvalidUrl(
                "URL must start with http:// or https://".into(),
            ));
        }

        let http = Client::builder()
            .timeout(Duration::from_secs(30))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(format!("{}/{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            base_url: trimmed.to_string(),
        })
    }

    /// The normalized base URL, without a trailing slash.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub async fn get_movies(&self, page: u64, limit: u64) -> Result<MoviePage> {
        let request = self
            .http
            .get(self.endpoint("/api/movies"))
            .query(&[("page", page), ("limit", limit)]);
        self.send(request, "fetching movies").await
    }

    /// The movie with its comments. `comments` is empty, never absent.
    pub async fn get_movie(&self, id: &str) -> Result<MovieDetails> {
        let request = self
            .http
            .get(self.endpoint("/api/movies/details"))
            .query(&[("id", id)]);
        self.send(request, "fetching movie details").await
    }

    pub async fn search_movies(&self, query: &str) -> Result<Vec<MovieSummary>> {
        let request = self
            .http
            .get(self.endpoint("/api/movies/search"))
            .query(&[("query", query)]);
        self.send(request, "searching movies").await
    }

    pub async fn add_movie(&self, movie: &NewMovieRequest) -> Result<InsertedMovie> {
        let request = self.http.post(self.endpoint("/api/movies/add")).json(movie);
        self.send(request, "adding movie").await
    }

    /// Returns the comment as the server stored it.
    pub async fn add_comment(&self, comment: &AddCommentRequest) -> Result<CommentRecord> {
        let request = self.http.post(self.endpoint("/api/comments/add")).json(comment);
        let created: CommentCreated = self.send(request, "adding comment").await?;
        Ok(created.comment)
    }

    pub async fn update_comment(&self, comment_id: &str, text: &str) -> Result<MutationResult> {
        let body = UpdateCommentRequest {
            comment_id: comment_id.to_string(),
            text: text.to_string(),
        };
        let request = self.http.put(self.endpoint("/api/comments/update")).json(&body);
        self.send(request, "updating comment").await
    }

    pub async fn delete_comment(&self, comment_id: &str) -> Result<MutationResult> {
        let body = DeleteCommentRequest {
            comment_id: comment_id.to_string(),
        };
        let request = self.http.delete(self.endpoint("/api/comments/delete")).json(&body);
        self.send(request, "deleting comment").await
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder, action: &str) -> Result<T> {
        let result = self.execute(request).await;
        if let Err(e) = &result {
            error!("Error {}: {}", action, e);
        }
        result
    }

    async fn execute<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T> {
        let response = request.send().await.map_err(|e| {
            if e.is_connect() || e.is_timeout() {
                ClientError::Unreachable(e.to_string())
            } else {
                ClientError::Request(e)
            }
        })?;

        let status = response.status();
        debug!(status = status.as_u16(), url = %response.url(), "API response");

        if status.is_success() {
            return response
                .json::<T>()
                .await
                .map_err(|e| ClientError::Parse(e.to_string()));
        }

        let text = response.text().await.unwrap_or_default();
        let message = match serde_json::from_str::<ErrorBody>(&text) {
            Ok(body) => body.error,
            Err(_) if !text.trim().is_empty() => text,
            Err(_) => status.canonical_reason().unwrap_or("Request failed").to_string(),
        };

        Err(ClientError::Api {
            status: status.as_u16(),
            message,
        })
    }
}
