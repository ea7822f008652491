use async_trait::async_trait;
use mongodb::bson::{Bson, oid::ObjectId};
use tokio::sync::RwLock;

use crate::{
    error::AppError,
    models::{comment::Comment, movie::Movie},
    store::CatalogStore,
};

/// Process-local store with the same observable behavior as the MongoDB
/// one: insertion order, literal case-insensitive title search, and
/// at-most-one delete.
#[derive(Default)]
pub struct InMemoryStore {
    movies: RwLock<Vec<Movie>>,
    comments: RwLock<Vec<Comment>>,
}

impl InMemoryStore {
    /// Store pre-filled with `movies`.
    pub fn with_movies(movies: Vec<Movie>) -> Self {
        Self {
            movies: RwLock::new(movies),
            comments: RwLock::default(),
        }
    }
}

#[async_trait]
impl CatalogStore for InMemoryStore {
    async fn ping(&self) -> Result<(), AppError> {
        Ok(())
    }

    async fn list_movies(&self, skip: u64, limit: u64) -> Result<Vec<Movie>, AppError> {
        let movies = self.movies.read().await;
        Ok(movies
            .iter()
            .skip(skip as usize)
            .take(limit as usize)
            .cloned()
            .collect())
    }

    async fn count_movies(&self) -> Result<u64, AppError> {
        Ok(self.movies.read().await.len() as u64)
    }

    async fn find_movie(&self, id: ObjectId) -> Result<Option<Movie>, AppError> {
        let movies = self.movies.read().await;
        Ok(movies.iter().find(|m| m.id == id).cloned())
    }

    async fn search_movies(&self, query: &str, limit: u64) -> Result<Vec<Movie>, AppError> {
        let movies = self.movies.read().await;
        Ok(movies
            .iter()
            .filter(|m| m.title_contains(query))
            .take(limit as usize)
            .cloned()
            .collect())
    }

    async fn insert_movie(&self, movie: &Movie) -> Result<ObjectId, AppError> {
        let mut movies = self.movies.write().await;
        if movies.iter().any(|m| m.id == movie.id) {
            return Err(AppError::Database(format!("duplicate key: {}", movie.id)));
        }
        movies.push(movie.clone());
        Ok(movie.id)
    }

    async fn comments_for_movie(&self, movie_id: ObjectId) -> Result<Vec<Comment>, AppError> {
        let comments = self.comments.read().await;
        Ok(comments
            .iter()
            .filter(|c| c.movie_id == movie_id)
            .cloned()
            .collect())
    }

    async fn insert_comment(&self, comment: &Comment) -> Result<(), AppError> {
        let mut comments = self.comments.write().await;
        if comments.iter().any(|c| c.id == comment.id) {
            return Err(AppError::Database(format!("duplicate key: {}", comment.id)));
        }
        comments.push(comment.clone());
        Ok(())
    }

    async fn update_comment_text(
        &self,
        id: ObjectId,
        text: &str,
        date: &str,
    ) -> Result<bool, AppError> {
        let mut comments = self.comments.write().await;
        match comments.iter_mut().find(|c| c.id == id) {
            Some(comment) => {
                comment.text = text.to_string();
                comment.date = Some(Bson::String(date.to_string()));
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete_comment(&self, id: ObjectId) -> Result<bool, AppError> {
        let mut comments = self.comments.write().await;
        match comments.iter().position(|c| c.id == id) {
            Some(index) => {
                comments.remove(index);
                Ok(true)
            }
            None => Ok(false),
        }
    }
}
