//! Document-store access.
//!
//! Handlers never talk to the driver directly; they borrow a
//! `CatalogStore` from `AppState`. The MongoDB implementation wraps the
//! driver's connection pool, the in-memory one backs local runs and tests.

pub mod memory;
pub mod mongo;

use std::sync::Arc;

use async_trait::async_trait;
use mongodb::bson::oid::ObjectId;

use crate::{
    config::{Config, StorageBackend},
    error::AppError,
    models::{comment::Comment, movie::Movie},
};

pub use memory::InMemoryStore;
pub use mongo::MongoStore;

/// The handle every handler borrows from `AppState`.
pub type SharedStore = Arc<dyn CatalogStore>;

#[async_trait]
pub trait CatalogStore: Send + Sync {
    /// Round trip to the backing store.
    async fn ping(&self) -> Result<(), AppError>;

    /// Movies in natural storage order, projected to the summary fields.
    async fn list_movies(&self, skip: u64, limit: u64) -> Result<Vec<Movie>, AppError>;

    async fn count_movies(&self) -> Result<u64, AppError>;

    async fn find_movie(&self, id: ObjectId) -> Result<Option<Movie>, AppError>;

    /// Case-insensitive literal substring match on the title.
    async fn search_movies(&self, query: &str, limit: u64) -> Result<Vec<Movie>, AppError>;

    async fn insert_movie(&self, movie: &Movie) -> Result<ObjectId, AppError>;

    async fn comments_for_movie(&self, movie_id: ObjectId) -> Result<Vec<Comment>, AppError>;

    async fn insert_comment(&self, comment: &Comment) -> Result<(), AppError>;

    /// Replaces text and date. Returns whether a comment matched.
    async fn update_comment_text(
        &self,
        id: ObjectId,
        text: &str,
        date: &str,
    ) -> Result<bool, AppError>;

    /// Removes at most one comment. Returns whether one was removed.
    async fn delete_comment(&self, id: ObjectId) -> Result<bool, AppError>;
}

/// Opens the store selected by `config`.
pub async fn connect(config: &Config) -> Result<SharedStore, AppError> {
    match config.storage {
        StorageBackend::Memory => Ok(Arc::new(InMemoryStore::default())),
        StorageBackend::MongoDb => Ok(Arc::new(MongoStore::connect(config).await?)),
    }
}
