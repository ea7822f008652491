// src/store/mongo.rs

use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::{
    Client, Collection, Database,
    bson::{Document, doc, oid::ObjectId},
    options::ClientOptions,
};

use crate::{
    config::Config,
    error::AppError,
    models::{comment::Comment, movie::Movie},
    store::CatalogStore,
};

const DEFAULT_DATABASE: &str = "sample_mflix";

/// MongoDB-backed store.
///
/// `mongodb::Client` is a handle to a connection pool; cloning it shares the
/// pool. Each collection call checks a connection out for its duration and
/// the driver returns it afterwards, whether the call succeeded or failed.
#[derive(Clone)]
pub struct MongoStore {
    db: Database,
    movies: Collection<Movie>,
    comments: Collection<Comment>,
}

impl MongoStore {
    /// Builds the pooled client. No connection is made until the first call,
    /// so callers should `ping` to confirm the server is reachable.
    pub async fn connect(config: &Config) -> Result<Self, AppError> {
        let uri = config
            .database_url
            .as_deref()
            .ok_or_else(|| AppError::Config("MONGODB_URI must be set".to_string()))?;

        let mut options = ClientOptions::parse(uri).await?;
        options.app_name = Some(env!("CARGO_PKG_NAME").to_string());
        options.max_pool_size = Some(config.max_pool_size);
        options.connect_timeout = Some(config.connect_timeout);
        options.server_selection_timeout = Some(config.connect_timeout);

        let db_name = config
            .database_name
            .clone()
            .or_else(|| options.default_database.clone())
            .unwrap_or_else(|| DEFAULT_DATABASE.to_string());

        let client = Client::with_options(options)?;
        let db = client.database(&db_name);

        tracing::info!(
            database = %db_name,
            movies = %config.movies_collection,
            comments = %config.comments_collection,
            pool_size = config.max_pool_size,
            "MongoDB client configured"
        );

        Ok(Self {
            movies: db.collection(&config.movies_collection),
            comments: db.collection(&config.comments_collection),
            db,
        })
    }
}

fn summary_projection() -> Document {
    doc! { "_id": 1, "title": 1, "plot": 1, "poster": 1, "year": 1 }
}

#[async_trait]
impl CatalogStore for MongoStore {
    async fn ping(&self) -> Result<(), AppError> {
        self.db.run_command(doc! { "ping": 1 }).await?;
        Ok(())
    }

    async fn list_movies(&self, skip: u64, limit: u64) -> Result<Vec<Movie>, AppError> {
        let movies = self
            .movies
            .find(doc! {})
            .projection(summary_projection())
            .skip(skip)
            .limit(limit as i64)
            .await?
            .try_collect()
            .await?;
        Ok(movies)
    }

    async fn count_movies(&self) -> Result<u64, AppError> {
        Ok(self.movies.count_documents(doc! {}).await?)
    }

    async fn find_movie(&self, id: ObjectId) -> Result<Option<Movie>, AppError> {
        Ok(self.movies.find_one(doc! { "_id": id }).await?)
    }

    async fn search_movies(&self, query: &str, limit: u64) -> Result<Vec<Movie>, AppError> {
        // Escaped so the query is matched as literal text.
        let filter = doc! {
            "title": { "$regex": regex::escape(query), "$options": "i" }
        };

        let movies = self
            .movies
            .find(filter)
            .projection(summary_projection())
            .limit(limit as i64)
            .await?
            .try_collect()
            .await?;
        Ok(movies)
    }

    async fn insert_movie(&self, movie: &Movie) -> Result<ObjectId, AppError> {
        self.movies.insert_one(movie).await?;
        Ok(movie.id)
    }

    async fn comments_for_movie(&self, movie_id: ObjectId) -> Result<Vec<Comment>, AppError> {
        let comments = self
            .comments
            .find(doc! { "movie_id": movie_id })
            .await?
            .try_collect()
            .await?;
        Ok(comments)
    }

    async fn insert_comment(&self, comment: &Comment) -> Result<(), AppError> {
        self.comments.insert_one(comment).await?;
        Ok(())
    }

    async fn update_comment_text(
        &self,
        id: ObjectId,
        text: &str,
        date: &str,
    ) -> Result<bool, AppError> {
        let result = self
            .comments
            .update_one(
                doc! { "_id": id },
                doc! { "$set": { "text": text, "date": date } },
            )
            .await?;
        Ok(result.matched_count > 0)
    }

    async fn delete_comment(&self, id: ObjectId) -> Result<bool, AppError> {
        let result = self.comments.delete_one(doc! { "_id": id }).await?;
        Ok(result.deleted_count > 0)
    }
}
