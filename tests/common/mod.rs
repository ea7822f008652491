// tests/common/mod.rs

#![allow(dead_code)]

use std::sync::Arc;

use async_trait::async_trait;
use mongodb::bson::oid::ObjectId;
use movie_catalog::{
    config::Config,
    error::AppError,
    models::{
        comment::Comment,
        movie::{Movie, NewMovieRequest},
    },
    routes,
    state::AppState,
    store::{CatalogStore, InMemoryStore, SharedStore},
};

pub struct TestApp {
    /// Base URL, e.g. "http://127.0.0.1:12345".
    pub address: String,
    pub store: Arc<InMemoryStore>,
}

/// Spawns the app on a random port, backed by an empty in-memory store.
pub async fn spawn_app() -> TestApp {
    spawn_app_with_movies(Vec::new()).await
}

pub async fn spawn_app_with_movies(movies: Vec<Movie>) -> TestApp {
    let store = Arc::new(InMemoryStore::with_movies(movies));
    let address = spawn_with_store(store.clone()).await;
    TestApp { address, store }
}

/// Spawns the app with an arbitrary store and returns its base URL.
pub async fn spawn_with_store(store: SharedStore) -> String {
    let state = AppState {
        store,
        config: Config::in_memory(),
    };
    let app = routes::create_router(state);

    // Bind to port 0 to get a random available port
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind random port");
    let port = listener.local_addr().unwrap().port();

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    format!("http://127.0.0.1:{}", port)
}

pub fn movie(title: &str) -> Movie {
    Movie::from_request(NewMovieRequest {
        title: Some(title.to_string()),
        plot: Some(format!("Plot of {}", title)),
        year: Some(2000),
        ..Default::default()
    })
    .expect("valid movie")
}

pub fn movies(count: usize) -> Vec<Movie> {
    (0..count).map(|i| movie(&format!("Movie {:02}", i))).collect()
}

/// A store whose every call fails as if the database were down.
pub struct FailingStore;

fn down() -> AppError {
    AppError::Database("connection refused".to_string())
}

#[async_trait]
impl CatalogStore for FailingStore {
    async fn ping(&self) -> Result<(), AppError> {
        Err(down())
    }

    async fn list_movies(&self, _skip: u64, _limit: u64) -> Result<Vec<Movie>, AppError> {
        Err(down())
    }

    async fn count_movies(&self) -> Result<u64, AppError> {
        Err(down())
    }

    async fn find_movie(&self, _id: ObjectId) -> Result<Option<Movie>, AppError> {
        Err(down())
    }

    async fn search_movies(&self, _query: &str, _limit: u64) -> Result<Vec<Movie>, AppError> {
        Err(down())
    }

    async fn insert_movie(&self, _movie: &Movie) -> Result<ObjectId, AppError> {
        Err(down())
    }

    async fn comments_for_movie(&self, _movie_id: ObjectId) -> Result<Vec<Comment>, AppError> {
        Err(down())
    }

    async fn insert_comment(&self, _comment: &Comment) -> Result<(), AppError> {
        Err(down())
    }

    async fn update_comment_text(
        &self,
        _id: ObjectId,
        _text: &str,
        _date: &str,
    ) -> Result<bool, AppError> {
        Err(down())
    }

    async fn delete_comment(&self, _id: ObjectId) -> Result<bool, AppError> {
        Err(down())
    }
}
