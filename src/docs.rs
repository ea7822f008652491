use axum::Json;
use utoipa::OpenApi;

use crate::handlers::{comments, health, movies};

/// OpenAPI description of every endpoint the router serves.
#[derive(OpenApi)]
#[openapi(
    info(title = "Movie Catalog API", description = "Browse, search and comment on movies"),
    paths(
        movies::list_movies,
        movies::get_movie,
        movies::search_movies,
        movies::add_movie,
        comments::add_comment,
        comments::update_comment,
        comments::delete_comment,
        health::health,
    ),
    tags(
        (name = "movies", description = "Catalog browsing and insertion"),
        (name = "comments", description = "Comments attached to movies"),
        (name = "health", description = "Service status")
    )
)]
pub struct ApiDoc;

pub async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
