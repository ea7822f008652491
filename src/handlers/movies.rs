// src/handlers/movies.rs

use axum::{
    Json,
    extract::{
        Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    http::StatusCode,
    response::IntoResponse,
};
use validator::Validate;

use crate::{
    error::AppError,
    models::{
        ErrorBody,
        comment::CommentSummary,
        movie::{
            InsertedMovie, ListParams, Movie, MovieDetails, MovieIdParams, MoviePage, MovieSummary,
            NewMovieRequest, SEARCH_LIMIT, SearchParams,
        },
        parse_object_id,
    },
    store::SharedStore,
};

/// Lists one page of the catalog in natural storage order.
/// A page past the end is empty, not an error.
#[utoipa::path(
    get,
    path = "/api/movies",
    tag = "movies",
    params(ListParams),
    responses(
        (status = 200, description = "One page of movies", body = MoviePage),
        (status = 400, description = "Malformed paging parameters", body = ErrorBody),
        (status = 500, description = "Database failure", body = ErrorBody)
    )
)]
pub async fn list_movies(
    State(store): State<SharedStore>,
    params: Result<Query<ListParams>, QueryRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Query(params) = params?;
    let window = params.window();

    let total_movies = store.count_movies().await?;
    let movies = store
        .list_movies(window.skip(), window.limit)
        .await?
        .into_iter()
        .map(MovieSummary::from)
        .collect();

    Ok(Json(MoviePage {
        movies,
        total_movies,
        total_pages: window.total_pages(total_movies),
        current_page: window.page,
    }))
}

/// Retrieves a single movie with its comments.
#[utoipa::path(
    get,
    path = "/api/movies/details",
    tag = "movies",
    params(MovieIdParams),
    responses(
        (status = 200, description = "The movie and its comments", body = MovieDetails),
        (status = 400, description = "Missing or malformed id", body = ErrorBody),
        (status = 404, description = "No movie with that id", body = ErrorBody),
        (status = 500, description = "Database failure", body = ErrorBody)
    )
)]
pub async fn get_movie(
    State(store): State<SharedStore>,
    params: Result<Query<MovieIdParams>, QueryRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Query(params) = params?;

    // 1. Validate the id before touching the database
    let id = parse_object_id(params.id.as_deref().unwrap_or_default(), "Invalid movie ID format")?;

    // 2. Fetch the movie
    let movie = store
        .find_movie(id)
        .await?
        .ok_or(AppError::NotFound("Movie not found".to_string()))?;

    // 3. Join its comments
    let comments = store
        .comments_for_movie(id)
        .await?
        .iter()
        .map(CommentSummary::from)
        .collect();

    Ok(Json(MovieDetails::new(movie, comments)))
}

/// Case-insensitive title search, capped at 20 results.
#[utoipa::path(
    get,
    path = "/api/movies/search",
    tag = "movies",
    params(SearchParams),
    responses(
        (status = 200, description = "Matching movies", body = [MovieSummary]),
        (status = 400, description = "Missing query", body = ErrorBody),
        (status = 500, description = "Database failure", body = ErrorBody)
    )
)]
pub async fn search_movies(
    State(store): State<SharedStore>,
    params: Result<Query<SearchParams>, QueryRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Query(params) = params?;

    // Blank means missing; otherwise the text is matched as sent
    let query = params
        .query
        .as_deref()
        .filter(|q| !q.trim().is_empty())
        .ok_or(AppError::BadRequest("Search query required".to_string()))?;

    let movies: Vec<MovieSummary> = store
        .search_movies(query, SEARCH_LIMIT)
        .await?
        .into_iter()
        .map(MovieSummary::from)
        .collect();

    tracing::debug!(query, results = movies.len(), "Title search");

    Ok(Json(movies))
}

/// Inserts a new movie. The server assigns the id and timestamp.
#[utoipa::path(
    post,
    path = "/api/movies/add",
    tag = "movies",
    request_body = NewMovieRequest,
    responses(
        (status = 201, description = "Movie created", body = InsertedMovie),
        (status = 400, description = "Missing title or malformed body", body = ErrorBody),
        (status = 500, description = "Database failure", body = ErrorBody)
    )
)]
pub async fn add_movie(
    State(store): State<SharedStore>,
    payload: Result<Json<NewMovieRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(payload) = payload?;
    payload.validate()?;

    let movie = Movie::from_request(payload)?;
    let inserted_id = store.insert_movie(&movie).await?;

    tracing::info!(id = %inserted_id, title = %movie.title, "Movie added");

    Ok((
        StatusCode::CREATED,
        Json(InsertedMovie {
            success: true,
            inserted_id: inserted_id.to_hex(),
        }),
    ))
}
