use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
};
use validator::Validate;

use crate::{
    error::AppError,
    models::{
        ErrorBody, MutationResult,
        comment::{
            AddCommentRequest, Comment, CommentCreated, CommentRecord, DeleteCommentRequest,
            UpdateCommentRequest, now_iso,
        },
        parse_object_id,
    },
    store::SharedStore,
};

/// Create a new comment on a movie.
/// The movie is not looked up; only the id format is checked.
#[utoipa::path(
    post,
    path = "/api/comments/add",
    tag = "comments",
    request_body = AddCommentRequest,
    responses(
        (status = 201, description = "Comment created", body = CommentCreated),
        (status = 400, description = "Non-string fields or malformed movie id", body = ErrorBody),
        (status = 500, description = "Database failure", body = ErrorBody)
    )
)]
pub async fn add_comment(
    State(store): State<SharedStore>,
    payload: Result<Json<AddCommentRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(payload) = payload?;
    let movie_id = parse_object_id(&payload.movie_id, "Invalid movie ID format")?;

    let comment = Comment::new(movie_id, payload.name, payload.email, payload.text);
    store.insert_comment(&comment).await?;

    tracing::info!(id = %comment.id, movie_id = %movie_id, "Comment added");

    Ok((
        StatusCode::CREATED,
        Json(CommentCreated {
            success: true,
            comment: CommentRecord::from(&comment),
        }),
    ))
}

/// Replace a comment's text and refresh its date.
/// Succeeds whether or not a comment matched; `matched` reports which.
#[utoipa::path(
    put,
    path = "/api/comments/update",
    tag = "comments",
    request_body = UpdateCommentRequest,
    responses(
        (status = 200, description = "Update accepted", body = MutationResult),
        (status = 400, description = "Malformed body or comment id", body = ErrorBody),
        (status = 500, description = "Database failure", body = ErrorBody)
    )
)]
pub async fn update_comment(
    State(store): State<SharedStore>,
    payload: Result<Json<UpdateCommentRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(payload) = payload?;
    payload.validate()?;
    let id = parse_object_id(&payload.comment_id, "Invalid comment ID format")?;

    let matched = store
        .update_comment_text(id, &payload.text, &now_iso())
        .await?;

    if !matched {
        tracing::debug!(id = %id, "Update matched no comment");
    }

    Ok(Json(MutationResult {
        success: true,
        matched,
    }))
}

/// Delete a comment. Deleting a missing comment is a successful no-op.
#[utoipa::path(
    delete,
    path = "/api/comments/delete",
    tag = "comments",
    request_body = DeleteCommentRequest,
    responses(
        (status = 200, description = "Delete accepted", body = MutationResult),
        (status = 400, description = "Malformed body or comment id", body = ErrorBody),
        (status = 500, description = "Database failure", body = ErrorBody)
    )
)]
pub async fn delete_comment(
    State(store): State<SharedStore>,
    payload: Result<Json<DeleteCommentRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(payload) = payload?;
    payload.validate()?;
    let id = parse_object_id(&payload.comment_id, "Invalid comment ID format")?;

    let matched = store.delete_comment(id).await?;
    if matched {
        tracing::info!(id = %id, "Comment deleted");
    }

    Ok(Json(MutationResult {
        success: true,
        matched,
    }))
}
