use std::sync::Arc;

use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Extension, Json,
};
use http::StatusCode;
use serde::Deserialize;
use tracing::warn;

use crate::{
    models::{comment::Comment, comment::NewComment, error::Error, jwt::Claims},
    services::comments,
    utils::{ids::parse_durable_id, state::AppState},
};

/// Comments for one article, newest first. An id that is not durable-shaped
/// cannot have comments yet; answer empty without touching the store.
pub async fn list_comments(
    State(state): State<Arc<AppState>>,
    Path(article_id): Path<String>,
) -> impl IntoResponse {
    let Some(article_id) = parse_durable_id(&article_id) else {
        return (StatusCode::OK, Json(Vec::<Comment>::new())).into_response();
    };
    let comments = comments::list(state.store.as_ref(), article_id).await;
    (StatusCode::OK, Json(comments)).into_response()
}

#[derive(Deserialize)]
pub struct PostCommentRequest {
    pub article_id: String,
    pub text: String,
}

/// Post a comment. Unlike votes and favorites this surfaces failures: the
/// caller typed text and must know it was not saved. Callers resolve the
/// article's identity before posting.
pub async fn post_comment(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<PostCommentRequest>,
) -> Result<impl IntoResponse, Error> {
    let user_id = claims
        .user_id()
        .ok_or((StatusCode::UNAUTHORIZED, "Login required"))?;
    let article_id = parse_durable_id(&payload.article_id).ok_or((
        StatusCode::CONFLICT,
        "Article is not yet synchronized, try again",
    ))?;
    let text = payload.text.trim();
    if text.is_empty() {
        return Err(Error::new(
            StatusCode::UNPROCESSABLE_ENTITY,
            "Comment text is empty",
        ));
    }

    let comment = comments::add(
        state.store.as_ref(),
        NewComment {
            article_id,
            user_id,
            username: claims.display_name(),
            text: text.to_string(),
        },
    )
    .await
    .map_err(|error| {
        warn!(%error, %article_id, "comment insert failed");
        Error::new(StatusCode::INTERNAL_SERVER_ERROR, "Failed to post comment")
    })?;

    Ok((StatusCode::CREATED, Json(comment)))
}

/// Author-only delete. A non-author call (or an unknown id) removes nothing;
/// both answer as success since the UI hides the control from non-authors.
pub async fn delete_comment(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
    Path(comment_id): Path<String>,
) -> impl IntoResponse {
    let Some(user_id) = claims.user_id() else {
        return Error::from((StatusCode::UNAUTHORIZED, "Login required")).into_response();
    };
    let Some(comment_id) = parse_durable_id(&comment_id) else {
        return StatusCode::NO_CONTENT.into_response();
    };
    comments::delete(state.store.as_ref(), comment_id, user_id).await;
    StatusCode::NO_CONTENT.into_response()
}
