use std::sync::Arc;

use axum::{extract::State, response::IntoResponse, Extension, Json};
use axum::response::Response;
use http::StatusCode;
use serde_json::json;
use tracing::{info, warn};

use crate::{
    db::VoteKind,
    models::{article::Article, error::Error, jwt::Claims},
    services::{engagement, identity},
    utils::{state::AppState, urls::normalize_url},
};

pub async fn like_article(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
    Json(article): Json<Article>,
) -> impl IntoResponse {
    vote(state, claims, article, VoteKind::Like).await
}

pub async fn dislike_article(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
    Json(article): Json<Article>,
) -> impl IntoResponse {
    vote(state, claims, article, VoteKind::Dislike).await
}

/// One vote gesture: resolve the article's durable identity, flip the vote,
/// re-read both counts from the store, then broadcast the authoritative
/// snapshot into every cached copy. Failures never surface as errors — the
/// caller just does not get a synced snapshot back.
async fn vote(
    state: Arc<AppState>,
    claims: Claims,
    article: Article,
    kind: VoteKind,
) -> Response {
    let Some(user_id) = claims.user_id() else {
        return Error::from((StatusCode::UNAUTHORIZED, "Login required")).into_response();
    };

    let url_key = normalize_url(article.url());
    let store = state.store.as_ref();

    let Some(article_id) = identity::resolve(store, &article).await else {
        info!(url = %url_key, "vote skipped, article identity unresolved");
        return (StatusCode::OK, Json(json!({ "synced": false }))).into_response();
    };
    state.attach_article_id(&url_key, article_id);

    let active = match engagement::toggle_vote(store, kind, article_id, user_id).await {
        Ok(active) => active,
        Err(error) => {
            warn!(%error, %article_id, "vote toggle failed");
            return (StatusCode::OK, Json(json!({ "synced": false }))).into_response();
        }
    };

    match engagement::vote_counts(store, article_id).await {
        Ok((like_count, dislike_count)) => {
            state.broadcast_engagement(article_id, &url_key, like_count, dislike_count);
            (
                StatusCode::OK,
                Json(json!({
                    "synced": true,
                    "article_id": article_id,
                    "active": active,
                    "like_count": like_count,
                    "dislike_count": dislike_count,
                })),
            )
                .into_response()
        }
        Err(error) => {
            // The toggle landed but the re-read did not; cached copies keep
            // their previous counts until the next enrichment pass.
            warn!(%error, %article_id, "count re-read failed after toggle");
            (
                StatusCode::OK,
                Json(json!({
                    "synced": true,
                    "article_id": article_id,
                    "active": active,
                })),
            )
                .into_response()
        }
    }
}
