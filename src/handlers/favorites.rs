use std::sync::Arc;

use axum::{extract::State, response::IntoResponse, Extension, Json};
use http::StatusCode;
use serde_json::json;
use tracing::{info, warn};

use crate::{
    models::{article::Article, error::Error, jwt::Claims},
    services::{engagement, identity},
    utils::{state::AppState, urls::normalize_url},
};

/// Favorite gesture: same resolution protocol as a vote, but the state being
/// reconciled is the user's favorite-id set rather than counters.
pub async fn toggle_favorite(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
    Json(article): Json<Article>,
) -> impl IntoResponse {
    let Some(user_id) = claims.user_id() else {
        return Error::from((StatusCode::UNAUTHORIZED, "Login required")).into_response();
    };

    let url_key = normalize_url(article.url());
    let store = state.store.as_ref();

    let Some(article_id) = identity::resolve(store, &article).await else {
        info!(url = %url_key, "favorite skipped, article identity unresolved");
        return (StatusCode::OK, Json(json!({ "synced": false }))).into_response();
    };
    state.attach_article_id(&url_key, article_id);

    match engagement::toggle_favorite(store, article_id, user_id).await {
        Ok(favorited) => {
            state.update_favorite(user_id, article_id, favorited);
            let favorite_ids: Vec<String> = state
                .favorites_snapshot(user_id)
                .unwrap_or_default()
                .into_iter()
                .map(|id| id.to_string())
                .collect();
            (
                StatusCode::OK,
                Json(json!({
                    "synced": true,
                    "article_id": article_id,
                    "favorited": favorited,
                    "favorite_ids": favorite_ids,
                })),
            )
                .into_response()
        }
        Err(error) => {
            warn!(%error, %article_id, "favorite toggle failed");
            (StatusCode::OK, Json(json!({ "synced": false }))).into_response()
        }
    }
}

/// The signed-in user's favorited article ids, from the session cache when a
/// session event already loaded it, from the store otherwise.
pub async fn list_favorites(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
) -> impl IntoResponse {
    let Some(user_id) = claims.user_id() else {
        return Error::from((StatusCode::UNAUTHORIZED, "Login required")).into_response();
    };

    if let Some(ids) = state.favorites_snapshot(user_id) {
        let ids: Vec<String> = ids.into_iter().map(|id| id.to_string()).collect();
        return (StatusCode::OK, Json(json!({ "favorite_ids": ids }))).into_response();
    }

    match state.store.favorites_for_user(user_id).await {
        Ok(ids) => {
            state.set_favorites(user_id, ids.iter().copied().collect());
            let ids: Vec<String> = ids.into_iter().map(|id| id.to_string()).collect();
            (StatusCode::OK, Json(json!({ "favorite_ids": ids }))).into_response()
        }
        Err(error) => {
            warn!(%error, %user_id, "favorite list unavailable");
            (
                StatusCode::OK,
                Json(json!({ "favorite_ids": Vec::<String>::new() })),
            )
                .into_response()
        }
    }
}
