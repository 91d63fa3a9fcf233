use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    Extension, Json,
};
use http::StatusCode;
use serde::Deserialize;
use serde_json::json;
use tracing::warn;

use crate::{
    db::VoteKind,
    models::{article::Article, cache::CacheEntry, jwt::Claims},
    services::{articles, generator},
    utils::{ids::parse_durable_id, state::AppState},
};

const FEED_TTL_HOURS: i64 = 6;

#[derive(Deserialize)]
pub struct FeedQuery {
    pub category: Option<String>,
}

/// Serve a category feed with live counts. Fresh in-memory snapshots are
/// returned as-is (vote gestures keep them reconciled); otherwise the stored
/// cache is read and, when stale, the generator is pulled and its batch
/// persisted — the same cache-then-fetch flow the feed has always had.
pub async fn get_feed(
    State(state): State<Arc<AppState>>,
    Query(params): Query<FeedQuery>,
) -> impl IntoResponse {
    let label = params
        .category
        .unwrap_or_else(|| articles::DEFAULT_CATEGORY.to_string());

    if let Some(entry) = state.feed_cache.get(&label) {
        if !entry.is_expired() {
            return (
                StatusCode::OK,
                Json(json!({ "source": "memory", "articles": entry.value })),
            )
                .into_response();
        }
    }

    let (source, list) = load_feed(&state, &label, false).await;
    (
        StatusCode::OK,
        Json(json!({ "source": source, "articles": list })),
    )
        .into_response()
}

/// The explicit refresh-category gesture: always pull the generator.
pub async fn refresh_feed(
    State(state): State<Arc<AppState>>,
    Query(params): Query<FeedQuery>,
) -> impl IntoResponse {
    let label = params
        .category
        .unwrap_or_else(|| articles::DEFAULT_CATEGORY.to_string());
    let (source, list) = load_feed(&state, &label, true).await;
    (
        StatusCode::OK,
        Json(json!({ "source": source, "articles": list })),
    )
        .into_response()
}

async fn load_feed(state: &Arc<AppState>, label: &str, force: bool) -> (&'static str, Vec<Article>) {
    let cached = match articles::cached_feed(state.store.as_ref(), label).await {
        Ok(rows) => rows,
        Err(error) => {
            warn!(%error, label, "stored feed unavailable");
            Vec::new()
        }
    };

    if !force && is_fresh(cached.first().and_then(|row| row.content.created_at.as_deref())) {
        let list = finish_feed(state, label, cached.into_iter().map(Article::from).collect()).await;
        return ("cache", list);
    }

    let query = category_query(state, label).await;
    let fetched = generator::fetch_positive_news(
        &state.http_client,
        &state.config.world_news_api_key,
        &query,
        label,
    )
    .await;

    match fetched {
        Ok(drafts) if !drafts.is_empty() => {
            let saved = articles::save_batch(state.store.as_ref(), label, drafts).await;
            if saved.is_empty() {
                // Nothing persisted; keep showing what we had.
                let list =
                    finish_feed(state, label, cached.into_iter().map(Article::from).collect())
                        .await;
                return ("cache", list);
            }
            let list = finish_feed(state, label, saved.into_iter().map(Article::from).collect()).await;
            ("api", list)
        }
        Ok(_) => {
            let list = finish_feed(state, label, cached.into_iter().map(Article::from).collect()).await;
            ("cache", list)
        }
        Err(error) => {
            warn!(%error, label, "generator fetch failed, serving stored feed");
            let list = finish_feed(state, label, cached.into_iter().map(Article::from).collect()).await;
            ("cache", list)
        }
    }
}

/// Batch-enrich counts and publish the snapshot for the reconciliation
/// helpers to keep in sync.
async fn finish_feed(state: &Arc<AppState>, label: &str, mut list: Vec<Article>) -> Vec<Article> {
    articles::enrich_counts(state.store.as_ref(), &mut list).await;
    // An empty list is never pinned; the next read gets a fresh chance.
    if !list.is_empty() {
        state.feed_cache.insert(
            label.to_string(),
            CacheEntry::new(list.clone(), FEED_TTL_HOURS * 3600),
        );
    }
    list
}

fn is_fresh(created_at: Option<&str>) -> bool {
    let Some(created_at) = created_at else {
        return false;
    };
    match chrono::DateTime::parse_from_rfc3339(created_at) {
        Ok(created) => {
            chrono::Utc::now() - created.with_timezone(&chrono::Utc)
                < chrono::Duration::hours(FEED_TTL_HOURS)
        }
        Err(_) => false,
    }
}

/// The generator query for a category is its stored `value`; unknown labels
/// search by the label itself.
async fn category_query(state: &Arc<AppState>, label: &str) -> String {
    match state.store.categories_for_user(None).await {
        Ok(categories) => categories
            .into_iter()
            .find(|category| category.label == label)
            .map(|category| category.value)
            .unwrap_or_else(|| label.to_string()),
        Err(error) => {
            warn!(%error, "category lookup failed, searching by label");
            label.to_string()
        }
    }
}

/// Detail-view engagement: counts plus the caller's own vote flags.
pub async fn article_engagement(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
    Path(article_id): Path<String>,
) -> impl IntoResponse {
    let empty = json!({
        "like_count": 0,
        "dislike_count": 0,
        "liked": false,
        "disliked": false,
    });
    let Some(article_id) = parse_durable_id(&article_id) else {
        return (StatusCode::OK, Json(empty)).into_response();
    };
    let Some(user_id) = claims.user_id() else {
        return (StatusCode::OK, Json(empty)).into_response();
    };

    let store = state.store.as_ref();
    let likes = store.count_votes(VoteKind::Like, article_id).await;
    let dislikes = store.count_votes(VoteKind::Dislike, article_id).await;
    let liked = store.vote_exists(VoteKind::Like, article_id, user_id).await;
    let disliked = store
        .vote_exists(VoteKind::Dislike, article_id, user_id)
        .await;

    (
        StatusCode::OK,
        Json(json!({
            "like_count": likes.unwrap_or(0),
            "dislike_count": dislikes.unwrap_or(0),
            "liked": liked.unwrap_or(false),
            "disliked": disliked.unwrap_or(false),
        })),
    )
        .into_response()
}

#[derive(Deserialize)]
pub struct ImagePatch {
    pub url: String,
    pub image_url: String,
}

#[derive(Deserialize)]
pub struct AudioPatch {
    pub url: String,
    pub audio_payload: String,
}

/// Enhancement write from the media pipeline; always accepted.
pub async fn patch_image(
    State(state): State<Arc<AppState>>,
    Json(patch): Json<ImagePatch>,
) -> impl IntoResponse {
    articles::update_image(state.store.as_ref(), &patch.url, &patch.image_url).await;
    StatusCode::ACCEPTED
}

/// Enhancement write from the narration pipeline; always accepted.
pub async fn patch_audio(
    State(state): State<Arc<AppState>>,
    Json(patch): Json<AudioPatch>,
) -> impl IntoResponse {
    articles::update_audio(state.store.as_ref(), &patch.url, &patch.audio_payload).await;
    StatusCode::ACCEPTED
}
