use std::collections::HashSet;
use std::sync::Arc;

use dashmap::DashMap;
use reqwest::Client;
use supabase_auth::models::AuthClient;
use uuid::Uuid;

use crate::db::Store;
use crate::models::article::Article;
use crate::models::cache::CacheEntry;
use crate::utils::config::Config;
use crate::utils::urls::normalize_url;

pub struct AppState {
    pub store: Arc<dyn Store>,
    pub supabase_auth: AuthClient,
    pub config: Config,
    pub http_client: Client,
    /// Category label → last feed snapshot served. Only the reconciliation
    /// helpers below write into existing snapshots.
    pub feed_cache: DashMap<String, CacheEntry<Vec<Article>>>,
    /// Signed-in user → favorited article ids, loaded on session events.
    pub favorites: DashMap<Uuid, HashSet<Uuid>>,
}

impl AppState {
    /// Push authoritative counts into every cached copy of the article,
    /// matched by id or by normalized URL.
    pub fn broadcast_engagement(
        &self,
        article_id: Uuid,
        url_key: &str,
        like_count: i64,
        dislike_count: i64,
    ) {
        for mut entry in self.feed_cache.iter_mut() {
            for article in entry.value_mut().value.iter_mut() {
                if article.id() == Some(article_id) || normalize_url(article.url()) == url_key {
                    let content = article.content_mut();
                    content.like_count = like_count;
                    content.dislike_count = dislike_count;
                }
            }
        }
    }

    /// Propagate a freshly resolved id into cached transient copies so the
    /// next gesture on the same logical article resolves without I/O.
    pub fn attach_article_id(&self, url_key: &str, article_id: Uuid) {
        for mut entry in self.feed_cache.iter_mut() {
            for article in entry.value_mut().value.iter_mut() {
                if article.id().is_none() && normalize_url(article.url()) == url_key {
                    *article = article.clone().with_id(article_id);
                }
            }
        }
    }

    pub fn set_favorites(&self, user_id: Uuid, ids: HashSet<Uuid>) {
        self.favorites.insert(user_id, ids);
    }

    pub fn clear_favorites(&self, user_id: Uuid) {
        self.favorites.remove(&user_id);
    }

    /// Apply one favorite toggle to the cached set.
    pub fn update_favorite(&self, user_id: Uuid, article_id: Uuid, favorited: bool) {
        let mut ids = self.favorites.entry(user_id).or_default();
        if favorited {
            ids.insert(article_id);
        } else {
            ids.remove(&article_id);
        }
    }

    pub fn favorites_snapshot(&self, user_id: Uuid) -> Option<Vec<Uuid>> {
        self.favorites
            .get(&user_id)
            .map(|ids| ids.iter().copied().collect())
    }
}
