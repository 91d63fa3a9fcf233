use tracing::warn;
use uuid::Uuid;

use crate::db::Store;
use crate::models::article::Article;
use crate::services::articles;
use crate::utils::urls::normalize_url;

/// Resolve an article's durable id, materializing it on first use.
///
/// A persisted article answers immediately with no store traffic. A transient
/// one is looked up by normalized URL; on a miss it is persisted through the
/// cache gateway's upsert path. `None` means the operation that needed the id
/// must be aborted — it is not a retryable identity.
///
/// Callers are responsible for propagating a freshly resolved id into every
/// in-memory copy of the article (see `AppState::attach_article_id`) so later
/// gestures on the same logical article skip the lookup entirely.
pub async fn resolve(store: &dyn Store, article: &Article) -> Option<Uuid> {
    match article {
        Article::Persisted(row) => Some(row.id),
        Article::Transient(draft) => {
            let url_key = normalize_url(&draft.url);
            match store.find_article_by_url(&url_key).await {
                Ok(Some(existing)) => Some(existing.id),
                Ok(None) => match articles::persist_draft(store, draft.clone()).await {
                    Ok(row) => Some(row.id),
                    Err(error) => {
                        warn!(%error, url = %url_key, "could not persist article while resolving identity");
                        None
                    }
                },
                Err(error) => {
                    warn!(%error, url = %url_key, "article lookup failed while resolving identity");
                    None
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::Ordering;

    use super::*;
    use crate::db::memory::MemoryStore;
    use crate::models::article::ArticleContent;

    fn draft(url: &str) -> ArticleContent {
        ArticleContent {
            url: url.to_string(),
            title: "Good news".to_string(),
            ..ArticleContent::default()
        }
    }

    #[tokio::test]
    async fn persisted_article_resolves_without_store_calls() {
        let store = MemoryStore::new();
        let row = store.seed_article(draft("x.com/a"));

        let resolved = resolve(&store, &Article::Persisted(row.clone())).await;

        assert_eq!(resolved, Some(row.id));
        assert_eq!(store.article_lookups.load(Ordering::SeqCst), 0);
        assert_eq!(store.article_upserts.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn transient_article_with_known_url_reuses_the_existing_row() {
        let store = MemoryStore::new();
        let row = store.seed_article(draft("x.com/a"));

        // Same logical article, different spelling of the URL.
        let resolved = resolve(&store, &Article::Transient(draft("https://X.com/a/"))).await;

        assert_eq!(resolved, Some(row.id));
        assert_eq!(store.article_count(), 1);
    }

    #[tokio::test]
    async fn transient_article_with_new_url_is_persisted_once() {
        let store = MemoryStore::new();

        let resolved = resolve(&store, &Article::Transient(draft("https://x.com/a"))).await;

        assert!(resolved.is_some());
        assert_eq!(store.article_count(), 1);
        assert_eq!(store.article_upserts.load(Ordering::SeqCst), 1);

        let row = store.find_article_by_url("x.com/a").await.unwrap().unwrap();
        assert_eq!(resolved, Some(row.id));
        // The resolver's persist path defaults the category.
        assert_eq!(row.content.category.as_deref(), Some("Generale"));
    }

    #[tokio::test]
    async fn unreachable_store_aborts_resolution() {
        let store = MemoryStore::new();
        store.go_offline();

        let resolved = resolve(&store, &Article::Transient(draft("https://x.com/a"))).await;

        assert!(resolved.is_none());
    }
}
