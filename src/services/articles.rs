//! The article cache gateway: category-scoped reads and writes against the
//! `Articles` relation, with URL-keyed dedup and best-effort enrichment
//! patches.

use std::collections::HashSet;

use tracing::{debug, warn};

use crate::db::{Store, StoreResult};
use crate::models::article::{Article, ArticleContent, PersistedArticle};
use crate::services::engagement;
use crate::utils::urls::normalize_url;

/// Feed window: how many cached articles a category serves at most.
pub const FEED_WINDOW: usize = 40;

/// Category applied when a draft reaches the store without one.
pub const DEFAULT_CATEGORY: &str = "Generale";

/// Drop every draft whose normalized URL was already seen. First occurrence
/// wins; order is otherwise preserved.
pub fn dedup_drafts(drafts: Vec<ArticleContent>) -> Vec<ArticleContent> {
    let mut seen = HashSet::new();
    drafts
        .into_iter()
        .filter(|draft| seen.insert(normalize_url(&draft.url)))
        .collect()
}

/// Up to [`FEED_WINDOW`] most recently created rows for a category, newest
/// first, deduplicated by normalized URL.
pub async fn cached_feed(store: &dyn Store, label: &str) -> StoreResult<Vec<PersistedArticle>> {
    let rows = store.recent_articles(label, FEED_WINDOW).await?;
    let mut seen = HashSet::new();
    Ok(rows
        .into_iter()
        .filter(|row| seen.insert(normalize_url(&row.content.url)))
        .collect())
}

/// Upsert one draft keyed on its normalized URL. The stored `url` column
/// holds the normalized key — that is what lets the unique constraint enforce
/// dedup across URL spellings.
pub async fn persist_draft(
    store: &dyn Store,
    mut draft: ArticleContent,
) -> StoreResult<PersistedArticle> {
    draft.url = normalize_url(&draft.url);
    if draft.category.is_none() {
        draft.category = Some(DEFAULT_CATEGORY.to_string());
    }
    draft.created_at = None;
    store.upsert_article(&draft).await
}

/// Persist a batch for a category: dedup by normalized URL (first wins), then
/// upsert each unique draft. Rows that fail to persist are logged and left
/// out of the result; partial success is expected.
pub async fn save_batch(
    store: &dyn Store,
    label: &str,
    drafts: Vec<ArticleContent>,
) -> Vec<PersistedArticle> {
    let mut saved = Vec::new();
    for mut draft in dedup_drafts(drafts) {
        if draft.category.is_none() {
            draft.category = Some(label.to_string());
        }
        match persist_draft(store, draft).await {
            Ok(row) => saved.push(row),
            Err(error) => warn!(%error, "article dropped from batch save"),
        }
    }
    saved
}

/// Best-effort image patch keyed by URL. Failures are swallowed here; these
/// are enhancement writes, not correctness-critical ones.
pub async fn update_image(store: &dyn Store, url: &str, image_url: &str) {
    if let Err(error) = store
        .update_article_image(&normalize_url(url), image_url)
        .await
    {
        debug!(%error, "image patch dropped");
    }
}

/// Best-effort audio patch keyed by URL; same contract as [`update_image`].
pub async fn update_audio(store: &dyn Store, url: &str, payload: &str) {
    if let Err(error) = store
        .update_article_audio(&normalize_url(url), payload)
        .await
    {
        debug!(%error, "audio patch dropped");
    }
}

/// Overwrite the counts of every id-bearing article from one batched lookup.
/// Articles without a durable id get zeroes. If the lookup fails the list is
/// left exactly as the source provided it — enrichment never blocks display.
pub async fn enrich_counts(store: &dyn Store, articles: &mut [Article]) {
    let ids: Vec<_> = articles.iter().filter_map(Article::id).collect();
    match engagement::batch_counts(store, &ids).await {
        Ok(counts) => {
            for article in articles.iter_mut() {
                let id = article.id();
                let content = article.content_mut();
                match id {
                    Some(id) => {
                        content.like_count = counts.likes.get(&id).copied().unwrap_or(0);
                        content.dislike_count = counts.dislikes.get(&id).copied().unwrap_or(0);
                    }
                    None => {
                        content.like_count = 0;
                        content.dislike_count = 0;
                    }
                }
            }
        }
        Err(error) => warn!(%error, "count enrichment skipped"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::memory::MemoryStore;
    use crate::db::{Store, VoteKind};
    use uuid::Uuid;

    fn draft(url: &str, title: &str) -> ArticleContent {
        ArticleContent {
            url: url.to_string(),
            title: title.to_string(),
            ..ArticleContent::default()
        }
    }

    #[tokio::test]
    async fn save_batch_collapses_url_spellings_into_one_row() {
        let store = MemoryStore::new();

        let saved = save_batch(
            &store,
            "Scienza",
            vec![
                draft("https://x.com/a/", "first"),
                draft("http://x.com/a", "second"),
                draft("https://x.com/b", "third"),
            ],
        )
        .await;

        assert_eq!(saved.len(), 2);
        assert_eq!(store.article_count(), 2);

        let row = store.find_article_by_url("x.com/a").await.unwrap().unwrap();
        assert_eq!(row.content.url, "x.com/a");
        // First occurrence wins.
        assert_eq!(row.content.title, "first");
        assert_eq!(row.content.category.as_deref(), Some("Scienza"));
    }

    #[tokio::test]
    async fn save_batch_upserts_instead_of_duplicating() {
        let store = MemoryStore::new();
        store.seed_article(draft("x.com/a", "old title"));

        let saved = save_batch(&store, "Generale", vec![draft("https://x.com/a", "new title")]).await;

        assert_eq!(saved.len(), 1);
        assert_eq!(store.article_count(), 1);
        assert_eq!(saved[0].content.title, "new title");
    }

    #[tokio::test]
    async fn save_batch_survives_a_dead_store() {
        let store = MemoryStore::new();
        store.go_offline();

        let saved = save_batch(&store, "Generale", vec![draft("https://x.com/a", "t")]).await;

        assert!(saved.is_empty());
    }

    #[tokio::test]
    async fn cached_feed_is_newest_first_and_deduplicated() {
        let store = MemoryStore::new();
        let mut older = draft("x.com/a", "older");
        older.category = Some("Generale".to_string());
        let mut newer = draft("x.com/b", "newer");
        newer.category = Some("Generale".to_string());
        store.seed_article(older);
        store.seed_article(newer);

        let feed = cached_feed(&store, "Generale").await.unwrap();

        assert_eq!(feed.len(), 2);
        assert_eq!(feed[0].content.title, "newer");
    }

    #[tokio::test]
    async fn enrich_counts_overwrites_from_the_store() {
        let store = MemoryStore::new();
        let row = store.seed_article(draft("x.com/a", "t"));
        let voter = Uuid::new_v4();
        store
            .insert_vote(VoteKind::Like, row.id, voter)
            .await
            .unwrap();

        let mut stale = row.clone();
        stale.content.like_count = 7;
        stale.content.dislike_count = 7;
        let mut transient = Article::Transient(draft("x.com/b", "t"));
        transient.content_mut().like_count = 3;

        let mut list = vec![Article::Persisted(stale), transient];
        enrich_counts(&store, &mut list).await;

        assert_eq!(list[0].content().like_count, 1);
        assert_eq!(list[0].content().dislike_count, 0);
        // No durable id: counts default to zero.
        assert_eq!(list[1].content().like_count, 0);
    }

    #[tokio::test]
    async fn enrichment_failure_leaves_the_list_untouched() {
        let store = MemoryStore::new();
        let row = store.seed_article(draft("x.com/a", "t"));
        store.go_offline();

        let mut stale = row.clone();
        stale.content.like_count = 7;
        let mut list = vec![Article::Persisted(stale)];
        enrich_counts(&store, &mut list).await;

        assert_eq!(list[0].content().like_count, 7);
    }
}
