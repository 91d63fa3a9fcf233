//! In-memory [`Store`] used by unit tests. Mirrors the relational semantics
//! (unique url, composite vote/favorite keys, conditional deletes) and counts
//! the calls the identity and batch-count contracts care about.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use crate::db::{Store, StoreError, StoreResult, VoteKind};
use crate::models::article::{ArticleContent, PersistedArticle};
use crate::models::category::{Category, NewCategory};
use crate::models::comment::{Comment, NewComment};

#[derive(Default)]
struct Inner {
    articles: Vec<PersistedArticle>,
    votes: HashMap<VoteKind, HashSet<(Uuid, Uuid)>>,
    favorites: HashSet<(Uuid, Uuid)>,
    comments: Vec<Comment>,
    profiles: HashMap<Uuid, String>,
    categories: Vec<Category>,
}

#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
    pub article_lookups: AtomicUsize,
    pub article_upserts: AtomicUsize,
    pub bulk_vote_reads: AtomicUsize,
    failing: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every subsequent operation fails as if the store were unreachable.
    pub fn go_offline(&self) {
        self.failing.store(true, Ordering::SeqCst);
    }

    fn check_online(&self) -> StoreResult<()> {
        if self.failing.load(Ordering::SeqCst) {
            Err(StoreError::Unavailable("simulated outage".to_string()))
        } else {
            Ok(())
        }
    }

    pub fn article_count(&self) -> usize {
        self.inner.lock().unwrap().articles.len()
    }

    pub fn profile_name(&self, user_id: Uuid) -> Option<String> {
        self.inner.lock().unwrap().profiles.get(&user_id).cloned()
    }

    pub fn seed_article(&self, content: ArticleContent) -> PersistedArticle {
        let row = PersistedArticle {
            id: Uuid::new_v4(),
            content: ArticleContent {
                created_at: Some(Utc::now().to_rfc3339()),
                ..content
            },
        };
        self.inner.lock().unwrap().articles.push(row.clone());
        row
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn find_article_by_url(&self, url_key: &str) -> StoreResult<Option<PersistedArticle>> {
        self.check_online()?;
        self.article_lookups.fetch_add(1, Ordering::SeqCst);
        let inner = self.inner.lock().unwrap();
        Ok(inner
            .articles
            .iter()
            .find(|row| row.content.url == url_key)
            .cloned())
    }

    async fn recent_articles(
        &self,
        category: &str,
        limit: usize,
    ) -> StoreResult<Vec<PersistedArticle>> {
        self.check_online()?;
        let inner = self.inner.lock().unwrap();
        Ok(inner
            .articles
            .iter()
            .rev()
            .filter(|row| row.content.category.as_deref() == Some(category))
            .take(limit)
            .cloned()
            .collect())
    }

    async fn upsert_article(&self, content: &ArticleContent) -> StoreResult<PersistedArticle> {
        self.check_online()?;
        self.article_upserts.fetch_add(1, Ordering::SeqCst);
        let mut inner = self.inner.lock().unwrap();
        if let Some(row) = inner
            .articles
            .iter_mut()
            .find(|row| row.content.url == content.url)
        {
            let created_at = row.content.created_at.clone();
            row.content = ArticleContent {
                created_at,
                ..content.clone()
            };
            return Ok(row.clone());
        }
        let row = PersistedArticle {
            id: Uuid::new_v4(),
            content: ArticleContent {
                created_at: Some(Utc::now().to_rfc3339()),
                ..content.clone()
            },
        };
        inner.articles.push(row.clone());
        Ok(row)
    }

    async fn update_article_image(&self, url_key: &str, image_url: &str) -> StoreResult<()> {
        self.check_online()?;
        let mut inner = self.inner.lock().unwrap();
        if let Some(row) = inner
            .articles
            .iter_mut()
            .find(|row| row.content.url == url_key)
        {
            row.content.image_url = Some(image_url.to_string());
        }
        Ok(())
    }

    async fn update_article_audio(&self, url_key: &str, payload: &str) -> StoreResult<()> {
        self.check_online()?;
        let mut inner = self.inner.lock().unwrap();
        if let Some(row) = inner
            .articles
            .iter_mut()
            .find(|row| row.content.url == url_key)
        {
            row.content.audio_payload = Some(payload.to_string());
        }
        Ok(())
    }

    async fn insert_vote(
        &self,
        kind: VoteKind,
        article_id: Uuid,
        user_id: Uuid,
    ) -> StoreResult<()> {
        self.check_online()?;
        let mut inner = self.inner.lock().unwrap();
        inner
            .votes
            .entry(kind)
            .or_default()
            .insert((article_id, user_id));
        Ok(())
    }

    async fn delete_vote(
        &self,
        kind: VoteKind,
        article_id: Uuid,
        user_id: Uuid,
    ) -> StoreResult<()> {
        self.check_online()?;
        let mut inner = self.inner.lock().unwrap();
        inner
            .votes
            .entry(kind)
            .or_default()
            .remove(&(article_id, user_id));
        Ok(())
    }

    async fn vote_exists(
        &self,
        kind: VoteKind,
        article_id: Uuid,
        user_id: Uuid,
    ) -> StoreResult<bool> {
        self.check_online()?;
        let inner = self.inner.lock().unwrap();
        Ok(inner
            .votes
            .get(&kind)
            .is_some_and(|pairs| pairs.contains(&(article_id, user_id))))
    }

    async fn count_votes(&self, kind: VoteKind, article_id: Uuid) -> StoreResult<i64> {
        self.check_online()?;
        let inner = self.inner.lock().unwrap();
        Ok(inner
            .votes
            .get(&kind)
            .map(|pairs| pairs.iter().filter(|(a, _)| *a == article_id).count())
            .unwrap_or(0) as i64)
    }

    async fn votes_for_articles(
        &self,
        kind: VoteKind,
        article_ids: &[Uuid],
    ) -> StoreResult<Vec<Uuid>> {
        self.check_online()?;
        self.bulk_vote_reads.fetch_add(1, Ordering::SeqCst);
        let wanted: HashSet<&Uuid> = article_ids.iter().collect();
        let inner = self.inner.lock().unwrap();
        Ok(inner
            .votes
            .get(&kind)
            .map(|pairs| {
                pairs
                    .iter()
                    .filter(|(article, _)| wanted.contains(article))
                    .map(|(article, _)| *article)
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn insert_favorite(&self, article_id: Uuid, user_id: Uuid) -> StoreResult<()> {
        self.check_online()?;
        let mut inner = self.inner.lock().unwrap();
        inner.favorites.insert((article_id, user_id));
        Ok(())
    }

    async fn delete_favorite(&self, article_id: Uuid, user_id: Uuid) -> StoreResult<()> {
        self.check_online()?;
        let mut inner = self.inner.lock().unwrap();
        inner.favorites.remove(&(article_id, user_id));
        Ok(())
    }

    async fn favorite_exists(&self, article_id: Uuid, user_id: Uuid) -> StoreResult<bool> {
        self.check_online()?;
        let inner = self.inner.lock().unwrap();
        Ok(inner.favorites.contains(&(article_id, user_id)))
    }

    async fn favorites_for_user(&self, user_id: Uuid) -> StoreResult<Vec<Uuid>> {
        self.check_online()?;
        let inner = self.inner.lock().unwrap();
        Ok(inner
            .favorites
            .iter()
            .filter(|(_, user)| *user == user_id)
            .map(|(article, _)| *article)
            .collect())
    }

    async fn comments_for_article(&self, article_id: Uuid) -> StoreResult<Vec<Comment>> {
        self.check_online()?;
        let inner = self.inner.lock().unwrap();
        Ok(inner
            .comments
            .iter()
            .rev()
            .filter(|comment| comment.article_id == article_id)
            .cloned()
            .collect())
    }

    async fn insert_comment(&self, comment: &NewComment) -> StoreResult<Comment> {
        self.check_online()?;
        let row = Comment {
            id: Uuid::new_v4(),
            article_id: comment.article_id,
            user_id: comment.user_id,
            username: comment.username.clone(),
            text: comment.text.clone(),
            created_at: Some(Utc::now().to_rfc3339()),
        };
        self.inner.lock().unwrap().comments.push(row.clone());
        Ok(row)
    }

    async fn delete_comment(&self, comment_id: Uuid, user_id: Uuid) -> StoreResult<()> {
        self.check_online()?;
        let mut inner = self.inner.lock().unwrap();
        inner
            .comments
            .retain(|comment| !(comment.id == comment_id && comment.user_id == user_id));
        Ok(())
    }

    async fn ensure_profile(&self, user_id: Uuid, username: &str) -> StoreResult<()> {
        self.check_online()?;
        let mut inner = self.inner.lock().unwrap();
        inner
            .profiles
            .entry(user_id)
            .or_insert_with(|| username.to_string());
        Ok(())
    }

    async fn categories_for_user(&self, user_id: Option<Uuid>) -> StoreResult<Vec<Category>> {
        self.check_online()?;
        let inner = self.inner.lock().unwrap();
        Ok(inner
            .categories
            .iter()
            .filter(|category| category.user_id.is_none() || category.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn insert_category(&self, category: &NewCategory) -> StoreResult<Category> {
        self.check_online()?;
        let row = Category {
            id: Uuid::new_v4(),
            label: category.label.clone(),
            value: category.value.clone(),
            user_id: category.user_id,
        };
        self.inner.lock().unwrap().categories.push(row.clone());
        Ok(row)
    }

    async fn delete_category(&self, category_id: Uuid, user_id: Uuid) -> StoreResult<()> {
        self.check_online()?;
        let mut inner = self.inner.lock().unwrap();
        inner
            .categories
            .retain(|category| !(category.id == category_id && category.user_id == Some(user_id)));
        Ok(())
    }
}
