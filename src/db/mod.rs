//! Row-level access to the Supabase relations. Handlers and services depend
//! on the [`Store`] trait, never on the PostgREST client directly, so the
//! engagement and identity logic can be exercised against an in-memory store.

pub mod supabase;

#[cfg(test)]
pub mod memory;

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::models::article::{ArticleContent, PersistedArticle};
use crate::models::category::{Category, NewCategory};
use crate::models::comment::{Comment, NewComment};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("store response could not be decoded: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("store rejected the operation ({status}): {body}")]
    Rejected { status: u16, body: String },
    #[error("store returned no row for a write that expected one")]
    MissingRow,
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Which of the two mutually exclusive vote relations an operation targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VoteKind {
    Like,
    Dislike,
}

impl VoteKind {
    pub fn relation(self) -> &'static str {
        match self {
            VoteKind::Like => "Likes",
            VoteKind::Dislike => "Dislikes",
        }
    }

    pub fn opposite(self) -> VoteKind {
        match self {
            VoteKind::Like => VoteKind::Dislike,
            VoteKind::Dislike => VoteKind::Like,
        }
    }
}

#[async_trait]
pub trait Store: Send + Sync {
    // Articles (unique on url)

    async fn find_article_by_url(&self, url_key: &str) -> StoreResult<Option<PersistedArticle>>;

    /// Most recently created rows for a category, newest first.
    async fn recent_articles(
        &self,
        category: &str,
        limit: usize,
    ) -> StoreResult<Vec<PersistedArticle>>;

    /// Insert keyed on `url`; a conflict updates the existing row. The
    /// returned row carries the durable id either way.
    async fn upsert_article(&self, content: &ArticleContent) -> StoreResult<PersistedArticle>;

    async fn update_article_image(&self, url_key: &str, image_url: &str) -> StoreResult<()>;
    async fn update_article_audio(&self, url_key: &str, payload: &str) -> StoreResult<()>;

    // Likes / Dislikes (composite unique on article + user)

    async fn insert_vote(&self, kind: VoteKind, article_id: Uuid, user_id: Uuid)
        -> StoreResult<()>;
    async fn delete_vote(&self, kind: VoteKind, article_id: Uuid, user_id: Uuid)
        -> StoreResult<()>;
    async fn vote_exists(
        &self,
        kind: VoteKind,
        article_id: Uuid,
        user_id: Uuid,
    ) -> StoreResult<bool>;
    async fn count_votes(&self, kind: VoteKind, article_id: Uuid) -> StoreResult<i64>;

    /// One row per vote over any of the given articles, as the voted article
    /// id. A single bulk read regardless of how many ids are passed.
    async fn votes_for_articles(
        &self,
        kind: VoteKind,
        article_ids: &[Uuid],
    ) -> StoreResult<Vec<Uuid>>;

    // Favorites (composite unique on article + user; duplicate insert is ok)

    async fn insert_favorite(&self, article_id: Uuid, user_id: Uuid) -> StoreResult<()>;
    async fn delete_favorite(&self, article_id: Uuid, user_id: Uuid) -> StoreResult<()>;
    async fn favorite_exists(&self, article_id: Uuid, user_id: Uuid) -> StoreResult<bool>;
    async fn favorites_for_user(&self, user_id: Uuid) -> StoreResult<Vec<Uuid>>;

    // Comments

    async fn comments_for_article(&self, article_id: Uuid) -> StoreResult<Vec<Comment>>;
    async fn insert_comment(&self, comment: &NewComment) -> StoreResult<Comment>;

    /// Delete filtered on id AND author; a non-author call matches nothing.
    async fn delete_comment(&self, comment_id: Uuid, user_id: Uuid) -> StoreResult<()>;

    // Profiles

    async fn ensure_profile(&self, user_id: Uuid, username: &str) -> StoreResult<()>;

    // Categories

    /// Global categories plus, when a user is given, that user's own.
    async fn categories_for_user(&self, user_id: Option<Uuid>) -> StoreResult<Vec<Category>>;
    async fn insert_category(&self, category: &NewCategory) -> StoreResult<Category>;

    /// Delete filtered on id AND owner; global rows never match.
    async fn delete_category(&self, category_id: Uuid, user_id: Uuid) -> StoreResult<()>;
}
