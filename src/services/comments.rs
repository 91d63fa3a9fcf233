//! Append/remove-only comment ledger.

use tracing::warn;
use uuid::Uuid;

use crate::db::{Store, StoreResult};
use crate::models::comment::{Comment, NewComment};

/// Comments for an article, newest first. Store failures read as an empty
/// list; the feed must stay usable while the ledger is unreachable.
pub async fn list(store: &dyn Store, article_id: Uuid) -> Vec<Comment> {
    match store.comments_for_article(article_id).await {
        Ok(comments) => comments,
        Err(error) => {
            warn!(%error, %article_id, "comment list unavailable");
            Vec::new()
        }
    }
}

/// Post a comment. The author's profile row is ensured first so the
/// denormalized username snapshot is always backed by a real user record.
/// This is the one gesture whose failures the caller surfaces.
pub async fn add(store: &dyn Store, comment: NewComment) -> StoreResult<Comment> {
    store
        .ensure_profile(comment.user_id, &comment.username)
        .await?;
    store.insert_comment(&comment).await
}

/// Conditional delete: only removes the row when `user_id` is the stored
/// author. The route layer already hides the control from non-authors; a
/// mismatching call deletes nothing and is not an error.
pub async fn delete(store: &dyn Store, comment_id: Uuid, user_id: Uuid) {
    if let Err(error) = store.delete_comment(comment_id, user_id).await {
        warn!(%error, %comment_id, "comment delete dropped");
    }
}
