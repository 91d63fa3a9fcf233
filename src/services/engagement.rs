//! Vote and favorite toggles plus count reads. Mutual exclusion between the
//! two vote kinds is enforced by ordering inside a single toggle: the
//! opposite vote is removed before the toggled kind is examined.

use std::collections::HashMap;

use uuid::Uuid;

use crate::db::{Store, StoreResult, VoteKind};

#[derive(Debug, Default)]
pub struct BatchCounts {
    pub likes: HashMap<Uuid, i64>,
    pub dislikes: HashMap<Uuid, i64>,
}

/// Flip the user's vote of the given kind and report whether it is now
/// active. Any vote of the opposite kind is removed first, so at most one of
/// like/dislike exists for the pair when the call returns.
pub async fn toggle_vote(
    store: &dyn Store,
    kind: VoteKind,
    article_id: Uuid,
    user_id: Uuid,
) -> StoreResult<bool> {
    store
        .delete_vote(kind.opposite(), article_id, user_id)
        .await?;
    if store.vote_exists(kind, article_id, user_id).await? {
        store.delete_vote(kind, article_id, user_id).await?;
        Ok(false)
    } else {
        store.insert_vote(kind, article_id, user_id).await?;
        Ok(true)
    }
}

/// Authoritative like/dislike cardinalities for one article, re-read from the
/// store rather than derived from a local delta.
pub async fn vote_counts(store: &dyn Store, article_id: Uuid) -> StoreResult<(i64, i64)> {
    let likes = store.count_votes(VoteKind::Like, article_id).await?;
    let dislikes = store.count_votes(VoteKind::Dislike, article_id).await?;
    Ok((likes, dislikes))
}

/// Counts for many articles in exactly two bulk reads, one per vote
/// relation. Ids absent from the result simply have no votes.
pub async fn batch_counts(store: &dyn Store, article_ids: &[Uuid]) -> StoreResult<BatchCounts> {
    if article_ids.is_empty() {
        return Ok(BatchCounts::default());
    }
    let mut counts = BatchCounts::default();
    for article in store
        .votes_for_articles(VoteKind::Like, article_ids)
        .await?
    {
        *counts.likes.entry(article).or_insert(0) += 1;
    }
    for article in store
        .votes_for_articles(VoteKind::Dislike, article_ids)
        .await?
    {
        *counts.dislikes.entry(article).or_insert(0) += 1;
    }
    Ok(counts)
}

/// Flip favorite membership and report whether the article is now favorited.
/// Inserting an already present pair is success (idempotent add).
pub async fn toggle_favorite(
    store: &dyn Store,
    article_id: Uuid,
    user_id: Uuid,
) -> StoreResult<bool> {
    if store.favorite_exists(article_id, user_id).await? {
        store.delete_favorite(article_id, user_id).await?;
        Ok(false)
    } else {
        store.insert_favorite(article_id, user_id).await?;
        Ok(true)
    }
}
