use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A posted comment. `username` is a snapshot of the author's display name at
/// post time; rows are immutable except for author-initiated deletion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comment {
    pub id: Uuid,
    pub article_id: Uuid,
    pub user_id: Uuid,
    pub username: String,
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NewComment {
    pub article_id: Uuid,
    pub user_id: Uuid,
    pub username: String,
    pub text: String,
}
