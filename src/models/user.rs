use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Profile row backing the denormalized usernames on comments. `id` is the
/// Supabase auth user id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    pub id: Uuid,
    pub username: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
}
