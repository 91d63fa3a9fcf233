use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::utils::ids::parse_durable_id;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Claims {
    pub iss: String,
    pub sub: String,
    pub exp: usize,
    pub iat: usize,
    pub email: String,
    pub role: String,
    #[serde(default)]
    pub user_metadata: UserMetadata,
    pub session_id: String,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct UserMetadata {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub avatar_url: Option<String>,
}

impl Claims {
    /// The authenticated user's durable id. Supabase issues the subject as a
    /// hyphenated uuid; anything else means the token is not usable here.
    pub fn user_id(&self) -> Option<Uuid> {
        parse_durable_id(&self.sub)
    }

    /// Display name for denormalized snapshots: the chosen username when the
    /// profile has one, otherwise the mailbox part of the email.
    pub fn display_name(&self) -> String {
        if let Some(username) = &self.user_metadata.username {
            if !username.trim().is_empty() {
                return username.trim().to_string();
            }
        }
        self.email
            .split('@')
            .next()
            .unwrap_or(&self.email)
            .to_string()
    }
}
