use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A feed scope. `label` names the feed in the UI and keys the article cache;
/// `value` is the search text handed to the generator. Rows with a null
/// `user_id` are global and cannot be deleted through the API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    pub id: Uuid,
    pub label: String,
    pub value: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<Uuid>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewCategory {
    pub label: String,
    pub value: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<Uuid>,
}
