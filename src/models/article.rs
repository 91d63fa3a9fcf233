use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

use crate::utils::ids::parse_durable_id;

/// Everything a news article carries besides its durable identity. Counts are
/// derived from the vote relations and overwritten on enrichment; `created_at`
/// is assigned by the store.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ArticleContent {
    pub url: String,
    pub title: String,
    #[serde(default)]
    pub summary: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub audio_payload: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sentiment_score: Option<f64>,
    #[serde(default)]
    pub like_count: i64,
    #[serde(default)]
    pub dislike_count: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

/// A store row: identity plus content.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersistedArticle {
    #[serde(deserialize_with = "deserialize_article_id")]
    pub id: Uuid,
    #[serde(flatten)]
    pub content: ArticleContent,
}

/// An article is either a transient fetch result or a persisted row. The
/// variants deserialize untagged: a payload whose `id` passes the durable
/// identifier shape is persisted, anything else (missing or malformed id)
/// is transient. `services::identity::resolve` is the only place a transient
/// article gains an id.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Article {
    Persisted(PersistedArticle),
    Transient(ArticleContent),
}

impl Article {
    pub fn id(&self) -> Option<Uuid> {
        match self {
            Article::Persisted(row) => Some(row.id),
            Article::Transient(_) => None,
        }
    }

    pub fn url(&self) -> &str {
        &self.content().url
    }

    pub fn content(&self) -> &ArticleContent {
        match self {
            Article::Persisted(row) => &row.content,
            Article::Transient(content) => content,
        }
    }

    pub fn content_mut(&mut self) -> &mut ArticleContent {
        match self {
            Article::Persisted(row) => &mut row.content,
            Article::Transient(content) => content,
        }
    }

    /// Stamp a resolved id onto an in-memory copy. Callers must only pass ids
    /// obtained from identity resolution for this same logical article.
    pub fn with_id(self, id: Uuid) -> Article {
        match self {
            Article::Persisted(row) => Article::Persisted(row),
            Article::Transient(content) => Article::Persisted(PersistedArticle { id, content }),
        }
    }
}

impl From<PersistedArticle> for Article {
    fn from(row: PersistedArticle) -> Self {
        Article::Persisted(row)
    }
}

fn deserialize_article_id<'de, D>(deserializer: D) -> Result<Uuid, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_durable_id(&raw)
        .ok_or_else(|| serde::de::Error::custom("identifier is not a persisted article id"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn payload_with_valid_id_deserializes_as_persisted() {
        let article: Article = serde_json::from_value(json!({
            "id": "6f1c2a9b-8c3d-4e5f-9a0b-1c2d3e4f5a6b",
            "url": "https://x.com/a",
            "title": "Good news"
        }))
        .unwrap();
        assert!(article.id().is_some());
    }

    #[test]
    fn payload_without_id_deserializes_as_transient() {
        let article: Article = serde_json::from_value(json!({
            "url": "https://x.com/a",
            "title": "Good news"
        }))
        .unwrap();
        assert!(article.id().is_none());
    }

    #[test]
    fn payload_with_malformed_id_deserializes_as_transient() {
        let article: Article = serde_json::from_value(json!({
            "id": "not-a-durable-identifier",
            "url": "https://x.com/a",
            "title": "Good news"
        }))
        .unwrap();
        assert!(article.id().is_none());
    }

    #[test]
    fn with_id_promotes_only_transient_articles() {
        let transient: Article = serde_json::from_value(json!({
            "url": "https://x.com/a",
            "title": "Good news"
        }))
        .unwrap();
        let id = Uuid::new_v4();
        let promoted = transient.with_id(id);
        assert_eq!(promoted.id(), Some(id));

        let other = Uuid::new_v4();
        assert_eq!(promoted.with_id(other).id(), Some(id));
    }
}
