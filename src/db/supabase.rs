use async_trait::async_trait;
use postgrest::Postgrest;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use crate::db::{Store, StoreError, StoreResult, VoteKind};
use crate::models::article::{ArticleContent, PersistedArticle};
use crate::models::category::{Category, NewCategory};
use crate::models::comment::{Comment, NewComment};
use crate::models::user::Profile;
use crate::utils::config::Config;

/// PostgREST-backed [`Store`]. Writes go through the service role key; row
/// security is enforced upstream of this service.
pub struct SupabaseStore {
    client: Postgrest,
}

#[derive(Deserialize)]
struct VoteRow {
    article_id: Uuid,
}

impl SupabaseStore {
    pub fn new(config: &Config) -> Self {
        let client = Postgrest::new(format!("{}/rest/v1", config.supabase_project_url))
            .insert_header("apikey", &config.supabase_service_role_key)
            .insert_header(
                "Authorization",
                format!("Bearer {}", config.supabase_service_role_key),
            );
        Self { client }
    }

    async fn rows<T: DeserializeOwned>(response: reqwest::Response) -> StoreResult<Vec<T>> {
        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(StoreError::Rejected {
                status: status.as_u16(),
                body,
            });
        }
        Ok(serde_json::from_str(&body)?)
    }

    async fn accept(response: reqwest::Response) -> StoreResult<()> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(StoreError::Rejected {
                status: status.as_u16(),
                body,
            });
        }
        Ok(())
    }
}

#[async_trait]
impl Store for SupabaseStore {
    async fn find_article_by_url(&self, url_key: &str) -> StoreResult<Option<PersistedArticle>> {
        let response = self
            .client
            .from("Articles")
            .select("*")
            .eq("url", url_key)
            .limit(1)
            .execute()
            .await?;
        let rows: Vec<PersistedArticle> = Self::rows(response).await?;
        Ok(rows.into_iter().next())
    }

    async fn recent_articles(
        &self,
        category: &str,
        limit: usize,
    ) -> StoreResult<Vec<PersistedArticle>> {
        let response = self
            .client
            .from("Articles")
            .select("*")
            .eq("category", category)
            .order("created_at.desc")
            .limit(limit)
            .execute()
            .await?;
        Self::rows(response).await
    }

    async fn upsert_article(&self, content: &ArticleContent) -> StoreResult<PersistedArticle> {
        let response = self
            .client
            .from("Articles")
            .upsert(serde_json::to_string(content)?)
            .on_conflict("url")
            .execute()
            .await?;
        let rows: Vec<PersistedArticle> = Self::rows(response).await?;
        rows.into_iter().next().ok_or(StoreError::MissingRow)
    }

    async fn update_article_image(&self, url_key: &str, image_url: &str) -> StoreResult<()> {
        let response = self
            .client
            .from("Articles")
            .eq("url", url_key)
            .update(json!({ "image_url": image_url }).to_string())
            .execute()
            .await?;
        Self::accept(response).await
    }

    async fn update_article_audio(&self, url_key: &str, payload: &str) -> StoreResult<()> {
        let response = self
            .client
            .from("Articles")
            .eq("url", url_key)
            .update(json!({ "audio_payload": payload }).to_string())
            .execute()
            .await?;
        Self::accept(response).await
    }

    async fn insert_vote(
        &self,
        kind: VoteKind,
        article_id: Uuid,
        user_id: Uuid,
    ) -> StoreResult<()> {
        let body = json!({ "article_id": article_id, "user_id": user_id });
        let response = self
            .client
            .from(kind.relation())
            .insert(body.to_string())
            .execute()
            .await?;
        Self::accept(response).await
    }

    async fn delete_vote(
        &self,
        kind: VoteKind,
        article_id: Uuid,
        user_id: Uuid,
    ) -> StoreResult<()> {
        let response = self
            .client
            .from(kind.relation())
            .eq("article_id", article_id.to_string())
            .eq("user_id", user_id.to_string())
            .delete()
            .execute()
            .await?;
        Self::accept(response).await
    }

    async fn vote_exists(
        &self,
        kind: VoteKind,
        article_id: Uuid,
        user_id: Uuid,
    ) -> StoreResult<bool> {
        let response = self
            .client
            .from(kind.relation())
            .select("article_id")
            .eq("article_id", article_id.to_string())
            .eq("user_id", user_id.to_string())
            .limit(1)
            .execute()
            .await?;
        let rows: Vec<VoteRow> = Self::rows(response).await?;
        Ok(!rows.is_empty())
    }

    async fn count_votes(&self, kind: VoteKind, article_id: Uuid) -> StoreResult<i64> {
        let response = self
            .client
            .from(kind.relation())
            .select("article_id")
            .eq("article_id", article_id.to_string())
            .execute()
            .await?;
        let rows: Vec<VoteRow> = Self::rows(response).await?;
        Ok(rows.len() as i64)
    }

    async fn votes_for_articles(
        &self,
        kind: VoteKind,
        article_ids: &[Uuid],
    ) -> StoreResult<Vec<Uuid>> {
        if article_ids.is_empty() {
            return Ok(Vec::new());
        }
        let ids: Vec<String> = article_ids.iter().map(Uuid::to_string).collect();
        let response = self
            .client
            .from(kind.relation())
            .select("article_id")
            .in_("article_id", ids)
            .execute()
            .await?;
        let rows: Vec<VoteRow> = Self::rows(response).await?;
        Ok(rows.into_iter().map(|row| row.article_id).collect())
    }

    async fn insert_favorite(&self, article_id: Uuid, user_id: Uuid) -> StoreResult<()> {
        // Upsert on the composite key: re-favoriting an already favorited
        // article is success, not a conflict error.
        let body = json!({ "article_id": article_id, "user_id": user_id });
        let response = self
            .client
            .from("Favorites")
            .upsert(body.to_string())
            .on_conflict("article_id,user_id")
            .execute()
            .await?;
        Self::accept(response).await
    }

    async fn delete_favorite(&self, article_id: Uuid, user_id: Uuid) -> StoreResult<()> {
        let response = self
            .client
            .from("Favorites")
            .eq("article_id", article_id.to_string())
            .eq("user_id", user_id.to_string())
            .delete()
            .execute()
            .await?;
        Self::accept(response).await
    }

    async fn favorite_exists(&self, article_id: Uuid, user_id: Uuid) -> StoreResult<bool> {
        let response = self
            .client
            .from("Favorites")
            .select("article_id")
            .eq("article_id", article_id.to_string())
            .eq("user_id", user_id.to_string())
            .limit(1)
            .execute()
            .await?;
        let rows: Vec<VoteRow> = Self::rows(response).await?;
        Ok(!rows.is_empty())
    }

    async fn favorites_for_user(&self, user_id: Uuid) -> StoreResult<Vec<Uuid>> {
        let response = self
            .client
            .from("Favorites")
            .select("article_id")
            .eq("user_id", user_id.to_string())
            .execute()
            .await?;
        let rows: Vec<VoteRow> = Self::rows(response).await?;
        Ok(rows.into_iter().map(|row| row.article_id).collect())
    }

    async fn comments_for_article(&self, article_id: Uuid) -> StoreResult<Vec<Comment>> {
        let response = self
            .client
            .from("Comments")
            .select("*")
            .eq("article_id", article_id.to_string())
            .order("created_at.desc")
            .execute()
            .await?;
        Self::rows(response).await
    }

    async fn insert_comment(&self, comment: &NewComment) -> StoreResult<Comment> {
        let body = json!({
            "article_id": comment.article_id,
            "user_id": comment.user_id,
            "username": comment.username,
            "text": comment.text,
        });
        let response = self
            .client
            .from("Comments")
            .insert(body.to_string())
            .execute()
            .await?;
        let rows: Vec<Comment> = Self::rows(response).await?;
        rows.into_iter().next().ok_or(StoreError::MissingRow)
    }

    async fn delete_comment(&self, comment_id: Uuid, user_id: Uuid) -> StoreResult<()> {
        let response = self
            .client
            .from("Comments")
            .eq("id", comment_id.to_string())
            .eq("user_id", user_id.to_string())
            .delete()
            .execute()
            .await?;
        Self::accept(response).await
    }

    async fn ensure_profile(&self, user_id: Uuid, username: &str) -> StoreResult<()> {
        let lookup = self
            .client
            .from("Profiles")
            .select("*")
            .eq("id", user_id.to_string())
            .limit(1)
            .execute()
            .await?;
        let rows: Vec<Profile> = Self::rows(lookup).await?;
        if !rows.is_empty() {
            return Ok(());
        }
        let body = json!({ "id": user_id, "username": username });
        let response = self
            .client
            .from("Profiles")
            .insert(body.to_string())
            .execute()
            .await?;
        Self::accept(response).await
    }

    async fn categories_for_user(&self, user_id: Option<Uuid>) -> StoreResult<Vec<Category>> {
        let response = self
            .client
            .from("Categories")
            .select("*")
            .is("user_id", "null")
            .execute()
            .await?;
        let mut categories: Vec<Category> = Self::rows(response).await?;

        if let Some(user_id) = user_id {
            let response = self
                .client
                .from("Categories")
                .select("*")
                .eq("user_id", user_id.to_string())
                .execute()
                .await?;
            let own: Vec<Category> = Self::rows(response).await?;
            categories.extend(own);
        }
        Ok(categories)
    }

    async fn insert_category(&self, category: &NewCategory) -> StoreResult<Category> {
        let response = self
            .client
            .from("Categories")
            .insert(serde_json::to_string(category)?)
            .execute()
            .await?;
        let rows: Vec<Category> = Self::rows(response).await?;
        rows.into_iter().next().ok_or(StoreError::MissingRow)
    }

    async fn delete_category(&self, category_id: Uuid, user_id: Uuid) -> StoreResult<()> {
        let response = self
            .client
            .from("Categories")
            .eq("id", category_id.to_string())
            .eq("user_id", user_id.to_string())
            .delete()
            .execute()
            .await?;
        Self::accept(response).await
    }
}
