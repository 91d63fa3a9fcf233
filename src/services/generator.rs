//! External article generator: a sentiment-filtered search against the World
//! News API. Returned articles are transient — no durable id, counts at zero.

use reqwest::Client;
use serde_json::Value;
use url::Url;

use crate::models::article::ArticleContent;

const SEARCH_ENDPOINT: &str = "https://api.worldnewsapi.com/search-news";
const MIN_SENTIMENT: &str = "0.4";

pub async fn fetch_positive_news(
    client: &Client,
    api_key: &str,
    query: &str,
    label: &str,
) -> Result<Vec<ArticleContent>, reqwest::Error> {
    let days_ago = chrono::Utc::now() - chrono::Duration::days(14);
    let rfc_date = days_ago.to_rfc3339();
    let since = rfc_date.split('T').next().unwrap_or("");

    let response = client
        .get(SEARCH_ENDPOINT)
        .query(&[
            ("text", query),
            ("language", "en"),
            ("min-sentiment", MIN_SENTIMENT),
            ("earliest-publish-date", since),
            ("number", "40"),
            ("sort", "publish-time"),
            ("sort-direction", "DESC"),
        ])
        .header("x-api-key", api_key)
        .send()
        .await?
        .error_for_status()?;

    let payload: Value = response.json().await?;
    Ok(collect_articles(&payload, label))
}

fn collect_articles(payload: &Value, label: &str) -> Vec<ArticleContent> {
    let Some(items) = payload["news"].as_array() else {
        return Vec::new();
    };

    let mut drafts = Vec::new();
    for item in items {
        let Some(url) = item["url"].as_str() else {
            continue;
        };
        let Some(title) = item["title"].as_str() else {
            continue;
        };
        drafts.push(ArticleContent {
            url: url.to_string(),
            title: title.to_string(),
            summary: item["summary"]
                .as_str()
                .or_else(|| item["text"].as_str())
                .unwrap_or_default()
                .to_string(),
            source: Url::parse(url)
                .ok()
                .and_then(|parsed| parsed.host_str().map(str::to_string)),
            date: item["publish_date"].as_str().map(str::to_string),
            category: Some(label.to_string()),
            image_url: item["image"].as_str().map(str::to_string),
            audio_payload: None,
            sentiment_score: item["sentiment"].as_f64(),
            like_count: 0,
            dislike_count: 0,
            created_at: None,
        });
    }
    drafts
}
