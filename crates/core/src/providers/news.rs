use crate::config::Settings;
use anyhow::{Context, Result};
use serde::Deserialize;

const DEFAULT_BASE_URL: &str = "https://newsapi.org";

#[async_trait::async_trait]
pub trait NewsSource: Send + Sync {
    // Up to `limit` non-empty article titles matching the query.
    async fn headlines(&self, query: &str, limit: usize) -> Result<Vec<String>>;
}

#[derive(Debug, Clone)]
pub struct NewsApiClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl NewsApiClient {
    pub fn from_settings(settings: &Settings) -> Result<Option<Self>> {
        let Some(api_key) = settings.news_api_key.clone() else {
            return Ok(None);
        };

        let base_url =
            std::env::var("NEWS_API_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        let http = super::build_http_client("NEWS_API_TIMEOUT_SECS")?;

        Ok(Some(Self {
            http,
            base_url,
            api_key,
        }))
    }
}

#[async_trait::async_trait]
impl NewsSource for NewsApiClient {
    async fn headlines(&self, query: &str, limit: usize) -> Result<Vec<String>> {
        let url = format!("{}/v2/everything", self.base_url.trim_end_matches('/'));
        let page_size = limit.to_string();

        let res = self
            .http
            .get(url)
            .query(&[
                ("q", query),
                ("apiKey", self.api_key.as_str()),
                ("pageSize", page_size.as_str()),
            ])
            .send()
            .await
            .context("news search request failed")?;

        let status = res.status();
        if !status.is_success() {
            anyhow::bail!("news search HTTP {status}");
        }

        let body: EverythingResponse = res
            .json()
            .await
            .context("failed to parse news search response")?;

        Ok(extract_titles(body))
    }
}

#[derive(Debug, Deserialize)]
struct EverythingResponse {
    #[serde(default)]
    articles: Vec<Article>,
}

#[derive(Debug, Deserialize)]
struct Article {
    #[serde(default)]
    title: Option<String>,
}

fn extract_titles(body: EverythingResponse) -> Vec<String> {
    body.articles
        .into_iter()
        .filter_map(|article| article.title)
        .filter(|title| !title.is_empty())
        .collect()
}
