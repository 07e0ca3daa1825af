use async_trait::async_trait;
use std::time::Duration;

use crate::domain::news::{FetchKey, NewsItem};
use crate::domain::subscription::SubscriptionRequest;
use crate::error::{EngineError, EngineResult};
use crate::infrastructure::config::Config;

/// The backend HTTP API as seen by the engine. Behind a trait so tests and
/// hosts can substitute their own transport.
#[async_trait]
pub trait BackendApi: Send + Sync {
    /// `GET /categories` — the full category catalog.
    async fn fetch_categories(&self) -> EngineResult<Vec<String>>;

    /// `GET /news?explainer=..&categories=..` — the news list for a FetchKey.
    async fn fetch_news(&self, key: &FetchKey) -> EngineResult<Vec<NewsItem>>;

    /// `POST /subscribe` — newsletter signup.
    async fn subscribe(&self, request: &SubscriptionRequest) -> EngineResult<()>;

    /// `GET /run` — trigger the backend content-refresh agent.
    async fn run_agent(&self) -> EngineResult<()>;
}

/// reqwest-backed [`BackendApi`] implementation.
pub struct BackendClient {
    base_url: String,
    http_client: reqwest::Client,
}

impl BackendClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http_client: reqwest::Client::new(),
        }
    }

    pub fn from_config(config: &Config) -> EngineResult<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;
        Ok(Self {
            base_url: config.backend_base_url.trim_end_matches('/').to_string(),
            http_client,
        })
    }

    fn news_url(&self, key: &FetchKey) -> String {
        format!(
            "{}/news?explainer={}&categories={}",
            self.base_url,
            key.explainer,
            urlencoding::encode(&key.categories_param())
        )
    }

    async fn expect_success(response: reqwest::Response) -> EngineResult<reqwest::Response> {
        if response.status().is_success() {
            return Ok(response);
        }
        let status = response.status();
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());
        Err(EngineError::Network(format!(
            "backend returned {}: {}",
            status, body
        )))
    }
}

#[async_trait]
impl BackendApi for BackendClient {
    async fn fetch_categories(&self) -> EngineResult<Vec<String>> {
        let url = format!("{}/categories", self.base_url);
        let response = self.http_client.get(&url).send().await?;
        let response = Self::expect_success(response).await?;
        response
            .json::<Vec<String>>()
            .await
            .map_err(|e| EngineError::Network(format!("failed to parse categories: {}", e)))
    }

    async fn fetch_news(&self, key: &FetchKey) -> EngineResult<Vec<NewsItem>> {
        let response = self.http_client.get(self.news_url(key)).send().await?;
        let response = Self::expect_success(response).await?;
        response
            .json::<Vec<NewsItem>>()
            .await
            .map_err(|e| EngineError::Network(format!("failed to parse news: {}", e)))
    }

    async fn subscribe(&self, request: &SubscriptionRequest) -> EngineResult<()> {
        let url = format!("{}/subscribe", self.base_url);
        let response = self.http_client.post(&url).json(request).send().await?;
        Self::expect_success(response).await?;
        Ok(())
    }

    async fn run_agent(&self) -> EngineResult<()> {
        let url = format!("{}/run", self.base_url);
        let response = self.http_client.get(&url).send().await?;
        Self::expect_success(response).await?;
        Ok(())
    }
}
