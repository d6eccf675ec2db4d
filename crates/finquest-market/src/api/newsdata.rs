//! NewsData.io client for financial news search

use crate::error::{MarketError, Result};
use governor::clock::DefaultClock;
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;

type SharedRateLimiter = Arc<RateLimiter<NotKeyed, InMemoryState, DefaultClock>>;

const NEWSDATA_API_BASE: &str = "https://newsdata.io/api/1/news";

/// One news article from a search
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewsArticle {
    /// Headline
    pub title: Option<String>,
    /// Publication timestamp as reported by the source
    #[serde(rename = "pubDate")]
    pub pub_date: Option<String>,
    /// Article URL
    pub link: Option<String>,
    /// Short description or lede
    pub description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct NewsDataResponse {
    #[serde(default)]
    results: Vec<NewsArticle>,
}

/// NewsData.io client with rate limiting
pub struct NewsDataClient {
    client: Client,
    api_key: String,
    rate_limiter: SharedRateLimiter,
}

impl NewsDataClient {
    /// Create a new client
    ///
    /// # Arguments
    /// * `api_key` - NewsData.io API key
    /// * `rate_limit` - Requests per minute
    /// * `timeout` - Per-request timeout
    pub fn new(api_key: impl Into<String>, rate_limit: u32, timeout: Duration) -> Result<Self> {
        let quota =
            Quota::per_minute(NonZeroU32::new(rate_limit).unwrap_or(NonZeroU32::new(30).unwrap()));
        let rate_limiter = Arc::new(RateLimiter::direct(quota));

        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            api_key: api_key.into(),
            rate_limiter,
        })
    }

    /// Search recent English-language news for a query
    pub async fn search(&self, query: &str, max_results: usize) -> Result<Vec<NewsArticle>> {
        self.rate_limiter.until_ready().await;

        let response = self
            .client
            .get(NEWSDATA_API_BASE)
            .query(&[
                ("apikey", self.api_key.as_str()),
                ("q", query),
                ("language", "en"),
            ])
            .send()
            .await
            .map_err(|e| MarketError::Api(format!("NewsData request failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(MarketError::Api(format!(
                "NewsData API error {status}: {body}"
            )));
        }

        let parsed: NewsDataResponse = response
            .json()
            .await
            .map_err(|e| MarketError::Api(format!("Failed to parse NewsData response: {e}")))?;

        Ok(parsed.results.into_iter().take(max_results).collect())
    }
}
