//! Tool for searching financial news

use async_trait::async_trait;
use finquest_core::Result as AgentResult;
use finquest_tools::Tool;
use serde::Deserialize;
use serde_json::{Value, json};

use crate::api::NewsDataClient;
use crate::cache::{CacheKey, MarketCache};
use crate::config::MarketConfig;
use crate::error::{MarketError, Result};

/// Tool for searching recent financial news via NewsData.io
pub struct FinanceNewsTool {
    client: Option<NewsDataClient>,
    cache: MarketCache,
}

#[derive(Debug, Deserialize)]
struct FinanceNewsParams {
    query: String,
    #[serde(default = "default_max_results")]
    max_results: usize,
}

fn default_max_results() -> usize {
    5
}

impl FinanceNewsTool {
    /// Create a new finance news tool
    ///
    /// Without an API key in the config the tool still registers; each call
    /// then fails with a configuration error that flows back to the model
    /// as an error observation.
    pub fn new(config: &MarketConfig, cache: MarketCache) -> Result<Self> {
        let client = match &config.newsdata_api_key {
            Some(key) => Some(NewsDataClient::new(
                key,
                config.newsdata_rate_limit,
                config.request_timeout,
            )?),
            None => None,
        };

        Ok(Self { client, cache })
    }

    async fn search_news(&self, params: FinanceNewsParams) -> Result<Value> {
        let client = self.client.as_ref().ok_or_else(|| {
            MarketError::Config("NEWSDATA_API_KEY is not configured".to_string())
        })?;

        let cache_key = CacheKey::new(
            &params.query,
            "finance_news",
            json!({"max_results": params.max_results}),
        );

        let result = self
            .cache
            .get_or_fetch(cache_key, || async {
                let articles = client.search(&params.query, params.max_results).await?;
                Ok::<_, MarketError>(serde_json::to_value(articles)?)
            })
            .await?;

        Ok(result)
    }
}

#[async_trait]
impl Tool for FinanceNewsTool {
    async fn execute(&self, params: Value) -> AgentResult<Value> {
        let params: FinanceNewsParams = serde_json::from_value(params)
            .map_err(|e| finquest_core::Error::Tool(format!("Invalid parameters: {e}")))?;

        self.search_news(params).await.map_err(Into::into)
    }

    fn name(&self) -> &'static str {
        "get_finance_news"
    }

    fn description(&self) -> &'static str {
        "Search recent financial news. Returns title, publication date, link, \
         and description per article."
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "query": {
                    "type": "string",
                    "description": "Search query (e.g., 'Nvidia earnings')"
                },
                "max_results": {
                    "type": "integer",
                    "description": "Maximum number of articles to return",
                    "default": 5
                }
            },
            "required": ["query"]
        })
    }
}
