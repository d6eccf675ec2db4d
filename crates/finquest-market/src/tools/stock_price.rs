//! Tool for fetching the latest stock quote

use async_trait::async_trait;
use finquest_core::Result as AgentResult;
use finquest_tools::Tool;
use serde::Deserialize;
use serde_json::{Value, json};

use crate::api::YahooFinanceClient;
use crate::cache::{CacheKey, MarketCache};
use crate::error::{MarketError, Result};

/// Tool for fetching the latest stock price and volume
pub struct StockPriceTool {
    yahoo_client: YahooFinanceClient,
    cache: MarketCache,
}

#[derive(Debug, Deserialize)]
struct StockPriceParams {
    ticker: String,
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

impl StockPriceTool {
    /// Create a new stock price tool
    pub fn new(cache: MarketCache) -> Self {
        Self {
            yahoo_client: YahooFinanceClient::new(),
            cache,
        }
    }

    async fn fetch_price(&self, params: StockPriceParams) -> Result<Value> {
        let ticker = params.ticker.to_uppercase();

        let cache_key = CacheKey::new(&ticker, "stock_price", json!({}));

        let result = self
            .cache
            .get_or_fetch(cache_key, || async {
                let quote = self.yahoo_client.get_quote(&ticker).await?;

                let change_pct = if quote.open.abs() > f64::EPSILON {
                    round2((quote.close - quote.open) / quote.open * 100.0)
                } else {
                    0.0
                };

                Ok::<_, MarketError>(json!({
                    "ticker": ticker,
                    "price": round2(quote.close),
                    "open": round2(quote.open),
                    "volume": quote.volume,
                    "change_pct": change_pct,
                }))
            })
            .await?;

        Ok(result)
    }
}

#[async_trait]
impl Tool for StockPriceTool {
    async fn execute(&self, params: Value) -> AgentResult<Value> {
        let params: StockPriceParams = serde_json::from_value(params)
            .map_err(|e| finquest_core::Error::Tool(format!("Invalid parameters: {e}")))?;

        self.fetch_price(params).await.map_err(Into::into)
    }

    fn name(&self) -> &'static str {
        "get_stock_price"
    }

    fn description(&self) -> &'static str {
        "Fetch the latest stock price, open price, volume, and percent change \
         for a given ticker symbol."
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "ticker": {
                    "type": "string",
                    "description": "Stock ticker symbol (e.g., 'NVDA')"
                }
            },
            "required": ["ticker"]
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_tool_metadata() {
        let tool = StockPriceTool::new(MarketCache::new(Duration::from_secs(60)));
        assert_eq!(tool.name(), "get_stock_price");
        assert!(!tool.description().is_empty());

        let schema = tool.input_schema();
        assert_eq!(schema["type"], "object");
        assert!(schema["properties"]["ticker"].is_object());
    }

    #[test]
    fn test_round2() {
        assert_eq!(round2(120.4567), 120.46);
        assert_eq!(round2(-0.005), -0.01);
    }

    #[tokio::test]
    async fn test_invalid_params_rejected() {
        let tool = StockPriceTool::new(MarketCache::new(Duration::from_secs(60)));
        let result = tool.execute(json!({"symbol": "NVDA"})).await;
        assert!(result.is_err());
    }
}
