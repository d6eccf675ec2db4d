//! Tool for fetching crypto order books

use async_trait::async_trait;
use finquest_core::Result as AgentResult;
use finquest_tools::Tool;
use serde::Deserialize;
use serde_json::{Value, json};

use crate::api::BinanceClient;
use crate::error::Result;

/// Tool for retrieving top bid/ask levels from Binance
pub struct OrderBookTool {
    client: BinanceClient,
}

#[derive(Debug, Deserialize)]
struct OrderBookParams {
    #[serde(default = "default_symbol")]
    symbol: String,
    #[serde(default = "default_depth")]
    depth: usize,
}

fn default_symbol() -> String {
    "BTCUSDT".to_string()
}

fn default_depth() -> usize {
    5
}

impl OrderBookTool {
    /// Create a new order book tool
    pub fn new(client: BinanceClient) -> Self {
        Self { client }
    }

    async fn fetch_order_book(&self, params: OrderBookParams) -> Result<Value> {
        let book = self
            .client
            .get_order_book(&params.symbol, params.depth)
            .await?;

        Ok(json!({
            "symbol": book.symbol,
            "bids": book.bids,
            "asks": book.asks,
        }))
    }
}

#[async_trait]
impl Tool for OrderBookTool {
    async fn execute(&self, params: Value) -> AgentResult<Value> {
        let params: OrderBookParams = serde_json::from_value(params)
            .map_err(|e| finquest_core::Error::Tool(format!("Invalid parameters: {e}")))?;

        self.fetch_order_book(params).await.map_err(Into::into)
    }

    fn name(&self) -> &'static str {
        "get_order_book"
    }

    fn description(&self) -> &'static str {
        "Retrieve the top N bid/ask levels from Binance for a crypto symbol."
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "symbol": {
                    "type": "string",
                    "description": "Crypto trading pair (e.g., 'BTCUSDT')",
                    "default": "BTCUSDT"
                },
                "depth": {
                    "type": "integer",
                    "description": "Number of levels per side",
                    "default": 5
                }
            }
        })
    }
}
