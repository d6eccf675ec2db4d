//! Binance depth endpoint client for crypto order books

use crate::error::{MarketError, Result};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Top-of-book snapshot for a crypto symbol
///
/// Bids and asks are `[price, quantity]` string pairs, as returned by the
/// exchange.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderBook {
    pub symbol: String,
    pub bids: Vec<[String; 2]>,
    pub asks: Vec<[String; 2]>,
}

#[derive(Debug, Deserialize)]
struct DepthResponse {
    bids: Vec<[String; 2]>,
    asks: Vec<[String; 2]>,
}

/// Binance REST client (depth endpoint only)
pub struct BinanceClient {
    client: Client,
    api_base: String,
}

impl BinanceClient {
    /// Create a new client against the given API base
    pub fn new(api_base: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            api_base: api_base.into(),
        })
    }

    /// Retrieve the top `depth` bid/ask levels for a symbol
    pub async fn get_order_book(&self, symbol: &str, depth: usize) -> Result<OrderBook> {
        let symbol = symbol.to_uppercase();
        let url = format!("{}/api/v3/depth", self.api_base);

        let response = self
            .client
            .get(&url)
            .query(&[("symbol", symbol.as_str()), ("limit", &depth.to_string())])
            .send()
            .await
            .map_err(|e| MarketError::Api(format!("Binance request failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(MarketError::Api(format!(
                "Binance API error {status}: {body}"
            )));
        }

        let depth_response: DepthResponse = response
            .json()
            .await
            .map_err(|e| MarketError::Api(format!("Failed to parse Binance response: {e}")))?;

        Ok(OrderBook {
            symbol,
            bids: depth_response.bids,
            asks: depth_response.asks,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_depth_response_parsing() {
        let raw = r#"{
            "lastUpdateId": 1027024,
            "bids": [["4.00000000", "431.00000000"], ["3.99000000", "9.00000000"]],
            "asks": [["4.00000200", "12.00000000"]]
        }"#;

        let parsed: DepthResponse = serde_json::from_str(raw).expect("parses");
        assert_eq!(parsed.bids.len(), 2);
        assert_eq!(parsed.bids[0], ["4.00000000", "431.00000000"]);
        assert_eq!(parsed.asks.len(), 1);
    }

    #[tokio::test]
    #[ignore] // Requires network access
    async fn test_get_order_book() {
        let client =
            BinanceClient::new("https://api.binance.us", Duration::from_secs(10)).expect("client");
        let book = client.get_order_book("BTCUSDT", 5).await.expect("depth");
        assert_eq!(book.symbol, "BTCUSDT");
        assert!(!book.bids.is_empty());
    }
}
