//! Tool for calculating technical indicators

use async_trait::async_trait;
use finquest_core::Result as AgentResult;
use finquest_tools::Tool;
use serde::Deserialize;
use serde_json::{Value, json};
use ta::{
    Next,
    indicators::{RelativeStrengthIndex, SimpleMovingAverage},
};

use crate::api::YahooFinanceClient;
use crate::cache::{CacheKey, MarketCache};
use crate::error::{MarketError, Result};

const SMA_PERIOD: usize = 20;
const RSI_PERIOD: usize = 14;

/// Tool for calculating SMA-20 and RSI-14 over three months of history
pub struct TechnicalIndicatorsTool {
    yahoo_client: YahooFinanceClient,
    cache: MarketCache,
}

#[derive(Debug, Deserialize)]
struct TechnicalParams {
    ticker: String,
}

/// Current SMA and RSI values over a closing-price series
fn indicator_snapshot(closes: &[f64]) -> Result<(f64, f64)> {
    if closes.is_empty() {
        return Err(MarketError::Indicator(
            "no closing prices available".to_string(),
        ));
    }

    let mut sma = SimpleMovingAverage::new(SMA_PERIOD)
        .map_err(|e| MarketError::Indicator(e.to_string()))?;
    let mut rsi = RelativeStrengthIndex::new(RSI_PERIOD)
        .map_err(|e| MarketError::Indicator(e.to_string()))?;

    let mut current_sma = 0.0;
    let mut current_rsi = 0.0;
    for &close in closes {
        current_sma = sma.next(close);
        current_rsi = rsi.next(close);
    }

    Ok((current_sma, current_rsi))
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

impl TechnicalIndicatorsTool {
    /// Create a new technical indicators tool
    pub fn new(cache: MarketCache) -> Self {
        Self {
            yahoo_client: YahooFinanceClient::new(),
            cache,
        }
    }

    async fn fetch_indicators(&self, params: TechnicalParams) -> Result<Value> {
        let ticker = params.ticker.to_uppercase();

        let cache_key = CacheKey::new(&ticker, "technical_indicators", json!({}));

        let result = self
            .cache
            .get_or_fetch(cache_key, || async {
                let quotes = self.yahoo_client.get_historical_range(&ticker, "3mo").await?;

                if quotes.is_empty() {
                    return Err(MarketError::DataUnavailable {
                        symbol: ticker.clone(),
                        reason: "No historical data available".to_string(),
                    });
                }

                let closes: Vec<f64> = quotes.iter().map(|q| q.close).collect();
                let (sma_20, rsi_14) = indicator_snapshot(&closes)?;
                let latest_price = closes.last().copied().unwrap_or(0.0);

                Ok::<_, MarketError>(json!({
                    "ticker": ticker,
                    "SMA_20": round2(sma_20),
                    "RSI_14": round2(rsi_14),
                    "latest_price": round2(latest_price),
                }))
            })
            .await?;

        Ok(result)
    }
}

#[async_trait]
impl Tool for TechnicalIndicatorsTool {
    async fn execute(&self, params: Value) -> AgentResult<Value> {
        let params: TechnicalParams = serde_json::from_value(params)
            .map_err(|e| finquest_core::Error::Tool(format!("Invalid parameters: {e}")))?;

        self.fetch_indicators(params).await.map_err(Into::into)
    }

    fn name(&self) -> &'static str {
        "get_technical_indicators"
    }

    fn description(&self) -> &'static str {
        "Fetch technical indicators (20-day SMA, 14-day RSI, latest price) \
         for a given ticker symbol, computed over three months of history."
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

    #[test]
    fn test_snapshot_on_constant_series() {
        let closes = vec![100.0; 40];
        let (sma, _rsi) = indicator_snapshot(&closes).expect("computes");
        assert!((sma - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_snapshot_tracks_rising_series() {
        let closes: Vec<f64> = (1..=60).map(|i| f64::from(i)).collect();
        let (sma, rsi) = indicator_snapshot(&closes).expect("computes");

        // SMA of the last 20 values of 1..=60 is the mean of 41..=60
        assert!((sma - 50.5).abs() < 1e-9);
        // A strictly rising series reads strongly overbought
        assert!(rsi > 70.0);
    }

    #[test]
    fn test_snapshot_rejects_empty_series() {
        assert!(indicator_snapshot(&[]).is_err());
    }

    #[test]
    fn test_tool_metadata() {
        let tool = TechnicalIndicatorsTool::new(MarketCache::new(std::time::Duration::from_secs(60)));
        assert_eq!(tool.name(), "get_technical_indicators");
        let schema = tool.input_schema();
        assert_eq!(schema["required"][0], "ticker");
    }
}
