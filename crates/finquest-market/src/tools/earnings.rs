//! Tool for fetching latest annual earnings across multiple companies

use async_trait::async_trait;
use finquest_core::Result as AgentResult;
use finquest_tools::Tool;
use serde::Deserialize;
use serde_json::{Map, Value, json};
use std::sync::Arc;

use crate::api::{SecEdgarClient, latest_annual_figures};
use crate::cache::{CacheKey, MarketCache};
use crate::error::{MarketError, Result};

/// Tool for fetching the most recent annual revenue and net income per ticker
///
/// Figures come from SEC XBRL company facts. A failure for one ticker is
/// recorded under that ticker's key; it does not fail the whole call.
pub struct EarningsDataTool {
    sec_client: Arc<SecEdgarClient>,
    cache: MarketCache,
}

#[derive(Debug, Deserialize)]
struct EarningsParams {
    tickers: Value,
}

/// Accept either a list of tickers or a comma-separated string
fn normalize_tickers(raw: &Value) -> Result<Vec<String>> {
    match raw {
        Value::Array(items) => {
            let tickers: Vec<String> = items
                .iter()
                .filter_map(|v| v.as_str())
                .map(|s| s.trim().to_uppercase())
                .filter(|s| !s.is_empty())
                .collect();
            if tickers.is_empty() {
                return Err(MarketError::Other(
                    "tickers list contains no usable symbols".to_string(),
                ));
            }
            Ok(tickers)
        }
        Value::String(joined) => {
            let tickers: Vec<String> = joined
                .split(',')
                .map(|s| s.trim().to_uppercase())
                .filter(|s| !s.is_empty())
                .collect();
            if tickers.is_empty() {
                return Err(MarketError::Other(
                    "tickers string contains no usable symbols".to_string(),
                ));
            }
            Ok(tickers)
        }
        _ => Err(MarketError::Other(
            "tickers must be a list or a comma-separated string".to_string(),
        )),
    }
}

/// Render a dollar figure the way the summary table expects it
fn figure_or_na(value: Option<f64>) -> Value {
    match value {
        Some(v) => json!(v as i64),
        None => json!("N/A"),
    }
}

impl EarningsDataTool {
    /// Create a new earnings data tool
    pub fn new(sec_client: Arc<SecEdgarClient>, cache: MarketCache) -> Self {
        Self { sec_client, cache }
    }

    async fn fetch_one(&self, ticker: &str) -> Result<Value> {
        let cache_key = CacheKey::new(ticker, "earnings", json!({}));

        self.cache
            .get_or_fetch(cache_key, || async {
                let cik = self.sec_client.get_cik(ticker).await?;
                let facts = self.sec_client.get_company_facts(&cik).await?;
                let figures = latest_annual_figures(&facts);

                if figures.revenue.is_none() && figures.net_income.is_none() {
                    return Err(MarketError::DataUnavailable {
                        symbol: ticker.to_string(),
                        reason: "no annual figures in company facts".to_string(),
                    });
                }

                Ok::<_, MarketError>(json!({
                    "Total Revenue": figure_or_na(figures.revenue),
                    "Net Income": figure_or_na(figures.net_income),
                    "Period Ending": figures.period_ending.unwrap_or_else(|| "N/A".to_string()),
                }))
            })
            .await
    }

    async fn fetch_earnings(&self, params: EarningsParams) -> Result<Value> {
        let tickers = normalize_tickers(&params.tickers)?;

        tracing::info!(count = tickers.len(), "Fetching earnings data");

        let lookups = tickers.iter().map(|t| self.fetch_one(t));
        let results = futures::future::join_all(lookups).await;

        let mut earnings = Map::new();
        for (ticker, result) in tickers.into_iter().zip(results) {
            let entry = match result {
                Ok(value) => value,
                Err(e) => json!(format!("Error: {e}")),
            };
            earnings.insert(ticker, entry);
        }

        Ok(Value::Object(earnings))
    }
}

#[async_trait]
impl Tool for EarningsDataTool {
    async fn execute(&self, params: Value) -> AgentResult<Value> {
        let params: EarningsParams = serde_json::from_value(params)
            .map_err(|e| finquest_core::Error::Tool(format!("Invalid parameters: {e}")))?;

        self.fetch_earnings(params).await.map_err(Into::into)
    }

    fn name(&self) -> &'static str {
        "get_earnings_data"
    }

    fn description(&self) -> &'static str {
        "Fetch the most recent annual earnings (total revenue, net income, \
         period end) for a list of companies."
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "tickers": {
                    "type": "array",
                    "description": "Ticker symbols to look up",
                    "items": {"type": "string"}
                }
            },
            "required": ["tickers"]
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_list() {
        let tickers = normalize_tickers(&json!(["aapl", " msft ", "GOOGL"])).expect("list");
        assert_eq!(tickers, vec!["AAPL", "MSFT", "GOOGL"]);
    }

    #[test]
    fn test_normalize_comma_string() {
        let tickers = normalize_tickers(&json!("aapl, msft,googl")).expect("string");
        assert_eq!(tickers, vec!["AAPL", "MSFT", "GOOGL"]);
    }

    #[test]
    fn test_normalize_rejects_empty_and_wrong_types() {
        assert!(normalize_tickers(&json!([])).is_err());
        assert!(normalize_tickers(&json!("")).is_err());
        assert!(normalize_tickers(&json!(42)).is_err());
    }

    #[test]
    fn test_figure_rendering() {
        assert_eq!(figure_or_na(Some(391035000000.0)), json!(391035000000i64));
        assert_eq!(figure_or_na(None), json!("N/A"));
    }
}
