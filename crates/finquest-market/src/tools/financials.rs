//! Tool for pulling the income statement section of the latest 10-K

use async_trait::async_trait;
use finquest_core::Result as AgentResult;
use finquest_tools::Tool;
use serde::Deserialize;
use serde_json::{Value, json};
use std::sync::Arc;

use crate::api::SecEdgarClient;
use crate::cache::{CacheKey, MarketCache};
use crate::error::{MarketError, Result};

const FILING_TEXT_WIDTH: usize = 120;
const INCOME_STATEMENT_LIMIT: usize = 3000;

const TARGET_PHRASES: [&str; 3] = [
    "Consolidated Statements of Operations",
    "Consolidated Statement of Income",
    "Consolidated Statements of Earnings",
];

/// Tool that retrieves the latest 10-K from EDGAR and extracts the income
/// statement section as plain text
pub struct FinancialsTool {
    sec_client: Arc<SecEdgarClient>,
    cache: MarketCache,
}

#[derive(Debug, Deserialize)]
struct FinancialsParams {
    ticker_or_cik: String,
}

/// Byte offset of a needle in a haystack, ignoring ASCII case
///
/// The headings searched for start with an ASCII letter, so a returned
/// offset always lands on a char boundary of the original text.
fn find_ascii_ci(haystack: &str, needle: &str, from: usize) -> Option<usize> {
    let h = haystack.as_bytes();
    let n = needle.as_bytes();
    if n.is_empty() || h.len() < from + n.len() {
        return None;
    }
    (from..=h.len() - n.len()).find(|&i| h[i..i + n.len()].eq_ignore_ascii_case(n))
}

/// Locate the income statement section in flattened filing text
///
/// Scans for the first occurrence of a known heading that is not a table of
/// contents or page reference, and returns the text that follows, truncated
/// to a bounded window.
fn extract_income_statement(text: &str) -> Option<String> {
    let mut best: Option<usize> = None;
    for phrase in TARGET_PHRASES {
        let mut from = 0;
        while let Some(at) = find_ascii_ci(text, phrase, from) {
            // Skip index/table-of-contents hits: check the surrounding line
            let line_start = text[..at].rfind('\n').map_or(0, |i| i + 1);
            let line_end = text[at..].find('\n').map_or(text.len(), |i| at + i);
            let line = text[line_start..line_end].to_ascii_lowercase();
            if line.contains("page") || line.contains("index") {
                from = line_end;
                continue;
            }

            match best {
                Some(current) if current <= at => {}
                _ => best = Some(at),
            }
            break;
        }
    }

    best.map(|at| text[at..].chars().take(INCOME_STATEMENT_LIMIT).collect())
}

impl FinancialsTool {
    /// Create a new financials tool
    pub fn new(sec_client: Arc<SecEdgarClient>, cache: MarketCache) -> Self {
        Self { sec_client, cache }
    }

    async fn fetch_financials(&self, params: FinancialsParams) -> Result<Value> {
        let ticker_or_cik = params.ticker_or_cik.trim().to_string();

        let cache_key = CacheKey::new(&ticker_or_cik, "financials", json!({}));

        let result = self
            .cache
            .get_or_fetch(cache_key, || async {
                // If the user gave a ticker, resolve to CIK via lookup
                let cik = if ticker_or_cik.chars().all(|c| c.is_ascii_digit()) {
                    ticker_or_cik.clone()
                } else {
                    self.sec_client.get_cik(&ticker_or_cik).await?
                };

                let filing = self
                    .sec_client
                    .latest_filing(&cik, "10-K")
                    .await?
                    .ok_or_else(|| {
                        MarketError::DataUnavailable {
                            symbol: ticker_or_cik.clone(),
                            reason: "No recent 10-K filing found".to_string(),
                        }
                    })?;

                let html = self
                    .sec_client
                    .fetch_filing_document(
                        &cik,
                        &filing.accession_number,
                        &filing.primary_document,
                    )
                    .await?;

                let text = html2text::from_read(html.as_bytes(), FILING_TEXT_WIDTH)
                    .unwrap_or_else(|_| html.clone());

                let income_statement = extract_income_statement(&text).ok_or_else(|| {
                    MarketError::DataUnavailable {
                        symbol: ticker_or_cik.clone(),
                        reason: "Income statement not found".to_string(),
                    }
                })?;

                Ok::<_, MarketError>(json!({
                    "source": "EDGAR",
                    "ticker_or_cik": ticker_or_cik,
                    "document": filing.primary_document,
                    "income_statement": income_statement,
                }))
            })
            .await?;

        Ok(result)
    }
}

#[async_trait]
impl Tool for FinancialsTool {
    async fn execute(&self, params: Value) -> AgentResult<Value> {
        let params: FinancialsParams = serde_json::from_value(params)
            .map_err(|e| finquest_core::Error::Tool(format!("Invalid parameters: {e}")))?;

        self.fetch_financials(params).await.map_err(Into::into)
    }

    fn name(&self) -> &'static str {
        "get_financials"
    }

    fn description(&self) -> &'static str {
        "Retrieve the latest 10-K filing from SEC EDGAR for a company and \
         extract the income statement section as text."
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "ticker_or_cik": {
                    "type": "string",
                    "description": "Ticker symbol or SEC CIK number (e.g., 'AAPL')"
                }
            },
            "required": ["ticker_or_cik"]
        })
    }
}
