//! Tool for structuring raw income statement text into a table
//!
//! Drives the shared provider with a parsing prompt, then writes the result
//! to `income_statement_<TICKER>.csv` in the working directory.

use async_trait::async_trait;
use finquest_core::Result as AgentResult;
use finquest_llm::{CompletionRequest, LLMProvider, Message};
use finquest_tools::Tool;
use serde::Deserialize;
use serde_json::{Map, Value, json};
use std::sync::Arc;

use crate::error::{MarketError, Result};

const PARSER_SYSTEM_PROMPT: &str = "You are a financial data parser.";
const PARSER_MAX_TOKENS: usize = 4096;

/// Tool that parses raw EDGAR income statement text into line items per year
pub struct ParseIncomeStatementTool {
    provider: Arc<dyn LLMProvider>,
    model: String,
}

#[derive(Debug, Deserialize)]
struct ParseParams {
    raw_data: String,
    ticker: String,
}

fn parsing_prompt(raw_data: &str) -> String {
    format!(
        r#"Extract the income statement data for the last 3 years from the following text.
Return a JSON object like:
{{
  "Years": ["2024", "2023", "2022"],
  "Net Sales": [391035, 383285, 394328],
  ...
}}
Respond with the JSON object only.

Raw Text:
{raw_data}"#
    )
}

/// Strip an optional markdown fence from a model reply
fn strip_fences(reply: &str) -> &str {
    let trimmed = reply.trim();
    let Some(inner) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let inner = inner.strip_prefix("json").unwrap_or(inner);
    inner.strip_suffix("```").unwrap_or(inner).trim()
}

/// Render the parsed table as CSV: line items as rows, years as columns
fn render_csv(table: &Map<String, Value>) -> Result<String> {
    let years = table
        .get("Years")
        .and_then(|v| v.as_array())
        .ok_or_else(|| MarketError::Other("parsed table is missing 'Years'".to_string()))?;

    let mut csv = String::from("Item");
    for year in years {
        csv.push(',');
        csv.push_str(year.as_str().unwrap_or_default());
    }
    csv.push('\n');

    for (item, values) in table {
        if item == "Years" {
            continue;
        }
        csv.push_str(item);
        let values = values.as_array().cloned().unwrap_or_default();
        for i in 0..years.len() {
            csv.push(',');
            match values.get(i) {
                Some(Value::Number(n)) => csv.push_str(&n.to_string()),
                Some(Value::String(s)) => csv.push_str(s),
                Some(other) => csv.push_str(&other.to_string()),
                None => {}
            }
        }
        csv.push('\n');
    }

    Ok(csv)
}

impl ParseIncomeStatementTool {
    /// Create a new income statement parser over the shared provider
    pub fn new(provider: Arc<dyn LLMProvider>, model: impl Into<String>) -> Self {
        Self {
            provider,
            model: model.into(),
        }
    }

    async fn parse_statement(&self, params: ParseParams) -> Result<Value> {
        let ticker = params.ticker.to_uppercase();

        let request = CompletionRequest::builder(&self.model)
            .system(PARSER_SYSTEM_PROMPT)
            .add_message(Message::user(parsing_prompt(&params.raw_data)))
            .max_tokens(PARSER_MAX_TOKENS)
            .temperature(0.0)
            .build();

        let response = self
            .provider
            .complete(request)
            .await
            .map_err(|e| MarketError::Api(format!("Parsing request failed: {e}")))?;

        let reply = response.message.text().unwrap_or_default();
        let table: Map<String, Value> = serde_json::from_str(strip_fences(reply))
            .map_err(|e| MarketError::Other(format!("Could not parse statement JSON: {e}")))?;

        let csv = render_csv(&table)?;
        let csv_path = format!("income_statement_{ticker}.csv");
        tokio::fs::write(&csv_path, &csv).await?;
        tracing::info!(path = %csv_path, "Income statement written");

        Ok(json!({
            "ticker": ticker,
            "csv_path": csv_path,
            "table": Value::Object(table),
        }))
    }
}

#[async_trait]
impl Tool for ParseIncomeStatementTool {
    async fn execute(&self, params: Value) -> AgentResult<Value> {
        let params: ParseParams = serde_json::from_value(params)
            .map_err(|e| finquest_core::Error::Tool(format!("Invalid parameters: {e}")))?;

        self.parse_statement(params).await.map_err(Into::into)
    }

    fn name(&self) -> &'static str {
        "parse_income_statement"
    }

    fn description(&self) -> &'static str {
        "Parse raw income statement text into line items per year and save \
         the table as income_statement_<TICKER>.csv."
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "raw_data": {
                    "type": "string",
                    "description": "Raw income statement text (e.g., from get_financials)"
                },
                "ticker": {
                    "type": "string",
                    "description": "Ticker symbol used to name the CSV file"
                }
            },
            "required": ["raw_data", "ticker"]
        })
    }
}
