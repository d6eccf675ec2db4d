//! Per-tool argument adapters
//!
//! An adapter reshapes the `action_input` mapping before the capability is
//! invoked. Adapters are registered per tool name, so adding a tool with an
//! unusual calling convention never requires touching the dispatcher.

use serde_json::{Map, Value};

/// Reshape arguments before a capability is invoked
pub trait ArgumentAdapter: Send + Sync {
    /// Adapter name, for logging
    fn name(&self) -> &str;

    /// Transform the parsed arguments into what the capability expects
    fn adapt(&self, args: Map<String, Value>) -> Map<String, Value>;
}

/// Replaces a list-valued argument with its first element under a new key.
///
/// Covers tools that expect a single ticker but are routinely handed a list
/// of tickers (e.g. `{"tickers": ["AAPL"]}` becomes
/// `{"ticker_or_cik": "AAPL"}`). When the source key is absent or not a
/// non-empty array, the arguments pass through untouched.
pub struct FirstTickerAdapter {
    source_key: String,
    target_key: String,
}

impl FirstTickerAdapter {
    /// Create an adapter mapping `source_key[0]` to `target_key`
    pub fn new(source_key: impl Into<String>, target_key: impl Into<String>) -> Self {
        Self {
            source_key: source_key.into(),
            target_key: target_key.into(),
        }
    }
}

impl Default for FirstTickerAdapter {
    fn default() -> Self {
        Self::new("tickers", "ticker_or_cik")
    }
}

impl ArgumentAdapter for FirstTickerAdapter {
    fn name(&self) -> &'static str {
        "first_ticker"
    }

    fn adapt(&self, mut args: Map<String, Value>) -> Map<String, Value> {
        let first = args
            .get(&self.source_key)
            .and_then(|v| v.as_array())
            .and_then(|list| list.first())
            .cloned();

        if let Some(first) = first {
            args.remove(&self.source_key);
            args.insert(self.target_key.clone(), first);
        }

        args
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn as_map(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected object"),
        }
    }

    #[test]
    fn test_first_element_extracted() {
        let adapter = FirstTickerAdapter::default();
        let args = as_map(json!({"tickers": ["AAPL", "MSFT"]}));

        let adapted = adapter.adapt(args);
        assert_eq!(adapted.get("ticker_or_cik"), Some(&json!("AAPL")));
        assert!(!adapted.contains_key("tickers"));
    }

    #[test]
    fn test_missing_source_passes_through() {
        let adapter = FirstTickerAdapter::default();
        let args = as_map(json!({"ticker_or_cik": "AAPL"}));

        let adapted = adapter.adapt(args);
        assert_eq!(adapted.get("ticker_or_cik"), Some(&json!("AAPL")));
    }

    #[test]
    fn test_empty_list_passes_through() {
        let adapter = FirstTickerAdapter::default();
        let args = as_map(json!({"tickers": []}));

        let adapted = adapter.adapt(args);
        assert_eq!(adapted.get("tickers"), Some(&json!([])));
        assert!(!adapted.contains_key("ticker_or_cik"));
    }

    #[test]
    fn test_custom_keys() {
        let adapter = FirstTickerAdapter::new("symbols", "symbol");
        let args = as_map(json!({"symbols": ["BTCUSDT"]}));

        let adapted = adapter.adapt(args);
        assert_eq!(adapted.get("symbol"), Some(&json!("BTCUSDT")));
    }
}
