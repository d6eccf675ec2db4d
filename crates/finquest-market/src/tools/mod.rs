//! Tool capabilities for the research loop
//!
//! Nine tools cover the capabilities the agent can invoke by name: quotes,
//! indicators, order books, news, earnings, screenshots, image description,
//! and EDGAR filings (retrieval and parsing).

pub mod describe_image;
pub mod earnings;
pub mod financials;
pub mod income_statement;
pub mod news;
pub mod order_book;
pub mod screenshot;
pub mod stock_price;
pub mod technical;

pub use describe_image::DescribeImageTool;
pub use earnings::EarningsDataTool;
pub use financials::FinancialsTool;
pub use income_statement::ParseIncomeStatementTool;
pub use news::FinanceNewsTool;
pub use order_book::OrderBookTool;
pub use screenshot::ScreenshotTool;
pub use stock_price::StockPriceTool;
pub use technical::TechnicalIndicatorsTool;

use crate::api::{BinanceClient, SecEdgarClient};
use crate::cache::MarketCache;
use crate::config::MarketConfig;
use crate::error::Result;
use finquest_llm::LLMProvider;
use finquest_tools::{FirstTickerAdapter, ToolRegistry};
use std::sync::Arc;

/// Register the full capability set into a registry
///
/// `get_financials` is registered with the named first-ticker adapter so a
/// list-shaped input is reshaped before invocation. The vision and parsing
/// tools share the session's provider.
pub fn register_defaults(
    registry: &ToolRegistry,
    config: &MarketConfig,
    provider: Arc<dyn LLMProvider>,
    model: &str,
) -> Result<()> {
    let realtime_cache = MarketCache::new(config.cache_ttl_realtime);
    let filings_cache = MarketCache::new(config.cache_ttl_filings);

    let sec_client = Arc::new(SecEdgarClient::new(
        &config.sec_user_agent,
        config.request_timeout,
    )?);
    let binance_client = BinanceClient::new(&config.binance_api_base, config.request_timeout)?;

    registry.register(Arc::new(StockPriceTool::new(realtime_cache.clone())));
    registry.register(Arc::new(TechnicalIndicatorsTool::new(
        realtime_cache.clone(),
    )));
    registry.register(Arc::new(OrderBookTool::new(binance_client)));
    registry.register(Arc::new(FinanceNewsTool::new(config, realtime_cache)?));
    registry.register(Arc::new(EarningsDataTool::new(
        Arc::clone(&sec_client),
        filings_cache.clone(),
    )));
    registry.register(Arc::new(ScreenshotTool::new()));
    registry.register(Arc::new(DescribeImageTool::new(
        Arc::clone(&provider),
        model,
    )));
    registry.register_with_adapter(
        Arc::new(FinancialsTool::new(sec_client, filings_cache)),
        Arc::new(FirstTickerAdapter::default()),
    );
    registry.register(Arc::new(ParseIncomeStatementTool::new(provider, model)));

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use finquest_llm::{
        CompletionRequest, CompletionResponse, Message, Result as LLMResult, StopReason,
        TokenUsage,
    };

    struct NullProvider;

    #[async_trait]
    impl LLMProvider for NullProvider {
        async fn complete(&self, _request: CompletionRequest) -> LLMResult<CompletionResponse> {
            Ok(CompletionResponse {
                message: Message::assistant(""),
                stop_reason: StopReason::EndTurn,
                usage: TokenUsage {
                    input_tokens: 0,
                    output_tokens: 0,
                },
            })
        }

        fn name(&self) -> &'static str {
            "null"
        }
    }

    #[test]
    fn test_full_capability_set_registered() {
        let registry = ToolRegistry::new();
        let config = MarketConfig::default();

        register_defaults(&registry, &config, Arc::new(NullProvider), "gpt-4o")
            .expect("registers");

        assert_eq!(registry.len(), 9);
        for name in [
            "get_stock_price",
            "get_technical_indicators",
            "get_order_book",
            "get_finance_news",
            "get_earnings_data",
            "capture_screenshot",
            "describe_image",
            "get_financials",
            "parse_income_statement",
        ] {
            assert!(registry.get(name).is_some(), "missing tool: {name}");
        }

        // The financials tool carries the list-to-single adapter
        let entry = registry.get("get_financials").expect("registered");
        assert!(entry.adapter.is_some());
    }
}
