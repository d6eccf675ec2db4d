//! Configuration for market data operations

use crate::error::{MarketError, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

const DEFAULT_BINANCE_API_BASE: &str = "https://api.binance.us";

/// Configuration for market data operations
///
/// Built once at session start and threaded into clients and tools; no
/// global mutable state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarketConfig {
    /// Cache TTL for real-time data (quotes, indicators)
    pub cache_ttl_realtime: Duration,

    /// Cache TTL for filings and earnings data
    pub cache_ttl_filings: Duration,

    /// Request timeout duration
    pub request_timeout: Duration,

    /// NewsData.io API key (optional; the news tool errors without it)
    pub newsdata_api_key: Option<String>,

    /// NewsData.io request quota per minute
    pub newsdata_rate_limit: u32,

    /// User-Agent for SEC EDGAR (the SEC requires a contact identifier)
    pub sec_user_agent: String,

    /// Base URL for the Binance depth endpoint
    pub binance_api_base: String,
}

impl Default for MarketConfig {
    fn default() -> Self {
        Self {
            cache_ttl_realtime: Duration::from_secs(60),     // 1 minute
            cache_ttl_filings: Duration::from_secs(3600),    // 1 hour
            request_timeout: Duration::from_secs(30),
            newsdata_api_key: None,
            newsdata_rate_limit: 30,
            sec_user_agent: "finquest (finquest@example.com)".to_string(),
            binance_api_base: DEFAULT_BINANCE_API_BASE.to_string(),
        }
    }
}

impl MarketConfig {
    /// Create a new configuration builder
    pub fn builder() -> MarketConfigBuilder {
        MarketConfigBuilder::default()
    }

    /// Load optional keys from the environment
    ///
    /// Reads `NEWSDATA_API_KEY` and `SEC_USER_AGENT` when set.
    pub fn with_env(mut self) -> Self {
        if let Ok(key) = std::env::var("NEWSDATA_API_KEY") {
            self.newsdata_api_key = Some(key);
        }
        if let Ok(agent) = std::env::var("SEC_USER_AGENT") {
            self.sec_user_agent = agent;
        }
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.sec_user_agent.trim().is_empty() {
            return Err(MarketError::Config(
                "sec_user_agent must not be empty".to_string(),
            ));
        }

        if self.newsdata_rate_limit == 0 {
            return Err(MarketError::Config(
                "newsdata_rate_limit must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}

/// Builder for MarketConfig
#[derive(Debug, Default)]
pub struct MarketConfigBuilder {
    cache_ttl_realtime: Option<Duration>,
    cache_ttl_filings: Option<Duration>,
    request_timeout: Option<Duration>,
    newsdata_api_key: Option<String>,
    newsdata_rate_limit: Option<u32>,
    sec_user_agent: Option<String>,
    binance_api_base: Option<String>,
}

impl MarketConfigBuilder {
    /// Set cache TTL for real-time data
    pub fn cache_ttl_realtime(mut self, duration: Duration) -> Self {
        self.cache_ttl_realtime = Some(duration);
        self
    }

    /// Set cache TTL for filings data
    pub fn cache_ttl_filings(mut self, duration: Duration) -> Self {
        self.cache_ttl_filings = Some(duration);
        self
    }

    /// Set request timeout
    pub fn request_timeout(mut self, duration: Duration) -> Self {
        self.request_timeout = Some(duration);
        self
    }

    /// Set NewsData.io API key
    pub fn newsdata_api_key(mut self, key: impl Into<String>) -> Self {
        self.newsdata_api_key = Some(key.into());
        self
    }

    /// Set NewsData.io requests per minute
    pub fn newsdata_rate_limit(mut self, limit: u32) -> Self {
        self.newsdata_rate_limit = Some(limit);
        self
    }

    /// Set the SEC EDGAR User-Agent
    pub fn sec_user_agent(mut self, agent: impl Into<String>) -> Self {
        self.sec_user_agent = Some(agent.into());
        self
    }

    /// Set the Binance API base URL
    pub fn binance_api_base(mut self, base: impl Into<String>) -> Self {
        self.binance_api_base = Some(base.into());
        self
    }

    /// Build the configuration
    pub fn build(self) -> Result<MarketConfig> {
        let defaults = MarketConfig::default();

        let config = MarketConfig {
            cache_ttl_realtime: self.cache_ttl_realtime.unwrap_or(defaults.cache_ttl_realtime),
            cache_ttl_filings: self.cache_ttl_filings.unwrap_or(defaults.cache_ttl_filings),
            request_timeout: self.request_timeout.unwrap_or(defaults.request_timeout),
            newsdata_api_key: self.newsdata_api_key,
            newsdata_rate_limit: self.newsdata_rate_limit.unwrap_or(defaults.newsdata_rate_limit),
            sec_user_agent: self.sec_user_agent.unwrap_or(defaults.sec_user_agent),
            binance_api_base: self.binance_api_base.unwrap_or(defaults.binance_api_base),
        };

        config.validate()?;
        Ok(config)
    }
}
