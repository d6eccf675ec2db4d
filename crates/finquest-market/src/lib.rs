//! Market data capabilities for finquest
//!
//! This crate provides the domain side of the research agent:
//!
//! - Quote and history fetching (Yahoo Finance)
//! - Technical indicators (SMA, RSI)
//! - Crypto order books (Binance depth endpoint)
//! - Financial news search (NewsData.io)
//! - Annual earnings and 10-K retrieval (SEC EDGAR)
//! - Screen capture and image description
//!
//! Every capability implements the `Tool` trait from finquest-tools and is
//! registered by name; [`tools::register_defaults`] wires the full set.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod tools;

pub use cache::{CacheKey, MarketCache};
pub use config::MarketConfig;
pub use error::{MarketError, Result};
pub use tools::register_defaults;
