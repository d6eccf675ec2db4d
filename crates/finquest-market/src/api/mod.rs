//! API clients for external market data sources

pub mod binance;
pub mod newsdata;
pub mod sec_edgar;
pub mod yahoo;

pub use binance::{BinanceClient, OrderBook};
pub use newsdata::{NewsArticle, NewsDataClient};
pub use sec_edgar::{AnnualFigures, SecEdgarClient, SecFiling, latest_annual_figures};
pub use yahoo::{Quote, YahooFinanceClient};
