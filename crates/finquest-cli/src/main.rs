//! Command-line interface for finquest
//!
//! `finquest <TICKER>` runs one research session: pull the latest income
//! statements for the ticker and parse them. The final answer is printed to
//! stdout; `parse_income_statement` leaves `income_statement_<TICKER>.csv`
//! in the working directory as a side effect.

use anyhow::{Context, bail};
use clap::Parser;
use finquest_llm::{LLMProvider, providers::OpenAIProvider};
use finquest_market::MarketConfig;
use finquest_runtime::{ReactExecutor, SessionOutcome};
use finquest_tools::ToolRegistry;
use std::sync::Arc;
use tracing::info;

const DEFAULT_MODEL: &str = "gpt-4o";

#[derive(Parser, Debug)]
#[command(name = "finquest")]
#[command(about = "Market research agent - pulls and parses income statements", long_about = None)]
struct Args {
    /// Ticker symbol to research (e.g., NVDA)
    ticker: String,

    /// Model to use for reasoning
    #[arg(long, default_value = DEFAULT_MODEL)]
    model: String,

    /// Maximum reasoning iterations before giving up
    #[arg(long, default_value_t = 10)]
    max_iterations: usize,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    finquest_utils::init_tracing();

    let args = Args::parse();
    let ticker = args.ticker.to_uppercase();

    info!(ticker = %ticker, model = %args.model, "Starting research session");

    // Credentials come from the environment, never from literals
    let provider: Arc<dyn LLMProvider> = Arc::new(
        OpenAIProvider::from_env().context("failed to build reasoning provider")?,
    );

    let market_config = MarketConfig::default().with_env();
    market_config
        .validate()
        .context("invalid market configuration")?;

    let registry = Arc::new(ToolRegistry::new());
    finquest_market::register_defaults(
        &registry,
        &market_config,
        Arc::clone(&provider),
        &args.model,
    )
    .context("failed to register tools")?;

    let executor = ReactExecutor::builder()
        .provider(provider)
        .registry(registry)
        .model(&args.model)
        .max_iterations(args.max_iterations)
        .build()
        .context("failed to build executor")?;

    let question = format!(
        "Do the following: 1) Can you pull the latest income statements for {ticker}? 2) Parse the income statements."
    );

    match executor.run(question).await? {
        SessionOutcome::Completed { answer, iterations } => {
            info!(iterations, "Session completed");
            println!("{answer}");
            Ok(())
        }
        SessionOutcome::BudgetExceeded { iterations } => {
            bail!("no final answer after {iterations} iterations")
        }
        SessionOutcome::Cancelled { iterations } => {
            bail!("session cancelled after {iterations} iterations")
        }
    }
}
