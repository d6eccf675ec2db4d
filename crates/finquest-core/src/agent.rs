//! Core Agent trait definition

use crate::Result;
use async_trait::async_trait;

/// Trait implemented by anything that can take a question and produce an
/// answer.
///
/// The input/output types are intentionally kept as String for maximum
/// flexibility. Concrete implementations decide how to interpret the input
/// (a research question, an analysis request) and what the output text
/// contains.
#[async_trait]
pub trait Agent: Send + Sync {
    /// Process input and return output
    async fn process(&self, input: String) -> Result<String>;

    /// Get the agent's name
    fn name(&self) -> &str;
}
