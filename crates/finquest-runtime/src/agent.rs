//! Agent wrapper around the research loop executor

use crate::executor::{ReactExecutor, SessionOutcome};
use async_trait::async_trait;
use finquest_core::{Agent, Error, Result};

/// An agent that answers questions by running the reason/act loop
///
/// ReactAgent wraps [`ReactExecutor`] to provide the [`Agent`] trait
/// interface: one `process` call is one session.
pub struct ReactAgent {
    executor: ReactExecutor,
    name: String,
}

impl ReactAgent {
    /// Create a new agent
    pub fn new(executor: ReactExecutor, name: impl Into<String>) -> Self {
        Self {
            executor,
            name: name.into(),
        }
    }

    /// Get a reference to the underlying executor
    pub fn executor(&self) -> &ReactExecutor {
        &self.executor
    }
}

#[async_trait]
impl Agent for ReactAgent {
    async fn process(&self, input: String) -> Result<String> {
        let outcome = self
            .executor
            .run(input)
            .await
            .map_err(|e| Error::Agent(e.to_string()))?;

        match outcome {
            SessionOutcome::Completed { answer, .. } => Ok(answer),
            SessionOutcome::BudgetExceeded { iterations } => Err(Error::Agent(format!(
                "no final answer after {iterations} iterations"
            ))),
            SessionOutcome::Cancelled { iterations } => Err(Error::Agent(format!(
                "session cancelled after {iterations} iterations"
            ))),
        }
    }

    fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::executor::ReactExecutor;
    use async_trait::async_trait;
    use finquest_llm::{
        CompletionRequest, CompletionResponse, LLMError, LLMProvider, Message,
        Result as LLMResult, StopReason, TokenUsage,
    };
    use finquest_tools::ToolRegistry;
    use std::collections::VecDeque;
    use std::sync::{Arc, Mutex};

    struct ScriptedProvider {
        replies: Mutex<VecDeque<String>>,
    }

    impl ScriptedProvider {
        fn new(replies: &[&str]) -> Self {
            Self {
                replies: Mutex::new(replies.iter().map(|s| (*s).to_string()).collect()),
            }
        }
    }

    #[async_trait]
    impl LLMProvider for ScriptedProvider {
        async fn complete(&self, _request: CompletionRequest) -> LLMResult<CompletionResponse> {
            let reply = self
                .replies
                .lock()
                .unwrap()
                .pop_front()
                .ok_or_else(|| LLMError::RequestFailed("script exhausted".to_string()))?;
            Ok(CompletionResponse {
                message: Message::assistant(reply),
                stop_reason: StopReason::StopSequence,
                usage: TokenUsage {
                    input_tokens: 0,
                    output_tokens: 0,
                },
            })
        }

        fn name(&self) -> &'static str {
            "scripted"
        }
    }

    fn agent_over(replies: &[&str], max_iterations: usize) -> ReactAgent {
        let executor = ReactExecutor::builder()
            .provider(Arc::new(ScriptedProvider::new(replies)))
            .registry(Arc::new(ToolRegistry::new()))
            .max_iterations(max_iterations)
            .build()
            .expect("executor builds");
        ReactAgent::new(executor, "researcher")
    }

    #[tokio::test]
    async fn test_process_returns_final_answer() {
        let agent = agent_over(&["Final Answer: NVDA is at 120.5"], 10);

        let answer = agent
            .process("What is NVDA trading at?".to_string())
            .await
            .expect("answers");
        assert_eq!(answer, "NVDA is at 120.5");
        assert_eq!(agent.name(), "researcher");
    }

    #[tokio::test]
    async fn test_process_maps_budget_exhaustion_to_error() {
        let agent = agent_over(&["Thought: hmm", "Thought: hmm"], 2);

        let err = agent
            .process("What is NVDA trading at?".to_string())
            .await
            .expect_err("budget exhausted");
        assert!(err.to_string().contains("no final answer after 2 iterations"));
    }
}
