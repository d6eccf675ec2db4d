//! Research loop executor
//!
//! The executor drives the reason/act loop to completion:
//! 1. Call the reasoning producer with the full transcript
//! 2. Check the new turn for the terminal sentinel
//! 3. Otherwise parse an action out of it and dispatch exactly one tool
//! 4. Append the observation and loop back
//!
//! Parse and dispatch failures are fed back into the conversation as error
//! observations so the producer can adapt; only a reasoning-producer
//! failure is fatal. The loop is bounded by an iteration cap and an
//! optional wall-clock deadline, and checks a cancellation token at the
//! top of every turn.

use crate::parser::parse_action;
use crate::prompt::build_system_prompt;
use crate::termination::final_answer;
use crate::transcript::Transcript;
use finquest_llm::{CompletionRequest, LLMError, LLMProvider, Message};
use finquest_tools::{Dispatcher, ToolRegistry};
use std::sync::Arc;
use std::time::{Duration, Instant};
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Result type for executor runs
pub type RuntimeResult<T> = std::result::Result<T, RuntimeError>;

/// Fatal session errors
///
/// Everything recoverable (bad action text, unknown tools, capability
/// failures) stays inside the loop as observations; these are the errors
/// that abort the session.
#[derive(Debug, Error)]
pub enum RuntimeError {
    /// The reasoning producer failed irrecoverably
    #[error("reasoning producer failed: {0}")]
    Reasoning(#[from] LLMError),

    /// The reasoning producer did not answer within the configured timeout
    #[error("reasoning producer timed out after {0:?}")]
    ReasoningTimeout(Duration),
}

/// How a session ended
#[derive(Debug, Clone, PartialEq)]
pub enum SessionOutcome {
    /// The producer emitted a terminal turn
    Completed {
        /// Text following the sentinel
        answer: String,
        /// Reasoning calls made
        iterations: usize,
    },
    /// The iteration cap or deadline was reached without a terminal turn
    BudgetExceeded {
        /// Reasoning calls made
        iterations: usize,
    },
    /// The cancellation token fired between iterations
    Cancelled {
        /// Reasoning calls made
        iterations: usize,
    },
}

impl SessionOutcome {
    /// The final answer, when the session completed normally
    pub fn answer(&self) -> Option<&str> {
        match self {
            SessionOutcome::Completed { answer, .. } => Some(answer),
            _ => None,
        }
    }
}

/// Configuration for the research loop
#[derive(Debug, Clone)]
pub struct ExecutorConfig {
    /// Maximum number of reasoning calls (prevents infinite loops)
    pub max_iterations: usize,

    /// Optional wall-clock budget for the whole session
    pub deadline: Option<Duration>,

    /// Timeout for a single reasoning call
    pub reasoning_timeout: Duration,

    /// Timeout for a single tool execution
    pub tool_timeout: Duration,

    /// Model to use
    pub model: String,

    /// System prompt override; when None the tool catalog prompt is built
    /// from the registry
    pub system_prompt: Option<String>,

    /// Max tokens per completion
    pub max_tokens: usize,

    /// Temperature
    pub temperature: Option<f32>,

    /// Stop sequences cut the producer off before it fabricates
    /// observations
    pub stop_sequences: Vec<String>,
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        Self {
            max_iterations: 10,
            deadline: None,
            reasoning_timeout: Duration::from_secs(120),
            tool_timeout: Duration::from_secs(60),
            model: "gpt-4o".to_string(),
            system_prompt: None,
            max_tokens: 4096,
            temperature: Some(0.0),
            stop_sequences: vec!["Observation:".to_string()],
        }
    }
}

/// Executes the reason/act loop over a provider and a tool registry
///
/// The executor exclusively owns the transcript for the lifetime of one
/// `run` call; collaborators only ever receive snapshots.
pub struct ReactExecutor {
    provider: Arc<dyn LLMProvider>,
    registry: Arc<ToolRegistry>,
    dispatcher: Dispatcher,
    config: ExecutorConfig,
    cancel: CancellationToken,
}

impl ReactExecutor {
    /// Create a new executor
    pub fn new(
        provider: Arc<dyn LLMProvider>,
        registry: Arc<ToolRegistry>,
        config: ExecutorConfig,
    ) -> Self {
        let dispatcher = Dispatcher::new(Arc::clone(&registry)).with_timeout(config.tool_timeout);
        Self {
            provider,
            registry,
            dispatcher,
            config,
            cancel: CancellationToken::new(),
        }
    }

    /// Create a builder
    pub fn builder() -> ReactExecutorBuilder {
        ReactExecutorBuilder::new()
    }

    /// Token observed at the top of every loop turn; cancel it to stop the
    /// session between iterations
    pub fn cancellation_token(&self) -> &CancellationToken {
        &self.cancel
    }

    /// Run one session from an initial question to its outcome
    pub async fn run(&self, question: impl Into<String>) -> RuntimeResult<SessionOutcome> {
        let system_prompt = self
            .config
            .system_prompt
            .clone()
            .unwrap_or_else(|| build_system_prompt(&self.registry.descriptors()));

        let mut transcript = Transcript::new();
        transcript.push(Message::user(question));

        let started = Instant::now();
        let mut iterations = 0usize;

        loop {
            if self.cancel.is_cancelled() {
                info!(iterations, "Session cancelled");
                return Ok(SessionOutcome::Cancelled { iterations });
            }

            if iterations >= self.config.max_iterations {
                warn!(
                    max_iterations = self.config.max_iterations,
                    "Iteration budget exhausted without a final answer"
                );
                return Ok(SessionOutcome::BudgetExceeded { iterations });
            }

            if let Some(deadline) = self.config.deadline {
                if started.elapsed() >= deadline {
                    warn!(?deadline, iterations, "Session deadline exceeded");
                    return Ok(SessionOutcome::BudgetExceeded { iterations });
                }
            }

            iterations += 1;
            info!(
                iteration = iterations,
                max_iterations = self.config.max_iterations,
                "Reasoning step started"
            );

            let request = CompletionRequest::builder(&self.config.model)
                .messages(transcript.messages().to_vec())
                .system(system_prompt.clone())
                .max_tokens(self.config.max_tokens)
                .temperature(self.config.temperature.unwrap_or(0.0))
                .stop_sequences(self.config.stop_sequences.clone())
                .build();

            let response =
                tokio::time::timeout(self.config.reasoning_timeout, self.provider.complete(request))
                    .await
                    .map_err(|_| RuntimeError::ReasoningTimeout(self.config.reasoning_timeout))??;

            let content = response.message.text().unwrap_or_default().to_string();
            let preview: String = content.chars().take(200).collect();
            debug!(reasoning_preview = %preview, "Reasoning output received");

            transcript.push(response.message);

            if let Some(answer) = final_answer(&content) {
                info!(iterations, "Terminal turn detected");
                return Ok(SessionOutcome::Completed {
                    answer: answer.to_string(),
                    iterations,
                });
            }

            match parse_action(&content) {
                Ok(action) => {
                    debug!(tool = %action.name, "Action extracted");
                    let observation = self.dispatcher.dispatch(&action.name, action.arguments).await;
                    transcript.push(Message::observation(observation.render()));
                }
                Err(e) => {
                    warn!(error = %e, "Reasoning output carried no usable action");
                    transcript.push(Message::observation(format!("Observation: Error - {e}")));
                }
            }
        }
    }
}

/// Builder for ReactExecutor
pub struct ReactExecutorBuilder {
    provider: Option<Arc<dyn LLMProvider>>,
    registry: Arc<ToolRegistry>,
    config: ExecutorConfig,
    cancel: Option<CancellationToken>,
}

impl ReactExecutorBuilder {
    /// Create a new builder
    pub fn new() -> Self {
        Self {
            provider: None,
            registry: Arc::new(ToolRegistry::new()),
            config: ExecutorConfig::default(),
            cancel: None,
        }
    }

    /// Set the LLM provider
    pub fn provider(mut self, provider: Arc<dyn LLMProvider>) -> Self {
        self.provider = Some(provider);
        self
    }

    /// Set the tool registry
    pub fn registry(mut self, registry: Arc<ToolRegistry>) -> Self {
        self.registry = registry;
        self
    }

    /// Set the full configuration
    pub fn config(mut self, config: ExecutorConfig) -> Self {
        self.config = config;
        self
    }

    /// Set maximum iterations
    pub fn max_iterations(mut self, max: usize) -> Self {
        self.config.max_iterations = max;
        self
    }

    /// Set the wall-clock deadline
    pub fn deadline(mut self, deadline: Duration) -> Self {
        self.config.deadline = Some(deadline);
        self
    }

    /// Set the model
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.config.model = model.into();
        self
    }

    /// Set the system prompt override
    pub fn system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.config.system_prompt = Some(prompt.into());
        self
    }

    /// Supply an external cancellation token
    pub fn cancellation_token(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }

    /// Build the executor
    pub fn build(self) -> finquest_core::Result<ReactExecutor> {
        let provider = self.provider.ok_or_else(|| {
            finquest_core::Error::Initialization("Provider not set".to_string())
        })?;

        let dispatcher =
            Dispatcher::new(Arc::clone(&self.registry)).with_timeout(self.config.tool_timeout);

        Ok(ReactExecutor {
            provider,
            registry: self.registry,
            dispatcher,
            config: self.config,
            cancel: self.cancel.unwrap_or_default(),
        })
    }
}

impl Default for ReactExecutorBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use finquest_llm::{CompletionResponse, Result as LLMResult, StopReason, TokenUsage};
    use finquest_tools::Tool;
    use serde_json::{Value, json};
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Provider that replays a fixed script of reasoning turns and records
    /// every request it receives.
    struct ScriptedProvider {
        replies: Mutex<VecDeque<String>>,
        requests: Mutex<Vec<CompletionRequest>>,
    }

    impl ScriptedProvider {
        fn new(replies: &[&str]) -> Self {
            Self {
                replies: Mutex::new(replies.iter().map(|s| (*s).to_string()).collect()),
                requests: Mutex::new(Vec::new()),
            }
        }

        fn calls(&self) -> usize {
            self.requests.lock().unwrap().len()
        }

        fn request(&self, index: usize) -> CompletionRequest {
            self.requests.lock().unwrap()[index].clone()
        }
    }

    #[async_trait]
    impl LLMProvider for ScriptedProvider {
        async fn complete(&self, request: CompletionRequest) -> LLMResult<CompletionResponse> {
            self.requests.lock().unwrap().push(request);
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

    /// Stub price capability counting its invocations.
    struct StubPriceTool {
        invocations: AtomicUsize,
    }

    impl StubPriceTool {
        fn new() -> Self {
            Self {
                invocations: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl Tool for StubPriceTool {
        async fn execute(&self, params: Value) -> finquest_core::Result<Value> {
            self.invocations.fetch_add(1, Ordering::SeqCst);
            let ticker = params
                .get("ticker")
                .and_then(|v| v.as_str())
                .unwrap_or("?")
                .to_string();
            Ok(json!({"ticker": ticker, "price": 120.5}))
        }

        fn name(&self) -> &'static str {
            "get_stock_price"
        }

        fn description(&self) -> &'static str {
            "Fetch the latest stock price for a ticker"
        }

        fn input_schema(&self) -> Value {
            json!({"type": "object", "properties": {"ticker": {"type": "string"}}, "required": ["ticker"]})
        }
    }

    fn executor_with(
        provider: Arc<ScriptedProvider>,
        tool: Arc<StubPriceTool>,
        max_iterations: usize,
    ) -> ReactExecutor {
        let registry = Arc::new(ToolRegistry::new());
        registry.register(tool);
        ReactExecutor::builder()
            .provider(provider)
            .registry(registry)
            .max_iterations(max_iterations)
            .build()
            .expect("executor builds")
    }

    const ACTION_TURN: &str = "Thought: I should look up the price.\nAction:\n```json\n{\"action\": \"get_stock_price\", \"action_input\": {\"ticker\": \"NVDA\"}}\n```";
    const FINAL_TURN: &str = "Thought: I now know the final answer\nFinal Answer: NVDA is at 120.5";

    #[tokio::test]
    async fn test_price_lookup_then_final_answer() {
        let provider = Arc::new(ScriptedProvider::new(&[ACTION_TURN, FINAL_TURN]));
        let tool = Arc::new(StubPriceTool::new());
        let executor = executor_with(Arc::clone(&provider), Arc::clone(&tool), 10);

        let outcome = executor.run("What is NVDA trading at?").await.expect("runs");

        assert_eq!(
            outcome,
            SessionOutcome::Completed {
                answer: "NVDA is at 120.5".to_string(),
                iterations: 2,
            }
        );
        assert_eq!(outcome.answer(), Some("NVDA is at 120.5"));
        assert_eq!(provider.calls(), 2);
        assert_eq!(tool.invocations.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_second_call_sees_full_history() {
        let provider = Arc::new(ScriptedProvider::new(&[ACTION_TURN, FINAL_TURN]));
        let tool = Arc::new(StubPriceTool::new());
        let executor = executor_with(Arc::clone(&provider), tool, 10);

        executor.run("What is NVDA trading at?").await.expect("runs");

        let first = provider.request(0);
        assert_eq!(first.messages.len(), 1);
        assert!(first.system.is_some());

        // user question + assistant action turn + observation turn
        let second = provider.request(1);
        assert_eq!(second.messages.len(), 3);
        let observation = second.messages[2].text().unwrap_or_default();
        assert!(observation.starts_with("Observation: "));
        assert!(observation.contains("120.5"));
    }

    #[tokio::test]
    async fn test_malformed_action_recovers_into_next_iteration() {
        let truncated = "{\"action\": \"get_stock_price\", ";
        let provider = Arc::new(ScriptedProvider::new(&[truncated, FINAL_TURN]));
        let tool = Arc::new(StubPriceTool::new());
        let executor = executor_with(Arc::clone(&provider), Arc::clone(&tool), 10);

        let outcome = executor.run("What is NVDA trading at?").await.expect("runs");

        assert_eq!(provider.calls(), 2);
        assert_eq!(tool.invocations.load(Ordering::SeqCst), 0);
        assert!(matches!(outcome, SessionOutcome::Completed { .. }));

        let second = provider.request(1);
        let observation = second.messages[2].text().unwrap_or_default();
        assert!(
            observation.starts_with("Observation: Error - Could not parse action JSON:"),
            "got: {observation}"
        );
    }

    #[tokio::test]
    async fn test_capability_failure_recovers_into_next_iteration() {
        struct BrokenTool;

        #[async_trait]
        impl Tool for BrokenTool {
            async fn execute(&self, _params: Value) -> finquest_core::Result<Value> {
                Err(finquest_core::Error::Tool("feed unavailable".to_string()))
            }

            fn name(&self) -> &'static str {
                "get_stock_price"
            }

            fn description(&self) -> &'static str {
                "stub"
            }

            fn input_schema(&self) -> Value {
                json!({"type": "object"})
            }
        }

        let provider = Arc::new(ScriptedProvider::new(&[ACTION_TURN, FINAL_TURN]));
        let registry = Arc::new(ToolRegistry::new());
        registry.register(Arc::new(BrokenTool));
        let executor = ReactExecutor::builder()
            .provider(Arc::clone(&provider) as Arc<dyn LLMProvider>)
            .registry(registry)
            .build()
            .expect("executor builds");

        let outcome = executor.run("What is NVDA trading at?").await.expect("runs");

        assert!(matches!(outcome, SessionOutcome::Completed { .. }));
        let second = provider.request(1);
        let observation = second.messages[2].text().unwrap_or_default();
        assert!(observation.contains("Error - "));
        assert!(observation.contains("feed unavailable"));
    }

    #[tokio::test]
    async fn test_iteration_budget_stops_after_exactly_three_calls() {
        let wandering = "Thought: still thinking about what to do next.";
        let provider = Arc::new(ScriptedProvider::new(&[wandering, wandering, wandering]));
        let tool = Arc::new(StubPriceTool::new());
        let executor = executor_with(Arc::clone(&provider), tool, 3);

        let outcome = executor.run("What is NVDA trading at?").await.expect("runs");

        assert_eq!(outcome, SessionOutcome::BudgetExceeded { iterations: 3 });
        assert_eq!(provider.calls(), 3);
    }

    #[tokio::test]
    async fn test_cancellation_checked_before_first_reasoning_call() {
        let provider = Arc::new(ScriptedProvider::new(&[FINAL_TURN]));
        let tool = Arc::new(StubPriceTool::new());
        let executor = executor_with(Arc::clone(&provider), tool, 10);

        executor.cancellation_token().cancel();
        let outcome = executor.run("What is NVDA trading at?").await.expect("runs");

        assert_eq!(outcome, SessionOutcome::Cancelled { iterations: 0 });
        assert_eq!(provider.calls(), 0);
    }

    #[tokio::test]
    async fn test_provider_failure_is_fatal() {
        // Empty script: the provider errors on the first call
        let provider = Arc::new(ScriptedProvider::new(&[]));
        let tool = Arc::new(StubPriceTool::new());
        let executor = executor_with(provider, tool, 10);

        let err = executor
            .run("What is NVDA trading at?")
            .await
            .expect_err("fatal");
        assert!(matches!(err, RuntimeError::Reasoning(_)));
    }

    #[tokio::test]
    async fn test_unknown_tool_feeds_error_observation() {
        let unknown = "```json\n{\"action\": \"get_weather\", \"action_input\": {}}\n```";
        let provider = Arc::new(ScriptedProvider::new(&[unknown, FINAL_TURN]));
        let tool = Arc::new(StubPriceTool::new());
        let executor = executor_with(Arc::clone(&provider), tool, 10);

        let outcome = executor.run("What is NVDA trading at?").await.expect("runs");

        assert!(matches!(outcome, SessionOutcome::Completed { .. }));
        let second = provider.request(1);
        let observation = second.messages[2].text().unwrap_or_default();
        assert_eq!(observation, "Observation: Error - Unknown tool: get_weather");
    }
}
