//! Safe tool dispatch
//!
//! The dispatcher resolves an action name against the registry, applies the
//! tool's argument adapter, executes the capability under a timeout, and
//! normalizes every outcome - success or failure - into exactly one
//! [`Observation`]. Nothing raised by a capability escapes this boundary,
//! and no retries happen here.

use crate::ToolRegistry;
use serde_json::{Map, Value};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info, warn};

const DEFAULT_TOOL_TIMEOUT: Duration = Duration::from_secs(60);

/// Errors a dispatch call can record inside an observation
#[derive(Debug, Error)]
pub enum DispatchError {
    /// The parsed action names a tool not present in the registry
    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    /// A registered capability failed during execution; the original
    /// message text is preserved for the reasoning producer to see
    #[error("{0}")]
    Execution(String),
}

/// The normalized result of executing one action
#[derive(Debug)]
pub struct Observation {
    /// Name of the tool the action addressed
    pub tool: String,
    /// Success value or structured error
    pub payload: Result<Value, DispatchError>,
}

impl Observation {
    /// Build a success observation
    pub fn success(tool: impl Into<String>, value: Value) -> Self {
        Self {
            tool: tool.into(),
            payload: Ok(value),
        }
    }

    /// Build a failure observation
    pub fn failure(tool: impl Into<String>, error: DispatchError) -> Self {
        Self {
            tool: tool.into(),
            payload: Err(error),
        }
    }

    /// Whether this observation records a failure
    pub fn is_error(&self) -> bool {
        self.payload.is_err()
    }

    /// Render the observation as a conversation turn
    pub fn render(&self) -> String {
        match &self.payload {
            Ok(value) => format!("Observation: {value}"),
            Err(error) => format!("Observation: Error - {error}"),
        }
    }
}

/// Routes parsed actions to registered capabilities
pub struct Dispatcher {
    registry: Arc<ToolRegistry>,
    tool_timeout: Duration,
}

impl Dispatcher {
    /// Create a dispatcher over a registry with the default tool timeout
    pub fn new(registry: Arc<ToolRegistry>) -> Self {
        Self {
            registry,
            tool_timeout: DEFAULT_TOOL_TIMEOUT,
        }
    }

    /// Set the per-call tool timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.tool_timeout = timeout;
        self
    }

    /// Execute one action and normalize the outcome
    ///
    /// Exactly one observation is produced per call; this method never
    /// returns an error.
    pub async fn dispatch(&self, name: &str, args: Map<String, Value>) -> Observation {
        let Some(entry) = self.registry.get(name) else {
            warn!(tool = %name, "Action named an unregistered tool");
            return Observation::failure(name, DispatchError::UnknownTool(name.to_string()));
        };

        let args = match &entry.adapter {
            Some(adapter) => {
                debug!(tool = %name, adapter = %adapter.name(), "Applying argument adapter");
                adapter.adapt(args)
            }
            None => args,
        };

        info!(tool = %name, "Executing tool");

        let started = std::time::Instant::now();
        let outcome =
            tokio::time::timeout(self.tool_timeout, entry.tool.execute(Value::Object(args))).await;
        let duration_ms = started.elapsed().as_millis() as u64;

        match outcome {
            Ok(Ok(value)) => {
                info!(tool = %name, duration_ms, "Tool execution succeeded");
                Observation::success(name, value)
            }
            Ok(Err(e)) => {
                warn!(tool = %name, duration_ms, error = %e, "Tool execution failed");
                Observation::failure(name, DispatchError::Execution(e.to_string()))
            }
            Err(_) => {
                warn!(tool = %name, duration_ms, "Tool execution timed out");
                Observation::failure(
                    name,
                    DispatchError::Execution(format!(
                        "tool '{}' timed out after {:?}",
                        name, self.tool_timeout
                    )),
                )
            }
        }
    }
}
