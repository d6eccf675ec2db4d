//! Tool trait definition

use async_trait::async_trait;
use finquest_core::Result;
use serde_json::Value;

/// Trait for tools that the research loop can execute
///
/// Tools are capabilities invoked by name with a mapping of arguments.
/// Each tool must provide a name, description, and JSON schema for its
/// input; these are rendered into the reasoning producer's instructions.
/// Tools must return `Err` on failure rather than an in-band sentinel -
/// the dispatcher is responsible for normalizing raised errors.
#[async_trait]
pub trait Tool: Send + Sync {
    /// Execute the tool with given parameters
    ///
    /// # Arguments
    ///
    /// * `params` - Tool input as JSON value (should match input_schema)
    ///
    /// # Returns
    ///
    /// Tool output as JSON value
    async fn execute(&self, params: Value) -> Result<Value>;

    /// Get the tool's name
    ///
    /// Must be unique within a ToolRegistry; this is the `action` value
    /// the model uses to invoke it.
    fn name(&self) -> &str;

    /// Get the tool's description
    ///
    /// This description helps the LLM understand when to use this tool
    fn description(&self) -> &str;

    /// Get the tool's input schema (JSON Schema format)
    fn input_schema(&self) -> Value;

    /// Build the static descriptor rendered into the prompt catalog
    fn descriptor(&self) -> ToolDescriptor {
        ToolDescriptor {
            name: self.name().to_string(),
            description: self.description().to_string(),
            input_schema: self.input_schema(),
        }
    }
}

/// Static description of a tool, constructed once at session start
///
/// Read-only after construction; supplied to the reasoning producer as part
/// of its instructions.
#[derive(Debug, Clone)]
pub struct ToolDescriptor {
    /// Tool name (the `action` value)
    pub name: String,
    /// Natural-language description
    pub description: String,
    /// JSON schema describing the expected `action_input`
    pub input_schema: Value,
}
