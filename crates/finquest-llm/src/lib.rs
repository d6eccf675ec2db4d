//! LLM provider abstraction for finquest
//!
//! Defines the conversation model (messages with roles and optional
//! identities), completion request/response types, the [`LLMProvider`]
//! trait, and an OpenAI-compatible implementation.

pub mod completion;
pub mod error;
pub mod messages;
pub mod provider;
pub mod providers;

pub use completion::{
    CompletionRequest, CompletionRequestBuilder, CompletionResponse, StopReason, TokenUsage,
};
pub use error::{LLMError, Result};
pub use messages::{ContentBlock, ImageSource, Message, MessageContent, Role};
pub use provider::LLMProvider;
