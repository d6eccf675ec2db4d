//! Conversation state for one session
//!
//! The transcript is an ordered, append-biased log of turns, owned and
//! mutated exclusively by the executor. A pushed message whose identity
//! matches an existing entry replaces that entry in place; everything else
//! is appended. No message is ever deleted.

use finquest_llm::Message;

/// Ordered sequence of conversation messages
#[derive(Debug, Default)]
pub struct Transcript {
    messages: Vec<Message>,
}

impl Transcript {
    /// Create an empty transcript
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a message, or replace in place on a matching identity
    ///
    /// The replaced entry keeps its position. Messages without an identity
    /// are always appended.
    pub fn push(&mut self, message: Message) {
        if let Some(id) = message.id.as_deref() {
            if let Some(existing) = self
                .messages
                .iter_mut()
                .find(|m| m.id.as_deref() == Some(id))
            {
                *existing = message;
                return;
            }
        }
        self.messages.push(message);
    }

    /// Read the full ordered sequence
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Last message, if any
    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    /// Number of turns
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Whether the transcript is empty
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}
