//! Conversation message types
//!
//! Messages carry an optional identity so that a transcript can replace an
//! entry in place when a producer re-emits it; constructors assign a fresh
//! UUID by default. Observation turns (normalized tool results fed back to
//! the model) get their own role and are mapped to the provider's assistant
//! role on the wire.

use serde::{Deserialize, Serialize};

/// Message role in a conversation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// User message (the research question)
    User,
    /// Assistant message (reasoning output)
    Assistant,
    /// System message (instructions and tool catalog)
    System,
    /// Observation message (normalized tool result)
    Observation,
}

/// Image source for multi-modal content
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ImageSource {
    /// Image from URL
    Url {
        /// Image URL
        url: String,
    },
    /// Base64-encoded image
    Base64 {
        /// Media type (e.g., "image/png")
        media_type: String,
        /// Base64-encoded image data
        data: String,
    },
}

/// Content block in a message (supports multi-modal content)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentBlock {
    /// Plain text content
    Text {
        /// Text content
        text: String,
    },

    /// Image content (base64 or URL)
    Image {
        /// Image source
        source: ImageSource,
    },
}

/// Message content: either simple text or structured blocks
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MessageContent {
    /// Simple text content
    Text(String),
    /// Structured content blocks
    Blocks(Vec<ContentBlock>),
}

/// A message in the conversation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    /// Opaque identity; a transcript replaces in place on a matching id
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Message role
    pub role: Role,

    /// Message content
    pub content: MessageContent,
}

impl Message {
    fn with_role(role: Role, text: impl Into<String>) -> Self {
        Self {
            id: Some(uuid::Uuid::new_v4().to_string()),
            role,
            content: MessageContent::Text(text.into()),
        }
    }

    /// Create a user message with text
    pub fn user(text: impl Into<String>) -> Self {
        Self::with_role(Role::User, text)
    }

    /// Create an assistant message with text
    pub fn assistant(text: impl Into<String>) -> Self {
        Self::with_role(Role::Assistant, text)
    }

    /// Create a system message with text
    pub fn system(text: impl Into<String>) -> Self {
        Self::with_role(Role::System, text)
    }

    /// Create an observation message with text
    pub fn observation(text: impl Into<String>) -> Self {
        Self::with_role(Role::Observation, text)
    }

    /// Create a user message carrying a prompt and a base64 image
    pub fn user_with_image(
        prompt: impl Into<String>,
        media_type: impl Into<String>,
        data: impl Into<String>,
    ) -> Self {
        Self {
            id: Some(uuid::Uuid::new_v4().to_string()),
            role: Role::User,
            content: MessageContent::Blocks(vec![
                ContentBlock::Text {
                    text: prompt.into(),
                },
                ContentBlock::Image {
                    source: ImageSource::Base64 {
                        media_type: media_type.into(),
                        data: data.into(),
                    },
                },
            ]),
        }
    }

    /// Override the message identity
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Extract text content from the message (convenience method)
    pub fn text(&self) -> Option<&str> {
        match &self.content {
            MessageContent::Text(s) => Some(s),
            MessageContent::Blocks(blocks) => blocks.iter().find_map(|b| match b {
                ContentBlock::Text { text } => Some(text.as_str()),
                ContentBlock::Image { .. } => None,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_message() {
        let msg = Message::user("Hello");
        assert_eq!(msg.role, Role::User);
        assert_eq!(msg.text(), Some("Hello"));
        assert!(msg.id.is_some());
    }

    #[test]
    fn test_observation_message() {
        let msg = Message::observation("Observation: {\"price\": 1.0}");
        assert_eq!(msg.role, Role::Observation);
    }

    #[test]
    fn test_fresh_identity_per_message() {
        let a = Message::assistant("one");
        let b = Message::assistant("one");
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_with_id_overrides() {
        let msg = Message::assistant("text").with_id("fixed");
        assert_eq!(msg.id.as_deref(), Some("fixed"));
    }

    #[test]
    fn test_image_message_text_block() {
        let msg = Message::user_with_image("What is this?", "image/png", "QUJD");
        assert_eq!(msg.text(), Some("What is this?"));
        match &msg.content {
            MessageContent::Blocks(blocks) => assert_eq!(blocks.len(), 2),
            MessageContent::Text(_) => panic!("expected blocks"),
        }
    }

    #[test]
    fn test_message_serialization() {
        let msg = Message::user("Test");
        let json = serde_json::to_string(&msg).expect("serialize");
        let deserialized: Message = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(deserialized.text(), Some("Test"));
    }
}
