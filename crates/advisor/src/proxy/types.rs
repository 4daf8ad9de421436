//! Wire types for the chat-completion proxy.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use routine_advisor_core::ChatRole;

/// A message sent to the proxy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

impl ChatMessage {
    /// A system instruction.
    #[must_use]
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::System,
            content: content.into(),
        }
    }

    /// A message from the shopper.
    #[must_use]
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }
}

/// Request body for the proxy.
#[derive(Debug, Clone, Serialize)]
pub struct CompletionRequest<'a> {
    /// Model to use (e.g., "gpt-4o").
    pub model: &'a str,
    /// Prompt messages, system instruction first.
    pub messages: &'a [ChatMessage],
}

/// A proxy response body, classified by shape.
///
/// The proxy either flattens the answer into `reply` or passes the upstream
/// completion through untouched. `reply` wins when both are present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProxyResponse {
    /// `{ "reply": "..." }`
    Reply(String),
    /// `{ "choices": [{ "message": { "content": "..." } }] }`
    Choice(String),
    /// Neither shape carried non-empty text.
    Unrecognized,
}

impl ProxyResponse {
    /// Classify a decoded JSON body.
    #[must_use]
    pub fn classify(body: &Value) -> Self {
        if let Some(reply) = non_empty_str(body.get("reply")) {
            return Self::Reply(reply.to_string());
        }
        if let Some(content) = non_empty_str(body.pointer("/choices/0/message/content")) {
            return Self::Choice(content.to_string());
        }
        Self::Unrecognized
    }

    /// The reply text, if the shape was recognized.
    #[must_use]
    pub fn into_text(self) -> Option<String> {
        match self {
            Self::Reply(text) | Self::Choice(text) => Some(text),
            Self::Unrecognized => None,
        }
    }
}

fn non_empty_str(value: Option<&Value>) -> Option<&str> {
    value.and_then(Value::as_str).filter(|s| !s.is_empty())
}
