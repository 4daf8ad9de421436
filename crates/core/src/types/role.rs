//! Chat message roles understood by the advisor proxy.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Author of a message sent to the chat-completion proxy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    /// Instruction that scopes the assistant's behavior.
    System,
    /// Text written by the shopper.
    User,
    /// Text produced by the model.
    Assistant,
}

impl ChatRole {
    /// Wire name of the role.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::System => "system",
            Self::User => "user",
            Self::Assistant => "assistant",
        }
    }
}

impl fmt::Display for ChatRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Sender tag of a rendered chat bubble.
///
/// Only the shopper and the advisor ever appear in the transcript, system
/// instructions are never rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BubbleSender {
    User,
    Bot,
}

impl BubbleSender {
    /// CSS class used for the bubble.
    #[must_use]
    pub const fn css_class(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Bot => "bot",
        }
    }
}
