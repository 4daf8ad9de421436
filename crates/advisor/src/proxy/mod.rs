//! Client for the chat-completion proxy.
//!
//! The proxy accepts an OpenAI-style `{ model, messages }` body and answers
//! with either `{ reply }` or `{ choices: [{ message: { content } }] }`.
//! It carries no authentication and does not stream.

mod client;
mod error;
mod types;

pub use client::ProxyClient;
pub use error::ProxyError;
pub use types::{ChatMessage, CompletionRequest, ProxyResponse};
