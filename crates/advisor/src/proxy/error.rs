//! Error types for the proxy client.

use thiserror::Error;

/// Errors that can occur when talking to the chat-completion proxy.
///
/// An unrecognized response shape is not an error, see
/// [`ProxyResponse::Unrecognized`](super::ProxyResponse::Unrecognized).
#[derive(Debug, Error)]
pub enum ProxyError {
    /// HTTP request failed (connect, timeout, body read).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Response body is not JSON.
    #[error("parse error: {0}")]
    Parse(String),
}
